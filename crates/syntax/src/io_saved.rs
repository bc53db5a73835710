use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Saved expressions cannot contain line breaks")]
    EmbeddedLineBreak,

    #[error("Failed to access the saved expression list: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads a newline delimited list of saved expressions from the given reader.
/// Empty lines are skipped and Windows line endings are tolerated. The
/// entries are returned verbatim and are not checked for well-formedness.
pub fn read_saved_regexes(reader: impl Read) -> Result<Vec<String>, StoreError> {
    let mut result = Vec::new();

    for line in BufReader::new(reader).lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        result.push(line.to_string());
    }

    Ok(result)
}

/// Writes the given expressions as a newline delimited list to the given
/// writer. Expressions containing a line break are rejected since they would
/// read back as multiple entries.
pub fn write_saved_regexes(writer: &mut impl Write, regexes: &[impl AsRef<str>]) -> Result<(), StoreError> {
    for regex in regexes {
        let regex = regex.as_ref();
        if regex.contains('\n') || regex.contains('\r') {
            return Err(StoreError::EmbeddedLineBreak);
        }

        writeln!(writer, "{regex}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Seek;
    use std::io::SeekFrom;

    use test_log::test;

    use super::*;

    #[test]
    fn test_round_trip() {
        let mut buffer: Vec<u8> = Vec::new();
        write_saved_regexes(&mut buffer, &["a*b*", "(ab|b*)*", "ε"]).unwrap();

        let read = read_saved_regexes(&buffer[..]).unwrap();
        assert_eq!(read, vec!["a*b*", "(ab|b*)*", "ε"]);
    }

    #[test]
    fn test_skips_empty_lines_and_crlf() {
        let input = "a|b\r\n\r\n\na*b*\n";

        let read = read_saved_regexes(input.as_bytes()).unwrap();
        assert_eq!(read, vec!["a|b", "a*b*"]);
    }

    #[test]
    fn test_rejects_line_breaks() {
        let mut buffer: Vec<u8> = Vec::new();

        assert!(matches!(
            write_saved_regexes(&mut buffer, &["a*\nb*"]),
            Err(StoreError::EmbeddedLineBreak)
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let mut file: File = tempfile::tempfile().unwrap();
        write_saved_regexes(&mut file, &["ab*|c*", "a"]).unwrap();

        file.seek(SeekFrom::Start(0)).unwrap();
        let read = read_saved_regexes(&file).unwrap();
        assert_eq!(read, vec!["ab*|c*", "a"]);
    }
}
