use crate::RegexTree;

/// Checks whether the given text is a valid regular expression over the
/// dialect of literals, brackets, alternation and Kleene star.
///
/// This check is the only validity gate. [`parse`] assumes its input passed
/// it and has unspecified behaviour otherwise.
pub fn is_well_formed(text: &str) -> bool {
    // A bare alternation with two empty sides is not an expression.
    if text == "|" {
        return false;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut brackets: i32 = 0;
    let mut empty_component = false;

    for (index, &current) in chars.iter().enumerate() {
        let previous = index.checked_sub(1).map(|i| chars[i]);

        match current {
            '(' => brackets += 1,
            ')' => {
                brackets -= 1;
                if brackets < 0 {
                    return false;
                }
            }
            '*' => {
                // A star must follow a literal or a closed group, and a group
                // with an empty alternation component cannot be starred.
                match previous {
                    None | Some('*') | Some('(') | Some('|') => return false,
                    Some(')') if empty_component => return false,
                    _ => {}
                }
            }
            '|' => {
                if previous == Some('|') {
                    return false;
                }
            }
            _ => {}
        }

        if previous == Some('(') && (current == ')' || current == '|')
            || previous == Some('|') && current == ')'
        {
            empty_component = true;
        } else if previous == Some(')') && current != ')' {
            empty_component = false;
        }
    }

    brackets == 0
}

/// Parses a well-formed expression into its [`RegexTree`].
pub fn parse(text: &str) -> RegexTree {
    let chars: Vec<char> = text.chars().collect();
    parse_slice(&chars)
}

fn parse_slice(chars: &[char]) -> RegexTree {
    if chars.is_empty() {
        return RegexTree::Empty;
    }

    // Alternation binds weakest, so split on the first '|' outside brackets.
    // Chains like a|b|c therefore nest to the right.
    if let Some(split) = top_level_alternation(chars) {
        let left = parse_slice(&chars[..split]);
        let right = parse_slice(&chars[split + 1..]);
        return RegexTree::Alternation(Box::new(left), Box::new(right));
    }

    if chars[0] == '(' {
        let close = matching_bracket(chars);

        if close == chars.len() - 1 {
            return parse_slice(&chars[1..close]);
        }

        if chars[close + 1] == '*' {
            let star = RegexTree::Star(Box::new(parse_slice(&chars[1..close])));
            if close + 2 == chars.len() {
                return star;
            }

            let rest = parse_slice(&chars[close + 2..]);
            return RegexTree::Concat(Box::new(star), Box::new(rest));
        }

        let group = parse_slice(&chars[1..close]);
        let rest = parse_slice(&chars[close + 1..]);
        return RegexTree::Concat(Box::new(group), Box::new(rest));
    }

    let literal = RegexTree::Literal(chars[0]);
    if chars.len() == 1 {
        return literal;
    }

    if chars[1] == '*' {
        let star = RegexTree::Star(Box::new(literal));
        if chars.len() == 2 {
            return star;
        }

        let rest = parse_slice(&chars[2..]);
        return RegexTree::Concat(Box::new(star), Box::new(rest));
    }

    let rest = parse_slice(&chars[1..]);
    RegexTree::Concat(Box::new(literal), Box::new(rest))
}

/// Returns the index of the first alternation bar outside any brackets.
fn top_level_alternation(chars: &[char]) -> Option<usize> {
    let mut depth = 0;
    for (index, c) in chars.iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '|' if depth == 0 => return Some(index),
            _ => {}
        }
    }

    None
}

/// Returns the index of the bracket closing the group opened at index 0.
fn matching_bracket(chars: &[char]) -> usize {
    let mut depth = 0;
    for (index, c) in chars.iter().enumerate() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return index;
                }
            }
            _ => {}
        }
    }

    unreachable!("well-formed input always closes its brackets")
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_well_formed() {
        for text in [
            "a",
            "ab",
            "",
            "a*",
            "a|b",
            "ab*|c*",
            "a*b*",
            "a*b*|cd*|ef*g",
            "(ab|b*)*",
            "|b*",
            "ac*|",
            "(ads*)|",
            "|(|b)|c*",
            "(|(|b)|c*)",
            "((a|b)|(c|d))*",
        ] {
            assert!(is_well_formed(text), "{text:?} should be well-formed");
        }
    }

    #[test]
    fn test_not_well_formed() {
        for text in [
            ")(",
            "qwe(",
            "*",
            ")(()((()()()()(()",
            "sddsf*sdf*|*asd",
            "|sdf|s|*sdf()))",
            "sds)",
            "()*",
            "(|||||||||)*",
            "a**",
            "|||||||||||||||",
            "|",
            "asdsada||asdasf",
            "(|ab)*",
            "(asc*|)*",
            "(asc|)*",
            "(((|ab)))*a|b",
            "(*)",
        ] {
            assert!(!is_well_formed(text), "{text:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_structure() {
        assert_eq!(parse("a"), RegexTree::Literal('a'));
        assert_eq!(parse(""), RegexTree::Empty);
        assert_eq!(
            parse("ab"),
            RegexTree::Concat(
                Box::new(RegexTree::Literal('a')),
                Box::new(RegexTree::Literal('b'))
            )
        );
        assert_eq!(parse("a*"), RegexTree::Star(Box::new(RegexTree::Literal('a'))));
        assert_eq!(
            parse("a|b"),
            RegexTree::Alternation(
                Box::new(RegexTree::Literal('a')),
                Box::new(RegexTree::Literal('b'))
            )
        );
    }

    #[test]
    fn test_parse_empty_branches() {
        // Both alternation branches may be empty expressions.
        assert_eq!(
            parse("|b"),
            RegexTree::Alternation(Box::new(RegexTree::Empty), Box::new(RegexTree::Literal('b')))
        );
        assert_eq!(
            parse("a|"),
            RegexTree::Alternation(Box::new(RegexTree::Literal('a')), Box::new(RegexTree::Empty))
        );
    }

    #[test]
    fn test_parse_right_nested_alternation() {
        assert_eq!(
            parse("a|b|c"),
            RegexTree::Alternation(
                Box::new(RegexTree::Literal('a')),
                Box::new(RegexTree::Alternation(
                    Box::new(RegexTree::Literal('b')),
                    Box::new(RegexTree::Literal('c'))
                ))
            )
        );
    }

    #[test]
    fn test_parse_starred_group() {
        assert_eq!(
            parse("(ab|c)*|d"),
            RegexTree::Alternation(
                Box::new(RegexTree::Star(Box::new(RegexTree::Alternation(
                    Box::new(RegexTree::Concat(
                        Box::new(RegexTree::Literal('a')),
                        Box::new(RegexTree::Literal('b'))
                    )),
                    Box::new(RegexTree::Literal('c'))
                )))),
                Box::new(RegexTree::Literal('d'))
            )
        );
    }

    #[test]
    fn test_redundant_brackets_collapse() {
        assert_eq!(parse("((a))"), RegexTree::Literal('a'));
        assert_eq!(parse("(a)(b)"), parse("ab"));
    }
}
