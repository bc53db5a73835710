mod verbosity;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use itertools::Itertools;
use log::warn;

use favis_animation::Animation;
use favis_animation::Frame;
use favis_animation::animate;
use favis_automata::AutomatonDot;
use favis_syntax::is_well_formed;
use favis_syntax::parse;
use favis_syntax::read_saved_regexes;
use favis_syntax::write_saved_regexes;
use favis_utilities::FavisError;
use favis_utilities::Timing;

use crate::verbosity::VerbosityFlag;

#[derive(clap::Parser, Debug)]
#[command(name = "favis", about = "A command line finite automaton visualiser")]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value_t = false,
        help = "Print the version of this tool"
    )]
    version: bool,

    #[command(flatten)]
    verbosity: VerbosityFlag,

    #[command(subcommand)]
    commands: Option<Commands>,

    #[arg(long, global = true)]
    timings: bool,
}

/// Defines the subcommands for this tool.
#[derive(Debug, Subcommand)]
enum Commands {
    Info(InfoArgs),
    Frames(FramesArgs),
    Simulate(SimulateArgs),
    Dot(DotArgs),
    Saved(SavedArgs),
}

#[derive(clap::Args, Debug)]
#[command(about = "Prints information about the automata of the given expression")]
struct InfoArgs {
    regex: String,
}

#[derive(clap::Args, Debug)]
#[command(about = "Prints the construction frames of the given expression")]
struct FramesArgs {
    regex: String,
}

#[derive(clap::Args, Debug)]
#[command(about = "Runs a word through the DFA of the given expression")]
struct SimulateArgs {
    regex: String,

    word: String,
}

#[derive(clap::Args, Debug)]
#[command(about = "Prints the final automaton in Graphviz dot format")]
struct DotArgs {
    regex: String,

    #[arg(long, help = "Print the NFA instead of the DFA")]
    nfa: bool,
}

#[derive(clap::Args, Debug)]
#[command(about = "Lists a saved expression file in canonical form")]
struct SavedArgs {
    filename: String,

    #[arg(long, help = "Validate and append an expression to the file")]
    add: Option<String>,
}

fn main() -> Result<ExitCode, FavisError> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .parse_default_env()
        .init();

    if cli.version {
        eprintln!("favis {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    let timing = Timing::new();
    let mut result = ExitCode::SUCCESS;

    if let Some(command) = cli.commands {
        match command {
            Commands::Info(args) => {
                let mut timer = timing.start("construction");
                let animations = animate(&args.regex)?;
                timer.finish();

                let nfa = animations.nfa();
                let dfa = animations.dfa();

                println!("Canonical form: {}", parse(&args.regex));
                println!("Alphabet: {{{}}}", nfa.automaton().alphabet().iter().join(", "));
                println!(
                    "NFA: {} states, {} transitions, {} frames",
                    nfa.automaton().num_of_states(),
                    nfa.automaton().num_of_transitions(),
                    nfa.frame_count()
                );
                println!(
                    "DFA: {} states, {} transitions, {} frames",
                    dfa.automaton().num_of_states(),
                    dfa.automaton().num_of_transitions(),
                    dfa.frame_count()
                );
            }
            Commands::Frames(args) => {
                let mut timer = timing.start("construction");
                let animations = animate(&args.regex)?;
                timer.finish();

                print_frames("NFA", animations.nfa().frames());
                print_frames("DFA", animations.dfa().frames());
            }
            Commands::Simulate(args) => {
                let mut timer = timing.start("construction");
                let animations = animate(&args.regex)?;
                timer.finish();

                let mut timer = timing.start("simulation");
                let simulation = animations.simulate(&args.word);
                timer.finish();

                print_frames("Simulation", simulation.frames());

                if simulation.accepted() {
                    println!("The word {:?} is accepted by {:?}", args.word, args.regex);
                } else {
                    println!("The word {:?} is not accepted by {:?}", args.word, args.regex);
                    result = ExitCode::FAILURE;
                }
            }
            Commands::Dot(args) => {
                let animations = animate(&args.regex)?;

                if args.nfa {
                    println!("{}", AutomatonDot::new(animations.nfa().automaton()));
                } else {
                    println!("{}", AutomatonDot::new(animations.dfa().automaton()));
                }
            }
            Commands::Saved(args) => {
                let path = Path::new(&args.filename);

                if let Some(regex) = args.add {
                    if !is_well_formed(&regex) {
                        return Err(format!("The expression {regex:?} is not well-formed").into());
                    }

                    let mut expressions = if path.exists() {
                        read_saved_regexes(File::open(path)?)?
                    } else {
                        Vec::new()
                    };
                    expressions.push(regex);

                    let mut writer = BufWriter::new(File::create(path)?);
                    write_saved_regexes(&mut writer, &expressions)?;
                }

                for expression in read_saved_regexes(File::open(path)?)? {
                    if is_well_formed(&expression) {
                        println!("{}", parse(&expression));
                    } else {
                        warn!("Skipping the expression {expression:?}, which is not well-formed");
                    }
                }
            }
        }
    }

    if cli.timings {
        timing.print();
    }

    Ok(result)
}

/// Prints the narrative of the given frames, numbered from one.
fn print_frames(heading: &str, frames: &[Frame]) {
    println!("{heading}:");
    for (number, frame) in frames.iter().enumerate() {
        println!("{:3}. {}", number + 1, frame.text());
    }
}
