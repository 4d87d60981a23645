use std::{fs::File, io::BufReader, process::ExitCode};

use fa_text::prelude::*;

use tracing::{debug, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("fa")
        .about("Reads a finite automaton description and classifies a word")
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("treat every anomaly in the description as an error"),
        )
        .arg(
            Arg::new("warnings")
                .short('w')
                .long("warnings")
                .action(ArgAction::SetTrue)
                .help("report anomalies that are repaired when parsing leniently"),
        )
        .arg(
            Arg::new("show")
                .long("show")
                .action(ArgAction::SetTrue)
                .help("print the parsed automaton"),
        )
        .arg(Arg::new("file").help("file containing the description, reads stdin if absent or `-`"))
        .arg(Arg::new("word").help("word to classify, every character is one symbol"))
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn read_description(matches: &ArgMatches) -> Result<Description, ReadError> {
    let options = if matches.get_flag("strict") {
        ParseOptions::strict()
    } else {
        ParseOptions::lenient()
    }
    .with_warnings(matches.get_flag("warnings"));

    match matches.get_one::<String>("file").map(String::as_str) {
        Some(path) if path != "-" => {
            debug!("reading description from {path}");
            parse_reader(BufReader::new(File::open(path)?), options)
        }
        _ => {
            debug!("reading description from stdin");
            parse_reader(std::io::stdin().lock(), options)
        }
    }
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    let description = match read_description(&matches) {
        Ok(description) => description,
        Err(ReadError::Parse(err)) => {
            for diagnostic in err.diagnostics() {
                eprintln!("{diagnostic}");
            }
            println!("Invalid automaton");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    for diagnostic in description.diagnostics() {
        eprintln!("{diagnostic}");
    }

    let aut = description.automaton();
    if matches.get_flag("show") {
        println!("{aut}");
    }

    if !aut.is_deterministic() {
        println!("Your automaton is non-deterministic.");
    } else if let Some(word) = matches.get_one::<String>("word") {
        if aut.accepts_word(word) {
            println!("accept");
        } else {
            println!("reject");
        }
    }
    ExitCode::SUCCESS
}
