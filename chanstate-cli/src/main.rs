use std::path::Path;
use std::process::ExitCode;

use chanstate_core::ops::text;
use chanstate_core::{Config, StateDocument};

const USAGE: &str = "usage: chanstate [-v] <command> [args]

commands:
  show <file>                 print a state or snapshot file
  keys <file>                 list the keys of a file in order
  get <file> <key>            print one value as JSON
  merge <file> <json>         merge a JSON object into a file (created if missing)
  split <text> <delimiter>    split text into one token per line
  strip <text> <needle> [max] remove occurrences of needle";

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    if TermLogger::init(log_level, simplelog::Config::default(), TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        eprintln!("chanstate: logger already initialized");
    }

    log::debug!("chanstate starting (log level: {:?})", log_level);
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let args: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--verbose" && *a != "-v")
        .collect();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("chanstate: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[&str]) -> Result<(), String> {
    let config = Config::load();
    match args {
        ["show", file] => {
            let doc = load(Path::new(file))?;
            print!("{}", doc.serialize_pretty(config.snapshot_indent()));
            Ok(())
        }
        ["keys", file] => {
            let doc = load(Path::new(file))?;
            for key in doc.keys() {
                println!("{}", key);
            }
            Ok(())
        }
        ["get", file, key] => {
            let doc = load(Path::new(file))?;
            let value = doc
                .get(key)
                .ok_or_else(|| format!("no key {:?} in {}", key, file))?;
            let json = serde_json::to_string(value).map_err(|e| e.to_string())?;
            println!("{}", json);
            Ok(())
        }
        ["merge", file, json] => {
            let path = Path::new(file);
            let mut doc = if path.exists() {
                load(path)?
            } else {
                StateDocument::new()
            };
            doc.merge_from(json).map_err(|e| e.to_string())?;
            text::write_file(&doc.serialize_pretty(config.snapshot_indent()), path, false)
                .map_err(|e| e.to_string())?;
            log::info!("{} now holds {} keys", file, doc.len());
            Ok(())
        }
        ["split", input, delimiter] => {
            for token in text::split_to_array(input, delimiter) {
                println!("{}", token);
            }
            Ok(())
        }
        ["strip", input, needle] => {
            strip(input, needle, None);
            Ok(())
        }
        ["strip", input, needle, max] => {
            let max = max
                .parse::<usize>()
                .map_err(|_| format!("max must be a non-negative integer, got {:?}", max))?;
            strip(input, needle, Some(max));
            Ok(())
        }
        _ => Err(USAGE.to_string()),
    }
}

fn load(path: &Path) -> Result<StateDocument, String> {
    let contents = text::read_file(path).map_err(|e| e.to_string())?;
    StateDocument::parse(&contents).map_err(|e| format!("{}: {}", path.display(), e))
}

fn strip(input: &str, needle: &str, max: Option<usize>) {
    let (output, removed) = text::remove_occurrences(input, needle, max);
    log::info!("removed {} occurrence(s) of {:?}", removed, needle);
    println!("{}", output);
}
