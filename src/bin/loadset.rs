//! Loadset command line tool

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use loadset::prelude::*;

const USAGE: &str = "\
Usage: loadset <command> [args]

Commands:
  summary  <file>                       Load set summary
  cases    <file>                       List load cases
  convert  <file> <unit> [out]          Convert to N, kN, lbf or klbf
  scale    <file> <factor> [out]        Multiply every component by factor
  envelope <file> [out]                 Keep only load cases holding extremes
  compare  <file1> <file2> [out]        Compare two load sets
  ansys    <file> <folder> <stem>       Write ANSYS load files
  generate <config.json> [out]          Generate balanced load cases

Environment:
  RUST_LOG        log level (error, warn, info, debug)
  LOADSET_PRETTY  pretty-print JSON output (default: 1)";

/// Generator input file
#[derive(Debug, Deserialize)]
struct GeneratorConfig {
    interfaces: Vec<Interface>,
    #[serde(default)]
    load_ranges: LoadRanges,
    #[serde(flatten)]
    options: GeneratorOptions,
}

fn pretty_output() -> bool {
    std::env::var("LOADSET_PRETTY")
        .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
        .unwrap_or(true)
}

/// Print `value` as JSON, or write it to `out` when given
fn emit<T: Serialize>(value: &T, out: Option<&String>) -> Result<()> {
    let json = if pretty_output() {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {path}"))?;
            log::info!("Wrote {}", path);
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a String> {
    match args.get(index) {
        Some(value) => Ok(value),
        None => bail!("Missing argument <{name}>\n\n{USAGE}"),
    }
}

fn read_loadset(path: &str) -> Result<LoadSet> {
    LoadSet::read_json(path).with_context(|| format!("Failed to load {path}"))
}

fn read_generator_config(path: &Path) -> Result<GeneratorConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid generator config {}", path.display()))
}

fn run(args: &[String]) -> Result<()> {
    let command = arg(args, 0, "command")?;

    match command.as_str() {
        "summary" => emit(&read_loadset(arg(args, 1, "file")?)?.summary(), None),
        "cases" => emit(&read_loadset(arg(args, 1, "file")?)?.load_case_infos(), None),
        "convert" => {
            let loadset = read_loadset(arg(args, 1, "file")?)?;
            let converted = loadset.convert_to_unit(arg(args, 2, "unit")?)?;
            emit(&converted, args.get(3))
        }
        "scale" => {
            let loadset = read_loadset(arg(args, 1, "file")?)?;
            let factor_arg = arg(args, 2, "factor")?;
            let factor: f64 = factor_arg
                .parse()
                .with_context(|| format!("Invalid scale factor '{factor_arg}'"))?;
            emit(&loadset.factor(factor), args.get(3))
        }
        "envelope" => {
            let loadset = read_loadset(arg(args, 1, "file")?)?;
            emit(&loadset.envelope()?, args.get(2))
        }
        "compare" => {
            let first = read_loadset(arg(args, 1, "file1")?)?;
            let second = read_loadset(arg(args, 2, "file2")?)?;
            let comparison = first.compare_to(&second);
            let summary = comparison.summary();
            log::info!(
                "Compared '{}' with '{}': {} rows, max |diff| {}",
                summary.loadset1_name.as_deref().unwrap_or("Unnamed"),
                summary.loadset2_name.as_deref().unwrap_or("Unnamed"),
                summary.total_comparison_rows,
                summary.max_absolute_difference
            );
            emit(&comparison, args.get(3))
        }
        "ansys" => {
            let loadset = read_loadset(arg(args, 1, "file")?)?;
            let written = loadset.to_ansys(arg(args, 2, "folder")?, arg(args, 3, "stem")?)?;
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
        "generate" => {
            let config = read_generator_config(Path::new(arg(args, 1, "config.json")?))?;
            let loadset = generate_balanced_loadset(&config.interfaces, &config.load_ranges, &config.options)?;
            emit(&loadset, args.get(2))
        }
        "help" | "-h" | "--help" => {
            println!("{USAGE}");
            Ok(())
        }
        other => bail!("Unknown command '{other}'\n\n{USAGE}"),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    run(&args)
}
