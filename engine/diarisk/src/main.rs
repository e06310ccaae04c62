use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use diarisk::diabetes::{self, DiabetesInputs};
use diarisk::{FuzzySystem, KnowledgeBase, KnowledgeBaseError};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(
    name = "diarisk",
    version,
    about = "Fuzzy-logic diabetes risk assessment",
    long_about = "diarisk scores diabetes risk from fasting blood sugar, BMI, age and weekly\n\
        physical activity using Mamdani fuzzy inference over a hand-authored rule base.\n\n\
        EXAMPLES:\n\
        \n  diarisk assess --fbs 110 --bmi 27.5 --age 45 --activity 45\n\
        \n  diarisk assess --fbs 160 --bmi 38 --age 70 --activity 20 --json --explain\n\
        \n  diarisk kb > diabetes.toml\n\
        \n  diarisk check diabetes.toml\n\
        \n  diarisk assess --kb diabetes.toml --fbs 95 --bmi 22 --age 25 --activity 200"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Assess one patient's diabetes risk
    Assess(AssessArgs),
    /// Validate a knowledge-base file
    Check {
        /// Knowledge-base TOML file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the built-in knowledge base as TOML
    Kb,
}

#[derive(Debug, Args, Clone)]
struct AssessArgs {
    /// Fasting blood sugar in mg/dL
    #[arg(long)]
    fbs: f64,

    /// Body-mass index in kg/m²
    #[arg(long)]
    bmi: f64,

    /// Age in years
    #[arg(long)]
    age: f64,

    /// Physical activity in minutes per week
    #[arg(long = "activity", visible_alias = "physical-activity")]
    activity: f64,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Show fuzzified inputs and the rules that fired
    #[arg(long)]
    explain: bool,

    /// Use a knowledge-base file instead of the built-in one
    #[arg(long, value_name = "FILE")]
    kb: Option<PathBuf>,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

fn exit_code(e: &KnowledgeBaseError) -> i32 {
    if e.is_config() {
        1
    } else {
        2
    }
}

fn load_system(kb: Option<&Path>) -> Result<FuzzySystem, KnowledgeBaseError> {
    match kb {
        Some(path) => KnowledgeBase::load(path)?.build(),
        None => diabetes::system(),
    }
}

fn run_assess(args: &AssessArgs) -> i32 {
    let system = match load_system(args.kb.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_code(&e);
        }
    };
    let inputs = DiabetesInputs::new(args.fbs, args.bmi, args.age, args.activity);

    let rendered = if args.explain {
        system.explain(&inputs).map(|mut explanation| {
            explanation.result = explanation.result.rounded();
            if args.json {
                serde_json::to_string_pretty(&explanation)
            } else {
                Ok(format!("{}\n{explanation}", summary(&explanation.result)))
            }
        })
    } else {
        system.assess(&inputs).map(|result| {
            let result = result.rounded();
            if args.json {
                serde_json::to_string_pretty(&result)
            } else {
                Ok(summary(&result))
            }
        })
    };

    match rendered {
        Ok(Ok(text)) => {
            println!("{}", text.trim_end());
            0
        }
        Ok(Err(e)) => {
            eprintln!("error: cannot serialize result: {e}");
            2
        }
        Err(e) => {
            eprintln!("error: {e}");
            2
        }
    }
}

fn summary(result: &diarisk::AssessmentResult) -> String {
    let mut out = format!(
        "risk score: {:.2}\nclassification: {}",
        result.crisp_value, result.classification
    );
    if result.fallback {
        out.push_str("\nnote: no rule matched these inputs; the score is the midpoint fallback");
    }
    out
}

fn run_check(path: &Path) -> i32 {
    let kb = match KnowledgeBase::load(path) {
        Ok(kb) => kb,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_code(&e);
        }
    };
    match kb.build() {
        Ok(system) => {
            println!(
                "✓ {}: {} inputs, {} output terms, {} rules",
                path.display(),
                system.inputs().len(),
                system.output().terms().len(),
                system.rules().len()
            );
            0
        }
        Err(e) => {
            eprintln!("error: {}: {e}", path.display());
            exit_code(&e)
        }
    }
}

fn run_kb() -> i32 {
    match diabetes::knowledge_base().to_toml() {
        Ok(text) => {
            print!("{text}");
            0
        }
        Err(e) => {
            eprintln!("error: cannot serialize knowledge base: {e}");
            2
        }
    }
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Command::Assess(args) => run_assess(&args),
        Command::Check { file } => run_check(&file),
        Command::Kb => run_kb(),
    }
}

fn main() {
    std::process::exit(run_cli());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_assess() {
        let cli = Cli::try_parse_from([
            "diarisk", "assess", "--fbs", "110", "--bmi", "27.5", "--age", "45", "--activity",
            "45", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Assess(args) => {
                assert_eq!(args.fbs, 110.0);
                assert_eq!(args.activity, 45.0);
                assert!(args.json);
                assert!(!args.explain);
                assert_eq!(args.kb, None);
            }
            _ => panic!("expected Assess command"),
        }
    }

    #[test]
    fn cli_requires_all_four_inputs() {
        let err = Cli::try_parse_from(["diarisk", "assess", "--fbs", "110", "--bmi", "27.5"]);
        assert!(err.is_err());
    }

    #[test]
    fn cli_parses_verbose_flag() {
        let cli = Cli::try_parse_from(["diarisk", "-vvv", "kb"]).unwrap();
        assert_eq!(cli.verbose, 3, "verbose count should be 3 for -vvv");
    }

    #[test]
    fn cli_parses_check_with_file() {
        let cli = Cli::try_parse_from(["diarisk", "check", "kb.toml"]).unwrap();
        match cli.command {
            Command::Check { file } => assert_eq!(file, PathBuf::from("kb.toml")),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn summary_mentions_fallback() {
        let result = diarisk::AssessmentResult {
            crisp_value: 50.0,
            classification: diarisk::RiskLevel::Moderate,
            fallback: true,
        };
        let text = summary(&result);
        assert!(text.starts_with("risk score: 50.00\nclassification: Moderate"));
        assert!(text.contains("fallback"));
    }
}
