use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use medi_calc::PedigreeConfig;
use medi_predict::{
    Feature, HttpPredictor, InputMode, PredictConfig, PredictionController, PredictionForm,
};
use tokio::runtime::Runtime;

mod session;

use session::ScreenSession;

#[derive(Debug, Parser)]
#[command(
    name = "medi_screen",
    version,
    author = "MediLang Team",
    about = "Diabetes screening panels: BMI, pedigree score and remote prediction",
    long_about = "medi_screen runs the three screening panels from a terminal.\n\n\
        EXAMPLES:\n\
        \n  medi_screen                                   Start the interactive session\n\
        \n  medi_screen run visit.txt                     Replay commands from a file\n\
        \n  medi_screen predict -f Glucose=148 -f Age=50  Send one prediction request\n\
        \n  MEDI_BACKEND_URL=http://ml:5000 medi_screen   Use another prediction service",
    after_help = "For more information, visit: https://github.com/MediLang/medi"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    backend: BackendArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Args)]
struct BackendArgs {
    /// Base URL of the prediction service (overrides MEDI_BACKEND_URL)
    #[arg(long = "backend-url", value_name = "URL", global = true)]
    backend_url: Option<String>,

    /// Request timeout in milliseconds, 0 for none (overrides MEDI_REQUEST_TIMEOUT_MS)
    #[arg(long = "timeout-ms", value_name = "MS", global = true)]
    timeout_ms: Option<u64>,

    /// Reject form fields that are not plain numbers instead of sending NaN
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start the interactive session (default)")]
    Repl,
    #[command(about = "Run session commands from a file, one per line")]
    Run {
        #[arg(value_name = "FILE")]
        script: PathBuf,
    },
    #[command(about = "Send one prediction request and print the result")]
    Predict {
        /// Form field as NAME=VALUE; repeat for each field
        #[arg(short = 'f', long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn predict_config(args: &BackendArgs) -> PredictConfig {
    let mut config = PredictConfig::from_env();
    if let Some(url) = &args.backend_url {
        config.backend_url = url.clone();
    }
    if let Some(ms) = args.timeout_ms {
        config.request_timeout = (ms > 0).then(|| Duration::from_millis(ms));
    }
    if args.strict {
        config.input_mode = InputMode::Strict;
    }
    config
}

fn build_runtime() -> Result<Runtime, String> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start async runtime: {e}"))
}

fn new_session(
    config: &PredictConfig,
    runtime: &Runtime,
) -> Result<ScreenSession<HttpPredictor>, String> {
    let predictor = HttpPredictor::new(config).map_err(|e| e.to_string())?;
    log::info!("prediction endpoint: {}", predictor.endpoint());
    let controller = PredictionController::new(predictor, config.input_mode);
    Ok(ScreenSession::new(
        controller,
        PedigreeConfig::from_env(),
        runtime.handle().clone(),
    ))
}

fn run_repl(mut session: ScreenSession<HttpPredictor>) -> i32 {
    use rustyline::error::ReadlineError;
    use rustyline::Editor;
    let mut rl = match Editor::<(), rustyline::history::DefaultHistory>::new() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: failed to initialize repl: {e}");
            return 2;
        }
    };

    println!("medi_screen: type :help for commands");
    loop {
        match rl.readline(session.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = rl.add_history_entry(trimmed);
                }
                let (out, exit) = session.handle_line(&line);
                for l in out {
                    println!("{l}");
                }
                if exit {
                    return 0;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return 0,
            Err(e) => {
                eprintln!("error: repl failed: {e}");
                return 2;
            }
        }
    }
}

/// Replays a command file. Lines starting with `#` are comments.
fn run_script(mut session: ScreenSession<HttpPredictor>, path: &Path) -> i32 {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: cannot read '{}': {e}", path.display());
            return 2;
        }
    };
    for line in script_lines(&text) {
        let (out, exit) = session.handle_line(line);
        for l in out {
            println!("{l}");
        }
        if exit {
            break;
        }
    }
    0
}

fn script_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

fn parse_fields(fields: &[String]) -> Result<PredictionForm, String> {
    let mut form = PredictionForm::new();
    for field in fields {
        let (name, value) = field
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got '{field}'"))?;
        let feature: Feature = name.trim().parse().map_err(|e| format!("{e}"))?;
        form.set(feature, value.trim());
    }
    Ok(form)
}

/// Exit code 0 when a label was shown, 2 otherwise.
fn run_predict(config: &PredictConfig, runtime: &Runtime, fields: &[String]) -> i32 {
    let form = match parse_fields(fields) {
        Ok(form) => form,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let predictor = match HttpPredictor::new(config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let controller = PredictionController::new(predictor, config.input_mode);
    runtime.block_on(controller.submit(&form));

    let state = controller.state();
    match state.failure() {
        Some(error) => {
            eprintln!("error: {}", error.message());
            2
        }
        None => {
            println!("{}", controller.view());
            0
        }
    }
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = predict_config(&cli.backend);
    let runtime = match build_runtime() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };

    match cli.command.unwrap_or(Command::Repl) {
        Command::Predict { fields } => run_predict(&config, &runtime, &fields),
        command => {
            let session = match new_session(&config, &runtime) {
                Ok(session) => session,
                Err(e) => {
                    eprintln!("error: {e}");
                    return 2;
                }
            };
            match command {
                Command::Run { script } => run_script(session, &script),
                _ => run_repl(session),
            }
        }
    }
}

fn main() {
    std::process::exit(run_cli());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_override_environment() {
        let cli = Cli::try_parse_from([
            "medi_screen",
            "--backend-url",
            "http://ml.internal:8080/",
            "--timeout-ms",
            "0",
            "--strict",
        ])
        .unwrap();
        let config = predict_config(&cli.backend);
        assert_eq!(config.backend_url, "http://ml.internal:8080/");
        assert_eq!(config.endpoint(), "http://ml.internal:8080/predict");
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.input_mode, InputMode::Strict);
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "medi_screen",
            "predict",
            "-f",
            "Glucose=148",
            "--strict",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.backend.strict);
        match cli.command {
            Some(Command::Predict { fields }) => assert_eq!(fields, vec!["Glucose=148"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn fields_parse_into_the_form() {
        let form = parse_fields(&["glucose=148".to_string(), "BMI = 33.6".to_string()]).unwrap();
        assert_eq!(form.get(Feature::Glucose), "148");
        assert_eq!(form.get(Feature::Bmi), "33.6");
        assert_eq!(form.get(Feature::Age), "");

        assert_eq!(
            parse_fields(&["Glucose".to_string()]).unwrap_err(),
            "expected NAME=VALUE, got 'Glucose'"
        );
        assert!(parse_fields(&["Weight=70".to_string()]).is_err());
    }

    #[test]
    fn script_skips_blank_and_comment_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visit.txt");
        fs::write(&path, "# intake\nweight 70\n\n  height 175  \nbmi\n").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            script_lines(&text).collect::<Vec<_>>(),
            vec!["weight 70", "height 175", "bmi"]
        );
    }

    #[test]
    fn missing_script_exits_with_two() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = build_runtime().unwrap();
        let config = PredictConfig {
            backend_url: "http://127.0.0.1:9".to_string(),
            ..PredictConfig::default()
        };
        let session = new_session(&config, &runtime).unwrap();
        assert_eq!(run_script(session, &dir.path().join("absent.txt")), 2);
    }
}
