use std::io::{self, IsTerminal};

use tracing::{debug, info};

use crate::cli::app::QuizApp;
use crate::cli::commands;
use crate::cli::interaction::{QuizInteraction, ScriptInteraction, TerminalInteraction};
use crate::cli::output::{self, OutputPreferences};
use crate::compute::HttpComputeClient;
use crate::config::{Config, ConfigManager};
use crate::errors::{QuizError, Result};
use crate::quiz::WizardController;
use crate::render::NoticeBoard;
use crate::report::ReportWriter;
use crate::utils::build_info;

pub const SCRIPT_ENV: &str = "CARBON_QUIZ_CLI_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

impl CliMode {
    pub fn from_env() -> Self {
        if std::env::var_os(SCRIPT_ENV).is_some() {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Invocation {
    Quiz { endpoint: Option<String> },
    Config(Vec<String>),
    Help,
    Version,
}

fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut endpoint = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => return Ok(Invocation::Help),
            "-V" | "--version" | "version" => return Ok(Invocation::Version),
            "config" => return Ok(Invocation::Config(iter.cloned().collect())),
            "--endpoint" => {
                let value = iter.next().ok_or_else(|| {
                    QuizError::Usage("--endpoint requires a URL argument".into())
                })?;
                endpoint = Some(value.clone());
            }
            other => {
                if let Some(value) = other.strip_prefix("--endpoint=") {
                    endpoint = Some(value.to_string());
                } else {
                    return Err(QuizError::Usage(format!(
                        "unknown argument `{other}`; run `carbon_quiz --help` for usage"
                    )));
                }
            }
        }
    }
    Ok(Invocation::Quiz { endpoint })
}

pub fn usage() -> String {
    format!(
        "Carbon footprint quiz\n\n\
         Usage:\n  \
         carbon_quiz [--endpoint <url>]   run the quiz\n  \
         carbon_quiz {}\n  \
         carbon_quiz --version\n  \
         carbon_quiz --help\n\n\
         At a question, type :restart to start over or :quit to leave.\n\
         Set {SCRIPT_ENV}=1 to read answers from stdin.",
        commands::config::USAGE
    )
}

pub fn run_cli(args: Vec<String>) -> Result<()> {
    match parse_args(&args)? {
        Invocation::Help => {
            output::line(usage());
            Ok(())
        }
        Invocation::Version => {
            output::line(build_info::current());
            Ok(())
        }
        Invocation::Config(rest) => {
            let manager = ConfigManager::from_env()?;
            commands::config::run(&manager, &rest)
        }
        Invocation::Quiz { endpoint } => {
            let manager = ConfigManager::from_env()?;
            let mut config = manager.load()?;
            config.apply_env_overrides();
            if let Some(endpoint) = endpoint {
                config.set_value("endpoint", &endpoint)?;
            }
            apply_output_preferences(&config);

            match CliMode::from_env() {
                CliMode::Interactive => run_session(&config, TerminalInteraction::new()),
                CliMode::Script => {
                    let stdin = io::stdin();
                    run_session(&config, ScriptInteraction::new(stdin.lock()))
                }
            }
        }
    }
}

fn apply_output_preferences(config: &Config) {
    if !config.ui_color_enabled || config.plain_output || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
    output::set_preferences(OutputPreferences {
        plain_mode: config.plain_output,
    });
}

fn run_session<I: QuizInteraction>(config: &Config, interaction: I) -> Result<()> {
    info!(endpoint = %config.endpoint, "starting quiz session");
    let client = HttpComputeClient::new(config.endpoint.clone(), config.timeout())?;
    let reports = ReportWriter::new(config.resolve_report_dir(), config.open_reports);
    debug!(dir = %reports.dir().display(), "report directory");

    let mut app = QuizApp::new(
        WizardController::new(),
        Box::new(client),
        interaction,
        NoticeBoard::new(config.notice_ttl()),
        reports,
        config.currency_symbol.clone(),
    );
    app.run()
}
