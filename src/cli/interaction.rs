//! Input sources for the quiz loop: the interactive terminal and line-based
//! script input.

use std::io::{self, BufRead};

use crate::cli::output;
use crate::cli::ui::prompts::{self, TextPromptResult};
use crate::quiz::TransportMode;
use crate::render::{QuestionView, TransportOption};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerResponse {
    Value(String),
    Restart,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    Report,
    Restart,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    Retry,
    Restart,
    Quit,
}

/// Collects user decisions; the quiz loop owns rendering.
pub trait QuizInteraction {
    fn answer(&mut self, question: &QuestionView) -> io::Result<AnswerResponse>;

    /// `None` keeps the default mode.
    fn transport(&mut self, options: &[TransportOption]) -> io::Result<Option<TransportMode>>;

    fn after_result(&mut self) -> io::Result<ResultAction>;

    fn after_failure(&mut self, retryable: bool) -> io::Result<FailureAction>;
}

fn interpret_answer(raw: &str) -> AnswerResponse {
    match raw.trim().to_ascii_lowercase().as_str() {
        ":restart" | ":r" => AnswerResponse::Restart,
        ":quit" | ":q" => AnswerResponse::Quit,
        _ => AnswerResponse::Value(raw.trim().to_string()),
    }
}

fn failure_actions(retryable: bool) -> Vec<FailureAction> {
    if retryable {
        vec![
            FailureAction::Retry,
            FailureAction::Restart,
            FailureAction::Quit,
        ]
    } else {
        vec![FailureAction::Restart, FailureAction::Quit]
    }
}

/// Raw-mode text prompts and dialoguer menus.
#[derive(Debug, Default)]
pub struct TerminalInteraction;

impl TerminalInteraction {
    pub fn new() -> Self {
        Self
    }
}

impl QuizInteraction for TerminalInteraction {
    fn answer(&mut self, question: &QuestionView) -> io::Result<AnswerResponse> {
        match prompts::text_input(question.key)? {
            TextPromptResult::Value(value) => Ok(interpret_answer(&value)),
            TextPromptResult::Cancel => Ok(AnswerResponse::Quit),
        }
    }

    fn transport(&mut self, options: &[TransportOption]) -> io::Result<Option<TransportMode>> {
        let labels: Vec<String> = options.iter().map(TransportOption::display).collect();
        let default = options
            .iter()
            .position(|option| option.mode == TransportMode::default())
            .unwrap_or(0);
        let selection = prompts::select("Main means of transport", &labels, default)?;
        Ok(selection.and_then(|index| options.get(index).map(|option| option.mode)))
    }

    fn after_result(&mut self) -> io::Result<ResultAction> {
        let actions = [ResultAction::Report, ResultAction::Restart, ResultAction::Quit];
        let labels = vec![
            "📄 Generate report".to_string(),
            "🔁 Recalculate".to_string(),
            "🚪 Quit".to_string(),
        ];
        let selection = prompts::select("What next?", &labels, 0)?;
        Ok(selection
            .and_then(|index| actions.get(index).copied())
            .unwrap_or(ResultAction::Quit))
    }

    fn after_failure(&mut self, retryable: bool) -> io::Result<FailureAction> {
        let actions = failure_actions(retryable);
        let labels: Vec<String> = actions
            .iter()
            .map(|action| match action {
                FailureAction::Retry => "🔄 Try again".to_string(),
                FailureAction::Restart => "🔁 Recalculate".to_string(),
                FailureAction::Quit => "🚪 Quit".to_string(),
            })
            .collect();
        let selection = prompts::select("What next?", &labels, 0)?;
        Ok(selection
            .and_then(|index| actions.get(index).copied())
            .unwrap_or(FailureAction::Quit))
    }
}

/// Reads answers and actions line by line. End of input quits.
pub struct ScriptInteraction<R> {
    reader: R,
}

impl<R: BufRead> ScriptInteraction<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead> QuizInteraction for ScriptInteraction<R> {
    fn answer(&mut self, _question: &QuestionView) -> io::Result<AnswerResponse> {
        Ok(match self.next_line()? {
            Some(line) => interpret_answer(&line),
            None => AnswerResponse::Quit,
        })
    }

    fn transport(&mut self, _options: &[TransportOption]) -> io::Result<Option<TransportMode>> {
        while let Some(line) = self.next_line()? {
            if line.is_empty() {
                return Ok(None);
            }
            match line.parse::<TransportMode>() {
                Ok(mode) => return Ok(Some(mode)),
                Err(err) => output::warning(err),
            }
        }
        Ok(None)
    }

    fn after_result(&mut self) -> io::Result<ResultAction> {
        while let Some(line) = self.next_line()? {
            match line.to_ascii_lowercase().as_str() {
                "report" => return Ok(ResultAction::Report),
                "restart" | "recalculate" => return Ok(ResultAction::Restart),
                "quit" | "exit" => return Ok(ResultAction::Quit),
                "" => continue,
                other => output::warning(format!(
                    "Unknown action `{other}`. Expected report, restart or quit."
                )),
            }
        }
        Ok(ResultAction::Quit)
    }

    fn after_failure(&mut self, retryable: bool) -> io::Result<FailureAction> {
        while let Some(line) = self.next_line()? {
            match line.to_ascii_lowercase().as_str() {
                "retry" if retryable => return Ok(FailureAction::Retry),
                "retry" => output::warning("This calculation cannot be retried; restart instead."),
                "restart" | "recalculate" => return Ok(FailureAction::Restart),
                "quit" | "exit" => return Ok(FailureAction::Quit),
                "" => continue,
                other => output::warning(format!(
                    "Unknown action `{other}`. Expected retry, restart or quit."
                )),
            }
        }
        Ok(FailureAction::Quit)
    }
}
