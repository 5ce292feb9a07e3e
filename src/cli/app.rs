use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::cli::interaction::{AnswerResponse, FailureAction, QuizInteraction, ResultAction};
use crate::cli::output;
use crate::cli::ui::terminal;
use crate::compute::ComputeClient;
use crate::errors::{QuizError, Result};
use crate::quiz::{parse_answer, WizardController};
use crate::render::{render, Notice, NoticeBoard, NoticeKind, QuestionView, View};
use crate::report::{ReportOptions, ReportWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Exit,
}

/// Drives one quiz session: prompts, the compute call, and follow-up actions.
pub struct QuizApp<I> {
    controller: WizardController,
    client: Box<dyn ComputeClient>,
    interaction: I,
    notices: NoticeBoard,
    reports: ReportWriter,
    currency_symbol: String,
    last_report: Option<PathBuf>,
}

impl<I: QuizInteraction> QuizApp<I> {
    pub fn new(
        controller: WizardController,
        client: Box<dyn ComputeClient>,
        interaction: I,
        notices: NoticeBoard,
        reports: ReportWriter,
        currency_symbol: impl Into<String>,
    ) -> Self {
        Self {
            controller,
            client,
            interaction,
            notices,
            reports,
            currency_symbol: currency_symbol.into(),
            last_report: None,
        }
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn last_report(&self) -> Option<&Path> {
        self.last_report.as_deref()
    }

    /// Runs until the user quits or input ends.
    pub fn run(&mut self) -> Result<()> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        output::section("Carbon footprint quiz");
        output::line("Answer each question; type :restart to start over or :quit to leave.");

        loop {
            for notice in self.visible_notices(Instant::now()) {
                terminal::print_notice(&notice);
            }
            let view = render(&self.controller);
            let control = match &view {
                View::Question(question) => {
                    terminal::print_question(question);
                    self.handle_answer(question)?
                }
                View::Loading => {
                    terminal::print_view(&view, &self.currency_symbol);
                    self.compute(&runtime)?;
                    LoopControl::Continue
                }
                View::Result(result) => {
                    terminal::print_result(result, &self.currency_symbol);
                    self.handle_result_action()?
                }
                View::Failure(failure) => {
                    terminal::print_failure(failure);
                    match self.interaction.after_failure(failure.retryable)? {
                        FailureAction::Retry if failure.retryable => {
                            terminal::print_view(&View::Loading, &self.currency_symbol);
                            self.compute(&runtime)?;
                            LoopControl::Continue
                        }
                        FailureAction::Retry | FailureAction::Restart => {
                            self.restart();
                            LoopControl::Continue
                        }
                        FailureAction::Quit => LoopControl::Exit,
                    }
                }
            };
            if control == LoopControl::Exit {
                output::info("Goodbye!");
                return Ok(());
            }
        }
    }

    fn handle_answer(&mut self, question: &QuestionView) -> Result<LoopControl> {
        let raw = match self.interaction.answer(question)? {
            AnswerResponse::Quit => return Ok(LoopControl::Exit),
            AnswerResponse::Restart => {
                self.restart();
                return Ok(LoopControl::Continue);
            }
            AnswerResponse::Value(raw) => raw,
        };

        // Validate before asking for the transport so a bad number is
        // reported straight away.
        if let Err(err) = parse_answer(&raw) {
            self.notify(NoticeKind::Warning, err.to_string());
            return Ok(LoopControl::Continue);
        }
        let transport = match &question.transport_options {
            Some(options) => self.interaction.transport(options)?,
            None => None,
        };

        match self.controller.submit(&raw, transport) {
            Ok(submitted) => debug!(key = submitted.key, stored = submitted.stored, "stored answer"),
            Err(err) => self.notify(NoticeKind::Warning, err.to_string()),
        }
        Ok(LoopControl::Continue)
    }

    fn handle_result_action(&mut self) -> Result<LoopControl> {
        match self.interaction.after_result()? {
            ResultAction::Report => {
                self.write_report();
                Ok(LoopControl::Continue)
            }
            ResultAction::Restart => {
                self.restart();
                Ok(LoopControl::Continue)
            }
            ResultAction::Quit => Ok(LoopControl::Exit),
        }
    }

    fn compute(&mut self, runtime: &Runtime) -> Result<()> {
        match runtime.block_on(self.controller.submit_answers(self.client.as_ref())) {
            Ok(()) => Ok(()),
            Err(QuizError::Compute(_)) => {
                if let View::Failure(failure) = render(&self.controller) {
                    self.notify(NoticeKind::Error, failure.message);
                }
                Ok(())
            }
            Err(err @ (QuizError::Halted | QuizError::AlreadyComplete | QuizError::Incomplete)) => {
                self.notify(NoticeKind::Warning, err.to_string());
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn write_report(&mut self) {
        let Some(result) = self.controller.result() else {
            return;
        };
        match self
            .reports
            .write(result, &ReportOptions::new(self.currency_symbol.clone()))
        {
            Ok(path) => {
                output::success(format!("Report saved to {}", path.display()));
                self.last_report = Some(path);
            }
            Err(err) => self.notify(NoticeKind::Error, err.to_string()),
        }
    }

    fn restart(&mut self) {
        self.controller.reset();
        self.notices.clear();
        output::info("Starting over.");
    }

    /// Queued notices are shown above every view until their time runs out.
    fn notify(&mut self, kind: NoticeKind, message: String) {
        self.notices.push(kind, message);
    }

    fn visible_notices(&mut self, now: Instant) -> Vec<Notice> {
        self.notices.active(now)
    }
}
