//! Pure view model: `render` maps the wizard state to a [`View`] that a
//! front end (the terminal adapter, the HTML report) turns into output.

pub mod chart;
pub mod notice;

use crate::compute::EmissionResult;
use crate::quiz::{TransportMode, WizardController, WizardState};

pub use chart::{PieChart, Slice};
pub use notice::{Notice, NoticeBoard, NoticeKind};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Question(QuestionView),
    /// Answers are complete and the compute call is pending.
    Loading,
    Result(ResultView),
    Failure(FailureView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub icon: &'static str,
    pub prompt: &'static str,
    pub key: &'static str,
    /// 1-based position of the question.
    pub step: usize,
    pub total: usize,
    pub annualized: bool,
    /// Present only for the distance question.
    pub transport_options: Option<Vec<TransportOption>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOption {
    pub mode: TransportMode,
    pub label: &'static str,
    pub icon: &'static str,
}

impl TransportOption {
    pub fn all() -> Vec<TransportOption> {
        TransportMode::ALL
            .iter()
            .map(|mode| TransportOption {
                mode: *mode,
                label: mode.label(),
                icon: mode.icon(),
            })
            .collect()
    }

    pub fn display(&self) -> String {
        format!("{} {}", self.icon, self.label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub total_tonnes: f64,
    pub trees: f64,
    pub costs: Vec<CostLine>,
    pub chart: PieChart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostLine {
    pub provider: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailureView {
    pub message: String,
    pub retryable: bool,
}

/// Maps the controller's current state to the view to display.
pub fn render(controller: &WizardController) -> View {
    match controller.state() {
        WizardState::Asking(index) => {
            let total = controller.questions().len();
            match controller.questions().get(*index) {
                Some(question) => View::Question(QuestionView {
                    icon: question.icon,
                    prompt: question.prompt,
                    key: question.key,
                    step: index + 1,
                    total,
                    annualized: question.annualize,
                    transport_options: question.is_distance().then(TransportOption::all),
                }),
                None => View::Loading,
            }
        }
        WizardState::Submitting => View::Loading,
        WizardState::Done(result) => View::Result(result_view(result)),
        WizardState::Failed(err) => View::Failure(FailureView {
            message: if err.is_retryable() {
                format!("A problem occurred while calculating. Try again. Details: {err}")
            } else {
                err.to_string()
            },
            retryable: err.is_retryable(),
        }),
    }
}

pub fn result_view(result: &EmissionResult) -> ResultView {
    ResultView {
        total_tonnes: result.total_tonnes,
        trees: result.trees,
        costs: result
            .compensation
            .iter()
            .map(|(provider, amount)| CostLine {
                provider: provider.to_string(),
                amount,
            })
            .collect(),
        chart: PieChart::from_amounts(&result.categories),
    }
}

/// Formats a price with the currency symbol and two decimals.
pub fn format_money(symbol: &str, amount: f64) -> String {
    format!("{symbol} {amount:.2}")
}

/// Formats a count without decimals when it is whole.
pub fn format_count(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
