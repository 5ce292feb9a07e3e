//! Prints [`View`]s produced by the renderer.

use crate::cli::output;
use crate::render::{
    format_count, format_money, FailureView, Notice, NoticeKind, QuestionView, ResultView, View,
};

const BAR_WIDTH: usize = 30;

pub fn print_view(view: &View, currency_symbol: &str) {
    match view {
        View::Question(question) => print_question(question),
        View::Loading => output::info("Calculating emissions..."),
        View::Result(result) => print_result(result, currency_symbol),
        View::Failure(failure) => print_failure(failure),
    }
}

pub fn print_question(question: &QuestionView) {
    output::section(format!("Question {} of {}", question.step, question.total));
    output::prompt(question_line(question));
}

pub fn question_line(question: &QuestionView) -> String {
    if output::is_plain() {
        question.prompt.to_string()
    } else {
        format!("{} {}", question.icon, question.prompt)
    }
}

pub fn print_result(result: &ResultView, currency_symbol: &str) {
    output::section("Your carbon footprint");
    for line in result_lines(result, currency_symbol) {
        output::line(line);
    }
}

pub fn result_lines(result: &ResultView, currency_symbol: &str) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Total emissions: {} tonnes of CO₂e/year",
            result.total_tonnes
        ),
        format!("Trees needed to offset: {}", format_count(result.trees)),
    ];

    if !result.costs.is_empty() {
        lines.push(String::new());
        lines.push("Compensation costs:".to_string());
        for cost in &result.costs {
            lines.push(format!(
                "  {}: {}",
                cost.provider,
                format_money(currency_symbol, cost.amount)
            ));
        }
    }

    if !result.chart.is_empty() {
        lines.push(String::new());
        lines.push("Emission breakdown:".to_string());
        let width = result
            .chart
            .slices()
            .iter()
            .map(|slice| slice.label.chars().count())
            .max()
            .unwrap_or(0);
        for slice in result.chart.slices() {
            lines.push(format!(
                "  {:<width$} {} {:>5.1}%",
                slice.label,
                bar(slice.fraction, BAR_WIDTH),
                slice.percentage()
            ));
        }
    }
    lines
}

/// Proportional bar; any non-zero share gets at least one cell.
pub fn bar(fraction: f64, width: usize) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let mut filled = (fraction * width as f64).round() as usize;
    if filled == 0 && fraction > 0.0 {
        filled = 1;
    }
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn print_failure(failure: &FailureView) {
    output::section("Calculation failed");
    if !failure.retryable {
        output::line("Restart the quiz to try again with different answers.");
    }
}

pub fn print_notice(notice: &Notice) {
    match notice.kind {
        NoticeKind::Info => output::info(&notice.message),
        NoticeKind::Warning => output::warning(&notice.message),
        NoticeKind::Error => output::error(&notice.message),
    }
}
