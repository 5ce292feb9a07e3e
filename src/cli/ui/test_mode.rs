//! Scripted replacements for terminal prompts.
//!
//! `CARBON_QUIZ_TEST_INPUTS` holds `|`-separated text answers and
//! `CARBON_QUIZ_TEST_CHOICES` holds `|`-separated menu indexes. Either can be
//! installed programmatically for tests.

use once_cell::sync::Lazy;
use std::{collections::VecDeque, env, sync::Mutex};

pub const TEXT_INPUTS_ENV: &str = "CARBON_QUIZ_TEST_INPUTS";
pub const CHOICES_ENV: &str = "CARBON_QUIZ_TEST_CHOICES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextTestInput {
    Value(String),
    Cancel,
}

/// `None` stands for a dismissed menu.
pub type ChoiceTestInput = Option<usize>;

struct Queue<T> {
    enabled: bool,
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    fn from_env(var: &str, parse: fn(&str) -> Option<T>) -> Self {
        match env::var(var) {
            Ok(raw) => Self {
                enabled: true,
                items: parse_sequence(&raw, parse),
            },
            Err(_) => Self::new(),
        }
    }

    fn new() -> Self {
        Self {
            enabled: false,
            items: VecDeque::new(),
        }
    }
}

static TEXT_INPUTS: Lazy<Mutex<Queue<TextTestInput>>> =
    Lazy::new(|| Mutex::new(Queue::from_env(TEXT_INPUTS_ENV, parse_text_input)));

static CHOICES: Lazy<Mutex<Queue<ChoiceTestInput>>> =
    Lazy::new(|| Mutex::new(Queue::from_env(CHOICES_ENV, parse_choice)));

pub fn next_text_input(label: &str) -> Option<TextTestInput> {
    let mut guard = TEXT_INPUTS.lock().expect("text input queue poisoned");
    if !guard.enabled {
        return None;
    }
    Some(
        guard
            .items
            .pop_front()
            .unwrap_or_else(|| panic!("Text inputs exhausted before prompt `{label}`")),
    )
}

pub fn next_choice(label: &str) -> Option<ChoiceTestInput> {
    let mut guard = CHOICES.lock().expect("choice queue poisoned");
    if !guard.enabled {
        return None;
    }
    Some(
        guard
            .items
            .pop_front()
            .unwrap_or_else(|| panic!("Choices exhausted before menu `{label}`")),
    )
}

fn parse_text_input(token: &str) -> Option<TextTestInput> {
    Some(match token.to_ascii_uppercase().as_str() {
        "<ESC>" | "<CANCEL>" => TextTestInput::Cancel,
        "<BLANK>" | "<EMPTY>" => TextTestInput::Value(String::new()),
        _ => TextTestInput::Value(token.to_string()),
    })
}

fn parse_choice(token: &str) -> Option<ChoiceTestInput> {
    match token.to_ascii_uppercase().as_str() {
        "ESC" | "<ESC>" => Some(None),
        other => other.parse::<usize>().ok().map(Some),
    }
}

fn parse_sequence<T>(raw: &str, parse: fn(&str) -> Option<T>) -> VecDeque<T> {
    raw.split('|')
        .filter_map(|segment| {
            let trimmed = segment.trim();
            if trimmed.is_empty() {
                None
            } else {
                parse(trimmed)
            }
        })
        .collect()
}

pub fn install_text_inputs(inputs: Vec<TextTestInput>) {
    let mut guard = TEXT_INPUTS.lock().expect("text input queue poisoned");
    guard.enabled = true;
    guard.items = inputs.into();
}

pub fn reset_text_inputs() {
    let mut guard = TEXT_INPUTS.lock().expect("text input queue poisoned");
    guard.enabled = false;
    guard.items.clear();
}

pub fn install_choices(choices: Vec<ChoiceTestInput>) {
    let mut guard = CHOICES.lock().expect("choice queue poisoned");
    guard.enabled = true;
    guard.items = choices.into();
}

pub fn reset_choices() {
    let mut guard = CHOICES.lock().expect("choice queue poisoned");
    guard.enabled = false;
    guard.items.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_tokens_are_parsed() {
        let parsed = parse_sequence("100| <blank> |<ESC>|:restart", parse_text_input);
        assert_eq!(
            parsed,
            VecDeque::from(vec![
                TextTestInput::Value("100".into()),
                TextTestInput::Value(String::new()),
                TextTestInput::Cancel,
                TextTestInput::Value(":restart".into()),
            ])
        );
    }

    #[test]
    fn choice_tokens_skip_garbage() {
        let parsed = parse_sequence("0|esc|x|2", parse_choice);
        assert_eq!(parsed, VecDeque::from(vec![Some(0), None, Some(2)]));
    }
}
