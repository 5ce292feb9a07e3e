use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{self, ClearType},
    ExecutableCommand,
};
use dialoguer::{theme::ColorfulTheme, Select};

use crate::cli::ui::test_mode::{self, TextTestInput};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextPromptResult {
    Value(String),
    Cancel,
}

/// Reads one line in raw mode. Esc and Ctrl-C cancel; Ctrl-U clears.
pub fn text_input(label: &str) -> io::Result<TextPromptResult> {
    if let Some(scripted) = test_mode::next_text_input(label) {
        return Ok(match scripted {
            TextTestInput::Value(value) => TextPromptResult::Value(value),
            TextTestInput::Cancel => TextPromptResult::Cancel,
        });
    }

    let mut guard = RawModeGuard::activate()?;
    let mut stdout = io::stdout();
    redraw_input(&mut stdout, "")?;
    let mut buffer = String::new();

    loop {
        let event = event::read()?;
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    match key.code {
                        KeyCode::Char('c') | KeyCode::Char('C') => {
                            guard.deactivate();
                            println!();
                            return Ok(TextPromptResult::Cancel);
                        }
                        KeyCode::Char('u') | KeyCode::Char('U') => {
                            buffer.clear();
                            redraw_input(&mut stdout, &buffer)?;
                            continue;
                        }
                        _ => {}
                    }
                }

                match key.code {
                    KeyCode::Esc => {
                        guard.deactivate();
                        println!();
                        return Ok(TextPromptResult::Cancel);
                    }
                    KeyCode::Enter => {
                        guard.deactivate();
                        println!();
                        return Ok(TextPromptResult::Value(buffer.trim().to_string()));
                    }
                    KeyCode::Backspace => {
                        buffer.pop();
                        redraw_input(&mut stdout, &buffer)?;
                    }
                    KeyCode::Char(ch) => {
                        buffer.push(ch);
                        redraw_input(&mut stdout, &buffer)?;
                    }
                    _ => {}
                }
            }
            _ => continue,
        }
    }
}

/// Single-choice menu. Returns `None` when dismissed with Esc or `q`.
pub fn select(label: &str, options: &[String], default: usize) -> io::Result<Option<usize>> {
    if let Some(scripted) = test_mode::next_choice(label) {
        return Ok(scripted.filter(|index| *index < options.len()));
    }
    if options.is_empty() {
        return Ok(None);
    }

    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .items(options)
        .default(default.min(options.len() - 1))
        .interact_opt()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
}

fn redraw_input(stdout: &mut Stdout, buffer: &str) -> io::Result<()> {
    stdout.execute(cursor::MoveToColumn(0))?;
    stdout.execute(terminal::Clear(ClearType::CurrentLine))?;
    write!(stdout, "> {buffer}")?;
    stdout.flush()
}

struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    fn activate() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { active: true })
    }

    fn deactivate(&mut self) {
        if self.active {
            let _ = terminal::disable_raw_mode();
            self.active = false;
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.deactivate();
    }
}
