pub mod prompts;
pub mod terminal;
pub mod test_mode;
