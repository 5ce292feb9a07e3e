use crate::cli::output;
use crate::config::{ConfigManager, CONFIG_KEYS};
use crate::errors::{QuizError, Result};

pub const USAGE: &str = "config [show|set <key> <value>|path]";

pub fn run(manager: &ConfigManager, args: &[String]) -> Result<()> {
    let Some(sub) = args.first() else {
        return show(manager);
    };

    match sub.to_ascii_lowercase().as_str() {
        "show" => show(manager),
        "set" => {
            if args.len() < 3 {
                return Err(QuizError::Usage(format!(
                    "usage: config set <{}> <value>",
                    CONFIG_KEYS.join("|")
                )));
            }
            let key = args[1].as_str();
            let value = args[2..].join(" ");
            let mut config = manager.load()?;
            config.set_value(key, &value)?;
            manager.save(&config)?;
            output::success(format!("{key} updated."));
            Ok(())
        }
        "path" => {
            output::line(manager.config_path().display());
            Ok(())
        }
        other => Err(QuizError::Usage(format!(
            "unknown config command `{other}`; usage: {USAGE}"
        ))),
    }
}

fn show(manager: &ConfigManager) -> Result<()> {
    let config = manager.load()?;
    output::section("Configuration");
    for (key, value) in config.entries() {
        output::line(format!("  {key:<18} {value}"));
    }
    Ok(())
}
