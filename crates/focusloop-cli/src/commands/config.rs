use clap::Subcommand;
use focusloop_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dotted key (e.g. "clock.auto_start")
    Get { key: String },
    /// Change one value and write the file
    Set { key: String, value: String },
    /// Print the whole configuration
    List {
        /// Print the file as TOML instead of JSON
        #[arg(long)]
        toml: bool,
    },
    /// Print where the configuration file lives
    Path,
    /// Overwrite the file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
            if key.starts_with("defaults.") {
                eprintln!(
                    "note: defaults only apply until settings are saved; \
                     use `focusloop settings set` to change the active values"
                );
            }
        }
        ConfigAction::List { toml } => {
            let config = Config::load()?;
            if toml {
                print!("{}", std::fs::read_to_string(Config::path()?)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            let path = Config::path()?;
            Config::default().save_to(&path)?;
            println!("wrote defaults to {}", path.display());
        }
    }
    Ok(())
}
