//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{LensError, LensResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "general.data_dir",
    "github.token",
    "github.api_url",
    "github.archive_url",
    "github.user_agent",
    "network.connect_timeout_secs",
    "network.request_timeout_secs",
    "network.stall_timeout_secs",
    "network.download_timeout_secs",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, manager: &ConfigManager, config: &Config) -> LensResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, config, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> LensResult<()> {
    println!("{}", toml::to_string_pretty(&redacted(config))?);
    Ok(())
}

/// Copy of `config` safe to print
fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.github.token.is_some() {
        shown.github.token = Some("<redacted>".to_string());
    }
    shown
}

async fn init_config(manager: &ConfigManager, force: bool) -> LensResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());

    Ok(())
}

async fn set_value(manager: &ConfigManager, config: &Config, key: &str, value: &str) -> LensResult<()> {
    let ctx = UiContext::detect();
    let mut config = config.clone();

    if let Err(e) = apply(&mut config, key, value) {
        ui::step_error_detail(&ctx, "Cannot set config value", &e.to_string());
        ui::remark(&ctx, &format!("Valid keys: {}", VALID_KEYS.join(", ")));
        return Err(e);
    }

    manager.save(&config).await?;
    let shown = if key == "github.token" { "<redacted>" } else { value };
    ui::step_ok(&ctx, &format!("Set {} = {}", key, shown));

    Ok(())
}

/// Apply one dot-separated `key = value` assignment
fn apply(config: &mut Config, key: &str, value: &str) -> LensResult<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());

    match parts.as_slice() {
        ["general", "log_format"] => {
            if !matches!(value, "text" | "json") {
                return Err(LensError::User(format!(
                    "Invalid log format: {}. Use text or json",
                    value
                )));
            }
            config.general.log_format = value.to_string();
        }
        ["general", "data_dir"] => config.general.data_dir = optional(value).map(PathBuf::from),

        ["github", "token"] => config.github.token = optional(value),
        ["github", "api_url"] => config.github.api_url = parse_url(value)?,
        ["github", "archive_url"] => config.github.archive_url = parse_url(value)?,
        ["github", "user_agent"] => config.github.user_agent = value.to_string(),

        ["network", "connect_timeout_secs"] => config.network.connect_timeout_secs = parse_secs(value)?,
        ["network", "request_timeout_secs"] => config.network.request_timeout_secs = parse_secs(value)?,
        ["network", "stall_timeout_secs"] => config.network.stall_timeout_secs = parse_secs(value)?,
        ["network", "download_timeout_secs"] => {
            config.network.download_timeout_secs = parse_secs(value)?
        }

        _ => return Err(LensError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

fn parse_url(value: &str) -> LensResult<String> {
    reqwest::Url::parse(value)
        .map(|_| value.trim_end_matches('/').to_string())
        .map_err(|e| LensError::User(format!("Invalid URL {}: {}", value, e)))
}

fn parse_secs(value: &str) -> LensResult<u64> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(LensError::User(format!(
            "Invalid timeout: {}. Use a positive number of seconds",
            value
        ))),
    }
}
