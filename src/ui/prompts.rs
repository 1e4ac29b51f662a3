//! Interactive prompts with CI/non-interactive fallback

use super::context::UiContext;
use crate::error::{LensError, LensResult};

/// Prompt for confirmation; returns `default` when there is no terminal
/// to ask on, and `true` under `--yes`
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> LensResult<bool> {
    if ctx.auto_yes() {
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    // cliclack blocks on stdin
    let message = message.to_string();
    let answer = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message)
            .initial_value(default)
            .interact()
    })
    .await
    .map_err(|e| LensError::User(format!("Prompt task failed: {}", e)))?;

    answer.map_err(|e| LensError::User(format!("Prompt failed: {}", e)))
}
