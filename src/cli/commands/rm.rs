//! Rm command - remove a repository from the cache

use super::resolve_key;
use crate::cli::args::RmArgs;
use crate::error::{LensError, LensResult};
use crate::service::RepoService;
use crate::ui::{self, UiContext};

/// Execute the rm command
pub async fn execute(args: RmArgs, service: &RepoService) -> LensResult<()> {
    let key = resolve_key(&args.key)?;
    let ctx = UiContext::detect().with_auto_yes(args.yes);

    let label = match service.get_info(&key).await {
        Ok(info) => format!("{} ({})", info.full_name(), key),
        // Unreadable metadata must not make an entry impossible to remove
        Err(_) if service.store().entry_dir(&key).exists() => key.to_string(),
        Err(LensError::NotCached(_)) => {
            ui::step_info(&ctx, &format!("{} is not cached", key));
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let confirmed = ui::confirm(&ctx, &format!("Remove {} from the cache?", label), false).await?;
    if !confirmed {
        ui::step_warn_hint(&ctx, "Nothing removed", "Pass --yes to skip confirmation");
        return Ok(());
    }

    service.delete(&key).await?;
    ui::step_ok(&ctx, &format!("Removed {}", label));
    Ok(())
}
