//! Update command - refresh a cached repository

use super::resolve_key;
use crate::cli::args::KeyArgs;
use crate::error::LensResult;
use crate::service::RepoService;
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the update command
pub async fn execute(args: KeyArgs, service: &RepoService) -> LensResult<()> {
    let key = resolve_key(&args.key)?;
    let before = service.get_info(&key).await?;

    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Updating {}...", before.full_name()));

    let result = match service.update(&key).await {
        Ok(result) => result,
        Err(e) => {
            spinner.stop_error("Update failed, previous snapshot kept");
            return Err(e);
        }
    };

    spinner.stop(&format!(
        "Updated {}@{}",
        result.info.full_name(),
        result.info.branch
    ));
    if before.branch != result.info.branch {
        ui::step_info(
            &ctx,
            &format!(
                "Default branch moved from {} to {}",
                before.branch, result.info.branch
            ),
        );
    }
    ui::key_value(&ctx, "files", &result.tree.file_count().to_string());
    ui::key_value(&ctx, "size", &ui::format_size(result.tree.total_size()));

    Ok(())
}
