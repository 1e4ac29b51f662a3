//! Import command - fetch a repository snapshot into the cache

use crate::cli::args::ImportArgs;
use crate::error::LensResult;
use crate::service::RepoService;
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the import command
pub async fn execute(args: ImportArgs, service: &RepoService) -> LensResult<()> {
    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!(
        "Importing {} from {}...",
        args.reference,
        service.host_name()
    ));

    let result = match service.import(&args.reference).await {
        Ok(result) => result,
        Err(e) => {
            spinner.stop_error("Import failed");
            return Err(e);
        }
    };

    spinner.stop(&format!(
        "Imported {}@{}",
        result.info.full_name(),
        result.info.branch
    ));
    ui::key_value(&ctx, "key", result.key.as_str());
    ui::key_value(&ctx, "files", &result.tree.file_count().to_string());
    ui::key_value(&ctx, "size", &ui::format_size(result.tree.total_size()));
    ui::remark(&ctx, &format!("Browse with: repolens tree {}", result.key));

    Ok(())
}
