//! Info command - show metadata of one cached repository

use super::resolve_key;
use crate::cli::args::{InfoArgs, OutputFormat};
use crate::error::LensResult;
use crate::service::RepoService;
use crate::ui::{self, UiContext};

/// Execute the info command
pub async fn execute(args: InfoArgs, service: &RepoService) -> LensResult<()> {
    let key = resolve_key(&args.key)?;
    let info = service.get_info(&key).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        OutputFormat::Plain => {
            println!("{}\t{}\t{}", info.key, info.full_name(), info.branch);
        }
        OutputFormat::Table => {
            let tree = service.get_tree(&key).await?;
            let path = service.resolve_path(&key).await?;
            let local = |t: chrono::DateTime<chrono::Utc>| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            };

            let ctx = UiContext::detect();
            ui::intro(&ctx, &info.full_name());
            ui::key_value(&ctx, "key", info.key.as_str());
            ui::key_value(&ctx, "branch", &info.branch);
            ui::key_value(&ctx, "url", &info.canonical_url);
            ui::key_value(&ctx, "imported", &local(info.imported_at));
            ui::key_value(&ctx, "opened", &local(info.last_opened_at));
            ui::key_value(&ctx, "files", &tree.file_count().to_string());
            ui::key_value(&ctx, "size", &ui::format_size(tree.total_size()));
            ui::key_value(&ctx, "path", &path.display().to_string());
        }
    }

    Ok(())
}
