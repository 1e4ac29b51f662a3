//! List command - show cached repositories

use crate::cache::RepoInfo;
use crate::cli::args::{ListArgs, OutputFormat};
use crate::error::LensResult;
use crate::service::RepoService;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, service: &RepoService) -> LensResult<()> {
    let repos = service.list().await?;

    if repos.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_info(&ctx, "No repositories cached");
                ui::remark(&ctx, "Import one with: repolens import owner/repo");
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&repos),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&repos)?),
        OutputFormat::Plain => {
            for repo in &repos {
                println!("{}", repo.key);
            }
        }
    }

    Ok(())
}

fn print_table(repos: &[RepoInfo]) {
    println!(
        "{:<32} {:<36} {:<16} {:<16}",
        style("KEY").bold(),
        style("REPOSITORY").bold(),
        style("BRANCH").bold(),
        style("LAST OPENED").bold()
    );
    println!("{}", "-".repeat(100));

    for repo in repos {
        let opened = repo
            .last_opened_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();

        println!(
            "{:<32} {:<36} {:<16} {:<16}",
            repo.key,
            repo.full_name(),
            repo.branch,
            style(opened).dim()
        );
    }

    println!();
    println!("{} repositor{}", repos.len(), if repos.len() == 1 { "y" } else { "ies" });
}
