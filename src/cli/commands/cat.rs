//! Cat command - print one file of a cached repository

use super::resolve_key;
use crate::cli::args::CatArgs;
use crate::content::FileContent;
use crate::error::LensResult;
use crate::service::RepoService;
use console::style;
use std::io::Write;

/// Execute the cat command
pub async fn execute(args: CatArgs, service: &RepoService) -> LensResult<()> {
    let key = resolve_key(&args.key)?;
    let content = service.read(&key, &args.path).await?;
    service.touch(&key).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&content)?);
        return Ok(());
    }

    if content.is_binary {
        eprintln!(
            "{} {} is a binary file, not shown",
            style("Note:").yellow(),
            args.path
        );
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    // A closed pipe (e.g. `| head`) is not an error worth reporting
    if stdout.write_all(content.content.as_bytes()).is_err() {
        return Ok(());
    }
    if !content.content.is_empty() && !content.content.ends_with('\n') {
        let _ = writeln!(stdout);
    }
    drop(stdout);

    if let Some(note) = truncation_note(&content) {
        eprintln!("{} {}", style("Note:").yellow(), note);
    }

    Ok(())
}

fn truncation_note(content: &FileContent) -> Option<String> {
    if !content.truncated {
        return None;
    }

    let shown = content.content.lines().count();
    Some(match content.total_lines {
        Some(total) => format!("truncated, showing {} of {} lines", shown, total),
        None => format!("truncated, showing {} lines", shown),
    })
}
