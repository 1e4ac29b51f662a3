//! Path command - print where a cached repository lives on disk

use super::resolve_key;
use crate::cli::args::KeyArgs;
use crate::error::LensResult;
use crate::service::RepoService;

/// Execute the path command
pub async fn execute(args: KeyArgs, service: &RepoService) -> LensResult<()> {
    let key = resolve_key(&args.key)?;
    let path = service.resolve_path(&key).await?;
    println!("{}", path.display());
    Ok(())
}
