//! Tree command - show the file tree of a cached repository

use super::resolve_key;
use crate::cli::args::{OutputFormat, TreeArgs};
use crate::error::LensResult;
use crate::service::RepoService;
use crate::tree::FileNode;
use crate::ui::format_size;
use std::fmt::Write;

/// Execute the tree command
pub async fn execute(args: TreeArgs, service: &RepoService) -> LensResult<()> {
    let key = resolve_key(&args.key)?;
    let tree = service.get_tree(&key).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
        OutputFormat::Plain => {
            let mut paths = Vec::new();
            collect_file_paths(&tree, &mut paths);
            for path in paths {
                println!("{}", path);
            }
        }
        OutputFormat::Table => {
            print!("{}", render_tree(&tree));
            println!();
            println!(
                "{} files, {}",
                tree.file_count(),
                format_size(tree.total_size())
            );
        }
    }

    Ok(())
}

/// Draw a tree with box-drawing connectors, files annotated with sizes
fn render_tree(root: &FileNode) -> String {
    let mut out = format!("{}/\n", root.name);
    render_children(root, "", &mut out);
    out
}

fn render_children(node: &FileNode, prefix: &str, out: &mut String) {
    let Some(children) = &node.children else {
        return;
    };

    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let connector = if last { "└── " } else { "├── " };

        if child.is_dir {
            let _ = writeln!(out, "{}{}{}/", prefix, connector, child.name);
            let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
            render_children(child, &nested, out);
        } else {
            let size = format_size(child.size.unwrap_or(0));
            let _ = writeln!(out, "{}{}{} ({})", prefix, connector, child.name, size);
        }
    }
}

fn collect_file_paths(node: &FileNode, out: &mut Vec<String>) {
    match &node.children {
        Some(children) => children.iter().for_each(|c| collect_file_paths(c, out)),
        None => out.push(node.path.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileNode {
        let mut src = FileNode::dir("src", "src");
        src.children = Some(vec![
            FileNode::file("lib.rs", "src/lib.rs", 10),
            FileNode::file("main.rs", "src/main.rs", 2048),
        ]);
        let mut root = FileNode::dir("hello", "");
        root.children = Some(vec![src, FileNode::file("README.md", "README.md", 5)]);
        root
    }

    #[test]
    fn renders_connectors() {
        let expected = "\
hello/
├── src/
│   ├── lib.rs (10 B)
│   └── main.rs (2.0 KiB)
└── README.md (5 B)
";
        assert_eq!(render_tree(&sample()), expected);
    }

    #[test]
    fn plain_lists_file_paths_in_tree_order() {
        let mut paths = Vec::new();
        collect_file_paths(&sample(), &mut paths);
        assert_eq!(paths, vec!["src/lib.rs", "src/main.rs", "README.md"]);
    }

    #[test]
    fn empty_repository() {
        assert_eq!(render_tree(&FileNode::dir("empty", "")), "empty/\n");
    }
}
