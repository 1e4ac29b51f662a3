//! Extension to language identifier lookup

use std::path::Path;

/// Identifier returned for anything not in the tables
pub const PLAIN_TEXT: &str = "plaintext";

/// Ordered extension table; the first row containing the extension wins
const EXTENSIONS: &[(&[&str], &str)] = &[
    (&["js", "mjs", "cjs", "jsx"], "javascript"),
    (&["ts", "mts", "cts", "tsx"], "typescript"),
    (&["py", "pyw", "pyi"], "python"),
    (&["rs"], "rust"),
    (&["go"], "go"),
    (&["java"], "java"),
    (&["kt", "kts"], "kotlin"),
    (&["scala", "sc"], "scala"),
    (&["c", "h"], "c"),
    (&["cpp", "cc", "cxx", "hpp", "hh", "hxx"], "cpp"),
    (&["cs"], "csharp"),
    (&["swift"], "swift"),
    (&["m", "mm"], "objective-c"),
    (&["rb"], "ruby"),
    (&["php"], "php"),
    (&["lua"], "lua"),
    (&["dart"], "dart"),
    (&["ex", "exs"], "elixir"),
    (&["erl", "hrl"], "erlang"),
    (&["hs"], "haskell"),
    (&["clj", "cljs", "edn"], "clojure"),
    (&["zig"], "zig"),
    (&["r"], "r"),
    (&["pl", "pm"], "perl"),
    (&["sh", "bash", "zsh"], "shell"),
    (&["ps1", "psm1"], "powershell"),
    (&["sql"], "sql"),
    (&["json", "jsonc"], "json"),
    (&["yaml", "yml"], "yaml"),
    (&["toml"], "toml"),
    (&["ini", "cfg"], "ini"),
    (&["xml", "xsd", "xsl"], "xml"),
    (&["html", "htm"], "html"),
    (&["css"], "css"),
    (&["scss", "sass"], "scss"),
    (&["less"], "less"),
    (&["vue"], "vue"),
    (&["svelte"], "svelte"),
    (&["md", "markdown"], "markdown"),
    (&["rst"], "restructuredtext"),
    (&["tex"], "latex"),
    (&["proto"], "protobuf"),
    (&["graphql", "gql"], "graphql"),
    (&["tf", "hcl"], "hcl"),
    (&["nix"], "nix"),
    (&["dockerfile"], "dockerfile"),
    (&["mk"], "makefile"),
    (&["diff", "patch"], "diff"),
];

/// Exact file names that carry no useful extension
const FILE_NAMES: &[(&str, &str)] = &[
    ("Dockerfile", "dockerfile"),
    ("Containerfile", "dockerfile"),
    ("Makefile", "makefile"),
    ("GNUmakefile", "makefile"),
    ("CMakeLists.txt", "cmake"),
    ("Gemfile", "ruby"),
    ("Rakefile", "ruby"),
    ("Jenkinsfile", "groovy"),
];

/// Classify a path by file name, then by lower-cased extension
pub fn detect_language(path: &str) -> &'static str {
    let path = Path::new(path);

    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if let Some((_, lang)) = FILE_NAMES.iter().find(|(file, _)| *file == name) {
            return lang;
        }
    }

    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return PLAIN_TEXT;
    };
    let ext = ext.to_ascii_lowercase();

    EXTENSIONS
        .iter()
        .find(|(exts, _)| exts.contains(&ext.as_str()))
        .map(|(_, lang)| *lang)
        .unwrap_or(PLAIN_TEXT)
}
