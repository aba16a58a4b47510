//! Grammar file discovery.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Grammar file name; the capture is the output stem.
static GRAMMAR_FILE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(.+?)\.bnf$").unwrap());

/// A grammar file found directly inside the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GrammarFile {
    /// `source_dir` joined with the file name.
    pub path: PathBuf,
    /// File name without the `.bnf` suffix.
    pub stem: String,
}

/// List grammar files in `source_dir`, sorted by file name.
///
/// Subdirectories are not descended into. Entries that are not regular files,
/// names that are not valid UTF-8 and names that do not end in `.bnf` are
/// ignored.
pub(crate) fn scan(source_dir: &Path) -> std::io::Result<Vec<GrammarFile>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(source_dir)? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        names.push(name);
    }
    names.sort();

    let files = names
        .into_iter()
        .filter_map(|name| {
            let stem = GRAMMAR_FILE_RE.captures(&name)?.get(1)?.as_str().to_owned();
            let path = source_dir.join(&name);
            path.is_file().then_some(GrammarFile { path, stem })
        })
        .collect();
    Ok(files)
}
