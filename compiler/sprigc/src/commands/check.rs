//! The `check` command: parse many files in parallel and report failures.

use rayon::prelude::*;
use sprig_ir::NodeArena;
use sprig_lexer_core::SourceBuffer;
use tracing::debug;

use super::{describe_error, try_read_file};

/// Outcome of checking one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReport {
    pub path: String,
    /// Nodes allocated by a successful parse.
    pub nodes: usize,
    pub error: Option<String>,
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Parse `text` with its own buffer and arena.
pub fn check_source(path: &str, text: &str) -> FileReport {
    let source = SourceBuffer::new(text);
    let mut arena = NodeArena::new();
    let error = sprig_parse::parse(&mut arena, &source)
        .err()
        .map(|err| describe_error(&source, &err));
    FileReport {
        path: path.to_string(),
        nodes: if error.is_none() { arena.len() } else { 0 },
        error,
    }
}

/// Check every path, in parallel, keeping the input order.
pub fn check_files(paths: &[String]) -> Vec<FileReport> {
    paths
        .par_iter()
        .map(|path| match try_read_file(path) {
            Ok(text) => check_source(path, &text),
            Err(msg) => FileReport {
                path: path.clone(),
                nodes: 0,
                error: Some(msg),
            },
        })
        .collect()
}

/// Check files, print failures and a summary, exit non-zero on any failure.
pub fn run_check(paths: &[String]) {
    let reports = check_files(paths);
    let failed = reports.iter().filter(|report| !report.is_ok()).count();
    for report in &reports {
        match &report.error {
            Some(msg) => eprintln!("{}: {msg}", report.path),
            None => debug!(path = %report.path, nodes = report.nodes, "ok"),
        }
    }
    println!(
        "checked {} file(s): {} ok, {failed} failed",
        reports.len(),
        reports.len() - failed
    );
    if failed > 0 {
        std::process::exit(1);
    }
}
