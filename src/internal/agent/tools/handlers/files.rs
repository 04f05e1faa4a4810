//! Workspace file tools: read, write, delete, list and search inside a
//! sandbox root.
//!
//! Every handler holds the same root and refuses paths that are relative or
//! escape it. Paths are normalized component-wise, so `..` segments cannot
//! sidestep the check.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use walkdir::WalkDir;

use crate::internal::agent::tools::{
    envelope::ToolResponse,
    error::{ToolError, ToolResult},
    handlers::parse_arguments,
    registry::ToolHandler,
    spec::{ToolParameters, ToolSpec},
};

/// Lines returned per read_file page.
const READ_PAGE_SIZE: usize = 200;
/// Cap on search hits, to keep responses bounded.
const MAX_SEARCH_RESULTS: usize = 100;

/// All file tools rooted at `root`, in advertisement order.
pub fn all(root: PathBuf) -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(ReadFileTool { root: root.clone() }) as Arc<dyn ToolHandler>,
        Arc::new(WriteFileTool { root: root.clone() }),
        Arc::new(DeleteFileTool { root: root.clone() }),
        Arc::new(ListDirTool { root: root.clone() }),
        Arc::new(SearchTextTool { root }),
    ]
}

/// Reject relative paths and paths escaping the sandbox root.
fn validate_path(path: &Path, root: &Path) -> ToolResult<()> {
    if !path.is_absolute() {
        return Err(ToolError::PathNotAbsolute(path.to_path_buf()));
    }
    if !is_sub_path(path, root) {
        return Err(ToolError::PathOutsideWorkspace(path.to_path_buf()));
    }
    Ok(())
}

/// Lexical containment check on normalized components; neither path needs
/// to exist.
fn is_sub_path(path: &Path, root: &Path) -> bool {
    let normalize = |p: &Path| {
        let mut parts: Vec<std::ffi::OsString> = Vec::new();
        for component in p.components() {
            match component {
                Component::ParentDir => {
                    parts.pop();
                }
                Component::CurDir => {}
                other => parts.push(other.as_os_str().to_os_string()),
            }
        }
        parts
    };
    let path = normalize(path);
    let root = normalize(root);
    path.len() >= root.len() && path[..root.len()] == root[..]
}

pub struct ReadFileTool {
    root: PathBuf,
}

#[derive(Deserialize)]
struct ReadFileParams {
    path: PathBuf,
    /// 1-based page over the file's lines; defaults to the first page.
    page: Option<usize>,
}

#[async_trait]
impl ToolHandler for ReadFileTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "read_file",
            "Read a text file, returning numbered lines one page at a time",
        )
        .with_parameters(ToolParameters::object(
            [
                ("path", "string", "Absolute path inside the workspace"),
                ("page", "integer", "1-based page of 200 lines (default: 1)"),
            ],
            [("path", true), ("page", false)],
        ))
    }

    async fn call(&self, arguments: Value) -> ToolResult<ToolResponse> {
        let params: ReadFileParams = parse_arguments(&arguments)?;
        validate_path(&params.path, &self.root)?;

        let contents = tokio::fs::read_to_string(&params.path).await?;
        let lines: Vec<&str> = contents.lines().collect();
        let total_pages = lines.len().div_ceil(READ_PAGE_SIZE).max(1);
        let page = params.page.unwrap_or(1).max(1);
        if page > total_pages {
            return Err(ToolError::InvalidArguments(format!(
                "page {page} out of range, file has {total_pages} page(s)"
            )));
        }

        let start = (page - 1) * READ_PAGE_SIZE;
        let mut out = String::new();
        for (offset, line) in lines.iter().skip(start).take(READ_PAGE_SIZE).enumerate() {
            out.push_str(&format!("{:>6}\t{}\n", start + offset + 1, line));
        }
        if total_pages > 1 {
            out.push_str(&format!("(page {page} of {total_pages})\n"));
        }
        Ok(ToolResponse::text(out))
    }
}

pub struct WriteFileTool {
    root: PathBuf,
}

#[derive(Deserialize)]
struct WriteFileParams {
    path: PathBuf,
    content: String,
}

#[async_trait]
impl ToolHandler for WriteFileTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "write_file",
            "Write a text file, creating parent directories as needed",
        )
        .with_parameters(ToolParameters::object(
            [
                ("path", "string", "Absolute path inside the workspace"),
                ("content", "string", "Full file content to write"),
            ],
            [("path", true), ("content", true)],
        ))
    }

    async fn call(&self, arguments: Value) -> ToolResult<ToolResponse> {
        let params: WriteFileParams = parse_arguments(&arguments)?;
        validate_path(&params.path, &self.root)?;

        if let Some(parent) = params.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&params.path, &params.content).await?;
        Ok(ToolResponse::text(format!(
            "wrote {} bytes to {}",
            params.content.len(),
            params.path.display()
        )))
    }
}

pub struct DeleteFileTool {
    root: PathBuf,
}

#[derive(Deserialize)]
struct DeleteFileParams {
    path: PathBuf,
}

#[async_trait]
impl ToolHandler for DeleteFileTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new("delete_file", "Delete a single file").with_parameters(
            ToolParameters::object(
                [("path", "string", "Absolute path inside the workspace")],
                [("path", true)],
            ),
        )
    }

    async fn call(&self, arguments: Value) -> ToolResult<ToolResponse> {
        let params: DeleteFileParams = parse_arguments(&arguments)?;
        validate_path(&params.path, &self.root)?;

        tokio::fs::remove_file(&params.path).await?;
        Ok(ToolResponse::text(format!(
            "deleted {}",
            params.path.display()
        )))
    }
}

pub struct ListDirTool {
    root: PathBuf,
}

#[derive(Deserialize)]
struct ListDirParams {
    path: PathBuf,
    /// Recurse into subdirectories; defaults to a single level.
    recursive: Option<bool>,
}

#[async_trait]
impl ToolHandler for ListDirTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "list_dir",
            "List directory entries, optionally recursive, directories marked with a trailing slash",
        )
        .with_parameters(ToolParameters::object(
            [
                ("path", "string", "Absolute path inside the workspace"),
                ("recursive", "boolean", "Recurse into subdirectories (default: false)"),
            ],
            [("path", true), ("recursive", false)],
        ))
    }

    async fn call(&self, arguments: Value) -> ToolResult<ToolResponse> {
        let params: ListDirParams = parse_arguments(&arguments)?;
        validate_path(&params.path, &self.root)?;

        let max_depth = if params.recursive.unwrap_or(false) {
            usize::MAX
        } else {
            1
        };

        // The walk is synchronous; run it off the cooperative executor so
        // the gateway timeout can preempt the dispatch.
        let path = params.path;
        let entries = tokio::task::spawn_blocking(move || scan_dir(&path, max_depth))
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))??;

        if entries.is_empty() {
            Ok(ToolResponse::text("(empty)"))
        } else {
            Ok(ToolResponse::text(entries.join("\n")))
        }
    }
}

fn scan_dir(path: &Path, max_depth: usize) -> ToolResult<Vec<String>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
        let mut name = relative.display().to_string();
        if entry.file_type().is_dir() {
            name.push('/');
        }
        entries.push(name);
    }
    Ok(entries)
}

pub struct SearchTextTool {
    root: PathBuf,
}

#[derive(Deserialize)]
struct SearchTextParams {
    query: String,
    path: PathBuf,
    /// Also match snake_case / camelCase / PascalCase / kebab-case /
    /// SCREAMING_SNAKE renderings of the query.
    naming_variants: Option<bool>,
}

#[async_trait]
impl ToolHandler for SearchTextTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "search_text",
            "Search files line by line for a regex, optionally matching common identifier naming variants of the query",
        )
        .with_parameters(ToolParameters::object(
            [
                ("query", "string", "Search pattern (regex)"),
                ("path", "string", "Absolute directory or file to search"),
                (
                    "naming_variants",
                    "boolean",
                    "Also match snake/camel/Pascal/kebab/SCREAMING variants (default: false)",
                ),
            ],
            [("query", true), ("path", true)],
        ))
    }

    async fn call(&self, arguments: Value) -> ToolResult<ToolResponse> {
        let params: SearchTextParams = parse_arguments(&arguments)?;
        validate_path(&params.path, &self.root)?;

        let pattern = if params.naming_variants.unwrap_or(false) {
            naming_variants(&params.query)
                .iter()
                .map(|v| regex::escape(v))
                .collect::<Vec<_>>()
                .join("|")
        } else {
            params.query.clone()
        };
        let regex =
            Regex::new(&pattern).map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        // Same story as list_dir: the scan never awaits, so it must leave
        // the cooperative executor to stay preemptible.
        let path = params.path;
        let hits = tokio::task::spawn_blocking(move || search_files(&path, &regex))
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))??;

        if hits.is_empty() {
            Ok(ToolResponse::text("no matches found"))
        } else {
            Ok(ToolResponse::text(hits.join("\n")))
        }
    }
}

fn search_files(path: &Path, regex: &Regex) -> ToolResult<Vec<String>> {
    let mut hits = Vec::new();
    'files: for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        // Binary and unreadable files are skipped, not errors.
        let Ok(contents) = std::fs::read_to_string(entry.path()) else {
            continue;
        };
        for (number, line) in contents.lines().enumerate() {
            if regex.is_match(line) {
                hits.push(format!("{}:{}:{}", entry.path().display(), number + 1, line));
                if hits.len() >= MAX_SEARCH_RESULTS {
                    break 'files;
                }
            }
        }
    }
    Ok(hits)
}

/// Render a query in the common identifier naming conventions.
///
/// The query is split into words on whitespace, `_`, `-` and lower→upper
/// case transitions, then re-joined as snake_case, camelCase, PascalCase,
/// kebab-case and SCREAMING_SNAKE_CASE. Duplicates are dropped, the literal
/// query always comes first.
fn naming_variants(query: &str) -> Vec<String> {
    let words = split_words(query);
    if words.is_empty() {
        return vec![query.to_string()];
    }

    let snake = words.join("_");
    let kebab = words.join("-");
    let screaming = words
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_");
    let pascal: String = words.iter().map(|w| capitalize(w)).collect();
    let camel = {
        let mut out = words[0].clone();
        for word in &words[1..] {
            out.push_str(&capitalize(word));
        }
        out
    };

    let mut variants = vec![query.to_string(), snake, camel, pascal, kebab, screaming];
    let mut seen = std::collections::HashSet::new();
    variants.retain(|v| seen.insert(v.clone()));
    variants
}

fn split_words(query: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for ch in query.chars() {
        if ch.is_whitespace() || ch == '_' || ch == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if ch.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.push(ch.to_ascii_lowercase());
        } else {
            current.push(ch.to_ascii_lowercase());
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
