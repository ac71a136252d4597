//! GET /repository/{id}/dependencies?language=&file_path=&depth=1
//!
//! The dependency graph is built from per-language import statement regexes
//! rather than a resolved build graph (no language's build system is
//! available here) — an edge's `to` is resolved against the repository's own
//! file tree when the import looks relative/local, and left as the literal
//! import text otherwise. `depth` bounds how many import hops are followed
//! from the seed file(s).

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use regex::Regex;
use repo_core::RepoHandle;
use serde::{Deserialize, Serialize};

use crate::core::app_state::AppState;
use crate::error_handler::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct DependenciesParams {
    pub language: String,
    pub file_path: Option<String>,
    #[serde(default = "default_depth")]
    pub depth: u32,
}

fn default_depth() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
    pub resolved: bool,
}

#[derive(Debug, Serialize)]
pub struct DependencyGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<DependencyEdge>,
}

pub async fn dependencies(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<DependenciesParams>,
) -> AppResult<Json<DependencyGraph>> {
    let handle = state.registry.get(&id).await?;
    let import_re = regex_for_language(&params.language)?;

    let all_files: Vec<String> = handle
        .file_tree()?
        .into_iter()
        .filter(|e| !e.is_dir)
        .map(|e| e.path)
        .collect();

    let seeds: Vec<String> = match &params.file_path {
        Some(p) => vec![p.clone()],
        None => all_files.clone(),
    };

    let mut nodes: HashSet<String> = seeds.iter().cloned().collect();
    let mut edges = Vec::new();
    let mut queue: VecDeque<(String, u32)> = seeds.iter().map(|s| (s.clone(), 0)).collect();
    let mut visited: HashSet<String> = HashSet::new();

    while let Some((file, hop)) = queue.pop_front() {
        if !visited.insert(file.clone()) || hop >= params.depth {
            continue;
        }
        let Ok(content) = handle.file_content(&file) else { continue };
        let text = String::from_utf8_lossy(&content);
        for cap in import_re.captures_iter(&text) {
            let raw = cap
                .iter()
                .skip(1)
                .find_map(|m| m)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            if raw.is_empty() {
                continue;
            }
            let resolved_target = resolve_import(&handle, &file, &raw, &all_files);
            let to = resolved_target.clone().unwrap_or_else(|| raw.clone());
            edges.push(DependencyEdge { from: file.clone(), to: to.clone(), resolved: resolved_target.is_some() });
            nodes.insert(to.clone());
            if resolved_target.is_some() {
                queue.push_back((to, hop + 1));
            }
        }
    }

    let mut nodes: Vec<String> = nodes.into_iter().collect();
    nodes.sort();
    Ok(Json(DependencyGraph { nodes, edges }))
}

fn regex_for_language(language: &str) -> AppResult<Regex> {
    let pattern = match language.to_ascii_lowercase().as_str() {
        "rust" => r#"(?m)^\s*(?:pub\s+)?(?:use|mod)\s+([\w:]+)"#,
        "python" => r#"(?m)^\s*(?:from\s+([\w.]+)\s+import|import\s+([\w.]+))"#,
        "javascript" | "typescript" | "tsx" => {
            r#"(?:import[^'"]*from\s*|require\()\s*['"]([^'"]+)['"]"#
        }
        other => return Err(AppError::bad_request(format!("unsupported language: {other}"))),
    };
    Regex::new(pattern).map_err(|e| AppError::new(repo_core::ErrorKind::Internal, e.to_string()))
}

/// Resolves a local-looking import to a path already present in the
/// repository's file tree; returns `None` for imports that look external.
fn resolve_import(_handle: &RepoHandle, from: &str, raw: &str, all_files: &[String]) -> Option<String> {
    let stem = raw.trim_start_matches("./").trim_start_matches('.').replace("::", "/").replace('.', "/");
    let from_dir = std::path::Path::new(from).parent().unwrap_or_else(|| std::path::Path::new(""));

    all_files.iter().find(|f| {
        let candidate = std::path::Path::new(f);
        let Some(candidate_stem) = candidate.file_stem().and_then(|s| s.to_str()) else { return false };
        let Some(last) = stem.rsplit('/').next() else { return false };
        candidate_stem == last && candidate.parent().map(|p| p.starts_with(from_dir) || from_dir == p).unwrap_or(false)
    }).cloned()
}
