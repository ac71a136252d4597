//! §4.9 Gateway-ToolCall — a fixed catalog of nine tools over the same
//! read-only repository operations `api` exposes over HTTP, built with
//! `rmcp`'s `#[tool_router]`/`#[tool]` macros the way the reference pack's
//! MCP servers (grepika, ctxhelpr) generate their `ToolRouter`.
//!
//! Every handler below does real work through `repo-core`/`symbol-index`/
//! `llm-client`; domain errors come back on the tool-result channel as
//! `{code, message}` text (LLM-visible, matches the original Python
//! server's `create_error_content`), while schema violations and unknown
//! tools ride the protocol error channel as `InvalidParams`/`InternalError`.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use symbol_index::{Symbol, SymbolType, SymbolUsage};

use crate::errors::ToolError;
use crate::state::ToolCallState;

fn parse_symbol_type(s: &str) -> Result<SymbolType, ToolError> {
    match s {
        "function" => Ok(SymbolType::Function),
        "method" => Ok(SymbolType::Method),
        "class" => Ok(SymbolType::Class),
        "variable" => Ok(SymbolType::Variable),
        "constant" => Ok(SymbolType::Constant),
        "interface" => Ok(SymbolType::Interface),
        "other" => Ok(SymbolType::Other),
        other => Err(ToolError::InvalidInput(format!("unknown symbol_type: {other}"))),
    }
}

/// Renders a domain error as the `{code, message}` tool-result shape. This
/// is the ONLY place that error shape is constructed — individual handlers
/// just propagate `ToolError` with `?`.
fn error_result(e: impl Into<ToolError>) -> CallToolResult {
    let e = e.into();
    let body = serde_json::json!({ "code": e.code(), "message": e.to_string() });
    CallToolResult::error(vec![Content::text(body.to_string())])
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, ErrorData> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

// ─── Parameter structs — one per tool, matching the §3 data model ─────────

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OpenRepositoryParams {
    /// Local filesystem path or a remote git URL/shorthand (`owner/repo`).
    pub path_or_url: String,
    /// Branch, tag, or commit SHA to check out. Defaults to the remote's
    /// default branch (or the working tree's current state for local
    /// sources) when omitted.
    pub r#ref: Option<String>,
    /// GitHub token for private repositories.
    pub github_token: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchCodeParams {
    /// Id returned by `open_repository`.
    pub repo_id: String,
    /// Text (or regex, when `regex` is true) to search for.
    pub query: String,
    /// Glob restricting which files are scanned, e.g. `*.py`.
    pub pattern: Option<String>,
    pub regex: Option<bool>,
    pub case_sensitive: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetFileContentParams {
    pub repo_id: String,
    pub file_path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExtractSymbolsParams {
    pub repo_id: String,
    pub file_path: String,
    pub symbol_type: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindSymbolUsagesParams {
    pub repo_id: String,
    pub symbol_name: String,
    pub symbol_type: Option<String>,
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetFileTreeParams {
    pub repo_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SemanticSearchParams {
    pub repo_id: String,
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetDocumentationParams {
    pub repo_id: String,
    pub file_path: String,
    pub symbol_name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetCodeSummaryParams {
    pub repo_id: String,
    pub file_path: String,
    pub symbol_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct SemanticHit {
    file: String,
    line_number: u32,
    line: String,
    score: u32,
}

#[derive(Debug, Serialize)]
struct CodeSummary {
    file: Option<String>,
    function: Option<String>,
    class: Option<String>,
}

/// The stdio tool-call server. Cloned (cheaply — every field is an `Arc`)
/// into each connection `rmcp`'s stdio transport drives.
#[derive(Clone)]
pub struct RepoToolServer {
    state: ToolCallState,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<RepoToolServer>,
}

impl RepoToolServer {
    pub fn new(state: ToolCallState) -> Self {
        Self { state, tool_router: Self::tool_router() }
    }
}

#[tool_router]
impl RepoToolServer {
    #[tool(description = "Open a repository (local path or remote URL) and return its handle id")]
    async fn open_repository(
        &self,
        Parameters(params): Parameters<OpenRepositoryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let id = self.state.registry.add(&params.path_or_url, params.r#ref.as_deref());
        if let Err(e) = self.state.registry.get(&id).await {
            return Ok(error_result(e));
        }
        json_result(&serde_json::json!({ "id": id }))
    }

    #[tool(description = "Search for text (or regex) in a repository, optionally restricted by a file glob")]
    async fn search_code(
        &self,
        Parameters(params): Parameters<SearchCodeParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let handle = match self.state.registry.get(&params.repo_id).await {
            Ok(h) => h,
            Err(e) => return Ok(error_result(e)),
        };
        let opts = repo_core::SearchOptions {
            regex: params.regex.unwrap_or(false),
            case_sensitive: params.case_sensitive.unwrap_or(true),
            include_globs: params.pattern.into_iter().collect(),
            ..Default::default()
        };
        match repo_core::SearchEngine::search(&handle, &params.query, &opts) {
            Ok(hits) => json_result(&hits),
            Err(e) => Ok(error_result(ToolError::from(e))),
        }
    }

    #[tool(description = "Get the content of a file in a repository")]
    async fn get_file_content(
        &self,
        Parameters(params): Parameters<GetFileContentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let handle = match self.state.registry.get(&params.repo_id).await {
            Ok(h) => h,
            Err(e) => return Ok(error_result(e)),
        };
        match handle.file_content(&params.file_path) {
            Ok(bytes) => Ok(CallToolResult::success(vec![Content::text(
                String::from_utf8_lossy(&bytes).into_owned(),
            )])),
            Err(e) => Ok(error_result(ToolError::from(e))),
        }
    }

    #[tool(description = "Extract code symbols (functions, classes, ...) from a file")]
    async fn extract_symbols(
        &self,
        Parameters(params): Parameters<ExtractSymbolsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let handle = match self.state.registry.get(&params.repo_id).await {
            Ok(h) => h,
            Err(e) => return Ok(error_result(e)),
        };
        let wanted = match params.symbol_type.as_deref().map(parse_symbol_type).transpose() {
            Ok(w) => w,
            Err(e) => return Ok(error_result(e)),
        };
        let mut symbols: Vec<Symbol> = match self.state.symbols.extract(&handle, &params.file_path) {
            Ok(s) => s,
            Err(e) => return Ok(error_result(ToolError::from(e))),
        };
        if let Some(t) = wanted {
            symbols.retain(|s| s.symbol_type == t);
        }
        json_result(&symbols)
    }

    #[tool(description = "Find all textual usages of a symbol name across the repository")]
    async fn find_symbol_usages(
        &self,
        Parameters(params): Parameters<FindSymbolUsagesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let handle = match self.state.registry.get(&params.repo_id).await {
            Ok(h) => h,
            Err(e) => return Ok(error_result(e)),
        };
        let wanted = match params.symbol_type.as_deref().map(parse_symbol_type).transpose() {
            Ok(w) => w,
            Err(e) => return Ok(error_result(e)),
        };
        let mut usages: Vec<SymbolUsage> =
            match self.state.symbols.find_usages(&handle, &params.symbol_name, wanted) {
                Ok(u) => u,
                Err(e) => return Ok(error_result(ToolError::from(e))),
            };
        if let Some(path) = &params.file_path {
            usages.retain(|u| &u.file == path);
        }
        json_result(&usages)
    }

    #[tool(description = "Get the file tree structure of a repository")]
    async fn get_file_tree(
        &self,
        Parameters(params): Parameters<GetFileTreeParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let handle = match self.state.registry.get(&params.repo_id).await {
            Ok(h) => h,
            Err(e) => return Ok(error_result(e)),
        };
        match handle.file_tree() {
            Ok(tree) => json_result(&tree),
            Err(e) => Ok(error_result(ToolError::from(e))),
        }
    }

    #[tool(
        description = "Placeholder semantic code search. No embedding model is wired in; this \
        ranks lines by a trivial, deterministic pseudo-embedding (character-sum hash) so the \
        tool shape is stable for agentic callers. A real vector backend is an external \
        collaborator, not implemented here."
    )]
    async fn semantic_search(
        &self,
        Parameters(params): Parameters<SemanticSearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let handle = match self.state.registry.get(&params.repo_id).await {
            Ok(h) => h,
            Err(e) => return Ok(error_result(e)),
        };
        let limit = params.limit.unwrap_or(10);
        let query_score = pseudo_embed(&params.query);

        let tree = match handle.file_tree() {
            Ok(t) => t,
            Err(e) => return Ok(error_result(ToolError::from(e))),
        };
        let mut hits = Vec::new();
        for entry in tree.into_iter().filter(|e| !e.is_dir) {
            let Ok(bytes) = handle.file_content(&entry.path) else { continue };
            let text = String::from_utf8_lossy(&bytes);
            for (idx, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let score = 1000 - pseudo_embed(line).abs_diff(query_score);
                hits.push(SemanticHit {
                    file: entry.path.clone(),
                    line_number: (idx + 1) as u32,
                    line: line.to_string(),
                    score,
                });
            }
        }
        hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.file.cmp(&b.file)).then_with(|| a.line_number.cmp(&b.line_number)));
        hits.truncate(limit);
        json_result(&hits)
    }

    #[tool(
        description = "Get documentation for a file or symbol — the leading comment/docstring \
        block immediately preceding it. No persisted docstring index is built; this reads the \
        source directly on every call."
    )]
    async fn get_documentation(
        &self,
        Parameters(params): Parameters<GetDocumentationParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let handle = match self.state.registry.get(&params.repo_id).await {
            Ok(h) => h,
            Err(e) => return Ok(error_result(e)),
        };
        let bytes = match handle.file_content(&params.file_path) {
            Ok(b) => b,
            Err(e) => return Ok(error_result(ToolError::from(e))),
        };
        let text = String::from_utf8_lossy(&bytes);

        let doc = match &params.symbol_name {
            None => leading_doc_comment(&text, 1),
            Some(name) => {
                let symbols = match self.state.symbols.extract(&handle, &params.file_path) {
                    Ok(s) => s,
                    Err(e) => return Ok(error_result(ToolError::from(e))),
                };
                match symbols.iter().find(|s| &s.name == name || &s.node_path == name) {
                    Some(s) => leading_doc_comment(&text, s.start_line),
                    None => return Ok(error_result(ToolError::InvalidInput(format!("symbol not found: {name}")))),
                }
            }
        };
        json_result(&serde_json::json!({ "documentation": doc }))
    }

    #[tool(
        description = "Get an LLM-produced summary of a file and, if symbol_name is given, also \
        attempt to summarize it as a function and as a class (absent ones are null)"
    )]
    async fn get_code_summary(
        &self,
        Parameters(params): Parameters<GetCodeSummaryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let Some(client) = self.state.llm.as_ref() else {
            return Ok(error_result(ToolError::Unsupported("no LLM provider configured".into())));
        };
        let handle = match self.state.registry.get(&params.repo_id).await {
            Ok(h) => h,
            Err(e) => return Ok(error_result(e)),
        };
        let summarizer = llm_client::Summarizer::new(&handle, &self.state.symbols, client, self.state.ceiling);

        let file = match summarizer.summarize_file(&params.file_path, &self.state.call_params).await {
            Ok(s) => Some(s),
            Err(e) => return Ok(error_result(ToolError::from(e))),
        };

        let (function, class) = match &params.symbol_name {
            None => (None, None),
            Some(name) => {
                let function = match summarizer.summarize_function(&params.file_path, name, &self.state.call_params).await {
                    Ok(s) => Some(s),
                    Err(llm_client::LlmError::SymbolNotFound(_)) => None,
                    Err(e) => return Ok(error_result(ToolError::from(e))),
                };
                let class = match summarizer.summarize_class(&params.file_path, name, &self.state.call_params).await {
                    Ok(s) => Some(s),
                    Err(llm_client::LlmError::SymbolNotFound(_)) => None,
                    Err(e) => return Ok(error_result(ToolError::from(e))),
                };
                (function, class)
            }
        };

        json_result(&CodeSummary { file, function, class })
    }
}

#[tool_handler]
impl ServerHandler for RepoToolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            server_info: Implementation {
                name: "repokit".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Code-intelligence tools over a git repository. Call open_repository first; \
                every other tool takes the returned repo_id."
                    .to_string(),
            ),
        }
    }
}

/// Placeholder embedding per §9 Open Questions: `sum(ord(c)) % 1000`.
fn pseudo_embed(text: &str) -> u32 {
    text.bytes().map(|b| b as u32).sum::<u32>() % 1000
}

/// Walks contiguous `//`/`#`/`"""`-style comment lines immediately above
/// `before_line` (1-indexed, exclusive) back to the nearest blank line or
/// top of file.
fn leading_doc_comment(text: &str, before_line: u32) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    if before_line == 0 {
        return None;
    }
    let mut idx = (before_line - 1) as usize;
    let mut collected = Vec::new();
    while idx > 0 {
        idx -= 1;
        let line = lines.get(idx)?.trim();
        if line.is_empty() {
            break;
        }
        if line.starts_with("//") || line.starts_with('#') || line.starts_with('*') || line.starts_with("\"\"\"") {
            collected.push(line.to_string());
        } else {
            break;
        }
    }
    collected.reverse();
    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudo_embed_is_deterministic() {
        assert_eq!(pseudo_embed("hello"), pseudo_embed("hello"));
    }

    #[test]
    fn leading_doc_comment_collects_contiguous_block() {
        let text = "// part one\n// part two\nfn main() {}\n";
        let doc = leading_doc_comment(text, 3).unwrap();
        assert_eq!(doc, "// part one\n// part two");
    }

    #[test]
    fn leading_doc_comment_stops_at_blank_line() {
        let text = "// unrelated\n\nfn main() {}\n";
        assert!(leading_doc_comment(text, 3).is_none());
    }
}
