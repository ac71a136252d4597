//! §4.4 Summarizer — file/function/class summaries built on top of
//! `symbol-index` (B) and `LlmClient` (I). Takes its handle and client by
//! constructor so neither the handle nor `symbol-index` ever needs to know
//! about this crate (§9 "cyclic references").

use crate::client::LlmClient;
use crate::config::CallParams;
use crate::errors::{LlmError, Result};
use repo_core::RepoHandle;
use symbol_index::{SymbolIndex, SymbolType};

const FILE_CHAR_LIMIT: usize = 25_000;
const SYMBOL_CHAR_LIMIT: usize = 50_000;

const SYSTEM_PROMPT: &str =
    "You are a senior engineer producing a concise, accurate summary of the given code for a teammate skimming a large repository.";

pub struct Summarizer<'a> {
    handle: &'a RepoHandle,
    symbols: &'a SymbolIndex,
    client: &'a LlmClient,
    ceiling: usize,
}

impl<'a> Summarizer<'a> {
    pub fn new(handle: &'a RepoHandle, symbols: &'a SymbolIndex, client: &'a LlmClient, ceiling: usize) -> Self {
        Self { handle, symbols, client, ceiling }
    }

    /// §4.4 `summarizeFile`.
    pub async fn summarize_file(&self, path: &str, params: &CallParams) -> Result<String> {
        let content = self.handle.file_content(path)?;
        let text = String::from_utf8_lossy(&content);
        if text.chars().count() > FILE_CHAR_LIMIT {
            return Ok(format!("File content too large ({} characters) to summarize.", text.chars().count()));
        }

        let user_prompt = format!("Summarize the following file `{path}`:\n\n{text}");
        let resp = self.client.summarize(SYSTEM_PROMPT, &user_prompt, params, self.ceiling).await?;
        if resp.text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(resp.text.trim().to_string())
    }

    /// §4.4 `summarizeFunction`.
    pub async fn summarize_function(&self, path: &str, name: &str, params: &CallParams) -> Result<String> {
        self.summarize_symbol(path, name, &[SymbolType::Function, SymbolType::Method], params).await
    }

    /// §4.4 `summarizeClass`.
    pub async fn summarize_class(&self, path: &str, name: &str, params: &CallParams) -> Result<String> {
        self.summarize_symbol(path, name, &[SymbolType::Class], params).await
    }

    async fn summarize_symbol(
        &self,
        path: &str,
        name: &str,
        allowed_types: &[SymbolType],
        params: &CallParams,
    ) -> Result<String> {
        let symbols = self.symbols.extract(self.handle, path)?;
        let symbol = symbols
            .iter()
            .find(|s| (s.node_path == name || s.name == name) && allowed_types.contains(&s.symbol_type))
            .ok_or_else(|| LlmError::SymbolNotFound(name.to_string()))?;

        if symbol.code.chars().count() > SYMBOL_CHAR_LIMIT {
            return Ok(format!("File content too large ({} characters) to summarize.", symbol.code.chars().count()));
        }

        let user_prompt = format!(
            "Summarize the following {} `{}` from `{path}`:\n\n{}",
            symbol.symbol_type.as_str(),
            name,
            symbol.code
        );
        let resp = self.client.summarize(SYSTEM_PROMPT, &user_prompt, params, self.ceiling).await?;
        if resp.text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(resp.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointConfig;
    use std::fs;
    use tempfile::tempdir;

    fn handle(dir: &std::path::Path) -> RepoHandle {
        RepoHandle::open("h1".into(), dir.to_path_buf(), "local".into(), None).unwrap()
    }

    #[tokio::test]
    async fn oversize_file_returns_placeholder_not_error() {
        let dir = tempdir().unwrap();
        let big = "x".repeat(FILE_CHAR_LIMIT + 1);
        fs::write(dir.path().join("big.txt"), &big).unwrap();
        let h = handle(dir.path());
        let symbols = SymbolIndex::new();
        let client = LlmClient::local_generate(EndpointConfig::new("http://127.0.0.1:1", None)).unwrap();
        let summarizer = Summarizer::new(&h, &symbols, &client, 15_000);
        let out = summarizer.summarize_file("big.txt", &CallParams::default()).await.unwrap();
        assert!(out.starts_with("File content too large"));
    }

    #[tokio::test]
    async fn missing_symbol_is_symbol_not_found() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "def foo():\n    pass\n").unwrap();
        let h = handle(dir.path());
        let symbols = SymbolIndex::new();
        let client = LlmClient::local_generate(EndpointConfig::new("http://127.0.0.1:1", None)).unwrap();
        let summarizer = Summarizer::new(&h, &symbols, &client, 15_000);
        let err = summarizer
            .summarize_function("a.py", "missing", &CallParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::SymbolNotFound(_)));
    }
}
