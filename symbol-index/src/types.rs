//! §3 Symbol / Symbol Usage entities and §4.2 SymbolIndex result shapes.

use serde::{Deserialize, Serialize};

/// Coarse symbol taxonomy shared by every language provider.
///
/// Language-specific refinements (e.g. Rust `impl` blocks, Python decorators)
/// collapse into the nearest of these at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolType {
    Function,
    Method,
    Class,
    Variable,
    Constant,
    Interface,
    Other,
}

impl SymbolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolType::Function => "function",
            SymbolType::Method => "method",
            SymbolType::Class => "class",
            SymbolType::Variable => "variable",
            SymbolType::Constant => "constant",
            SymbolType::Interface => "interface",
            SymbolType::Other => "other",
        }
    }
}

/// A named code entity recognized by a language's grammar.
///
/// Unique within a file by `(node_path, start_line)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    /// Dotted path for nested symbols, e.g. `Outer.inner_fn`.
    pub node_path: String,
    #[serde(rename = "type")]
    pub symbol_type: SymbolType,
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
    pub code: String,
}

/// One textual occurrence of a symbol name found by a repository-wide scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolUsage {
    pub file: String,
    pub line_number: u32,
    pub line_content: String,
}

/// Combined payload for `SymbolIndex::index()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResult {
    pub files: Vec<String>,
    pub symbols: Vec<Symbol>,
}
