//! Tree-sitter query compilation, one static `Query` per language.
//!
//! Each query captures the nodes this crate cares about (functions, methods,
//! classes, top-level variables/constants) under a capture name; the walker
//! in `extract.rs` maps capture names to `SymbolType`.

use crate::errors::{Error, Result};
use std::sync::OnceLock;
use tree_sitter::{Language, Query};

pub enum Lang {
    Rust,
    Python,
    Javascript,
    Typescript,
    Tsx,
}

impl Lang {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "rs" => Some(Lang::Rust),
            "py" | "pyi" => Some(Lang::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Lang::Javascript),
            "ts" | "mts" | "cts" => Some(Lang::Typescript),
            "tsx" => Some(Lang::Tsx),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Lang::Rust => "rust",
            Lang::Python => "python",
            Lang::Javascript => "javascript",
            Lang::Typescript => "typescript",
            Lang::Tsx => "tsx",
        }
    }

    pub fn grammar(&self) -> Language {
        match self {
            Lang::Rust => tree_sitter_rust::LANGUAGE.into(),
            Lang::Python => tree_sitter_python::LANGUAGE.into(),
            Lang::Javascript => tree_sitter_javascript::LANGUAGE.into(),
            Lang::Typescript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Lang::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

pub fn symbol_query(lang: &Lang) -> Result<&'static Query> {
    match lang {
        Lang::Rust => {
            static Q: OnceLock<Option<Query>> = OnceLock::new();
            get(&Q, lang, RUST_QUERY)
        }
        Lang::Python => {
            static Q: OnceLock<Option<Query>> = OnceLock::new();
            get(&Q, lang, PYTHON_QUERY)
        }
        Lang::Javascript => {
            static Q: OnceLock<Option<Query>> = OnceLock::new();
            get(&Q, lang, JS_QUERY)
        }
        Lang::Typescript => {
            static Q: OnceLock<Option<Query>> = OnceLock::new();
            get(&Q, lang, TS_QUERY)
        }
        Lang::Tsx => {
            static Q: OnceLock<Option<Query>> = OnceLock::new();
            get(&Q, lang, TS_QUERY)
        }
    }
}

fn get<'a>(cell: &'a OnceLock<Option<Query>>, lang: &Lang, source: &str) -> Result<&'a Query> {
    cell.get_or_init(|| Query::new(&lang.grammar(), source).ok())
        .as_ref()
        .ok_or_else(|| Error::Language(lang.name().to_string()))
}

const RUST_QUERY: &str = r#"
(function_item name: (identifier) @name) @function
(impl_item body: (declaration_list (function_item name: (identifier) @name) @method))
(struct_item name: (type_identifier) @name) @class
(enum_item name: (type_identifier) @name) @class
(trait_item name: (type_identifier) @name) @interface
(const_item name: (identifier) @name) @constant
(static_item name: (identifier) @name) @constant
"#;

const PYTHON_QUERY: &str = r#"
(function_definition name: (identifier) @name) @function
(class_definition body: (block (function_definition name: (identifier) @name) @method))
(class_definition name: (identifier) @name) @class
(assignment left: (identifier) @name) @variable
"#;

const JS_QUERY: &str = r#"
(function_declaration name: (identifier) @name) @function
(class_declaration name: (identifier) @name) @class
(class_body (method_definition name: (property_identifier) @name) @method)
(lexical_declaration (variable_declarator name: (identifier) @name value: (arrow_function))) @function
(variable_declaration (variable_declarator name: (identifier) @name value: (arrow_function))) @function
"#;

const TS_QUERY: &str = r#"
(function_declaration name: (identifier) @name) @function
(class_declaration name: (type_identifier) @name) @class
(interface_declaration name: (type_identifier) @name) @interface
(class_body (method_definition name: (property_identifier) @name) @method)
(lexical_declaration (variable_declarator name: (identifier) @name value: (arrow_function))) @function
(variable_declaration (variable_declarator name: (identifier) @name value: (arrow_function))) @function
"#;
