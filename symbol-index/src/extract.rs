//! Query-driven symbol extraction, one file at a time.

use crate::errors::{Error, Result};
use crate::queries::{Lang, symbol_query};
use crate::types::{Symbol, SymbolType};
use tree_sitter::{Node, Parser, QueryCursor, StreamingIterator};

const TAG_NAMES: &[(&str, SymbolType)] = &[
    ("function", SymbolType::Function),
    ("method", SymbolType::Method),
    ("class", SymbolType::Class),
    ("interface", SymbolType::Interface),
    ("constant", SymbolType::Constant),
    ("variable", SymbolType::Variable),
];

/// Extracts symbols from `source`, attributing them to `relative_path`.
///
/// Deterministic by `(start_line, start_col)`: captures are walked in the
/// order tree-sitter returns them (source order) and sorted defensively to
/// guarantee that ordering regardless of query/match interleaving.
pub fn extract_symbols(lang: &Lang, relative_path: &str, source: &str) -> Result<Vec<Symbol>> {
    let query = symbol_query(lang)?;

    let mut parser = Parser::new();
    parser
        .set_language(&lang.grammar())
        .map_err(|_| Error::Language(lang.name().to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Parse(relative_path.to_string()))?;

    let name_idx = query.capture_index_for_name("name");
    let mut out: Vec<(u32, u32, Symbol)> = Vec::new();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source.as_bytes());
    while let Some(m) = matches.next() {
        let mut tagged_node: Option<(Node, SymbolType)> = None;
        let mut name_node: Option<Node> = None;

        for cap in m.captures {
            let cap_name = &query.capture_names()[cap.index as usize];
            if Some(cap.index) == name_idx {
                name_node = Some(cap.node);
                continue;
            }
            if let Some((_, stype)) = TAG_NAMES.iter().find(|(tag, _)| tag == cap_name) {
                tagged_node = Some((cap.node, *stype));
            }
        }

        let (Some((node, symbol_type)), Some(name_node)) = (tagged_node, name_node) else {
            continue;
        };
        let name = name_node.utf8_text(source.as_bytes()).unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }

        let node_path = qualify(node, source, &name);
        let start = node.start_position();
        let end = node.end_position();
        let code = source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
            .to_string();

        out.push((
            start.row as u32,
            start.column as u32,
            Symbol {
                name,
                node_path,
                symbol_type,
                file: relative_path.to_string(),
                start_line: start.row as u32 + 1,
                end_line: end.row as u32 + 1,
                code,
            },
        ));
    }

    out.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    Ok(out.into_iter().map(|(_, _, s)| s).collect())
}

/// Prefixes `name` with the nearest enclosing class/struct/impl name, if any.
fn qualify(node: Node, source: &str, name: &str) -> String {
    let mut current = node;
    while let Some(parent) = current.parent() {
        let kind = parent.kind();
        if matches!(
            kind,
            "class_declaration"
                | "class_definition"
                | "struct_item"
                | "impl_item"
                | "trait_item"
                | "interface_declaration"
        ) {
            if let Some(owner) = owner_name(parent, source) {
                if owner != name {
                    return format!("{owner}.{name}");
                }
            }
            break;
        }
        current = parent;
    }
    name.to_string()
}

fn owner_name<'a>(node: Node<'a>, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(child.kind(), "identifier" | "type_identifier") {
            return child.utf8_text(source.as_bytes()).ok().map(|s| s.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_rust_function_and_struct() {
        let src = "fn alpha() {}\nstruct Beta { x: i32 }\nimpl Beta {\n    fn inner(&self) {}\n}\n";
        let symbols = extract_symbols(&Lang::Rust, "sample.rs", src).unwrap();
        let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"alpha"));
        assert!(names.contains(&"Beta"));
        let inner = symbols.iter().find(|s| s.name == "inner").unwrap();
        assert_eq!(inner.node_path, "Beta.inner");
        assert_eq!(inner.symbol_type, SymbolType::Method);
    }

    #[test]
    fn extracts_javascript_function_and_class() {
        let src = "function alpha() {}\nclass Beta {}\n";
        let symbols = extract_symbols(&Lang::Javascript, "sample.js", src).unwrap();
        let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"alpha"));
        assert!(names.contains(&"Beta"));
    }

    #[test]
    fn extracts_python_class_method() {
        let src = "class Beta:\n    def inner(self):\n        pass\n";
        let symbols = extract_symbols(&Lang::Python, "sample.py", src).unwrap();
        let inner = symbols.iter().find(|s| s.name == "inner").unwrap();
        assert_eq!(inner.node_path, "Beta.inner");
    }

    #[test]
    fn symbols_are_ordered_by_position() {
        let src = "fn a() {}\nfn b() {}\nfn c() {}\n";
        let symbols = extract_symbols(&Lang::Rust, "sample.rs", src).unwrap();
        let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
