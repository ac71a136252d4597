//! Shared handle construction for every repository-reading subcommand.
//!
//! The CLI is single-process/single-client (§5 "scheduling"), so unlike
//! `api`/`toolcall` it does not keep a registry alive across calls — each
//! invocation builds a fresh `RepoCache`/`HandleRegistry` pair from the same
//! `KIT_CACHE_DIR`/`KIT_CACHE_TTL_HOURS` environment as the long-lived
//! gateways, so repeated CLI runs against the same remote source still hit
//! the on-disk cache.

use handle_registry::HandleRegistry;
use repo_cache::RepoCache;
use repo_core::RepoHandle;
use symbol_index::SymbolType;

pub fn registry() -> HandleRegistry {
    let cache_root = std::env::var("KIT_CACHE_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("repokit-cache"));
    let ttl_hours = std::env::var("KIT_CACHE_TTL_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(24);
    HandleRegistry::new(RepoCache::new(cache_root, ttl_hours))
}

pub async fn open_handle(path_or_url: &str, git_ref: Option<&str>) -> anyhow::Result<RepoHandle> {
    let registry = registry();
    let id = registry.add(path_or_url, git_ref);
    Ok(registry.get(&id).await?)
}

pub fn parse_symbol_type(s: &str) -> anyhow::Result<SymbolType> {
    Ok(match s {
        "function" => SymbolType::Function,
        "method" => SymbolType::Method,
        "class" => SymbolType::Class,
        "variable" => SymbolType::Variable,
        "constant" => SymbolType::Constant,
        "interface" => SymbolType::Interface,
        "other" => SymbolType::Other,
        other => anyhow::bail!("unknown symbol type: {other}"),
    })
}

/// Writes `value` as pretty JSON to `path` if given, otherwise prints it.
pub fn emit_json<T: serde::Serialize>(value: &T, output: Option<&std::path::Path>, wrote_msg: &str) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            println!("{}", wrote_msg);
        }
        None => println!("{text}"),
    }
    Ok(())
}
