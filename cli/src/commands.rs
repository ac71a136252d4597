//! One function per top-level subcommand, grounded line-for-line on the
//! Python original's command bodies (`typer` argument shapes, `--output`
//! file-vs-stdout branching, `✅`/`❌` status markers) but built against this
//! crate's own `repo-core`/`symbol-index`/`pr-review` surfaces.

use crate::repo::{emit_json, open_handle, parse_symbol_type};
use colored::Colorize;
use repo_core::{Chunker, SearchEngine, SearchOptions, SymbolSpan};
use std::path::{Path, PathBuf};

pub async fn file_tree(path: &str, git_ref: Option<&str>, output: Option<&Path>) -> anyhow::Result<()> {
    let handle = open_handle(path, git_ref).await?;
    let tree = handle.file_tree()?;
    match output {
        Some(out) => {
            emit_json(&tree, Some(out), &format!("File tree written to {}", out.display()))?;
        }
        None => {
            for entry in &tree {
                let indicator = if entry.is_dir { "📁" } else { "📄" };
                let size = if entry.is_dir { String::new() } else { format!(" ({} bytes)", entry.size) };
                println!("{indicator} {}{size}", entry.path);
            }
        }
    }
    Ok(())
}

pub async fn file_content(path: &str, file_path: &str, git_ref: Option<&str>) -> anyhow::Result<()> {
    let handle = open_handle(path, git_ref).await?;
    match handle.file_content(file_path) {
        Ok(bytes) => {
            print!("{}", String::from_utf8_lossy(&bytes));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format!("Error: File not found: {file_path}").red());
            Err(e.into())
        }
    }
}

pub async fn index(path: &str, git_ref: Option<&str>, output: Option<&Path>, symbols: &symbol_index::SymbolIndex) -> anyhow::Result<()> {
    let handle = open_handle(path, git_ref).await?;
    let result = symbols.index(&handle)?;
    let wrote_msg = output.map(|out| format!("Repository index written to {}", out.display())).unwrap_or_default();
    emit_json(&result, output, &wrote_msg)
}

pub async fn symbols(
    path: &str,
    file: Option<&str>,
    format: &str,
    git_ref: Option<&str>,
    output: Option<&Path>,
    index: &symbol_index::SymbolIndex,
) -> anyhow::Result<()> {
    let handle = open_handle(path, git_ref).await?;
    let symbols = match file {
        Some(f) => index.extract(&handle, f)?,
        None => index.extract_all(&handle)?,
    };

    if let Some(out) = output {
        emit_json(&symbols, Some(out), &format!("Symbols written to {}", out.display()))?;
        return Ok(());
    }

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&symbols)?),
        "names" => symbols.iter().for_each(|s| println!("{}", s.name)),
        _ => {
            if symbols.is_empty() {
                println!("No symbols found.");
            } else {
                println!("{:<30} {:<15} {:<40} {}", "Name", "Type", "File", "Lines");
                println!("{}", "-".repeat(95));
                for s in &symbols {
                    println!(
                        "{:<30} {:<15} {:<40} {}-{}",
                        s.name,
                        s.symbol_type.as_str(),
                        s.file,
                        s.start_line,
                        s.end_line
                    );
                }
            }
        }
    }
    Ok(())
}

pub async fn usages(
    path: &str,
    symbol_name: &str,
    symbol_type: Option<&str>,
    git_ref: Option<&str>,
    output: Option<&Path>,
    index: &symbol_index::SymbolIndex,
) -> anyhow::Result<()> {
    let handle = open_handle(path, git_ref).await?;
    let wanted = symbol_type.map(parse_symbol_type).transpose()?;
    let usages = index.find_usages(&handle, symbol_name, wanted)?;

    if let Some(out) = output {
        emit_json(&usages, Some(out), &format!("Symbol usages written to {}", out.display()))?;
        return Ok(());
    }

    if usages.is_empty() {
        println!("No usages found for symbol '{symbol_name}'.");
    } else {
        println!("Found {} usage(s) of '{symbol_name}':", usages.len());
        for u in &usages {
            println!("{}:{}: {}", u.file, u.line_number, u.line_content.trim());
        }
    }
    Ok(())
}

pub async fn search(path: &str, query: &str, pattern: &str, git_ref: Option<&str>, output: Option<&Path>) -> anyhow::Result<()> {
    let handle = open_handle(path, git_ref).await?;
    let opts = SearchOptions {
        include_globs: if pattern == "*" { Vec::new() } else { vec![pattern.to_string()] },
        ..Default::default()
    };
    let hits = SearchEngine::search(&handle, query, &opts)?;

    if let Some(out) = output {
        emit_json(&hits, Some(out), &format!("Search results written to {}", out.display()))?;
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results found.");
    } else {
        for hit in &hits {
            println!("{}:{}: {}", hit.path, hit.line_number, hit.line.trim());
        }
    }
    Ok(())
}

pub async fn context(path: &str, file_path: &str, line: u32, output: Option<&Path>, index: &symbol_index::SymbolIndex) -> anyhow::Result<()> {
    let handle = open_handle(path, None).await?;
    let symbols = index.extract(&handle, file_path)?;
    let found = symbols.iter().find(|s| s.start_line <= line && line <= s.end_line);

    match (found, output) {
        (Some(s), Some(out)) => {
            let chunk = Chunker::chunk_by_symbol(&handle, file_path, SymbolSpan { start_line: s.start_line, end_line: s.end_line }, 0)?;
            let payload = serde_json::json!({
                "name": s.name, "type": s.symbol_type.as_str(),
                "start_line": s.start_line, "end_line": s.end_line, "code": chunk.text,
            });
            std::fs::write(out, serde_json::to_string_pretty(&payload)?)?;
            println!("Context written to {}", out.display());
        }
        (Some(s), None) => {
            println!("Context for {file_path}:{line}");
            println!("Symbol: {} ({})", s.name, s.symbol_type.as_str());
            println!("Lines: {}-{}", s.start_line, s.end_line);
            println!("Code:");
            println!("{}", s.code);
        }
        (None, Some(out)) => {
            std::fs::write(out, "null")?;
            println!("Context written to {}", out.display());
        }
        (None, None) => println!("No context found for {file_path}:{line}"),
    }
    Ok(())
}

pub async fn chunk_lines(path: &str, file_path: &str, max_lines: u32, output: Option<&Path>) -> anyhow::Result<()> {
    let handle = open_handle(path, None).await?;
    let chunks = Chunker::chunk_whole_file(&handle, file_path, max_lines)?;

    if let Some(out) = output {
        emit_json(&chunks, Some(out), &format!("File chunks written to {}", out.display()))?;
        return Ok(());
    }
    for (i, chunk) in chunks.iter().enumerate() {
        println!("--- Chunk {} ---", i + 1);
        println!("{}", chunk.text);
        if i + 1 < chunks.len() {
            println!();
        }
    }
    Ok(())
}

pub async fn chunk_symbols(path: &str, file_path: &str, output: Option<&Path>, index: &symbol_index::SymbolIndex) -> anyhow::Result<()> {
    let handle = open_handle(path, None).await?;
    let symbols = index.extract(&handle, file_path)?;

    if let Some(out) = output {
        emit_json(&symbols, Some(out), &format!("Symbol chunks written to {}", out.display()))?;
        return Ok(());
    }
    for s in &symbols {
        println!("--- {}: {} ---", s.symbol_type.as_str(), s.name);
        println!("{}", s.code);
        println!();
    }
    Ok(())
}

pub async fn export(
    path: &str,
    data_type: &str,
    out: &PathBuf,
    symbol_name: Option<&str>,
    symbol_type: Option<&str>,
    git_ref: Option<&str>,
    index: &symbol_index::SymbolIndex,
) -> anyhow::Result<()> {
    let handle = open_handle(path, git_ref).await?;
    match data_type {
        "index" => {
            emit_json(&index.index(&handle)?, Some(out), &format!("Repository index exported to {}", out.display()))?;
        }
        "symbols" => {
            emit_json(&index.extract_all(&handle)?, Some(out), &format!("Symbols exported to {}", out.display()))?;
        }
        "file-tree" => {
            emit_json(&handle.file_tree()?, Some(out), &format!("File tree exported to {}", out.display()))?;
        }
        "symbol-usages" => {
            let name = symbol_name.ok_or_else(|| anyhow::anyhow!("--symbol is required for symbol-usages export"))?;
            let wanted = symbol_type.map(parse_symbol_type).transpose()?;
            let usages = index.find_usages(&handle, name, wanted)?;
            emit_json(&usages, Some(out), &format!("Symbol usages for '{name}' exported to {}", out.display()))?;
        }
        other => anyhow::bail!("Unknown data type '{other}'. Use: index, symbols, file-tree, or symbol-usages"),
    }
    Ok(())
}

pub async fn git_info(path: &str, git_ref: Option<&str>, output: Option<&Path>) -> anyhow::Result<()> {
    let handle = open_handle(path, git_ref).await?;
    let info = handle.git_info();

    if let Some(out) = output {
        emit_json(&info, Some(out), &format!("Git info exported to {}", out.display()))?;
        return Ok(());
    }

    println!("Git Repository Information:");
    println!("{}", "-".repeat(30));
    if let Some(sha) = &info.sha {
        println!("Current SHA:     {sha}");
        println!("Short SHA:       {}", info.short_sha.as_deref().unwrap_or(""));
    }
    match &info.branch {
        Some(b) => println!("Current Branch:  {b}"),
        None => println!("Current Branch:  (detached HEAD)"),
    }
    if let Some(url) = &info.remote_url {
        println!("Remote URL:      {url}");
    }
    if info.sha.is_none() && info.branch.is_none() && info.remote_url.is_none() {
        println!("Not a git repository or no git metadata available.");
    }
    Ok(())
}
