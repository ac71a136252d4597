//! §6 CLI — a `clap` derive front end over the same repository-intelligence
//! and PR-review surfaces `api` (HTTP) and `toolcall` (stdio) expose,
//! following the original Typer app's command set and `--ref`/`--output`
//! argument shapes one for one.

mod commands;
mod repo;
mod review;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use symbol_index::SymbolIndex;

#[derive(Parser)]
#[command(name = "kit", author, version, about = "A modular toolkit for LLM-powered codebase understanding.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// `--ref <REF>`, shared by every subcommand that resolves a repository
/// handle. Local paths ignore it; remote sources check out the given ref.
#[derive(Args, Debug, Clone, Default)]
pub struct RefArg {
    #[arg(long = "ref", help = "Git ref (SHA, tag, or branch) to checkout for remote repositories")]
    pub git_ref: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP repository intelligence server
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
    },
    /// Show a repository's file tree
    FileTree {
        path: String,
        #[command(flatten)]
        git_ref: RefArg,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print a file's content
    FileContent {
        path: String,
        file_path: String,
        #[command(flatten)]
        git_ref: RefArg,
    },
    /// Build and print a repository's combined file/symbol index
    Index {
        path: String,
        #[command(flatten)]
        git_ref: RefArg,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Extract symbols from a repository or a single file
    Symbols {
        path: String,
        #[arg(long = "file", short = 'f')]
        file: Option<String>,
        #[arg(long, default_value = "table")]
        format: String,
        #[command(flatten)]
        git_ref: RefArg,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Find textual usages of a symbol name
    Usages {
        path: String,
        symbol_name: String,
        #[arg(long = "type", short = 't')]
        symbol_type: Option<String>,
        #[command(flatten)]
        git_ref: RefArg,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Search for text or a regex pattern across a repository
    Search {
        path: String,
        query: String,
        #[arg(long, short, default_value = "*")]
        pattern: String,
        #[command(flatten)]
        git_ref: RefArg,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Extract the symbol enclosing a given line
    Context {
        path: String,
        file_path: String,
        line: u32,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Chunk a file by fixed line count
    ChunkLines {
        path: String,
        file_path: String,
        #[arg(long = "max-lines", short = 'n', default_value_t = 50)]
        max_lines: u32,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Chunk a file by symbol boundaries
    ChunkSymbols {
        path: String,
        file_path: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Export repository data (index, symbols, file-tree, symbol-usages) to JSON
    Export {
        path: String,
        data_type: String,
        out: PathBuf,
        #[arg(long = "symbol")]
        symbol_name: Option<String>,
        #[arg(long = "symbol-type")]
        symbol_type: Option<String>,
        #[command(flatten)]
        git_ref: RefArg,
    },
    /// Show git repository metadata
    GitInfo {
        path: String,
        #[command(flatten)]
        git_ref: RefArg,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Review a GitHub PR using repository intelligence and AI analysis
    Review {
        #[arg(default_value = "")]
        pr_url: String,
        #[arg(long, short = 'm')]
        model: Option<String>,
        #[arg(long, short = 'P')]
        priority: Option<String>,
        #[arg(long)]
        profile: Option<String>,
        #[arg(long, short)]
        plain: bool,
        #[arg(long, short = 'n')]
        dry_run: bool,
        #[arg(long)]
        agentic: bool,
        #[arg(long, default_value_t = 15)]
        agentic_turns: u32,
    },
    /// Manage the repository cache used for PR reviews
    ReviewCache {
        action: String,
        #[arg(long = "max-size")]
        max_size: Option<f64>,
    },
    /// Manage custom context profiles for PR reviews
    ReviewProfile {
        action: String,
        #[arg(long, short = 'n')]
        name: Option<String>,
        #[arg(long, short = 'd')]
        description: Option<String>,
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
        #[arg(long, short = 't')]
        tags: Option<String>,
        #[arg(long)]
        target: Option<String>,
        #[arg(long, default_value = "table")]
        format: String,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let index = SymbolIndex::new();

    let result = dispatch(cli.command, &index).await;
    if let Err(e) = &result {
        eprintln!("Error: {e}");
    }
    result
}

async fn dispatch(command: Command, index: &SymbolIndex) -> anyhow::Result<()> {
    match command {
        Command::Serve { addr } => {
            std::env::set_var("KIT_HTTP_ADDR", addr);
            api::start().await.map_err(|e| anyhow::anyhow!(e.to_string()))?;
        }
        Command::FileTree { path, git_ref, output } => {
            commands::file_tree(&path, git_ref.git_ref.as_deref(), output.as_deref()).await?;
        }
        Command::FileContent { path, file_path, git_ref } => {
            commands::file_content(&path, &file_path, git_ref.git_ref.as_deref()).await?;
        }
        Command::Index { path, git_ref, output } => {
            commands::index(&path, git_ref.git_ref.as_deref(), output.as_deref(), index).await?;
        }
        Command::Symbols { path, file, format, git_ref, output } => {
            commands::symbols(&path, file.as_deref(), &format, git_ref.git_ref.as_deref(), output.as_deref(), index).await?;
        }
        Command::Usages { path, symbol_name, symbol_type, git_ref, output } => {
            commands::usages(&path, &symbol_name, symbol_type.as_deref(), git_ref.git_ref.as_deref(), output.as_deref(), index).await?;
        }
        Command::Search { path, query, pattern, git_ref, output } => {
            commands::search(&path, &query, &pattern, git_ref.git_ref.as_deref(), output.as_deref()).await?;
        }
        Command::Context { path, file_path, line, output } => {
            commands::context(&path, &file_path, line, output.as_deref(), index).await?;
        }
        Command::ChunkLines { path, file_path, max_lines, output } => {
            commands::chunk_lines(&path, &file_path, max_lines, output.as_deref()).await?;
        }
        Command::ChunkSymbols { path, file_path, output } => {
            commands::chunk_symbols(&path, &file_path, output.as_deref(), index).await?;
        }
        Command::Export { path, data_type, out, symbol_name, symbol_type, git_ref } => {
            commands::export(&path, &data_type, &out, symbol_name.as_deref(), symbol_type.as_deref(), git_ref.git_ref.as_deref(), index).await?;
        }
        Command::GitInfo { path, git_ref, output } => {
            commands::git_info(&path, git_ref.git_ref.as_deref(), output.as_deref()).await?;
        }
        Command::Review { pr_url, model, priority, profile, plain, dry_run, agentic, agentic_turns } => {
            review::review(
                Some(pr_url.as_str()),
                model.as_deref(),
                priority.as_deref(),
                profile.as_deref(),
                plain,
                dry_run,
                agentic,
                agentic_turns,
            )
            .await?;
        }
        Command::ReviewCache { action, max_size } => {
            review::review_cache(&action, max_size)?;
        }
        Command::ReviewProfile { action, name, description, file, tags, target, format } => {
            review::review_profile(
                &action,
                name.as_deref(),
                description.as_deref(),
                file.as_deref(),
                tags.as_deref(),
                target.as_deref(),
                &format,
            )?;
        }
    }
    Ok(())
}
