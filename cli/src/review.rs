//! `review`, `review-cache`, `review-profile` — thin CLI front ends over
//! `pr_review`, following the original's status-message cadence (suppressed
//! entirely in `--plain` mode) and exit-code convention (§6: 0 success, 1 on
//! any domain error).

use colored::Colorize;
use llm_client::{route_model, EndpointConfig, LlmClient};
use pr_review::{HostClient, HostConfig, PrReviewPipeline, ProfileStore, ReviewConfig, ReviewRequest, RunState, Severity};

pub async fn review(
    pr_url: Option<&str>,
    model: Option<&str>,
    priority: Option<&str>,
    profile: Option<&str>,
    plain: bool,
    dry_run: bool,
    agentic: bool,
    agentic_turns: u32,
) -> anyhow::Result<()> {
    let Some(pr_url) = pr_url.filter(|s| !s.is_empty()) else {
        eprintln!("{}", "❌ PR URL is required".red());
        eprintln!("💡 Example: kit review https://github.com/owner/repo/pull/123");
        anyhow::bail!("missing PR URL");
    };

    let mut config = ReviewConfig::from_env()?;
    if let Some(m) = model {
        config.call_params.model = m.to_string();
        config.model = m.to_string();
        if !plain {
            println!("🎛️  Overriding model to: {m}");
        }
    }
    if agentic {
        config.max_turns = agentic_turns;
        if !plain {
            println!("🤖 Agentic mode configured - max turns: {agentic_turns}");
        }
    } else if !plain {
        println!("🛠️ Standard mode configured - repository intelligence enabled");
    }

    let severity_filter = priority
        .map(|p| {
            p.split(',')
                .map(|s| Severity::parse(s.trim()).ok_or_else(|| anyhow::anyhow!("invalid priority level: {s}")))
                .collect::<anyhow::Result<Vec<_>>>()
        })
        .transpose()?;
    if let (Some(levels), false) = (&severity_filter, plain) {
        println!("🔍 Priority filter: {}", levels.iter().map(|l| format!("{l:?}").to_lowercase()).collect::<Vec<_>>().join(", "));
    }

    let provider = route_model(&config.model);
    let endpoint = config.endpoint_for(provider);
    let llm = build_llm(provider, endpoint)?;

    let host = HostClient::github(HostConfig { base_api: "https://api.github.com".to_string(), token: config.github_token.clone() })?;

    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let profiles = ProfileStore::from_home(std::path::Path::new(&home));
    if let (Some(name), false) = (profile, plain) {
        println!("📋 Using profile: {name}");
    }

    let request = ReviewRequest {
        pr_url: pr_url.to_string(),
        severity_filter,
        profile_name: profile.map(str::to_string),
        agentic,
        return_only: false,
        dry_run: dry_run || plain,
    };
    config.post_as_comment = !(dry_run || plain);

    let pipeline = PrReviewPipeline::new(host, llm, config, Some(&profiles));
    let (state, output) = pipeline.run(request, None).await?;

    if plain {
        println!("{}", output.markdown);
    } else if dry_run {
        println!("\n{}", "=".repeat(60));
        println!("REVIEW COMMENT THAT WOULD BE POSTED:");
        println!("{}", "=".repeat(60));
        println!("{}", output.markdown);
        println!("{}", "=".repeat(60));
    } else {
        match state {
            RunState::Posted => println!("{}", "✅ Review completed and comment posted!".green()),
            _ => println!("{}", output.markdown),
        }
    }
    Ok(())
}

fn build_llm(provider: llm_client::ProviderTag, endpoint: EndpointConfig) -> anyhow::Result<LlmClient> {
    use llm_client::ProviderTag::*;
    Ok(match provider {
        CloudChat => LlmClient::cloud_chat(endpoint)?,
        CloudMessages => LlmClient::cloud_messages(endpoint)?,
        CloudGenerate => LlmClient::cloud_generate(endpoint)?,
        LocalGenerate => LlmClient::local_generate(endpoint)?,
    })
}

pub fn review_cache(action: &str, max_size: Option<f64>) -> anyhow::Result<()> {
    let cache_root = std::env::var("KIT_CACHE_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("repokit-cache"));
    let ttl_hours: u64 = std::env::var("KIT_CACHE_TTL_HOURS").ok().and_then(|v| v.parse().ok()).unwrap_or(24);
    let cache = repo_cache::RepoCache::new(cache_root, ttl_hours);

    match action {
        "status" => {
            let status = cache.status()?;
            if status.entry_count == 0 {
                println!("📭 No cache directory found");
            } else {
                println!("📁 Cache location: {}", status.dir.display());
                println!("📊 Cache size: {:.2} GB", status.size_bytes as f64 / 1024f64.powi(3));
                println!("📦 Cached repositories: {}", status.entry_count);
                println!("⏰ TTL: {} hours", status.ttl_hours);
            }
        }
        "cleanup" => {
            cache.cleanup(max_size)?;
            println!("{}", "✅ Cache cleanup completed".green());
        }
        "clear" => {
            cache.clear()?;
            println!("{}", "✅ Cache cleared".green());
        }
        other => anyhow::bail!("Unknown action: {other}. Use: status, cleanup, clear"),
    }
    Ok(())
}

pub fn review_profile(
    action: &str,
    name: Option<&str>,
    description: Option<&str>,
    file: Option<&std::path::Path>,
    tags: Option<&str>,
    target: Option<&str>,
    format: &str,
) -> anyhow::Result<()> {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let store = ProfileStore::from_home(std::path::Path::new(&home));
    let tag_list = || tags.map(|t| t.split(',').map(|s| s.trim().to_string()).collect::<Vec<_>>()).unwrap_or_default();

    match action {
        "create" => {
            let name = name.ok_or_else(|| anyhow::anyhow!("Profile name is required for create"))?;
            let description = description.ok_or_else(|| anyhow::anyhow!("Profile description is required for create"))?;
            let context = match file {
                Some(f) => std::fs::read_to_string(f)?,
                None => anyhow::bail!("--file is required (interactive context entry is not supported here)"),
            };
            store.create(name, description, &context, tag_list())?;
            println!("{}", format!("✅ Created profile '{name}'").green());
        }
        "list" => {
            let profiles = store.list()?;
            if profiles.is_empty() {
                println!("📭 No profiles found");
                return Ok(());
            }
            match format {
                "json" => println!("{}", serde_json::to_string_pretty(&profiles)?),
                "names" => profiles.iter().for_each(|p| println!("{}", p.name)),
                _ => {
                    println!("{:<24} {:<40} {}", "Name", "Description", "Tags");
                    for p in &profiles {
                        println!("{:<24} {:<40} {}", p.name, p.description, p.tags.join(", "));
                    }
                }
            }
        }
        "show" => {
            let name = name.ok_or_else(|| anyhow::anyhow!("Profile name is required for show"))?;
            let p = store.show(name)?;
            println!("📋 Profile: {}", p.name);
            println!("📝 Description: {}", p.description);
            if !p.tags.is_empty() {
                println!("🏷️  Tags: {}", p.tags.join(", "));
            }
            println!("📅 Created: {}", p.created_at);
            println!("📅 Updated: {}", p.updated_at);
            println!("\n📄 Context:");
            println!("{}", "-".repeat(50));
            println!("{}", p.context);
        }
        "edit" => {
            let name = name.ok_or_else(|| anyhow::anyhow!("Profile name is required for edit"))?;
            let context = file.map(std::fs::read_to_string).transpose()?;
            store.edit(name, description, context.as_deref(), tags.map(|_| tag_list()))?;
            println!("{}", format!("✅ Updated profile '{name}'").green());
        }
        "delete" => {
            let name = name.ok_or_else(|| anyhow::anyhow!("Profile name is required for delete"))?;
            store.delete(name)?;
            println!("{}", format!("✅ Deleted profile '{name}'").green());
        }
        "copy" => {
            let name = name.ok_or_else(|| anyhow::anyhow!("--name is required for copy"))?;
            let target = target.ok_or_else(|| anyhow::anyhow!("--target is required for copy"))?;
            store.copy(name, target)?;
            println!("{}", format!("✅ Copied profile '{name}' to '{target}'").green());
        }
        "export" => {
            let name = name.ok_or_else(|| anyhow::anyhow!("--name is required for export"))?;
            let file = file.ok_or_else(|| anyhow::anyhow!("--file is required for export"))?;
            store.export(name, file)?;
            println!("{}", format!("✅ Exported profile '{name}' to '{}'", file.display()).green());
        }
        "import" => {
            let file = file.ok_or_else(|| anyhow::anyhow!("--file is required for import"))?;
            let stem = name.map(str::to_string).unwrap_or_else(|| {
                file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "imported".to_string())
            });
            let p = store.import(file, &stem)?;
            println!("{}", format!("✅ Imported profile '{}' from '{}'", p.name, file.display()).green());
        }
        other => anyhow::bail!("Unknown action: {other}. Valid actions: create, list, show, edit, delete, copy, export, import"),
    }
    Ok(())
}
