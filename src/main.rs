use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use toolkit_assist::asl::{is_document_valid, AslDocument, AslFormat};
use toolkit_assist::cache::{AssetCache, HttpFetcher, JsonStateStore, TokioFileSystem};
use toolkit_assist::cli::{self, AssetAction, Command, DefinitionFormat};
use toolkit_assist::config::AssetConfig;
use toolkit_assist::logging::{self, Verbosity};
use toolkit_assist::policy;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));
    args.validate().context("Invalid arguments")?;

    match &args.command {
        Command::Assets { action } => run_assets(*action, args.config.as_deref()).await,
        Command::Roles { path } => run_roles(path),
        Command::Validate { path, format } => run_validate(path, *format),
    }
}

async fn run_assets(action: AssetAction, config_path: Option<&Path>) -> Result<()> {
    let config = AssetConfig::load_or_default(config_path)?;
    let state = JsonStateStore::open(config.state_file())
        .with_context(|| format!("Cannot open state file in {}", config.cache_dir.display()))?;

    let fs = Arc::new(TokioFileSystem);
    let cache = AssetCache::new(
        config.asset_spec(),
        fs.clone(),
        Arc::new(HttpFetcher::new()),
        Arc::new(state),
    )
    .with_dir_maker(fs);

    match action {
        AssetAction::Refresh => {
            let refresh = cache
                .update_cache(&config.sources())
                .await
                .context("Failed to refresh graph assets")?;
            println!("css:    {:?}", refresh.css);
            println!("script: {:?}", refresh.script);
        }
        AssetAction::Check => {
            cache
                .confirm_cache_exists()
                .await
                .context("Graph assets are not cached; run `assets refresh`")?;
            println!("Graph assets present in {}", config.cache_dir.display());
        }
    }

    Ok(())
}

fn run_roles(path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read file: {}", path.display()))?;
    let roles = policy::parse_role_list(&content)
        .with_context(|| format!("Not a role list: {}", path.display()))?;

    let matching = policy::step_functions_roles(&roles)?;
    tracing::info!(total = roles.len(), matching = matching.len(), "inspected roles");

    for role in matching {
        println!("{}\t{}", role.role_name, role.arn);
    }
    Ok(())
}

fn run_validate(path: &Path, format: Option<DefinitionFormat>) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read file: {}", path.display()))?;
    let format = format.map_or_else(|| AslFormat::from_path(path), AslFormat::from);
    let document = AslDocument::new(format);

    if is_document_valid(&text, &document) {
        println!("{}: valid", path.display());
        return Ok(());
    }

    for diagnostic in document.diagnostics(&text) {
        println!("{}: {diagnostic}", path.display());
    }
    anyhow::bail!("{} is not a valid state machine definition", path.display())
}
