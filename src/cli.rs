use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::asl::AslFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DefinitionFormat {
    Json,
    Yaml,
}

impl From<DefinitionFormat> for AslFormat {
    fn from(format: DefinitionFormat) -> Self {
        match format {
            DefinitionFormat::Json => AslFormat::Json,
            DefinitionFormat::Yaml => AslFormat::Yaml,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum AssetAction {
    /// Download the graph assets if missing or out of date
    Refresh,
    /// Fail unless both graph assets are present
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Manage the cached state machine graph assets
    Assets {
        #[command(subcommand)]
        action: AssetAction,
    },

    /// List roles whose trust policy allows Step Functions
    Roles {
        /// Role list JSON (`aws iam list-roles` output or a bare array)
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Check that a state machine definition is well formed
    Validate {
        /// ASL definition file
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Definition format (detected from the extension if not specified)
        #[arg(short, long)]
        format: Option<DefinitionFormat>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "toolkit-assist")]
#[command(about = "Step Functions authoring helpers", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Asset cache config file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref config) = self.config {
            if !config.is_file() {
                anyhow::bail!("Config file does not exist: {}", config.display());
            }
        }
        match &self.command {
            Command::Roles { path } | Command::Validate { path, .. } => validate_file(path),
            Command::Assets { .. } => Ok(()),
        }
    }
}

pub fn validate_file(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("Path is not a file: {}", path.display());
    }

    std::fs::metadata(path).with_context(|| format!("Cannot read file: {}", path.display()))?;
    Ok(())
}
