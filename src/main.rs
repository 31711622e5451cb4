//! StickVault - page-scoped sticky notes with a cross-page inventory
//!
//! CLI over the persisted note corpus: inspect and mutate the inventory of
//! hidden notes, and export/import the whole namespace as a portable file.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stickvault::{
    config::StickVaultConfig,
    inventory::InventoryService,
    messenger::ContextRouter,
    storage::FileGateway,
    transfer::{export_file_name, ImportExportService},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stickvault")]
#[command(version)]
#[command(about = "Page-scoped sticky notes with a cross-page inventory")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "STICKVAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Assume "yes" on confirmation prompts
    #[arg(short = 'y', long)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the inventory of hidden notes
    Inventory {
        #[command(subcommand)]
        command: InventoryCommands,
    },

    /// Export all notes to a portable JSON file
    Export {
        /// Output path (default: ./sticky-notes-<date>.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Import a portable JSON file, replacing ALL current notes
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[derive(Subcommand)]
enum InventoryCommands {
    /// List hidden notes
    List {
        /// Filter by a case-insensitive search term
        #[arg(long)]
        search: Option<String>,
    },

    /// Restore the note at INDEX onto the active page
    Restore { index: usize },

    /// Permanently delete the note at INDEX
    Delete { index: usize },

    /// Permanently delete all hidden notes
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("stickvault={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        let content = std::fs::read_to_string(config_path)?;
        toml::from_str(&content)?
    } else {
        StickVaultConfig::default()
    };
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    let gateway = Arc::new(FileGateway::new(&config.storage.data_dir));
    let router = Arc::new(ContextRouter::new());

    match cli.command {
        Commands::Inventory { command } => {
            let service = InventoryService::new(gateway, router);
            run_inventory(service, command, cli.yes).await?;
        }
        Commands::Export { out } => {
            let service = ImportExportService::new(gateway, router);
            run_export(service, out).await?;
        }
        Commands::Import { file } => {
            let service = ImportExportService::new(gateway, router);
            run_import(service, &file, cli.yes).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_inventory(
    service: InventoryService,
    command: InventoryCommands,
    assume_yes: bool,
) -> Result<()> {
    match command {
        InventoryCommands::List { search } => {
            let entries = match search {
                Some(term) => service.search(&term).await?,
                None => service.list().await?.into_iter().enumerate().collect(),
            };
            if entries.is_empty() {
                println!("No hidden notes in inventory.");
                return Ok(());
            }
            for (index, entry) in entries {
                let label = if entry.title.is_empty() {
                    &entry.content
                } else {
                    &entry.title
                };
                println!(
                    "[{}] {}  (from: {}, hidden: {})",
                    index,
                    label,
                    entry.origin_url,
                    entry.hidden_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        InventoryCommands::Restore { index } => {
            let entry = service.restore(index).await?;
            println!("Restored '{}' (hidden from {})", entry.id, entry.origin_url);
        }
        InventoryCommands::Delete { index } => {
            if !confirm(
                "Are you sure you want to permanently delete this note?",
                assume_yes,
            )? {
                println!("Delete canceled");
                return Ok(());
            }
            let entry = service.delete(index).await?;
            println!("Deleted '{}'", entry.id);
        }
        InventoryCommands::Clear => {
            if !confirm(
                "Are you sure you want to permanently delete all hidden notes?",
                assume_yes,
            )? {
                println!("Clear canceled");
                return Ok(());
            }
            service.clear().await?;
            println!("Inventory cleared");
        }
    }
    Ok(())
}

async fn run_export(service: ImportExportService, out: Option<PathBuf>) -> Result<()> {
    let document = service.export().await?;
    let path =
        out.unwrap_or_else(|| PathBuf::from(export_file_name(chrono::Utc::now().date_naive())));
    std::fs::write(&path, serde_json::to_string_pretty(&document)?)?;
    println!("Exported {} keys to {}", document.len(), path.display());
    Ok(())
}

async fn run_import(service: ImportExportService, file: &Path, assume_yes: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let document: serde_json::Value = serde_json::from_str(&content)?;

    let preview = service.preview(&document)?;
    println!(
        "Import contains {} notes across {} pages and {} hidden notes.",
        preview.note_count, preview.page_count, preview.inventory_count
    );
    if !confirm(
        "This will overwrite your current notes. Continue?",
        assume_yes,
    )? {
        println!("Import canceled");
        return Ok(());
    }

    let outcome = service.import(document).await?;
    println!("Imported {} keys successfully", outcome.keys_written);
    Ok(())
}

fn show_config(config: Option<&StickVaultConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}

fn confirm(prompt: &str, assume_yes: bool) -> std::io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "Yes"))
}
