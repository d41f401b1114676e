//! MKG CLI — inspect and watch the wiki-link graph of a note vault.
//!
//! Commands: paths, resolve, links, backlinks, graph, show, stats, watch

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use mkg_graph::{GraphService, ResolverPolicy};
use mkg_vault::watcher::VaultWatcher;
use mkg_vault::Vault;

#[derive(Parser)]
#[command(name = "mkg")]
#[command(version)]
#[command(about = "Wiki-link graph index for a markdown note vault")]
struct Cli {
    /// Vault root directory.
    #[arg(long, default_value = ".", global = true)]
    vault: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Every path registered for a note name
    Paths { name: String },
    /// The canonical path for a note name
    Resolve { name: String },
    /// Outgoing links of a note
    Links { name: String },
    /// Notes linking to a note
    Backlinks {
        name: String,
        /// Include linkers under the low-priority folder
        #[arg(long)]
        include_private: bool,
    },
    /// Notes within N hops of a note, with distance and direction
    Graph {
        name: String,
        #[arg(long, default_value_t = 2)]
        depth: u32,
        /// Include linkers under the low-priority folder
        #[arg(long)]
        include_private: bool,
    },
    /// Frontmatter and body of the note a name resolves to
    Show { name: String },
    /// Vault-wide note and link counts
    Stats,
    /// Keep the index live until interrupted, logging every change
    Watch,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let vault = Vault::open(&cli.vault);
    let (service, sink) = GraphService::start(Vault::open(&cli.vault), ResolverPolicy::default())
        .with_context(|| format!("failed to index vault at {}", cli.vault.display()))?;

    match cli.command {
        Commands::Paths { name } => print_json(&service.all_paths(&name))?,
        Commands::Resolve { name } => print_json(&service.resolve(&name))?,
        Commands::Links { name } => print_json(&service.forward_links(&name))?,
        Commands::Backlinks {
            name,
            include_private,
        } => print_json(&service.backlinks(&name, include_private))?,
        Commands::Graph {
            name,
            depth,
            include_private,
        } => print_json(&service.neighborhood(&name, depth, include_private))?,
        Commands::Show { name } => {
            let Some(path) = service.resolve(&name) else {
                anyhow::bail!("no note named {name:?}");
            };
            let note = vault
                .load_note(&path)
                .with_context(|| format!("failed to load note {path:?}"))?;
            print_json(&serde_json::json!({
                "path": note.path,
                "name": note.name,
                "frontmatter": note.frontmatter,
                "body": note.body,
            }))?;
        }
        Commands::Stats => print_json(&serde_json::json!({
            "notes": service.note_count(),
            "paths": service.path_count(),
            "links": service.link_count(),
        }))?,
        Commands::Watch => {
            let _watcher = VaultWatcher::start(vault.root(), vault.config(), move |event| {
                tracing::info!("{event:?}");
                sink.push(event);
            })
            .context("failed to start vault watcher")?;
            tracing::info!("watching {}", cli.vault.display());
            loop {
                std::thread::park();
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
