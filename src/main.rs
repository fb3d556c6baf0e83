mod cli;

use tvreel::{
    catalog::{Catalog, VideoItem},
    config,
    resume::{self, JsonFileStore, ResumeStore},
    session::{self, Command, Session},
};
use tvreel_common::time::format_clock;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use cli::{Cli, Commands, ResumeAction};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "tvreel=trace".to_string()
        } else {
            "tvreel=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List { json } => list(cli.config.as_deref(), json),
        Commands::Browse { script, ephemeral } => {
            browse(cli.config.as_deref(), script.as_deref(), ephemeral)
        }
        Commands::Resume { action } => resume_action(cli.config.as_deref(), action),
        Commands::Validate { file } => validate_config(file.as_deref().or(cli.config.as_deref())),
        Commands::Version => {
            println!("tvreel {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn open_store(config: &config::Config) -> Result<ResumeStore> {
    let path = config.storage.namespace_path();
    let store = JsonFileStore::open(&path)
        .with_context(|| format!("Failed to open resume store: {:?}", path))?;
    tracing::info!("Resume store at {:?}", path);
    Ok(ResumeStore::new(Arc::new(store)))
}

/// One entry of `list --json`.
#[derive(Serialize)]
struct ListRow<'a> {
    #[serde(flatten)]
    item: &'a VideoItem,
    resume_ms: u64,
}

fn list(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let store = open_store(&config)?;
    let catalog = Catalog::bundled(&config.library);

    if json {
        let rows: Vec<ListRow<'_>> = catalog
            .items()
            .iter()
            .map(|item| ListRow {
                item,
                resume_ms: store.load(&resume::key_for(item.uri())),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for (i, item) in catalog.items().iter().enumerate() {
        let saved = store.load(&resume::key_for(item.uri()));
        print!("{}. {} <{}>", i + 1, item.title(), item.uri());
        if saved > 0 {
            print!(" [resume at {}]", format_clock(saved));
        }
        println!();
    }

    Ok(())
}

fn browse(config_path: Option<&Path>, script: Option<&Path>, ephemeral: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let store = if ephemeral {
        ResumeStore::in_memory()
    } else {
        open_store(&config)?
    };

    let mut session = Session::new(&config, store);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for line in session.render() {
        writeln!(out, "{}", line)?;
    }

    match script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script: {:?}", path))?;
            let commands = session::parse_script(&text)?;
            for line in session.run(&commands) {
                writeln!(out, "{}", line)?;
            }
        }
        None => {
            // Interactive: one command per line, bad lines are reported and skipped
            for line in std::io::stdin().lock().lines() {
                let line = line?;
                let line = line.split('#').next().unwrap_or_default().trim();
                if line.is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => {
                        for line in session.apply(command) {
                            writeln!(out, "{}", line)?;
                        }
                    }
                    Err(e) => writeln!(out, "error: {}", e)?,
                }
                out.flush()?;
                if session.is_finished() {
                    break;
                }
            }
        }
    }

    if !session.is_finished() {
        for line in session.apply(Command::Quit) {
            writeln!(out, "{}", line)?;
        }
    }

    Ok(())
}

fn resume_action(config_path: Option<&Path>, action: ResumeAction) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    match action {
        ResumeAction::Key { uri } => {
            println!("{}", resume::key_for(&uri));
        }
        ResumeAction::Show { uri } => {
            let store = open_store(&config)?;
            let key = resume::key_for(&uri);
            let saved = store.load(&key);
            if saved == 0 {
                println!("{}: no saved position", key);
            } else {
                println!("{}: {} ({}ms)", key, format_clock(saved), saved);
            }
        }
        ResumeAction::Clear { uri } => {
            let store = open_store(&config)?;
            let key = resume::key_for(&uri);
            store.clear(&key);
            println!("{}: cleared", key);
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Media base: {}", config.library.resource_base);
            println!("  Resume store: {:?}", config.storage.namespace_path());
            println!(
                "  Resume prompt from: {}ms, finished within: {}ms, seek step: {}ms",
                config.playback.resume_min_ms,
                config.playback.clear_if_within_ms,
                config.playback.seek_step_ms
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Resume store: {:?}", config.storage.namespace_path());
        }
    }

    Ok(())
}
