// src/lib.rs

pub mod cli;
pub mod config;
pub mod entry;
pub mod errors;
pub mod glob;
pub mod host;
pub mod logging;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{entries_factory, load_and_validate};
use crate::host::{EntriesPlugin, TracingCompilation};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the config-driven entries factory
/// - the lifecycle plugin (option declaration → pre-run / watch loop → compile)
/// - Ctrl-C handling in watch mode
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let root = resolve_context(&config_path, cfg.context.as_deref());
    info!(context = %root.display(), "resolved root context");

    let factory = entries_factory(cfg.dynamic.clone());
    let mut plugin = EntriesPlugin::new(root.clone(), factory);
    plugin.on_option_declaration(&root, cfg.static_entries.clone());

    let compilation = TracingCompilation;

    if args.once {
        plugin.on_pre_run().await?;
        print_entries(&plugin);
        plugin.on_compile(&compilation).await?;
        return Ok(());
    }

    loop {
        plugin.on_watch_run().await?;
        print_entries(&plugin);
        plugin.on_compile(&compilation).await?;

        // Decide the next step outside the select so the invalidation future
        // releases its borrow of the plugin first.
        let next = tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    eprintln!("failed to listen for Ctrl+C: {err}");
                }
                WatchStep::Shutdown
            }
            settled = plugin.wait_invalidated() => match settled {
                Ok(()) => WatchStep::Invalidated,
                Err(_closed) => WatchStep::Closed,
            }
        };

        match next {
            WatchStep::Shutdown => {
                info!("shutdown requested, closing watch session");
                plugin.on_watch_close();
                break;
            }
            WatchStep::Invalidated => {
                info!("entries invalidated, re-resolving");
            }
            WatchStep::Closed => {
                info!("watch session closed, stopping");
                break;
            }
        }
    }

    Ok(())
}

enum WatchStep {
    Shutdown,
    Invalidated,
    Closed,
}

/// Figure out the absolute root context.
///
/// `context` from the config is resolved against the directory containing
/// the config file; absent, that directory itself is the root.
fn resolve_context(config_path: &Path, context: Option<&Path>) -> PathBuf {
    let base = config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    let root = match context {
        Some(c) if c.is_absolute() => c.to_path_buf(),
        Some(c) => base.join(c),
        None => base,
    };

    root.canonicalize().unwrap_or(root) // best-effort
}

/// Print the merged entry set, dry-run style.
fn print_entries<F>(plugin: &EntriesPlugin<F>) {
    let entries: Vec<_> = plugin.entries().collect();
    println!("entrywatch: {} entries", entries.len());
    for entry in entries {
        println!("  - {}", entry.name);
        println!("      context: {}", entry.context.display());
        if !entry.import.is_empty() {
            println!("      import: {:?}", entry.import);
        }
        if let Some(ref deps) = entry.depend_on {
            println!("      depend_on: {:?}", deps);
        }
        if !entry.options.is_empty() {
            println!("      options: {} passthrough field(s)", entry.options.len());
        }
    }
}
