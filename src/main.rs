//! CLI entry point for accent-sync.

mod cli;

use accent_sync::agent::ColorSyncAgent;
use accent_sync::color::normalize;
use accent_sync::config::{load_config, Config};
use accent_sync::error::SyncError;
use accent_sync::script::{PatchOutcome, ScriptPatcher};
use accent_sync::settings::{GSettings, SettingsBackend};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Env var holding a `tracing` filter directive; overrides `-v`.
const LOG_ENV: &str = "ACCENT_SYNC_LOG";

enum WatchEvent {
    Changed(Option<String>),
    Shutdown,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::Args::parse();
    init_tracing(args.verbose);

    // Resolving a raw value needs neither config nor settings.
    if let Some(cli::Command::Resolve { value }) = &args.command {
        println!("{}", normalize(Some(value)));
        return;
    }

    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    // Apply CLI overrides.
    if let Some(script) = &args.script {
        config.script.path = script.clone();
    }
    if let Some(dir) = &args.config_dir {
        config.script.config_dir = dir.clone();
    }

    let patcher =
        ScriptPatcher::new(config.script.path.clone(), config.script.layout()).with_dry_run(args.dry_run);

    let result = match args.command {
        None => run_watch(&config, patcher, false).await,
        Some(cli::Command::Watch { keep }) => run_watch(&config, patcher, keep).await,
        Some(cli::Command::Apply { color, value }) => {
            let color = match (color, value) {
                (Some(color), _) => Ok(color),
                (None, Some(value)) => Ok(normalize(Some(&value))),
                (None, None) => settings_backend(&config)
                    .get_string(&config.settings.key)
                    .map(|value| normalize(Some(&value)))
                    .map_err(SyncError::from),
            };
            color.and_then(|color| {
                let outcome = patcher.apply(color)?;
                report(outcome, &patcher, &format!("-> {color}"));
                Ok(())
            })
        }
        Some(cli::Command::Restore) => match patcher.restore() {
            Ok(outcome) => {
                report(outcome, &patcher, "-> defaults");
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
        Some(cli::Command::Resolve { .. }) => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Follow the setting until a shutdown signal or the stream ends.
async fn run_watch(config: &Config, patcher: ScriptPatcher, keep: bool) -> Result<(), SyncError> {
    let mut agent = ColorSyncAgent::new(settings_backend(config), &config.settings.key, patcher);
    agent.enable();
    if !agent.is_enabled() {
        // Leave the script alone: nothing was changed yet.
        return Err(SyncError::NotEnabled);
    }

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        let event = tokio::select! {
            change = agent.next_change() => WatchEvent::Changed(change),
            () = &mut shutdown => WatchEvent::Shutdown,
        };
        match event {
            WatchEvent::Changed(Some(value)) => {
                debug!(%value, "accent color changed");
                agent.on_accent_changed();
            }
            WatchEvent::Changed(None) => {
                warn!("settings stream ended");
                break;
            }
            WatchEvent::Shutdown => {
                info!("shutdown requested");
                break;
            }
        }
    }

    if keep {
        agent.detach();
    } else {
        agent.disable();
    }
    Ok(())
}

fn settings_backend(config: &Config) -> GSettings {
    GSettings::new(&config.settings.gsettings_bin, &config.settings.schema)
}

fn report(outcome: PatchOutcome, patcher: &ScriptPatcher, target: &str) {
    let path = patcher.path().display();
    match outcome {
        PatchOutcome::Missing => println!("missing: {path}"),
        PatchOutcome::Unchanged => println!("unchanged: {path} {target}"),
        PatchOutcome::Updated => println!("updated: {path} {target}"),
    }
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
                return;
            }
            Err(e) => warn!(error = %e, "cannot install SIGTERM handler"),
        }
    }
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
