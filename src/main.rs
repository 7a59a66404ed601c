//! Paste API server entrypoint.

use sharenotes::{
    config::{env_flag_enabled, Config},
    resolve_bind_address, run_sweep, serve_router, spawn_expiry_sweeper,
    storage::open_storage,
    AppState, DEFAULT_PORT,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    sweep: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--sweep" => flags.sweep = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sharenotes=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let storage = open_storage(&config)?;

    if cli_flags.sweep {
        let removed = run_sweep(storage.as_ref())?;
        println!("Removed {} expired paste(s)", removed);
        return Ok(());
    }

    let sweeper = config
        .sweep_interval()
        .map(|period| spawn_expiry_sweeper(storage.clone(), period));
    if sweeper.is_none() {
        tracing::warn!("SWEEP_INTERVAL_SECS=0; expired pastes are only hidden, never removed");
    }

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let state = AppState::new(config, storage.clone());
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("ShareNotes running at http://{}", actual_addr);

    let serve_result = serve_router(listener, state, allow_public, shutdown_signal()).await;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    // Failures are already logged by run_sweep.
    if run_sweep(storage.as_ref()).is_ok() {
        tracing::info!("Final expiry sweep complete");
    }

    serve_result?;
    Ok(())
}

fn print_help() {
    println!("ShareNotes Server\n");
    println!("Usage: sharenotes [OPTIONS]\n");
    println!("Options:");
    println!("  --sweep           Remove expired pastes once and exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  STORAGE_TYPE      Backend: memory or redb (default: redb)");
    println!("  DB_PATH           Database file (default: ~/.cache/sharenotes/pastes.redb)");
    println!(
        "  PORT              Server port (default: {})",
        DEFAULT_PORT
    );
    println!("  WORKER_ID         Snowflake worker id, 0-1023 (default: 0)");
    println!("  MAX_CONTENT_BYTES Maximum paste size in bytes (default: 65536)");
    println!("  SWEEP_INTERVAL_SECS  Seconds between expiry sweeps, 0 disables (default: 60)");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin");
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_flags, CliFlags};

    fn args(values: &[&str]) -> Vec<String> {
        std::iter::once("sharenotes")
            .chain(values.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parse_cli_flags_accepts_known_options() {
        assert_eq!(
            parse_cli_flags(&args(&[])).expect("flags"),
            CliFlags::default()
        );
        let flags = parse_cli_flags(&args(&["--sweep"])).expect("flags");
        assert!(flags.sweep && !flags.help);
        let flags = parse_cli_flags(&args(&["-h", "--sweep"])).expect("flags");
        assert!(flags.sweep && flags.help);
    }

    #[test]
    fn parse_cli_flags_rejects_unknown_input() {
        let err = parse_cli_flags(&args(&["--force"])).expect_err("unknown option");
        assert!(err.to_string().contains("--force"));
        let err = parse_cli_flags(&args(&["extra"])).expect_err("positional");
        assert!(err.to_string().contains("extra"));
    }
}
