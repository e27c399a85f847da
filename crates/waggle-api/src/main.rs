//! Waggle coordination daemon entry point.
//!
//! Binary name: `waggled`
//!
//! Parses CLI arguments, loads configuration, then either starts the
//! coordination server or runs a one-shot command.

mod cli;
mod config_loader;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing::info;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "waggled", &mut std::io::stdout());
        return Ok(());
    }

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,waggle_core=debug,waggle_api=debug",
        _ => "trace",
    };
    let enable_otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    waggle_observe::tracing_setup::init_tracing(enable_otel, filter)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let config = config_loader::load_config(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve { listen, .. } => {
            let mut config = config;
            if let Some(listen) = listen {
                config.server.listen = listen;
            }

            let (app_state, tasks) = AppState::init(&config);

            let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
            info!(addr = %config.server.listen, "waggle coordinator listening");

            let router = http::router::build_router(app_state);
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            info!("server stopped, draining background tasks");
            tasks.shutdown().await;
            waggle_observe::tracing_setup::shutdown_tracing();
        }

        Commands::CheckConfig => {
            println!("{}", toml::to_string_pretty(&config)?);
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
