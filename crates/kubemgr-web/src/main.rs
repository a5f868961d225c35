mod access_log;
mod handlers;
mod openapi;
mod response;
mod router;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use kubemgr_core::{env, store};

use state::AppConfig;

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(name = "kubemgr-web", about = "kubemgr namespaces web UI", version = kubemgr_core::VERSION)]
struct Args {
    /// Listen port.
    #[arg(long, default_value = "3333", env = "MEDIA_SERVICE_PORT")]
    port: u16,

    /// Listen host.
    #[arg(long, default_value = "0.0.0.0", env = "KUBEMGR_HOST")]
    host: String,

    /// Directory holding generated configs, one sub-directory per namespace.
    #[arg(long, default_value = "out", env = "KUBEMGR_OUT_DIR")]
    out_dir: PathBuf,

    /// Service name shown in the page title and logs.
    #[arg(long, default_value = "kubernetes-manager", env = "KUBEMGR_NAME")]
    name: String,
}

// ============================================================
// Main
// ============================================================

fn main() {
    // .env values must be in the environment before clap reads its env fallbacks.
    let env_result = env::load_default(env::Options {
        overwrite: false,
        expand: true,
    });

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kubemgr_web=info,kubemgr_core=info".into()),
        )
        .init();

    match env_result {
        Ok(values) => info!(count = values.len(), "env files loaded"),
        Err(e) => {
            error!(error = %e, "failed to load env files");
            process::exit(1);
        }
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            process::exit(1);
        }
    };
    runtime.block_on(async_main(args));
}

async fn async_main(args: Args) {
    if let Err(e) = store::ensure_out(&args.out_dir) {
        error!(error = %e, "failed to prepare output directory");
        process::exit(1);
    }

    let addr: SocketAddr = match format!("{}:{}", args.host, args.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(host = %args.host, port = args.port, error = %e, "invalid listen address");
            process::exit(1);
        }
    };

    let state = Arc::new(AppConfig {
        name: args.name,
        out_dir: args.out_dir,
    });

    info!(
        version = kubemgr_core::VERSION,
        name = %state.name,
        out_dir = %state.out_dir.display(),
        pid = process::id(),
        "starting"
    );

    let app = router::build_router(state).into_make_service_with_connect_info::<SocketAddr>();

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            process::exit(1);
        }
    };
    info!(%addr, "listening on http://localhost:{}", addr.port());

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        process::exit(1);
    }
    info!("server stopped");
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}
