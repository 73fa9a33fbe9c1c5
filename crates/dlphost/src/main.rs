//! DLP native messaging host.
//!
//! stdout carries the framed protocol; all diagnostics go to stderr via
//! tracing. Policy and audit locations are discovered relative to the
//! executable; a missing or broken policy degrades to allow-all rather
//! than refusing to start.

use std::path::PathBuf;
use std::process::ExitCode;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use dlphost::audit::AuditLogger;
use dlphost::discovery;
use dlphost::host::HostLoop;
use dlphost::policy::{self, PolicyEngine};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let exe_dir = discovery::exe_directory().unwrap_or_else(|| PathBuf::from("."));

    let engine = match discovery::find_policy_file_from(&exe_dir) {
        Some(path) => match policy::load_from_file(&path) {
            Ok(config) => {
                let engine = PolicyEngine::new(config);
                tracing::info!(
                    path = %path.display(),
                    policy_id = engine.policy_id(),
                    policy_version = engine.policy_version(),
                    "policy loaded"
                );
                engine
            }
            Err(err) => {
                tracing::warn!(code = err.code(), %err, "policy load failed, degrading to allow-all");
                PolicyEngine::allow_all()
            }
        },
        None => {
            tracing::warn!("no policy.json found, using allow-all");
            PolicyEngine::allow_all()
        }
    };

    let log_dir = discovery::find_log_directory_from(&exe_dir);
    tracing::info!(dir = %log_dir.display(), "audit log directory");
    let audit = AuditLogger::new(&log_dir);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let host = HostLoop::new(engine, audit);
    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();

    tracing::info!("host started, waiting for messages on stdin");
    match host.run(&mut stdin, &mut stdout, shutdown_rx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = err.code(), %err, "host loop failed");
            ExitCode::FAILURE
        }
    }
}
