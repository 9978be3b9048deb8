mod aggregate;
mod backup;
mod config;
mod controller;
mod db;
mod ipc;
mod render;
mod store;
mod validate;

use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(filter: &str) {
    // stdout carries the IPC stream, so diagnostics go to stderr.
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    let (settings, config_error) = config::load_settings();
    init_logging(&settings.log_filter);
    info!(version = env!("CARGO_PKG_VERSION"), "schedulerd starting");
    if let Some(e) = config_error {
        warn!(file = config::CONFIG_FILE, error = %e, "ignoring config file");
    }

    let startup_workspace = settings.workspace.clone();
    let mut state = ipc::AppState::new(settings);
    if let Some(path) = startup_workspace {
        if let Err(e) = ipc::select_workspace(&mut state, &path) {
            let error = format!("{e:#}");
            warn!(workspace = %path.to_string_lossy(), %error, "configured workspace unavailable");
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    info!("stdin closed, exiting");
}
