mod config;
mod controller;
mod db;
mod error;
mod forms;
mod gateway;
mod ipc;
mod model;
mod normalize;
mod session;

use std::io::{self, BufRead, Write};

use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // stdout is the protocol channel; diagnostics go to stderr.
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = config::Config::load();
    let mut state = match ipc::AppState::new(&config) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to initialize: {e}");
            std::process::exit(1);
        }
    };

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
                // Can't reply with an id we never parsed; best effort.
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
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
}
