//! Host-side helper: `cargo run` builds the wasm package into `static/pkg`
//! and serves `static/` locally so the background can be viewed in a browser.
//!
//! Set `DOTFIELD_PORT` to change the port (default 8000).

use std::env;
use std::process::{Command, ExitCode, Stdio};

const DEFAULT_PORT: u16 = 8000;

fn build_pkg() -> Result<(), String> {
    println!("Building wasm pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => Ok(()),
        Ok(st) => Err(format!("wasm-pack exited with {st}")),
        Err(_) => Err(
            "wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/)".to_string(),
        ),
    }
}

fn port() -> u16 {
    env::var("DOTFIELD_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

fn main() -> ExitCode {
    if let Err(err) = build_pkg() {
        eprintln!("{err}");
        if !std::path::Path::new("static/pkg").exists() {
            return ExitCode::FAILURE;
        }
        eprintln!("Serving the previously built pkg.");
    }

    let port = port();
    println!("Serving static/ at http://127.0.0.1:{port} (Ctrl-C to stop) …");
    let status = Command::new("python3")
        .args(["-m", "http.server", &port.to_string(), "--directory", "static"])
        .stdout(Stdio::null())
        .status();

    match status {
        Ok(st) if st.success() => ExitCode::SUCCESS,
        Ok(st) => {
            eprintln!("http server exited with {st}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("failed to start http server: {err}");
            ExitCode::FAILURE
        }
    }
}
