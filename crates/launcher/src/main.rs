//! Desktop shell for the book catalog.
//!
//! Spawns the API server as a child process, waits for it to report
//! healthy (an explicit readiness poll, not a fixed sleep), then opens
//! the catalog page in the default browser. The child is killed when
//! the shell exits.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::process::{Child, Command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often the readiness poll retries.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Poll attempts before giving up on the server (total 10 s).
const MAX_POLL_ATTEMPTS: u32 = 50;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maktaba_launcher=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .context("PORT must be a valid u16")?;
    let base_url = format!("http://localhost:{port}");

    let mut server = spawn_server()?;
    tracing::info!(pid = ?server.id(), "API server spawned");

    match wait_until_healthy(&base_url).await {
        Ok(()) => {
            tracing::info!(%base_url, "Server healthy, opening catalog page");
            if let Err(e) = open_in_browser(&base_url) {
                tracing::warn!(error = %e, "Could not open browser automatically");
            }
        }
        Err(e) => {
            let _ = server.kill().await;
            return Err(e);
        }
    }

    // Keep running until the server exits or the user interrupts us; in
    // both cases make sure the child does not outlive the shell.
    tokio::select! {
        status = server.wait() => {
            let status = status.context("failed waiting on server process")?;
            tracing::info!(%status, "API server exited");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, stopping API server");
            let _ = server.kill().await;
        }
    }

    Ok(())
}

/// Spawn the API server binary, looked up next to this executable first
/// and falling back to PATH.
fn spawn_server() -> Result<Child> {
    let sibling = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.join("maktaba-api")));

    let program = match sibling {
        Some(path) if path.exists() => path,
        _ => "maktaba-api".into(),
    };

    Command::new(&program)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn API server at {}", program.display()))
}

/// Poll `GET /health` until the server answers 200 or attempts run out.
async fn wait_until_healthy(base_url: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;
    let url = format!("{base_url}/health");

    for attempt in 1..=MAX_POLL_ATTEMPTS {
        match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => return Ok(()),
            Ok(response) => {
                tracing::debug!(attempt, status = %response.status(), "Server not ready yet");
            }
            Err(e) => {
                tracing::debug!(attempt, error = %e, "Server not reachable yet");
            }
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    bail!("server did not become healthy within {MAX_POLL_ATTEMPTS} attempts");
}

/// Open a URL with the platform's default handler.
fn open_in_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "linux")]
    let mut command = {
        let mut c = std::process::Command::new("xdg-open");
        c.arg(url);
        c
    };
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = std::process::Command::new("open");
        c.arg(url);
        c
    };
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", url]);
        c
    };

    command.spawn().map(|_| ())
}
