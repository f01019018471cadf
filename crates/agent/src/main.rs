#![forbid(unsafe_code)]

mod cli;
mod startup;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use domain::message::entity::Envelope;
use infrastructure::config::AgentConfig;
use infrastructure::constants::TICK_INTERVAL_MS;
use infrastructure::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::parse();

    let mut config = AgentConfig::load(std::path::Path::new(&cli.config))
        .with_context(|| format!("loading config from {}", cli.config))?;
    if let Some(level) = cli.log_level {
        config.agent.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.agent.log_format = format;
    }
    init_logging(config.agent.log_level, config.agent.log_format)
        .context("initializing logging")?;

    let storage_dir = cli
        .storage_dir
        .unwrap_or_else(|| config.agent.storage_dir.clone());
    let mut controller = startup::build_controller(&config, &storage_dir)?;

    info!(version = env!("CARGO_PKG_VERSION"), "edgewall agent started");
    run(&mut controller).await
}

/// Management messages arrive as JSON lines on stdin; replies go to
/// stdout the same way. The tick interval drives alert delivery and
/// statistics in between.
async fn run(controller: &mut application::controller::FirewallController) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("reading stdin")? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        let reply = dispatch(controller, &line);
                        let mut out = serde_json::to_string(&reply)
                            .context("encoding reply")?;
                        out.push('\n');
                        stdout.write_all(out.as_bytes()).await.context("writing reply")?;
                        stdout.flush().await.context("flushing reply")?;
                    }
                    None => {
                        info!("stdin closed, shutting down");
                        return Ok(());
                    }
                }
            }
            _ = ticker.tick() => {
                controller.tick(Instant::now());
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                return Ok(());
            }
        }
    }
}

fn dispatch(
    controller: &mut application::controller::FirewallController,
    line: &str,
) -> Envelope {
    let mut envelope: Envelope = match serde_json::from_str(line) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!(error = %e, "malformed request");
            let mut reply = Envelope::new("ts.event.firewall", "set", json!({}));
            reply.fields = json!({"status": "error", "error": format!("malformed request: {e}")});
            return reply;
        }
    };
    if let Err(e) = controller.handle(&mut envelope) {
        error!(error = %e, kind = %envelope.kind, action = %envelope.action, "request failed");
        envelope.fields = json!({"status": "error", "error": e.to_string()});
    }
    envelope
}
