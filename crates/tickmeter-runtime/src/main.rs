//! tickmeter agent
//!
//! - `/metrics` pull endpoint over the process registry
//! - periodic push to the log backend (optional)
//! - ctrl-c stops the push after a final flush

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing_subscriber::{fmt, EnvFilter};

use tickmeter_core::Opts;
use tickmeter_runtime::{config, ops, LogBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "tickmeter.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.http.listen_addr()?;

    let registry = cfg.build_registry();
    let uptime = registry.new_gauge(Opts::new(
        "tickmeter_uptime_seconds",
        "Seconds since the agent started.",
    ))?;
    let started = Instant::now();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(1));
        loop {
            tick.tick().await;
            uptime.store(started.elapsed().as_secs() as i64);
        }
    });

    let push = if cfg.push.enabled {
        Some(registry.push(Arc::new(LogBackend), cfg.push.interval())?)
    } else {
        None
    };

    let app = ops::router(ops::OpsState::new(registry.clone())?);

    tracing::info!(%listen, push = cfg.push.enabled, "tickmeter-agent starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    if let Some(push) = push {
        push.stop().await;
    }
    tracing::info!("tickmeter-agent stopped");
    Ok(())
}
