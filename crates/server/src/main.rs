//! TCP transport and startup wiring for the Shoal array server.
//!
//! The transport frames one request per line:
//! `{"cmd": "<name>", "args": {...}, "argc": <n>}`; each reply line is the
//! serialized tagged `Reply`. One command is in flight per connection;
//! independent connections dispatch concurrently against the shared
//! engine state. Startup misconfiguration (an unresolvable memory
//! budget, a duplicate command registration) aborts the process here,
//! before any request is accepted.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use shoal_array::Fabric;
use shoal_core::{Reply, ServerConfig};
use shoal_engine::MemoryAdmission;
use shoal_executor::{Context, Registry};

/// One framed client request.
#[derive(Debug, Deserialize)]
struct Request {
    cmd: String,
    #[serde(default = "empty_args")]
    args: serde_json::Value,
    /// Declared argument count; defaults to the payload's own size.
    argc: Option<usize>,
}

fn empty_args() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.trace_filter.clone())),
        )
        .init();

    let fabric = Arc::new(
        Fabric::detect(config.num_locales).context("cannot resolve the memory budget")?,
    );
    let admission = Arc::new(
        MemoryAdmission::new(&fabric, config.mem_max_pct)
            .context("cannot resolve the memory budget")?,
    );
    let ctx = Arc::new(Context::new(fabric, admission));
    // Panics on duplicate registration; that is a broken build, not a
    // servable condition.
    let registry = Arc::new(Registry::with_standard_commands());

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, commands = registry.len(), "shoal server listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let ctx = Arc::clone(&ctx);
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            info!(%peer, "client connected");
            if let Err(e) = serve_connection(stream, ctx, registry).await {
                warn!(%peer, error = %e, "connection closed with error");
            } else {
                info!(%peer, "client disconnected");
            }
        });
    }
}

fn load_config() -> anyhow::Result<ServerConfig> {
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            let config = ServerConfig::from_file(&path)
                .with_context(|| format!("loading config {}", path.display()))?;
            Ok(config)
        }
        None => {
            let config = ServerConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

async fn serve_connection(
    stream: TcpStream,
    ctx: Arc<Context>,
    registry: Arc<Registry>,
) -> anyhow::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<Request>(&line) {
            Ok(req) => {
                let argc = req
                    .argc
                    .unwrap_or_else(|| req.args.as_object().map(|o| o.len()).unwrap_or(0));
                let ctx = Arc::clone(&ctx);
                let registry = Arc::clone(&registry);
                // Engine work is synchronous and may be large; keep it off
                // the reactor threads.
                tokio::task::spawn_blocking(move || {
                    registry.dispatch(&ctx, &req.cmd, &req.args, argc)
                })
                .await
                .unwrap_or_else(|e| {
                    error!(error = %e, "command task panicked");
                    Reply::Error("internal error: command task panicked".to_string())
                })
            }
            Err(e) => Reply::Error(format!("malformed request: {}", e)),
        };
        let mut out = serde_json::to_vec(&reply)?;
        out.push(b'\n');
        write_half.write_all(&out).await?;
    }
    Ok(())
}
