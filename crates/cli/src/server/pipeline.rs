use crate::di::build_routing_stage;
use pac_routing_domain::Config;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn run_routing_stage(config: &Config) -> anyhow::Result<()> {
    let stage = build_routing_stage(config).await?;

    let ctx = CancellationToken::new();
    let signal = ctx.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl-C, shutting down"),
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
        }
        signal.cancel();
    });

    stage.run(ctx).await?;
    Ok(())
}
