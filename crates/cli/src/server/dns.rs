use pac_routing_domain::config::ResponderConfig;
use pac_routing_infrastructure::dns::{DnsResponder, RecordTable};
use tracing::info;

pub async fn run_dns_responder(config: &ResponderConfig) -> anyhow::Result<()> {
    let table = RecordTable::from_config(config)?;
    let responder = DnsResponder::bind(&config.bind_address, config.port, table)?;
    let shutdown = responder.shutdown_token();

    info!(
        address = %responder.local_addr(),
        "DNS responder ready, press Ctrl-C to stop"
    );
    let task = tokio::spawn(responder.run());

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C, shutting down");
    shutdown.cancel();
    task.await?;

    Ok(())
}
