use super::build_lookup;
use pac_routing_application::use_cases::{ProcessRoutingMessageUseCase, RouteInvoiceUseCase};
use pac_routing_domain::Config;
use pac_routing_infrastructure::pipeline::{connect, NatsStagePublisher, RoutingStage};
use std::sync::Arc;

pub async fn build_routing_stage(config: &Config) -> anyhow::Result<RoutingStage> {
    let lookup = build_lookup(&config.discovery)?;
    let route = Arc::new(
        RouteInvoiceUseCase::new(lookup).with_fallback_url(config.pipeline.fallback_url.clone()),
    );

    let client = connect(&config.pipeline).await?;
    let publisher = Arc::new(NatsStagePublisher::new(client.clone()));
    let use_case = Arc::new(ProcessRoutingMessageUseCase::new(
        route,
        publisher,
        config.pipeline.subject_out(),
        config.pipeline.subject_err(),
    ));

    Ok(RoutingStage::new(client, use_case, &config.pipeline))
}
