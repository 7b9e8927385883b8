use crate::di::{build_lookup, scheme_code};
use pac_routing_application::ports::ParticipantLookup;
use pac_routing_domain::config::DiscoveryConfig;
use pac_routing_domain::{compute_sml_hostname, Config};
use tracing::info;

pub async fn lookup(
    config: &DiscoveryConfig,
    scheme: &str,
    id: &str,
    document_type: &str,
) -> anyhow::Result<()> {
    let lookup = build_lookup(config)?;
    let result = lookup
        .lookup(&scheme_code(scheme), id, document_type)
        .await?;

    info!(success = result.success, "Lookup finished");
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub fn hostname(config: &DiscoveryConfig, scheme: &str, id: &str) -> anyhow::Result<()> {
    println!(
        "{}",
        compute_sml_hostname(config.environment.zone(), &scheme_code(scheme), id)
    );
    Ok(())
}

pub fn write_config(config: &Config, output: Option<&str>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            config.save(path)?;
            info!(path = path, "Configuration written");
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}
