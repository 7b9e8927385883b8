use clap::{Parser, Subcommand};
use pac_routing_domain::{CliOverrides, PeppolEnvironment, DEFAULT_DOCUMENT_TYPE};
use tracing::info;

mod bootstrap;
mod commands;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "pac-routing")]
#[command(version)]
#[command(about = "PAC routing - participant discovery and invoice routing")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Discovery environment (production, test)
    #[arg(short = 'e', long, global = true)]
    environment: Option<PeppolEnvironment>,

    /// Nameserver used for SML lookups (ip:port)
    #[arg(long, global = true)]
    nameserver: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the test DNS records until Ctrl-C
    DnsResponder {
        /// UDP port
        #[arg(short = 'p', long, env = "PORT")]
        port: Option<u16>,

        /// Bind address
        #[arg(short = 'b', long)]
        bind: Option<String>,
    },

    /// Look a participant up and print the result as JSON
    Lookup {
        /// Scheme code (0009) or name (SIREN)
        #[arg(short = 's', long, default_value = "0009")]
        scheme: String,

        #[arg(short = 'i', long)]
        id: String,

        #[arg(short = 'd', long, default_value = DEFAULT_DOCUMENT_TYPE)]
        document_type: String,
    },

    /// Print the SML hostname of a participant
    Hostname {
        #[arg(short = 's', long, default_value = "0009")]
        scheme: String,

        #[arg(short = 'i', long)]
        id: String,
    },

    /// Consume invoices from NATS and publish routing verdicts until Ctrl-C
    Route {
        #[arg(long, env = "NATS_URL")]
        nats_url: Option<String>,
    },

    /// Print the effective configuration as TOML, or write it to a file
    Config {
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut overrides = CliOverrides {
        environment: cli.environment,
        nameserver: cli.nameserver.clone(),
        log_level: cli.log_level.clone(),
        ..CliOverrides::default()
    };
    match &cli.command {
        Command::DnsResponder { port, bind } => {
            overrides.dns_port = *port;
            overrides.bind_address = bind.clone();
        }
        Command::Route { nats_url } => overrides.nats_url = nats_url.clone(),
        _ => {}
    }

    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    bootstrap::init_logging(&config.logging);

    info!("Starting pac-routing v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::DnsResponder { .. } => server::run_dns_responder(&config.responder).await,
        Command::Lookup {
            scheme,
            id,
            document_type,
        } => commands::lookup(&config.discovery, &scheme, &id, &document_type).await,
        Command::Hostname { scheme, id } => commands::hostname(&config.discovery, &scheme, &id),
        Command::Route { .. } => server::run_routing_stage(&config).await,
        Command::Config { output } => commands::write_config(&config, output.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_defaults() {
        let cli = Cli::try_parse_from(["pac-routing", "lookup", "--id", "123456789"]).unwrap();

        match cli.command {
            Command::Lookup {
                scheme,
                id,
                document_type,
            } => {
                assert_eq!(scheme, "0009");
                assert_eq!(id, "123456789");
                assert_eq!(document_type, "invoice_ubl");
            }
            _ => panic!("expected lookup"),
        }
    }

    #[test]
    fn test_global_environment_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pac-routing",
            "hostname",
            "--scheme",
            "SIRET",
            "--id",
            "12345678900012",
            "--environment",
            "test",
        ])
        .unwrap();

        assert_eq!(cli.environment, Some(PeppolEnvironment::Test));
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        let result = Cli::try_parse_from(["pac-routing", "-e", "staging", "hostname", "--id", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_scheme_names_map_to_codes() {
        assert_eq!(di::scheme_code("SIREN"), "0009");
        assert_eq!(di::scheme_code("siret"), "0002");
        assert_eq!(di::scheme_code("0088"), "0088");
    }
}
