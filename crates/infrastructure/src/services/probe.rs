use crate::dns::wire::{DnsMessage, MAX_UDP_PAYLOAD};
use pac_routing_domain::RecordType;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{lookup_host, TcpStream, UdpSocket};
use tracing::debug;

const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// How readiness of a service is decided.
#[derive(Debug, Clone)]
pub enum ReadinessProbe {
    /// TCP connect succeeds. With `allow_refused` a refused connection also
    /// counts, for services that only listen on UDP.
    Tcp { allow_refused: bool },
    /// `GET http://host:port{path}` answers with a status below 500.
    Http { path: String },
    /// A DNS query for `name` over UDP gets a parseable answer.
    Dns { name: String },
}

impl ReadinessProbe {
    pub async fn check(&self, host: &str, port: u16) -> bool {
        match self {
            Self::Tcp { allow_refused } => check_tcp(host, port, *allow_refused).await,
            Self::Http { path } => check_http(host, port, path).await,
            Self::Dns { name } => check_dns(host, port, name).await,
        }
    }
}

async fn check_tcp(host: &str, port: u16, allow_refused: bool) -> bool {
    match tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => allow_refused,
        Ok(Err(e)) => {
            debug!(host, port, error = %e, "TCP probe failed");
            false
        }
        Err(_) => false,
    }
}

async fn check_http(host: &str, port: u16, path: &str) -> bool {
    let url = format!("http://{}:{}{}", host, port, path);
    let client = match reqwest::Client::builder().timeout(PROBE_TIMEOUT).build() {
        Ok(client) => client,
        Err(_) => return false,
    };

    match client.get(&url).send().await {
        Ok(response) => response.status().as_u16() < 500,
        Err(e) => {
            debug!(url = %url, error = %e, "HTTP probe failed");
            false
        }
    }
}

async fn check_dns(host: &str, port: u16, name: &str) -> bool {
    let exchange = async {
        let target: SocketAddr = lookup_host((host, port))
            .await?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no address"))?;
        let bind: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind).await?;
        let id = fastrand::u16(..);
        let query = DnsMessage::query(id, name, RecordType::A)
            .to_bytes()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        socket.send_to(&query, target).await?;

        let mut buf = [0u8; MAX_UDP_PAYLOAD];
        let (len, _) = socket.recv_from(&mut buf).await?;
        Ok::<_, io::Error>(DnsMessage::parse(&buf[..len]).map(|r| r.id == id).unwrap_or(false))
    };

    matches!(
        tokio::time::timeout(PROBE_TIMEOUT, exchange).await,
        Ok(Ok(true))
    )
}
