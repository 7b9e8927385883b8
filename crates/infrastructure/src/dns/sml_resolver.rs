use super::wire::{DnsMessage, RData};
use async_trait::async_trait;
use pac_routing_application::ports::SmlResolver;
use pac_routing_domain::{DomainError, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Receive buffer, larger than the 512-byte UDP limit so an oversized reply
/// from a non-conforming server is read whole instead of cut.
const RECV_BUFFER_SIZE: usize = 4096;

/// SML resolver speaking DNS over UDP to one nameserver.
///
/// Tries NAPTR first and takes the URL from the best-ranked record with a
/// catch-all regexp; falls back to CNAME and synthesizes `https://{target}`.
/// Only a clean NAPTR miss falls back: transport errors, unparsable replies
/// and truncated replies without a usable record are returned as errors.
pub struct WireSmlResolver {
    nameserver: SocketAddr,
    timeout: Duration,
}

impl WireSmlResolver {
    pub fn new(nameserver: SocketAddr, timeout: Duration) -> Self {
        Self {
            nameserver,
            timeout,
        }
    }

    pub fn nameserver(&self) -> SocketAddr {
        self.nameserver
    }

    async fn query(&self, hostname: &str, qtype: RecordType) -> Result<DnsMessage, DomainError> {
        let bind_addr: SocketAddr = if self.nameserver.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;

        let id = fastrand::u16(..);
        let query = DnsMessage::query(id, hostname, qtype)
            .to_bytes()
            .map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", hostname, e)))?;

        let exchange = async {
            socket.send_to(&query, self.nameserver).await?;
            let mut buf = vec![0u8; RECV_BUFFER_SIZE];
            loop {
                let (len, from) = socket.recv_from(&mut buf).await?;
                if from != self.nameserver {
                    continue;
                }
                let reply = &buf[..len];
                if let Some(reply_id) = reply.get(..2).map(|b| u16::from_be_bytes([b[0], b[1]])) {
                    if reply_id != id {
                        debug!(
                            hostname = hostname,
                            expected = id,
                            received = reply_id,
                            "Ignoring DNS reply with a stale id"
                        );
                        continue;
                    }
                }
                return Ok::<_, std::io::Error>(reply.to_vec());
            }
        };

        let bytes = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.nameserver.to_string(),
            })?
            .map_err(|e| {
                DomainError::IoError(format!("DNS exchange with {} failed: {}", self.nameserver, e))
            })?;

        let response = DnsMessage::parse(&bytes)
            .map_err(|e| DomainError::InvalidDnsResponse(e.to_string()))?;

        debug!(
            hostname = hostname,
            qtype = %qtype,
            answers = response.answers.len(),
            rcode = response.rcode,
            "DNS response received"
        );

        Ok(response)
    }

    async fn resolve_naptr(&self, hostname: &str) -> Result<Option<String>, DomainError> {
        let response = self.query(hostname, RecordType::NAPTR).await?;

        let mut records: Vec<_> = response
            .answers
            .iter()
            .filter_map(|r| match r.data() {
                Ok(RData::Naptr(naptr)) => Some(naptr),
                _ => None,
            })
            .collect();
        records.sort_by_key(|n| (n.order, n.preference));
        let url = records
            .iter()
            .find_map(|n| n.smp_url().map(str::to_string));

        if response.tc {
            return match url {
                Some(url) => {
                    warn!(
                        hostname = hostname,
                        records = records.len(),
                        "Truncated NAPTR response, using the records received"
                    );
                    Ok(Some(url))
                }
                None => Err(DomainError::InvalidDnsResponse(format!(
                    "Truncated NAPTR response for {} without a usable record",
                    hostname
                ))),
            };
        }

        Ok(url)
    }

    async fn resolve_cname(&self, hostname: &str) -> Result<Option<String>, DomainError> {
        let response = self.query(hostname, RecordType::CNAME).await?;

        Ok(response.answers.iter().find_map(|r| match r.data() {
            Ok(RData::Cname(target)) if !target.is_empty() => Some(format!("https://{}", target)),
            _ => None,
        }))
    }
}

#[async_trait]
impl SmlResolver for WireSmlResolver {
    async fn resolve_smp_url(&self, hostname: &str) -> Result<Option<String>, DomainError> {
        if let Some(url) = self.resolve_naptr(hostname).await? {
            return Ok(Some(url));
        }
        debug!(hostname = hostname, "No usable NAPTR record, trying CNAME");

        self.resolve_cname(hostname).await
    }
}
