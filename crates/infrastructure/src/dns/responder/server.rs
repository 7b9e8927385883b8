use super::{RecordTable, ResponderError};
use crate::dns::wire::{DnsMessage, MAX_UDP_PAYLOAD};
use pac_routing_domain::RecordType;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Port offset tried when binding a privileged port is refused.
const PRIVILEGED_PORT_SHIFT: u16 = 1000;

/// Single-socket UDP responder answering from a [`RecordTable`].
pub struct DnsResponder {
    socket: UdpSocket,
    local_addr: SocketAddr,
    table: Arc<RecordTable>,
    shutdown: CancellationToken,
}

impl DnsResponder {
    /// Binds `bind_address:port`. Port 0 picks a free port; a permission
    /// error moves to `port + 1000`.
    pub fn bind(bind_address: &str, port: u16, table: RecordTable) -> Result<Self, ResponderError> {
        let ip: IpAddr = bind_address
            .parse()
            .map_err(|_| ResponderError::InvalidAddress(bind_address.to_string()))?;

        let std_socket = match create_udp_socket(SocketAddr::new(ip, port)) {
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                let shifted = port.checked_add(PRIVILEGED_PORT_SHIFT).ok_or_else(|| {
                    ResponderError::Bind {
                        addr: SocketAddr::new(ip, port).to_string(),
                        source: e,
                    }
                })?;
                warn!(
                    port,
                    shifted, "Permission denied on privileged port, shifting"
                );
                create_udp_socket(SocketAddr::new(ip, shifted)).map_err(|source| {
                    ResponderError::Bind {
                        addr: SocketAddr::new(ip, shifted).to_string(),
                        source,
                    }
                })?
            }
            other => other.map_err(|source| ResponderError::Bind {
                addr: SocketAddr::new(ip, port).to_string(),
                source,
            })?,
        };

        let socket = UdpSocket::from_std(std_socket).map_err(|source| ResponderError::Bind {
            addr: SocketAddr::new(ip, port).to_string(),
            source,
        })?;
        let local_addr = socket.local_addr().map_err(|source| ResponderError::Bind {
            addr: SocketAddr::new(ip, port).to_string(),
            source,
        })?;

        Ok(Self {
            socket,
            local_addr,
            table: Arc::new(table),
            shutdown: CancellationToken::new(),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Token cancelling [`DnsResponder::run`]; cancel it (or call
    /// [`DnsResponder::stop`]) to close the socket.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Receive loop. Returns once the shutdown token is cancelled, dropping
    /// the socket.
    pub async fn run(self) {
        info!(
            address = %self.local_addr,
            records = self.table.len(),
            "DNS responder started"
        );
        for (name, record_type) in self.table.summary() {
            info!(name = %name, record_type = %record_type, "Serving record");
        }

        let mut buf = [0u8; MAX_UDP_PAYLOAD];

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                received = self.socket.recv_from(&mut buf) => {
                    match received {
                        Ok((len, peer)) => {
                            if let Some(response) = self.handle(&buf[..len], peer) {
                                if let Err(e) = self.socket.send_to(&response, peer).await {
                                    warn!(peer = %peer, error = %e, "Failed to send response");
                                }
                            }
                        }
                        Err(e) => warn!(error = %e, "UDP receive error"),
                    }
                }
            }
        }

        info!(address = %self.local_addr, "DNS responder stopped");
    }

    fn handle(&self, packet: &[u8], peer: SocketAddr) -> Option<Vec<u8>> {
        let query = match DnsMessage::parse(packet) {
            Ok(query) => query,
            Err(e) => {
                warn!(peer = %peer, error = %e, "Dropping malformed DNS packet");
                return None;
            }
        };

        for question in &query.questions {
            debug!(
                peer = %peer,
                id = query.id,
                name = %question.name,
                qtype = %RecordType::describe(question.qtype),
                "DNS query"
            );
        }

        let response = self.table.respond(&query);
        match response.to_datagram(MAX_UDP_PAYLOAD) {
            Ok(bytes) => {
                // TC bit of the encoded flags
                if bytes.get(2).is_some_and(|flags| flags & 0x02 != 0) {
                    debug!(
                        peer = %peer,
                        id = query.id,
                        answers = response.answers.len(),
                        "Response truncated to fit a UDP datagram"
                    );
                }
                Some(bytes)
            }
            Err(e) => {
                warn!(peer = %peer, id = query.id, error = %e, "Failed to encode response");
                None
            }
        }
    }
}

fn create_udp_socket(addr: SocketAddr) -> io::Result<std::net::UdpSocket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.set_nonblocking(true)?;
    Ok(socket.into())
}
