use pac_routing_infrastructure::dns::wire::DnsMessage;
use pac_routing_infrastructure::dns::{DnsResponder, RecordTable};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Responder bound to an ephemeral loopback port, stopped on drop.
pub struct RunningResponder {
    addr: SocketAddr,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl RunningResponder {
    pub fn start(table: RecordTable) -> Self {
        let responder = DnsResponder::bind("127.0.0.1", 0, table).unwrap();
        let addr = responder.local_addr();
        let shutdown = responder.shutdown_token();
        let task = tokio::spawn(responder.run());

        Self {
            addr,
            shutdown,
            task: Some(task),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn stop(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for RunningResponder {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Sends raw bytes and waits briefly for a reply. The buffer is large
/// enough to see datagrams over the 512-byte limit.
pub async fn exchange(addr: SocketAddr, packet: &[u8]) -> Option<Vec<u8>> {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket.send_to(packet, addr).await.unwrap();

    let mut buf = vec![0u8; 4096];
    match tokio::time::timeout(Duration::from_millis(500), socket.recv(&mut buf)).await {
        Ok(Ok(len)) => Some(buf[..len].to_vec()),
        _ => None,
    }
}

pub async fn ask(addr: SocketAddr, query: &DnsMessage) -> DnsMessage {
    let reply = exchange(addr, &query.to_bytes().unwrap())
        .await
        .expect("responder did not answer");
    DnsMessage::parse(&reply).unwrap()
}

/// Bound socket that never answers.
pub async fn silent_nameserver() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    (socket, addr)
}
