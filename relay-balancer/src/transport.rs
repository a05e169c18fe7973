use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;

/// Abstracts the wire send/receive so the balancer's retry/failover logic
/// is testable without binding real sockets.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_query(
        &self,
        upstream: SocketAddr,
        query: &[u8],
        timeout: Duration,
    ) -> std::io::Result<Vec<u8>>;
}

/// The real transport: one ephemeral UDP socket per attempt, matching the
/// request/response shape of the plain DNS wire protocol.
#[derive(Debug, Default)]
pub struct UdpTransport;

#[async_trait]
impl Transport for UdpTransport {
    async fn send_query(
        &self,
        upstream: SocketAddr,
        query: &[u8],
        timeout: Duration,
    ) -> std::io::Result<Vec<u8>> {
        let bind_addr: SocketAddr = if upstream.is_ipv4() {
            "0.0.0.0:0".parse().unwrap()
        } else {
            "[::]:0".parse().unwrap()
        };
        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(upstream).await?;
        socket.send(query).await?;

        let mut buffer = vec![0u8; 512];
        let size = tokio::time::timeout(timeout, socket.recv(&mut buffer))
            .await
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out"))??;
        buffer.truncate(size);
        Ok(buffer)
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Test double mapping upstream address to a canned outcome, recording
    /// every attempt made against it.
    #[derive(Default)]
    pub struct MockTransport {
        answers: Mutex<HashMap<SocketAddr, Result<Vec<u8>, ()>>>,
        attempts: Mutex<Vec<SocketAddr>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_ok(&self, upstream: SocketAddr, response: Vec<u8>) {
            self.answers.lock().unwrap().insert(upstream, Ok(response));
        }

        pub fn set_failing(&self, upstream: SocketAddr) {
            self.answers.lock().unwrap().insert(upstream, Err(()));
        }

        pub fn attempts(&self) -> Vec<SocketAddr> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send_query(
            &self,
            upstream: SocketAddr,
            _query: &[u8],
            _timeout: Duration,
        ) -> std::io::Result<Vec<u8>> {
            self.attempts.lock().unwrap().push(upstream);
            match self.answers.lock().unwrap().get(&upstream) {
                Some(Ok(response)) => Ok(response.clone()),
                _ => Err(std::io::Error::other("mock failure")),
            }
        }
    }
}
