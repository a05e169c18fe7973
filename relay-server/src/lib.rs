use futures::stream::StreamExt;
use prelude::Message;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;

pub mod prelude;
pub mod receiver;
pub mod sender;

#[async_trait::async_trait]
pub trait Handler {
    /// Returns `None` to drop the datagram silently instead of replying —
    /// used for queries that never reach a well-formed answer (e.g. a
    /// malformed request), as opposed to a synthesised error reply.
    async fn handle(&self, message: Message) -> Option<Message>;
}

/// Binds one UDP socket and fans datagrams out to `handler`, bounded to 64
/// concurrent in-flight queries so a slow upstream can't starve the rest.
pub struct UdpServer<H> {
    address: SocketAddr,
    handler: H,
}

impl<H: Handler> UdpServer<H> {
    pub fn new(address: SocketAddr, handler: H) -> Self {
        Self { address, handler }
    }

    pub async fn run(&self) -> std::io::Result<()> {
        let socket = UdpSocket::bind(self.address).await?;
        let socket = Arc::new(socket);

        let receiver = receiver::Receiver::new(socket.clone());
        let sender = sender::Sender::new(socket);

        let stream = receiver
            .into_stream()
            .map(|item| async { self.handler.handle(item).await })
            .buffer_unordered(64);

        tokio::pin!(stream);

        while let Some(item) = stream.next().await {
            let Some(item) = item else {
                tracing::debug!("dropping datagram with no reply");
                continue;
            };
            if let Err(error) = sender.send(&item).await {
                tracing::error!("couldn't send datagram to {:?}: {error:?}", item.address);
            }
        }

        Ok(())
    }
}
