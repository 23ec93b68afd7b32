use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tokio::net::TcpListener;

#[derive(Clone, Copy, Debug)]
pub struct HttpApiConfig {
    pub address: SocketAddr,
    pub max_events: usize,
}

impl Default for HttpApiConfig {
    fn default() -> Self {
        Self::with_address(Ipv4Addr::LOCALHOST, 5052)
    }
}

impl HttpApiConfig {
    #[must_use]
    pub fn with_address(ip_address: impl Into<IpAddr>, port: u16) -> Self {
        Self {
            address: (ip_address, port).into(),
            max_events: crate::events::DEFAULT_MAX_EVENTS,
        }
    }

    pub(crate) async fn listener(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind(self.address).await
    }
}
