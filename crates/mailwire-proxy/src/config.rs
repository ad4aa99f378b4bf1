//! Proxy configuration types.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use mailwire_imap::DecoderConfig;

/// Default address client connections are accepted on.
pub const DEFAULT_LISTEN: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 1143);

/// Default upstream IMAP host.
pub const DEFAULT_UPSTREAM_HOST: &str = "localhost";

/// Default upstream IMAP port (plaintext IMAP).
pub const DEFAULT_UPSTREAM_PORT: u16 = 143;

/// Proxy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Address to accept client connections on.
    pub listen: SocketAddr,
    /// Upstream server hostname.
    pub upstream_host: String,
    /// Upstream server port.
    pub upstream_port: u16,
    /// Token caps applied in both directions.
    pub decoder: DecoderConfig,
}

impl ProxyConfig {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ProxyConfigBuilder {
        ProxyConfigBuilder::new()
    }

    /// Returns the upstream address as `host:port`.
    #[must_use]
    pub fn upstream_addr(&self) -> String {
        format!("{}:{}", self.upstream_host, self.upstream_port)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN,
            upstream_host: DEFAULT_UPSTREAM_HOST.to_string(),
            upstream_port: DEFAULT_UPSTREAM_PORT,
            decoder: DecoderConfig::default(),
        }
    }
}

/// Builder for proxy configuration.
#[derive(Debug, Clone, Default)]
pub struct ProxyConfigBuilder {
    config: ProxyConfig,
}

impl ProxyConfigBuilder {
    /// Creates a new builder with the default addresses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the listen address.
    #[must_use]
    pub const fn listen(mut self, addr: SocketAddr) -> Self {
        self.config.listen = addr;
        self
    }

    /// Sets the upstream hostname.
    #[must_use]
    pub fn upstream_host(mut self, host: impl Into<String>) -> Self {
        self.config.upstream_host = host.into();
        self
    }

    /// Sets the upstream port.
    #[must_use]
    pub const fn upstream_port(mut self, port: u16) -> Self {
        self.config.upstream_port = port;
        self
    }

    /// Sets the decoder token caps.
    #[must_use]
    pub const fn decoder(mut self, decoder: DecoderConfig) -> Self {
        self.config.decoder = decoder;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ProxyConfig {
        self.config
    }
}
