//! Connection configuration for the sidecar client.

use std::time::Duration;

/// Fixed parameters of the sidecar RPC endpoint.
pub struct RpcConfig;

impl RpcConfig {
    /// Where the platform runs the sidecar next to every script.
    pub const DEFAULT_ADDRESS: &'static str = "127.0.0.1:20086";
    /// Environment variable overriding [`RpcConfig::DEFAULT_ADDRESS`].
    pub const ADDRESS_ENV: &'static str = "CAFE_SDK_ADDR";
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
    /// Largest value the `grpc-timeout` header can carry (8 digits of hours).
    pub const MAX_CALL_TIMEOUT: Duration = Duration::from_secs(99_999_999 * 3600);
}

/// Settings used to construct a [`crate::CafeClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `host:port` of the sidecar, with or without an `http://` scheme.
    pub address: String,
    /// Upper bound on establishing the connection.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: RpcConfig::DEFAULT_ADDRESS.to_string(),
            connect_timeout: RpcConfig::CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Defaults, with the address taken from `CAFE_SDK_ADDR` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(address) = std::env::var(RpcConfig::ADDRESS_ENV) {
            let address = address.trim();
            if !address.is_empty() {
                config.address = address.to_string();
            }
        }
        config
    }

    /// The address as an `http://` URI accepted by the channel endpoint.
    pub fn endpoint_uri(&self) -> String {
        if self.address.contains("://") {
            self.address.clone()
        } else {
            format!("http://{}", self.address)
        }
    }
}
