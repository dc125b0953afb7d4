//! Defaults for the starter script.

use std::time::Duration;

/// Script-level configuration.
pub struct ScriptConfig;

impl ScriptConfig {
    /// Platform egress proxy, reachable from inside the run container.
    pub const PROXY_DOMAIN: &'static str = "proxy-inner.cafescraper.com:6000";
    /// `user:password` for the egress proxy, injected by the platform.
    pub const PROXY_AUTH_ENV: &'static str = "PROXY_AUTH";
    pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
    /// Echoes the caller's public IP, which shows whether the proxy is in use.
    pub const TARGET_URL: &'static str = "https://ipinfo.io/ip";
    /// Grace period for the sidecar to come up before the first call.
    pub const STARTUP_DELAY: Duration = Duration::from_secs(2);
}
