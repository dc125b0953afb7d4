//! The script-facing facade.
//!
//! A [`CafeClient`] owns the one connection to the sidecar and hands out the
//! three capability groups:
//!
//! - [`ParameterApi`] via [`CafeClient::parameter`]: run input
//! - [`ResultApi`] via [`CafeClient::result`]: output table
//! - [`LogApi`] via [`CafeClient::log`]: run log
//!
//! Every call is a single unary request. Nothing is retried, buffered or
//! reordered; a failure is returned to the caller as-is.

mod log;
mod parameter;
mod result;

pub use log::LogApi;
pub use parameter::ParameterApi;
pub use result::ResultApi;

use crate::config::{ClientConfig, RpcConfig};
use crate::context::CallContext;
use crate::error::{Result, SdkError};
use crate::transport::{GrpcTransport, PlatformTransport};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tonic::Status;
use tracing::debug;

/// Client for the platform sidecar.
///
/// Construct it once in the entry point and pass it (or clones of it) to
/// whatever needs it. Clones share the same connection.
///
/// # Example
///
/// ```rust,ignore
/// use cafe_sdk::{CafeClient, CallContext};
///
/// let client = CafeClient::builder().with_env().connect().await?;
/// let ctx = CallContext::background();
///
/// let input = client.parameter().get_input_json(&ctx).await?;
/// client.log().info(&ctx, format!("input: {}", input)).await.ok();
/// ```
pub struct CafeClient<T: PlatformTransport = GrpcTransport> {
    transport: Arc<T>,
}

impl<T: PlatformTransport> Clone for CafeClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: PlatformTransport> std::fmt::Debug for CafeClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CafeClient")
            .field("transport", &std::any::type_name::<T>())
            .finish()
    }
}

impl CafeClient<GrpcTransport> {
    /// Connect to the sidecar described by `config`.
    ///
    /// Fails with [`SdkError::Connect`] when nothing answers at the address;
    /// no capability is usable without the sidecar.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let transport = GrpcTransport::connect(&config).await?;
        Ok(Self::with_transport(transport))
    }

    /// Builder starting from the default local sidecar address.
    pub fn builder() -> CafeClientBuilder {
        CafeClientBuilder::new()
    }
}

impl<T: PlatformTransport> CafeClient<T> {
    /// Facade over a caller-supplied transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// The transport this client calls through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run input capability.
    pub fn parameter(&self) -> ParameterApi<'_, T> {
        ParameterApi::new(self)
    }

    /// Output table capability.
    pub fn result(&self) -> ResultApi<'_, T> {
        ResultApi::new(self)
    }

    /// Run log capability.
    pub fn log(&self) -> LogApi<'_, T> {
        LogApi::new(self)
    }

    /// Wrap `message` for a call under `ctx`.
    ///
    /// Fails without touching the wire if the context is already cancelled or
    /// expired; otherwise the remaining time travels as the gRPC timeout,
    /// capped at what the header can encode.
    pub(crate) fn request<M>(&self, ctx: &CallContext, message: M) -> Result<tonic::Request<M>> {
        ctx.check()?;
        let mut request = tonic::Request::new(message);
        if let Some(remaining) = ctx.remaining() {
            request.set_timeout(remaining.min(RpcConfig::MAX_CALL_TIMEOUT));
        }
        Ok(request)
    }

    /// Drive one remote call, racing it against the context.
    ///
    /// Losing the race drops the in-flight request.
    pub(crate) async fn call<R, F>(&self, ctx: &CallContext, method: &'static str, call: F) -> Result<R>
    where
        F: Future<Output = std::result::Result<tonic::Response<R>, Status>>,
    {
        debug!("Calling {}", method);

        tokio::select! {
            biased;
            err = ctx.done() => {
                debug!("{} abandoned: {}", method, err);
                Err(err)
            }
            outcome = call => match outcome {
                Ok(response) => Ok(response.into_inner()),
                Err(status) => {
                    let err = SdkError::from_status(method, status);
                    debug!("{} failed: {}", method, err);
                    Err(err)
                }
            },
        }
    }
}

/// Builder for a gRPC-backed [`CafeClient`].
#[derive(Debug, Clone, Default)]
pub struct CafeClientBuilder {
    config: ClientConfig,
}

impl CafeClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from [`ClientConfig::from_env`] instead of the defaults.
    pub fn with_env(mut self) -> Self {
        self.config = ClientConfig::from_env();
        self
    }

    /// Sidecar `host:port`.
    ///
    /// Default: `127.0.0.1:20086`
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = address.into();
        self
    }

    /// Upper bound on establishing the connection.
    ///
    /// Default: 5 seconds
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Connect; see [`CafeClient::connect`].
    pub async fn connect(self) -> Result<CafeClient> {
        CafeClient::connect(self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationToken;
    use crate::transport::{RecordedCall, RecordingTransport};
    use crate::types::TableHeaderItem;

    fn client() -> CafeClient<RecordingTransport> {
        CafeClient::with_transport(RecordingTransport::new(r#"{"url":"https://example.com"}"#))
    }

    #[test]
    fn test_builder_with_env_keeps_later_overrides() {
        let builder = CafeClient::builder()
            .with_env()
            .connect_timeout(Duration::from_millis(250));
        assert_eq!(builder.config().connect_timeout, Duration::from_millis(250));
        assert!(!builder.config().address.is_empty());
    }

    #[test]
    fn test_builder_overrides() {
        let builder = CafeClient::builder()
            .address("10.0.0.2:7000")
            .connect_timeout(Duration::from_secs(1));
        assert_eq!(builder.config().address, "10.0.0.2:7000");
        assert_eq!(builder.config().connect_timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_clones_share_transport() {
        let client = client();
        let other = client.clone();
        let ctx = CallContext::background();

        other.result().push_data(&ctx, r#"{"a":1}"#).await.unwrap();

        assert_eq!(client.transport().pushed_rows(), vec![r#"{"a":1}"#.to_string()]);
    }

    #[tokio::test]
    async fn test_cancelled_context_issues_no_call() {
        let client = client();
        let token = CancellationToken::new();
        let ctx = CallContext::background().with_token(token.clone());
        token.cancel();

        let input = client.parameter().get_input_json(&ctx).await;
        let header = client
            .result()
            .set_table_header(&ctx, &[TableHeaderItem::text("Title", "title")])
            .await;
        let push = client.result().push_data(&ctx, "{}").await;
        let log = client.log().info(&ctx, "hello").await;

        assert!(matches!(input, Err(SdkError::Cancelled)));
        assert!(matches!(header, Err(SdkError::Cancelled)));
        assert!(matches!(push, Err(SdkError::Cancelled)));
        assert!(matches!(log, Err(SdkError::Cancelled)));
        assert!(client.transport().calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_issues_no_call() {
        let client = client();
        let ctx = CallContext::background().with_timeout(Duration::from_millis(10));
        tokio::time::advance(Duration::from_millis(20)).await;

        let result = client.result().push_data(&ctx, "{}").await;

        assert!(matches!(result, Err(SdkError::DeadlineExceeded)));
        assert!(client.transport().calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_interrupts_slow_call() {
        let client = CafeClient::with_transport(
            RecordingTransport::new("{}").with_latency(Duration::from_secs(30)),
        );
        let ctx = CallContext::background().with_timeout(Duration::from_secs(1));

        let result = client.result().push_data(&ctx, r#"{"n":1}"#).await;

        assert!(matches!(result, Err(SdkError::DeadlineExceeded)));
        assert_eq!(client.transport().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_in_flight_call() {
        let client = CafeClient::with_transport(
            RecordingTransport::new("{}").with_latency(Duration::from_secs(30)),
        );
        let token = CancellationToken::new();
        let ctx = CallContext::background().with_token(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
        let result = client.parameter().get_input_json(&ctx).await;
        canceller.await.unwrap();

        assert!(matches!(result, Err(SdkError::Cancelled)));
        assert_eq!(client.transport().calls(), vec![RecordedCall::GetInputJsonString]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_is_forwarded_as_grpc_timeout() {
        let client = client();
        let bounded = CallContext::background().with_timeout(Duration::from_secs(3));
        let unbounded = CallContext::background();

        client.log().debug(&bounded, "with deadline").await.unwrap();
        client.log().debug(&unbounded, "without deadline").await.unwrap();

        let timeouts = client.transport().timeouts();
        assert_eq!(timeouts.len(), 2);
        assert!(timeouts[0].is_some());
        assert!(timeouts[1].is_none());
    }

    #[tokio::test]
    async fn test_far_future_deadline_is_capped() {
        let client = client();
        let ctx = CallContext::background().with_timeout(Duration::from_secs(u64::MAX / 4));
        assert!(ctx.deadline().is_some());

        client.log().info(&ctx, "far future").await.unwrap();
        client
            .log()
            .info(&CallContext::background().with_timeout(Duration::MAX), "unbounded")
            .await
            .unwrap();

        let timeouts = client.transport().timeouts();
        assert_eq!(timeouts.len(), 2);
        assert_eq!(timeouts[0].as_deref(), Some("99999999H"));
        assert!(timeouts[1].is_none());
    }

    #[tokio::test]
    async fn test_remote_failure_is_surfaced_once() {
        let client = client();
        client
            .transport()
            .fail_next(Status::unavailable("sidecar restarting"));
        let ctx = CallContext::background();

        let result = client.result().push_data(&ctx, r#"{"title":"A"}"#).await;

        match result {
            Err(SdkError::Rpc { method, code, .. }) => {
                assert_eq!(method, "Result.PushData");
                assert_eq!(code, tonic::Code::Unavailable);
            }
            other => panic!("Expected Rpc, got: {:?}", other),
        }
        // At-most-once: the failed push was attempted exactly one time.
        assert_eq!(client.transport().pushed_rows().len(), 1);
    }
}
