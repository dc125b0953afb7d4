//! The seam between the facade and the wire.
//!
//! [`PlatformTransport`] mirrors the three gRPC services one method per RPC.
//! [`GrpcTransport`] is the production implementation over a single tonic
//! channel; `RecordingTransport` (feature `test-util`) keeps everything in
//! memory for tests.

mod grpc;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use grpc::GrpcTransport;
#[cfg(any(test, feature = "test-util"))]
pub use mock::{RecordedCall, RecordingTransport};

use crate::proto;
use crate::types::LogLevel;
use async_trait::async_trait;
use tonic::{Request, Response, Status};

/// Unary calls the sidecar exposes.
///
/// Implementations must be safe to call concurrently; the facade shares one
/// transport across every capability group and clone of the client.
#[async_trait]
pub trait PlatformTransport: Send + Sync + 'static {
    async fn get_input_json_string(
        &self,
        request: Request<()>,
    ) -> Result<Response<proto::Data>, Status>;

    async fn set_table_header(
        &self,
        request: Request<proto::TableHeader>,
    ) -> Result<Response<proto::Response>, Status>;

    async fn push_data(
        &self,
        request: Request<proto::Data>,
    ) -> Result<Response<proto::Response>, Status>;

    /// One of `Log.Debug`, `Log.Info`, `Log.Warn`, `Log.Error`, picked by `level`.
    async fn log(
        &self,
        level: LogLevel,
        request: Request<proto::LogBody>,
    ) -> Result<Response<proto::Response>, Status>;
}
