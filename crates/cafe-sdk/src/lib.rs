//! Cafe SDK - client library for scripts running on the Cafe Scraper platform.
//!
//! The platform starts every script next to a sidecar that owns the run's
//! input, output table and log. This crate talks to that sidecar over one gRPC
//! connection and exposes it as three capability groups on [`CafeClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use cafe_sdk::{CafeClient, CallContext, TableHeaderItem};
//!
//! #[tokio::main]
//! async fn main() -> cafe_sdk::Result<()> {
//!     let client = CafeClient::builder().with_env().connect().await?;
//!     let ctx = CallContext::background();
//!
//!     let input = client.parameter().get_input_json(&ctx).await?;
//!     let _ = client.log().debug(&ctx, format!("input: {}", input)).await;
//!
//!     client
//!         .result()
//!         .set_table_header(&ctx, &[TableHeaderItem::text("Title", "title")])
//!         .await?;
//!     client.result().push_data(&ctx, r#"{"title":"hello"}"#).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod proto;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use client::{CafeClient, CafeClientBuilder, LogApi, ParameterApi, ResultApi};
pub use config::{ClientConfig, RpcConfig};
pub use context::CallContext;
pub use error::{Result, SdkError};
pub use transport::{GrpcTransport, PlatformTransport};
#[cfg(any(test, feature = "test-util"))]
pub use transport::{RecordedCall, RecordingTransport};
pub use types::{ColumnFormat, LogEntry, LogLevel, Response, TableHeaderItem};
