//! Run log.

use super::CafeClient;
use crate::context::CallContext;
use crate::error::Result;
use crate::proto;
use crate::transport::PlatformTransport;
use crate::types::{LogEntry, LogLevel, Response};

/// Access to the platform's run log.
///
/// Scripts usually ignore the result of these calls; a lost log line should
/// not abort a run.
#[derive(Debug)]
pub struct LogApi<'a, T: PlatformTransport> {
    client: &'a CafeClient<T>,
}

impl<'a, T: PlatformTransport> LogApi<'a, T> {
    pub(super) fn new(client: &'a CafeClient<T>) -> Self {
        Self { client }
    }

    pub async fn debug(&self, ctx: &CallContext, text: impl Into<String>) -> Result<Response> {
        self.emit(ctx, LogLevel::Debug, text).await
    }

    pub async fn info(&self, ctx: &CallContext, text: impl Into<String>) -> Result<Response> {
        self.emit(ctx, LogLevel::Info, text).await
    }

    pub async fn warn(&self, ctx: &CallContext, text: impl Into<String>) -> Result<Response> {
        self.emit(ctx, LogLevel::Warn, text).await
    }

    pub async fn error(&self, ctx: &CallContext, text: impl Into<String>) -> Result<Response> {
        self.emit(ctx, LogLevel::Error, text).await
    }

    /// Send `text` at `level`.
    pub async fn emit(
        &self,
        ctx: &CallContext,
        level: LogLevel,
        text: impl Into<String>,
    ) -> Result<Response> {
        let body = proto::LogBody { log: text.into() };
        let request = self.client.request(ctx, body)?;
        let res = self
            .client
            .call(ctx, level.method(), self.client.transport.log(level, request))
            .await?;
        Ok(res.into())
    }

    pub async fn write(&self, ctx: &CallContext, entry: LogEntry) -> Result<Response> {
        self.emit(ctx, entry.level, entry.text).await
    }
}
