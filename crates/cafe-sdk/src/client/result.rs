//! Output table: header declaration and row submission.

use super::CafeClient;
use crate::context::CallContext;
use crate::error::Result;
use crate::proto::{self, method};
use crate::transport::PlatformTransport;
use crate::types::{table_header, Response, TableHeaderItem};
use serde::Serialize;

/// Access to the run's output table.
///
/// Header and rows may be sent in any order; the sidecar, not this client,
/// decides whether a row matches the declared columns. Rows accepted before a
/// failed push stay accepted.
#[derive(Debug)]
pub struct ResultApi<'a, T: PlatformTransport> {
    client: &'a CafeClient<T>,
}

impl<'a, T: PlatformTransport> ResultApi<'a, T> {
    pub(super) fn new(client: &'a CafeClient<T>) -> Self {
        Self { client }
    }

    /// Declare the table columns, in display order.
    ///
    /// Calling it again resends the whole declaration.
    pub async fn set_table_header(
        &self,
        ctx: &CallContext,
        items: &[TableHeaderItem],
    ) -> Result<Response> {
        let request = self.client.request(ctx, table_header(items))?;
        let res = self
            .client
            .call(
                ctx,
                method::SET_TABLE_HEADER,
                self.client.transport.set_table_header(request),
            )
            .await?;
        Ok(res.into())
    }

    /// Submit one row, already encoded as a JSON object.
    ///
    /// Exactly one remote call per invocation: no batching and no retry.
    pub async fn push_data(&self, ctx: &CallContext, row: impl Into<String>) -> Result<Response> {
        let data = proto::Data {
            json_string: row.into(),
        };
        let request = self.client.request(ctx, data)?;
        let res = self
            .client
            .call(
                ctx,
                method::PUSH_DATA,
                self.client.transport.push_data(request),
            )
            .await?;
        Ok(res.into())
    }

    /// Serialize `record` to JSON and submit it as one row.
    pub async fn push_record<R: Serialize + ?Sized>(
        &self,
        ctx: &CallContext,
        record: &R,
    ) -> Result<Response> {
        let row = serde_json::to_string(record)?;
        self.push_data(ctx, row).await
    }
}
