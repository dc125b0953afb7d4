//! Run input.

use super::CafeClient;
use crate::context::CallContext;
use crate::error::Result;
use crate::proto::method;
use crate::transport::PlatformTransport;
use serde::de::DeserializeOwned;

/// Access to the input parameters the platform resolved for this run.
#[derive(Debug)]
pub struct ParameterApi<'a, T: PlatformTransport> {
    client: &'a CafeClient<T>,
}

impl<'a, T: PlatformTransport> ParameterApi<'a, T> {
    pub(super) fn new(client: &'a CafeClient<T>) -> Self {
        Self { client }
    }

    /// The raw input JSON, exactly as the platform supplied it.
    ///
    /// The string is not parsed or validated; its shape is defined by the
    /// script's own input form.
    pub async fn get_input_json(&self, ctx: &CallContext) -> Result<String> {
        let request = self.client.request(ctx, ())?;
        let data = self
            .client
            .call(
                ctx,
                method::GET_INPUT_JSON_STRING,
                self.client.transport.get_input_json_string(request),
            )
            .await?;
        Ok(data.json_string)
    }

    /// The input JSON decoded into a type of the caller's choosing.
    pub async fn get_input<P: DeserializeOwned>(&self, ctx: &CallContext) -> Result<P> {
        let json = self.get_input_json(ctx).await?;
        Ok(serde_json::from_str(&json)?)
    }
}
