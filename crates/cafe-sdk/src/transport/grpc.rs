//! gRPC transport over one HTTP/2 channel to the sidecar.
//!
//! The three generated clients share a single [`Channel`]; tonic multiplexes
//! concurrent calls over it, so cloning a client per call is cheap and needs
//! no lock.

use super::PlatformTransport;
use crate::config::ClientConfig;
use crate::error::{Result, SdkError};
use crate::proto::{self, log_client::LogClient, parameter_client::ParameterClient};
use crate::proto::result_client::ResultClient;
use crate::types::LogLevel;
use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Response, Status};
use tracing::debug;

/// Production transport: generated tonic clients over one channel.
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    parameter: ParameterClient<Channel>,
    result: ResultClient<Channel>,
    log: LogClient<Channel>,
}

impl GrpcTransport {
    /// Open the channel eagerly so a missing sidecar is reported here and not
    /// on the first call.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let uri = config.endpoint_uri();
        let endpoint = Endpoint::from_shared(uri).map_err(|source| SdkError::InvalidAddress {
            address: config.address.clone(),
            source,
        })?;

        let channel = endpoint
            .connect_timeout(config.connect_timeout)
            .connect()
            .await
            .map_err(|source| SdkError::Connect {
                address: config.address.clone(),
                source,
            })?;

        debug!("Connected to sidecar at {}", config.address);
        Ok(Self::from_channel(channel))
    }

    /// Wrap an already established channel.
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            parameter: ParameterClient::new(channel.clone()),
            result: ResultClient::new(channel.clone()),
            log: LogClient::new(channel),
        }
    }
}

#[async_trait]
impl PlatformTransport for GrpcTransport {
    async fn get_input_json_string(
        &self,
        request: Request<()>,
    ) -> std::result::Result<Response<proto::Data>, Status> {
        self.parameter.clone().get_input_json_string(request).await
    }

    async fn set_table_header(
        &self,
        request: Request<proto::TableHeader>,
    ) -> std::result::Result<Response<proto::Response>, Status> {
        self.result.clone().set_table_header(request).await
    }

    async fn push_data(
        &self,
        request: Request<proto::Data>,
    ) -> std::result::Result<Response<proto::Response>, Status> {
        self.result.clone().push_data(request).await
    }

    async fn log(
        &self,
        level: LogLevel,
        request: Request<proto::LogBody>,
    ) -> std::result::Result<Response<proto::Response>, Status> {
        let mut client = self.log.clone();
        match level {
            LogLevel::Debug => client.debug(request).await,
            LogLevel::Info => client.info(request).await,
            LogLevel::Warn => client.warn(request).await,
            LogLevel::Error => client.error(request).await,
        }
    }
}
