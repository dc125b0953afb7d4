//! In-memory transport that records every call.
//!
//! Lets scripts and the facade be tested without a sidecar: input JSON is
//! canned, failures can be queued, and an artificial latency exercises
//! deadline and cancellation paths.

use super::PlatformTransport;
use crate::proto::{self, method};
use crate::types::LogLevel;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tonic::{Request, Response, Status};

/// A call as the sidecar would have seen it.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    GetInputJsonString,
    SetTableHeader(Vec<proto::TableHeaderItem>),
    PushData(String),
    Log { level: LogLevel, text: String },
}

impl RecordedCall {
    /// RPC method this call was made through.
    pub fn method(&self) -> &'static str {
        match self {
            RecordedCall::GetInputJsonString => method::GET_INPUT_JSON_STRING,
            RecordedCall::SetTableHeader(_) => method::SET_TABLE_HEADER,
            RecordedCall::PushData(_) => method::PUSH_DATA,
            RecordedCall::Log { level, .. } => level.method(),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<RecordedCall>,
    /// Pending failures, optionally restricted to one method.
    failures: VecDeque<(Option<&'static str>, Status)>,
    timeouts: Vec<Option<String>>,
}

/// [`PlatformTransport`] backed by memory.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    input_json: String,
    latency: Option<Duration>,
    state: Mutex<State>,
}

impl RecordingTransport {
    /// A transport whose `GetInputJSONString` returns `input_json`.
    pub fn new(input_json: impl Into<String>) -> Self {
        Self {
            input_json: input_json.into(),
            ..Self::default()
        }
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next call (of any kind) fail with `status`.
    ///
    /// The failed call is still recorded.
    pub fn fail_next(&self, status: Status) {
        self.state().failures.push_back((None, status));
    }

    /// Make the next call to `method` (e.g. `"Result.PushData"`) fail with
    /// `status`. Calls to other methods go through untouched.
    pub fn fail_next_on(&self, method: &'static str, status: Status) {
        self.state().failures.push_back((Some(method), status));
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Rows received by `PushData`, in arrival order.
    pub fn pushed_rows(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::PushData(row) => Some(row.clone()),
                _ => None,
            })
            .collect()
    }

    /// Log lines received, in arrival order.
    pub fn log_lines(&self) -> Vec<(LogLevel, String)> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Log { level, text } => Some((*level, text.clone())),
                _ => None,
            })
            .collect()
    }

    /// The `grpc-timeout` header of each call, in arrival order.
    pub fn timeouts(&self) -> Vec<Option<String>> {
        self.state().timeouts.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn record(&self, call: RecordedCall, timeout: Option<String>) -> Result<(), Status> {
        let failure = {
            let mut state = self.state();
            let target = call.method();
            let position = state
                .failures
                .iter()
                .position(|(only, _)| only.map_or(true, |m| m == target));
            state.calls.push(call);
            state.timeouts.push(timeout);
            position
                .and_then(|index| state.failures.remove(index))
                .map(|(_, status)| status)
        };

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match failure {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }

    fn grpc_timeout<T>(request: &Request<T>) -> Option<String> {
        request
            .metadata()
            .get("grpc-timeout")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    fn ack() -> Response<proto::Response> {
        Response::new(proto::Response {
            success: true,
            message: String::new(),
        })
    }
}

#[async_trait]
impl PlatformTransport for RecordingTransport {
    async fn get_input_json_string(
        &self,
        request: Request<()>,
    ) -> Result<Response<proto::Data>, Status> {
        self.record(RecordedCall::GetInputJsonString, Self::grpc_timeout(&request))
            .await?;
        Ok(Response::new(proto::Data {
            json_string: self.input_json.clone(),
        }))
    }

    async fn set_table_header(
        &self,
        request: Request<proto::TableHeader>,
    ) -> Result<Response<proto::Response>, Status> {
        let call = RecordedCall::SetTableHeader(request.get_ref().headers.clone());
        self.record(call, Self::grpc_timeout(&request)).await?;
        Ok(Self::ack())
    }

    async fn push_data(
        &self,
        request: Request<proto::Data>,
    ) -> Result<Response<proto::Response>, Status> {
        let call = RecordedCall::PushData(request.get_ref().json_string.clone());
        self.record(call, Self::grpc_timeout(&request)).await?;
        Ok(Self::ack())
    }

    async fn log(
        &self,
        level: LogLevel,
        request: Request<proto::LogBody>,
    ) -> Result<Response<proto::Response>, Status> {
        let call = RecordedCall::Log {
            level,
            text: request.get_ref().log.clone(),
        };
        self.record(call, Self::grpc_timeout(&request)).await?;
        Ok(Self::ack())
    }
}
