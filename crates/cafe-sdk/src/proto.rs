//! Generated protobuf messages and gRPC stubs for the `cafesdk` package.

#![allow(missing_docs)]
#![allow(clippy::doc_markdown)]

tonic::include_proto!("cafesdk");

/// Method names used in logs and errors.
pub mod method {
    pub const GET_INPUT_JSON_STRING: &str = "Parameter.GetInputJSONString";
    pub const SET_TABLE_HEADER: &str = "Result.SetTableHeader";
    pub const PUSH_DATA: &str = "Result.PushData";
    pub const LOG_DEBUG: &str = "Log.Debug";
    pub const LOG_INFO: &str = "Log.Info";
    pub const LOG_WARN: &str = "Log.Warn";
    pub const LOG_ERROR: &str = "Log.Error";
}
