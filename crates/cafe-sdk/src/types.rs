//! Value types exchanged with the platform.
//!
//! Severity and column format are closed enums here even though the wire
//! carries them as a method name and a plain string respectively.

use crate::error::SdkError;
use crate::proto;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Table header
// =============================================================================

/// Display format of one output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnFormat {
    #[default]
    Text,
    Integer,
    Boolean,
    Array,
    Object,
}

impl ColumnFormat {
    pub const ALL: [ColumnFormat; 5] = [
        ColumnFormat::Text,
        ColumnFormat::Integer,
        ColumnFormat::Boolean,
        ColumnFormat::Array,
        ColumnFormat::Object,
    ];

    /// The tag the platform expects on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnFormat::Text => "text",
            ColumnFormat::Integer => "integer",
            ColumnFormat::Boolean => "boolean",
            ColumnFormat::Array => "array",
            ColumnFormat::Object => "object",
        }
    }
}

impl fmt::Display for ColumnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnFormat {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SdkError::Validation {
                field: "format".to_string(),
                message: format!("unknown column format: {}", s),
            })
    }
}

/// One column of the result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHeaderItem {
    /// Column title shown to the user.
    pub label: String,
    /// Key the column is read from in every pushed row.
    pub key: String,
    pub format: ColumnFormat,
}

impl TableHeaderItem {
    pub fn new(label: impl Into<String>, key: impl Into<String>, format: ColumnFormat) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
            format,
        }
    }

    /// A `text` column, the common case.
    pub fn text(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(label, key, ColumnFormat::Text)
    }
}

impl From<&TableHeaderItem> for proto::TableHeaderItem {
    fn from(item: &TableHeaderItem) -> Self {
        proto::TableHeaderItem {
            label: item.label.clone(),
            key: item.key.clone(),
            format: item.format.as_str().to_string(),
        }
    }
}

impl TryFrom<proto::TableHeaderItem> for TableHeaderItem {
    type Error = SdkError;

    fn try_from(item: proto::TableHeaderItem) -> Result<Self, Self::Error> {
        Ok(Self {
            format: item.format.parse()?,
            label: item.label,
            key: item.key,
        })
    }
}

/// Build the wire envelope for a header declaration, preserving order.
pub(crate) fn table_header(items: &[TableHeaderItem]) -> proto::TableHeader {
    proto::TableHeader {
        headers: items.iter().map(proto::TableHeaderItem::from).collect(),
    }
}

// =============================================================================
// Logs
// =============================================================================

/// Severity of a platform log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// RPC method that carries this severity.
    pub fn method(&self) -> &'static str {
        match self {
            LogLevel::Debug => proto::method::LOG_DEBUG,
            LogLevel::Info => proto::method::LOG_INFO,
            LogLevel::Warn => proto::method::LOG_WARN,
            LogLevel::Error => proto::method::LOG_ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(SdkError::Validation {
                field: "level".to_string(),
                message: format!("unknown log level: {}", other),
            }),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// One line of the run log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub text: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

// =============================================================================
// Acknowledgement
// =============================================================================

/// Acknowledgement returned by mutating calls.
///
/// Receiving one means the call did not fail; the fields are diagnostic only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
}

impl From<proto::Response> for Response {
    fn from(res: proto::Response) -> Self {
        Self {
            success: res.success,
            message: res.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_format_parse() {
        for format in ColumnFormat::ALL {
            assert_eq!(format.as_str().parse::<ColumnFormat>().unwrap(), format);
        }
        assert_eq!("TEXT".parse::<ColumnFormat>().unwrap(), ColumnFormat::Text);
    }

    #[test]
    fn test_column_format_rejects_unknown() {
        let err = "float".parse::<ColumnFormat>().unwrap_err();
        match err {
            SdkError::Validation { field, message } => {
                assert_eq!(field, "format");
                assert!(message.contains("float"));
            }
            other => panic!("Expected Validation, got: {:?}", other),
        }
    }

    #[test]
    fn test_column_format_serde_matches_wire_tags() {
        let json = serde_json::to_string(&ColumnFormat::Boolean).unwrap();
        assert_eq!(json, "\"boolean\"");
    }

    #[test]
    fn test_table_header_preserves_order_and_tags() {
        let items = vec![
            TableHeaderItem::text("Title", "title"),
            TableHeaderItem::new("Tags", "tags", ColumnFormat::Array),
        ];
        let header = table_header(&items);

        assert_eq!(header.headers.len(), 2);
        assert_eq!(header.headers[0].key, "title");
        assert_eq!(header.headers[0].format, "text");
        assert_eq!(header.headers[1].label, "Tags");
        assert_eq!(header.headers[1].format, "array");
    }

    #[test]
    fn test_table_header_item_from_wire() {
        let wire = proto::TableHeaderItem {
            label: "Count".into(),
            key: "count".into(),
            format: "integer".into(),
        };
        let item = TableHeaderItem::try_from(wire).unwrap();
        assert_eq!(item, TableHeaderItem::new("Count", "count", ColumnFormat::Integer));
    }

    #[test]
    fn test_log_level_parse_and_method() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("fatal".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Error.method(), "Log.Error");
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
    }

    #[test]
    fn test_response_from_wire() {
        let res = Response::from(proto::Response {
            success: true,
            message: "ok".into(),
        });
        assert!(res.success);
        assert_eq!(res.message, "ok");
    }
}
