use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

use anyhow::Error as AnyhowError;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use sqlx::error::ErrorKind as SqlxErrorKind;
use sqlx::Error as SqlxError;
use std::io::Error as IoError;

#[cfg(feature = "typescript")]
use ts_rs::TS;

pub const STORAGE_DATABASE: &str = "STORAGE/DATABASE";
pub const STORAGE_TRANSPORT: &str = "STORAGE/TRANSPORT";
pub const STORAGE_DECODE: &str = "STORAGE/DECODE";
pub const STORAGE_HTTP_STATUS: &str = "STORAGE/HTTP_STATUS";
pub const NOT_FOUND_ROW: &str = "NOT_FOUND/ROW";
pub const NOT_FOUND_CLIENT: &str = "NOT_FOUND/CLIENT";
pub const VALIDATION_CONSTRAINT: &str = "VALIDATION/CONSTRAINT";
pub const VALIDATION_UNIQUE: &str = "VALIDATION/UNIQUE";
pub const VALIDATION_REQUIRED: &str = "VALIDATION/REQUIRED_FIELD";
pub const VALIDATION_UNKNOWN_COLUMN: &str = "VALIDATION/UNKNOWN_COLUMN";
pub const VALIDATION_PAYLOAD: &str = "VALIDATION/PAYLOAD";

/// The three failure categories callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Storage,
    NotFound,
    Validation,
}

/// A structured application error that can be serialized and surfaced to the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct AppError {
    /// Machine readable error code, namespaced by category.
    pub code: String,
    /// Human friendly message that can be shown directly to the user.
    pub message: String,
    /// Arbitrary key/value pairs that provide additional context.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    #[cfg_attr(feature = "typescript", ts(optional, type = "Record<string, string>"))]
    pub context: HashMap<String, String>,
    /// Optional nested cause that preserves the error chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "typescript", ts(optional))]
    pub cause: Option<Box<AppError>>,
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Default code used when an upstream error does not expose a specific code.
    pub const UNKNOWN_CODE: &'static str = "STORAGE/UNKNOWN";
    /// Code used for errors created from free-form messages.
    pub const GENERIC_CODE: &'static str = "APP/GENERIC";

    /// Construct a new application error with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        AppError {
            code: code.into(),
            message: message.into(),
            context: HashMap::new(),
            cause: None,
        }
    }

    pub fn not_found(what: &str, id: &str) -> Self {
        AppError::new(NOT_FOUND_ROW, format!("{what} not found")).with_context("id", id)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &HashMap<String, String> {
        &self.context
    }

    pub fn cause(&self) -> Option<&AppError> {
        self.cause.as_deref()
    }

    /// Category derived from the code namespace. Anything outside the
    /// `NOT_FOUND/` and `VALIDATION/` namespaces counts as a storage failure.
    pub fn kind(&self) -> ErrorKind {
        if self.code.starts_with("NOT_FOUND/") {
            ErrorKind::NotFound
        } else if self.code.starts_with("VALIDATION/") {
            ErrorKind::Validation
        } else {
            ErrorKind::Storage
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code == VALIDATION_UNIQUE
    }

    /// Adds a contextual key/value pair to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Extends the context map with additional key/value pairs.
    pub fn with_contexts<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.context
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the nested cause for the error.
    pub fn with_cause(mut self, cause: impl Into<AppError>) -> Self {
        self.cause = Some(Box::new(cause.into()));
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "[{}] {}", self.code, self.message)
        } else {
            write!(f, "[{}] {} ({:?})", self.code, self.message, self.context)
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl From<&str> for AppError {
    fn from(message: &str) -> Self {
        AppError::new(AppError::GENERIC_CODE, message)
    }
}

impl From<String> for AppError {
    fn from(message: String) -> Self {
        AppError::new(AppError::GENERIC_CODE, message)
    }
}

impl From<AnyhowError> for AppError {
    fn from(error: AnyhowError) -> Self {
        fn convert(err: &(dyn StdError + 'static)) -> AppError {
            if let Some(app) = err.downcast_ref::<AppError>() {
                return app.clone();
            }

            let mut root = AppError::new(AppError::UNKNOWN_CODE, err.to_string());
            if let Some(source) = err.source() {
                root.cause = Some(Box::new(convert(source)));
            }
            root
        }

        convert(error.as_ref())
    }
}

impl From<IoError> for AppError {
    fn from(error: IoError) -> Self {
        let code = format!("STORAGE/IO_{:?}", error.kind());
        let mut app_error = AppError::new(code, error.to_string());
        if let Some(os_code) = error.raw_os_error() {
            app_error = app_error.with_context("os_code", os_code.to_string());
        }
        app_error
    }
}

impl From<SerdeJsonError> for AppError {
    fn from(error: SerdeJsonError) -> Self {
        let code = if error.is_data() {
            VALIDATION_PAYLOAD
        } else {
            STORAGE_DECODE
        };

        let mut app_error = AppError::new(code, error.to_string());
        let line = error.line();
        if line > 0 {
            app_error = app_error.with_context("line", line.to_string());
        }
        let column = error.column();
        if column > 0 {
            app_error = app_error.with_context("column", column.to_string());
        }
        app_error
    }
}

impl From<SqlxError> for AppError {
    fn from(error: SqlxError) -> Self {
        match error {
            SqlxError::RowNotFound => AppError::new(NOT_FOUND_ROW, "Record not found"),
            SqlxError::ColumnNotFound(name) => {
                AppError::new(STORAGE_DECODE, format!("Column not found: {name}"))
            }
            SqlxError::PoolTimedOut => AppError::new(
                "STORAGE/POOL_TIMEOUT",
                "Timed out acquiring a database connection",
            ),
            SqlxError::PoolClosed => AppError::new("STORAGE/POOL_CLOSED", "Database pool is closed"),
            SqlxError::Io(err) => AppError::from(err).with_context("source", "sqlx"),
            SqlxError::Database(db) => {
                let code = match db.kind() {
                    SqlxErrorKind::UniqueViolation => VALIDATION_UNIQUE,
                    SqlxErrorKind::NotNullViolation => VALIDATION_REQUIRED,
                    SqlxErrorKind::ForeignKeyViolation | SqlxErrorKind::CheckViolation => {
                        VALIDATION_CONSTRAINT
                    }
                    _ => STORAGE_DATABASE,
                };
                let mut app_error = AppError::new(code, db.message().to_string());
                if let Some(sqlite_code) = db.code() {
                    app_error = app_error.with_context("sqlite_code", sqlite_code.to_string());
                }
                if let Some(constraint) = db.constraint() {
                    app_error = app_error.with_context("constraint", constraint.to_string());
                }
                app_error
            }
            SqlxError::ColumnDecode { index, source } => {
                AppError::new(STORAGE_DECODE, source.to_string())
                    .with_context("column_index", index.to_string())
            }
            SqlxError::Decode(decode_err) => AppError::new(STORAGE_DECODE, decode_err.to_string()),
            other => AppError::new(STORAGE_DATABASE, other.to_string()),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        let mut app_error = if error.is_decode() {
            AppError::new(STORAGE_DECODE, error.to_string())
        } else {
            AppError::new(STORAGE_TRANSPORT, error.to_string())
        };
        if let Some(status) = error.status() {
            app_error = app_error.with_context("status", status.as_u16().to_string());
        }
        if error.is_timeout() {
            app_error = app_error.with_context("timeout", "true");
        }
        app_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn builds_error_with_context_and_cause() {
        let error = AppError::new("TEST/CODE", "Something went wrong")
            .with_context("table", "budget")
            .with_context("id", "1234")
            .with_cause(AppError::from("inner failure"));

        assert_eq!(error.code(), "TEST/CODE");
        assert_eq!(error.message(), "Something went wrong");
        assert_eq!(error.context().get("table"), Some(&"budget".to_string()));
        assert_eq!(error.context().get("id"), Some(&"1234".to_string()));
        let cause = error.cause().expect("cause present");
        assert_eq!(cause.message(), "inner failure");
        assert_eq!(cause.code(), AppError::GENERIC_CODE);
    }

    #[test]
    fn kind_follows_code_namespace() {
        assert_eq!(AppError::new(NOT_FOUND_ROW, "x").kind(), ErrorKind::NotFound);
        assert_eq!(AppError::new(VALIDATION_UNIQUE, "x").kind(), ErrorKind::Validation);
        assert_eq!(AppError::new(STORAGE_TRANSPORT, "x").kind(), ErrorKind::Storage);
        assert_eq!(AppError::from("free form").kind(), ErrorKind::Storage);
        assert!(AppError::new(VALIDATION_UNIQUE, "x").is_unique_violation());
    }

    #[test]
    fn converts_anyhow_error_chain_into_nested_causes() {
        let err = (|| -> anyhow::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
                .context("failed to save file")
        })()
        .unwrap_err();

        let app_error = AppError::from(err);
        assert_eq!(app_error.code(), AppError::UNKNOWN_CODE);
        assert_eq!(app_error.message(), "failed to save file");

        let cause = app_error.cause().expect("io cause present");
        assert!(cause.message().contains("disk full"));
    }

    #[test]
    fn converts_anyhow_preserves_existing_app_error() {
        let inner = AppError::new(VALIDATION_REQUIRED, "nope").with_context("field", "bank_name");
        let err = AnyhowError::from(inner.clone()).context("outer failure");

        let converted = AppError::from(err);
        assert_eq!(converted.message(), "outer failure");
        assert_eq!(converted.cause().expect("inner cause present"), &inner);
    }

    #[test]
    fn serde_json_data_errors_are_validation_failures() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Shape {
            balance: f64,
        }
        let err = serde_json::from_str::<Shape>("{\"balance\": \"lots\"}").expect_err("bad type");
        let app_error = AppError::from(err);
        assert_eq!(app_error.code(), VALIDATION_PAYLOAD);
        assert!(app_error.context().contains_key("line"));
    }

    #[test]
    fn sqlx_row_not_found_translates_to_not_found() {
        let app_error = AppError::from(SqlxError::RowNotFound);
        assert_eq!(app_error.code(), NOT_FOUND_ROW);
        assert!(app_error.is_not_found());
    }

    #[test]
    fn io_error_contains_raw_code_when_available() {
        let app_error = AppError::from(IoError::from_raw_os_error(2));
        assert_eq!(app_error.code(), "STORAGE/IO_NotFound");
        assert_eq!(app_error.context().get("os_code"), Some(&"2".to_string()));
    }

    #[test]
    fn json_shape_is_flat_struct() {
        let error = AppError::new(VALIDATION_PAYLOAD, "nope").with_context("field", "name");
        let value = serde_json::to_value(&error).expect("serialize app error");
        assert_eq!(value["code"], "VALIDATION/PAYLOAD");
        assert_eq!(value["message"], "nope");
        assert_eq!(value["context"]["field"], "name");
        assert!(value.get("cause").is_none());
    }
}
