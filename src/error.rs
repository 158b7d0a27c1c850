//! Error types for synodl
//!
//! This module provides error handling for the client, including:
//! - Domain-specific error variants (config, transport, remote API)
//! - Constant lookup tables mapping remote error codes to readable reasons
//! - A crate-wide [`Result`] alias

use thiserror::Error;

/// Result type alias for synodl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for synodl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file missing, unreadable, or invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Network or transport failure reaching the remote service
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote service answered with a non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    /// The remote service answered at the transport level but signalled a
    /// domain failure via its error envelope
    #[error("API error: {reason}")]
    Api {
        /// Raw remote error code
        code: i64,
        /// Decoded reason, or the bare code when the table has no entry
        reason: String,
    },

    /// Response payload was valid JSON but missing an expected field
    #[error("malformed response: missing field `{0}`")]
    MissingField(&'static str),

    /// Requested task id does not exist on the remote service
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// A pipeline worker or collector task panicked or was cancelled
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL construction error
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Which remote API family produced an error code.
///
/// The Synology web API reuses numeric ranges across APIs, so decoding a code
/// requires knowing which API the request targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiScope {
    /// `SYNO.API.Auth`
    Auth,
    /// `SYNO.DownloadStation.Task`
    DownloadStation,
    /// `SYNO.FileStation.*`
    FileStation,
}

impl Error {
    /// Build an [`Error::Api`] from a remote error code, decoding it through
    /// the scope's lookup table.
    ///
    /// Known codes render as `(code) reason`; unknown codes fall back to the
    /// bare numeric code.
    pub fn api(scope: ApiScope, code: i64) -> Self {
        let reason = match describe_code(scope, code) {
            Some(text) => format!("({code}) {text}"),
            None => format!("({code})"),
        };
        Error::Api { code, reason }
    }

    /// Build an [`Error::Api`] for a File Station operation that carries a
    /// nested operation error code alongside the top-level one.
    pub fn file_operation(code: i64, nested_code: i64) -> Self {
        let mut reason = match describe_code(ApiScope::FileStation, code) {
            Some(text) => format!("({code}) {text}"),
            None => format!("({code})"),
        };
        if let Some(text) = describe_operation_code(nested_code) {
            reason = format!("{reason}: {text}");
        }
        Error::Api { code, reason }
    }
}

/// Decode a remote error code into a human-readable reason.
///
/// Codes 100-107 are shared across all APIs; the remaining ranges are scoped
/// per API family. Returns `None` for codes absent from the tables.
pub fn describe_code(scope: ApiScope, code: i64) -> Option<&'static str> {
    // Common codes first, identical for every API
    match code {
        100 => return Some("Unknown error"),
        101 => return Some("Invalid parameter"),
        102 => return Some("The requested API does not exist"),
        103 => return Some("The requested method does not exist"),
        104 => return Some("The requested version does not support the functionality"),
        105 => return Some("The logged in session does not have permission"),
        106 => return Some("Session timeout"),
        107 => return Some("Session interrupted by duplicate login"),
        _ => {}
    }

    match scope {
        ApiScope::Auth => match code {
            400 => Some("No such account or incorrect password"),
            401 => Some("Account disabled"),
            402 => Some("Permission denied"),
            403 => Some("2-step verification code required"),
            404 => Some("Failed to authenticate 2-step verification code"),
            _ => None,
        },
        ApiScope::DownloadStation => match code {
            400 => Some("File upload failed"),
            401 => Some("Max number of tasks reached"),
            402 => Some("Destination denied"),
            403 => Some("Destination does not exist"),
            404 => Some("Invalid task id"),
            405 => Some("Invalid task action"),
            406 => Some("No default destination"),
            407 => Some("Set destination failed"),
            408 => Some("File does not exist"),
            _ => None,
        },
        ApiScope::FileStation => match code {
            1002 => Some("An error occurred at the destination"),
            1200 => Some("Failed to rename file"),
            _ => None,
        },
    }
}

/// Decode a File Station nested operation error code.
///
/// These arrive inside `error.errors[0].code` of a File Station response and
/// describe the specific file operation failure.
pub fn describe_operation_code(code: i64) -> Option<&'static str> {
    match code {
        400 => Some("Invalid parameter of file operation"),
        401 => Some("Unknown error of file operation"),
        402 => Some("System is too busy"),
        403 => Some("Invalid user does this file operation"),
        404 => Some("Invalid group does this file operation"),
        405 => Some("Invalid user and group does this file operation"),
        406 => Some("Can't get user/group information from the account server"),
        407 => Some("Operation not permitted"),
        408 => Some("No such file or directory"),
        409 => Some("Non-supported file system"),
        410 => Some("Failed to connect internet-based file system"),
        411 => Some("Read-only file system"),
        412 => Some("Filename too long in the non-encrypted file system"),
        413 => Some("Filename too long in the encrypted file system"),
        414 => Some("File already exists"),
        415 => Some("Disk quota exceeded"),
        416 => Some("No space left on device"),
        417 => Some("Input/output error"),
        418 => Some("Illegal name or path"),
        419 => Some("Illegal file name"),
        420 => Some("Illegal file name on FAT file system"),
        421 => Some("Device or resource busy"),
        599 => Some("No such task of the file operation"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_codes_decode_in_every_scope() {
        for scope in [
            ApiScope::Auth,
            ApiScope::DownloadStation,
            ApiScope::FileStation,
        ] {
            assert_eq!(describe_code(scope, 106), Some("Session timeout"));
        }
    }

    #[test]
    fn scoped_codes_do_not_leak_between_apis() {
        // 401 means different things per API
        assert_eq!(describe_code(ApiScope::Auth, 401), Some("Account disabled"));
        assert_eq!(
            describe_code(ApiScope::DownloadStation, 401),
            Some("Max number of tasks reached")
        );
        assert_eq!(describe_code(ApiScope::FileStation, 401), None);
    }

    #[test]
    fn api_error_includes_code_and_reason() {
        let err = Error::api(ApiScope::DownloadStation, 402);
        assert_eq!(err.to_string(), "API error: (402) Destination denied");
    }

    #[test]
    fn unknown_code_falls_back_to_numeric() {
        let err = Error::api(ApiScope::DownloadStation, 999);
        assert_eq!(err.to_string(), "API error: (999)");
    }

    #[test]
    fn file_operation_error_appends_nested_reason() {
        let err = Error::file_operation(1200, 414);
        assert_eq!(
            err.to_string(),
            "API error: (1200) Failed to rename file: File already exists"
        );
    }
}
