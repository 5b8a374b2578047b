//! Error types for the vtt2pdf library.
//!
//! Every failure is scoped to a single input file. A batch never aborts
//! because one saved page lacks a video token or one caption download fails:
//! the converter records the error, reports it, and moves on to the next file.
//!
//! [`ErrorKind`] groups the variants into the four categories a user cares
//! about (network, HTTP, extraction, filesystem) plus configuration and
//! internal faults, and supplies the title shown in error dialogs.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the vtt2pdf library.
#[derive(Debug, Error)]
pub enum Vtt2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("HTML file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not carry an `.html` / `.htm` extension.
    #[error("Not an HTML file: '{path}'")]
    NotHtml { path: PathBuf },

    /// No embedded player URL was found in the page.
    #[error("Video token not found in '{path}'")]
    TokenNotFound { path: PathBuf },

    // ── Caption download errors ───────────────────────────────────────────
    /// Could not reach the caption server.
    #[error("Unable to connect to the server for '{url}': {reason}")]
    NetworkFailure { url: String, reason: String },

    /// The caption request timed out. `secs` is the configured limit, if any;
    /// without one the timeout came from the HTTP client itself.
    #[error("Caption download timed out{} for '{url}'\nIncrease --timeout.", after_secs(.secs))]
    Timeout { url: String, secs: Option<u64> },

    /// The caption server answered with a non-2xx status.
    #[error("HTTP error occurred: {status} for url '{url}'")]
    HttpStatus { url: String, status: u16 },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not delete an original HTML file.
    #[error("Failed to delete '{path}': {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error category, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connection failure or timeout.
    Network,
    /// Non-2xx HTTP status.
    Protocol,
    /// Nothing usable found in the HTML.
    Extraction,
    /// Reading, writing or deleting a file failed.
    Filesystem,
    /// Invalid configuration.
    Config,
    /// Bug or runtime failure.
    Internal,
}

impl ErrorKind {
    /// Title used for the user-facing error dialog.
    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::Network => "Network Error",
            ErrorKind::Protocol => "HTTP Error",
            ErrorKind::Extraction | ErrorKind::Filesystem | ErrorKind::Internal => "Error",
            ErrorKind::Config => "Configuration Error",
        }
    }
}

fn after_secs(secs: &Option<u64>) -> String {
    secs.map(|s| format!(" after {s}s")).unwrap_or_default()
}

impl Vtt2PdfError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Vtt2PdfError::NetworkFailure { .. } | Vtt2PdfError::Timeout { .. } => {
                ErrorKind::Network
            }
            Vtt2PdfError::HttpStatus { .. } => ErrorKind::Protocol,
            Vtt2PdfError::TokenNotFound { .. } | Vtt2PdfError::NotHtml { .. } => {
                ErrorKind::Extraction
            }
            Vtt2PdfError::InputNotFound { .. }
            | Vtt2PdfError::PermissionDenied { .. }
            | Vtt2PdfError::ReadFailed { .. }
            | Vtt2PdfError::OutputWriteFailed { .. }
            | Vtt2PdfError::DeleteFailed { .. } => ErrorKind::Filesystem,
            Vtt2PdfError::InvalidConfig(_) => ErrorKind::Config,
            Vtt2PdfError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_display() {
        let e = Vtt2PdfError::HttpStatus {
            url: "https://fast.wistia.net/embed/captions/abc.vtt".into(),
            status: 404,
        };
        let msg = e.to_string();
        assert!(msg.contains("404"), "got: {msg}");
        assert_eq!(e.kind(), ErrorKind::Protocol);
        assert_eq!(e.kind().title(), "HTTP Error");
    }

    #[test]
    fn network_kinds() {
        let e = Vtt2PdfError::NetworkFailure {
            url: "https://example.invalid".into(),
            reason: "dns".into(),
        };
        assert_eq!(e.kind(), ErrorKind::Network);
        assert_eq!(e.kind().title(), "Network Error");

        let e = Vtt2PdfError::Timeout {
            url: "https://example.invalid".into(),
            secs: Some(5),
        };
        assert_eq!(e.kind(), ErrorKind::Network);
        assert!(e.to_string().contains("timed out after 5s"));
    }

    #[test]
    fn timeout_without_limit_omits_duration() {
        let e = Vtt2PdfError::Timeout {
            url: "https://example.invalid".into(),
            secs: None,
        };
        let msg = e.to_string();
        assert!(msg.starts_with("Caption download timed out for 'https://example.invalid'"));
        assert!(!msg.contains("0s"));
    }

    #[test]
    fn token_not_found_display() {
        let e = Vtt2PdfError::TokenNotFound {
            path: PathBuf::from("lesson.html"),
        };
        assert!(e.to_string().contains("lesson.html"));
        assert_eq!(e.kind(), ErrorKind::Extraction);
    }

    #[test]
    fn delete_failed_is_filesystem() {
        let e = Vtt2PdfError::DeleteFailed {
            path: PathBuf::from("gone.html"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(e.kind(), ErrorKind::Filesystem);
        assert!(e.to_string().contains("gone.html"));
    }
}
