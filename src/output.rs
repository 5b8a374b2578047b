//! Result records produced by conversion and by the interactive session.
//!
//! All of them derive `Serialize` so the CLI can print them with `--json`.

use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A caption track rendered to PDF in memory, before anything touches disk.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Complete PDF file contents.
    pub pdf: Vec<u8>,
    /// Paragraphs in reading order, as laid out.
    pub paragraphs: Vec<String>,
    /// Number of pages in `pdf`.
    pub pages: usize,
}

/// One successfully converted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub input: PathBuf,
    /// Page title, used as the document heading.
    pub title: String,
    pub output_path: PathBuf,
    pub video_token: String,
    pub paragraphs: usize,
    pub pages: usize,
    /// Size of the written PDF.
    pub bytes: usize,
}

/// Outcome for one input of a batch: either `output` or `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub input: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<ConversionOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub duration_ms: u64,
}

impl FileResult {
    pub fn is_success(&self) -> bool {
        self.output.is_some()
    }
}

/// Per-file results of one batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub files: Vec<FileResult>,
    pub converted: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
}

impl BatchSummary {
    /// Inputs whose PDF was written.
    pub fn converted_inputs(&self) -> impl Iterator<Item = &PathBuf> {
        self.files
            .iter()
            .filter(|f| f.is_success())
            .map(|f| &f.input)
    }
}

/// Totals for a whole interactive session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Batches that reached the conversion step.
    pub batches: usize,
    pub converted: usize,
    pub failed: usize,
    /// Original HTML files removed at the end of the session.
    pub deleted: usize,
    /// True when the user backed out of a file or folder prompt.
    pub cancelled: bool,
}
