//! Input handling: pick the HTML files to convert, read them, delete them.
//!
//! Users point the tool at a handful of saved pages, or at the folder they
//! were saved into. Directories are expanded one level to their `.html` /
//! `.htm` files; anything else is reported back as skipped rather than failing
//! the whole batch.

use crate::error::Vtt2PdfError;
use crate::pipeline::html;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What a saved page tells us before any network access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlSource {
    pub path: PathBuf,
    /// Contents of `<title>`, whitespace-collapsed.
    pub title: String,
    /// Token from the embedded player URL, if one was found.
    pub video_token: Option<String>,
}

/// Result of expanding user-supplied paths.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollectedInputs {
    /// HTML files to convert, in the order given (directory contents sorted).
    pub files: Vec<PathBuf>,
    /// Paths ignored because they are not HTML files.
    pub skipped: Vec<PathBuf>,
}

/// True for `*.html` / `*.htm`, case-insensitively.
pub fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

/// Expand directories and filter by extension.
///
/// Paths that do not exist are kept when they look like HTML files so the
/// converter can report them as missing.
pub fn collect_inputs(paths: &[PathBuf]) -> CollectedInputs {
    let mut collected = CollectedInputs::default();

    for path in paths {
        if path.is_dir() {
            match std::fs::read_dir(path) {
                Ok(entries) => {
                    let mut found: Vec<PathBuf> = entries
                        .filter_map(|e| e.ok().map(|e| e.path()))
                        .filter(|p| p.is_file() && is_html(p))
                        .collect();
                    found.sort();
                    debug!("{} HTML files in {}", found.len(), path.display());
                    collected.files.extend(found);
                }
                Err(e) => {
                    warn!("Cannot list {}: {}", path.display(), e);
                    collected.skipped.push(path.clone());
                }
            }
        } else if is_html(path) {
            collected.files.push(path.clone());
        } else {
            collected.skipped.push(path.clone());
        }
    }

    collected
}

/// Read an HTML file, mapping I/O failures onto typed errors.
///
/// Invalid UTF-8 is replaced rather than rejected; saved pages are
/// occasionally mis-encoded and the bits we need are ASCII.
pub async fn read_html(path: &Path) -> Result<String, Vtt2PdfError> {
    if !is_html(path) {
        return Err(Vtt2PdfError::NotHtml {
            path: path.to_path_buf(),
        });
    }
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Vtt2PdfError::InputNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Vtt2PdfError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(e) => Err(Vtt2PdfError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Read a page and extract its title and video token.
pub async fn load_source(path: &Path, host: &str) -> Result<HtmlSource, Vtt2PdfError> {
    let content = read_html(path).await?;
    let title = html::extract_title(&content);
    let video_token = html::extract_video_token(&content, host);
    debug!(
        "Loaded {}: title={:?} token={:?}",
        path.display(),
        title,
        video_token
    );
    Ok(HtmlSource {
        path: path.to_path_buf(),
        title,
        video_token,
    })
}

/// Delete one original HTML file.
pub fn delete_original(path: &Path) -> Result<(), Vtt2PdfError> {
    std::fs::remove_file(path).map_err(|e| Vtt2PdfError::DeleteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
