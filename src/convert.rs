//! Conversion entry points: one caption track, one file, or a batch.
//!
//! [`render_captions`] is the pure core (no I/O). [`convert_file`] wraps it
//! with the page read, the caption download and the PDF write.
//! [`convert_batch`] runs files one after another and never stops early: a
//! file that fails is logged, reported through the progress callback and
//! recorded in the [`BatchSummary`], and the next file is attempted.

use crate::config::ConversionConfig;
use crate::error::Vtt2PdfError;
use crate::output::{BatchSummary, ConversionOutput, FileResult, RenderedDocument};
use crate::pipeline::fetch::{CaptionFetcher, HttpCaptionFetcher};
use crate::pipeline::input::{self, HtmlSource};
use crate::pipeline::{html, layout, normalize, render, segment};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Turn a raw caption track into a finished PDF in memory.
///
/// normalize → segment → layout → render. Deterministic for a given input
/// and configuration.
pub fn render_captions(title: &str, raw_vtt: &str, config: &ConversionConfig) -> RenderedDocument {
    let text = normalize::normalize(raw_vtt);
    let paragraphs = segment::segment(&text, config.max_paragraph_len);
    debug!(
        "{} chars of caption text in {} paragraphs",
        text.chars().count(),
        paragraphs.len()
    );
    let instructions = layout::layout(title, &paragraphs, &config.layout);
    let pdf = render::render_pdf(title, &instructions, &config.layout);
    RenderedDocument {
        pdf: pdf.bytes,
        paragraphs,
        pages: pdf.pages,
    }
}

/// Where the PDF for `title` goes inside `output_dir`.
///
/// The stem is the sanitized title; a title with nothing usable in it
/// falls back to the video token so the file is never called `.pdf`.
pub fn output_path_for(
    title: &str,
    video_token: &str,
    output_dir: &Path,
    config: &ConversionConfig,
) -> PathBuf {
    let mut stem = html::sanitize_filename(title, config.max_filename_len);
    if stem.is_empty() {
        stem = html::sanitize_filename(video_token, config.max_filename_len);
    }
    if stem.is_empty() {
        stem = "captions".to_string();
    }
    output_dir.join(format!("{stem}.pdf"))
}

/// Convert one saved HTML page into a PDF inside `output_dir`.
///
/// # Errors
/// Any [`Vtt2PdfError`] from reading the page, finding its token,
/// downloading captions or writing the PDF.
pub async fn convert_file(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Vtt2PdfError> {
    let fetcher = resolve_fetcher(config)?;
    convert_with(fetcher.as_ref(), input.as_ref(), output_dir.as_ref(), config).await
}

/// Convert every input in order, continuing past failures.
///
/// # Errors
/// Only when no caption fetcher can be constructed; per-file failures are
/// reported in the returned summary.
pub async fn convert_batch(
    inputs: &[PathBuf],
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<BatchSummary, Vtt2PdfError> {
    let start = Instant::now();
    let output_dir = output_dir.as_ref();
    let fetcher = resolve_fetcher(config)?;
    let total = inputs.len();
    info!(
        "Converting {} file(s) into {}",
        total,
        output_dir.display()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut summary = BatchSummary::default();
    for (i, path) in inputs.iter().enumerate() {
        let result = convert_one(fetcher.as_ref(), i + 1, total, path, output_dir, config).await;
        summary.push(result);
    }
    summary.total_duration_ms = start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, summary.converted);
    }
    info!(
        "Batch complete: {}/{} converted in {}ms",
        summary.converted, total, summary.total_duration_ms
    );
    Ok(summary)
}

/// Read a page and report its title and token without downloading anything.
pub async fn inspect(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<HtmlSource, Vtt2PdfError> {
    input::load_source(path.as_ref(), &config.caption_host).await
}

/// Synchronous wrapper around [`convert_batch`].
///
/// Creates a single-threaded tokio runtime internally.
pub fn convert_sync(
    inputs: &[PathBuf],
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<BatchSummary, Vtt2PdfError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Vtt2PdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_batch(inputs, output_dir, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

impl BatchSummary {
    pub(crate) fn push(&mut self, result: FileResult) {
        if result.is_success() {
            self.converted += 1;
        } else {
            self.failed += 1;
        }
        self.files.push(result);
    }
}

/// The injected fetcher if there is one, otherwise HTTP against `caption_host`.
pub(crate) fn resolve_fetcher(
    config: &ConversionConfig,
) -> Result<Arc<dyn CaptionFetcher>, Vtt2PdfError> {
    if let Some(ref fetcher) = config.fetcher {
        return Ok(Arc::clone(fetcher));
    }
    Ok(Arc::new(HttpCaptionFetcher::from_config(config)?))
}

/// Convert one file of a batch, firing progress events and timing it.
pub(crate) async fn convert_one(
    fetcher: &dyn CaptionFetcher,
    index: usize,
    total: usize,
    path: &Path,
    output_dir: &Path,
    config: &ConversionConfig,
) -> FileResult {
    let start = Instant::now();
    let shown = path.display().to_string();
    if let Some(ref cb) = config.progress_callback {
        cb.on_file_start(index, total, &shown);
    }

    let result = convert_with(fetcher, path, output_dir, config).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(output) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_complete(
                    index,
                    total,
                    &output.output_path.display().to_string(),
                    output.pages,
                );
            }
            FileResult {
                input: path.to_path_buf(),
                output: Some(output),
                error: None,
                error_kind: None,
                duration_ms,
            }
        }
        Err(e) => {
            warn!("Skipping {}: {}", shown, e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_error(index, total, &shown, &e.to_string());
            }
            FileResult {
                input: path.to_path_buf(),
                output: None,
                error: Some(e.to_string()),
                error_kind: Some(e.kind()),
                duration_ms,
            }
        }
    }
}

async fn convert_with(
    fetcher: &dyn CaptionFetcher,
    path: &Path,
    output_dir: &Path,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Vtt2PdfError> {
    info!("Processing file: {}", path.display());

    // ── Step 1: Title and token from the saved page ──────────────────────
    let source = input::load_source(path, &config.caption_host).await?;
    let token = source
        .video_token
        .clone()
        .ok_or_else(|| Vtt2PdfError::TokenNotFound {
            path: path.to_path_buf(),
        })?;

    // ── Step 2: Download captions ────────────────────────────────────────
    let raw_vtt = fetcher.fetch(&token).await?;

    // ── Step 3: Normalize, segment, lay out, render ──────────────────────
    let doc = render_captions(&source.title, &raw_vtt, config);

    // ── Step 4: Write ────────────────────────────────────────────────────
    let output_path = output_path_for(&source.title, &token, output_dir, config);
    if output_path.exists() {
        warn!("Overwriting existing file: {}", output_path.display());
    }
    let bytes = doc.pdf.len();
    let pdf = doc.pdf;
    let target = output_path.clone();
    tokio::task::spawn_blocking(move || render::write_pdf(&pdf, &target))
        .await
        .map_err(|e| Vtt2PdfError::Internal(format!("PDF write task panicked: {e}")))??;

    info!(
        "Saved {} ({} pages, {} bytes)",
        output_path.display(),
        doc.pages,
        bytes
    );

    Ok(ConversionOutput {
        input: path.to_path_buf(),
        title: source.title,
        output_path,
        video_token: token,
        paragraphs: doc.paragraphs.len(),
        pages: doc.pages,
        bytes,
    })
}
