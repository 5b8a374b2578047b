//! # vtt2pdf
//!
//! Turn saved video-lesson pages into readable PDF transcripts.
//!
//! ## Why this crate?
//!
//! A caption track is written for playback: short cue lines, timing ranges,
//! styling tags. Reading it as a transcript means stripping all of that and
//! putting the words back into paragraphs. This crate takes an HTML page that
//! embeds a hosted video player, downloads the player's caption track and
//! writes a clean, paginated PDF with the page title as its heading.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML page
//!  │
//!  ├─ 1. Input      read the page, pull <title> and the player token
//!  ├─ 2. Fetch      GET the WebVTT caption track for the token
//!  ├─ 3. Normalize  drop header, timings, cue markup → one line of prose
//!  ├─ 4. Segment    sentences → paragraphs of at most N characters
//!  ├─ 5. Layout     wrap at 80/55 columns, paginate with margins
//!  └─ 6. Render     Helvetica PDF, written atomically next to its siblings
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vtt2pdf::{convert_batch, ConversionConfig};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let inputs = vec![PathBuf::from("lesson-01.html"), PathBuf::from("lesson-02.html")];
//!     let summary = convert_batch(&inputs, "transcripts", &config).await?;
//!     eprintln!("{} converted, {} failed", summary.converted, summary.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `vtt2pdf` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! vtt2pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, LayoutGeometry, PageSize};
pub use convert::{convert_batch, convert_file, convert_sync, inspect, output_path_for, render_captions};
pub use error::{ErrorKind, Vtt2PdfError};
pub use output::{BatchSummary, ConversionOutput, FileResult, RenderedDocument, SessionSummary};
pub use pipeline::fetch::{CaptionFetcher, HttpCaptionFetcher};
pub use pipeline::input::{collect_inputs, CollectedInputs, HtmlSource};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use session::{run_session, Interaction};
