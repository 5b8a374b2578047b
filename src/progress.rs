//! Progress-callback trait for per-file conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as [`crate::convert::convert_batch`] works through its inputs.
//! The library never prints; the CLI turns these events into a progress bar.
//!
//! # Example
//!
//! ```rust
//! use vtt2pdf::{ConversionConfig, ConversionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct FailureCounter {
//!     failed: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for FailureCounter {
//!     fn on_file_error(&self, index: usize, total: usize, input: &str, error: &str) {
//!         self.failed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("[{index}/{total}] {input}: {error}");
//!     }
//! }
//!
//! let counter = Arc::new(FailureCounter { failed: AtomicUsize::new(0) });
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch converter as it processes each input file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Indices are 1-based.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first file.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before a file is read.
    fn on_file_start(&self, index: usize, total: usize, input: &str) {
        let _ = (index, total, input);
    }

    /// Called after a PDF has been written.
    ///
    /// # Arguments
    /// * `output`: path of the written PDF
    /// * `pages`: number of pages in it
    fn on_file_complete(&self, index: usize, total: usize, output: &str, pages: usize) {
        let _ = (index, total, output, pages);
    }

    /// Called when a file is skipped because of an error.
    fn on_file_error(&self, index: usize, total: usize, input: &str, error: &str) {
        let _ = (index, total, input, error);
    }

    /// Called once after all files have been attempted.
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        completed: AtomicUsize,
        errors: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_file_complete(&self, _index: usize, _total: usize, _output: &str, _pages: usize) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_error(&self, _index: usize, _total: usize, _input: &str, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_accepts_all_events() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_file_start(1, 2, "a.html");
        cb.on_file_complete(1, 2, "a.pdf", 3);
        cb.on_file_error(2, 2, "b.html", "boom");
        cb.on_batch_complete(2, 1);
    }

    #[test]
    fn overridden_methods_are_dispatched_through_arc() {
        let tracker = Arc::new(TrackingCallback {
            completed: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
        });
        let cb: ProgressCallback = tracker.clone();
        cb.on_file_complete(1, 3, "a.pdf", 1);
        cb.on_file_complete(2, 3, "b.pdf", 2);
        cb.on_file_error(3, 3, "c.html", "HTTP 404");
        assert_eq!(tracker.completed.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }
}
