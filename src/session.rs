//! Interactive session: pick files, pick a folder, convert, repeat.
//!
//! The session talks to the user only through the [`Interaction`] handle it
//! is given, so the same loop drives the terminal prompts of the CLI and the
//! scripted interaction used in tests.
//!
//! ```text
//!  ┌─▶ select files ──(none)──▶ end
//!  │        │
//!  │   select folder ─(none)──▶ end
//!  │        │
//!  │   convert each (errors shown as they happen)
//!  │        │
//!  │   "PDFs Saved"
//!  │        │
//!  └─(yes)─ generate another?
//!           │ no
//!      delete originals? ──(yes)──▶ delete
//!           │
//!        closing message
//! ```

use crate::config::ConversionConfig;
use crate::convert::{convert_one, resolve_fetcher};
use crate::output::{BatchSummary, SessionSummary};
use crate::pipeline::input;
use std::path::PathBuf;
use tracing::{info, warn};

pub const MSG_SELECT_FILES: &str = "Please select one or more HTML files to upload.";
pub const MSG_SELECT_FOLDER: &str = "Please select the folder where to save the PDF files.";
pub const MSG_CLOSING: &str = "VTT-to-PDF program is closing.";

/// The user-facing side of a session.
///
/// Every method blocks until the user has answered.
pub trait Interaction {
    /// Show a short instruction before a selection prompt.
    fn instruct(&mut self, message: &str);

    /// Ask for the HTML files to convert. Empty means the user cancelled.
    fn select_inputs(&mut self) -> Vec<PathBuf>;

    /// Ask for the folder to save PDFs in. `None` means the user cancelled.
    fn select_output_dir(&mut self) -> Option<PathBuf>;

    fn show_error(&mut self, title: &str, message: &str);

    fn show_info(&mut self, title: &str, message: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, title: &str, question: &str) -> bool;
}

/// Run batches until the user declines to continue or cancels a prompt.
///
/// Originals are only offered for deletion once, at the end, and only the
/// inputs that were actually converted during the session are removed.
pub async fn run_session(ui: &mut dyn Interaction, config: &ConversionConfig) -> SessionSummary {
    let mut summary = SessionSummary::default();

    let fetcher = match resolve_fetcher(config) {
        Ok(f) => f,
        Err(e) => {
            ui.show_error(e.kind().title(), &e.to_string());
            return summary;
        }
    };

    let mut converted: Vec<PathBuf> = Vec::new();

    loop {
        ui.instruct(MSG_SELECT_FILES);
        let inputs = ui.select_inputs();
        if inputs.is_empty() {
            info!("No files selected, ending session");
            summary.cancelled = true;
            return summary;
        }

        ui.instruct(MSG_SELECT_FOLDER);
        let Some(output_dir) = ui.select_output_dir() else {
            info!("No folder selected, ending session");
            summary.cancelled = true;
            return summary;
        };

        summary.batches += 1;
        let total = inputs.len();
        let mut batch = BatchSummary::default();
        for (i, path) in inputs.iter().enumerate() {
            let result =
                convert_one(fetcher.as_ref(), i + 1, total, path, &output_dir, config).await;
            if let (Some(message), Some(kind)) = (&result.error, result.error_kind) {
                ui.show_error(kind.title(), message);
            }
            batch.push(result);
        }

        summary.converted += batch.converted;
        summary.failed += batch.failed;
        converted.extend(batch.converted_inputs().cloned());

        ui.show_info(
            "PDFs Saved",
            &format!("All formatted PDFs saved in: {}", output_dir.display()),
        );

        if !ui.confirm("Continue", "Do you want to generate another PDF?") {
            break;
        }
    }

    if ui.confirm("Delete Files", "Do you want to delete the original HTML files?") {
        for path in &converted {
            match input::delete_original(path) {
                Ok(()) => {
                    info!("Deleted {}", path.display());
                    summary.deleted += 1;
                }
                Err(e) => {
                    warn!("{}", e);
                    ui.show_error(e.kind().title(), &e.to_string());
                }
            }
        }
    }

    ui.show_info("Closing", MSG_CLOSING);
    summary
}
