//! Pipeline stages for caption-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable; only
//! [`fetch`] touches the network and only [`render`] produces PDF bytes.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ html ──▶ fetch ──▶ normalize ──▶ segment ──▶ layout ──▶ render
//! (.html)  (title,   (WebVTT)   (plain text)  (paragraphs) (draw ops)  (PDF)
//!           token)
//! ```
//!
//! 1. [`input`]     : expand user paths, read pages, delete originals
//! 2. [`html`]      : page title, player token, output file stem
//! 3. [`fetch`]     : download the caption track for a token
//! 4. [`normalize`] : strip WebVTT framing down to one line of prose
//! 5. [`segment`]   : group sentences into length-bounded paragraphs
//! 6. [`layout`]    : wrap and paginate into [`layout::DrawInstruction`]s
//! 7. [`render`]    : replay instructions into a PDF and write it atomically

pub mod fetch;
pub mod html;
pub mod input;
pub mod layout;
pub mod normalize;
pub mod render;
pub mod segment;
