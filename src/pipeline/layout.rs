//! Page layout: wrap paragraphs into lines and paginate them.
//!
//! The engine is a cursor walking down the page. It emits a flat list of
//! [`DrawInstruction`]s which the PDF writer replays in order, so the layout
//! decisions are testable without producing a single PDF byte.
//!
//! ```text
//!   title_top ──  Title line 1            (Title style)
//!                 Title line 2
//!                 <blank>
//!                 Body line 1             (Body style)
//!                 Body line 2
//!                 <blank>                  paragraph spacing
//!                 Body line 1
//!   margin    ──  ··· below here: PageBreak, cursor → page_top
//! ```
//!
//! Wrapping is column based, not glyph-metric based: body text wraps at 80
//! columns and the title at 55, which sits comfortably inside a Letter page
//! at 12 pt / 16 pt Helvetica.

use crate::config::LayoutGeometry;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::debug;

/// Which of the two faces a line is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextStyle {
    /// Helvetica-Bold, title size.
    Title,
    /// Helvetica, body size.
    Body,
}

/// One step of the rendered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawInstruction {
    /// Draw `text` with its baseline starting at `(x, y)`.
    DrawLine {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
    /// Finalise the current page and start a new one.
    PageBreak,
}

/// Number of pages described by an instruction sequence.
pub fn page_count(instructions: &[DrawInstruction]) -> usize {
    1 + instructions
        .iter()
        .filter(|i| matches!(i, DrawInstruction::PageBreak))
        .count()
}

/// Word-wrap `text` to `width` columns.
///
/// Greedy first-fit: each line takes as many words as fit before moving on.
/// Over-long words are broken and lines never start with whitespace.
/// Blank input yields no lines.
pub fn wrap_columns(text: &str, width: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let options = textwrap::Options::new(width.max(1))
        .break_words(true)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);
    textwrap::wrap(text, options)
        .into_iter()
        .map(Cow::into_owned)
        .collect()
}

/// Lay out a title and its paragraphs onto pages.
pub fn layout(title: &str, paragraphs: &[String], geometry: &LayoutGeometry) -> Vec<DrawInstruction> {
    let mut engine = LayoutEngine::new(geometry);
    engine.title(title);
    for paragraph in paragraphs {
        engine.paragraph(paragraph);
    }
    engine.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutState {
    FirstPage,
    OnPage,
}

struct LayoutEngine<'g> {
    geometry: &'g LayoutGeometry,
    y: f32,
    state: LayoutState,
    pages: usize,
    out: Vec<DrawInstruction>,
}

impl<'g> LayoutEngine<'g> {
    fn new(geometry: &'g LayoutGeometry) -> Self {
        Self {
            geometry,
            y: geometry.title_top(),
            state: LayoutState::FirstPage,
            pages: 1,
            out: Vec::new(),
        }
    }

    /// Title lines are drawn at the cursor, then the cursor drops; one blank
    /// line follows the block.
    fn title(&mut self, title: &str) {
        for line in wrap_columns(title, self.geometry.title_wrap_width) {
            self.break_if_exhausted();
            self.draw(line, TextStyle::Title);
            self.y -= self.geometry.line_height;
        }
        self.y -= self.geometry.line_height;
    }

    /// Body lines drop the cursor first, then draw.
    fn paragraph(&mut self, text: &str) {
        for line in wrap_columns(text, self.geometry.body_wrap_width) {
            self.y -= self.geometry.line_height;
            self.break_if_exhausted();
            self.draw(line, TextStyle::Body);
        }
        self.y -= self.geometry.line_height;
    }

    fn break_if_exhausted(&mut self) {
        if self.y < self.geometry.margin {
            self.out.push(DrawInstruction::PageBreak);
            self.y = self.geometry.page_top();
            self.state = LayoutState::OnPage;
            self.pages += 1;
        }
    }

    fn draw(&mut self, text: String, style: TextStyle) {
        self.out.push(DrawInstruction::DrawLine {
            text,
            x: self.geometry.margin,
            y: self.y,
            style,
        });
    }

    fn finish(self) -> Vec<DrawInstruction> {
        debug!(
            pages = self.pages,
            state = ?self.state,
            instructions = self.out.len(),
            "layout complete"
        );
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(instructions: &[DrawInstruction], style: TextStyle) -> Vec<(&str, f32)> {
        instructions
            .iter()
            .filter_map(|i| match i {
                DrawInstruction::DrawLine { text, y, style: s, .. } if *s == style => {
                    Some((text.as_str(), *y))
                }
                _ => None,
            })
            .collect()
    }

    fn breaks(instructions: &[DrawInstruction]) -> usize {
        page_count(instructions) - 1
    }

    /// A paragraph that wraps to exactly `n` lines at 80 columns:
    /// eight 9-letter words make a 79-column line.
    fn paragraph_of_lines(n: usize) -> String {
        vec!["abcdefghi"; n * 8].join(" ")
    }

    #[test]
    fn test_wrap_columns() {
        assert_eq!(
            wrap_columns("the quick brown fox jumps over", 10),
            vec!["the quick", "brown fox", "jumps over"]
        );
        assert!(wrap_columns("", 80).is_empty());
        assert!(wrap_columns("   ", 80).is_empty());
    }

    #[test]
    fn test_wrap_is_first_fit() {
        // a balancing wrapper would give "To be," / "or not to" / ...
        assert_eq!(
            wrap_columns("To be, or not to be: that is the question", 10),
            vec!["To be, or", "not to be:", "that is", "the", "question"]
        );
        // a line may fill the width exactly
        let text = format!("{} so exercises it and more", "x".repeat(64));
        assert_eq!(
            wrap_columns(&text, 80),
            vec![format!("{} so exercises it", "x".repeat(64)), "and more".to_string()]
        );
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let w = wrap_columns("abcdefghijkl", 5);
        assert_eq!(w, vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn test_paragraph_helper_wraps_as_expected() {
        assert_eq!(wrap_columns(&paragraph_of_lines(7), 80).len(), 7);
    }

    #[test]
    fn test_title_and_first_line_positions() {
        let g = LayoutGeometry::default();
        let out = layout("My Video", &["Hello there.".to_string()], &g);

        assert_eq!(
            out[0],
            DrawInstruction::DrawLine {
                text: "My Video".into(),
                x: 72.0,
                y: 680.0,
                style: TextStyle::Title,
            }
        );
        // 680 - 14 (title line) - 14 (spacing) - 14 (line advance)
        assert_eq!(lines(&out, TextStyle::Body), vec![("Hello there.", 638.0)]);
        assert_eq!(page_count(&out), 1);
    }

    #[test]
    fn test_long_title_wraps_at_55() {
        let g = LayoutGeometry::default();
        let title = "An unusually long lecture title that certainly does not fit on one line";
        let out = layout(title, &[], &g);
        let t = lines(&out, TextStyle::Title);
        assert_eq!(t.len(), 2);
        assert!(t.iter().all(|(s, _)| s.chars().count() <= 55));
        assert_eq!(t[1].1, 666.0);
    }

    #[test]
    fn test_empty_title_draws_nothing() {
        let g = LayoutGeometry::default();
        let out = layout("", &["Body.".to_string()], &g);
        assert!(lines(&out, TextStyle::Title).is_empty());
        // 680 - 14 (spacing) - 14 (line advance)
        assert_eq!(lines(&out, TextStyle::Body)[0].1, 652.0);
    }

    #[test]
    fn test_paragraph_spacing() {
        let g = LayoutGeometry::default();
        let out = layout("T", &["One.".to_string(), "Two.".to_string()], &g);
        let body = lines(&out, TextStyle::Body);
        assert_eq!(body, vec![("One.", 638.0), ("Two.", 610.0)]);
    }

    #[test]
    fn test_no_paragraphs_single_page() {
        let g = LayoutGeometry::default();
        let out = layout("Only a title", &[], &g);
        assert_eq!(out.len(), 1);
        assert_eq!(page_count(&out), 1);
    }

    #[test]
    fn test_page_break_resets_to_top_margin() {
        let g = LayoutGeometry::default();
        let first = g.first_page_capacity(1);
        let out = layout("T", &[paragraph_of_lines(first + 1)], &g);

        assert_eq!(breaks(&out), 1);
        let body = lines(&out, TextStyle::Body);
        assert_eq!(body.len(), first + 1);
        assert!(body[first - 1].1 >= g.margin);
        assert_eq!(body[first].1, 720.0);
        // the break sits right before the first line of page two
        let idx = out
            .iter()
            .position(|i| matches!(i, DrawInstruction::PageBreak))
            .unwrap();
        assert!(matches!(&out[idx + 1], DrawInstruction::DrawLine { y, .. } if *y == 720.0));
    }

    #[test]
    fn test_exact_first_page_fill_has_no_break() {
        let g = LayoutGeometry::default();
        let out = layout("T", &[paragraph_of_lines(g.first_page_capacity(1))], &g);
        assert_eq!(breaks(&out), 0);
    }

    #[test]
    fn test_break_count_matches_capacity() {
        let g = LayoutGeometry::default();
        let first = g.first_page_capacity(1);
        let per_page = g.page_capacity();

        for total in [1, first, first + 1, 100, 200, first + per_page, first + per_page + 1] {
            let out = layout("T", &[paragraph_of_lines(total)], &g);
            let expected = if total <= first {
                0
            } else {
                (total - first).div_ceil(per_page)
            };
            assert_eq!(breaks(&out), expected, "total lines {total}");
            assert_eq!(lines(&out, TextStyle::Body).len(), total);
        }
    }

    #[test]
    fn test_break_count_is_ceil_of_lines_per_page() {
        // The title block takes `title_slots` line slots of page one. Counting
        // those, every page holds `per_page` lines and the number of breaks is
        // ceil(lines / lines_per_page) - 1.
        let g = LayoutGeometry::default();
        let per_page = g.page_capacity();
        let title_slots = per_page - g.first_page_capacity(1);

        for total in [per_page, per_page + 1, 3 * per_page, 3 * per_page + 5] {
            let out = layout("T", &[paragraph_of_lines(total)], &g);
            assert_eq!(
                breaks(&out),
                (title_slots + total).div_ceil(per_page) - 1,
                "total lines {total}"
            );
        }
    }

    #[test]
    fn test_all_lines_stay_inside_margins() {
        let g = LayoutGeometry::default();
        let paragraphs: Vec<String> = (1..=30).map(paragraph_of_lines).collect();
        let out = layout("Margins", &paragraphs, &g);
        for i in &out {
            if let DrawInstruction::DrawLine { y, x, .. } = i {
                assert!(*y >= g.margin, "line below margin at {y}");
                assert!(*y <= g.page_top());
                assert_eq!(*x, g.margin);
            }
        }
    }
}
