//! Paragraph segmentation: group sentences into readable paragraphs.
//!
//! Caption text carries no paragraph structure, only sentences. We split on
//! Unicode sentence boundaries (UAX #29) and then fill paragraphs greedily:
//! a sentence joins the current paragraph unless that would push it past
//! `max_len` characters, in which case the paragraph is closed and the
//! sentence opens the next one. Sentences are never split, so one sentence
//! longer than `max_len` ends up alone in its own paragraph.

use unicode_segmentation::UnicodeSegmentation;

/// Lazily yield the trimmed, non-empty sentences of `text`.
pub fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Group the sentences of `text` into paragraphs of at most `max_len` characters.
///
/// Lengths are counted in `char`s, and the single space joining two
/// sentences counts towards the paragraph. Empty input yields no paragraphs.
pub fn segment(text: &str, max_len: usize) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in sentences(text) {
        let sentence_len = sentence.chars().count();

        if current_len > 0 && current_len + 1 + sentence_len > max_len {
            paragraphs.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(sentence);
        current_len += sentence_len;
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}
