//! Caption normalisation: reduce a raw WebVTT track to plain running text.
//!
//! A caption track is a header, then blocks of `start --> end` timing lines
//! followed by one or two lines of cue text. For reading we only want the
//! words, in order, as one stream of text. The rules below are cheap,
//! deterministic regex/string passes; each is independently testable.
//!
//! ## Rule Order
//!
//! Timing lines go before markup so a cue setting such as `align:start` is
//! never mistaken for text, and character references are decoded only after
//! tags are gone so an escaped `&lt;i&gt;` survives as literal text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Literal marker opening every WebVTT file.
pub const VTT_HEADER: &str = "WEBVTT";

/// Apply all normalisation rules to a raw caption track.
///
/// Rules (applied in order):
/// 1. Remove the `WEBVTT` header marker
/// 2. Remove timestamp ranges together with any trailing cue settings
/// 3. Remove inline cue markup (`<v Name>`, `<c.yellow>`, `<i>`, `<00:01.000>`)
/// 4. Decode the basic character references
/// 5. Strip invisible Unicode (BOM, zero-width spaces, soft hyphens)
/// 6. Collapse every whitespace run to a single space and trim
pub fn normalize(raw: &str) -> String {
    let s = strip_header(raw);
    let s = strip_timestamps(&s);
    let s = strip_cue_markup(&s);
    let s = decode_entities(&s);
    let s = remove_invisible_chars(&s);
    collapse_whitespace(&s)
}

// ── Rule 1: Header marker ────────────────────────────────────────────────────

fn strip_header(input: &str) -> String {
    input.replace(VTT_HEADER, "")
}

// ── Rule 2: Timestamp ranges ─────────────────────────────────────────────────
//
// WebVTT allows the hour field to be omitted (`01:02.500`). Cue settings are
// `key:value` tokens after the end timestamp on the same line.

static RE_TIMESTAMP_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\d{2,}:)?\d{2}:\d{2}\.\d{3}[ \t]+-->[ \t]+(?:\d{2,}:)?\d{2}:\d{2}\.\d{3}(?:[ \t]+[A-Za-z][\w-]*:\S+)*",
    )
    .unwrap()
});

fn strip_timestamps(input: &str) -> String {
    RE_TIMESTAMP_RANGE.replace_all(input, "").to_string()
}

// ── Rule 3: Inline cue markup ────────────────────────────────────────────────

static RE_CUE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?(?:[cvbiu]|ruby|rt|lang)(?:[.\s][^>]*)?>|<(?:\d{2,}:)?\d{2}:\d{2}\.\d{3}>")
        .unwrap()
});

fn strip_cue_markup(input: &str) -> String {
    RE_CUE_TAG.replace_all(input, "").to_string()
}

// ── Rule 4: Character references ─────────────────────────────────────────────

fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    // `&amp;` last so `&amp;lt;` decodes to the text `&lt;`
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lrm;", "")
        .replace("&rlm;", "")
        .replace("&amp;", "&")
}

// ── Rule 5: Invisible Unicode ────────────────────────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 6: Whitespace ───────────────────────────────────────────────────────

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_track() {
        let raw = "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nHello there.";
        assert_eq!(normalize(raw), "Hello there.");
    }

    #[test]
    fn test_multiple_cues_keep_word_order() {
        let raw = "WEBVTT\n\n\
                   00:00:00.000 --> 00:00:02.000\nWelcome back to\n\n\
                   00:00:02.000 --> 00:00:04.500\nthe second module.\n\n\
                   00:00:04.500 --> 00:00:07.000\nLet's begin.\n";
        assert_eq!(
            normalize(raw),
            "Welcome back to the second module. Let's begin."
        );
    }

    #[test]
    fn test_no_header_no_timestamps_only_collapses() {
        assert_eq!(normalize("  plain\n\ttext   here \r\n"), "plain text here");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("WEBVTT\n\n"), "");
    }

    #[test]
    fn test_hourless_timestamps_and_settings() {
        let raw = "WEBVTT\n\n01:02.000 --> 01:04.250 align:start position:10%\nShort form.";
        assert_eq!(normalize(raw), "Short form.");
    }

    #[test]
    fn test_long_hours() {
        let raw = "100:00:00.000 --> 100:00:01.000\nMarathon.";
        assert_eq!(normalize(raw), "Marathon.");
    }

    #[test]
    fn test_cue_markup_removed() {
        let raw = "00:00:00.000 --> 00:00:02.000\n<v Dr. Lee>So <i>this</i> is <c.yellow>key</c>.</v>\n\
                   <00:00:01.000>Really.";
        assert_eq!(normalize(raw), "So this is key. Really.");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(
            normalize("Tom &amp; Jerry &lt;3 &quot;cheese&quot;"),
            "Tom & Jerry <3 \"cheese\""
        );
        assert_eq!(normalize("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_escaped_tag_survives_as_text() {
        assert_eq!(normalize("type &lt;i&gt; here"), "type <i> here");
    }

    #[test]
    fn test_invisible_chars_removed() {
        assert_eq!(normalize("\u{FEFF}WEBVTT\n\nzero\u{200B}width"), "zerowidth");
    }

    #[test]
    fn test_numbers_in_text_are_kept() {
        let raw = "00:00:00.000 --> 00:00:02.000\nWe sold 12:30 tickets at 10.500 each.";
        assert_eq!(normalize(raw), "We sold 12:30 tickets at 10.500 each.");
    }
}
