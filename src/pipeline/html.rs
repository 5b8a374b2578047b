//! HTML scraping: page title, player token, output file name.
//!
//! A page saved from the video host embeds the player as an iframe whose URL
//! carries the video token:
//!
//! ```text
//! https://fast.wistia.net/embed/iframe/<TOKEN>?videoFoam=true
//! ```
//!
//! The title comes from the real DOM (html5ever) so entities and stray
//! markup inside `<title>` are handled; the token is a plain regex over the
//! raw source because the URL may live in an attribute, an inline script or
//! a JSON blob.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use once_cell::sync::Lazy;
use regex::Regex;

/// Text content of the first `<title>` element, whitespace-collapsed.
/// Empty when the page has no title.
pub fn extract_title(html: &str) -> String {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    match find_element(&dom.document, "title") {
        Some(title) => {
            let mut text = String::new();
            collect_text(&title, &mut text);
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        }
        None => String::new(),
    }
}

fn find_element(node: &Handle, name: &str) -> Option<Handle> {
    if let NodeData::Element { name: q, .. } = &node.data {
        if q.local.to_string().eq_ignore_ascii_case(name) {
            return Some(node.clone());
        }
    }
    for child in node.children.borrow().iter() {
        if let Some(found) = find_element(child, name) {
            return Some(found);
        }
    }
    None
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Video token from the first `<host>/embed/iframe/<TOKEN>?` URL in `html`.
pub fn extract_video_token(html: &str, host: &str) -> Option<String> {
    let pattern = format!(
        r"{}/embed/iframe/([^?\s/\x22'<>]+)\?",
        regex::escape(host)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(html).map(|caps| caps[1].to_string())
}

static RE_FILENAME_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());

/// Turn a page title into a file stem.
///
/// Keeps word characters, whitespace and hyphens, truncates to `max_len`
/// characters and trims the ends: `"My Video!! (2024)"` → `"My Video 2024"`.
pub fn sanitize_filename(title: &str, max_len: usize) -> String {
    let cleaned = RE_FILENAME_UNSAFE.replace_all(title, "");
    let truncated: String = cleaned.chars().take(max_len).collect();
    truncated.trim().to_string()
}
