// src/utils/html.rs

use std::collections::HashSet;

use ammonia::Builder;

/// Strips every tag using the ammonia library, keeping only the text.
///
/// `<script>` and `<style>` lose their content as well. Exam names, question
/// texts and option texts authored by admins pass through here before they are
/// stored. The client renders them as text, so the result is plain text again:
/// the entities ammonia writes for `<`, `>` and `&` are decoded.
pub fn clean_html(input: &str) -> String {
    let cleaned = Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(input)
        .to_string();
    decode_text_entities(&cleaned)
}

/// Sanitizes and trims a single-line text field.
/// An input that is only markup or whitespace comes back empty.
pub fn clean_field(input: &str) -> String {
    clean_html(input.trim()).trim().to_string()
}

/// Reverses the escaping applied to serialized text nodes.
/// `&amp;` goes last so an escaped literal like `&amp;lt;` stays `&lt;`.
fn decode_text_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
