//! Text normalisation shared by the keyword scorer and log output.

/// Lowercase, collapse whitespace runs to a single space, and trim.
///
/// "  Deep   Learning\tfor\nCV " → "deep learning for cv"
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        for c in word.chars() {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// True when the text is empty or only whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Prefix of at most `max_chars` characters, with "..." appended when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_collapses() {
        assert_eq!(
            normalize("  Deep   Learning\tfor\nCV "),
            "deep learning for cv"
        );
    }

    #[test]
    fn normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n "), "");
    }

    #[test]
    fn normalize_unicode() {
        assert_eq!(normalize("ÈCCO Città"), "ècco città");
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n\u{2003}"));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn preview_short_text_unchanged() {
        assert_eq!(preview("GPT-4", 30), "GPT-4");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("àèìòù and more", 5), "àèìòù...");
        assert_eq!(preview("abcdef", 6), "abcdef");
        assert_eq!(preview("abcdefg", 6), "abcdef...");
    }
}
