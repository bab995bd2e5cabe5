//! Text shaping shared by the result rows and the note editor.

pub const ELLIPSIS: char = '…';

/// Longest suffix still treated as a file extension
const MAX_EXTENSION_LEN: usize = 8;

/// Shorten a file name to at most `max_len` characters, keeping its head,
/// tail and extension and eliding the middle.
///
/// Names that already fit are returned unchanged, which makes the function
/// idempotent. When the extension alone leaves no room for a head and a
/// tail, the name keeps its last `max_len - 1` characters behind the
/// ellipsis.
pub fn truncate_middle(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        return name.to_string();
    }
    if max_len == 0 {
        return String::new();
    }

    let (base, ext) = chars.split_at(extension_start(&chars));
    match max_len.checked_sub(ext.len() + 1) {
        Some(budget) if budget >= 2 => {
            let head = budget.div_ceil(2);
            let tail = budget / 2;
            let mut out: String = base[..head].iter().collect();
            out.push(ELLIPSIS);
            out.extend(&base[base.len() - tail..]);
            out.extend(ext);
            out
        }
        _ => {
            let keep = max_len - 1;
            let mut out = String::with_capacity(max_len * 4);
            out.push(ELLIPSIS);
            out.extend(&chars[chars.len() - keep..]);
            out
        }
    }
}

/// Index of the dot starting the extension, or `chars.len()` when there is
/// no plausible extension.
fn extension_start(chars: &[char]) -> usize {
    let Some(dot) = chars.iter().rposition(|c| *c == '.') else {
        return chars.len();
    };
    let ext = &chars[dot + 1..];
    let plausible = dot > 0
        && !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.iter().all(|c| c.is_alphanumeric());
    if plausible { dot } else { chars.len() }
}

/// Collapse runs of whitespace to single spaces and trim
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-collapsed excerpt of at most `limit` characters
pub fn short_excerpt(text: &str, limit: usize) -> String {
    let compact = normalize_ws(text);
    if compact.chars().count() <= limit {
        return compact;
    }
    let head: String = compact.chars().take(limit.saturating_sub(1)).collect();
    let mut out = head.trim_end().to_string();
    out.push(ELLIPSIS);
    out
}

/// Keys tried, in order, when summarising a JSON note
const SUMMARY_KEYS: [&str; 6] = [
    "Note",
    "note",
    "Summary",
    "summary",
    "Additional Notes",
    "additional_notes",
];

/// One-line summary of a note: the first non-blank summary-like string
/// field of a JSON object, or the whole text.
pub fn note_summary(content: &str) -> String {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_str(content) {
        let found = SUMMARY_KEYS
            .iter()
            .filter_map(|key| fields.get(*key).and_then(|v| v.as_str()))
            .find(|value| !value.trim().is_empty());
        if let Some(value) = found {
            return normalize_ws(value);
        }
    }
    normalize_ws(content)
}

/// Turn literal `\n`, `\r\n` and `\r` escape sequences into line breaks for
/// read-only display. Other backslashes are kept as written.
pub fn decode_line_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find('\\') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        if let Some(after) = tail.strip_prefix("\\r\\n") {
            out.push('\n');
            rest = after;
        } else if let Some(after) = tail
            .strip_prefix("\\n")
            .or_else(|| tail.strip_prefix("\\r"))
        {
            out.push('\n');
            rest = after;
        } else {
            out.push('\\');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_name_unchanged() {
        assert_eq!(truncate_middle("order.pdf", 20), "order.pdf");
    }

    #[test]
    fn test_keeps_head_tail_and_extension() {
        let name = "2024-03-11 Transfer Petition Doe v Roe annexures.pdf";
        let out = truncate_middle(name, 24);
        assert_eq!(out.chars().count(), 24);
        assert_eq!(out, "2024-03-11…annexures.pdf");
    }

    #[test]
    fn test_odd_budget_favours_head() {
        // budget = 11 - 4 - 1 = 6 → head 3, tail 3
        assert_eq!(truncate_middle("abcdefghijklmnop.txt", 11), "abc…nop.txt");
        // budget = 12 - 4 - 1 = 7 → head 4, tail 3
        assert_eq!(truncate_middle("abcdefghijklmnop.txt", 12), "abcd…nop.txt");
    }

    #[test]
    fn test_without_extension() {
        assert_eq!(truncate_middle("Doe v. Roe final draft", 9), "Doe …raft");
    }

    #[test]
    fn test_extension_too_long_for_budget() {
        assert_eq!(truncate_middle("abcdefgh.docx", 6), "….docx");
        assert_eq!(truncate_middle("abcdefgh.docx", 6).chars().count(), 6);
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(short_excerpt("  a\n\n b  ", 10), "a b");
        assert_eq!(short_excerpt("alpha beta gamma", 8), "alpha b…");
        assert_eq!(short_excerpt("alpha beta gamma", 7), "alpha…");
    }

    #[test]
    fn test_note_summary() {
        assert_eq!(
            note_summary(r#"{"Client": "Doe", "Summary": "  bail   granted "}"#),
            "bail granted"
        );
        assert_eq!(note_summary(r#"{"note": " ", "summary": "x"}"#), "x");
        assert_eq!(note_summary("plain\n  text"), "plain text");
        assert_eq!(note_summary("[1, 2]"), "[1, 2]");
    }

    #[test]
    fn test_decode_line_escapes() {
        assert_eq!(decode_line_escapes("a\\nb\\r\\nc\\rd"), "a\nb\nc\nd");
        assert_eq!(decode_line_escapes("C:\\path\\x"), "C:\\path\\x");
        assert_eq!(decode_line_escapes("trailing\\"), "trailing\\");
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_max(name in "[a-zA-Z0-9 ._-]{0,80}", max in 1usize..60) {
            let out = truncate_middle(&name, max);
            prop_assert!(out.chars().count() <= max);
        }

        #[test]
        fn prop_idempotent(name in "[a-zA-Z0-9 ._-]{0,80}", max in 1usize..60) {
            let once = truncate_middle(&name, max);
            prop_assert_eq!(truncate_middle(&once, max), once);
        }

        #[test]
        fn prop_extension_preserved(base in "[a-zA-Z0-9 _-]{1,60}", ext in "[a-z]{1,4}", max in 12usize..40) {
            let name = format!("{}.{}", base, ext);
            let out = truncate_middle(&name, max);
            let suffix = format!(".{}", ext);
            prop_assert!(out.ends_with(&suffix));
        }
    }
}
