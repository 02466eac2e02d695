//! Small XML text helpers shared by the part writers and readers

/// True for characters XML 1.0 allows in a document
pub(crate) fn is_xml_char(c: char) -> bool {
    !matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

/// Escape text for an attribute value; characters XML cannot carry are dropped
pub(crate) fn escape_xml_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape text for element content; characters XML cannot carry are dropped
pub(crate) fn escape_xml_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().filter(|c| is_xml_char(*c)) {
        push_text_char(&mut out, c);
    }
    out
}

/// Escape cell text for `<v>` and `<t>` content.
///
/// Characters XML cannot carry are written as SpreadsheetML `_xHHHH_`
/// escapes, and an underscore that would otherwise read back as the start of
/// such an escape is itself written as `_x005F_`.
pub(crate) fn escape_cell_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        if !is_xml_char(c) || (c == '_' && starts_escape(&s[i..])) {
            out.push_str(&format!("_x{:04X}_", c as u32));
        } else {
            push_text_char(&mut out, c);
        }
    }
    out
}

/// Decode the `_xHHHH_` escapes of cell text read from a part
pub(crate) fn decode_cell_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = starts_escape(candidate)
            .then(|| u32::from_str_radix(&candidate[2..6], 16).ok())
            .flatten()
            .and_then(char::from_u32);
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &candidate[7..];
            }
            None => {
                out.push('_');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// `s` begins with `_x`, four hex digits and `_`
fn starts_escape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 7
        && b[0] == b'_'
        && b[1] == b'x'
        && b[2..6].iter().all(u8::is_ascii_hexdigit)
        && b[6] == b'_'
}

fn push_text_char(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        c => out.push(c),
    }
}

/// Text with leading or trailing whitespace needs `xml:space="preserve"`
pub(crate) fn needs_space_preserve(s: &str) -> bool {
    s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape() {
        assert_eq!(escape_xml_attr(r#"a"b'<&>"#), "a&quot;b&apos;&lt;&amp;&gt;");
        assert_eq!(escape_xml_text("R&D <team>"), "R&amp;D &lt;team&gt;");
    }

    #[test]
    fn test_control_characters_are_dropped_outside_cells() {
        assert_eq!(escape_xml_text("bell\u{7}here"), "bellhere");
        assert_eq!(escape_xml_attr("a\u{0}b\tc"), "ab\tc");
    }

    #[test]
    fn test_cell_text_escapes_control_characters() {
        assert_eq!(escape_cell_text("bell\u{7}here"), "bell_x0007_here");
        assert_eq!(escape_cell_text("nul\u{0}x"), "nul_x0000_x");
        assert_eq!(escape_cell_text("tab\tline\n"), "tab\tline\n");
        assert_eq!(escape_cell_text("a < b\u{FFFF}"), "a &lt; b_xFFFF_");
    }

    #[test]
    fn test_literal_escape_lookalike_is_protected() {
        assert_eq!(escape_cell_text("_x0041_"), "_x005F_x0041_");
        assert_eq!(escape_cell_text("snake_case_x"), "snake_case_x");
        assert_eq!(decode_cell_text("_x005F_x0041_"), "_x0041_");
    }

    #[test]
    fn test_decode_cell_text() {
        assert_eq!(decode_cell_text("bell_x0007_here"), "bell\u{7}here");
        assert_eq!(decode_cell_text("line1_x000d__x000a_line2"), "line1\r\nline2");
        assert_eq!(decode_cell_text("under_x005f_score"), "under_score");
        assert_eq!(decode_cell_text("_x12_ and _xZZZZ_ stay"), "_x12_ and _xZZZZ_ stay");
        assert_eq!(decode_cell_text("ends with _x"), "ends with _x");
        assert_eq!(decode_cell_text("日本_x0009_語"), "日本\t語");
    }

    #[test]
    fn test_cell_text_survives_escape_and_decode() {
        for text in ["bell\u{7}here", "nul\u{0}x", "_x0007_", "plain", "a_x00"] {
            assert_eq!(decode_cell_text(&escape_cell_text(text)), text);
        }
    }

    #[test]
    fn test_space_preserve() {
        assert!(needs_space_preserve(" lead"));
        assert!(needs_space_preserve("trail\n"));
        assert!(!needs_space_preserve("in side"));
        assert!(!needs_space_preserve(""));
    }
}
