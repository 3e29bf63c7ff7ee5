/// Clean up question text coming out of the backend or a CSV import:
/// decode HTML entities, drop leftover markup, and squash the various
/// line-break conventions spreadsheet tools produce into single `\n`s.
///
/// Always returns a string; empty input stays empty. Running it twice
/// over already-decoded text changes nothing.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let decoded = html_escape::decode_html_entities(text);
    let stripped = strip_tags(&decoded);

    let unified = stripped.replace("\r\n", "\n").replace('\r', "\n");

    // A line break followed by any amount of whitespace (including more
    // line breaks) counts as one break.
    let mut out = String::with_capacity(unified.len());
    let mut chars = unified.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' {
            out.push('\n');
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
        } else {
            out.push(c);
        }
    }

    out.trim().to_string()
}

/// Remove `<...>` spans. An unterminated `<` swallows the rest of the
/// string, mirroring how lenient HTML strippers treat a dangling tag.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(normalize("Hund &amp; Halter"), "Hund & Halter");
        assert_eq!(normalize("a&#x000D;b"), "a\nb");
        assert_eq!(normalize("&lt;wichtig&gt;"), "");
    }

    #[test]
    fn strips_markup_tags() {
        assert_eq!(normalize("<p>Frage</p> eins"), "Frage eins");
        assert_eq!(normalize("ohne <br/> Umbruch"), "ohne  Umbruch");
    }

    #[test]
    fn unifies_line_break_variants() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn collapses_blank_line_runs() {
        assert_eq!(normalize("a\n\n\nb"), "a\nb");
        assert_eq!(normalize("a\n  \n\t\nb"), "a\nb");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize("  Frage 1\n"), "Frage 1");
    }

    #[test]
    fn no_entities_or_tags_or_blank_runs_survive() {
        let out = normalize("Wer &amp; was?<b>\r\n\r\n\r\nAntwort</b>  ");
        assert!(!out.contains("&amp;"));
        assert!(!out.contains('<'));
        assert!(!out.contains("\n\n"));
        assert_eq!(out, "Wer & was?\nAntwort");
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let once = normalize("Hund &amp; Halter\r\n\r\nZweite Zeile");
        assert_eq!(normalize(&once), once);
    }
}
