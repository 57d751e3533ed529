//! Output cleaning for free-text fields. Applied at serialization time only;
//! stored rows keep whatever the client sent.

/// Tags that survive cleaning. Anything else has its angle brackets escaped
/// so the tag renders as text.
const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "i", "em", "strong", "img", "p", "br", "ul", "ol", "li",
];

/// Attributes kept on allowed tags. Event handlers (`on*`) and anything
/// else are dropped when the tag is rebuilt.
const ALLOWED_ATTRS: &[&str] = &["href", "src", "alt", "title"];

pub fn clean(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match tail.find('>') {
            Some(close) => {
                out.push_str(&rewrite_tag(&tail[..=close]));
                rest = &tail[close + 1..];
            }
            None => {
                // A '<' that never closes is plain text
                out.push_str("&lt;");
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// `tag` includes the surrounding angle brackets.
fn rewrite_tag(tag: &str) -> String {
    let inner = &tag[1..tag.len() - 1];
    let (closing, rest) = match inner.strip_prefix('/') {
        Some(r) => (true, r),
        None => (false, inner),
    };
    let name_end = rest
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(rest.len());
    let name = rest[..name_end].to_ascii_lowercase();

    if name.is_empty() || !ALLOWED_TAGS.contains(&name.as_str()) {
        return tag.replace('<', "&lt;").replace('>', "&gt;");
    }

    if closing {
        return format!("</{}>", name);
    }

    let mut rebuilt = format!("<{}", name);
    for (attr, value) in parse_attrs(&rest[name_end..]) {
        let attr = attr.to_ascii_lowercase();
        if !ALLOWED_ATTRS.contains(&attr.as_str()) {
            continue;
        }
        match value {
            Some(v) => {
                rebuilt.push(' ');
                rebuilt.push_str(&attr);
                rebuilt.push_str("=\"");
                rebuilt.push_str(&v);
                rebuilt.push('"');
            }
            None => {
                rebuilt.push(' ');
                rebuilt.push_str(&attr);
            }
        }
    }
    rebuilt.push('>');
    rebuilt
}

/// Attribute scanner for the inside of a tag: `name`, `name=value`,
/// `name="value"` or `name='value'`, separated by whitespace. All
/// delimiters are ASCII, so byte positions are valid char boundaries.
fn parse_attrs(s: &str) -> Vec<(&str, Option<&str>)> {
    let mut attrs = Vec::new();
    let b = s.as_bytes();
    let n = b.len();
    let mut i = 0;
    while i < n {
        while i < n && (b[i].is_ascii_whitespace() || b[i] == b'/') {
            i += 1;
        }
        if i >= n {
            break;
        }
        let name_start = i;
        while i < n && !b[i].is_ascii_whitespace() && b[i] != b'=' && b[i] != b'/' {
            i += 1;
        }
        let name = &s[name_start..i];
        while i < n && b[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < n && b[i] == b'=' {
            i += 1;
            while i < n && b[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < n && (b[i] == b'"' || b[i] == b'\'') {
                let quote = b[i];
                i += 1;
                let val_start = i;
                while i < n && b[i] != quote {
                    i += 1;
                }
                attrs.push((name, Some(&s[val_start..i])));
                if i < n {
                    i += 1;
                }
            } else {
                let val_start = i;
                while i < n && !b[i].is_ascii_whitespace() {
                    i += 1;
                }
                attrs.push((name, Some(&s[val_start..i])));
            }
        } else {
            attrs.push((name, None));
        }
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_plain_text_through() {
        assert_eq!(clean("Egg Scramble"), "Egg Scramble");
    }

    #[test]
    fn escapes_script_tags() {
        assert_eq!(
            clean(r#"Bad title <script>alert("xss");</script>"#),
            r#"Bad title &lt;script&gt;alert("xss");&lt;/script&gt;"#
        );
    }

    #[test]
    fn strips_event_handlers_from_allowed_tags() {
        let input = r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#;
        let expected = r#"Bad image <img src="https://url.to.file.which/does-not.exist">. But not <strong>all</strong> bad."#;
        assert_eq!(clean(input), expected);
    }

    #[test]
    fn keeps_allowed_attributes() {
        assert_eq!(
            clean(r#"<a href="https://example.com" target="_blank">link</a>"#),
            r#"<a href="https://example.com">link</a>"#
        );
    }

    #[test]
    fn escapes_unclosed_angle_bracket() {
        assert_eq!(clean("1 < 2 and counting"), "1 &lt; 2 and counting");
    }

    #[test]
    fn tag_names_are_case_insensitive() {
        assert_eq!(
            clean(r#"<IMG SRC="x.png" ONERROR="boom()">"#),
            r#"<img src="x.png">"#
        );
        assert_eq!(clean("<SCRIPT>x</SCRIPT>"), "&lt;SCRIPT&gt;x&lt;/SCRIPT&gt;");
    }

    #[test]
    fn unquoted_attribute_values() {
        assert_eq!(clean("<img src=x.png onerror=boom>"), r#"<img src="x.png">"#);
    }
}
