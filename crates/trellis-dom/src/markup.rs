//! HTML fragment parsing and serialization.
//!
//! This is a fragment parser, not a conforming HTML5 tree builder: it handles
//! the subset templates are written in — elements, attributes (quoted or
//! bare), text with the core entities, void elements, self-closing syntax,
//! and comments. Unmatched close tags are ignored and open elements are
//! closed implicitly at end of input, which mirrors how browsers recover.

use crate::error::DomError;

/// Parser output, converted into arena nodes by the document.
#[derive(Debug)]
pub(crate) enum ParsedNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<ParsedNode>,
    },
    Text(String),
}

/// Elements that never have children and serialize without a close tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

struct Frame {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<ParsedNode>,
}

pub(crate) fn parse_fragment(input: &str) -> Result<Vec<ParsedNode>, DomError> {
    let bytes = input.as_bytes();
    let mut i = 0usize;
    let mut stack: Vec<Frame> = Vec::new();
    let mut roots: Vec<ParsedNode> = Vec::new();

    fn push_node(stack: &mut [Frame], roots: &mut Vec<ParsedNode>, node: ParsedNode) {
        match stack.last_mut() {
            Some(frame) => frame.children.push(node),
            None => roots.push(node),
        }
    }

    while i < bytes.len() {
        if bytes[i] == b'<' {
            if input[i..].starts_with("<!--") {
                match input[i + 4..].find("-->") {
                    Some(end) => i += 4 + end + 3,
                    None => return Err(DomError::markup("unterminated comment", i)),
                }
            } else if bytes.get(i + 1) == Some(&b'/') {
                let (tag, next) = read_tag_name(input, i + 2)?;
                i = next;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                if bytes.get(i) != Some(&b'>') {
                    return Err(DomError::markup("malformed close tag", i));
                }
                i += 1;
                // Close down to the matching open element; ignore a close tag
                // that matches nothing.
                if let Some(pos) = stack.iter().rposition(|f| f.tag.eq_ignore_ascii_case(&tag)) {
                    while stack.len() > pos {
                        let frame = stack.pop().expect("frame present");
                        let node = ParsedNode::Element {
                            tag: frame.tag,
                            attrs: frame.attrs,
                            children: frame.children,
                        };
                        push_node(&mut stack, &mut roots, node);
                    }
                }
            } else if bytes
                .get(i + 1)
                .is_some_and(|b| b.is_ascii_alphabetic())
            {
                let (tag, mut j) = read_tag_name(input, i + 1)?;
                let mut attrs = Vec::new();
                let mut self_closing = false;
                loop {
                    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                        j += 1;
                    }
                    match bytes.get(j) {
                        Some(b'>') => {
                            j += 1;
                            break;
                        }
                        Some(b'/') => {
                            if bytes.get(j + 1) != Some(&b'>') {
                                return Err(DomError::markup("expected `>` after `/`", j + 1));
                            }
                            self_closing = true;
                            j += 2;
                            break;
                        }
                        Some(_) => {
                            let (name, value, next) = read_attr(input, j)?;
                            attrs.push((name, value));
                            j = next;
                        }
                        None => return Err(DomError::markup("unterminated tag", j)),
                    }
                }
                i = j;
                if self_closing || is_void(&tag) {
                    push_node(
                        &mut stack,
                        &mut roots,
                        ParsedNode::Element {
                            tag,
                            attrs,
                            children: Vec::new(),
                        },
                    );
                } else {
                    stack.push(Frame {
                        tag,
                        attrs,
                        children: Vec::new(),
                    });
                }
            } else {
                return Err(DomError::markup("unexpected `<`", i));
            }
        } else {
            let start = i;
            while i < bytes.len() && bytes[i] != b'<' {
                i += 1;
            }
            let text = decode_entities(&input[start..i]);
            if !text.is_empty() {
                push_node(&mut stack, &mut roots, ParsedNode::Text(text));
            }
        }
    }

    // Implicitly close anything left open.
    while let Some(frame) = stack.pop() {
        let node = ParsedNode::Element {
            tag: frame.tag,
            attrs: frame.attrs,
            children: frame.children,
        };
        push_node(&mut stack, &mut roots, node);
    }
    Ok(roots)
}

fn read_tag_name(input: &str, start: usize) -> Result<(String, usize), DomError> {
    let bytes = input.as_bytes();
    let mut i = start;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    if i == start {
        return Err(DomError::markup("expected a tag name", start));
    }
    Ok((input[start..i].to_ascii_lowercase(), i))
}

fn read_attr(input: &str, start: usize) -> Result<(String, String, usize), DomError> {
    let bytes = input.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() || b == b'=' || b == b'>' || b == b'/' {
            break;
        }
        i += 1;
    }
    if i == start {
        return Err(DomError::markup("expected an attribute name", start));
    }
    let name = input[start..i].to_ascii_lowercase();
    let mut j = i;
    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
        j += 1;
    }
    if bytes.get(j) != Some(&b'=') {
        // Bare attribute, e.g. `disabled`.
        return Ok((name, String::new(), i));
    }
    j += 1;
    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
        j += 1;
    }
    match bytes.get(j) {
        Some(&quote @ (b'"' | b'\'')) => {
            j += 1;
            let value_start = j;
            while j < bytes.len() && bytes[j] != quote {
                j += 1;
            }
            if j >= bytes.len() {
                return Err(DomError::markup("unterminated attribute value", value_start));
            }
            let value = decode_entities(&input[value_start..j]);
            Ok((name, value, j + 1))
        }
        Some(_) => {
            let value_start = j;
            while j < bytes.len() {
                let b = bytes[j];
                if b.is_ascii_whitespace() || b == b'>' {
                    break;
                }
                j += 1;
            }
            let value = decode_entities(&input[value_start..j]);
            Ok((name, value, j))
        }
        None => Err(DomError::markup("unterminated tag", j)),
    }
}

pub(crate) fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let mut replaced = false;
        for (entity, ch) in [
            ("&amp;", '&'),
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&quot;", '"'),
            ("&#39;", '\''),
            ("&apos;", '\''),
        ] {
            if rest.starts_with(entity) {
                out.push(ch);
                rest = &rest[entity.len()..];
                replaced = true;
                break;
            }
        }
        if !replaced {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}

pub(crate) fn escape_text(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

pub(crate) fn escape_attr(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(markup: &str) -> String {
        let doc = crate::Document::new();
        let body = doc.body();
        body.set_inner_html(markup).unwrap();
        body.inner_html()
    }

    #[test]
    fn test_basic_roundtrip() {
        let markup = "<div class=\"panel\"><p>Hello</p><p>World</p></div>";
        assert_eq!(roundtrip(markup), markup);
    }

    #[test]
    fn test_void_and_self_closing() {
        assert_eq!(roundtrip("<br>"), "<br>");
        assert_eq!(roundtrip("<img src=\"x.png\">"), "<img src=\"x.png\">");
        assert_eq!(roundtrip("<span/>after"), "<span></span>after");
    }

    #[test]
    fn test_entities() {
        assert_eq!(roundtrip("a &amp; b &lt;c&gt;"), "a &amp; b &lt;c&gt;");
        let doc = crate::Document::new();
        let body = doc.body();
        body.set_inner_html("<p>a &amp; b</p>").unwrap();
        assert_eq!(body.text(), "a & b");
    }

    #[test]
    fn test_bare_and_unquoted_attrs() {
        let doc = crate::Document::new();
        let body = doc.body();
        body.set_inner_html("<input disabled value=abc>").unwrap();
        let input = body.query("input").unwrap().first().unwrap();
        assert_eq!(input.attr("disabled").as_deref(), Some(""));
        assert_eq!(input.attr("value").as_deref(), Some("abc"));
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(roundtrip("a<!-- note -->b"), "ab");
    }

    #[test]
    fn test_lenient_recovery() {
        // Unmatched close tag ignored, unclosed element closed at EOF.
        assert_eq!(roundtrip("</nope>x"), "x");
        assert_eq!(roundtrip("<div><p>x"), "<div><p>x</p></div>");
    }

    #[test]
    fn test_parse_errors() {
        let doc = crate::Document::new();
        let body = doc.body();
        assert!(body.set_inner_html("<!-- unterminated").is_err());
        assert!(body.set_inner_html("a < b").is_err());
        assert!(body.set_inner_html("<p attr=\"unclosed").is_err());
    }

    #[test]
    fn test_tag_case_folding() {
        assert_eq!(roundtrip("<DIV Class=\"x\">t</DIV>"), "<div class=\"x\">t</div>");
    }
}
