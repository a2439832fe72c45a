//! # trellis-template
//!
//! A compiled interpolation template: `{{ dotted.path }}` substitutes an
//! HTML-escaped value from a [`serde_json::Value`], `{{{ dotted.path }}}`
//! substitutes it raw. Missing paths and `null` render as the empty string,
//! so a template stays usable with partial or absent data.
//!
//! ```rust
//! use serde_json::json;
//!
//! let template = trellis_template::compile("<p>Hello {{user.name}}</p>").unwrap();
//! let markup = template.render(&json!({ "user": { "name": "Matt" } })).unwrap();
//! assert_eq!(markup, "<p>Hello Matt</p>");
//! ```
//!
//! The view layer treats [`Template`] as an opaque callable of its data; it
//! never inspects template syntax itself.

use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unterminated substitution starting at byte {0}")]
    Unterminated(usize),

    #[error("empty substitution path at byte {0}")]
    EmptyPath(usize),

    #[error("cannot interpolate `{path}`: value is not a scalar")]
    NotScalar { path: String },
}

#[derive(Debug)]
enum Segment {
    Literal(String),
    Field { path: Vec<String>, raw: bool },
}

/// A compiled template. Cloning is cheap (the segment list is shared), so a
/// producer function can hand one out per render.
#[derive(Clone, Debug)]
pub struct Template {
    segments: Rc<Vec<Segment>>,
}

/// Compiles a template source into a [`Template`].
pub fn compile(source: &str) -> Result<Template, TemplateError> {
    let mut segments = Vec::new();
    let mut rest = source;
    let mut offset = 0usize;
    while let Some(open) = rest.find("{{") {
        if !rest[..open].is_empty() {
            segments.push(Segment::Literal(rest[..open].to_string()));
        }
        let raw = rest[open..].starts_with("{{{");
        let (open_len, close_marker) = if raw { (3, "}}}") } else { (2, "}}") };
        let body_start = open + open_len;
        let Some(close) = rest[body_start..].find(close_marker) else {
            return Err(TemplateError::Unterminated(offset + open));
        };
        let body = rest[body_start..body_start + close].trim();
        if body.is_empty() {
            return Err(TemplateError::EmptyPath(offset + open));
        }
        let path: Vec<String> = body.split('.').map(str::to_string).collect();
        if path.iter().any(|part| part.is_empty()) {
            return Err(TemplateError::EmptyPath(offset + open));
        }
        segments.push(Segment::Field { path, raw });
        let consumed = body_start + close + close_marker.len();
        offset += consumed;
        rest = &rest[consumed..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }
    Ok(Template {
        segments: Rc::new(segments),
    })
}

impl Template {
    /// Renders against `data`. Fails only when a path lands on a non-scalar
    /// value — a missing path is the empty string, not an error.
    pub fn render(&self, data: &Value) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in self.segments.iter() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { path, raw } => {
                    let text = lookup(data, path)?;
                    if *raw {
                        out.push_str(&text);
                    } else {
                        escape_into(&text, &mut out);
                    }
                }
            }
        }
        Ok(out)
    }
}

fn lookup(data: &Value, path: &[String]) -> Result<String, TemplateError> {
    let mut current = data;
    for part in path {
        match current.get(part) {
            Some(next) => current = next,
            None => return Ok(String::new()),
        }
    }
    match current {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => Err(TemplateError::NotScalar {
            path: path.join("."),
        }),
    }
}

/// HTML-escapes `text` for use in element content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, &mut out);
    out
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
