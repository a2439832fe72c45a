//! A small selector engine: compound simple selectors (`tag`, `#id`, `.class`,
//! `[attr]`, `[attr=value]`, `*`), descendant and child combinators, and
//! comma-separated lists. Parsed once, matched many times against the arena.

use smallvec::SmallVec;

use crate::document::DocInner;
use crate::error::DomError;
use crate::node::NodeId;

#[derive(Clone, Debug)]
pub(crate) struct SelectorList {
    alternatives: Vec<ComplexSelector>,
}

#[derive(Clone, Debug)]
struct ComplexSelector {
    /// Left-to-right; `parts[0].combinator` is unused.
    parts: Vec<Part>,
}

#[derive(Clone, Debug)]
struct Part {
    combinator: Combinator,
    compound: Compound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, Default)]
struct Compound {
    /// `None` matches any element (`*` or no tag given).
    tag: Option<String>,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    /// Attribute name plus optional required value.
    attrs: SmallVec<[(String, Option<String>); 1]>,
}

pub(crate) fn parse(input: &str) -> Result<SelectorList, DomError> {
    let mut cursor = Cursor {
        src: input,
        bytes: input.as_bytes(),
        i: 0,
    };
    let mut alternatives = Vec::new();
    loop {
        cursor.skip_ws();
        let complex = cursor.parse_complex()?;
        alternatives.push(complex);
        cursor.skip_ws();
        if cursor.eof() {
            break;
        }
        cursor.expect(b',')?;
    }
    Ok(SelectorList { alternatives })
}

pub(crate) fn matches(inner: &DocInner, id: NodeId, list: &SelectorList) -> bool {
    list.alternatives
        .iter()
        .any(|complex| matches_at(inner, id, &complex.parts, complex.parts.len() - 1))
}

fn matches_at(inner: &DocInner, id: NodeId, parts: &[Part], idx: usize) -> bool {
    if !matches_compound(inner, id, &parts[idx].compound) {
        return false;
    }
    if idx == 0 {
        return true;
    }
    let parent = inner.nodes.get(id).and_then(|n| n.parent);
    match parts[idx].combinator {
        Combinator::Child => match parent {
            Some(p) => matches_at(inner, p, parts, idx - 1),
            None => false,
        },
        Combinator::Descendant => {
            let mut ancestor = parent;
            while let Some(a) = ancestor {
                if matches_at(inner, a, parts, idx - 1) {
                    return true;
                }
                ancestor = inner.nodes.get(a).and_then(|n| n.parent);
            }
            false
        }
    }
}

fn matches_compound(inner: &DocInner, id: NodeId, compound: &Compound) -> bool {
    let Some(node) = inner.nodes.get(id) else {
        return false;
    };
    let Some(tag) = node.tag() else {
        return false;
    };
    if let Some(want) = &compound.tag
        && !want.eq_ignore_ascii_case(tag)
    {
        return false;
    }
    if let Some(want) = &compound.id
        && node.attr("id") != Some(want.as_str())
    {
        return false;
    }
    for class in &compound.classes {
        let present = node
            .attr("class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class));
        if !present {
            return false;
        }
    }
    for (name, value) in &compound.attrs {
        match (node.attr(name), value) {
            (None, _) => return false,
            (Some(_), None) => {}
            (Some(actual), Some(want)) => {
                if actual != want {
                    return false;
                }
            }
        }
    }
    true
}

struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    i: usize,
}

impl<'a> Cursor<'a> {
    fn eof(&self) -> bool {
        self.i >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.i).copied()
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.i;
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.i += 1;
        }
        self.i > start
    }

    fn expect(&mut self, byte: u8) -> Result<(), DomError> {
        if self.peek() == Some(byte) {
            self.i += 1;
            Ok(())
        } else {
            Err(DomError::selector(
                self.src,
                format!("expected `{}` at byte {}", byte as char, self.i),
            ))
        }
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, DomError> {
        let mut parts = vec![Part {
            combinator: Combinator::Descendant,
            compound: self.parse_compound()?,
        }];
        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(b',') => break,
                Some(b'>') => {
                    self.i += 1;
                    self.skip_ws();
                    parts.push(Part {
                        combinator: Combinator::Child,
                        compound: self.parse_compound()?,
                    });
                }
                Some(_) if had_ws => {
                    parts.push(Part {
                        combinator: Combinator::Descendant,
                        compound: self.parse_compound()?,
                    });
                }
                Some(b) => {
                    return Err(DomError::selector(
                        self.src,
                        format!("unexpected `{}` at byte {}", b as char, self.i),
                    ));
                }
            }
        }
        Ok(ComplexSelector { parts })
    }

    fn parse_compound(&mut self) -> Result<Compound, DomError> {
        let mut compound = Compound::default();
        let mut any = false;
        match self.peek() {
            Some(b'*') => {
                self.i += 1;
                any = true;
            }
            Some(b) if is_ident_byte(b) => {
                compound.tag = Some(self.read_ident()?);
                any = true;
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some(b'#') => {
                    self.i += 1;
                    compound.id = Some(self.read_ident()?);
                    any = true;
                }
                Some(b'.') => {
                    self.i += 1;
                    compound.classes.push(self.read_ident()?);
                    any = true;
                }
                Some(b'[') => {
                    self.i += 1;
                    self.skip_ws();
                    let name = self.read_ident()?;
                    self.skip_ws();
                    let value = if self.peek() == Some(b'=') {
                        self.i += 1;
                        self.skip_ws();
                        Some(self.read_attr_value()?)
                    } else {
                        None
                    };
                    self.skip_ws();
                    self.expect(b']')?;
                    compound.attrs.push((name, value));
                    any = true;
                }
                _ => break,
            }
        }
        if any {
            Ok(compound)
        } else {
            Err(DomError::selector(
                self.src,
                format!("expected a simple selector at byte {}", self.i),
            ))
        }
    }

    fn read_ident(&mut self) -> Result<String, DomError> {
        let start = self.i;
        while self.peek().is_some_and(is_ident_byte) {
            self.i += 1;
        }
        if self.i == start {
            return Err(DomError::selector(
                self.src,
                format!("expected an identifier at byte {}", start),
            ));
        }
        Ok(self.src[start..self.i].to_string())
    }

    fn read_attr_value(&mut self) -> Result<String, DomError> {
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.i += 1;
                let start = self.i;
                while self.peek().is_some_and(|b| b != quote) {
                    self.i += 1;
                }
                if self.eof() {
                    return Err(DomError::selector(self.src, "unterminated attribute value"));
                }
                let value = self.src[start..self.i].to_string();
                self.i += 1;
                Ok(value)
            }
            _ => self.read_ident(),
        }
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

#[cfg(test)]
mod tests {
    use crate::Document;

    #[test]
    fn test_compound_matching() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html(
            "<div id=\"top\" class=\"panel open\"><p class=\"msg\">hi</p>\
             <p class=\"msg alt\" data-k=\"v\">bye</p></div>",
        )
        .unwrap();

        assert_eq!(body.query("p").unwrap().len(), 2);
        assert_eq!(body.query(".msg").unwrap().len(), 2);
        assert_eq!(body.query("p.alt").unwrap().len(), 1);
        assert_eq!(body.query("#top").unwrap().len(), 1);
        assert_eq!(body.query("div.panel.open").unwrap().len(), 1);
        assert_eq!(body.query("[data-k]").unwrap().len(), 1);
        assert_eq!(body.query("[data-k=v]").unwrap().len(), 1);
        assert_eq!(body.query("[data-k='w']").unwrap().len(), 0);
        assert_eq!(body.query("*").unwrap().len(), 3);
        assert_eq!(body.query("P").unwrap().len(), 2);
    }

    #[test]
    fn test_combinators() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html(
            "<section><article><p class=\"deep\">a</p></article></section>\
             <p class=\"shallow\">b</p>",
        )
        .unwrap();

        assert_eq!(body.query("section p").unwrap().len(), 1);
        assert_eq!(body.query("section > p").unwrap().len(), 0);
        assert_eq!(body.query("article > p").unwrap().len(), 1);
        assert_eq!(body.query("section .deep, .shallow").unwrap().len(), 2);
    }

    #[test]
    fn test_child_combinator_backtracks() {
        let doc = Document::new();
        let body = doc.body();
        // The nearest .b ancestor of the span has no .a parent; the higher
        // one does. Matching must not commit to the nearest candidate.
        body.set_inner_html(
            "<div class=\"a\"><div class=\"b\"><div class=\"b2\">\
             <div class=\"b\"><span>x</span></div></div></div></div>",
        )
        .unwrap();
        assert_eq!(body.query(".a > .b span").unwrap().len(), 1);
    }

    #[test]
    fn test_selector_errors() {
        let doc = Document::new();
        let body = doc.body();
        assert!(body.query("").is_err());
        assert!(body.query("..x").is_err());
        assert!(body.query("[unclosed").is_err());
        assert!(body.query("a &").is_err());
    }

    #[test]
    fn test_query_excludes_scope_root() {
        let doc = Document::new();
        let body = doc.body();
        body.set_inner_html("<div class=\"panel\"><div class=\"panel\"></div></div>")
            .unwrap();
        let outer = body.query(".panel").unwrap().first().unwrap();
        assert_eq!(outer.query(".panel").unwrap().len(), 1);
    }
}
