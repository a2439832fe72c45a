//! The attachment protocol: insert the root element first, re-establish
//! event delegation, and only then render. A view that measures against its
//! parent or relies on document-connected delegation must be in the tree
//! before its producers run; this module is the single place that enforces
//! the ordering, so every call site going through it is protected.

use std::fmt;

use trellis_dom::Element;

use crate::error::ViewError;
use crate::view::View;

/// Where to attach: an existing element, or a selector resolved against the
/// whole document at attach time.
#[derive(Clone)]
pub enum Target {
    Element(Element),
    Selector(String),
}

impl From<Element> for Target {
    fn from(el: Element) -> Self {
        Target::Element(el)
    }
}

impl From<&Element> for Target {
    fn from(el: &Element) -> Self {
        Target::Element(el.clone())
    }
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Target::Selector(selector)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Element(el) => write!(f, "{:?}", el),
            Target::Selector(s) => write!(f, "`{}`", s),
        }
    }
}

#[derive(Clone, Copy)]
enum Placement {
    Append,
    Prepend,
    Replace,
}

impl View {
    /// Inserts the root element as the target's last child, then renders.
    pub fn append_to(&self, target: impl Into<Target>) -> Result<&Self, ViewError> {
        self.attach(target.into(), Placement::Append, "append_to")
    }

    /// Inserts the root element as the target's first child, then renders.
    pub fn prepend_to(&self, target: impl Into<Target>) -> Result<&Self, ViewError> {
        self.attach(target.into(), Placement::Prepend, "prepend_to")
    }

    /// Removes the target from the tree and puts the root element in its
    /// place, then renders.
    pub fn replace(&self, target: impl Into<Target>) -> Result<&Self, ViewError> {
        self.attach(target.into(), Placement::Replace, "replace")
    }

    fn attach(
        &self,
        target: Target,
        placement: Placement,
        op: &'static str,
    ) -> Result<&Self, ViewError> {
        self.ensure_live(op)?;
        match self.resolve_target(&target)? {
            Some(resolved) => match placement {
                Placement::Append => resolved.append(&self.inner.el),
                Placement::Prepend => resolved.prepend(&self.inner.el),
                Placement::Replace => resolved.replace_with(&self.inner.el),
            },
            // Degrade to a detached render rather than failing: the view
            // still reaches a valid rendered state, and the missing mount is
            // observable through `el().is_connected()`.
            None => log::warn!("{op}: target {:?} did not resolve, rendering detached", target),
        }
        self.delegate_events()?;
        self.render()?;
        Ok(self)
    }

    fn resolve_target(&self, target: &Target) -> Result<Option<Element>, ViewError> {
        match target {
            Target::Element(el) => Ok(Some(el.clone())),
            Target::Selector(selector) => Ok(self.inner.doc.query(selector)?.first()),
        }
    }
}
