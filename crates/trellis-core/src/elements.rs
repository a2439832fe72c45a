use std::collections::HashMap;

use trellis_dom::Selection;

use crate::error::ViewError;
use crate::view::View;

impl View {
    /// Re-resolves every declared element reference against the current root
    /// subtree. The default render path calls this after each markup swap;
    /// it is public so a caller that mutated the subtree out of band can
    /// force re-resolution.
    ///
    /// A selector matching nothing stores an empty selection — absence is a
    /// state consumers handle, not an error. Stale handles from replaced
    /// markup are never left behind: the whole cache is rebuilt.
    pub fn update_elements(&self) -> Result<&Self, ViewError> {
        self.ensure_live("update_elements")?;
        let declarations = &self.inner.config.elements;
        let mut resolved = HashMap::with_capacity(declarations.len());
        for (name, selector) in declarations {
            let selection = self.inner.el.query(selector)?;
            resolved.insert(name.clone(), selection);
        }
        *self.inner.elements.borrow_mut() = resolved;
        Ok(self)
    }

    /// Looks up a cached element reference by its declared name. Unknown
    /// names and not-yet-rendered views yield an empty selection.
    pub fn element(&self, name: &str) -> Selection {
        self.inner
            .elements
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_else(|| Selection::empty(&self.inner.doc))
    }
}
