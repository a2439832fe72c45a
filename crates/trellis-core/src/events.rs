use std::rc::Rc;

use trellis_dom::Event;

use crate::error::ViewError;
use crate::view::View;

impl View {
    /// Binds every declared event spec on the root element, replacing any
    /// bindings from an earlier call. The attachment protocol runs this
    /// after each insertion because an ancestor's content replacement purges
    /// bindings on everything it detaches.
    ///
    /// Handlers hold only a weak reference to the view, so a binding left in
    /// the document never keeps a view alive.
    pub fn delegate_events(&self) -> Result<&Self, ViewError> {
        self.ensure_live("delegate_events")?;
        self.undelegate_events();
        let mut bound = Vec::with_capacity(self.inner.config.events.len());
        for spec in &self.inner.config.events {
            let weak = Rc::downgrade(&self.inner);
            let handler = spec.handler.clone();
            let wrapped: Rc<dyn Fn(&Event)> = Rc::new(move |event| {
                if let Some(inner) = weak.upgrade() {
                    handler(&View { inner }, event);
                }
            });
            let id = match &spec.selector {
                Some(selector) => self.inner.el.on_delegated(&spec.kind, selector, wrapped)?,
                None => self.inner.el.on(&spec.kind, wrapped),
            };
            bound.push(id);
        }
        *self.inner.listeners.borrow_mut() = bound;
        Ok(self)
    }

    /// Removes this view's current bindings. Ids already purged by an
    /// ancestor's re-render are skipped silently.
    pub fn undelegate_events(&self) -> &Self {
        let ids = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        for id in ids {
            self.inner.doc.off(id);
        }
        self
    }
}
