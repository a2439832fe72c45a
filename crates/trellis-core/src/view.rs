use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use trellis_dom::{Document, Element, ListenerId, Selection};

use crate::config::ViewConfig;
use crate::error::ViewError;

/// Lifecycle state of a view. `Disposed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Unrendered,
    Rendered,
    Disposed,
}

/// A view: one node in a composition tree, owning one root element and the
/// render lifecycle around it.
///
/// `View` is a cheap cloneable handle. Cloning does not fork the view; all
/// clones see the same root element, lifecycle state and element cache.
#[derive(Clone)]
pub struct View {
    pub(crate) inner: Rc<ViewInner>,
}

pub(crate) struct ViewInner {
    pub doc: Document,
    pub el: Element,
    pub state: Cell<Lifecycle>,
    pub config: ViewConfig,
    pub elements: RefCell<HashMap<String, Selection>>,
    pub listeners: RefCell<Vec<ListenerId>>,
}

impl View {
    /// Builds a view from its definition: creates the detached root element
    /// and binds the declarative events. Nothing is rendered yet.
    ///
    /// Fails only when an event binding carries an invalid selector.
    pub fn new(doc: &Document, config: ViewConfig) -> Result<View, ViewError> {
        let el = doc.create_element(config.tag.as_deref().unwrap_or("div"));
        for (name, value) in &config.attrs {
            el.set_attr(name, value);
        }
        let view = View {
            inner: Rc::new(ViewInner {
                doc: doc.clone(),
                el,
                state: Cell::new(Lifecycle::Unrendered),
                config,
                elements: RefCell::new(HashMap::new()),
                listeners: RefCell::new(Vec::new()),
            }),
        };
        view.delegate_events()?;
        Ok(view)
    }

    /// The root element. Stable for the view's whole life; renders replace
    /// its contents, never the element itself.
    pub fn el(&self) -> Element {
        self.inner.el.clone()
    }

    pub fn document(&self) -> Document {
        self.inner.doc.clone()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.state.get()
    }

    pub(crate) fn ensure_live(&self, op: &'static str) -> Result<(), ViewError> {
        if self.inner.state.get() == Lifecycle::Disposed {
            Err(ViewError::Disposed { op })
        } else {
            Ok(())
        }
    }

    /// Ends the view: clears the element cache, unbinds its events, removes
    /// the root element (subtree freed, bindings purged) and transitions to
    /// `Disposed`. Does not dispose subviews — their constructors own them.
    ///
    /// Every operation after this one, including a second `dispose`, fails
    /// with [`ViewError::Disposed`].
    pub fn dispose(&self) -> Result<(), ViewError> {
        self.ensure_live("dispose")?;
        self.inner.elements.borrow_mut().clear();
        self.undelegate_events();
        self.inner.el.remove();
        self.inner.state.set(Lifecycle::Disposed);
        Ok(())
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("el", &self.inner.el)
            .field("state", &self.inner.state.get())
            .finish()
    }
}
