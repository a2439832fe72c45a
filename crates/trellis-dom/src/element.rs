use std::fmt;
use std::rc::Rc;

use crate::document::Document;
use crate::error::DomError;
use crate::event::{Event, ListenerId};
use crate::node::{NodeData, NodeId};
use crate::selector;

/// A live handle to one node in a [`Document`].
///
/// Handles are identity-stable: replacing an element's contents does not
/// invalidate the handle, and a detached element can be re-inserted. A handle
/// whose node was freed with [`Element::remove`] goes inert — queries return
/// nothing and mutations are ignored.
#[derive(Clone)]
pub struct Element {
    pub(crate) doc: Document,
    pub(crate) id: NodeId,
}

impl Element {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> Document {
        self.doc.clone()
    }

    pub fn tag(&self) -> Option<String> {
        self.doc
            .with_inner(|inner| inner.nodes.get(self.id).and_then(|n| n.tag().map(String::from)))
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.doc.with_inner(|inner| {
            inner
                .nodes
                .get(self.id)
                .and_then(|n| n.attr(name).map(String::from))
        })
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        self.doc.with_inner_mut(|inner| {
            let Some(node) = inner.nodes.get_mut(self.id) else {
                return;
            };
            if let NodeData::Element { attrs, .. } = &mut node.data {
                match attrs.iter_mut().find(|(n, _)| n == name) {
                    Some(entry) => entry.1 = value.to_string(),
                    None => attrs.push((name.to_string(), value.to_string())),
                }
            }
        });
    }

    /// Matches the selector against this subtree's descendants. The scope
    /// element itself is never part of the result.
    pub fn query(&self, selector: &str) -> Result<Selection, DomError> {
        let ids = self.doc.query_scoped(self.id, selector)?;
        Ok(Selection {
            doc: self.doc.clone(),
            ids,
        })
    }

    pub fn matches(&self, selector: &str) -> Result<bool, DomError> {
        self.doc.matches(self.id, selector)
    }

    /// Replaces the entire contents with parsed markup. Bindings on the
    /// replaced descendants are severed; the detached nodes stay alive for
    /// any outstanding handles.
    pub fn set_inner_html(&self, html: &str) -> Result<(), DomError> {
        self.doc.set_inner_html(self.id, html)
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        self.doc
            .with_inner(|inner| inner.serialize(self.id, &mut out, false));
        out
    }

    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.doc
            .with_inner(|inner| inner.serialize(self.id, &mut out, true));
        out
    }

    /// Concatenated text of this subtree.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.doc
            .with_inner(|inner| inner.collect_text(self.id, &mut out));
        out
    }

    /// Appends `child` as this element's last child.
    pub fn append(&self, child: &Element) {
        self.doc.insert_child(self.id, child.id, false);
    }

    /// Inserts `child` as this element's first child.
    pub fn prepend(&self, child: &Element) {
        self.doc.insert_child(self.id, child.id, true);
    }

    /// Removes this element from the tree and puts `replacement` in its
    /// place. This element's subtree is purged of bindings but stays alive.
    pub fn replace_with(&self, replacement: &Element) {
        self.doc.replace_node(self.id, replacement.id);
    }

    /// Detaches from the parent, keeping the subtree and its bindings.
    pub fn detach(&self) {
        self.doc.detach(self.id);
    }

    /// Detaches, purges bindings and frees the subtree. The handle and any
    /// clones of it go inert.
    pub fn remove(&self) {
        self.doc.remove(self.id);
    }

    pub fn parent(&self) -> Option<Element> {
        self.doc.with_inner(|inner| {
            inner
                .nodes
                .get(self.id)
                .and_then(|n| n.parent)
                .map(|id| Element {
                    doc: self.doc.clone(),
                    id,
                })
        })
    }

    /// Element children, in order; text nodes are skipped.
    pub fn children(&self) -> Vec<Element> {
        self.doc.with_inner(|inner| {
            let Some(node) = inner.nodes.get(self.id) else {
                return Vec::new();
            };
            node.children
                .iter()
                .filter(|&&c| inner.nodes[c].data.is_element())
                .map(|&c| Element {
                    doc: self.doc.clone(),
                    id: c,
                })
                .collect()
        })
    }

    /// Whether this node is reachable from the document root.
    pub fn is_connected(&self) -> bool {
        self.doc.is_connected(self.id)
    }

    /// Binds a direct listener; it fires whenever `kind` bubbles through
    /// this node.
    pub fn on(&self, kind: &str, handler: Rc<dyn Fn(&Event)>) -> ListenerId {
        self.doc.add_listener(self.id, kind, None, handler)
    }

    /// Binds a delegated listener; it fires when `kind` is dispatched on a
    /// descendant matching `selector`.
    pub fn on_delegated(
        &self,
        kind: &str,
        selector: &str,
        handler: Rc<dyn Fn(&Event)>,
    ) -> Result<ListenerId, DomError> {
        let list = selector::parse(selector)?;
        Ok(self.doc.add_listener(self.id, kind, Some(list), handler))
    }

    /// Dispatches a synthetic event here; returns how many handlers fired.
    pub fn dispatch(&self, kind: &str) -> usize {
        self.doc.dispatch(self, kind)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.doc.inner, &other.doc.inner) && self.id == other.id
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag() {
            Some(tag) => write!(f, "Element(<{}> {:?})", tag, self.id),
            None => write!(f, "Element(#text {:?})", self.id),
        }
    }
}

/// An ordered matched set, the result of a query. May be empty; consumers
/// decide whether they need the first match or the whole set.
#[derive(Clone)]
pub struct Selection {
    pub(crate) doc: Document,
    pub(crate) ids: Vec<NodeId>,
}

impl Selection {
    pub fn empty(doc: &Document) -> Self {
        Selection {
            doc: doc.clone(),
            ids: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn first(&self) -> Option<Element> {
        self.get(0)
    }

    pub fn get(&self, index: usize) -> Option<Element> {
        self.ids.get(index).map(|&id| Element {
            doc: self.doc.clone(),
            id,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Element> + '_ {
        self.ids.iter().map(|&id| Element {
            doc: self.doc.clone(),
            id,
        })
    }

    /// Concatenated text of every element in the set.
    pub fn text(&self) -> String {
        self.iter().map(|el| el.text()).collect()
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection").field("len", &self.len()).finish()
    }
}
