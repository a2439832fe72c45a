use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use slotmap::SlotMap;

use crate::element::{Element, Selection};
use crate::error::DomError;
use crate::event::{Event, EventHandler, Listener, ListenerId};
use crate::markup::{self, ParsedNode};
use crate::node::{Node, NodeData, NodeId};
use crate::selector::{self, SelectorList};

/// An in-memory HTML document.
///
/// `Document` is a cheap cloneable handle over a shared arena. All mutation
/// goes through it; [`Element`] and [`Selection`] are thin `(document, id)`
/// handles into the same arena. The model is single-threaded: handles are
/// `!Send` and every operation runs synchronously to completion.
///
/// Nodes that leave the tree (content replacement, `detach`, `replace_with`)
/// stay alive in the arena so outstanding handles remain usable — a detached
/// subtree can be re-inserted later. Only [`Element::remove`] frees nodes.
#[derive(Clone)]
pub struct Document {
    pub(crate) inner: Rc<RefCell<DocInner>>,
}

pub(crate) struct DocInner {
    pub nodes: SlotMap<NodeId, Node>,
    pub root: NodeId,
    pub listeners: HashMap<NodeId, Vec<Listener>>,
    pub next_seq: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut nodes: SlotMap<NodeId, Node> = SlotMap::with_key();
        let root = nodes.insert(Node::element("body"));
        Document {
            inner: Rc::new(RefCell::new(DocInner {
                nodes,
                root,
                listeners: HashMap::new(),
                next_seq: 0,
            })),
        }
    }

    /// The document root, owner of all connected content.
    pub fn body(&self) -> Element {
        let root = self.inner.borrow().root;
        Element {
            doc: self.clone(),
            id: root,
        }
    }

    /// Creates a detached element.
    pub fn create_element(&self, tag: &str) -> Element {
        let id = self.inner.borrow_mut().nodes.insert(Node::element(tag));
        Element {
            doc: self.clone(),
            id,
        }
    }

    /// Creates a detached text node.
    pub fn create_text(&self, text: &str) -> Element {
        let id = self.inner.borrow_mut().nodes.insert(Node::text(text));
        Element {
            doc: self.clone(),
            id,
        }
    }

    /// Queries the whole document (scoped to the body root).
    pub fn query(&self, selector: &str) -> Result<Selection, DomError> {
        self.body().query(selector)
    }

    /// Removes a listener. A no-op when the id is unknown — the listener may
    /// already have been purged by a content replacement.
    pub fn off(&self, id: ListenerId) {
        let mut inner = self.inner.borrow_mut();
        let mut removed = false;
        let mut entry_empty = false;
        if let Some(list) = inner.listeners.get_mut(&id.node) {
            let before = list.len();
            list.retain(|l| l.seq != id.seq);
            removed = list.len() != before;
            entry_empty = list.is_empty();
        }
        if entry_empty {
            inner.listeners.remove(&id.node);
        }
        if !removed {
            log::debug!("off: listener {:?} already gone", id);
        }
    }

    /// Dispatches a synthetic event at `target`, bubbling to the document
    /// root (or to the top of a detached subtree). Returns how many handlers
    /// fired. Handlers run after listener collection, so they may freely
    /// mutate the document.
    pub fn dispatch(&self, target: &Element, kind: &str) -> usize {
        let mut to_fire: Vec<(EventHandler, Event)> = Vec::new();
        {
            let inner = self.inner.borrow();
            if !inner.nodes.contains_key(target.id) {
                return 0;
            }
            let mut path = vec![target.id];
            let mut current = target.id;
            while let Some(parent) = inner.nodes.get(current).and_then(|n| n.parent) {
                path.push(parent);
                current = parent;
            }
            for (i, &node) in path.iter().enumerate() {
                let Some(listeners) = inner.listeners.get(&node) else {
                    continue;
                };
                for listener in listeners {
                    if listener.kind != kind {
                        continue;
                    }
                    match &listener.selector {
                        None => to_fire.push((
                            listener.handler.clone(),
                            self.make_event(kind, target.id, node),
                        )),
                        Some(list) => {
                            // Delegated: fire once per matching node on the
                            // path strictly below the bound node.
                            for &below in &path[..i] {
                                if selector::matches(&inner, below, list) {
                                    to_fire.push((
                                        listener.handler.clone(),
                                        self.make_event(kind, target.id, below),
                                    ));
                                }
                            }
                        }
                    }
                }
            }
        }
        let fired = to_fire.len();
        for (handler, event) in to_fire {
            handler(&event);
        }
        fired
    }

    fn make_event(&self, kind: &str, target: NodeId, current: NodeId) -> Event {
        Event {
            kind: kind.to_string(),
            target: Element {
                doc: self.clone(),
                id: target,
            },
            current: Element {
                doc: self.clone(),
                id: current,
            },
        }
    }

    pub(crate) fn add_listener(
        &self,
        node: NodeId,
        kind: &str,
        selector: Option<SelectorList>,
        handler: EventHandler,
    ) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.listeners.entry(node).or_default().push(Listener {
            seq,
            kind: kind.to_string(),
            selector,
            handler,
        });
        ListenerId { node, seq }
    }

    pub(crate) fn insert_child(&self, parent: NodeId, child: NodeId, at_front: bool) {
        let mut inner = self.inner.borrow_mut();
        if !inner.nodes.contains_key(parent) || !inner.nodes.contains_key(child) {
            log::warn!("insert_child: stale node handle, ignoring");
            return;
        }
        if inner.is_ancestor_of(child, parent) || parent == child {
            log::warn!("insert_child: refusing to create a cycle");
            return;
        }
        inner.detach_node(child);
        if at_front {
            inner.nodes[parent].children.insert(0, child);
        } else {
            inner.nodes[parent].children.push(child);
        }
        inner.nodes[child].parent = Some(parent);
    }

    /// Puts `replacement` where `old` currently sits; `old` leaves the tree
    /// with its bindings purged, but stays in the arena.
    pub(crate) fn replace_node(&self, old: NodeId, replacement: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if !inner.nodes.contains_key(old) || !inner.nodes.contains_key(replacement) {
            log::warn!("replace_node: stale node handle, ignoring");
            return;
        }
        if inner.is_ancestor_of(replacement, old) || old == replacement {
            log::warn!("replace_node: refusing to create a cycle");
            return;
        }
        let Some(parent) = inner.nodes[old].parent else {
            log::warn!("replace_node: target has no parent, ignoring");
            return;
        };
        inner.detach_node(replacement);
        let index = inner.nodes[parent]
            .children
            .iter()
            .position(|&c| c == old)
            .expect("child listed under its parent");
        inner.nodes[parent].children[index] = replacement;
        inner.nodes[replacement].parent = Some(parent);
        inner.nodes[old].parent = None;
        let mut subtree = Vec::new();
        inner.collect_subtree(old, &mut subtree);
        inner.purge_listeners(&subtree);
    }

    /// Detaches a node from its parent, keeping nodes and bindings intact.
    pub(crate) fn detach(&self, node: NodeId) {
        self.inner.borrow_mut().detach_node(node);
    }

    /// Detaches a subtree, purges its bindings and frees its nodes.
    pub(crate) fn remove(&self, node: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if !inner.nodes.contains_key(node) {
            return;
        }
        inner.detach_node(node);
        let mut subtree = Vec::new();
        inner.collect_subtree(node, &mut subtree);
        inner.purge_listeners(&subtree);
        for id in subtree {
            inner.nodes.remove(id);
        }
    }

    /// Replaces the entire contents of `node` with parsed markup. The old
    /// children are detached and their bindings purged — this is the step
    /// that severs event delegation for anything living under `node`.
    pub(crate) fn set_inner_html(&self, node: NodeId, html: &str) -> Result<(), DomError> {
        let parsed = markup::parse_fragment(html)?;
        let mut inner = self.inner.borrow_mut();
        if !inner.nodes.contains_key(node) {
            log::warn!("set_inner_html: stale node handle, ignoring");
            return Ok(());
        }
        let old_children: Vec<NodeId> = inner.nodes[node].children.drain(..).collect();
        let mut severed = Vec::new();
        for child in old_children {
            inner.nodes[child].parent = None;
            inner.collect_subtree(child, &mut severed);
        }
        inner.purge_listeners(&severed);
        for parsed_node in parsed {
            let child = inner.build_parsed(parsed_node);
            inner.nodes[node].children.push(child);
            inner.nodes[child].parent = Some(node);
        }
        Ok(())
    }

    pub(crate) fn query_scoped(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, DomError> {
        let list = selector::parse(selector)?;
        let inner = self.inner.borrow();
        let mut out = Vec::new();
        if inner.nodes.contains_key(scope) {
            inner.walk_matches(scope, &list, &mut out);
        }
        Ok(out)
    }

    pub(crate) fn matches(&self, node: NodeId, sel: &str) -> Result<bool, DomError> {
        let list = selector::parse(sel)?;
        let inner = self.inner.borrow();
        Ok(selector::matches(&inner, node, &list))
    }

    pub(crate) fn is_connected(&self, node: NodeId) -> bool {
        let inner = self.inner.borrow();
        if !inner.nodes.contains_key(node) {
            return false;
        }
        let mut current = node;
        loop {
            if current == inner.root {
                return true;
            }
            match inner.nodes[current].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub(crate) fn with_inner<R>(&self, f: impl FnOnce(&DocInner) -> R) -> R {
        f(&self.inner.borrow())
    }

    pub(crate) fn with_inner_mut<R>(&self, f: impl FnOnce(&mut DocInner) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }
}

impl DocInner {
    fn detach_node(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) else {
            return;
        };
        self.nodes[parent].children.retain(|c| *c != node);
        self.nodes[node].parent = None;
    }

    fn is_ancestor_of(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(a) = current {
            if a == candidate {
                return true;
            }
            current = self.nodes.get(a).and_then(|n| n.parent);
        }
        false
    }

    pub(crate) fn collect_subtree(&self, node: NodeId, out: &mut Vec<NodeId>) {
        out.push(node);
        if let Some(n) = self.nodes.get(node) {
            for &child in &n.children {
                self.collect_subtree(child, out);
            }
        }
    }

    fn purge_listeners(&mut self, nodes: &[NodeId]) {
        for id in nodes {
            self.listeners.remove(id);
        }
    }

    fn build_parsed(&mut self, parsed: ParsedNode) -> NodeId {
        match parsed {
            ParsedNode::Text(text) => self.nodes.insert(Node::text(text)),
            ParsedNode::Element {
                tag,
                attrs,
                children,
            } => {
                let id = self.nodes.insert(Node {
                    data: NodeData::Element { tag, attrs },
                    parent: None,
                    children: smallvec::SmallVec::new(),
                });
                for child_parsed in children {
                    let child = self.build_parsed(child_parsed);
                    self.nodes[id].children.push(child);
                    self.nodes[child].parent = Some(id);
                }
                id
            }
        }
    }

    fn walk_matches(&self, node: NodeId, list: &SelectorList, out: &mut Vec<NodeId>) {
        let Some(n) = self.nodes.get(node) else {
            return;
        };
        for &child in &n.children {
            if self.nodes[child].data.is_element() && selector::matches(self, child, list) {
                out.push(child);
            }
            self.walk_matches(child, list, out);
        }
    }

    pub(crate) fn serialize(&self, node: NodeId, out: &mut String, include_self: bool) {
        let Some(n) = self.nodes.get(node) else {
            return;
        };
        match &n.data {
            NodeData::Text(text) => markup::escape_text(text, out),
            NodeData::Element { tag, attrs } => {
                if include_self {
                    out.push('<');
                    out.push_str(tag);
                    for (name, value) in attrs {
                        out.push(' ');
                        out.push_str(name);
                        out.push_str("=\"");
                        markup::escape_attr(value, out);
                        out.push('"');
                    }
                    out.push('>');
                }
                if !markup::is_void(tag) {
                    for &child in &n.children {
                        self.serialize(child, out, true);
                    }
                    if include_self {
                        out.push_str("</");
                        out.push_str(tag);
                        out.push('>');
                    }
                }
            }
        }
    }

    pub(crate) fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.nodes.get(node) else {
            return;
        };
        match &n.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element { .. } => {
                for &child in &n.children {
                    self.collect_text(child, out);
                }
            }
        }
    }
}
