use std::rc::Rc;

use crate::element::Element;
use crate::node::NodeId;
use crate::selector::SelectorList;

/// A synthetic event delivered to listeners during [`Document::dispatch`](crate::Document::dispatch).
#[derive(Clone)]
pub struct Event {
    /// Event name, e.g. `"click"`.
    pub kind: String,
    /// The node the event was dispatched on.
    pub target: Element,
    /// The node the running listener considers its subject: the bound node
    /// for direct listeners, the matched descendant for delegated ones.
    pub current: Element,
}

pub type EventHandler = Rc<dyn Fn(&Event)>;

/// Identifies one bound listener. Returned by [`Element::on`](crate::Element::on)
/// and accepted by [`Document::off`](crate::Document::off). Stays valid until the
/// listener is removed or its node's bindings are purged by a content
/// replacement; `off` on a purged id is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId {
    pub(crate) node: NodeId,
    pub(crate) seq: u64,
}

pub(crate) struct Listener {
    pub seq: u64,
    pub kind: String,
    pub selector: Option<SelectorList>,
    pub handler: EventHandler,
}
