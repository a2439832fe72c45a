use slotmap::new_key_type;
use smallvec::SmallVec;

new_key_type! {
    /// Arena key for a node inside a [`Document`](crate::Document).
    pub struct NodeId;
}

/// Payload of a single node: an element with tag and attributes, or a text run.
#[derive(Clone, Debug)]
pub enum NodeData {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

impl NodeData {
    pub fn is_element(&self) -> bool {
        matches!(self, NodeData::Element { .. })
    }
}

pub(crate) struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: SmallVec<[NodeId; 4]>,
}

impl Node {
    pub fn element(tag: impl Into<String>) -> Self {
        Node {
            data: NodeData::Element {
                tag: tag.into(),
                attrs: Vec::new(),
            },
            parent: None,
            children: SmallVec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node {
            data: NodeData::Text(text.into()),
            parent: None,
            children: SmallVec::new(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match &self.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }
}
