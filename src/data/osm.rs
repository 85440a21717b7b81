//! Elements as defined in the .osm file. Attribute values are kept as
//! verbatim text; a database load step downstream is responsible for numeric
//! and date coercion.

#[derive(Debug)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

#[derive(Debug)]
pub struct Node {
    pub id: String,
    pub lat: String,
    pub lon: String,
    pub user: String,
    pub uid: String,
    pub version: String,
    pub changeset: String,
    pub timestamp: String,
    pub tags: Vec<Tag>,
}

#[derive(Debug)]
pub struct Way {
    pub id: String,
    pub user: String,
    pub uid: String,
    pub version: String,
    pub changeset: String,
    pub timestamp: String,
    pub tags: Vec<Tag>,
    /// `nd` child refs in document order.
    pub node_refs: Vec<String>,
}

/// A top-level element. `Other` stands in for element kinds the pipeline does
/// not shape (relations and the like); the shaper yields no record for it.
#[derive(Debug)]
pub enum Element {
    Node(Node),
    Way(Way),
    Other,
}

impl Element {
    pub fn tag_count(&self) -> usize {
        match self {
            Element::Node(node) => node.tags.len(),
            Element::Way(way) => way.tags.len(),
            Element::Other => 0,
        }
    }

    pub fn push_tag(&mut self, tag: Tag) {
        match self {
            Element::Node(node) => node.tags.push(tag),
            Element::Way(way) => way.tags.push(tag),
            Element::Other => (),
        }
    }

    pub fn push_node_ref(&mut self, node_ref: String) {
        if let Element::Way(way) = self {
            way.node_refs.push(node_ref);
        }
    }
}
