//! Flat output rows. Field order matches the column order of the CSV tables
//! and the eventual SQL tables, so these serialize straight into the writers.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct NodeRow {
    pub id: String,
    pub lat: String,
    pub lon: String,
    pub user: String,
    pub uid: String,
    pub version: String,
    pub changeset: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct WayRow {
    pub id: String,
    pub user: String,
    pub uid: String,
    pub version: String,
    pub changeset: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct TagRow {
    pub id: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub tag_type: String,
}

#[derive(Debug, Serialize)]
pub struct WayNodeRow {
    pub id: String,
    pub node_id: String,
    /// Zero-based index of the `nd` ref within its way, never re-sorted.
    pub position: usize,
}

/// Everything the shaper produces for one element.
#[derive(Debug)]
pub enum ShapedRecord {
    Node {
        node: NodeRow,
        tags: Vec<TagRow>,
    },
    Way {
        way: WayRow,
        tags: Vec<TagRow>,
        way_nodes: Vec<WayNodeRow>,
    },
}
