use crate::clean::keys::classify;
use crate::clean::phone::PhoneCleaner;
use crate::clean::url::normalize_url;
use crate::data::osm::{Element, Tag};
use crate::data::rows::{NodeRow, ShapedRecord, TagRow, WayNodeRow, WayRow};

/// Reshape one parsed element into flat rows. Yields nothing for element kinds
/// the pipeline does not load.
pub fn shape_element(element: &Element, phones: &PhoneCleaner) -> Option<ShapedRecord> {
    match element {
        Element::Node(node) => Some(ShapedRecord::Node {
            node: NodeRow {
                id: node.id.clone(),
                lat: node.lat.clone(),
                lon: node.lon.clone(),
                user: node.user.clone(),
                uid: node.uid.clone(),
                version: node.version.clone(),
                changeset: node.changeset.clone(),
                timestamp: node.timestamp.clone(),
            },
            tags: shape_tags(&node.id, &node.tags, phones),
        }),
        Element::Way(way) => Some(ShapedRecord::Way {
            way: WayRow {
                id: way.id.clone(),
                user: way.user.clone(),
                uid: way.uid.clone(),
                version: way.version.clone(),
                changeset: way.changeset.clone(),
                timestamp: way.timestamp.clone(),
            },
            tags: shape_tags(&way.id, &way.tags, phones),
            way_nodes: way
                .node_refs
                .iter()
                .enumerate()
                .map(|(position, node_ref)| WayNodeRow {
                    id: way.id.clone(),
                    node_id: node_ref.clone(),
                    position,
                })
                .collect(),
        }),
        Element::Other => None,
    }
}

/// Secondary tags are handled the same way for node and way elements: keys
/// with problem characters are dropped, phone and url values are run through
/// their cleaners, everything else is copied verbatim.
fn shape_tags(id: &str, tags: &[Tag], phones: &PhoneCleaner) -> Vec<TagRow> {
    let mut rows = Vec::new();
    for tag in tags {
        let classified = classify(&tag.key);
        if classified.problematic {
            continue;
        }
        let value = match tag.key.as_str() {
            "phone" => phones.normalize(&tag.value),
            // No candidate means the value is left as it was.
            "url" => normalize_url(&tag.value).unwrap_or_else(|| tag.value.clone()),
            _ => tag.value.clone(),
        };
        rows.push(TagRow {
            id: id.to_string(),
            key: classified.key,
            value,
            tag_type: classified.tag_type,
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::osm::{Node, Way};

    fn tag(key: &str, value: &str) -> Tag {
        Tag {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn sample_node() -> Node {
        Node {
            id: "757860928".to_string(),
            lat: "41.9747374".to_string(),
            lon: "-87.6920102".to_string(),
            user: "uboot".to_string(),
            uid: "26299".to_string(),
            version: "2".to_string(),
            changeset: "5288876".to_string(),
            timestamp: "2010-07-22T16:16:51Z".to_string(),
            tags: vec![
                tag("amenity", "fast_food"),
                tag("cuisine", "sausage"),
                tag("name", "Shelly's Tasty Freeze"),
            ],
        }
    }

    #[test]
    fn node_is_shaped_into_entity_and_tag_rows() {
        let phones = PhoneCleaner::new();
        let shaped = shape_element(&Element::Node(sample_node()), &phones).unwrap();
        match shaped {
            ShapedRecord::Node { node, tags } => {
                assert_eq!(node.id, "757860928");
                assert_eq!(node.lat, "41.9747374");
                assert_eq!(node.lon, "-87.6920102");
                assert_eq!(tags.len(), 3);
                // Apostrophes are only a problem in keys, never in values.
                assert_eq!(tags[2].key, "name");
                assert_eq!(tags[2].value, "Shelly's Tasty Freeze");
                assert!(tags.iter().all(|row| row.id == "757860928"));
                assert!(tags.iter().all(|row| row.tag_type == "regular"));
            }
            other => panic!("expected a node record, got {:?}", other),
        }
    }

    #[test]
    fn problematic_keys_are_dropped() {
        let phones = PhoneCleaner::new();
        let mut node = sample_node();
        node.tags.push(tag("drink.coffee", "yes"));
        node.tags.push(tag("payment cash", "yes"));
        let shaped = shape_element(&Element::Node(node), &phones).unwrap();
        match shaped {
            ShapedRecord::Node { tags, .. } => {
                assert_eq!(tags.len(), 3);
                assert!(tags.iter().all(|row| row.key != "drink.coffee"));
            }
            other => panic!("expected a node record, got {:?}", other),
        }
    }

    #[test]
    fn colon_keys_are_split_into_type_and_key() {
        let phones = PhoneCleaner::new();
        let mut node = sample_node();
        node.tags = vec![tag("addr:street:name", "Lincoln")];
        let shaped = shape_element(&Element::Node(node), &phones).unwrap();
        match shaped {
            ShapedRecord::Node { tags, .. } => {
                assert_eq!(tags[0].tag_type, "addr");
                assert_eq!(tags[0].key, "street:name");
                assert_eq!(tags[0].value, "Lincoln");
            }
            other => panic!("expected a node record, got {:?}", other),
        }
    }

    #[test]
    fn phone_and_url_values_are_cleaned() {
        let phones = PhoneCleaner::new();
        let mut node = sample_node();
        node.tags = vec![
            tag("phone", "+4991112345"),
            tag("url", "example.com"),
            tag("website", "example.com"),
        ];
        let shaped = shape_element(&Element::Node(node), &phones).unwrap();
        match shaped {
            ShapedRecord::Node { tags, .. } => {
                assert_eq!(tags[0].value, "+49 911 12345");
                assert_eq!(tags[1].value, "http://www.example.com");
                // Only the two audited keys are cleaned.
                assert_eq!(tags[2].value, "example.com");
            }
            other => panic!("expected a node record, got {:?}", other),
        }
    }

    #[test]
    fn url_without_candidate_keeps_original_value() {
        let phones = PhoneCleaner::new();
        let mut node = sample_node();
        node.tags = vec![tag("url", "http://example.com")];
        let shaped = shape_element(&Element::Node(node), &phones).unwrap();
        match shaped {
            ShapedRecord::Node { tags, .. } => {
                assert_eq!(tags[0].value, "http://example.com");
            }
            other => panic!("expected a node record, got {:?}", other),
        }
    }

    #[test]
    fn way_node_positions_follow_document_order() {
        let phones = PhoneCleaner::new();
        let way = Way {
            id: "209809850".to_string(),
            user: "chicago-buildings".to_string(),
            uid: "674454".to_string(),
            version: "1".to_string(),
            changeset: "15353317".to_string(),
            timestamp: "2013-03-13T15:58:04Z".to_string(),
            tags: vec![tag("building", "yes")],
            node_refs: vec![
                "2199822281".to_string(),
                "2199822390".to_string(),
                "2199822392".to_string(),
            ],
        };
        let shaped = shape_element(&Element::Way(way), &phones).unwrap();
        match shaped {
            ShapedRecord::Way { way, tags, way_nodes } => {
                assert_eq!(way.id, "209809850");
                assert_eq!(tags.len(), 1);
                let positions: Vec<usize> =
                    way_nodes.iter().map(|row| row.position).collect();
                assert_eq!(positions, vec![0, 1, 2]);
                assert_eq!(way_nodes[1].node_id, "2199822390");
                assert!(way_nodes.iter().all(|row| row.id == "209809850"));
            }
            other => panic!("expected a way record, got {:?}", other),
        }
    }

    #[test]
    fn other_element_kinds_yield_no_record() {
        let phones = PhoneCleaner::new();
        assert!(shape_element(&Element::Other, &phones).is_none());
    }
}
