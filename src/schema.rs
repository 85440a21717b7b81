use jsonschema::JSONSchema;
use serde::Serialize;
use serde_json::Value;

use crate::data::rows::ShapedRecord;
use crate::errors::{Error, Result};

const NODES_SCHEMA: &str = include_str!("../schemas/nodes.json");
const WAYS_SCHEMA: &str = include_str!("../schemas/ways.json");
const TAGS_SCHEMA: &str = include_str!("../schemas/tags.json");
const WAY_NODES_SCHEMA: &str = include_str!("../schemas/way_nodes.json");

/// Compiled per-table schemas. Both tag tables share one schema; the table
/// name is only needed for error reporting.
pub struct TableSchemas {
    nodes: JSONSchema,
    ways: JSONSchema,
    tags: JSONSchema,
    way_nodes: JSONSchema,
}

impl TableSchemas {
    pub fn compile() -> Result<TableSchemas> {
        Ok(TableSchemas {
            nodes: compile_schema("nodes", NODES_SCHEMA)?,
            ways: compile_schema("ways", WAYS_SCHEMA)?,
            tags: compile_schema("tags", TAGS_SCHEMA)?,
            way_nodes: compile_schema("way_nodes", WAY_NODES_SCHEMA)?,
        })
    }

    /// Check every row of a shaped record. The first offending row fails the
    /// whole run; the error names the table and field.
    pub fn check(&self, record: &ShapedRecord) -> Result<()> {
        match record {
            ShapedRecord::Node { node, tags } => {
                check_row("nodes", &self.nodes, node)?;
                for tag in tags {
                    check_row("nodes_tags", &self.tags, tag)?;
                }
            }
            ShapedRecord::Way { way, tags, way_nodes } => {
                check_row("ways", &self.ways, way)?;
                for tag in tags {
                    check_row("ways_tags", &self.tags, tag)?;
                }
                for way_node in way_nodes {
                    check_row("ways_nodes", &self.way_nodes, way_node)?;
                }
            }
        }
        Ok(())
    }
}

fn compile_schema(name: &str, raw: &str) -> Result<JSONSchema> {
    let schema: Value = serde_json::from_str(raw)?;
    // jsonschema borrows the schema document for as long as the compiled
    // schema lives, so it is leaked once per run.
    let schema: &'static Value = Box::leak(Box::new(schema));
    JSONSchema::options()
        .compile(schema)
        .map_err(|err| Error::from(format!("Could not compile schema '{}': {}", name, err)))
}

fn check_row<T: Serialize>(table: &str, schema: &JSONSchema, row: &T) -> Result<()> {
    let value = serde_json::to_value(row)?;
    if let Err(errors) = schema.validate(&value) {
        for error in errors {
            return Err(format!(
                "Validation failed for table '{}', field '{}': {}",
                table, error.instance_path, error
            )
            .into());
        }
    }
    Ok(())
}
