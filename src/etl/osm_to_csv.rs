use std::fs::{self, File};
use std::path::Path;

use csv::{Writer, WriterBuilder};
use log::info;
use quick_xml::events::Event;

use crate::clean::phone::PhoneCleaner;
use crate::data::osm::Element;
use crate::data::rows::ShapedRecord;
use crate::errors::Result;
use crate::etl::Etl;
use crate::schema::TableSchemas;
use crate::shape::shape_element;
use crate::source;
use crate::UserConfig;

pub const ETL_NAME: &str = "osm_to_csv";

const NODES_FILE: &str = "nodes.csv";
const NODE_TAGS_FILE: &str = "nodes_tags.csv";
const WAYS_FILE: &str = "ways.csv";
const WAY_NODES_FILE: &str = "ways_nodes.csv";
const WAY_TAGS_FILE: &str = "ways_tags.csv";

const TABLE_FILES: [&str; 5] = [
    NODES_FILE,
    NODE_TAGS_FILE,
    WAYS_FILE,
    WAY_NODES_FILE,
    WAY_TAGS_FILE,
];

const NODE_FIELDS: [&str; 8] = [
    "id", "lat", "lon", "user", "uid", "version", "changeset", "timestamp",
];
const WAY_FIELDS: [&str; 6] = ["id", "user", "uid", "version", "changeset", "timestamp"];
const TAG_FIELDS: [&str; 4] = ["id", "key", "value", "type"];
const WAY_NODE_FIELDS: [&str; 3] = ["id", "node_id", "position"];

/// The five output tables, opened once for the whole run. Each starts with a
/// header row; after that rows are appended in parse order.
pub struct CsvSink {
    nodes: Writer<File>,
    node_tags: Writer<File>,
    ways: Writer<File>,
    way_nodes: Writer<File>,
    way_tags: Writer<File>,
}

impl CsvSink {
    pub fn create(dir: &Path) -> Result<CsvSink> {
        let mut sink = CsvSink {
            nodes: Self::open_table(dir, NODES_FILE)?,
            node_tags: Self::open_table(dir, NODE_TAGS_FILE)?,
            ways: Self::open_table(dir, WAYS_FILE)?,
            way_nodes: Self::open_table(dir, WAY_NODES_FILE)?,
            way_tags: Self::open_table(dir, WAY_TAGS_FILE)?,
        };
        sink.nodes.write_record(NODE_FIELDS)?;
        sink.node_tags.write_record(TAG_FIELDS)?;
        sink.ways.write_record(WAY_FIELDS)?;
        sink.way_nodes.write_record(WAY_NODE_FIELDS)?;
        sink.way_tags.write_record(TAG_FIELDS)?;
        Ok(sink)
    }

    fn open_table(dir: &Path, file_name: &str) -> Result<Writer<File>> {
        // Headers are written explicitly above so that even empty tables get
        // one; serde-driven header emission only fires on the first row.
        Ok(WriterBuilder::new()
            .has_headers(false)
            .from_path(dir.join(file_name))?)
    }

    pub fn write_record(&mut self, record: &ShapedRecord) -> Result<()> {
        match record {
            ShapedRecord::Node { node, tags } => {
                self.nodes.serialize(node)?;
                for tag in tags {
                    self.node_tags.serialize(tag)?;
                }
            }
            ShapedRecord::Way { way, tags, way_nodes } => {
                self.ways.serialize(way)?;
                for tag in tags {
                    self.way_tags.serialize(tag)?;
                }
                for way_node in way_nodes {
                    self.way_nodes.serialize(way_node)?;
                }
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.nodes.flush()?;
        self.node_tags.flush()?;
        self.ways.flush()?;
        self.way_nodes.flush()?;
        self.way_tags.flush()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub nodes: u64,
    pub ways: u64,
    pub tag_rows: u64,
    pub way_node_rows: u64,
    pub dropped_tags: u64,
    pub skipped_elements: u64,
}

pub struct OsmToCsvEtl<'a> {
    config: &'a UserConfig,
}

impl OsmToCsvEtl<'_> {
    pub fn new(config: &UserConfig) -> OsmToCsvEtl {
        OsmToCsvEtl { config }
    }
}

/// Shape one fully-closed element, validate it if requested, and append its
/// rows to the sink.
fn consume(
    element: &Element,
    phones: &PhoneCleaner,
    schemas: Option<&TableSchemas>,
    sink: &mut CsvSink,
    summary: &mut RunSummary,
) -> Result<()> {
    let source_tags = element.tag_count() as u64;
    let Some(record) = shape_element(element, phones) else {
        summary.skipped_elements += 1;
        return Ok(());
    };
    if let Some(schemas) = schemas {
        schemas.check(&record)?;
    }
    match &record {
        ShapedRecord::Node { tags, .. } => {
            summary.nodes += 1;
            summary.tag_rows += tags.len() as u64;
            summary.dropped_tags += source_tags - tags.len() as u64;
        }
        ShapedRecord::Way { tags, way_nodes, .. } => {
            summary.ways += 1;
            summary.tag_rows += tags.len() as u64;
            summary.way_node_rows += way_nodes.len() as u64;
            summary.dropped_tags += source_tags - tags.len() as u64;
        }
    }
    sink.write_record(&record)
}

impl Etl for OsmToCsvEtl<'_> {
    type Input = CsvSink;
    type Output = RunSummary;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn is_cached(&self, dir: &Path) -> Result<bool> {
        Ok(TABLE_FILES.iter().all(|file_name| dir.join(file_name).exists()))
    }

    fn clean(&self, dir: &Path) -> Result<()> {
        for file_name in TABLE_FILES {
            let path = dir.join(file_name);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn extract(&mut self, dir: &Path) -> Result<Self::Input> {
        CsvSink::create(dir)
    }

    fn transform(&mut self, mut sink: Self::Input) -> Result<Self::Output> {
        let schemas = if self.config.validate {
            Some(TableSchemas::compile()?)
        } else {
            None
        };
        let phones = PhoneCleaner::new();

        let mut reader = source::open_osm_reader(&self.config.data_path)?;
        let mut buf = Vec::new();
        let mut skip_buf = Vec::new();
        let mut summary = RunSummary::default();

        // One element subtree in flight at a time; everything outside node,
        // way and relation is skipped without side effects. `depth` tells
        // top-level elements apart from children of an open subtree.
        let mut pending: Option<Element> = None;
        let mut depth: usize = 0;

        loop {
            match reader.read_event_into(&mut buf) {
                Err(e) => return Err(e.into()),
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) => {
                    match e.name().as_ref() {
                        b"node" => pending = Some(Element::Node(source::parse_node(&e)?)),
                        b"way" => pending = Some(Element::Way(source::parse_way(&e)?)),
                        b"relation" => pending = Some(Element::Other),
                        b"tag" => {
                            if let Some(element) = pending.as_mut() {
                                element.push_tag(source::parse_tag(&e)?);
                            }
                        }
                        b"nd" => {
                            if let Some(element) = pending.as_mut() {
                                element.push_node_ref(source::parse_node_ref(&e)?);
                            }
                        }
                        // The root container or an unknown top-level kind.
                        _ if depth <= 1 => pending = None,
                        // An unknown subtree inside an open element is
                        // consumed wholesale so it cannot disturb the
                        // element being built.
                        _ => {
                            reader.read_to_end_into(e.name(), &mut skip_buf)?;
                            skip_buf.clear();
                            buf.clear();
                            continue;
                        }
                    }
                    depth += 1;
                }
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"node" => {
                        let element = Element::Node(source::parse_node(&e)?);
                        consume(&element, &phones, schemas.as_ref(), &mut sink, &mut summary)?;
                    }
                    b"way" => {
                        let element = Element::Way(source::parse_way(&e)?);
                        consume(&element, &phones, schemas.as_ref(), &mut sink, &mut summary)?;
                    }
                    b"relation" => {
                        consume(&Element::Other, &phones, schemas.as_ref(), &mut sink, &mut summary)?;
                    }
                    b"tag" => {
                        if let Some(element) = pending.as_mut() {
                            element.push_tag(source::parse_tag(&e)?);
                        }
                    }
                    b"nd" => {
                        if let Some(element) = pending.as_mut() {
                            element.push_node_ref(source::parse_node_ref(&e)?);
                        }
                    }
                    _ => (),
                },
                Ok(Event::End(e)) => {
                    depth = depth.saturating_sub(1);
                    match e.name().as_ref() {
                        b"node" | b"way" | b"relation" => {
                            if let Some(element) = pending.take() {
                                consume(&element, &phones, schemas.as_ref(), &mut sink, &mut summary)?;
                            }
                        }
                        _ => (),
                    }
                }
                // Overpass extracts carry a <note> header; its text is of no
                // interest here.
                Ok(_) => (),
            }
            // The event buffer holds at most one element subtree; clearing it
            // each round keeps memory use flat on multi-gigabyte extracts.
            buf.clear();
        }

        sink.flush()?;
        Ok(summary)
    }

    fn load(&mut self, _dir: &Path, output: Self::Output) -> Result<()> {
        info!(
            etl_name = ETL_NAME,
            nodes = output.nodes,
            ways = output.ways,
            tag_rows = output.tag_rows,
            way_node_rows = output.way_node_rows,
            dropped_tags = output.dropped_tags,
            skipped_elements = output.skipped_elements;
            "Wrote CSV tables"
        );
        Ok(())
    }
}
