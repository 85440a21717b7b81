use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::BytesStart;
use quick_xml::reader::Reader;
use xz::bufread::XzDecoder;

use crate::data::osm::{Node, Tag, Way};
use crate::errors::Result;

/// Open the source document as a forward-only streaming reader. Extracts are
/// often shipped xz-compressed; a `.xz` path is decompressed transparently.
pub fn open_osm_reader(path: &str) -> Result<Reader<Box<dyn BufRead>>> {
    let file = fs::File::open(Path::new(path))?;
    let file_reader = BufReader::new(file);

    let buf_read: Box<dyn BufRead> = if path.ends_with(".xz") {
        Box::new(BufReader::new(XzDecoder::new(file_reader)))
    } else {
        Box::new(file_reader)
    };

    let mut reader = Reader::from_reader(buf_read);
    reader.trim_text(true);
    Ok(reader)
}

pub fn parse_node(el: &BytesStart) -> Result<Node> {
    let mut id: Option<String> = None;
    let mut lat: Option<String> = None;
    let mut lon: Option<String> = None;
    let mut user: Option<String> = None;
    let mut uid: Option<String> = None;
    let mut version: Option<String> = None;
    let mut changeset: Option<String> = None;
    let mut timestamp: Option<String> = None;

    for attribute_res in el.attributes() {
        let attribute = attribute_res?;
        let value = attribute.unescape_value()?.into_owned();
        match attribute.key.as_ref() {
            b"id" => id = Some(value),
            b"lat" => lat = Some(value),
            b"lon" => lon = Some(value),
            b"user" => user = Some(value),
            b"uid" => uid = Some(value),
            b"version" => version = Some(value),
            b"changeset" => changeset = Some(value),
            b"timestamp" => timestamp = Some(value),
            _ => (),
        }
    }

    Ok(Node {
        id: id.ok_or("node element is missing the 'id' attribute")?,
        lat: lat.ok_or("node element is missing the 'lat' attribute")?,
        lon: lon.ok_or("node element is missing the 'lon' attribute")?,
        user: user.ok_or("node element is missing the 'user' attribute")?,
        uid: uid.ok_or("node element is missing the 'uid' attribute")?,
        version: version.ok_or("node element is missing the 'version' attribute")?,
        changeset: changeset.ok_or("node element is missing the 'changeset' attribute")?,
        timestamp: timestamp.ok_or("node element is missing the 'timestamp' attribute")?,
        tags: Vec::new(),
    })
}

pub fn parse_way(el: &BytesStart) -> Result<Way> {
    let mut id: Option<String> = None;
    let mut user: Option<String> = None;
    let mut uid: Option<String> = None;
    let mut version: Option<String> = None;
    let mut changeset: Option<String> = None;
    let mut timestamp: Option<String> = None;

    for attribute_res in el.attributes() {
        let attribute = attribute_res?;
        let value = attribute.unescape_value()?.into_owned();
        match attribute.key.as_ref() {
            b"id" => id = Some(value),
            b"user" => user = Some(value),
            b"uid" => uid = Some(value),
            b"version" => version = Some(value),
            b"changeset" => changeset = Some(value),
            b"timestamp" => timestamp = Some(value),
            _ => (),
        }
    }

    Ok(Way {
        id: id.ok_or("way element is missing the 'id' attribute")?,
        user: user.ok_or("way element is missing the 'user' attribute")?,
        uid: uid.ok_or("way element is missing the 'uid' attribute")?,
        version: version.ok_or("way element is missing the 'version' attribute")?,
        changeset: changeset.ok_or("way element is missing the 'changeset' attribute")?,
        timestamp: timestamp.ok_or("way element is missing the 'timestamp' attribute")?,
        tags: Vec::new(),
        node_refs: Vec::new(),
    })
}

pub fn parse_tag(el: &BytesStart) -> Result<Tag> {
    let mut key: Option<String> = None;
    let mut value: Option<String> = None;

    for attribute_res in el.attributes() {
        let attribute = attribute_res?;
        match attribute.key.as_ref() {
            b"k" => key = Some(attribute.unescape_value()?.into_owned()),
            b"v" => value = Some(attribute.unescape_value()?.into_owned()),
            _ => (),
        }
    }

    Ok(Tag {
        key: key.ok_or("tag element is missing the 'k' attribute")?,
        value: value.ok_or("tag element is missing the 'v' attribute")?,
    })
}

pub fn parse_node_ref(el: &BytesStart) -> Result<String> {
    for attribute_res in el.attributes() {
        let attribute = attribute_res?;
        if attribute.key.as_ref() == b"ref" {
            return Ok(attribute.unescape_value()?.into_owned());
        }
    }
    Err("nd element is missing the 'ref' attribute".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use std::io::Write;

    #[test]
    fn xml_escapes_in_attribute_values_are_resolved() {
        let mut reader = quick_xml::Reader::from_str(
            r#"<tag k="name" v="Caf&#233; &amp; Bar"/>"#,
        );
        match reader.read_event().unwrap() {
            Event::Empty(el) => {
                let tag = parse_tag(&el).unwrap();
                assert_eq!(tag.key, "name");
                assert_eq!(tag.value, "Café & Bar");
            }
            other => panic!("expected an empty tag element, got {:?}", other),
        }
    }

    #[test]
    fn missing_required_attribute_is_an_error() {
        let mut reader = quick_xml::Reader::from_str(r#"<nd role="outer"/>"#);
        match reader.read_event().unwrap() {
            Event::Empty(el) => {
                let err = parse_node_ref(&el).unwrap_err();
                assert!(err.message.contains("ref"));
            }
            other => panic!("expected an empty nd element, got {:?}", other),
        }
    }

    #[test]
    fn plain_files_are_readable_without_decompression() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"<osm><node id="1" lat="0" lon="0"/></osm>"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let mut reader = open_osm_reader(&path).unwrap();
        let mut buf = Vec::new();
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Start(el) => assert_eq!(el.name().as_ref(), b"osm"),
            other => panic!("expected the osm start element, got {:?}", other),
        }
    }
}
