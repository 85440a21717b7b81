use log::info;
use quick_xml::events::Event;

use crate::clean::phone::PhoneCleaner;
use crate::clean::url;
use crate::data::osm::Tag;
use crate::errors::Result;
use crate::source;
use crate::UserConfig;

/// Read-only pass over every `tag` element: print phone and url values that
/// fail their acceptance checks, together with the cleaner's candidate, so
/// the normalization rules can be reviewed before a real run. Nothing is
/// written.
pub fn run(config: &UserConfig) -> Result<()> {
    info!(data_path = config.data_path.as_str(); "Auditing phone and url tags");

    let phones = PhoneCleaner::new();
    let mut reader = source::open_osm_reader(&config.data_path)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Err(e) => return Err(e.into()),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"tag" {
                    report(&source::parse_tag(&e)?, &phones);
                }
            }
            Ok(_) => (),
        }
        buf.clear();
    }
    Ok(())
}

fn report(tag: &Tag, phones: &PhoneCleaner) {
    match tag.key.as_str() {
        "phone" if !phones.is_well_formed(&tag.value) => {
            let cleaned = phones.normalize(&tag.value);
            println!(
                "phone: {:?} -> {:?} (well-formed: {})",
                tag.value,
                cleaned,
                phones.is_well_formed(&cleaned)
            );
        }
        "url" if !url::is_well_formed(&tag.value) => match url::normalize_url(&tag.value) {
            Some(cleaned) => println!(
                "url: {:?} -> {:?} (well-formed: {})",
                tag.value,
                cleaned,
                url::is_well_formed(&cleaned)
            ),
            None => println!("url: {:?} -> no candidate", tag.value),
        },
        _ => (),
    }
}
