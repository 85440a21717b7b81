mod audit;
mod clean;
mod data;
mod errors;
mod etl;
mod schema;
mod shape;
mod source;

use std::fs::{create_dir_all, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use crate::errors::Result;
use crate::etl::osm_to_csv::OsmToCsvEtl;
use crate::etl::Etl;

const CONFIG_PATH: &str = "config/osm2csv.json";

#[derive(Deserialize)]
pub struct UserConfig {
    /// Path to the .osm source document; a .xz suffix enables decompression.
    pub data_path: String,
    /// Check every shaped record against the table schemas. Roughly an order
    /// of magnitude slower; consider a small sample when enabled.
    pub validate: bool,
    /// Print non-conforming phone/url values instead of writing tables.
    #[serde(default)]
    pub audit: bool,
}

fn load_user_config(path: &str) -> UserConfig {
    let file = File::open(path).expect("Could not open config file.");
    serde_json::from_reader(file).expect("Could not parse config.")
}

fn create_output_dir(config: &UserConfig) -> Result<PathBuf> {
    let input_fname = Path::new(&config.data_path)
        .file_name()
        .ok_or("Could not get input file name")?;
    let output_dir = Path::new("output").join(input_fname);
    create_dir_all(&output_dir)?;
    Ok(output_dir)
}

fn setup_logging() {
    Builder::with_level("info")
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn main() -> Result<()> {
    setup_logging();

    let user_config = load_user_config(CONFIG_PATH);
    if user_config.audit {
        return audit::run(&user_config);
    }

    let output_dir = create_output_dir(&user_config)?;
    let mut etl = OsmToCsvEtl::new(&user_config);
    etl.process(&output_dir)
}
