use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context as _, Result};
use camino::Utf8Path;

use crate::model::Series;

/// What `--export` writes next to the image.
#[derive(Serialize, Debug)]
pub struct SeriesExport<'a> {
    time_unit: Option<&'a str>,
    series: &'a [Series],
}

impl<'a> SeriesExport<'a> {
    pub fn new(time_unit: Option<&'a str>, series: &'a [Series]) -> Self {
        Self { time_unit, series }
    }

    pub fn write(&self, path: &Utf8Path) -> Result<()> {
        let buffer = BufWriter::new(
            File::create(path)
                .with_context(|| format!("creating series export file \"{path}\""))?,
        );
        serde_json::to_writer_pretty(buffer, self).with_context(|| "exporting series".to_string())
    }
}
