//! Rendering of grouped series into a raster image

use std::ops::Range;

use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexSet;
use itertools::{Itertools, MinMaxResult};
use plotters::prelude::*;
use thiserror::Error;

use crate::model::Series;

/// 15x10 inches at 100 dpi.
const CANVAS_SIZE: (u32, u32) = (1500, 1000);
const MARGIN: u32 = 20;
const X_LABEL_AREA_SIZE: u32 = 70;
const Y_LABEL_AREA_SIZE: u32 = 100;

const TITLE_FONT_SIZE: u32 = 30;
const AXIS_DESC_FONT_SIZE: u32 = 16;
const LEGEND_FONT_SIZE: u32 = 16;
const LINE_WIDTH: u32 = 2;

/// Relative headroom above and below the data on the y axis.
const Y_MARGIN: f64 = 0.05;

pub const DEFAULT_EXTENSION: &str = "png";
const SUPPORTED_EXTENSIONS: &[&str] = &["png", "bmp", "jpg", "jpeg"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlotError {
    #[error("unsupported image format \"{extension}\" for \"{path}\" (use png, bmp, jpg or jpeg)")]
    UnsupportedFormat {
        path: Utf8PathBuf,
        extension: String,
    },
}

#[derive(Builder, Debug)]
#[builder(setter(into))]
pub struct PlotOptions {
    title: String,
    x_label: String,
    #[builder(default)]
    time_unit: Option<String>,
    output: Utf8PathBuf,
}

impl PlotOptions {
    fn y_label(&self) -> String {
        match &self.time_unit {
            Some(unit) => format!("time in {unit}"),
            None => "time".to_string(),
        }
    }
}

/// Picks the image file that will actually be written.
///
/// Like matplotlib's `savefig`, a path without extension gets `.png`.
pub fn resolve_output(path: &Utf8Path) -> Result<Utf8PathBuf, PlotError> {
    match path.extension() {
        None => Ok(path.with_extension(DEFAULT_EXTENSION)),
        Some(extension) if SUPPORTED_EXTENSIONS.contains(&extension.to_lowercase().as_str()) => {
            Ok(path.to_owned())
        }
        Some(extension) => Err(PlotError::UnsupportedFormat {
            path: path.to_owned(),
            extension: extension.to_string(),
        }),
    }
}

/// Distinct data sizes in order of first appearance, one x slot each.
fn categories(series: &[Series]) -> IndexSet<&str> {
    series
        .iter()
        .flat_map(|series| series.data_sizes().iter().map(String::as_str))
        .collect()
}

fn y_range(series: &[Series]) -> Range<f64> {
    let times = series
        .iter()
        .flat_map(|series| series.real_times().iter().copied());

    let (min, max) = match times.minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => (0.0, 1.0),
        MinMaxResult::OneElement(value) => (value, value),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    let span = max - min;
    let pad = if span > 0.0 {
        span * Y_MARGIN
    } else {
        (max.abs() * Y_MARGIN).max(1.0)
    };

    (min - pad)..(max + pad)
}

/// Draws every series as one line onto a single figure and writes it.
///
/// Returns the path of the written image.
pub fn render(series: &[Series], options: &PlotOptions) -> Result<Utf8PathBuf> {
    let output = resolve_output(&options.output)?;
    draw(series, options, &output)?;

    Ok(output)
}

/// The bitmap backend borrows `output` until the drawing area is dropped.
fn draw(series: &[Series], options: &PlotOptions, output: &Utf8Path) -> Result<()> {
    let categories = categories(series);
    let slots = categories.len() as u32;

    let root = BitMapBackend::new(output, CANVAS_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&options.title, ("sans-serif", TITLE_FONT_SIZE))
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA_SIZE)
        .y_label_area_size(Y_LABEL_AREA_SIZE)
        .build_cartesian_2d((0..slots).into_segmented(), y_range(series))?;

    let x_label_formatter = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(slot) => categories
            .get_index(*slot as usize)
            .map(|label| label.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(categories.len() + 1)
        .x_label_formatter(&x_label_formatter)
        .x_desc(options.x_label.as_str())
        .y_desc(options.y_label())
        .axis_desc_style(("sans-serif", AXIS_DESC_FONT_SIZE))
        .draw()?;

    for (idx, line) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points = line.points().filter_map(|(data_size, real_time)| {
            categories
                .get_index_of(data_size)
                .map(|slot| (SegmentValue::CenterOf(slot as u32), real_time))
        });

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(LINE_WIDTH)))?
            .label(line.name())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .background_style(WHITE.mix(0.0))
        .border_style(WHITE.mix(0.0))
        .draw()?;

    root.present()
        .with_context(|| format!("writing plot to \"{output}\""))?;

    Ok(())
}
