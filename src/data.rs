//! Loading of google-benchmark JSON output

use std::fs::read_to_string;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::{error::Category, Value};
use thiserror::Error;

use crate::model::{BenchmarkRecord, DataSize};

/// Name suffix google-benchmark gives the mean of repeated runs.
pub const MEAN_SUFFIX: &str = "_mean";

/// Length of the `BM_` prefix of benchmark function names, in characters.
const NAME_PREFIX_LEN: usize = 3;

pub const DEFAULT_TITLE: &str = "Run Time";
pub const DEFAULT_MEAN_TITLE: &str = "Run Time Mean";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read \"{path}\"")]
    FileAccess {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("\"{path}\" is not valid JSON")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected content in \"{path}\": {reason}")]
    Schema { path: Utf8PathBuf, reason: String },
    #[error("no benchmark records in \"{path}\"")]
    EmptyInput { path: Utf8PathBuf },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BenchmarkKind {
    /// every record as written by the harness
    #[default]
    Simple,
    /// only the pre-aggregated `_mean` records
    CentralTendency,
}

impl BenchmarkKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BenchmarkKind::Simple => "simple",
            BenchmarkKind::CentralTendency => "central_tendency",
        }
    }

    /// Mean plots get their own title unless the user picked one.
    pub fn resolve_title<'a>(&self, title: &'a str) -> &'a str {
        match self {
            BenchmarkKind::CentralTendency if title == DEFAULT_TITLE => DEFAULT_MEAN_TITLE,
            _ => title,
        }
    }
}

impl std::fmt::Display for BenchmarkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loader output: the records to group plus the unit of their `real_time`.
#[derive(Debug)]
pub struct Benchmarks {
    pub records: Vec<BenchmarkRecord>,
    pub time_unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BenchmarkFile {
    benchmarks: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    name: String,
    /// absent on complexity aggregates (`_BigO`, `_RMS`)
    real_time: Option<f64>,
    data_size: Option<DataSize>,
    #[serde(flatten)]
    extra: IndexMap<String, Value>,
}

pub fn load(path: &Utf8Path, kind: BenchmarkKind) -> Result<Benchmarks, LoadError> {
    let text = read_to_string(path).map_err(|source| LoadError::FileAccess {
        path: path.to_owned(),
        source,
    })?;

    parse(&text, path, kind)
}

/// Parses already-read file content. `path` is only used for error messages.
pub fn parse(text: &str, path: &Utf8Path, kind: BenchmarkKind) -> Result<Benchmarks, LoadError> {
    let schema_error = |reason: String| LoadError::Schema {
        path: path.to_owned(),
        reason,
    };

    // serde_json tells syntax problems apart from well-formed JSON of the wrong shape
    let file: BenchmarkFile =
        serde_json::from_str(text).map_err(|source| match source.classify() {
            Category::Data => schema_error(source.to_string()),
            _ => LoadError::Parse {
                path: path.to_owned(),
                source,
            },
        })?;

    let Some(first) = file.benchmarks.first() else {
        return Err(LoadError::EmptyInput {
            path: path.to_owned(),
        });
    };

    let time_unit = match first.extra.get("time_unit") {
        Some(Value::String(unit)) => Some(unit.clone()),
        Some(other) => {
            return Err(schema_error(format!(
                "`time_unit` must be a string, got `{other}`"
            )))
        }
        None => None,
    };

    let records = match kind {
        BenchmarkKind::Simple => simple_records(file.benchmarks).map_err(schema_error)?,
        BenchmarkKind::CentralTendency => {
            if time_unit.is_none() {
                return Err(schema_error(
                    "first benchmark record has no `time_unit`".to_string(),
                ));
            }
            mean_records(file.benchmarks).map_err(schema_error)?
        }
    };

    Ok(Benchmarks { records, time_unit })
}

fn simple_records(raw: Vec<RawRecord>) -> Result<Vec<BenchmarkRecord>, String> {
    raw.into_iter()
        .enumerate()
        .map(|(i, record)| {
            let RawRecord {
                name,
                real_time,
                data_size,
                extra,
            } = record;
            let data_size =
                data_size.ok_or_else(|| format!("record {i} (\"{name}\") has no `data_size`"))?;
            let real_time =
                real_time.ok_or_else(|| format!("record {i} (\"{name}\") has no `real_time`"))?;

            Ok(BenchmarkRecord {
                name,
                data_size: data_size.into(),
                real_time,
                extra,
            })
        })
        .collect()
}

fn mean_records(raw: Vec<RawRecord>) -> Result<Vec<BenchmarkRecord>, String> {
    let records = raw
        .into_iter()
        .filter(|record| record.name.ends_with(MEAN_SUFFIX))
        .map(|record| {
            let (name, data_size) = split_mean_name(&record.name).ok_or_else(|| {
                format!(
                    "cannot split \"{}\" into <name>/<data_size>{MEAN_SUFFIX}",
                    record.name
                )
            })?;
            let real_time = record
                .real_time
                .ok_or_else(|| format!("\"{}\" has no `real_time`", record.name))?;
            // the aggregate bookkeeping fields are dropped along with `extra`
            Ok(BenchmarkRecord::new(name, data_size, real_time))
        })
        .collect::<Result<Vec<_>, String>>()?;

    if records.is_empty() {
        return Err(format!("no benchmark name ends in `{MEAN_SUFFIX}`"));
    }

    Ok(records)
}

/// Splits `BM_Foo/128_mean` into `("Foo", "128")`.
///
/// Returns `None` unless the name has exactly one `/` and ends in
/// [`MEAN_SUFFIX`].
pub fn split_mean_name(name: &str) -> Option<(String, String)> {
    let (name, data_size) = name.split('/').collect_tuple()?;
    let data_size = data_size.strip_suffix(MEAN_SUFFIX)?;
    let name = name.chars().skip(NAME_PREFIX_LEN).collect::<String>();

    Some((name, data_size.to_string()))
}
