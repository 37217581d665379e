use std::fmt::Display;

use indexmap::IndexSet;
use itertools::Itertools;
use thiserror::Error;

use crate::model::{BenchmarkRecord, Series};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GroupError {
    #[error("no benchmark records to group")]
    EmptyInput,
}

/// Splits `records` into one series per run of contiguous same-name records.
///
/// Records are not sorted first: `A, B, A` yields three series.
pub fn group(records: &[BenchmarkRecord]) -> Result<Vec<Series>, GroupError> {
    let (first, rest) = records.split_first().ok_or(GroupError::EmptyInput)?;

    let mut all = Vec::new();
    let mut current = Series::new(first.name.as_str());
    current.push(first.data_size.as_str(), first.real_time);

    for (prev, record) in records.iter().zip(rest) {
        if prev.name != record.name {
            all.push(std::mem::replace(
                &mut current,
                Series::new(record.name.as_str()),
            ));
        }
        current.push(record.data_size.as_str(), record.real_time);
    }

    // flush the last open series
    all.push(current);

    Ok(all)
}

/// Which series end up in the plot.
#[derive(Debug, Clone, Default)]
pub enum Selector {
    #[default]
    All,
    Some(IndexSet<String>),
}

impl Selector {
    pub fn selects(&self, name: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Some(names) => names.contains(name),
        }
    }

    /// Keeps the selected series, in their original order.
    pub fn apply(&self, series: Vec<Series>) -> Vec<Series> {
        series
            .into_iter()
            .filter(|series| self.selects(series.name()))
            .collect()
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::All => write!(f, "all series"),
            Selector::Some(names) => write!(f, "series {}", names.iter().join(", ")),
        }
    }
}
