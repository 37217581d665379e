mod record;
mod series;

pub use record::{BenchmarkRecord, DataSize};
pub use series::Series;
