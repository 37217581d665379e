/// One plotted line: every point of a contiguous run of same-name records.
///
/// `data_sizes` and `real_times` only grow together through [`Series::push`],
/// so index `i` of both always belongs to the same source record.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Series {
    name: String,
    data_sizes: Vec<String>,
    real_times: Vec<f64>,
}

impl Series {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            data_sizes: Vec::new(),
            real_times: Vec::new(),
        }
    }

    pub fn push<D: Into<String>>(&mut self, data_size: D, real_time: f64) {
        self.data_sizes.push(data_size.into());
        self.real_times.push(real_time);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_sizes(&self) -> &[String] {
        &self.data_sizes
    }

    pub fn real_times(&self) -> &[f64] {
        &self.real_times
    }

    pub fn len(&self) -> usize {
        self.real_times.len()
    }

    /// `(data_size, real_time)` pairs in input order.
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.data_sizes
            .iter()
            .map(String::as_str)
            .zip(self.real_times.iter().copied())
    }
}
