use rand::Rng;

/// Ordered samples rendered into the published image.
///
/// Starts as `[0.0]` and only grows, except for [`PlotSeries::reset`]
/// which brings it back to that single zero sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    samples: Vec<f64>,
}

impl Default for PlotSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotSeries {
    pub fn new() -> Self {
        Self { samples: vec![0.0] }
    }

    pub fn push(&mut self, value: f64) {
        self.samples.push(value);
    }

    /// Append a random walk step of +1 or -1 from the last sample.
    pub fn push_step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let step = -1.0 + 2.0 * rng.random::<f64>().round();
        let value = self.last() + step;
        self.push(value);
        value
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.samples.push(0.0);
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> f64 {
        self.samples.last().copied().unwrap_or(0.0)
    }

    /// Value range to plot, padded by one unit on each side.
    pub fn y_range(&self) -> (f64, f64) {
        let (min, max) = self
            .samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        if min > max {
            return (-1.0, 1.0);
        }
        (min - 1.0, max + 1.0)
    }
}
