/// Running mean and variance (Welford)
#[derive(Debug, Default, Clone)]
pub struct Averager {
    pub mean: f64,
    pub count: u64,
    m2: f64,
}

impl Averager {
    /// Builds new Averager
    pub fn new() -> Self {
        Self::default()
    }

    /// Push new value into [Averager]
    pub fn add(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Population variance, None without samples
    pub fn variance(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.m2 / self.count as f64)
        }
    }

    /// Population standard deviation, None without samples
    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }
}
