//! Running means over per-user metric values.

/// Running arithmetic mean as a sum and a count.
///
/// Values folded in here are reciprocal ranks in [0, 1], so a plain `f64` sum
/// stays accurate for millions of users.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanAccumulator {
    sum: f64,
    count: u64,
}

impl MeanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Mean of every value added so far; `NaN` if nothing was added.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Two means over the same stream: one over every user, one over only the
/// users that had a good item in their list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DualMeanAccumulator {
    all: MeanAccumulator,
    good: MeanAccumulator,
}

impl DualMeanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one user's value. Always counted in the all-users mean; counted in
    /// the good-users mean only when `had_good_item`.
    pub fn add_user(&mut self, value: f64, had_good_item: bool) {
        self.all.add(value);
        if had_good_item {
            self.good.add(value);
        }
    }

    pub fn all_mean(&self) -> f64 {
        self.all.mean()
    }

    pub fn good_mean(&self) -> f64 {
        self.good.mean()
    }

    pub fn all_count(&self) -> u64 {
        self.all.count()
    }

    pub fn good_count(&self) -> u64 {
        self.good.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mean_is_nan() {
        let acc = MeanAccumulator::new();
        assert!(acc.mean().is_nan());
        assert_eq!(acc.count(), 0);
    }

    #[test]
    fn test_mean() {
        let mut acc = MeanAccumulator::new();
        for v in [1.0, 0.5, 0.0, 0.25] {
            acc.add(v);
        }
        assert_eq!(acc.count(), 4);
        assert!((acc.mean() - 0.4375).abs() < 1e-12);
    }

    #[test]
    fn test_dual_means_split_populations() {
        let pairs = [
            (1.0, true),
            (0.0, false),
            (0.5, true),
            (0.0, false),
            (0.2, true),
        ];
        let mut acc = DualMeanAccumulator::new();
        for (v, good) in pairs {
            acc.add_user(v, good);
        }

        let all_sum: f64 = pairs.iter().map(|(v, _)| v).sum();
        let good_sum: f64 = pairs.iter().filter(|(_, g)| *g).map(|(v, _)| v).sum();
        assert_eq!(acc.all_count(), 5);
        assert_eq!(acc.good_count(), 3);
        assert!((acc.all_mean() - all_sum / 5.0).abs() < 1e-12);
        assert!((acc.good_mean() - good_sum / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_dual_two_users() {
        let mut acc = DualMeanAccumulator::new();
        acc.add_user(1.0, true);
        acc.add_user(0.0, false);
        assert_eq!(acc.all_mean(), 0.5);
        assert_eq!(acc.good_mean(), 1.0);
    }

    #[test]
    fn test_dual_no_good_users() {
        let mut acc = DualMeanAccumulator::new();
        acc.add_user(0.0, false);
        assert_eq!(acc.all_mean(), 0.0);
        assert!(acc.good_mean().is_nan());
    }

    #[test]
    fn test_dual_empty() {
        let acc = DualMeanAccumulator::new();
        assert!(acc.all_mean().is_nan());
        assert!(acc.good_mean().is_nan());
    }

    #[test]
    fn test_readout_is_stable() {
        let mut acc = DualMeanAccumulator::new();
        acc.add_user(0.25, true);
        let first = (acc.all_mean(), acc.good_mean());
        let second = (acc.all_mean(), acc.good_mean());
        assert_eq!(first, second);
    }
}
