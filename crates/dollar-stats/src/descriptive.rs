use crate::student_t;

/// Descriptive statistics summarizing a dataset.
///
/// This structure contains common measures of central tendency, dispersion,
/// and spread for a dataset of `f32` values.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// The number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f32,
    /// The maximum value in the dataset.
    pub max: f32,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f32,
    /// The median value of the dataset (upper median for even counts).
    pub median: f32,
    /// The population standard deviation (divides by `n`).
    pub std_dev: f32,
    /// The sample standard deviation (divides by `n - 1`; zero when `n < 2`).
    pub sample_std_dev: f32,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use dollar_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f32]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f32;
        let mean = sorted_values.iter().copied().sum::<f32>() / n;
        let median = sorted_values[count / 2];
        let sum_sq = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f32>();
        let std_dev = (sum_sq / n).sqrt();
        let sample_std_dev = if count < 2 {
            0.0
        } else {
            (sum_sq / (n - 1.0)).sqrt()
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev,
            sample_std_dev,
        })
    }

    /// Standard error of the mean, `sample_std_dev / sqrt(n)`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn std_error(&self) -> f32 {
        self.sample_std_dev / (self.count as f32).sqrt()
    }

    /// Upper end of the two-sided Student-t confidence interval for the mean,
    /// with `count - 1` degrees of freedom.
    ///
    /// With fewer than two values there is no spread to estimate and the mean
    /// itself is returned.
    ///
    /// # Panics
    ///
    /// Panics if `confidence` is not in `(0, 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dollar_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([1.0, 2.0, 3.0]).unwrap();
    /// // t(0.975, 2) = 4.303, standard error = 1 / sqrt(3)
    /// assert!((stats.mean_upper_bound(0.95) - 4.4841).abs() < 1e-3);
    ///
    /// let single = DescriptiveStats::new([0.7]).unwrap();
    /// assert_eq!(single.mean_upper_bound(0.95), 0.7);
    /// ```
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn mean_upper_bound(&self, confidence: f32) -> f32 {
        assert!(
            confidence > 0.0 && confidence < 1.0,
            "confidence must be in (0, 1)"
        );
        if self.count < 2 {
            return self.mean;
        }
        let p = 1.0 - (1.0 - f64::from(confidence)) / 2.0;
        let t = student_t::quantile(p, self.count - 1);
        self.mean + t as f32 * self.std_error()
    }
}
