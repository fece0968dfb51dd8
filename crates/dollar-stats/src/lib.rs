//! Summary statistics for per-generation population reports.
//!
//! # Modules
//!
//! - [`descriptive`]: Mean, spread and extremes of a dataset, plus the upper
//!   bound of a confidence interval for its mean
//! - [`student_t`]: Quantiles of the normal and Student-t distributions
//!
//! # Examples
//!
//! ```
//! use dollar_stats::descriptive::DescriptiveStats;
//!
//! let values = [0.2, 0.4, 0.6, 0.8];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert!((stats.mean - 0.5).abs() < 1e-6);
//! assert!(stats.mean_upper_bound(0.95) > stats.mean);
//! ```

pub mod descriptive;
pub mod student_t;
