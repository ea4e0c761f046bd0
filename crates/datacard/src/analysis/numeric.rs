//! Descriptive statistics and outlier detection for numeric fields.

use serde::{Deserialize, Serialize};

use crate::options::OutlierMethod;
use crate::sanitize::{Measure, Sanitize};

/// Maximum outlier indices and values reported per field.
pub const MAX_REPORTED_OUTLIERS: usize = 100;

/// Lower and upper IQR fences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: Measure,
    pub upper: Measure,
}

/// Result of an outlier scan, tagged by method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum OutlierDetection {
    /// Values further than `threshold` population standard deviations from the mean.
    Zscore {
        threshold: Measure,
        count: usize,
        indices: Vec<usize>,
        values: Vec<Measure>,
        max_zscore: Measure,
    },
    /// Values outside `[q25 - threshold*IQR, q75 + threshold*IQR]`.
    Iqr {
        threshold: Measure,
        count: usize,
        indices: Vec<usize>,
        values: Vec<Measure>,
        bounds: Bounds,
    },
}

/// Outlier section of [`NumericStats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outliers {
    Detected(OutlierDetection),
    /// No values were available to scan.
    Skipped { count: usize },
}

impl Outliers {
    /// Total number of flagged values (not capped).
    pub fn count(&self) -> usize {
        match self {
            Outliers::Detected(OutlierDetection::Zscore { count, .. })
            | Outliers::Detected(OutlierDetection::Iqr { count, .. })
            | Outliers::Skipped { count } => *count,
        }
    }

    /// Record indices of flagged values, capped at [`MAX_REPORTED_OUTLIERS`].
    pub fn indices(&self) -> &[usize] {
        match self {
            Outliers::Detected(OutlierDetection::Zscore { indices, .. })
            | Outliers::Detected(OutlierDetection::Iqr { indices, .. }) => indices,
            Outliers::Skipped { .. } => &[],
        }
    }

    /// Flagged values, parallel to [`Outliers::indices`].
    pub fn values(&self) -> &[Measure] {
        match self {
            Outliers::Detected(OutlierDetection::Zscore { values, .. })
            | Outliers::Detected(OutlierDetection::Iqr { values, .. }) => values,
            Outliers::Skipped { .. } => &[],
        }
    }

    /// Detection method, if a scan ran.
    pub fn method(&self) -> Option<OutlierMethod> {
        match self {
            Outliers::Detected(OutlierDetection::Zscore { .. }) => Some(OutlierMethod::Zscore),
            Outliers::Detected(OutlierDetection::Iqr { .. }) => Some(OutlierMethod::Iqr),
            Outliers::Skipped { .. } => None,
        }
    }

    /// Threshold used by the scan.
    pub fn threshold(&self) -> Measure {
        match self {
            Outliers::Detected(OutlierDetection::Zscore { threshold, .. })
            | Outliers::Detected(OutlierDetection::Iqr { threshold, .. }) => *threshold,
            Outliers::Skipped { .. } => None,
        }
    }
}

impl Sanitize for Outliers {
    fn sanitize(&mut self) {
        match self {
            Outliers::Detected(OutlierDetection::Zscore {
                threshold,
                values,
                max_zscore,
                ..
            }) => {
                threshold.sanitize();
                values.sanitize();
                max_zscore.sanitize();
            }
            Outliers::Detected(OutlierDetection::Iqr {
                threshold,
                values,
                bounds,
                ..
            }) => {
                threshold.sanitize();
                values.sanitize();
                bounds.lower.sanitize();
                bounds.upper.sanitize();
            }
            Outliers::Skipped { .. } => {}
        }
    }
}

/// Statistics for a numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    /// Number of non-missing values.
    pub count: usize,
    pub mean: Measure,
    pub median: Measure,
    /// Sample standard deviation (N-1 denominator).
    pub std: Measure,
    pub min: Measure,
    pub max: Measure,
    pub q25: Measure,
    pub q50: Measure,
    pub q75: Measure,
    /// Population third standardized moment, no bias correction.
    pub skewness: Measure,
    /// Population fourth standardized moment minus 3.
    pub kurtosis: Measure,
    pub outliers: Outliers,
}

impl NumericStats {
    /// Zero-filled statistics for a field without values.
    pub fn empty() -> Self {
        Self {
            count: 0,
            mean: Some(0.0),
            median: Some(0.0),
            std: Some(0.0),
            min: Some(0.0),
            max: Some(0.0),
            q25: Some(0.0),
            q50: Some(0.0),
            q75: Some(0.0),
            skewness: Some(0.0),
            kurtosis: Some(0.0),
            outliers: Outliers::Skipped { count: 0 },
        }
    }

    /// Interquartile range.
    pub fn iqr(&self) -> Measure {
        Some(self.q75? - self.q25?)
    }
}

impl Sanitize for NumericStats {
    fn sanitize(&mut self) {
        for measure in [
            &mut self.mean,
            &mut self.median,
            &mut self.std,
            &mut self.min,
            &mut self.max,
            &mut self.q25,
            &mut self.q50,
            &mut self.q75,
            &mut self.skewness,
            &mut self.kurtosis,
        ] {
            measure.sanitize();
        }
        self.outliers.sanitize();
    }
}

/// Computes [`NumericStats`] for one field.
#[derive(Debug, Clone)]
pub struct NumericAnalyzer {
    method: OutlierMethod,
    threshold: f64,
}

impl NumericAnalyzer {
    /// Create an analyzer with the default z-score method at 3.0.
    pub fn new() -> Self {
        Self::with_method(OutlierMethod::Zscore, 3.0)
    }

    /// Create an analyzer with an explicit outlier method and threshold.
    pub fn with_method(method: OutlierMethod, threshold: f64) -> Self {
        Self { method, threshold }
    }

    /// Analyze `(record_index, value)` pairs of the field's non-missing values.
    pub fn analyze(&self, values: &[(usize, f64)]) -> NumericStats {
        if values.is_empty() {
            return NumericStats::empty();
        }

        let data: Vec<f64> = values.iter().map(|&(_, v)| v).collect();
        let mut sorted = data.clone();
        sorted.sort_by(f64::total_cmp);

        let moments = Moments::compute(&data);
        let q25 = quantile(&sorted, 0.25);
        let q50 = quantile(&sorted, 0.50);
        let q75 = quantile(&sorted, 0.75);

        let outliers = match self.method {
            OutlierMethod::Zscore => self.zscore_outliers(values, &moments),
            OutlierMethod::Iqr => self.iqr_outliers(values, q25, q75),
        };

        NumericStats {
            count: data.len(),
            mean: Some(moments.mean),
            median: Some(q50),
            std: Some(moments.sample_std()),
            min: sorted.first().copied(),
            max: sorted.last().copied(),
            q25: Some(q25),
            q50: Some(q50),
            q75: Some(q75),
            skewness: Some(moments.skewness()),
            kurtosis: Some(moments.excess_kurtosis()),
            outliers: Outliers::Detected(outliers),
        }
    }

    fn zscore_outliers(&self, values: &[(usize, f64)], moments: &Moments) -> OutlierDetection {
        let pop_std = moments.population_std();
        let mut flagged = Vec::new();
        let mut max_zscore = f64::NEG_INFINITY;

        for &(idx, value) in values {
            let score = (value - moments.mean).abs() / pop_std;
            // NaN scores (constant field) poison the maximum
            max_zscore = if score.is_nan() || max_zscore.is_nan() {
                f64::NAN
            } else {
                max_zscore.max(score)
            };
            if score > self.threshold {
                flagged.push((idx, value));
            }
        }

        let (count, indices, values) = split_flagged(flagged);
        OutlierDetection::Zscore {
            threshold: Some(self.threshold),
            count,
            indices,
            values,
            max_zscore: Some(max_zscore),
        }
    }

    fn iqr_outliers(&self, values: &[(usize, f64)], q25: f64, q75: f64) -> OutlierDetection {
        let iqr = q75 - q25;
        let lower = q25 - self.threshold * iqr;
        let upper = q75 + self.threshold * iqr;

        let flagged: Vec<(usize, f64)> = values
            .iter()
            .copied()
            .filter(|&(_, v)| v < lower || v > upper)
            .collect();

        let (count, indices, values) = split_flagged(flagged);
        OutlierDetection::Iqr {
            threshold: Some(self.threshold),
            count,
            indices,
            values,
            bounds: Bounds {
                lower: Some(lower),
                upper: Some(upper),
            },
        }
    }
}

impl Default for NumericAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn split_flagged(flagged: Vec<(usize, f64)>) -> (usize, Vec<usize>, Vec<Measure>) {
    let count = flagged.len();
    let (indices, values) = flagged
        .into_iter()
        .take(MAX_REPORTED_OUTLIERS)
        .map(|(idx, v)| (idx, Some(v)))
        .unzip();
    (count, indices, values)
}

/// Decimal resolution of an f64.
const F64_RESOLUTION: f64 = 1e-15;

/// Central moments of a sample.
#[derive(Debug, Clone, Copy)]
struct Moments {
    n: usize,
    mean: f64,
    /// Sum of squared deviations.
    ss: f64,
    /// Population variance.
    m2: f64,
    m3: f64,
    m4: f64,
}

impl Moments {
    fn compute(data: &[f64]) -> Self {
        let n = data.len();
        let nf = n as f64;
        let mean = data.iter().sum::<f64>() / nf;

        let (mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0);
        for &x in data {
            let d = x - mean;
            let d2 = d * d;
            s2 += d2;
            s3 += d2 * d;
            s4 += d2 * d2;
        }

        Self {
            n,
            mean,
            ss: s2,
            m2: s2 / nf,
            m3: s3 / nf,
            m4: s4 / nf,
        }
    }

    fn sample_std(&self) -> f64 {
        if self.n < 2 {
            return f64::NAN;
        }
        (self.ss / (self.n - 1) as f64).sqrt()
    }

    fn population_std(&self) -> f64 {
        self.m2.sqrt()
    }

    /// Variance indistinguishable from zero at the mean's precision.
    fn is_degenerate(&self) -> bool {
        self.m2 <= (F64_RESOLUTION * self.mean).powi(2)
    }

    fn skewness(&self) -> f64 {
        if self.is_degenerate() {
            return f64::NAN;
        }
        self.m3 / self.m2.powf(1.5)
    }

    fn excess_kurtosis(&self) -> f64 {
        if self.is_degenerate() {
            return f64::NAN;
        }
        self.m4 / (self.m2 * self.m2) - 3.0
    }
}

/// Quantile with linear interpolation between order statistics.
///
/// `sorted` must be non-empty and ascending.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let (a, b) = (sorted[lo], sorted[hi]);
    if lo == hi || a == b {
        return a;
    }
    (a + (b - a) * (pos - lo as f64)).clamp(a, b)
}
