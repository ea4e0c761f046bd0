//! Rule-based anomaly detection over analyzer outputs.

mod anomaly;
mod detector;

pub use anomaly::{Anomaly, AnomalyDetails, AnomalyType, Severity};
pub use detector::{AnomalyDetector, CONCENTRATION_THRESHOLD, HIGH_CONCENTRATION_THRESHOLD};
