//! Replacement of non-finite floats before a report leaves the engine.
//!
//! Report types store floating-point results as [`Measure`]. A measure that
//! ends up NaN or infinite (a standard deviation over one value, the skewness
//! of a constant field, an overflowing sum) cannot be written as JSON, so the
//! whole report is walked once and every such measure becomes `None`, which
//! serializes as `null`.

use indexmap::IndexMap;

/// A floating-point result. `None` marks a value that was not finite.
pub type Measure = Option<f64>;

/// Recursive visitor that clears non-finite measures in place.
pub trait Sanitize {
    fn sanitize(&mut self);
}

impl Sanitize for Measure {
    fn sanitize(&mut self) {
        if self.is_some_and(|v| !v.is_finite()) {
            *self = None;
        }
    }
}

impl<T: Sanitize> Sanitize for Vec<T> {
    fn sanitize(&mut self) {
        self.iter_mut().for_each(Sanitize::sanitize);
    }
}

impl<K, V: Sanitize> Sanitize for IndexMap<K, V> {
    fn sanitize(&mut self) {
        self.values_mut().for_each(Sanitize::sanitize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_sanitize() {
        let mut nan: Measure = Some(f64::NAN);
        let mut inf: Measure = Some(f64::NEG_INFINITY);
        let mut ok: Measure = Some(1.5);
        nan.sanitize();
        inf.sanitize();
        ok.sanitize();
        assert_eq!(nan, None);
        assert_eq!(inf, None);
        assert_eq!(ok, Some(1.5));
    }

    #[test]
    fn test_nested_containers() {
        let mut map: IndexMap<String, Vec<Measure>> = IndexMap::new();
        map.insert("a".into(), vec![Some(1.0), Some(f64::INFINITY)]);
        map.insert("b".into(), vec![Some(f64::NAN)]);
        map.sanitize();

        assert_eq!(map["a"], vec![Some(1.0), None]);
        assert_eq!(map["b"], vec![None]);
    }
}
