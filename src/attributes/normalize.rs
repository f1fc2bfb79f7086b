//! Rescaling of extracted attributes for color encoding.
//!
//! Missing values stay missing through every transform.

use serde::{Deserialize, Serialize};

/// Observed range of a column's non-missing values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Range of the non-missing values; None if every value is missing.
    pub fn of(values: &[Option<f64>]) -> Option<Self> {
        values.iter().flatten().fold(None, |acc, &v| {
            Some(match acc {
                None => Bounds { min: v, max: v },
                Some(b) => Bounds { min: b.min.min(v), max: b.max.max(v) },
            })
        })
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Linear map of `[min, max]` onto `[0, 1]`. A degenerate range maps
    /// everything to 1.0.
    pub fn scale(&self, v: f64) -> f64 {
        if self.is_degenerate() {
            return 1.0;
        }
        let span = self.max - self.min;
        if span.is_finite() {
            (v - self.min) / span
        } else {
            // span exceeds f64::MAX; halves cannot overflow
            (v / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        }
    }
}

/// Min-max rescale using the column's own bounds.
pub fn min_max(values: &[Option<f64>]) -> (Vec<Option<f64>>, Option<Bounds>) {
    let Some(bounds) = Bounds::of(values) else {
        return (vec![None; values.len()], None);
    };
    let scaled = values.iter().map(|v| v.map(|v| bounds.scale(v))).collect();
    (scaled, Some(bounds))
}

/// Fixed map of the nominal `[-1, 1]` domain onto `[0, 1]`. No clamping.
pub fn signed_unit(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values.iter().map(|v| v.map(|b| (b + 1.0) / 2.0)).collect()
}

/// Raw pseudotime with its normalized counterpart and bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPseudotime {
    pub raw: Vec<Option<f64>>,
    pub norm: Vec<Option<f64>>,
    pub bounds: Bounds,
}

/// Raw condition bias with its normalized counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedConditionBias {
    pub raw: Vec<Option<f64>>,
    pub norm: Vec<Option<f64>>,
}

pub fn normalize_pseudotime(raw: &[Option<f64>]) -> Option<NormalizedPseudotime> {
    let (norm, bounds) = min_max(raw);
    bounds.map(|bounds| NormalizedPseudotime { raw: raw.to_vec(), norm, bounds })
}

pub fn normalize_condition_bias(raw: &[Option<f64>]) -> NormalizedConditionBias {
    NormalizedConditionBias { raw: raw.to_vec(), norm: signed_unit(raw) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max() {
        let (norm, bounds) = min_max(&[Some(2.0), None, Some(4.0), Some(3.0)]);
        assert_eq!(norm, vec![Some(0.0), None, Some(1.0), Some(0.5)]);
        assert_eq!(bounds, Some(Bounds { min: 2.0, max: 4.0 }));
    }

    #[test]
    fn test_min_max_degenerate_maps_to_one() {
        let (norm, bounds) = min_max(&[None, None, Some(5.0), None]);
        assert_eq!(norm, vec![None, None, Some(1.0), None]);
        assert_eq!(bounds, Some(Bounds { min: 5.0, max: 5.0 }));

        let (norm, _) = min_max(&[Some(-2.0), Some(-2.0)]);
        assert_eq!(norm, vec![Some(1.0), Some(1.0)]);
    }

    #[test]
    fn test_min_max_span_beyond_f64_max() {
        let (norm, _) = min_max(&[Some(-1e308), Some(1e308), Some(0.0)]);
        assert_eq!(norm, vec![Some(0.0), Some(1.0), Some(0.5)]);

        let (norm, _) = min_max(&[Some(f64::MAX), Some(-f64::MAX)]);
        assert_eq!(norm, vec![Some(1.0), Some(0.0)]);
    }

    #[test]
    fn test_min_max_all_missing() {
        let (norm, bounds) = min_max(&[None, None]);
        assert_eq!(norm, vec![None, None]);
        assert!(bounds.is_none());
        assert!(normalize_pseudotime(&[None]).is_none());
    }

    #[test]
    fn test_signed_unit_does_not_clamp() {
        let norm = signed_unit(&[Some(-1.0), Some(0.0), Some(1.0), Some(2.0), None, Some(-3.0)]);
        assert_eq!(norm, vec![Some(0.0), Some(0.5), Some(1.0), Some(1.5), None, Some(-1.0)]);
    }

    #[test]
    fn test_raw_retained() {
        let raw = [Some(0.25), None];
        let cb = normalize_condition_bias(&raw);
        assert_eq!(cb.raw, raw.to_vec());
        assert_eq!(cb.norm, vec![Some(0.625), None]);
    }
}
