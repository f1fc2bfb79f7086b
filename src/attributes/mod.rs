//! Node attribute extraction and normalization.
//!
//! Recognized attributes:
//!
//! | Attribute | Type | When unusable | Normalized |
//! |-----------|------|---------------|------------|
//! | `pseudotime` | real | null | min-max to [0, 1] |
//! | `attractor_size` | integer ≥ 0 | 0 | — |
//! | `condition_bias` | real | null | `(b + 1) / 2` |
//! | `disease_region` | string | null | — |

pub mod extract;
pub mod normalize;

pub use extract::{
    coerce_real, extract_attributes, AttributeColumn, NodeAttributes,
    PSEUDOTIME_KEY, ATTRACTOR_SIZE_KEY, CONDITION_BIAS_KEY, DISEASE_REGION_KEY,
};
pub use normalize::{
    normalize_condition_bias, normalize_pseudotime, Bounds,
    NormalizedConditionBias, NormalizedPseudotime,
};
