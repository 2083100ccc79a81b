//! Numeric helpers for attribute values.
//!
//! All attribute math is done in `f64`. This module holds the clamping rule
//! shared by attributes and resources, the integer presentation used by
//! game UIs, and the serde helper that lets an unbounded ceiling survive a
//! trip through JSON.

/// Type alias for attribute values.
pub type StatValue = f64;

/// Default lower bound for a freshly created attribute.
pub const DEFAULT_MIN: StatValue = 0.0;

/// Default upper bound for a freshly created attribute (unbounded).
pub const DEFAULT_MAX: StatValue = f64::INFINITY;

/// Clamp `value` into `[min, max]`.
///
/// Evaluated as `max(min, min(max, value))`, so a lower bound above the upper
/// bound yields the lower bound instead of panicking like [`f64::clamp`].
///
/// # Examples
///
/// ```rust
/// use piecestat::numeric::clamp_between;
///
/// assert_eq!(clamp_between(150.0, 0.0, 100.0), 100.0);
/// assert_eq!(clamp_between(-3.0, 0.0, 100.0), 0.0);
/// assert_eq!(clamp_between(5.0, 10.0, 1.0), 10.0);
/// ```
pub fn clamp_between(value: StatValue, min: StatValue, max: StatValue) -> StatValue {
    min.max(max.min(value))
}

/// Truncate a value toward zero for display.
///
/// Some boards show whole numbers only (movement range, piece value). The
/// engine itself never truncates.
///
/// # Examples
///
/// ```rust
/// use piecestat::numeric::whole;
///
/// assert_eq!(whole(132.9), 132);
/// assert_eq!(whole(-1.5), -1);
/// ```
pub fn whole(value: StatValue) -> i64 {
    value.trunc() as i64
}

/// Serde helpers for bounds that may be infinite.
///
/// JSON has no representation for infinity, so a non-finite bound is written
/// as `null`. Reading `null` back gives the matching infinity: positive for an
/// upper bound, negative for a lower bound.
pub(crate) mod bound {
    use super::StatValue;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &StatValue, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize_upper<'de, D>(deserializer: D) -> Result<StatValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<StatValue>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }

    pub fn deserialize_lower<'de, D>(deserializer: D) -> Result<StatValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<StatValue>::deserialize(deserializer)?.unwrap_or(f64::NEG_INFINITY))
    }

    pub fn default_lower() -> StatValue {
        super::DEFAULT_MIN
    }

    pub fn default_upper() -> StatValue {
        super::DEFAULT_MAX
    }
}
