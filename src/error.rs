use thiserror::Error;

use crate::types::BodyId;

/// Errors raised by fallible constructors and world operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    /// A numeric parameter was outside its allowed range (e.g. a negative speed).
    #[error("invalid argument `{name}`: {value}")]
    InvalidArgument { name: &'static str, value: f32 },
    /// Categories are stored in a 32-bit table; ordinals must be below 32.
    #[error("category {0} out of range (max {max})", max = crate::types::MAX_CATEGORIES - 1)]
    CategoryOutOfRange(u8),
    /// The id does not name a body currently in the world.
    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),
    /// World configuration rejected by `WorldConfig::validate`.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// Vertex list that does not describe a strictly convex polygon.
    #[error("invalid polygon: {0}")]
    InvalidPolygon(&'static str),
}

impl CollisionError {
    /// Fails with `InvalidArgument` unless `value` is finite and `>= 0`.
    pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<f32, Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::InvalidArgument { name, value })
        }
    }

    /// Fails with `InvalidArgument` unless `value` is finite and `> 0`.
    pub(crate) fn positive(name: &'static str, value: f32) -> Result<f32, Self> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(Self::InvalidArgument { name, value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_helpers() {
        assert_eq!(CollisionError::non_negative("speed", 0.0), Ok(0.0));
        assert!(CollisionError::non_negative("speed", -1.0).is_err());
        assert!(CollisionError::non_negative("speed", f32::NAN).is_err());
        assert!(CollisionError::positive("density", 0.0).is_err());
        let e = CollisionError::positive("density", -2.0).unwrap_err();
        assert_eq!(e.to_string(), "invalid argument `density`: -2");
    }

    #[test]
    fn test_category_message() {
        let e = CollisionError::CategoryOutOfRange(40);
        assert_eq!(e.to_string(), "category 40 out of range (max 31)");
    }
}
