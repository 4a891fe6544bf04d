use super::DomainError;

/// Maximum score a question contributes when answered fully correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GradePoint(u16);

impl GradePoint {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = i16::MAX as i32;

    pub fn new(value: i32) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u16))
        } else {
            Err(DomainError::InvalidGradePoint(value))
        }
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl From<GradePoint> for i16 {
    fn from(value: GradePoint) -> Self {
        // MAX keeps the value inside i16.
        value.0 as i16
    }
}

#[cfg(test)]
mod tests {
    use super::GradePoint;

    #[test]
    fn zero_and_max_are_valid() {
        assert_eq!(GradePoint::new(0).expect("0 should be valid").value(), 0);
        assert_eq!(
            GradePoint::new(32_767).expect("max should be valid").value(),
            32_767
        );
    }

    #[test]
    fn negative_grade_point_is_rejected() {
        let err = GradePoint::new(-1).expect_err("-1 should be rejected");

        assert_eq!(
            err.to_string(),
            "invalid grade point: -1. grade point must be in [0, 32767]"
        );
    }

    #[test]
    fn grade_point_above_small_integer_range_is_rejected() {
        assert!(GradePoint::new(32_768).is_err());
    }
}
