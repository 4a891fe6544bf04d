use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rating(f64);

impl Rating {
    pub const DEFAULT: f64 = 5.0;

    pub fn new(value: f64) -> Result<Self, DomainError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidRating(value.to_string()))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}
