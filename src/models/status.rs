//! Day confirmation state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, ValidationErrorKind};

/// Day-level confirmation flag, carried on every submission and time slot.
///
/// `N` is the default: the day is open and contributors see only their own
/// rows. `Y` finalizes the day and makes every row visible. Transitions in
/// both directions go through the confirmation coordinator only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confirmation {
    #[default]
    N,
    Y,
}

impl Confirmation {
    /// Parses the wire literals `"Y"` / `"N"` (case-insensitive).
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim() {
            "Y" | "y" => Ok(Self::Y),
            "N" | "n" => Ok(Self::N),
            "" => Err(ValidationError::new(
                "confirmed",
                ValidationErrorKind::Missing,
                "confirmed is required",
            )),
            other => Err(ValidationError::new(
                "confirmed",
                ValidationErrorKind::InvalidCode,
                format!("expected 'Y' or 'N', got '{other}'"),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::Y => "Y",
        }
    }

    #[inline]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Y)
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literals() {
        assert_eq!(Confirmation::parse("Y").unwrap(), Confirmation::Y);
        assert_eq!(Confirmation::parse("n").unwrap(), Confirmation::N);
        assert_eq!(
            Confirmation::parse("yes").unwrap_err().kind,
            ValidationErrorKind::InvalidCode
        );
        assert_eq!(
            Confirmation::parse("").unwrap_err().kind,
            ValidationErrorKind::Missing
        );
    }

    #[test]
    fn test_default_is_open() {
        assert_eq!(Confirmation::default(), Confirmation::N);
        assert!(!Confirmation::default().is_confirmed());
    }

    #[test]
    fn test_wire_form() {
        assert_eq!(serde_json::to_string(&Confirmation::Y).unwrap(), "\"Y\"");
        let c: Confirmation = serde_json::from_str("\"N\"").unwrap();
        assert_eq!(c, Confirmation::N);
    }
}
