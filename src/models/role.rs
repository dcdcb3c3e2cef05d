//! Role codes.
//!
//! Stored as their code string (`DOOR`, `MALE1`, ...). Staff roles run the
//! venue; performer roles appear on stage.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, ValidationErrorKind};

/// A role a person can take on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleCode {
    Door,
    Holeman,
    Oper,
    Helper,
    Kitchen,
    Male1,
    Male2,
    Male3,
    Female1,
    Female2,
    Female3,
}

impl RoleCode {
    pub const ALL: [RoleCode; 11] = [
        Self::Door,
        Self::Holeman,
        Self::Oper,
        Self::Helper,
        Self::Kitchen,
        Self::Male1,
        Self::Male2,
        Self::Male3,
        Self::Female1,
        Self::Female2,
        Self::Female3,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Door => "DOOR",
            Self::Holeman => "HOLEMAN",
            Self::Oper => "OPER",
            Self::Helper => "HELPER",
            Self::Kitchen => "KITCHEN",
            Self::Male1 => "MALE1",
            Self::Male2 => "MALE2",
            Self::Male3 => "MALE3",
            Self::Female1 => "FEMALE1",
            Self::Female2 => "FEMALE2",
            Self::Female3 => "FEMALE3",
        }
    }

    /// Label shown on the venue board.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Door => "도어",
            Self::Holeman => "홀맨",
            Self::Oper => "오퍼",
            Self::Helper => "헬퍼",
            Self::Kitchen => "주방",
            Self::Male1 => "남1",
            Self::Male2 => "남2",
            Self::Male3 => "남3",
            Self::Female1 => "여1",
            Self::Female2 => "여2",
            Self::Female3 => "여3",
        }
    }

    pub fn is_performer(&self) -> bool {
        !matches!(
            self,
            Self::Door | Self::Holeman | Self::Oper | Self::Helper | Self::Kitchen
        )
    }

    /// Parses an optional role code; blank means "no role chosen".
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, ValidationError> {
        let code = raw.trim();
        if code.is_empty() {
            return Ok(None);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.code().eq_ignore_ascii_case(code))
            .map(Some)
            .ok_or_else(|| {
                ValidationError::new(
                    "role",
                    ValidationErrorKind::InvalidCode,
                    format!("unknown role code '{code}'"),
                )
            })
    }
}

impl fmt::Display for RoleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
