//! JSONata error codes
//!
//! Error code families:
//! - S0xxx: Static errors (raised while compiling the expression)
//! - T0xxx-T2xxx: Type errors (raised during evaluation)
//! - D1xxx-D3xxx: Dynamic errors (raised during evaluation)
//! - U1xxx: Undefined-value errors (raised during evaluation)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error code family, taken from the code's leading letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorFamily {
    Static,
    Type,
    Dynamic,
    Undefined,
}

impl ErrorFamily {
    fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'S' => Some(Self::Static),
            'T' => Some(Self::Type),
            'D' => Some(Self::Dynamic),
            'U' => Some(Self::Undefined),
            _ => None,
        }
    }
}

/// A JSONata error code such as `S0201` or `T0410`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ErrorCode {
    family: ErrorFamily,
    raw: String,
}

/// The string is not a `<family letter><4 digits>` code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid JSONata error code '{0}'")]
pub struct InvalidErrorCode(pub String);

impl ErrorCode {
    /// Get the code family
    pub const fn family(&self) -> ErrorFamily {
        self.family
    }

    /// Get the code text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Check if this code is raised at compile time
    pub const fn is_static(&self) -> bool {
        matches!(self.family, ErrorFamily::Static)
    }

    /// Check if this code is raised at evaluation time
    pub const fn is_runtime(&self) -> bool {
        !self.is_static()
    }
}

impl FromStr for ErrorCode {
    type Err = InvalidErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let family = chars
            .next()
            .and_then(ErrorFamily::from_prefix)
            .ok_or_else(|| InvalidErrorCode(s.to_string()))?;
        let digits = chars.as_str();
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidErrorCode(s.to_string()));
        }
        Ok(Self {
            family,
            raw: s.to_string(),
        })
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.raw
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
