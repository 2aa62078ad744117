//! Finding severities.
//!
//! Whether an unlisted note or a dangling entry fails a run is an operator
//! choice; both default to `Error`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Finding fails the run.
    #[default]
    Error,
    /// Finding is reported but the run still passes.
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }

    pub fn is_error(self) -> bool {
        self == Self::Error
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warning),
            other => Err(format!(
                "unsupported severity `{other}`; expected error|warning"
            )),
        }
    }
}

/// Severity per finding kind, plus strict handling of unparsed index items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportPolicy {
    pub unlisted: Severity,
    pub dangling: Severity,
    pub duplicates: Severity,
    /// Unparsed index list items fail the run instead of only warning.
    pub strict: bool,
}
