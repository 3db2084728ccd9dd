//! Per-field tag parsing.
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while parsing a field tag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    /// A segment after the name override is not a known directive.
    #[error("unknown directive {0:?}")]
    Unknown(String),
}

/// Serialization directives parsed from a field tag.
///
/// The tag is a comma-separated list: the first segment overrides the flag
/// name (used verbatim, prefix included), the rest are drawn from `omit`,
/// `no` and `positional`.
///
/// # Examples
///
/// ```
/// use drone_plugin_helper::args::directive::Directives;
///
/// let d: Directives = "--set-string,positional".parse().unwrap();
/// assert_eq!(d.name.as_deref(), Some("--set-string"));
/// assert!(d.positional);
/// assert!(!d.omit);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// Replacement for the derived flag name.
    pub name: Option<String>,
    /// The field never produces arguments.
    pub omit: bool,
    /// Emit the value without a preceding flag.
    pub positional: bool,
    /// A `false` boolean emits `--no-<flag>` instead of nothing.
    pub negate: bool,
}

impl Directives {
    /// Parse an optional tag; a missing tag yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::Unknown`] for unrecognised directives.
    pub fn parse(tag: Option<&str>) -> Result<Self, DirectiveError> {
        tag.map_or_else(|| Ok(Self::default()), str::parse::<Self>)
    }
}

impl FromStr for Directives {
    type Err = DirectiveError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let mut directives = Self::default();
        let mut parts = tag.split(',').map(str::trim);

        if let Some(name) = parts.next().filter(|name| !name.is_empty()) {
            directives.name = Some(name.to_string());
        }

        for part in parts {
            match part {
                "omit" => directives.omit = true,
                "no" => directives.negate = true,
                "positional" => directives.positional = true,
                other => return Err(DirectiveError::Unknown(other.to_string())),
            }
        }

        Ok(directives)
    }
}

/// Insert `no-` after the `--` prefix of a long flag.
///
/// Returns `None` when `flag` is not a long flag.
#[must_use]
pub fn negate_flag(flag: &str) -> Option<String> {
    flag.strip_prefix("--").map(|rest| format!("--no-{rest}"))
}
