use std::any::type_name;
use std::num::ParseIntError;
use std::str::FromStr;

use super::Vars;
use crate::Error;
use crate::error::{ConversionError, SchemaError};
use crate::names::Initialisms;
use crate::record::{FieldViewMut, Record, ScalarMut};

/// Writes [`Vars`] into records.
///
/// A key matches a leaf field when it equals the display form of the field
/// name (`tls_cert_id` ↔ `TLSCertID`). The search is depth-first in
/// declaration order through nested records and `Option`s; the first match
/// wins, so no two reachable fields may share a display form.
#[derive(Debug, Clone, Copy)]
pub struct Deserializer<'i> {
    initialisms: &'i Initialisms,
}

/// Why a raw value was rejected, before field context is attached.
enum Rejection {
    Bool,
    Number {
        expected: &'static str,
        reason: ParseIntError,
    },
}

/// Identifies the entry being written and the field it landed on.
struct Target<'a> {
    key: &'a str,
    raw: &'a str,
    owner: &'static str,
    field: &'static str,
}

impl<'i> Deserializer<'i> {
    /// Create a deserializer that matches keys with `initialisms`.
    #[must_use]
    pub const fn new(initialisms: &'i Initialisms) -> Self {
        Self { initialisms }
    }

    /// Write every entry of `vars` into the matching field of `record`.
    ///
    /// Returns the entries that matched no field, keys and values untouched.
    /// The caller holds `record` exclusively for the duration of the call.
    ///
    /// # Errors
    ///
    /// - [`Error::Conversion`] when a value does not fit its field
    /// - [`Error::Schema`] when a key matches a field of unsupported type
    ///
    /// Processing stops at the first error. Entries handled before it stay
    /// written; start from a fresh record when that matters.
    pub fn parse(&self, vars: &Vars, record: &mut dyn Record) -> Result<Vars, Error> {
        let mut unused = Vars::new();
        for (key, raw) in vars {
            if self.assign_record(record, key, raw)? {
                tracing::debug!("{key} → {}", record.type_name());
            } else {
                unused.insert(key.clone(), raw.clone());
            }
        }
        Ok(unused)
    }

    fn assign_record(&self, record: &mut dyn Record, key: &str, raw: &str) -> Result<bool, Error> {
        let owner = record.type_name();
        for field in record.fields_mut() {
            let name = field.name;
            if self.assign_field(field.value.view_mut(), owner, name, key, raw)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn assign_field(
        &self,
        view: FieldViewMut<'_>,
        owner: &'static str,
        name: &'static str,
        key: &str,
        raw: &str,
    ) -> Result<bool, Error> {
        match view {
            FieldViewMut::Nested(inner) => self.assign_record(inner, key, raw),
            FieldViewMut::Optional(slot) => {
                slot.fill(&mut |inner| self.assign_field(inner, owner, name, key, raw))
            }
            FieldViewMut::Scalar(slot) => {
                if !self.matches(name, key) {
                    return Ok(false);
                }
                let target = Target {
                    key,
                    raw,
                    owner,
                    field: name,
                };
                store(slot, raw).map_err(|rejection| target.conversion_error(rejection))?;
                Ok(true)
            }
            FieldViewMut::Unsupported(type_name) => {
                if !self.matches(name, key) {
                    return Ok(false);
                }
                Err(SchemaError::UnsupportedType {
                    record: owner,
                    field: name,
                    type_name,
                }
                .into())
            }
        }
    }

    fn matches(&self, name: &str, key: &str) -> bool {
        self.initialisms.display_form(name) == key
    }
}

impl Target<'_> {
    fn conversion_error(&self, rejection: Rejection) -> ConversionError {
        match rejection {
            Rejection::Bool => ConversionError::Bool {
                key: self.key.to_string(),
                record: self.owner,
                field: self.field,
                value: self.raw.to_string(),
            },
            Rejection::Number { expected, reason } => ConversionError::Number {
                key: self.key.to_string(),
                record: self.owner,
                field: self.field,
                value: self.raw.to_string(),
                expected,
                reason: reason.to_string(),
            },
        }
    }
}

/// Interpret a truth value: `true`/`on`/`yes`/`1` or `false`/`off`/`no`/`0`,
/// ignoring case.
///
/// # Examples
///
/// ```
/// use drone_plugin_helper::env::parse_bool;
///
/// assert_eq!(parse_bool("Yes"), Some(true));
/// assert_eq!(parse_bool("0"), Some(false));
/// assert_eq!(parse_bool("bogus"), None);
/// ```
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn number<T: FromStr<Err = ParseIntError>>(raw: &str) -> Result<T, Rejection> {
    raw.parse().map_err(|reason| Rejection::Number {
        expected: type_name::<T>(),
        reason,
    })
}

fn store(slot: ScalarMut<'_>, raw: &str) -> Result<(), Rejection> {
    match slot {
        ScalarMut::Bool(v) => *v = parse_bool(raw).ok_or(Rejection::Bool)?,
        ScalarMut::I8(v) => *v = number(raw)?,
        ScalarMut::I16(v) => *v = number(raw)?,
        ScalarMut::I32(v) => *v = number(raw)?,
        ScalarMut::I64(v) => *v = number(raw)?,
        ScalarMut::I128(v) => *v = number(raw)?,
        ScalarMut::Isize(v) => *v = number(raw)?,
        ScalarMut::U8(v) => *v = number(raw)?,
        ScalarMut::U16(v) => *v = number(raw)?,
        ScalarMut::U32(v) => *v = number(raw)?,
        ScalarMut::U64(v) => *v = number(raw)?,
        ScalarMut::U128(v) => *v = number(raw)?,
        ScalarMut::Usize(v) => *v = number(raw)?,
        ScalarMut::Text(v) => raw.clone_into(v),
    }
    Ok(())
}
