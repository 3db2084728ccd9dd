//! Record → command-line serialization.
//!
//! Fields are visited depth-first in declaration order, nested records
//! flattened in place. Each leaf produces zero, one or two arguments:
//!
//! | value                         | arguments            |
//! |-------------------------------|----------------------|
//! | `true`                        | `--flag`             |
//! | `false` with `no`             | `--no-flag`          |
//! | `false`                       | nothing              |
//! | `0` / `""`                    | nothing              |
//! | `Some(0)` / `Some("")`        | `--flag 0` / `--flag ""` |
//! | non-zero / non-empty          | `--flag value`       |
//!
//! `positional` drops the flag for integers and text; `omit` drops the field.
pub mod directive;

use crate::Error;
use crate::error::SchemaError;
use crate::names::Initialisms;
use crate::record::{Field, FieldView, Record, Scalar};

use directive::{Directives, negate_flag};

/// Prefix put in front of derived flag names.
pub const FLAG_PREFIX: &str = "--";

/// Serialize `record` into arguments using the shared initialism table.
///
/// # Errors
///
/// Returns [`Error::Schema`] when the record declaration cannot be
/// serialized (unsplittable field name, bad tag, unsupported type).
pub fn to_args(record: &dyn Record) -> Result<Vec<String>, Error> {
    Serializer::new(Initialisms::common()?).serialize(record)
}

/// Turns records into argument vectors.
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'i> {
    initialisms: &'i Initialisms,
}

/// Directives resolved for one leaf field.
#[derive(Debug)]
struct FlagSpec {
    flag: String,
    directives: Directives,
}

impl<'i> Serializer<'i> {
    /// Create a serializer that derives flag names with `initialisms`.
    #[must_use]
    pub const fn new(initialisms: &'i Initialisms) -> Self {
        Self { initialisms }
    }

    /// Serialize `record` into arguments.
    ///
    /// The record is only read; the same values always produce the same
    /// arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] on the first field that cannot be
    /// serialized. No partial output is returned.
    pub fn serialize(&self, record: &dyn Record) -> Result<Vec<String>, Error> {
        let mut args = Vec::new();
        self.append(record, &mut args)?;
        Ok(args)
    }

    fn append(&self, record: &dyn Record, args: &mut Vec<String>) -> Result<(), SchemaError> {
        let owner = record.type_name();
        for field in record.fields() {
            match field.value.view() {
                FieldView::Nested(inner) => self.append(inner, args)?,
                FieldView::Absent => {}
                FieldView::Scalar { value, indirect } => {
                    let spec = self.resolve(owner, &field)?;
                    if !spec.directives.omit {
                        emit(owner, &field, &spec, value, indirect, args)?;
                    }
                }
                FieldView::Unsupported(type_name) => {
                    let spec = self.resolve(owner, &field)?;
                    if !spec.directives.omit {
                        return Err(SchemaError::UnsupportedType {
                            record: owner,
                            field: field.name,
                            type_name,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Parse the field's tag and settle on its flag, deriving one from the
    /// field name when the tag does not override it.
    fn resolve(&self, owner: &'static str, field: &Field<'_>) -> Result<FlagSpec, SchemaError> {
        let directives = Directives::parse(field.tag).map_err(|source| SchemaError::Tag {
            record: owner,
            field: field.name,
            source,
        })?;

        let flag = match &directives.name {
            Some(name) => name.clone(),
            None => {
                let identifier = self.initialisms.display_form(field.name);
                let name = self.initialisms.flag_name(&identifier).map_err(|source| {
                    SchemaError::Identifier {
                        record: owner,
                        field: field.name,
                        source,
                    }
                })?;
                format!("{FLAG_PREFIX}{name}")
            }
        };

        Ok(FlagSpec { flag, directives })
    }
}

fn emit(
    owner: &'static str,
    field: &Field<'_>,
    spec: &FlagSpec,
    value: Scalar<'_>,
    indirect: bool,
    args: &mut Vec<String>,
) -> Result<(), SchemaError> {
    let rendered = match value {
        Scalar::Bool(true) => {
            args.push(spec.flag.clone());
            return Ok(());
        }
        Scalar::Bool(false) => {
            if spec.directives.negate {
                let negated = negate_flag(&spec.flag).ok_or_else(|| SchemaError::Negation {
                    record: owner,
                    field: field.name,
                    flag: spec.flag.clone(),
                })?;
                args.push(negated);
            }
            return Ok(());
        }
        Scalar::Signed(n) if n != 0 || indirect => n.to_string(),
        Scalar::Unsigned(n) if n != 0 || indirect => n.to_string(),
        Scalar::Text(s) if !s.is_empty() || indirect => s.to_string(),
        Scalar::Signed(_) | Scalar::Unsigned(_) | Scalar::Text(_) => return Ok(()),
    };

    if !spec.directives.positional {
        args.push(spec.flag.clone());
    }
    args.push(rendered);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    crate::record! {
        #[derive(Debug, Default)]
        struct Toggle {
            flag: bool = "--flag,no",
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Counts {
            plain: i32,
            optional: Option<u64>,
            deep: Option<Option<i8>>,
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Shared {
            debug: bool,
            host: String,
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Command {
            first: String = ",positional",
            shared: Shared,
            tls_cert_id: String,
            hidden: String = ",omit",
            last: u16 = ",positional",
        }
    }

    fn serialize(record: &dyn Record) -> Result<Vec<String>, Error> {
        Serializer::new(Initialisms::common().unwrap()).serialize(record)
    }

    // -----------------------------------------------------------------------
    // Booleans
    // -----------------------------------------------------------------------

    #[test]
    fn negatable_bool_false_emits_negated_flag() {
        let args = serialize(&Toggle { flag: false }).unwrap();
        assert_eq!(args, ["--no-flag"]);
    }

    #[test]
    fn negatable_bool_true_emits_flag() {
        let args = serialize(&Toggle { flag: true }).unwrap();
        assert_eq!(args, ["--flag"]);
    }

    #[test]
    fn plain_bool_false_emits_nothing() {
        let args = serialize(&Shared::default()).unwrap();
        assert!(args.is_empty());
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct ShortFlag {
            wait: bool = "-w,no",
        }
    }

    #[test]
    fn negating_short_flag_is_schema_error() {
        let err = serialize(&ShortFlag { wait: false }).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::Negation { ref flag, .. }) if flag == "-w"
        ));
        // True never needs negation.
        assert_eq!(serialize(&ShortFlag { wait: true }).unwrap(), ["-w"]);
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct PositionalBool {
            force: bool = ",positional",
        }
    }

    #[test]
    fn positional_bool_still_emits_flag() {
        let args = serialize(&PositionalBool { force: true }).unwrap();
        assert_eq!(args, ["--force"]);
    }

    // -----------------------------------------------------------------------
    // Presence rules
    // -----------------------------------------------------------------------

    #[test]
    fn zero_integer_emits_nothing() {
        assert!(serialize(&Counts::default()).unwrap().is_empty());
    }

    #[test]
    fn present_zero_emits_flag_and_value() {
        let counts = Counts {
            plain: 0,
            optional: Some(0),
            deep: None,
        };
        assert_eq!(serialize(&counts).unwrap(), ["--optional", "0"]);
    }

    #[test]
    fn multiple_indirections_count_as_present() {
        let counts = Counts {
            plain: -3,
            optional: None,
            deep: Some(Some(0)),
        };
        assert_eq!(
            serialize(&counts).unwrap(),
            ["--plain", "-3", "--deep", "0"]
        );
    }

    #[test]
    fn inner_none_counts_as_absent() {
        let counts = Counts {
            deep: Some(None),
            ..Counts::default()
        };
        assert!(serialize(&counts).unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Ordering, nesting, positional, omit
    // -----------------------------------------------------------------------

    #[test]
    fn nested_fields_flatten_in_declaration_order() {
        let command = Command {
            first: "get".to_string(),
            shared: Shared {
                debug: true,
                host: "tiller:44134".to_string(),
            },
            tls_cert_id: "abc".to_string(),
            hidden: "secret".to_string(),
            last: 7,
        };
        assert_eq!(
            serialize(&command).unwrap(),
            [
                "get",
                "--debug",
                "--host",
                "tiller:44134",
                "--tls-cert-id",
                "abc",
                "7"
            ]
        );
    }

    #[test]
    fn serialization_is_deterministic() {
        let command = Command {
            first: "x".to_string(),
            last: 1,
            ..Command::default()
        };
        assert_eq!(serialize(&command).unwrap(), serialize(&command).unwrap());
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Renamed {
            dummy: String = "--override",
        }
    }

    #[test]
    fn tag_overrides_flag_name() {
        let renamed = Renamed {
            dummy: "v".to_string(),
        };
        assert_eq!(serialize(&renamed).unwrap(), ["--override", "v"]);
    }

    // -----------------------------------------------------------------------
    // Schema errors
    // -----------------------------------------------------------------------

    crate::record! {
        #[derive(Debug, Default)]
        struct BadName {
            cert_a: String,
        }
    }

    #[test]
    fn unsplittable_name_is_schema_error() {
        let err = serialize(&BadName::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::Identifier {
                field: "cert_a",
                ..
            })
        ));
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct BadTag {
            value: String = ",bogus",
        }
    }

    #[test]
    fn unknown_directive_is_schema_error() {
        let err = serialize(&BadTag::default()).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::Tag { .. })));
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Floats {
            ratio: f64,
            skipped: f32 = ",omit",
            unset: Option<f64>,
        }
    }

    #[test]
    fn unsupported_type_is_schema_error() {
        let err = serialize(&Floats::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::UnsupportedType {
                record: "Floats",
                field: "ratio",
                type_name: "f64"
            })
        ));
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct OmittedFloat {
            skipped: f32 = ",omit",
        }
    }

    #[test]
    fn omitted_unsupported_type_is_skipped() {
        assert!(serialize(&OmittedFloat::default()).unwrap().is_empty());
    }

    #[test]
    fn to_args_uses_common_table() {
        let toggle = Toggle { flag: true };
        assert_eq!(to_args(&toggle).unwrap(), ["--flag"]);
    }
}
