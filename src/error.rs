//! Error types for the marshaling engine and the plugin runner.
//!
//! Internal modules return typed errors (e.g., [`SchemaError`],
//! [`ConversionError`]) which aggregate into [`Error`]. The `drone-helm`
//! binary converts them to [`anyhow::Error`] at the CLI boundary via the
//! standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! Error
//! ├── Names(NameError)            # initialism table could not be built
//! ├── Schema(SchemaError)         # mistakes in a record declaration
//! ├── Conversion(ConversionError) # bad values in the environment
//! ├── Unused                      # strict mode found unmatched parameters
//! ├── UnknownCommand              # no record registered for the command
//! └── Launch                      # the wrapped program could not start
//! ```
//!
//! Schema errors are programming mistakes and should abort startup;
//! conversion errors describe bad user input and name the offending value.
use thiserror::Error;

use crate::args::directive::DirectiveError;
use crate::names::NameError;

/// Top-level error type for the engine and runner.
#[derive(Error, Debug)]
pub enum Error {
    /// The initialism table could not be built.
    #[error(transparent)]
    Names(#[from] NameError),

    /// A record declaration cannot be marshaled.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A parameter value could not be converted to its field type.
    #[error("Invalid parameter: {0}")]
    Conversion(#[from] ConversionError),

    /// Strict mode rejected parameters that matched no field.
    #[error("Unrecognized parameters: {}", .0.join(", "))]
    Unused(Vec<String>),

    /// No parameter record is registered for the requested command.
    #[error("Command '{0}' not recognized")]
    UnknownCommand(String),

    /// The wrapped program could not be started.
    #[error("Failed to launch {program}: {source}")]
    Launch {
        /// Program that was being launched.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from how a record is declared rather than from the data
/// flowing through it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A flag name could not be derived from the field's identifier.
    #[error("cannot derive a flag for {record}.{field}: {source}")]
    Identifier {
        /// Record type declaring the field.
        record: &'static str,
        /// Field name as declared.
        field: &'static str,
        /// Why the identifier could not be split.
        source: NameError,
    },

    /// The field's tag could not be parsed.
    #[error("invalid tag on {record}.{field}: {source}")]
    Tag {
        /// Record type declaring the field.
        record: &'static str,
        /// Field name as declared.
        field: &'static str,
        /// Parse failure.
        source: DirectiveError,
    },

    /// The field holds a type the engine cannot marshal.
    #[error("unsupported field type {type_name} for {record}.{field}")]
    UnsupportedType {
        /// Record type declaring the field.
        record: &'static str,
        /// Field name as declared.
        field: &'static str,
        /// Rust type of the field.
        type_name: &'static str,
    },

    /// A `no` directive was put on a flag without a `--` prefix.
    #[error("unable to negate boolean flag {flag:?} on {record}.{field}")]
    Negation {
        /// Record type declaring the field.
        record: &'static str,
        /// Field name as declared.
        field: &'static str,
        /// Flag that could not be negated.
        flag: String,
    },
}

/// Errors that arise when an environment value does not fit its field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The value is not one of the recognised truth values.
    #[error("cannot parse {value:?} for {key} as bool ({record}.{field})")]
    Bool {
        /// Parameter key that carried the value.
        key: String,
        /// Record type declaring the field.
        record: &'static str,
        /// Field name as declared.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The value is not a base-10 integer within the field's range.
    #[error("cannot parse {value:?} for {key} into {record}.{field} of type {expected}: {reason}")]
    Number {
        /// Parameter key that carried the value.
        key: String,
        /// Record type declaring the field.
        record: &'static str,
        /// Field name as declared.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Integer type of the field.
        expected: &'static str,
        /// Parser diagnostic.
        reason: String,
    },
}
