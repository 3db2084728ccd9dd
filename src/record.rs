//! Schema descriptors for the records the engines walk.
//!
//! A record is a plain struct whose fields are declared through the
//! [`record!`](crate::record!) macro. The macro implements [`Record`], which
//! hands the engines an ordered list of field descriptors (name, tag, value
//! accessor), and [`FieldValue`], so the record can itself be nested inside
//! another record.
//!
//! Leaf values are booleans, integers and `String`s. Any field may be wrapped
//! in one or more `Option`s: `None` is "never set", `Some(0)` is "explicitly
//! set to zero".
use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::Error;

/// A struct the engines can read from and write into.
///
/// Implementations are generated by [`record!`](crate::record!).
pub trait Record {
    /// Name of the record type, used in error messages.
    fn type_name(&self) -> &'static str;

    /// Read access to every field, in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Write access to every field, in declaration order.
    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;
}

/// Read-side descriptor of one field.
#[derive(Clone, Copy)]
pub struct Field<'a> {
    /// Field name as declared (`tls_cert_id`).
    pub name: &'static str,
    /// Raw tag string, if the declaration carries one.
    pub tag: Option<&'static str>,
    /// The field's value.
    pub value: &'a dyn FieldValue,
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// Write-side descriptor of one field.
pub struct FieldMut<'a> {
    /// Field name as declared (`tls_cert_id`).
    pub name: &'static str,
    /// Raw tag string, if the declaration carries one.
    pub tag: Option<&'static str>,
    /// The field's value.
    pub value: &'a mut dyn FieldValue,
}

impl fmt::Debug for FieldMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMut")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// A leaf value as seen by the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar<'a> {
    /// `bool`
    Bool(bool),
    /// Any signed integer, widened.
    Signed(i128),
    /// Any unsigned integer, widened.
    Unsigned(u128),
    /// `String`
    Text(&'a str),
}

/// A leaf slot as seen by the deserializer.
#[derive(Debug)]
#[allow(missing_docs)]
pub enum ScalarMut<'a> {
    Bool(&'a mut bool),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    I128(&'a mut i128),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    U128(&'a mut u128),
    Usize(&'a mut usize),
    Text(&'a mut String),
}

/// Read view of a field value.
pub enum FieldView<'a> {
    /// A leaf. `indirect` is set when the value sits behind a `Some`.
    Scalar {
        /// Current value.
        value: Scalar<'a>,
        /// Whether the value was reached through a present `Option`.
        indirect: bool,
    },
    /// A nested record whose fields are flattened in place.
    Nested(&'a dyn Record),
    /// An unset `Option`.
    Absent,
    /// A type the engines refuse to marshal.
    Unsupported(&'static str),
}

impl fmt::Debug for FieldView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar { value, indirect } => f
                .debug_struct("Scalar")
                .field("value", value)
                .field("indirect", indirect)
                .finish(),
            Self::Nested(record) => f.debug_tuple("Nested").field(&record.type_name()).finish(),
            Self::Absent => f.write_str("Absent"),
            Self::Unsupported(name) => f.debug_tuple("Unsupported").field(name).finish(),
        }
    }
}

/// Write view of a field value.
pub enum FieldViewMut<'a> {
    /// A leaf slot.
    Scalar(ScalarMut<'a>),
    /// A nested record.
    Nested(&'a mut dyn Record),
    /// An `Option` whose pointee is created on first write.
    Optional(&'a mut dyn OptionalField),
    /// A type the engines refuse to marshal.
    Unsupported(&'static str),
}

impl fmt::Debug for FieldViewMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(slot) => f.debug_tuple("Scalar").field(slot).finish(),
            Self::Nested(record) => f.debug_tuple("Nested").field(&record.type_name()).finish(),
            Self::Optional(_) => f.write_str("Optional"),
            Self::Unsupported(name) => f.debug_tuple("Unsupported").field(name).finish(),
        }
    }
}

/// Callback run against the pointee of an [`OptionalField`]; returns whether
/// it wrote a value.
pub type FillFn<'f> = dyn FnMut(FieldViewMut<'_>) -> Result<bool, Error> + 'f;

/// An optional slot that materialises its pointee only when written.
pub trait OptionalField {
    /// Run `visit` against the pointee.
    ///
    /// When the slot is empty a default pointee is created for the visit and
    /// kept only if `visit` reports a write.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `visit`.
    fn fill(&mut self, visit: &mut FillFn<'_>) -> Result<bool, Error>;
}

/// A value that can sit in a record field.
pub trait FieldValue {
    /// Read view of the value.
    fn view(&self) -> FieldView<'_>;

    /// Write view of the value.
    fn view_mut(&mut self) -> FieldViewMut<'_>;
}

macro_rules! scalar_field {
    ($($ty:ty => $variant:ident, $view:ident($widen:expr)),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn view(&self) -> FieldView<'_> {
                    FieldView::Scalar {
                        value: Scalar::$view($widen(*self)),
                        indirect: false,
                    }
                }

                fn view_mut(&mut self) -> FieldViewMut<'_> {
                    FieldViewMut::Scalar(ScalarMut::$variant(self))
                }
            }
        )*
    };
}

#[allow(clippy::cast_lossless)]
const fn widen_isize(v: isize) -> i128 {
    v as i128
}

#[allow(clippy::cast_lossless)]
const fn widen_usize(v: usize) -> u128 {
    v as u128
}

scalar_field! {
    bool => Bool, Bool(std::convert::identity),
    i8 => I8, Signed(i128::from),
    i16 => I16, Signed(i128::from),
    i32 => I32, Signed(i128::from),
    i64 => I64, Signed(i128::from),
    i128 => I128, Signed(std::convert::identity),
    isize => Isize, Signed(widen_isize),
    u8 => U8, Unsigned(u128::from),
    u16 => U16, Unsigned(u128::from),
    u32 => U32, Unsigned(u128::from),
    u64 => U64, Unsigned(u128::from),
    u128 => U128, Unsigned(std::convert::identity),
    usize => Usize, Unsigned(widen_usize),
}

impl FieldValue for String {
    fn view(&self) -> FieldView<'_> {
        FieldView::Scalar {
            value: Scalar::Text(self),
            indirect: false,
        }
    }

    fn view_mut(&mut self) -> FieldViewMut<'_> {
        FieldViewMut::Scalar(ScalarMut::Text(self))
    }
}

impl<T: FieldValue + Default> FieldValue for Option<T> {
    fn view(&self) -> FieldView<'_> {
        match self {
            None => FieldView::Absent,
            Some(inner) => match inner.view() {
                FieldView::Scalar { value, .. } => FieldView::Scalar {
                    value,
                    indirect: true,
                },
                other => other,
            },
        }
    }

    fn view_mut(&mut self) -> FieldViewMut<'_> {
        FieldViewMut::Optional(self)
    }
}

impl<T: FieldValue + Default> OptionalField for Option<T> {
    fn fill(&mut self, visit: &mut FillFn<'_>) -> Result<bool, Error> {
        if let Some(inner) = self {
            return visit(inner.view_mut());
        }
        let mut fresh = T::default();
        let written = visit(fresh.view_mut())?;
        if written {
            tracing::debug!("allocated {} on first write", type_name::<T>());
            *self = Some(fresh);
        }
        Ok(written)
    }
}

macro_rules! unsupported_field {
    ($([$($generics:tt)*] $ty:ty),* $(,)?) => {
        $(
            impl<$($generics)*> FieldValue for $ty {
                fn view(&self) -> FieldView<'_> {
                    FieldView::Unsupported(type_name::<Self>())
                }

                fn view_mut(&mut self) -> FieldViewMut<'_> {
                    FieldViewMut::Unsupported(type_name::<Self>())
                }
            }
        )*
    };
}

// Declared so records holding them still compile; marshaling them is a
// schema error.
unsupported_field! {
    [] f32,
    [] f64,
    [] char,
    [T] Vec<T>,
    [K, V] BTreeMap<K, V>,
    [K, V, S] HashMap<K, V, S>,
}

/// Declare a struct together with its [`Record`] and [`FieldValue`]
/// implementations.
///
/// Each field may carry a tag after its type (`= "--name,no,positional,omit"`)
/// that steers serialization; see [`Directives`](crate::args::directive::Directives).
/// Fields whose type is itself a record are flattened in place.
///
/// # Examples
///
/// ```
/// use drone_plugin_helper::record;
///
/// record! {
///     #[derive(Debug, Default)]
///     pub struct Params {
///         pub dry_run: bool = "--dry-run,no",
///         pub timeout: Option<u32>,
///         pub chart: String = ",positional",
///     }
/// }
///
/// let params = Params {
///     dry_run: false,
///     timeout: Some(0),
///     chart: "stable/nginx".to_string(),
/// };
/// let args = drone_plugin_helper::args::to_args(&params).unwrap();
/// assert_eq!(args, ["--no-dry-run", "--timeout", "0", "stable/nginx"]);
/// ```
#[macro_export]
macro_rules! record {
    (@tag) => {
        ::core::option::Option::None
    };
    (@tag $tag:literal) => {
        ::core::option::Option::Some($tag)
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(= $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::record::Record for $name {
            fn type_name(&self) -> &'static str {
                stringify!($name)
            }

            fn fields(&self) -> ::std::vec::Vec<$crate::record::Field<'_>> {
                ::std::vec![
                    $(
                        $crate::record::Field {
                            name: stringify!($field),
                            tag: $crate::record!(@tag $($tag)?),
                            value: &self.$field,
                        },
                    )*
                ]
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<$crate::record::FieldMut<'_>> {
                ::std::vec![
                    $(
                        $crate::record::FieldMut {
                            name: stringify!($field),
                            tag: $crate::record!(@tag $($tag)?),
                            value: &mut self.$field,
                        },
                    )*
                ]
            }
        }

        impl $crate::record::FieldValue for $name {
            fn view(&self) -> $crate::record::FieldView<'_> {
                $crate::record::FieldView::Nested(self)
            }

            fn view_mut(&mut self) -> $crate::record::FieldViewMut<'_> {
                $crate::record::FieldViewMut::Nested(self)
            }
        }
    };
}
