//! Environment → record deserialization.
//!
//! [`extract`] turns `PLUGIN_`-prefixed environment entries into a [`Vars`]
//! map keyed by display-form identifiers (`PLUGIN_TLS_CERT_ID` →
//! `TLSCertID`); [`parse`] then writes those values into a record and hands
//! back whatever matched no field.
mod deserialize;

use std::collections::BTreeMap;

pub use deserialize::{Deserializer, parse_bool};

use crate::Error;
use crate::names::{Initialisms, NameError};
use crate::record::Record;

/// Prefix Drone puts in front of plugin settings.
pub const DEFAULT_PREFIX: &str = "PLUGIN_";

/// Normalized parameter keys mapped to their raw values.
pub type Vars = BTreeMap<String, String>;

/// Collect the entries whose key starts with `prefix` (case-sensitive),
/// strip the prefix and normalize the rest of the key to its display form.
///
/// # Examples
///
/// ```
/// use drone_plugin_helper::env::extract;
/// use drone_plugin_helper::names::Initialisms;
///
/// let vars = extract(
///     [("PLUGIN_TLS_CERT_ID", "abc"), ("HOME", "/root")],
///     "PLUGIN_",
///     Initialisms::common().unwrap(),
/// );
/// assert_eq!(vars.get("TLSCertID").map(String::as_str), Some("abc"));
/// assert_eq!(vars.len(), 1);
/// ```
pub fn extract<I, K, V>(entries: I, prefix: &str, initialisms: &Initialisms) -> Vars
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut vars = Vars::new();
    for (key, value) in entries {
        let Some(stripped) = key.as_ref().strip_prefix(prefix) else {
            continue;
        };
        let normalized = initialisms.display_form(stripped);
        if let Some(previous) = vars.insert(normalized.clone(), value.into()) {
            tracing::debug!(
                "{} overrides an earlier value for {normalized} ({previous:?})",
                key.as_ref()
            );
        }
    }
    vars
}

/// [`extract`] over `KEY=value` strings. Entries without `=` are ignored.
pub fn extract_lines<I, S>(lines: I, prefix: &str, initialisms: &Initialisms) -> Vars
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let pairs: Vec<(String, String)> = lines
        .into_iter()
        .filter_map(|line| {
            let (key, value) = line.as_ref().split_once('=')?;
            Some((key.to_string(), value.to_string()))
        })
        .collect();
    extract(pairs, prefix, initialisms)
}

/// [`extract`] over the current process environment.
///
/// Variables whose name or value is not valid Unicode are skipped.
///
/// # Errors
///
/// Returns [`NameError::Table`] if the shared initialism table is unusable.
pub fn from_process(prefix: &str) -> Result<Vars, NameError> {
    let entries = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
    Ok(extract(entries, prefix, Initialisms::common()?))
}

/// Deserialize `vars` into `record` using the shared initialism table,
/// returning the entries that matched no field.
///
/// # Errors
///
/// See [`Deserializer::parse`].
pub fn parse(vars: &Vars, record: &mut dyn Record) -> Result<Vars, Error> {
    Deserializer::new(Initialisms::common()?).parse(vars, record)
}
