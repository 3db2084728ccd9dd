//! Identifier casing and initialism handling.
//!
//! Field identifiers travel through three spellings:
//!
//! - `tls_cert_id`: the Rust field name (and, upper-cased, the
//!   `PLUGIN_TLS_CERT_ID` environment key)
//! - `TLSCertID`: the display form both engines match against
//! - `tls-cert-id`: the command-line flag spelling
//!
//! [`Initialisms`] owns the table of known all-caps abbreviations and every
//! conversion between those spellings.
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Initialisms recognised by [`Initialisms::common`].
///
/// Order matters: when two entries share a prefix (`HTTP`/`HTTPS`) the
/// earlier one is tried first.
pub const COMMON_INITIALISMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP",
    "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS", "TTL",
    "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XMPP", "XSRF", "XSS",
];

/// A capitalised word: one ASCII uppercase letter and at least one
/// non-uppercase character after it.
const WORD_TERM: &str = "[[:upper:]][^[:upper:]]+";

static COMMON: LazyLock<Result<Initialisms, NameError>> =
    LazyLock::new(|| Initialisms::new(COMMON_INITIALISMS.iter().copied()));

/// Errors raised while converting identifiers between spellings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The identifier cannot be decomposed into capitalised words and
    /// initialisms.
    #[error("{0:?} does not match expected naming pattern")]
    Pattern(String),

    /// The identifier cannot be decomposed into initialisms alone.
    #[error("{0:?} does not match initialism pattern")]
    InitialismPattern(String),

    /// The initialism table could not be compiled into a matcher.
    #[error("invalid initialism table: {0}")]
    Table(String),
}

/// An immutable table of known initialisms plus the matchers built from it.
#[derive(Debug, Clone)]
pub struct Initialisms {
    known: HashSet<String>,
    terms_re: Regex,
    initialisms_re: Regex,
}

impl Initialisms {
    /// Build a table from the given initialisms.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Table`] if the matchers cannot be compiled.
    pub fn new<'a>(initialisms: impl IntoIterator<Item = &'a str>) -> Result<Self, NameError> {
        let list: Vec<String> = initialisms
            .into_iter()
            .map(|s| s.to_ascii_uppercase())
            .collect();
        let alternatives = list
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");

        let terms_re = Regex::new(&format!("^({WORD_TERM}|(?i:{alternatives}))+$"))
            .map_err(|e| NameError::Table(e.to_string()))?;
        let initialisms_re = Regex::new(&format!("^(?i:({alternatives}))+$"))
            .map_err(|e| NameError::Table(e.to_string()))?;

        Ok(Self {
            known: list.into_iter().collect(),
            terms_re,
            initialisms_re,
        })
    }

    /// The shared table built from [`COMMON_INITIALISMS`].
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Table`] if the built-in table failed to compile.
    pub fn common() -> Result<&'static Self, NameError> {
        COMMON.as_ref().map_err(Clone::clone)
    }

    /// Whether `term` is a single known initialism, ignoring case.
    ///
    /// Concatenations such as `"XMLID"` are not initialisms; see
    /// [`split_initialisms`](Self::split_initialisms).
    ///
    /// # Examples
    ///
    /// ```
    /// use drone_plugin_helper::names::Initialisms;
    ///
    /// let table = Initialisms::common().unwrap();
    /// assert!(table.is_initialism("Http"));
    /// assert!(!table.is_initialism("nope"));
    /// ```
    #[must_use]
    pub fn is_initialism(&self, term: &str) -> bool {
        self.known.contains(&term.to_uppercase())
    }

    /// Split an identifier made of capitalised words and initialisms into its
    /// terms.
    ///
    /// # Examples
    ///
    /// ```
    /// use drone_plugin_helper::names::Initialisms;
    ///
    /// let table = Initialisms::common().unwrap();
    /// assert_eq!(table.split("TLSCertID").unwrap(), ["TLS", "Cert", "ID"]);
    /// assert!(table.split("nope").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Pattern`] if any part of `input` is neither a
    /// capitalised word nor an initialism.
    pub fn split(&self, input: &str) -> Result<Vec<String>, NameError> {
        trim_terms(&self.terms_re, input).ok_or_else(|| NameError::Pattern(input.to_string()))
    }

    /// Split a run of concatenated initialisms (`"XMLID"` → `["XML", "ID"]`),
    /// preserving the input's case.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::InitialismPattern`] if `input` is not made up
    /// entirely of known initialisms.
    pub fn split_initialisms(&self, input: &str) -> Result<Vec<String>, NameError> {
        trim_terms(&self.initialisms_re, input)
            .ok_or_else(|| NameError::InitialismPattern(input.to_string()))
    }

    /// Build the display form of an underscore-delimited identifier.
    ///
    /// Initialism segments are upper-cased, all others title-cased.
    ///
    /// # Examples
    ///
    /// ```
    /// use drone_plugin_helper::names::Initialisms;
    ///
    /// let table = Initialisms::common().unwrap();
    /// assert_eq!(table.display_form("xml_cert_id"), "XMLCertID");
    /// assert_eq!(table.display_form("ONE"), "One");
    /// ```
    #[must_use]
    pub fn display_form(&self, input: &str) -> String {
        input
            .split('_')
            .map(|segment| {
                if self.is_initialism(segment) {
                    segment.to_uppercase()
                } else {
                    title_case(segment)
                }
            })
            .collect()
    }

    /// Build the flag spelling (without any `--` prefix) of a display-form
    /// identifier: `"TLSCertID"` → `"tls-cert-id"`.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::Pattern`] if the identifier cannot be split.
    pub fn flag_name(&self, identifier: &str) -> Result<String, NameError> {
        Ok(join_flag_terms(&self.split(identifier)?))
    }
}

/// Lower-case each term and join them with hyphens.
#[must_use]
pub fn join_flag_terms<S: AsRef<str>>(terms: &[S]) -> String {
    terms
        .iter()
        .map(|t| t.as_ref().to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

/// Repeatedly match `re` against the remaining input and trim the last
/// matched term from its end.
///
/// A capture group inside a repetition only reports its final iteration, so
/// the terms are collected back to front and reversed at the end. Whatever
/// decomposition the leftmost-first regex semantics settle on wins.
fn trim_terms(re: &Regex, input: &str) -> Option<Vec<String>> {
    let mut rest = input;
    let mut terms = Vec::new();
    while !rest.is_empty() {
        let last = re.captures(rest)?.get(1)?;
        terms.push(last.as_str().to_string());
        rest = rest.get(..last.start())?;
    }
    terms.reverse();
    Some(terms)
}
