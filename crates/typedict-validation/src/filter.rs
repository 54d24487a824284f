//! # Filters
//!
//! `filter` leaves delegate to a named string predicate. The value is
//! converted to its string form first ([`Value::to_text`]); values without
//! one, and null, are rejected before the filter runs.
//!
//! Built-in names: `email`, `url`, `ip`, `int`, `float`, `boolean`, plus
//! `regexp`, which takes its pattern from the spec's `regexp` option.

use std::fmt;
use std::net::IpAddr;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use typedict_core::{parse_bool_word, Value};

use crate::spec::SpecConfig;
use crate::validator::Validator;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";
const URL_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9+.-]*://[^\s/?#]+[^\s]*$";
const INT_PATTERN: &str = r"^[+-]?[0-9]+$";

/// A named string predicate.
pub trait Filter: fmt::Debug + Send + Sync {
    fn accepts(&self, text: &str) -> bool;
}

/// Adapts a closure into a [`Filter`].
pub struct FnFilter<F> {
    name: String,
    check: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter").field("name", &self.name).finish()
    }
}

impl<F> Filter for FnFilter<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn accepts(&self, text: &str) -> bool {
        (self.check)(text)
    }
}

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// Email addresses with a dotted domain part.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailFilter;

impl Filter for EmailFilter {
    fn accepts(&self, text: &str) -> bool {
        static RE: OnceLock<Option<Regex>> = OnceLock::new();
        compiled(&RE, EMAIL_PATTERN).is_some_and(|re| re.is_match(text))
    }
}

/// Absolute URLs with a scheme and host.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlFilter;

impl Filter for UrlFilter {
    fn accepts(&self, text: &str) -> bool {
        static RE: OnceLock<Option<Regex>> = OnceLock::new();
        compiled(&RE, URL_PATTERN).is_some_and(|re| re.is_match(text))
    }
}

/// IPv4 or IPv6 addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct IpFilter;

impl Filter for IpFilter {
    fn accepts(&self, text: &str) -> bool {
        text.parse::<IpAddr>().is_ok()
    }
}

/// Decimal integers without surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntFilter;

impl Filter for IntFilter {
    fn accepts(&self, text: &str) -> bool {
        static RE: OnceLock<Option<Regex>> = OnceLock::new();
        compiled(&RE, INT_PATTERN).is_some_and(|re| re.is_match(text))
            && text.parse::<i64>().is_ok()
    }
}

/// Finite decimal numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatFilter;

impl Filter for FloatFilter {
    fn accepts(&self, text: &str) -> bool {
        text == text.trim() && text.parse::<f64>().is_ok_and(f64::is_finite)
    }
}

/// Switch words: `yes`/`no`, `on`/`off`, `true`/`false`, `1`/`0`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanFilter;

impl Filter for BooleanFilter {
    fn accepts(&self, text: &str) -> bool {
        parse_bool_word(text).is_some()
    }
}

/// Look up a built-in filter by name.
pub fn builtin_filter(name: &str) -> Option<Arc<dyn Filter>> {
    let filter: Arc<dyn Filter> = match name {
        "email" => Arc::new(EmailFilter),
        "url" => Arc::new(UrlFilter),
        "ip" => Arc::new(IpFilter),
        "int" => Arc::new(IntFilter),
        "float" => Arc::new(FloatFilter),
        "boolean" => Arc::new(BooleanFilter),
        _ => return None,
    };
    Some(filter)
}

/// What a `filter` spec checks, resolved at spec construction.
#[derive(Debug, Clone)]
pub enum FilterCheck {
    Named(Arc<dyn Filter>),
    Pattern(Regex),
}

impl FilterCheck {
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(FilterCheck::Pattern)
    }

    fn accepts(&self, text: &str) -> bool {
        match self {
            FilterCheck::Named(filter) => filter.accepts(text),
            FilterCheck::Pattern(re) => re.is_match(text),
        }
    }
}

/// Validator behind every `filter` spec.
#[derive(Debug, Clone)]
pub struct FilterValidator {
    check: FilterCheck,
}

impl FilterValidator {
    pub fn new(check: FilterCheck) -> Self {
        Self { check }
    }
}

impl Validator for FilterValidator {
    fn validate(&self, value: &Value, _config: &SpecConfig) -> bool {
        if value.is_null() {
            return false;
        }
        value
            .to_text()
            .is_some_and(|text| self.check.accepts(&text))
    }
}
