//! Named field validators.
//!
//! Validators live in a [`ValidatorRegistry`] built once at startup and
//! handed to every form. Fields refer to them by name; an entry such as
//! `maxlength-35` names the `maxlength` validator and passes `["35"]` as its
//! arguments.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{FormError, Result};
use crate::form::FormContext;

/// Trait for field validators.
///
/// Any `Fn(&str, &[String]) -> bool` closure is a validator.
pub trait Validator: Send + Sync {
    /// Returns whether `value` passes. Errors are reserved for
    /// misconfiguration and are never a validation failure.
    fn check(&self, value: &str, args: &[String], ctx: &FormContext<'_>) -> Result<bool>;
}

impl<F> Validator for F
where
    F: Fn(&str, &[String]) -> bool + Send + Sync,
{
    fn check(&self, value: &str, args: &[String], _ctx: &FormContext<'_>) -> Result<bool> {
        Ok(self(value, args))
    }
}

/// Verifies anti-forgery tokens through the injected capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonceValidator;

impl Validator for NonceValidator {
    fn check(&self, value: &str, _args: &[String], ctx: &FormContext<'_>) -> Result<bool> {
        let provider = ctx.anti_forgery.ok_or(FormError::AntiForgeryUnavailable)?;
        Ok(provider.verify(value))
    }
}

/// One entry of a field's validator chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorRef {
    /// Registry key.
    pub name: String,
    /// Arguments passed to the predicate, in order.
    pub args: Vec<String>,
}

impl ValidatorRef {
    /// Parses a `name-arg1-arg2` chain entry.
    pub fn parse(entry: &str) -> Self {
        let mut parts = entry.split('-').map(str::to_string);
        let name = parts.next().unwrap_or_default();
        Self {
            name,
            args: parts.collect(),
        }
    }
}

impl fmt::Display for ValidatorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, "-{arg}")?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Entry {
    validator: Option<Box<dyn Validator>>,
    message: Option<String>,
}

/// Mapping from validator name to predicate and error message.
#[derive(Default)]
pub struct ValidatorRegistry {
    entries: HashMap<String, Entry>,
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("ValidatorRegistry")
            .field("validators", &names)
            .finish()
    }
}

impl ValidatorRegistry {
    /// Message used when a validator has none registered.
    pub const FALLBACK_MESSAGE: &'static str = "This value is not valid";

    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in validators.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("required", "This field is required", builtin::required);
        registry.register("email", "Please enter a valid email address", builtin::email);
        registry.register("url", "Please enter a valid URL", builtin::url);
        registry.register("number", "Please enter a number", builtin::number);
        registry.register(
            "credit_card",
            "Please enter a valid credit card number",
            builtin::credit_card,
        );
        registry.register(
            "expiry_date",
            "Please enter a valid expiry date in the format MM/YY",
            builtin::expiry_date,
        );
        registry.register(
            "cvc",
            "Please enter a valid card verification code",
            builtin::cvc,
        );
        registry.register("honeypot", "Something isn't right here", builtin::honeypot);
        registry.register("nonce", "Something smells fishy", NonceValidator);
        registry
    }

    /// Registers a validator. The first registration of a name wins: a later
    /// one is ignored and `false` is returned.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        message: impl Into<String>,
        validator: impl Validator + 'static,
    ) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            warn!(validator = %name, "ignoring duplicate validator registration");
            return false;
        }
        self.entries.insert(
            name,
            Entry {
                validator: Some(Box::new(validator)),
                message: Some(message.into()),
            },
        );
        true
    }

    /// Replaces the message of a validator, creating the entry if needed.
    pub fn update_message(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.entries.entry(name.into()).or_default().message = Some(message.into());
    }

    /// Replaces the predicate of a validator, creating the entry if needed.
    pub fn update_validator(&mut self, name: impl Into<String>, validator: impl Validator + 'static) {
        self.entries.entry(name.into()).or_default().validator = Some(Box::new(validator));
    }

    /// Returns the predicate registered under a name.
    pub fn get(&self, name: &str) -> Option<&dyn Validator> {
        self.entries
            .get(name)
            .and_then(|e| e.validator.as_deref())
    }

    /// Returns the error message of a validator.
    pub fn message_for(&self, name: &str) -> &str {
        self.entries
            .get(name)
            .and_then(|e| e.message.as_deref())
            .unwrap_or(Self::FALLBACK_MESSAGE)
    }

    /// Returns whether anything is registered under a name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Runs a chain in order and returns the first entry that fails.
    ///
    /// Evaluation stops at the first failure; later entries are never run.
    /// An entry without a registered predicate is an error.
    pub fn first_failure<'c>(
        &self,
        chain: &'c [ValidatorRef],
        value: &str,
        ctx: &FormContext<'_>,
    ) -> Result<Option<&'c ValidatorRef>> {
        for entry in chain {
            let validator = self
                .get(&entry.name)
                .ok_or_else(|| FormError::UnknownValidator(entry.to_string()))?;
            if !validator.check(value, &entry.args, ctx)? {
                debug!(validator = %entry, "validator rejected value");
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }
}

/// Built-in predicates.
pub mod builtin {
    use super::*;

    static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("static email pattern is valid")
    });

    static URL: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s/?#]+(?:[/?#]\S*)?$")
            .expect("static url pattern is valid")
    });

    static EXPIRY: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^([0-9]{2})/[0-9]{2}$").expect("static expiry pattern is valid")
    });

    /// Value is non-empty.
    pub fn required(value: &str, _args: &[String]) -> bool {
        !value.is_empty()
    }

    pub fn email(value: &str, _args: &[String]) -> bool {
        EMAIL.is_match(value)
    }

    /// Absolute URL with a scheme and a host.
    pub fn url(value: &str, _args: &[String]) -> bool {
        URL.is_match(value)
    }

    /// Whole value parses as an integer or a finite float.
    pub fn number(value: &str, _args: &[String]) -> bool {
        value.parse::<i64>().is_ok() || value.parse::<f64>().is_ok_and(f64::is_finite)
    }

    /// Luhn checksum over the digits of the value; separators are ignored.
    pub fn credit_card(value: &str, _args: &[String]) -> bool {
        let sum: u32 = value
            .chars()
            .filter_map(|c| c.to_digit(10))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .enumerate()
            .map(|(i, d)| {
                if i % 2 == 1 {
                    let doubled = d * 2;
                    if doubled > 9 {
                        doubled - 9
                    } else {
                        doubled
                    }
                } else {
                    d
                }
            })
            .sum();
        sum % 10 == 0
    }

    /// `MM/YY` with a month between 01 and 12.
    pub fn expiry_date(value: &str, _args: &[String]) -> bool {
        EXPIRY
            .captures(value)
            .and_then(|caps| caps[1].parse::<u8>().ok())
            .is_some_and(|month| (1..=12).contains(&month))
    }

    /// Three or four digits.
    pub fn cvc(value: &str, _args: &[String]) -> bool {
        (3..=4).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
    }

    /// Value is empty; humans never fill in the honeypot.
    pub fn honeypot(value: &str, _args: &[String]) -> bool {
        value.is_empty()
    }
}
