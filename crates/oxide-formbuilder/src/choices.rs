//! Ordered option lists for select, radio and checkbox fields.

use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::slug::slugify;

/// An ordered mapping from option key to display text.
///
/// Entries added by label alone are keyed by the slug of that label; entries
/// added with an explicit key keep it. Re-using a key replaces the label in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choices {
    entries: Vec<(String, String)>,
}

impl Choices {
    /// Creates an empty option list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an option list keyed by the slugs of the given labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels
            .into_iter()
            .fold(Self::new(), |choices, label| choices.label(label))
    }

    /// Adds an option keyed by the slug of its label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.push_label(label);
        self
    }

    /// Adds an option with an explicit key.
    #[must_use]
    pub fn keyed(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.insert(key, label);
        self
    }

    /// Adds an option keyed by the slug of its label.
    pub fn push_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.insert(slugify(&label), label);
    }

    /// Inserts an option, replacing the label of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        let key = key.into();
        let label = label.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((key, label)),
        }
    }

    /// Returns the label for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, l)| l.as_str())
    }

    /// Returns whether there are no options.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of options.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(key, label)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, l)| (k.as_str(), l.as_str()))
    }
}

impl<K: Into<String>, L: Into<String>> FromIterator<(K, L)> for Choices {
    fn from_iter<I: IntoIterator<Item = (K, L)>>(iter: I) -> Self {
        let mut choices = Self::new();
        for (key, label) in iter {
            choices.insert(key, label);
        }
        choices
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChoiceEntry {
    Label(String),
    Pair(String, String),
}

struct ChoicesVisitor;

impl<'de> Visitor<'de> for ChoicesVisitor {
    type Value = Choices;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of labels or [key, label] pairs, or a map of key to label")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Choices, A::Error> {
        let mut choices = Choices::new();
        while let Some(entry) = seq.next_element::<ChoiceEntry>()? {
            match entry {
                ChoiceEntry::Label(label) => choices.push_label(label),
                ChoiceEntry::Pair(key, label) => choices.insert(key, label),
            }
        }
        Ok(choices)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Choices, A::Error> {
        let mut choices = Choices::new();
        while let Some((key, label)) = map.next_entry::<String, String>()? {
            choices.insert(key, label);
        }
        Ok(choices)
    }
}

impl<'de> Deserialize<'de> for Choices {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ChoicesVisitor)
    }
}
