//! Declarative form definitions.
//!
//! A definition is a JSON document with the form options and the fields in
//! render order:
//!
//! ```json
//! {
//!   "form": { "action": "/contact", "add_nonce": "contact" },
//!   "fields": [
//!     "Name",
//!     ["Email", { "type": "email", "required": true }],
//!     ["Message", { "type": "textarea" }, "body"],
//!     { "label": "Send", "options": { "type": "submit", "value": "Send" } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::config::{FieldOptions, FormOptions};
use crate::error::Result;
use crate::form::{Form, FormContext};

/// One field of a definition: label, optional overrides and optional slug.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSpec {
    pub label: String,
    pub options: Option<FieldOptions>,
    /// Empty to derive the slug from the label.
    pub slug: String,
}

impl FieldSpec {
    /// Creates a spec with just a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn options(mut self, options: FieldOptions) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }
}

impl From<&str> for FieldSpec {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldSpecRepr {
    Label(String),
    LabelOnly([String; 1]),
    WithOptions(String, Option<FieldOptions>),
    Full(String, Option<FieldOptions>, Option<String>),
    Object {
        label: String,
        #[serde(default)]
        options: Option<FieldOptions>,
        #[serde(default)]
        slug: Option<String>,
    },
}

impl<'de> Deserialize<'de> for FieldSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (label, options, slug) = match FieldSpecRepr::deserialize(deserializer)? {
            FieldSpecRepr::Label(label) | FieldSpecRepr::LabelOnly([label]) => (label, None, None),
            FieldSpecRepr::WithOptions(label, options) => (label, options, None),
            FieldSpecRepr::Full(label, options, slug)
            | FieldSpecRepr::Object {
                label,
                options,
                slug,
            } => (label, options, slug),
        };
        Ok(Self {
            label,
            options,
            slug: slug.unwrap_or_default(),
        })
    }
}

/// A whole form described as data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormDefinition {
    #[serde(default)]
    pub form: Option<FormOptions>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl FormDefinition {
    /// Parses a definition from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a definition file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading form definition");
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Builds the form against a request context.
    pub fn build<'a>(&self, ctx: FormContext<'a>) -> Form<'a> {
        let mut form = Form::new(self.form.clone(), ctx);
        form.add_inputs(self.fields.iter().cloned());
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use crate::request::{SubmittedData, UploadedFiles};
    use crate::validation::ValidatorRegistry;

    #[test]
    fn test_field_spec_forms() {
        let specs: Vec<FieldSpec> = serde_json::from_str(
            r#"[
                "Name",
                ["Email", {"type": "email"}],
                ["Message", null, "body"],
                {"label": "Send", "options": {"type": "submit"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(specs[0], FieldSpec::new("Name"));
        assert_eq!(
            specs[1].options.as_ref().and_then(|o| o.field_type),
            Some(FieldType::Email)
        );
        assert_eq!(specs[2].slug, "body");
        assert!(specs[2].options.is_none());
        assert_eq!(specs[3].label, "Send");
        assert_eq!(
            specs[3].options.as_ref().and_then(|o| o.field_type),
            Some(FieldType::Submit)
        );
    }

    #[test]
    fn test_options_keep_document_order() {
        let spec: FieldSpec =
            serde_json::from_str(r#"["Size", {"type": "select", "options": {"s": "Small", "m": "Medium", "l": "Large"}}]"#)
                .unwrap();
        let options = spec.options.and_then(|o| o.options).unwrap();
        let keys: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["s", "m", "l"]);
    }

    #[test]
    fn test_malformed_field_specs() {
        assert!(serde_json::from_str::<FieldSpec>("[]").is_err());
        assert!(serde_json::from_str::<FieldSpec>(r#"[1]"#).is_err());
        assert!(serde_json::from_str::<FieldSpec>(r#"["A", {}, 3]"#).is_err());
        assert!(serde_json::from_str::<FieldSpec>(r#"["A", {}, "a", "extra"]"#).is_err());
        assert!(serde_json::from_str::<FieldSpec>(r#"["A", {"type": "bogus"}]"#).is_err());
    }

    #[test]
    fn test_build_form() {
        let definition = FormDefinition::from_json_str(
            r#"{
                "form": {"action": "/signup", "add_honeypot": false},
                "fields": ["Name", ["Email", {"type": "email", "required": true}]]
            }"#,
        )
        .unwrap();

        let registry = ValidatorRegistry::with_builtins();
        let data = SubmittedData::new();
        let files = UploadedFiles::new();
        let form = definition.build(FormContext::new(&registry, &data, &files));

        assert_eq!(form.settings().action, "/signup");
        assert!(!form.settings().add_honeypot);
        assert_eq!(form.inputs().len(), 2);
        assert!(form.input("email").unwrap().settings().required);
    }

    #[test]
    fn test_fields_default_to_empty() {
        let definition = FormDefinition::from_json_str("{}").unwrap();
        assert!(definition.form.is_none());
        assert!(definition.fields.is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            FormDefinition::from_json_str("{"),
            Err(crate::error::FormError::Json(_))
        ));
    }
}
