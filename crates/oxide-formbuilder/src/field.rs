//! Form fields.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::{resolve, FieldOptions, FieldSettings};
use crate::error::{FormError, Result};
use crate::form::FormContext;
use crate::request::SubmittedData;
use crate::slug::slugify;
use crate::validation::ValidatorRef;
use crate::widgets::{html_escape, render_field};

/// MIME types accepted by file fields.
pub const ACCEPTED_FILE_TYPES: [&str; 4] = [
    "application/pdf",
    "application/x-pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// The kind of control a field renders as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Url,
    Number,
    Range,
    Password,
    Tel,
    Search,
    Date,
    Time,
    DatetimeLocal,
    Month,
    Week,
    Color,
    Hidden,
    /// Raw markup taken from the label.
    Html,
    /// A heading taken from the label.
    Title,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Submit,
    File,
    /// Anti-spam field that must be left empty.
    Honeypot,
    /// Anti-forgery token.
    Nonce,
}

impl FieldType {
    /// Returns the option name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Url => "url",
            Self::Number => "number",
            Self::Range => "range",
            Self::Password => "password",
            Self::Tel => "tel",
            Self::Search => "search",
            Self::Date => "date",
            Self::Time => "time",
            Self::DatetimeLocal => "datetime-local",
            Self::Month => "month",
            Self::Week => "week",
            Self::Color => "color",
            Self::Hidden => "hidden",
            Self::Html => "html",
            Self::Title => "title",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Submit => "submit",
            Self::File => "file",
            Self::Honeypot => "honeypot",
            Self::Nonce => "nonce",
        }
    }

    /// Returns the `type` attribute of the rendered `<input>`.
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Honeypot => "text",
            Self::Nonce => "hidden",
            other => other.as_str(),
        }
    }

    /// Returns the validator every field of this type runs first.
    pub fn implied_validator(self) -> Option<&'static str> {
        match self {
            Self::Email | Self::Url | Self::Number | Self::Honeypot | Self::Nonce => {
                Some(self.as_str())
            }
            _ => None,
        }
    }

    /// Whether a submitted scalar becomes the field's value.
    pub fn populates_value(self) -> bool {
        !matches!(
            self,
            Self::Html | Self::Title | Self::Radio | Self::Checkbox | Self::Select | Self::Submit
        )
    }

    /// Whether this type can carry a `<label>`.
    pub fn has_label(self) -> bool {
        !matches!(self, Self::Hidden | Self::Submit | Self::Title | Self::Html)
    }

    /// Whether this type renders without envelope, label and errors.
    pub fn is_bare(self) -> bool {
        matches!(self, Self::Hidden | Self::Html)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One form control with its settings, validator chain and last outcome.
#[derive(Debug, Clone)]
pub struct Field {
    slug: String,
    settings: FieldSettings,
    validators: Vec<ValidatorRef>,
    valid: Option<bool>,
    safe_value: Option<String>,
    message: String,
}

impl Field {
    /// Creates a field.
    ///
    /// An empty `slug` is derived from the label; a given slug is used as is.
    /// Submitted data fills in the value (or the checked state of a lone
    /// radio/checkbox) unless `request_populate` is off.
    pub fn new(
        label: &str,
        options: Option<FieldOptions>,
        slug: &str,
        data: &SubmittedData,
    ) -> Self {
        let slug = if slug.is_empty() {
            slugify(label)
        } else {
            slug.to_string()
        };
        let settings = resolve(FieldSettings::defaults(label, &slug), options);

        let mut field = Self {
            slug,
            settings,
            validators: Vec::new(),
            valid: None,
            safe_value: None,
            message: String::new(),
        };
        field.attach_validators();
        field.populate(data);
        field
    }

    fn populate(&mut self, data: &SubmittedData) {
        let settings = &mut self.settings;
        if !settings.request_populate || !data.contains(&settings.name) {
            return;
        }
        let field_type = settings.field_type;
        if field_type.populates_value() {
            settings.value = html_escape(data.get(&settings.name).unwrap_or(""));
            trace!(field = %self.slug, "populated value from submitted data");
        } else if matches!(field_type, FieldType::Radio | FieldType::Checkbox)
            && settings.options.is_empty()
        {
            settings.checked = true;
            trace!(field = %self.slug, "checked from submitted data");
        }
    }

    /// Rebuilds the chain: `required` first (never for files), then the
    /// type's own validator, then the explicit list.
    fn attach_validators(&mut self) {
        let settings = &self.settings;
        let mut chain = Vec::with_capacity(settings.validators.len() + 2);
        if settings.required && settings.field_type != FieldType::File {
            chain.push(ValidatorRef::parse("required"));
        }
        if let Some(name) = settings.field_type.implied_validator() {
            chain.push(ValidatorRef::parse(name));
        }
        chain.extend(settings.validators.iter().map(|v| ValidatorRef::parse(v)));
        self.validators = chain;
    }

    /// Returns the slug identifying this field within its form.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Returns the display text.
    pub fn label(&self) -> &str {
        &self.settings.label
    }

    pub fn field_type(&self) -> FieldType {
        self.settings.field_type
    }

    /// Returns the resolved settings.
    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }

    /// Returns the validator chain in execution order.
    pub fn validators(&self) -> &[ValidatorRef] {
        &self.validators
    }

    /// Sets a setting by option name.
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.settings.set(key, value)?;
        if matches!(key, "type" | "required" | "validators") {
            self.attach_validators();
        }
        Ok(())
    }

    /// Appends to a list setting such as `class`.
    pub fn add_setting(&mut self, key: &str, item: &str) -> Result<()> {
        self.settings.add_setting(key, item)?;
        if key == "validators" {
            self.attach_validators();
        }
        Ok(())
    }

    /// Outcome of the last validation; `None` before the first one.
    pub fn is_valid(&self) -> Option<bool> {
        self.valid
    }

    /// The validated value; `None` unless the last validation passed.
    pub fn safe_value(&self) -> Option<&str> {
        self.safe_value.as_deref()
    }

    /// The message of the last failed validation, or empty.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Renders the field with its envelope, label and error message.
    pub fn build_input(&self, ctx: &FormContext<'_>) -> String {
        render_field(&self.settings, &self.message, ctx.data, ctx.markup)
    }

    /// Runs the validator chain against the submitted value.
    ///
    /// Returns `Ok(false)` for an invalid value; errors mean the field or the
    /// registry is misconfigured.
    pub fn validate(&mut self, ctx: &FormContext<'_>) -> Result<bool> {
        if self.settings.field_type == FieldType::File {
            return self.validate_file(ctx);
        }

        let value = ctx.data.get(&self.slug).unwrap_or("").to_string();
        let failure = ctx
            .registry
            .first_failure(&self.validators, &value, ctx)?
            .map(|failed| ctx.registry.message_for(&failed.name).to_string());

        match failure {
            Some(message) => {
                debug!(field = %self.slug, %message, "field failed validation");
                self.mark_invalid(message);
                Ok(false)
            }
            None => {
                self.mark_valid(Some(value));
                Ok(true)
            }
        }
    }

    fn validate_file(&mut self, ctx: &FormContext<'_>) -> Result<bool> {
        let file = ctx
            .files
            .get(&self.slug)
            .ok_or_else(|| FormError::MissingUpload(self.slug.clone()))?;

        if file.name.is_empty() {
            self.mark_invalid("This field is required".to_string());
            return Ok(false);
        }
        if !ACCEPTED_FILE_TYPES.contains(&file.mime_type.as_str()) {
            debug!(field = %self.slug, mime_type = %file.mime_type, "rejected upload type");
            self.mark_invalid("Please use .doc, .docx, or .pdf files only".to_string());
            return Ok(false);
        }

        self.mark_valid(None);
        Ok(true)
    }

    fn mark_invalid(&mut self, message: String) {
        self.valid = Some(false);
        self.safe_value = None;
        self.message = message;
        if !self.settings.class.iter().any(|c| c == "invalid") {
            self.settings.class.push("invalid".to_string());
        }
    }

    fn mark_valid(&mut self, safe_value: Option<String>) {
        self.valid = Some(true);
        self.safe_value = safe_value;
        self.message.clear();
        self.settings.class.retain(|c| c != "invalid");
    }
}
