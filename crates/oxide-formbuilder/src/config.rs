//! Settings resolution for forms and fields.
//!
//! Every entity starts from a fixed set of defaults. Caller overrides are
//! applied key by key: an override replaces the whole default value (lists
//! are not merged), and keys the entity does not know about land in an
//! `extra` bag that is kept but never interpreted.
//!
//! ```rust
//! use oxide_formbuilder::config::{resolve, FieldOptions, FieldSettings};
//! use oxide_formbuilder::FieldType;
//!
//! let defaults = FieldSettings::defaults("Email", "email");
//! let settings = resolve(
//!     defaults,
//!     Some(FieldOptions::new().field_type(FieldType::Email).required(true)),
//! );
//! assert_eq!(settings.field_type, FieldType::Email);
//! assert_eq!(settings.wrap_class, vec!["form-group".to_string()]);
//! ```

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::choices::Choices;
use crate::error::{FormError, Result};
use crate::field::FieldType;

/// Pass-through bag for options no entity interprets.
pub type Extra = BTreeMap<String, Value>;

/// A settings record that can absorb caller overrides.
pub trait Resolve {
    /// The caller-supplied override record.
    type Overrides;

    /// Replaces every setting the overrides carry.
    fn apply(&mut self, overrides: Self::Overrides);
}

/// Merges caller overrides into a default settings record.
///
/// Without overrides the defaults are returned as they are.
pub fn resolve<S: Resolve>(mut defaults: S, overrides: Option<S::Overrides>) -> S {
    if let Some(overrides) = overrides {
        defaults.apply(overrides);
    }
    defaults
}

/// Merges two untyped maps: every default key survives, overrides win on
/// shared keys, and override-only keys are kept.
pub fn resolve_map<K: Ord, V>(
    mut defaults: BTreeMap<K, V>,
    overrides: Option<BTreeMap<K, V>>,
) -> BTreeMap<K, V> {
    if let Some(overrides) = overrides {
        defaults.extend(overrides);
    }
    defaults
}

macro_rules! apply_overrides {
    ($settings:expr, $overrides:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $overrides.$field {
                $settings.$field = value;
            }
        )+
    };
}

/// How void elements such as `<input>` are closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Markup {
    /// `<input ...>`
    #[default]
    Html,
    /// `<input ... />`
    Xhtml,
}

impl Markup {
    /// Returns the closing sequence for a void element.
    pub fn void_close(self) -> &'static str {
        match self {
            Self::Html => ">",
            Self::Xhtml => " />",
        }
    }
}

/// Resolved settings of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSettings {
    /// Control kind.
    pub field_type: FieldType,
    /// `name` attribute and submitted-data key.
    pub name: String,
    /// `id` attribute.
    pub id: String,
    /// Display text.
    pub label: String,
    /// Classes on the `<label>` element.
    pub label_class: Vec<String>,
    /// Display value; markup-safe (auto-populated values are escaped).
    pub value: String,
    pub placeholder: String,
    /// Classes on the control itself.
    pub class: Vec<String>,
    pub min: String,
    pub max: String,
    pub step: String,
    pub autofocus: bool,
    pub checked: bool,
    /// Default selected option key of a select.
    pub selected: Option<String>,
    /// Whether to emit a `<label>` element.
    pub add_label: bool,
    pub options: Choices,
    /// Envelope template with four `%s` slots: wrapper classes, label,
    /// control and error.
    pub format: String,
    /// Classes on the envelope.
    pub wrap_class: Vec<String>,
    /// Whether submitted data fills in the value.
    pub request_populate: bool,
    pub required: bool,
    /// Explicit validator chain, `name-arg1-arg2` per entry.
    pub validators: Vec<String>,
    /// Unrecognised options.
    pub extra: Extra,
}

impl FieldSettings {
    /// Default envelope template.
    pub const DEFAULT_FORMAT: &'static str = "<div%s>%s%s%s</div>";

    /// Returns the default settings of a field with the given label and slug.
    pub fn defaults(label: &str, slug: &str) -> Self {
        Self {
            field_type: FieldType::Text,
            name: slug.to_string(),
            id: slug.to_string(),
            label: label.to_string(),
            label_class: Vec::new(),
            value: String::new(),
            placeholder: String::new(),
            class: Vec::new(),
            min: String::new(),
            max: String::new(),
            step: String::new(),
            autofocus: false,
            checked: false,
            selected: None,
            add_label: true,
            options: Choices::new(),
            format: Self::DEFAULT_FORMAT.to_string(),
            wrap_class: vec!["form-group".to_string()],
            request_populate: true,
            required: false,
            validators: Vec::new(),
            extra: Extra::new(),
        }
    }

    /// Sets a setting by option name.
    ///
    /// Unknown names are stored in [`FieldSettings::extra`].
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        match key {
            "type" => self.field_type = decode(key, value)?,
            "name" => self.name = scalar(key, &value)?,
            "id" => self.id = scalar(key, &value)?,
            "label" => self.label = scalar(key, &value)?,
            "label_class" => self.label_class = class_list(key, value)?,
            "value" => self.value = scalar(key, &value)?,
            "placeholder" => self.placeholder = scalar(key, &value)?,
            "class" => self.class = class_list(key, value)?,
            "min" => self.min = scalar(key, &value)?,
            "max" => self.max = scalar(key, &value)?,
            "step" => self.step = scalar(key, &value)?,
            "autofocus" => self.autofocus = decode(key, value)?,
            "checked" => self.checked = decode(key, value)?,
            "selected" => {
                self.selected = match value {
                    Value::Null | Value::Bool(false) => None,
                    other => Some(scalar(key, &other)?),
                };
            }
            "add_label" => self.add_label = decode(key, value)?,
            "options" => self.options = decode(key, value)?,
            "format" => self.format = scalar(key, &value)?,
            "wrap_class" => self.wrap_class = class_list(key, value)?,
            "request_populate" => self.request_populate = decode(key, value)?,
            "required" => self.required = decode(key, value)?,
            "validators" => self.validators = decode(key, value)?,
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    /// Appends one item to a list setting.
    pub fn add_setting(&mut self, key: &str, item: &str) -> Result<()> {
        let list = match key {
            "label_class" => &mut self.label_class,
            "class" => &mut self.class,
            "wrap_class" => &mut self.wrap_class,
            "validators" => &mut self.validators,
            _ => {
                return match self.extra.get_mut(key) {
                    Some(Value::Array(items)) => {
                        items.push(Value::String(item.to_string()));
                        Ok(())
                    }
                    _ => Err(FormError::NotAList(key.to_string())),
                };
            }
        };
        list.push(item.to_string());
        Ok(())
    }
}

/// Caller overrides for a field. Absent options keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldOptions {
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub label: Option<String>,
    #[serde(default, deserialize_with = "de::class_list")]
    pub label_class: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de::scalar")]
    pub value: Option<String>,
    pub placeholder: Option<String>,
    #[serde(default, deserialize_with = "de::class_list")]
    pub class: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de::scalar")]
    pub min: Option<String>,
    #[serde(default, deserialize_with = "de::scalar")]
    pub max: Option<String>,
    #[serde(default, deserialize_with = "de::scalar")]
    pub step: Option<String>,
    pub autofocus: Option<bool>,
    pub checked: Option<bool>,
    #[serde(default, deserialize_with = "de::scalar")]
    pub selected: Option<String>,
    pub add_label: Option<bool>,
    pub options: Option<Choices>,
    pub format: Option<String>,
    #[serde(default, deserialize_with = "de::class_list")]
    pub wrap_class: Option<Vec<String>>,
    pub request_populate: Option<bool>,
    pub required: Option<bool>,
    pub validators: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl FieldOptions {
    /// Creates an empty override record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the control kind.
    #[must_use]
    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Sets the `name` attribute.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the `id` attribute.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Overrides the display text.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the classes of the `<label>` element.
    #[must_use]
    pub fn label_class<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.label_class = Some(classes.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the display value. It is emitted as given.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the placeholder text.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the classes of the control.
    #[must_use]
    pub fn class<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class = Some(classes.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the `min` attribute of range and number fields.
    #[must_use]
    pub fn min(mut self, min: impl Into<String>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Sets the `max` attribute of range and number fields.
    #[must_use]
    pub fn max(mut self, max: impl Into<String>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Sets the `step` attribute of range and number fields.
    #[must_use]
    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    #[must_use]
    pub fn autofocus(mut self, autofocus: bool) -> Self {
        self.autofocus = Some(autofocus);
        self
    }

    #[must_use]
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    /// Sets the option key selected when nothing was submitted.
    #[must_use]
    pub fn selected(mut self, key: impl Into<String>) -> Self {
        self.selected = Some(key.into());
        self
    }

    #[must_use]
    pub fn add_label(mut self, add_label: bool) -> Self {
        self.add_label = Some(add_label);
        self
    }

    /// Sets the options of a select, radio or checkbox field.
    #[must_use]
    pub fn options(mut self, options: Choices) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the envelope template.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the envelope classes.
    #[must_use]
    pub fn wrap_class<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wrap_class = Some(classes.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn request_populate(mut self, populate: bool) -> Self {
        self.request_populate = Some(populate);
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Sets the explicit validator chain.
    #[must_use]
    pub fn validators<I, S>(mut self, validators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validators = Some(validators.into_iter().map(Into::into).collect());
        self
    }

    /// Adds an uninterpreted option.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl Resolve for FieldSettings {
    type Overrides = FieldOptions;

    fn apply(&mut self, overrides: FieldOptions) {
        apply_overrides!(self, overrides;
            field_type, name, id, label, label_class, value, placeholder, class,
            min, max, step, autofocus, checked, add_label, options, format,
            wrap_class, request_populate, required, validators,
        );
        if overrides.selected.is_some() {
            self.selected = overrides.selected;
        }
        self.extra = resolve_map(std::mem::take(&mut self.extra), Some(overrides.extra));
    }
}

/// Resolved settings of a form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSettings {
    pub action: String,
    pub method: String,
    pub enctype: String,
    /// Classes on the `<form>` element.
    pub class: Vec<String>,
    pub id: String,
    pub markup: Markup,
    pub novalidate: bool,
    /// Purpose of the anti-forgery token to embed, if any.
    pub add_nonce: Option<String>,
    /// Whether to append the anti-spam honeypot field.
    pub add_honeypot: bool,
    /// Whether to emit the `<form>` element around the fields.
    pub form_element: bool,
    /// Whether to append a submit button when no field is one.
    pub add_submit: bool,
    /// Unrecognised options.
    pub extra: Extra,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            action: ".".to_string(),
            method: "post".to_string(),
            enctype: "application/x-www-form-urlencoded".to_string(),
            class: Vec::new(),
            id: String::new(),
            markup: Markup::Html,
            novalidate: false,
            add_nonce: None,
            add_honeypot: true,
            form_element: true,
            add_submit: true,
            extra: Extra::new(),
        }
    }
}

/// Caller overrides for a form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormOptions {
    pub action: Option<String>,
    pub method: Option<String>,
    pub enctype: Option<String>,
    #[serde(default, deserialize_with = "de::class_list")]
    pub class: Option<Vec<String>>,
    pub id: Option<String>,
    pub markup: Option<Markup>,
    pub novalidate: Option<bool>,
    /// `Some(None)` switches the nonce off; `Some(Some(purpose))` on.
    #[serde(default, deserialize_with = "de::nonce_purpose")]
    pub add_nonce: Option<Option<String>>,
    pub add_honeypot: Option<bool>,
    pub form_element: Option<bool>,
    pub add_submit: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl FormOptions {
    /// Creates an empty override record.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    #[must_use]
    pub fn enctype(mut self, enctype: impl Into<String>) -> Self {
        self.enctype = Some(enctype.into());
        self
    }

    /// Sets the classes of the `<form>` element.
    #[must_use]
    pub fn class<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class = Some(classes.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn markup(mut self, markup: Markup) -> Self {
        self.markup = Some(markup);
        self
    }

    #[must_use]
    pub fn novalidate(mut self, novalidate: bool) -> Self {
        self.novalidate = Some(novalidate);
        self
    }

    /// Embeds an anti-forgery token issued for `purpose`.
    #[must_use]
    pub fn add_nonce(mut self, purpose: impl Into<String>) -> Self {
        self.add_nonce = Some(Some(purpose.into()));
        self
    }

    #[must_use]
    pub fn add_honeypot(mut self, add_honeypot: bool) -> Self {
        self.add_honeypot = Some(add_honeypot);
        self
    }

    #[must_use]
    pub fn form_element(mut self, form_element: bool) -> Self {
        self.form_element = Some(form_element);
        self
    }

    #[must_use]
    pub fn add_submit(mut self, add_submit: bool) -> Self {
        self.add_submit = Some(add_submit);
        self
    }
}

impl Resolve for FormSettings {
    type Overrides = FormOptions;

    fn apply(&mut self, overrides: FormOptions) {
        apply_overrides!(self, overrides;
            action, method, enctype, class, id, markup, novalidate, add_nonce,
            add_honeypot, form_element, add_submit,
        );
        self.extra = resolve_map(std::mem::take(&mut self.extra), Some(overrides.extra));
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| FormError::InvalidSetting {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn scalar(key: &str, value: &Value) -> Result<String> {
    de::scalar_string(value).ok_or_else(|| FormError::InvalidSetting {
        key: key.to_string(),
        message: format!("expected a string, number or boolean, got {value}"),
    })
}

fn class_list(key: &str, value: Value) -> Result<Vec<String>> {
    de::class_list_value(value).map_err(|message| FormError::InvalidSetting {
        key: key.to_string(),
        message,
    })
}

/// Lenient deserializers for option values written by hand in definitions.
mod de {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn scalar_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub(super) fn class_list_value(value: Value) -> std::result::Result<Vec<String>, String> {
        match value {
            Value::String(s) => Ok(s.split_whitespace().map(str::to_string).collect()),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(format!("expected a class name, got {other}")),
                })
                .collect(),
            other => Err(format!("expected a class string or list, got {other}")),
        }
    }

    pub(super) fn scalar<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            value => scalar_string(&value)
                .map(Some)
                .ok_or_else(|| D::Error::custom("expected a string, number or boolean")),
        }
    }

    pub(super) fn class_list<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<Vec<String>>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            value => class_list_value(value).map(Some).map_err(D::Error::custom),
        }
    }

    pub(super) fn nonce_purpose<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<Option<String>>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null | Value::Bool(false) => Ok(Some(None)),
            Value::Bool(true) => Ok(Some(Some("form".to_string()))),
            Value::String(purpose) => Ok(Some(Some(purpose))),
            other => Err(D::Error::custom(format!(
                "expected false or a token purpose, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_without_overrides_returns_defaults() {
        let defaults = FieldSettings::defaults("Name", "name");
        assert_eq!(resolve(defaults.clone(), None), defaults);
    }

    #[test]
    fn test_resolve_overrides_replace_whole_values() {
        let settings = resolve(
            FieldSettings::defaults("Name", "name"),
            Some(FieldOptions::new().wrap_class(["row"]).required(true)),
        );
        assert_eq!(settings.wrap_class, vec!["row".to_string()]);
        assert!(settings.required);
        assert_eq!(settings.name, "name");
        assert_eq!(settings.format, FieldSettings::DEFAULT_FORMAT);
    }

    #[test]
    fn test_resolve_map_properties() {
        let defaults: BTreeMap<_, _> = [("a", 1), ("b", 2)].into_iter().collect();
        let overrides: BTreeMap<_, _> = [("b", 20), ("c", 30)].into_iter().collect();
        let merged = resolve_map(defaults.clone(), Some(overrides.clone()));

        for (key, default) in &defaults {
            let expected = overrides.get(key).unwrap_or(default);
            assert_eq!(merged.get(key), Some(expected));
        }
        assert_eq!(merged.get("c"), Some(&30));
        assert_eq!(resolve_map(defaults.clone(), None), defaults);
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let options: FieldOptions =
            serde_json::from_value(json!({"type": "email", "data-track": "signup"})).unwrap();
        let settings = resolve(FieldSettings::defaults("Email", "email"), Some(options));
        assert_eq!(settings.field_type, FieldType::Email);
        assert_eq!(settings.extra.get("data-track"), Some(&json!("signup")));
    }

    #[test]
    fn test_lenient_option_values() {
        let options: FieldOptions = serde_json::from_value(json!({
            "type": "range",
            "min": 0,
            "max": "10",
            "step": 0.5,
            "class": "wide highlighted",
        }))
        .unwrap();
        assert_eq!(options.min.as_deref(), Some("0"));
        assert_eq!(options.max.as_deref(), Some("10"));
        assert_eq!(options.step.as_deref(), Some("0.5"));
        assert_eq!(
            options.class,
            Some(vec!["wide".to_string(), "highlighted".to_string()])
        );
    }

    #[test]
    fn test_set_by_name() {
        let mut settings = FieldSettings::defaults("Age", "age");
        settings.set("type", json!("number")).unwrap();
        settings.set("min", json!(18)).unwrap();
        settings.set("selected", json!(false)).unwrap();
        settings.set("tooltip", json!("years")).unwrap();

        assert_eq!(settings.field_type, FieldType::Number);
        assert_eq!(settings.min, "18");
        assert_eq!(settings.selected, None);
        assert_eq!(settings.extra.get("tooltip"), Some(&json!("years")));
    }

    #[test]
    fn test_set_rejects_wrong_type() {
        let mut settings = FieldSettings::defaults("Age", "age");
        let err = settings.set("required", json!("yes")).unwrap_err();
        assert!(matches!(err, FormError::InvalidSetting { ref key, .. } if key == "required"));
        assert!(settings.set("type", json!("carousel")).is_err());
    }

    #[test]
    fn test_add_setting_to_lists() {
        let mut settings = FieldSettings::defaults("Name", "name");
        settings.add_setting("class", "invalid").unwrap();
        settings.add_setting("wrap_class", "col-6").unwrap();
        settings.set("data", json!(["a"])).unwrap();
        settings.add_setting("data", "b").unwrap();

        assert_eq!(settings.class, vec!["invalid".to_string()]);
        assert_eq!(settings.wrap_class, vec!["form-group".to_string(), "col-6".to_string()]);
        assert_eq!(settings.extra.get("data"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn test_add_setting_to_non_list_fails() {
        let mut settings = FieldSettings::defaults("Name", "name");
        assert!(matches!(
            settings.add_setting("placeholder", "x"),
            Err(FormError::NotAList(ref key)) if key == "placeholder"
        ));
        assert!(matches!(
            settings.add_setting("missing", "x"),
            Err(FormError::NotAList(_))
        ));
    }

    #[test]
    fn test_form_defaults_and_nonce_option() {
        let defaults = FormSettings::default();
        assert_eq!(defaults.action, ".");
        assert_eq!(defaults.method, "post");
        assert!(defaults.add_honeypot);
        assert!(defaults.add_nonce.is_none());

        let options: FormOptions =
            serde_json::from_value(json!({"add_nonce": "contact", "markup": "xhtml"})).unwrap();
        let settings = resolve(FormSettings::default(), Some(options));
        assert_eq!(settings.add_nonce.as_deref(), Some("contact"));
        assert_eq!(settings.markup, Markup::Xhtml);

        let off: FormOptions = serde_json::from_value(json!({"add_nonce": false})).unwrap();
        let settings = resolve(settings, Some(off));
        assert!(settings.add_nonce.is_none());
    }
}
