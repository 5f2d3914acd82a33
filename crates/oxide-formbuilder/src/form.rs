//! Forms: ordered fields, synthetic fields, rendering and aggregate
//! validation.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use serde_json::Value;
use tracing::debug;

use crate::config::{resolve, FieldOptions, FormOptions, FormSettings, Markup};
use crate::definition::FieldSpec;
use crate::error::{FormError, Result, ValidationErrors};
use crate::field::{Field, FieldType};
use crate::nonce::AntiForgery;
use crate::request::{SubmittedData, UploadedFiles};
use crate::validation::ValidatorRegistry;
use crate::widgets::{form_open, submit_button, FORM_CLOSE};

/// Slug of the synthetic anti-spam field.
pub const HONEYPOT_SLUG: &str = "honeypot";

/// Slug of the synthetic anti-forgery field.
pub const NONCE_SLUG: &str = "nonce";

/// Everything a form reads from the outside world while handling one request.
#[derive(Clone, Copy)]
pub struct FormContext<'a> {
    pub registry: &'a ValidatorRegistry,
    pub data: &'a SubmittedData,
    pub files: &'a UploadedFiles,
    /// Token provider for nonce fields and the `nonce` validator.
    pub anti_forgery: Option<&'a dyn AntiForgery>,
    pub markup: Markup,
}

impl<'a> FormContext<'a> {
    /// Creates a context without an anti-forgery provider.
    pub fn new(
        registry: &'a ValidatorRegistry,
        data: &'a SubmittedData,
        files: &'a UploadedFiles,
    ) -> Self {
        Self {
            registry,
            data,
            files,
            anti_forgery: None,
            markup: Markup::default(),
        }
    }

    /// Installs an anti-forgery provider.
    #[must_use]
    pub fn with_anti_forgery(mut self, provider: &'a dyn AntiForgery) -> Self {
        self.anti_forgery = Some(provider);
        self
    }

    #[must_use]
    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }
}

impl fmt::Debug for FormContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormContext")
            .field("registry", self.registry)
            .field("data", self.data)
            .field("files", self.files)
            .field("anti_forgery", &self.anti_forgery.is_some())
            .field("markup", &self.markup)
            .finish()
    }
}

/// An ordered collection of fields keyed by slug.
///
/// Insertion order is both render order and validation order. Adding a field
/// under a slug that is already taken replaces the old field and moves the
/// slug to the end.
#[derive(Debug)]
pub struct Form<'a> {
    settings: FormSettings,
    inputs: Vec<Field>,
    has_submit: bool,
    ctx: FormContext<'a>,
}

impl<'a> Form<'a> {
    /// Creates an empty form.
    pub fn new(options: Option<FormOptions>, ctx: FormContext<'a>) -> Self {
        let settings = resolve(FormSettings::default(), options);
        let ctx = ctx.with_markup(settings.markup);
        Self {
            settings,
            inputs: Vec::new(),
            has_submit: false,
            ctx,
        }
    }

    /// Returns the resolved form settings.
    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn context(&self) -> &FormContext<'a> {
        &self.ctx
    }

    /// Returns the stored fields in order.
    pub fn inputs(&self) -> &[Field] {
        &self.inputs
    }

    /// Returns the field stored under a slug.
    pub fn input(&self, slug: &str) -> Option<&Field> {
        self.inputs.iter().find(|f| f.slug() == slug)
    }

    /// Returns the field stored under a slug for modification.
    pub fn input_mut(&mut self, slug: &str) -> Option<&mut Field> {
        self.inputs.iter_mut().find(|f| f.slug() == slug)
    }

    /// Whether a submit field was ever added to this form.
    pub fn has_submit_field(&self) -> bool {
        self.has_submit
    }

    /// Adds a field and returns it.
    ///
    /// An empty `slug` is derived from the label.
    pub fn add_input(
        &mut self,
        label: &str,
        options: Option<FieldOptions>,
        slug: &str,
    ) -> &mut Field {
        let field = Field::new(label, options, slug, self.ctx.data);
        if field.field_type() == FieldType::Submit {
            self.has_submit = true;
        }
        self.store(field)
    }

    /// Adds several fields in order.
    pub fn add_inputs<I>(&mut self, specs: I)
    where
        I: IntoIterator<Item = FieldSpec>,
    {
        for spec in specs {
            self.add_input(&spec.label, spec.options, &spec.slug);
        }
    }

    /// Removes every field.
    pub fn delete_inputs(&mut self) {
        self.inputs.clear();
    }

    /// Sets one setting on every stored field not listed in `exclude`.
    ///
    /// Fields added afterwards are not affected.
    pub fn set_for_each_input(&mut self, key: &str, value: Value, exclude: &[&str]) -> Result<()> {
        for field in &mut self.inputs {
            if !exclude.contains(&field.slug()) {
                field.set(key, value.clone())?;
            }
        }
        Ok(())
    }

    /// Appends to a list setting on every stored field not listed in
    /// `exclude`.
    pub fn add_setting_for_each_input(
        &mut self,
        key: &str,
        item: &str,
        exclude: &[&str],
    ) -> Result<()> {
        for field in &mut self.inputs {
            if !exclude.contains(&field.slug()) {
                field.add_setting(key, item)?;
            }
        }
        Ok(())
    }

    fn store(&mut self, field: Field) -> &mut Field {
        self.inputs.retain(|f| f.slug() != field.slug());
        let index = self.inputs.len();
        self.inputs.push(field);
        &mut self.inputs[index]
    }

    /// Returns the fields to render: the stored ones followed by the
    /// synthetic honeypot and nonce fields the settings ask for.
    ///
    /// A synthetic field replaces a stored field with the same slug.
    pub fn prepared_fields(&self) -> Result<Vec<Cow<'_, Field>>> {
        let mut synthetic = Vec::new();
        if self.settings.add_honeypot {
            synthetic.push(self.honeypot_field());
        }
        if let Some(purpose) = &self.settings.add_nonce {
            synthetic.push(self.nonce_field(purpose)?);
        }
        if !synthetic.is_empty() {
            debug!(count = synthetic.len(), "appending synthetic fields");
        }

        let mut fields: Vec<Cow<'_, Field>> = self
            .inputs
            .iter()
            .filter(|f| !synthetic.iter().any(|s| s.slug() == f.slug()))
            .map(Cow::Borrowed)
            .collect();
        fields.extend(synthetic.into_iter().map(Cow::Owned));
        Ok(fields)
    }

    fn honeypot_field(&self) -> Field {
        Field::new(
            "Leave blank to submit",
            Some(
                FieldOptions::new()
                    .id("form_honeypot")
                    .wrap_class(["hidden"])
                    .request_populate(false),
            ),
            HONEYPOT_SLUG,
            self.ctx.data,
        )
    }

    fn nonce_field(&self, purpose: &str) -> Result<Field> {
        let provider = self
            .ctx
            .anti_forgery
            .ok_or(FormError::AntiForgeryUnavailable)?;
        Ok(Field::new(
            "Nonce",
            Some(
                FieldOptions::new()
                    .field_type(FieldType::Nonce)
                    .value(provider.issue(purpose))
                    .add_label(false)
                    .wrap_class(["hidden"])
                    .request_populate(false),
            ),
            NONCE_SLUG,
            self.ctx.data,
        ))
    }

    /// Renders the form.
    ///
    /// Rendering does not change the form; each call issues a fresh nonce.
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        if self.settings.form_element {
            out.push_str(&form_open(&self.settings));
        }
        for field in self.prepared_fields()? {
            out.push_str(&field.build_input(&self.ctx));
        }
        if self.settings.add_submit && !self.has_submit {
            out.push_str(&submit_button(self.ctx.markup));
        }
        if self.settings.form_element {
            out.push_str(FORM_CLOSE);
        }
        Ok(out)
    }

    /// Renders the form into a writer.
    pub fn render_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let html = self.render()?;
        writer.write_all(html.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Validates every stored field in order and returns whether all passed.
    ///
    /// A failing field does not stop the others from being validated.
    pub fn validate(&mut self) -> Result<bool> {
        let ctx = self.ctx;
        let mut valid = true;
        for field in &mut self.inputs {
            valid &= field.validate(&ctx)?;
        }
        debug!(valid, fields = self.inputs.len(), "validated form");
        Ok(valid)
    }

    /// Returns the safe value of one field.
    pub fn get_safe_value(&self, slug: &str) -> Result<Option<&str>> {
        self.input(slug)
            .map(Field::safe_value)
            .ok_or_else(|| FormError::FieldNotFound(slug.to_string()))
    }

    /// Returns the safe value of every stored field, keyed by slug.
    pub fn get_safe_values(&self) -> Result<BTreeMap<String, Option<String>>> {
        self.inputs
            .iter()
            .map(|f| {
                let value = self.get_safe_value(f.slug())?;
                Ok((f.slug().to_string(), value.map(str::to_string)))
            })
            .collect()
    }

    /// Returns the messages of the fields that failed their last validation.
    pub fn errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in &self.inputs {
            if field.is_valid() == Some(false) {
                errors.add(field.slug(), field.message());
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonce::SessionTokens;
    use serde_json::json;

    struct Fixture {
        registry: ValidatorRegistry,
        data: SubmittedData,
        files: UploadedFiles,
    }

    impl Fixture {
        fn new(data: SubmittedData) -> Self {
            Self {
                registry: ValidatorRegistry::with_builtins(),
                data,
                files: UploadedFiles::new(),
            }
        }

        fn ctx(&self) -> FormContext<'_> {
            FormContext::new(&self.registry, &self.data, &self.files)
        }
    }

    fn bare_options() -> FormOptions {
        FormOptions::new().add_honeypot(false).add_submit(false)
    }

    fn slugs(form: &Form<'_>) -> Vec<String> {
        form.inputs().iter().map(|f| f.slug().to_string()).collect()
    }

    #[test]
    fn test_slug_collision_replaces_and_moves_to_end() {
        let fx = Fixture::new(SubmittedData::new());
        let mut form = Form::new(None, fx.ctx());
        form.add_input("Name", None, "");
        form.add_input("Email", None, "");
        form.add_input("Full name", None, "name");

        assert_eq!(slugs(&form), vec!["email", "name"]);
        assert_eq!(form.input("name").unwrap().label(), "Full name");
    }

    #[test]
    fn test_add_inputs_in_order() {
        let fx = Fixture::new(SubmittedData::new());
        let mut form = Form::new(None, fx.ctx());
        form.add_inputs([
            FieldSpec::new("First"),
            FieldSpec::new("Second").slug("two"),
            FieldSpec::new("Third").options(FieldOptions::new().required(true)),
        ]);
        assert_eq!(slugs(&form), vec!["first", "two", "third"]);
        assert!(form.input("third").unwrap().settings().required);

        form.delete_inputs();
        assert!(form.inputs().is_empty());
    }

    #[test]
    fn test_broadcast_settings_respect_exclusions() {
        let fx = Fixture::new(SubmittedData::new());
        let mut form = Form::new(None, fx.ctx());
        form.add_input("A", None, "");
        form.add_input("B", None, "");
        form.set_for_each_input("wrap_class", json!(["row"]), &["b"]).unwrap();
        form.add_setting_for_each_input("class", "wide", &[]).unwrap();
        form.add_input("C", None, "");

        assert_eq!(form.input("a").unwrap().settings().wrap_class, vec!["row"]);
        assert_eq!(form.input("b").unwrap().settings().wrap_class, vec!["form-group"]);
        assert_eq!(form.input("b").unwrap().settings().class, vec!["wide"]);
        assert!(form.input("c").unwrap().settings().class.is_empty());

        assert!(matches!(
            form.add_setting_for_each_input("placeholder", "x", &[]),
            Err(FormError::NotAList(_))
        ));
    }

    #[test]
    fn test_render_envelope_and_auto_submit() {
        let fx = Fixture::new(SubmittedData::new());
        let mut form = Form::new(Some(FormOptions::new().add_honeypot(false)), fx.ctx());
        form.add_input("Name", None, "");
        let html = form.render().unwrap();

        assert!(html.starts_with(
            r#"<form method="post" enctype="application/x-www-form-urlencoded" action=".">"#
        ));
        assert!(html.ends_with(
            r#"<div class="form_field_wrap"><input type="submit" value="Submit" name="submit"></div></form>"#
        ));
    }

    #[test]
    fn test_submit_field_suppresses_auto_submit() {
        let fx = Fixture::new(SubmittedData::new());
        let mut form = Form::new(Some(bare_options().add_submit(true)), fx.ctx());
        form.add_input(
            "Send",
            Some(FieldOptions::new().field_type(FieldType::Submit).value("Send")),
            "",
        );
        assert!(form.has_submit_field());

        let html = form.render().unwrap();
        assert!(!html.contains("form_field_wrap"));
        assert!(html.contains(r#"<input type="submit" id="send" name="send" value="Send">"#));
    }

    #[test]
    fn test_without_form_element() {
        let fx = Fixture::new(SubmittedData::new());
        let mut form = Form::new(Some(bare_options().form_element(false)), fx.ctx());
        form.add_input("Name", None, "");
        let html = form.render().unwrap();
        assert!(html.starts_with("<div"));
        assert!(!html.contains("</form>"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let fx = Fixture::new(SubmittedData::new());
        let mut form = Form::new(None, fx.ctx());
        form.add_input("Name", None, "");

        let first = form.render().unwrap();
        let second = form.render().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.matches(r#"id="form_honeypot""#).count(), 1);
        assert_eq!(slugs(&form), vec!["name"]);
    }

    #[test]
    fn test_honeypot_is_last_and_not_populated() {
        let fx = Fixture::new(SubmittedData::new().with("honeypot", "spam"));
        let mut form = Form::new(Some(FormOptions::new().add_submit(false)), fx.ctx());
        form.add_input("Name", None, "");
        let html = form.render().unwrap();

        let honeypot = html.find("form_honeypot").unwrap();
        assert!(html.find(r#"id="name""#).unwrap() < honeypot);
        assert!(html.contains(
            r#"<div class="hidden"><label for="form_honeypot">Leave blank to submit</label><input type="text" id="form_honeypot" name="honeypot" value="">"#
        ));
        assert!(!html.contains("spam"));
    }

    #[test]
    fn test_synthetic_field_replaces_user_field_with_same_slug() {
        let fx = Fixture::new(SubmittedData::new());
        let mut form = Form::new(Some(FormOptions::new().add_submit(false)), fx.ctx());
        form.add_input("Honeypot", None, "");
        form.add_input("Name", None, "");

        let prepared = form.prepared_fields().unwrap();
        let order: Vec<_> = prepared.iter().map(|f| f.slug().to_string()).collect();
        assert_eq!(order, vec!["name", "honeypot"]);
        assert_eq!(prepared[1].settings().id, "form_honeypot");
    }

    #[test]
    fn test_nonce_requires_provider() {
        let fx = Fixture::new(SubmittedData::new());
        let form = Form::new(Some(bare_options().add_nonce("contact")), fx.ctx());
        assert!(matches!(form.render(), Err(FormError::AntiForgeryUnavailable)));
    }

    #[test]
    fn test_nonce_field_carries_issued_token() {
        let fx = Fixture::new(SubmittedData::new());
        let tokens = SessionTokens::new();
        let form = Form::new(
            Some(bare_options().add_nonce("contact")),
            fx.ctx().with_anti_forgery(&tokens),
        );
        let html = form.render().unwrap();

        let start = html.find(r#"name="nonce" value=""#).unwrap() + r#"name="nonce" value=""#.len();
        let token = &html[start..start + 32];
        assert_eq!(tokens.purpose_of(token).as_deref(), Some("contact"));
        assert!(html.contains(r#"<div class="hidden"><input type="hidden" id="nonce""#));
        assert!(!html.contains("<label"));
    }

    #[test]
    fn test_validate_does_not_short_circuit() {
        let fx = Fixture::new(SubmittedData::new().with("email", "bad").with("age", "x"));
        let mut form = Form::new(None, fx.ctx());
        form.add_input("Email", Some(FieldOptions::new().field_type(FieldType::Email)), "");
        form.add_input("Age", Some(FieldOptions::new().field_type(FieldType::Number)), "");
        form.add_input("Nickname", None, "");

        assert!(!form.validate().unwrap());
        let errors = form.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
        assert_eq!(errors.get("age"), Some("Please enter a number"));

        let values = form.get_safe_values().unwrap();
        assert_eq!(values["email"], None);
        assert_eq!(values["nickname"], Some(String::new()));
    }

    #[test]
    fn test_safe_value_lookup() {
        let fx = Fixture::new(SubmittedData::new().with("name", "Ada"));
        let mut form = Form::new(None, fx.ctx());
        form.add_input("Name", None, "");

        assert_eq!(form.get_safe_value("name").unwrap(), None);
        assert!(form.validate().unwrap());
        assert_eq!(form.get_safe_value("name").unwrap(), Some("Ada"));
        assert!(matches!(
            form.get_safe_value("missing"),
            Err(FormError::FieldNotFound(ref s)) if s == "missing"
        ));
    }

    #[test]
    fn test_render_to_writer() {
        let fx = Fixture::new(SubmittedData::new());
        let mut form = Form::new(Some(bare_options()), fx.ctx());
        form.add_input("Name", None, "");

        let mut out = Vec::new();
        form.render_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), form.render().unwrap());
    }

    #[test]
    fn test_xhtml_markup() {
        let fx = Fixture::new(SubmittedData::new());
        let mut form = Form::new(
            Some(FormOptions::new().add_honeypot(false).markup(Markup::Xhtml)),
            fx.ctx(),
        );
        form.add_input("Name", None, "");
        let html = form.render().unwrap();
        assert!(html.contains(r#"value="" />"#));
        assert!(html.contains(r#"name="submit" />"#));
    }
}
