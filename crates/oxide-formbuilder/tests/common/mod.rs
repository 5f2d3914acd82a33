#![allow(dead_code)]

use oxide_formbuilder::{
    Form, FormContext, FormDefinition, FormOptions, SessionTokens, SubmittedData, UploadedFiles,
    ValidatorRegistry,
};

/// Everything one request needs, owned so forms can borrow from it.
pub struct Request {
    pub registry: ValidatorRegistry,
    pub data: SubmittedData,
    pub files: UploadedFiles,
    pub tokens: SessionTokens,
}

impl Request {
    pub fn new(body: &str) -> Self {
        Self {
            registry: ValidatorRegistry::with_builtins(),
            data: SubmittedData::from_urlencoded(body),
            files: UploadedFiles::new(),
            tokens: SessionTokens::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new("")
    }

    pub fn ctx(&self) -> FormContext<'_> {
        FormContext::new(&self.registry, &self.data, &self.files).with_anti_forgery(&self.tokens)
    }

    pub fn form(&self, options: FormOptions) -> Form<'_> {
        Form::new(Some(options), self.ctx())
    }

    pub fn build(&self, definition: &str) -> Form<'_> {
        FormDefinition::from_json_str(definition)
            .unwrap_or_else(|e| panic!("Failed to parse definition: {definition}\nError: {e:?}"))
            .build(self.ctx())
    }
}

/// Form options without the synthetic fields, for exact markup assertions.
pub fn plain() -> FormOptions {
    FormOptions::new()
        .add_honeypot(false)
        .add_submit(false)
        .form_element(false)
}

pub fn render(form: &Form<'_>) -> String {
    form.render()
        .unwrap_or_else(|e| panic!("Failed to render form: {e:?}"))
}
