//! # oxide-formbuilder
//!
//! Declarative HTML forms with ordered, fail-fast validator chains.
//!
//! This crate provides:
//! - Settings resolution with defaults, typed overrides and pass-through
//!   options
//! - A registry of named validators with per-validator error messages
//! - Fields that render their own envelope, label, control and error
//! - Forms that add anti-spam and anti-forgery fields and validate every
//!   field in order
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_formbuilder::{
//!     FieldOptions, FieldType, Form, FormContext, FormOptions,
//!     SubmittedData, UploadedFiles, ValidatorRegistry,
//! };
//!
//! let registry = ValidatorRegistry::with_builtins();
//! let data = SubmittedData::from_urlencoded("name=Ada&email=ada%40example.com");
//! let files = UploadedFiles::new();
//!
//! let mut form = Form::new(
//!     Some(FormOptions::new().action("/contact")),
//!     FormContext::new(&registry, &data, &files),
//! );
//! form.add_input("Name", Some(FieldOptions::new().required(true)), "");
//! form.add_input(
//!     "Email",
//!     Some(FieldOptions::new().field_type(FieldType::Email)),
//!     "",
//! );
//!
//! let html = form.render().unwrap();
//! assert!(html.starts_with("<form"));
//!
//! assert!(form.validate().unwrap());
//! assert_eq!(form.get_safe_value("email").unwrap(), Some("ada@example.com"));
//! ```
//!
//! ## Custom Validators
//!
//! ```rust
//! use oxide_formbuilder::ValidatorRegistry;
//!
//! let mut registry = ValidatorRegistry::with_builtins();
//! registry.register("maxlength", "This value is too long", |value: &str, args: &[String]| {
//!     args.first()
//!         .and_then(|max| max.parse::<usize>().ok())
//!         .is_some_and(|max| value.chars().count() <= max)
//! });
//! // Fields now accept `"validators": ["maxlength-35"]`.
//! ```
//!
//! ## Definitions
//!
//! ```rust
//! use oxide_formbuilder::{FormContext, FormDefinition, SubmittedData, UploadedFiles, ValidatorRegistry};
//!
//! let definition = FormDefinition::from_json_str(r#"{
//!     "form": { "add_honeypot": false },
//!     "fields": ["Name", ["Email", { "type": "email", "required": true }]]
//! }"#).unwrap();
//!
//! let registry = ValidatorRegistry::with_builtins();
//! let data = SubmittedData::new();
//! let files = UploadedFiles::new();
//! let mut form = definition.build(FormContext::new(&registry, &data, &files));
//!
//! assert!(!form.validate().unwrap());
//! assert_eq!(form.errors().get("email"), Some("This field is required"));
//! ```

pub mod choices;
pub mod config;
pub mod definition;
mod error;
pub mod field;
pub mod form;
pub mod nonce;
pub mod request;
pub mod slug;
pub mod validation;
pub mod widgets;

pub use choices::Choices;
pub use config::{FieldOptions, FieldSettings, FormOptions, FormSettings, Markup};
pub use definition::{FieldSpec, FormDefinition};
pub use error::{FormError, Result, ValidationErrors};
pub use field::{Field, FieldType};
pub use form::{Form, FormContext};
pub use nonce::{AntiForgery, SessionTokens};
pub use request::{FileUpload, SubmittedData, UploadedFiles};
pub use slug::slugify;
pub use validation::{Validator, ValidatorRef, ValidatorRegistry};
