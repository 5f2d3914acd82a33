//! Per-kind control markup.

use crate::config::{FieldSettings, Markup};
use crate::field::FieldType;
use crate::request::SubmittedData;
use crate::slug::slugify;

use super::{html_escape, output_classes};

/// Attributes shared by every element-backed control.
#[derive(Debug, Clone, Default)]
pub struct ControlAttrs<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub class: &'a [String],
    pub autofocus: bool,
    pub required: bool,
}

impl ControlAttrs<'_> {
    /// Renders ` id=".." name=".."` followed by the class attribute.
    fn identity(&self) -> String {
        let id = if self.id.is_empty() {
            String::new()
        } else {
            format!(r#" id="{}""#, html_escape(self.id))
        };
        format!(
            r#"{id} name="{}"{}"#,
            html_escape(self.name),
            output_classes(self.class)
        )
    }

    /// Renders the boolean HTML5 attributes that are set.
    fn flags(&self) -> String {
        let mut out = String::new();
        if self.autofocus {
            out.push_str(" autofocus");
        }
        if self.required {
            out.push_str(" required");
        }
        out
    }
}

/// `min`/`max`/`step` of range and number inputs.
#[derive(Debug, Clone, Copy)]
pub struct Bounds<'a> {
    pub min: &'a str,
    pub max: &'a str,
    pub step: &'a str,
}

impl Bounds<'_> {
    fn to_html(self) -> String {
        [("min", self.min), ("max", self.max), ("step", self.step)]
            .into_iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!(r#" {k}="{}""#, html_escape(v)))
            .collect()
    }
}

/// One `<option>` of a select.
#[derive(Debug, Clone)]
pub struct SelectOption<'a> {
    pub key: &'a str,
    pub label: &'a str,
    pub selected: bool,
}

/// One input of a radio or checkbox group.
#[derive(Debug, Clone)]
pub struct GroupOption<'a> {
    pub key: &'a str,
    pub label: &'a str,
    pub id: String,
    pub checked: bool,
}

/// The markup-relevant view of a field, one variant per kind of control.
#[derive(Debug, Clone)]
pub enum Control<'a> {
    /// Caller-supplied markup, emitted untouched.
    Raw { markup: &'a str },
    /// A section heading.
    Heading { text: &'a str },
    TextArea {
        attrs: ControlAttrs<'a>,
        value: &'a str,
        placeholder: &'a str,
    },
    Select {
        attrs: ControlAttrs<'a>,
        options: Vec<SelectOption<'a>>,
    },
    /// Radio or checkbox with several options; one input per option.
    Group {
        input_type: &'a str,
        name: &'a str,
        options: Vec<GroupOption<'a>>,
    },
    /// A single `<input>`.
    Input {
        attrs: ControlAttrs<'a>,
        input_type: &'a str,
        value: &'a str,
        placeholder: &'a str,
        checked: bool,
        bounds: Option<Bounds<'a>>,
    },
}

impl<'a> Control<'a> {
    /// Builds the control for a field, resolving selection state against the
    /// submitted data.
    pub fn from_settings(settings: &'a FieldSettings, data: &'a SubmittedData) -> Self {
        let attrs = ControlAttrs {
            id: &settings.id,
            name: &settings.name,
            class: &settings.class,
            autofocus: settings.autofocus,
            required: settings.required,
        };

        match settings.field_type {
            FieldType::Html => Self::Raw {
                markup: &settings.label,
            },
            FieldType::Title => Self::Heading {
                text: &settings.label,
            },
            FieldType::Textarea => Self::TextArea {
                attrs,
                value: &settings.value,
                placeholder: &settings.placeholder,
            },
            FieldType::Select => {
                let submitted = if settings.request_populate {
                    data.get(&settings.name)
                } else {
                    None
                };
                let options = settings
                    .options
                    .iter()
                    .map(|(key, label)| SelectOption {
                        key,
                        label,
                        selected: match submitted {
                            Some(value) => value == key,
                            None => settings.selected.as_deref() == Some(key),
                        },
                    })
                    .collect();
                Self::Select { attrs, options }
            }
            FieldType::Radio | FieldType::Checkbox if !settings.options.is_empty() => {
                let options = settings
                    .options
                    .iter()
                    .map(|(key, label)| GroupOption {
                        key,
                        label,
                        id: slugify(label),
                        checked: settings.request_populate
                            && data.contains_value(&settings.name, key),
                    })
                    .collect();
                Self::Group {
                    input_type: settings.field_type.input_type(),
                    name: &settings.name,
                    options,
                }
            }
            field_type => Self::Input {
                attrs,
                input_type: field_type.input_type(),
                value: &settings.value,
                placeholder: &settings.placeholder,
                checked: settings.checked,
                bounds: matches!(field_type, FieldType::Range | FieldType::Number).then_some(
                    Bounds {
                        min: &settings.min,
                        max: &settings.max,
                        step: &settings.step,
                    },
                ),
            },
        }
    }

    /// Whether this control brings its own header instead of a `<label>`.
    pub fn has_own_header(&self) -> bool {
        matches!(self, Self::Group { .. })
    }

    /// Renders the control.
    pub fn render(&self, markup: Markup) -> String {
        let close = markup.void_close();
        match self {
            Self::Raw { markup } => (*markup).to_string(),
            Self::Heading { text } => format!("<h3>{}</h3>", html_escape(text)),
            Self::TextArea {
                attrs,
                value,
                placeholder,
            } => format!(
                "<textarea{}{}{}>{value}</textarea>",
                attrs.identity(),
                placeholder_attr(placeholder),
                attrs.flags()
            ),
            Self::Select { attrs, options } => {
                let options: String = options
                    .iter()
                    .map(|opt| {
                        format!(
                            r#"<option value="{}"{}>{}</option>"#,
                            html_escape(opt.key),
                            if opt.selected { " selected" } else { "" },
                            html_escape(opt.label)
                        )
                    })
                    .collect();
                format!(
                    "<select{}{}>{options}</select>",
                    attrs.identity(),
                    attrs.flags()
                )
            }
            Self::Group {
                input_type,
                name,
                options,
            } => options
                .iter()
                .map(|opt| {
                    let id = html_escape(&opt.id);
                    format!(
                        r#"<input type="{input_type}" name="{}" value="{}" id="{id}"{}{close} <label for="{id}">{}</label><br{close}"#,
                        html_escape(name),
                        html_escape(opt.key),
                        if opt.checked { " checked" } else { "" },
                        html_escape(opt.label)
                    )
                })
                .collect(),
            Self::Input {
                attrs,
                input_type,
                value,
                placeholder,
                checked,
                bounds,
            } => format!(
                r#"<input type="{input_type}"{} value="{value}"{}{}{}{}{close}"#,
                attrs.identity(),
                bounds.map(Bounds::to_html).unwrap_or_default(),
                placeholder_attr(placeholder),
                if *checked { " checked" } else { "" },
                attrs.flags()
            ),
        }
    }
}

fn placeholder_attr(placeholder: &str) -> String {
    if placeholder.is_empty() {
        String::new()
    } else {
        format!(r#" placeholder="{}""#, html_escape(placeholder))
    }
}
