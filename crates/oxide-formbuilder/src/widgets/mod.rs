//! HTML rendering of fields and the form envelope.

mod control;

pub use control::{Bounds, Control, ControlAttrs, GroupOption, SelectOption};

use crate::config::{FieldSettings, FormSettings, Markup};
use crate::request::SubmittedData;

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Renders a ` class="..."` attribute, or nothing for an empty list.
pub fn output_classes(classes: &[String]) -> String {
    let classes: Vec<&str> = classes
        .iter()
        .map(String::as_str)
        .filter(|c| !c.is_empty())
        .collect();
    if classes.is_empty() {
        String::new()
    } else {
        format!(r#" class="{}""#, html_escape(&classes.join(" ")))
    }
}

/// Substitutes `parts` into the `%s` slots of `template`, left to right.
///
/// Slots without a part render empty; parts without a slot are dropped.
pub fn fill_template(template: &str, parts: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + parts.iter().map(|p| p.len()).sum::<usize>());
    let mut parts = parts.iter();
    let mut pieces = template.split("%s");
    if let Some(first) = pieces.next() {
        out.push_str(first);
    }
    for piece in pieces {
        out.push_str(parts.next().copied().unwrap_or(""));
        out.push_str(piece);
    }
    out
}

/// Renders the `<label>` of a field, or nothing when suppressed.
pub fn render_label(settings: &FieldSettings) -> String {
    if !settings.add_label || !settings.field_type.has_label() {
        return String::new();
    }
    let marker = if settings.required {
        " <strong>*</strong>"
    } else {
        ""
    };
    format!(
        r#"<label for="{}"{}>{}{marker}</label>"#,
        html_escape(&settings.id),
        output_classes(&settings.label_class),
        html_escape(&settings.label)
    )
}

/// Renders the error container of a field.
pub fn render_errors(message: &str) -> String {
    format!(r#"<div class="error">{}</div>"#, html_escape(message))
}

/// Renders a whole field: envelope, label, control and error message.
///
/// Hidden and raw-HTML fields render their control alone.
pub fn render_field(
    settings: &FieldSettings,
    message: &str,
    data: &SubmittedData,
    markup: Markup,
) -> String {
    let control = Control::from_settings(settings, data);
    let field_html = control.render(markup);

    if settings.field_type.is_bare() {
        return field_html;
    }

    let label_html = if control.has_own_header() {
        format!(
            r#"<div class="checkbox_header">{}</div>"#,
            html_escape(&settings.label)
        )
    } else {
        render_label(settings)
    };

    fill_template(
        &settings.format,
        &[
            &output_classes(&settings.wrap_class),
            &label_html,
            &field_html,
            &render_errors(message),
        ],
    )
}

/// Renders the opening `<form>` tag; empty attributes are omitted.
pub fn form_open(settings: &FormSettings) -> String {
    let mut out = String::from("<form");
    for (attr, value) in [
        ("method", &settings.method),
        ("enctype", &settings.enctype),
        ("action", &settings.action),
        ("id", &settings.id),
    ] {
        if !value.is_empty() {
            out.push_str(&format!(r#" {attr}="{}""#, html_escape(value)));
        }
    }
    out.push_str(&output_classes(&settings.class));
    if settings.novalidate {
        out.push_str(" novalidate");
    }
    out.push('>');
    out
}

/// Closing tag matching [`form_open`].
pub const FORM_CLOSE: &str = "</form>";

/// The submit button appended to forms that have none.
pub fn submit_button(markup: Markup) -> String {
    format!(
        r#"<div class="form_field_wrap"><input type="submit" value="Submit" name="submit"{}</div>"#,
        markup.void_close()
    )
}
