//! Widgets: the bridge between form fields and their HTML representation.
//!
//! Each widget knows how to render itself, which CSS classes it carries, and
//! which static assets (media) it needs. The stock constructors apply the
//! bootstrap-flavoured classes the cruditor templates expect; the
//! [`split_date_time`](Widget::split_date_time), [`auto_slug`](Widget::auto_slug),
//! and [`select2_multiple`](Widget::select2_multiple) constructors produce the
//! customized widgets the original admin layer ships.

use std::collections::BTreeMap;
use std::fmt;

/// Enumerates the built-in widget shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// `<input type="text">`.
    TextInput,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="email">`.
    EmailInput,
    /// `<input type="password">`.
    PasswordInput,
    /// `<input type="hidden">`.
    HiddenInput,
    /// `<textarea>`.
    Textarea,
    /// `<input type="checkbox">`.
    CheckboxInput,
    /// `<select>`.
    Select,
    /// `<select multiple>`.
    SelectMultiple,
    /// `<input type="date">`.
    DateInput,
    /// `<input type="datetime-local">`.
    DateTimeInput,
    /// Two inputs (date + time) rendered side by side.
    SplitDateTime,
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::NumberInput => "NumberInput",
            Self::EmailInput => "EmailInput",
            Self::PasswordInput => "PasswordInput",
            Self::HiddenInput => "HiddenInput",
            Self::Textarea => "Textarea",
            Self::CheckboxInput => "CheckboxInput",
            Self::Select => "Select",
            Self::SelectMultiple => "SelectMultiple",
            Self::DateInput => "DateInput",
            Self::DateTimeInput => "DateTimeInput",
            Self::SplitDateTime => "SplitDateTime",
        };
        write!(f, "{name}")
    }
}

/// Static assets a widget needs on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Media {
    /// Stylesheet paths.
    pub css: Vec<String>,
    /// Script paths.
    pub js: Vec<String>,
}

impl Media {
    /// Returns `true` if no assets are required.
    pub fn is_empty(&self) -> bool {
        self.css.is_empty() && self.js.is_empty()
    }
}

/// An HTML form widget: a shape plus attributes and media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    /// The widget shape.
    pub kind: WidgetKind,
    /// HTML attributes, rendered in sorted order.
    pub attrs: BTreeMap<String, String>,
    /// Static assets this widget needs.
    pub media: Media,
}

impl Widget {
    fn with_class(kind: WidgetKind, css_class: &str) -> Self {
        let mut attrs = BTreeMap::new();
        if !css_class.is_empty() {
            attrs.insert("class".to_string(), css_class.to_string());
        }
        Self {
            kind,
            attrs,
            media: Media::default(),
        }
    }

    /// A text input with the standard form-control class.
    pub fn text_input() -> Self {
        Self::with_class(WidgetKind::TextInput, "form-control")
    }

    /// A number input with the standard form-control class.
    pub fn number_input() -> Self {
        Self::with_class(WidgetKind::NumberInput, "form-control")
    }

    /// An email input with the standard form-control class.
    pub fn email_input() -> Self {
        Self::with_class(WidgetKind::EmailInput, "form-control")
    }

    /// A password input with the standard form-control class.
    pub fn password_input() -> Self {
        Self::with_class(WidgetKind::PasswordInput, "form-control")
    }

    /// A hidden input.
    pub fn hidden_input() -> Self {
        Self::with_class(WidgetKind::HiddenInput, "")
    }

    /// A textarea with the standard form-control class.
    pub fn textarea() -> Self {
        Self::with_class(WidgetKind::Textarea, "form-control")
    }

    /// A checkbox input with the form-check class.
    pub fn checkbox_input() -> Self {
        Self::with_class(WidgetKind::CheckboxInput, "form-check-input")
    }

    /// A select with the form-select class.
    pub fn select() -> Self {
        Self::with_class(WidgetKind::Select, "form-select")
    }

    /// A multi-select with the form-select class.
    pub fn select_multiple() -> Self {
        Self::with_class(WidgetKind::SelectMultiple, "form-select")
    }

    /// A date input with the standard form-control class.
    pub fn date_input() -> Self {
        Self::with_class(WidgetKind::DateInput, "form-control")
    }

    /// A datetime input with the standard form-control class.
    pub fn datetime_input() -> Self {
        Self::with_class(WidgetKind::DateTimeInput, "form-control")
    }

    /// Date and time inputs rendered side by side in a grid row.
    pub fn split_date_time() -> Self {
        Self::with_class(WidgetKind::SplitDateTime, "form-control")
    }

    /// A text input that slugifies the value of another field on the client.
    ///
    /// `autoslug` names the source field; the bundled slugify scripts pick the
    /// widget up via its `data-autoslug` attribute.
    pub fn auto_slug(autoslug: &str) -> Self {
        let mut widget = Self::with_class(WidgetKind::TextInput, "slugify");
        widget
            .attrs
            .insert("data-autoslug".to_string(), autoslug.to_string());
        widget.media.js = vec![
            "cruditor/js/jquery-slugify/jquery.slugify.js".to_string(),
            "cruditor/js/jquery-slugify/slugify-activator.js".to_string(),
        ];
        widget
    }

    /// A multi-select enhanced by select2 on the client.
    pub fn select2_multiple() -> Self {
        let mut widget = Self::with_class(WidgetKind::SelectMultiple, "select2-multiple");
        widget.media.css = vec![
            "cruditor/css/select2.css".to_string(),
            "cruditor/css/bootstrap-select2.css".to_string(),
        ];
        widget.media.js = vec![
            "cruditor/js/bootstrap-select2/select2.js".to_string(),
            "cruditor/js/bootstrap-select2/select2-activator.js".to_string(),
        ];
        widget
    }

    /// Sets an attribute.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    /// Returns `true` if this widget renders as a hidden input.
    pub const fn is_hidden(&self) -> bool {
        matches!(self.kind, WidgetKind::HiddenInput)
    }

    /// Returns the `id` attribute used for the associated `<label>`.
    pub fn id_for_label(&self, html_name: &str) -> String {
        format!("id_{html_name}")
    }

    fn attr_string(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.attrs {
            out.push_str(&format!(r#" {name}="{}""#, escape(value)));
        }
        out
    }

    /// Renders this widget as HTML for the given field name and values.
    ///
    /// `choices` is only consulted by select widgets.
    pub fn render(&self, html_name: &str, values: &[String], choices: &[(String, String)]) -> String {
        let id = self.id_for_label(html_name);
        let value = values.first().map(String::as_str).unwrap_or("");
        let attrs = self.attr_string();

        match self.kind {
            WidgetKind::TextInput => input_tag("text", html_name, &id, value, &attrs),
            WidgetKind::NumberInput => input_tag("number", html_name, &id, value, &attrs),
            WidgetKind::EmailInput => input_tag("email", html_name, &id, value, &attrs),
            WidgetKind::PasswordInput => input_tag("password", html_name, &id, "", &attrs),
            WidgetKind::HiddenInput => input_tag("hidden", html_name, &id, value, &attrs),
            WidgetKind::DateInput => input_tag("date", html_name, &id, value, &attrs),
            WidgetKind::DateTimeInput => input_tag("datetime-local", html_name, &id, value, &attrs),
            WidgetKind::Textarea => format!(
                r#"<textarea name="{html_name}" id="{id}"{attrs}>{}</textarea>"#,
                escape(value)
            ),
            WidgetKind::CheckboxInput => {
                let checked = if matches!(value, "on" | "true" | "1") {
                    " checked"
                } else {
                    ""
                };
                format!(
                    r#"<input type="checkbox" name="{html_name}" id="{id}"{attrs}{checked} />"#
                )
            }
            WidgetKind::Select => select_tag(html_name, &id, values, choices, false, &attrs),
            WidgetKind::SelectMultiple => select_tag(html_name, &id, values, choices, true, &attrs),
            WidgetKind::SplitDateTime => {
                let date = input_tag("date", &format!("{html_name}_0"), &format!("{id}_0"), values.first().map(String::as_str).unwrap_or(""), &attrs);
                let time = input_tag("time", &format!("{html_name}_1"), &format!("{id}_1"), values.get(1).map(String::as_str).unwrap_or(""), &attrs);
                format!(
                    r#"<div class="row"><div class="col-xs-6">{date}</div><div class="col-xs-6">{time}</div></div>"#
                )
            }
        }
    }
}

fn input_tag(input_type: &str, name: &str, id: &str, value: &str, attrs: &str) -> String {
    if value.is_empty() {
        format!(r#"<input type="{input_type}" name="{name}" id="{id}"{attrs} />"#)
    } else {
        format!(
            r#"<input type="{input_type}" name="{name}" id="{id}" value="{}"{attrs} />"#,
            escape(value)
        )
    }
}

fn select_tag(
    name: &str,
    id: &str,
    values: &[String],
    choices: &[(String, String)],
    multiple: bool,
    attrs: &str,
) -> String {
    let multiple_attr = if multiple { " multiple" } else { "" };
    let mut options = String::new();
    for (value, label) in choices {
        let selected = if values.iter().any(|v| v == value) {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            r#"<option value="{}"{selected}>{}</option>"#,
            escape(value),
            escape(label)
        ));
    }
    format!(r#"<select name="{name}" id="{id}"{attrs}{multiple_attr}>{options}</select>"#)
}

/// Escapes the HTML-significant characters in an attribute or text value.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
