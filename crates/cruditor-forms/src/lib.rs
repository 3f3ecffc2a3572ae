//! # cruditor-forms
//!
//! The forms framework backing the cruditor form views: field definitions,
//! widgets with CSS-class mapping, forms, formsets with delete markers, and
//! the login / change-password forms.

pub mod auth_forms;
pub mod fields;
pub mod form;
pub mod formset;
pub mod validation;
pub mod widgets;

pub use auth_forms::{ChangePasswordForm, LoginForm, UserStore};
pub use fields::{FormFieldDef, FormFieldType};
pub use form::{BaseForm, Form};
pub use formset::FormSet;
pub use widgets::{Media, Widget, WidgetKind};
