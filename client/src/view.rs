//! What a page should draw, independent of any UI toolkit.

use academy_models::EntityKind;
use academy_validation::{FieldKind, FieldRule};
use serde_json::Value;

/// The input control for a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    TextInput,
    NumberStepper,
    DatePicker,
    DateTimePicker,
    Checkbox,
    /// A searchable select over the related entity's list.
    RelationSelect(EntityKind),
}

impl Widget {
    /// The widget for a field, or `None` for fields that are not edited directly,
    /// such as embedded relation arrays.
    pub fn for_rule(rule: &FieldRule) -> Option<Widget> {
        let widget = match &rule.kind {
            FieldKind::String => Widget::TextInput,
            FieldKind::Integer | FieldKind::Number => Widget::NumberStepper,
            FieldKind::Date => Widget::DatePicker,
            FieldKind::DateTime => Widget::DateTimePicker,
            FieldKind::Boolean => Widget::Checkbox,
            FieldKind::Reference { entity, .. } => {
                Widget::RelationSelect(EntityKind::from_name(entity)?)
            }
            FieldKind::Array(_) => return None,
        };

        Some(widget)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: Widget,
    pub required: bool,
    pub value: Value,
    /// The inline validation message for this field.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub title: String,
    pub fields: Vec<FieldView>,
    /// A page-level error from the last submission.
    pub banner: Option<String>,
    pub submit_enabled: bool,
}

impl FormView {
    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    /// Show a spinner.
    Loading,
    /// The page cannot be shown at all. No form controls are rendered.
    Error { message: String },
    Form(FormView),
}

impl PageView {
    pub fn form(&self) -> Option<&FormView> {
        match self {
            PageView::Form(form) => Some(form),
            _ => None,
        }
    }
}
