//! Form renderer — turns a form instance's question snapshot into an ordered
//! sequence of typed widget descriptors. Pure data in, pure data out; the
//! HTML layer in `rest::pages` decides how each widget looks.

use crate::forms::{is_sentinel_value, FormInstance, QuestionKind};

/// Lowest and highest selectable rating values.
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    /// Single-line free-text input.
    Text {
        id: String,
        label: String,
        placeholder: String,
        required: bool,
    },
    /// Multi-line free-text input.
    LongText {
        id: String,
        label: String,
        placeholder: String,
        required: bool,
    },
    /// Exclusive choice from a fixed option list.
    Dropdown {
        id: String,
        label: String,
        options: Vec<String>,
        required: bool,
    },
    /// Two exclusive choices with canonical values `yes` / `no`.
    YesNo {
        id: String,
        label: String,
        required: bool,
    },
    /// Ten exclusive choices 1..=10 feeding a single hidden scalar; the
    /// submitted value is one of "1".."10" or absent.
    Rating {
        id: String,
        label: String,
        required: bool,
    },
    /// Visual section break. Not answerable.
    Divider { label: Option<String> },
}

/// Render every question of a form, in order. Questions that must not be
/// shown (a `monday_column` without a usable display value) produce nothing.
pub fn render(form: &FormInstance) -> Vec<Widget> {
    form.questions.iter().filter_map(render_question).collect()
}

fn render_question(q: &crate::forms::QuestionSpec) -> Option<Widget> {
    let widget = match q.kind {
        QuestionKind::Text => Widget::Text {
            id: q.id.clone(),
            label: q.text.clone(),
            placeholder: q.placeholder.clone().unwrap_or_default(),
            required: q.required,
        },
        QuestionKind::LongText => Widget::LongText {
            id: q.id.clone(),
            label: q.text.clone(),
            placeholder: q.placeholder.clone().unwrap_or_default(),
            required: q.required,
        },
        QuestionKind::Dropdown => Widget::Dropdown {
            id: q.id.clone(),
            label: q.text.clone(),
            options: parse_dropdown_options(q.dropdown_options.as_deref().unwrap_or("")),
            required: q.required,
        },
        QuestionKind::YesNo => Widget::YesNo {
            id: q.id.clone(),
            label: q.text.clone(),
            required: q.required,
        },
        QuestionKind::Rating => Widget::Rating {
            id: q.id.clone(),
            label: q.text.clone(),
            required: q.required,
        },
        QuestionKind::MondayColumn => {
            let value = q.column_value.as_deref().unwrap_or("");
            if is_sentinel_value(value) {
                return None;
            }
            // The display value doubles as the question label.
            Widget::Rating {
                id: q.id.clone(),
                label: value.trim().to_string(),
                required: q.required,
            }
        }
        QuestionKind::Divider => Widget::Divider {
            label: Some(q.text.trim().to_string()).filter(|t| !t.is_empty()),
        },
    };
    Some(widget)
}

/// Split a ";"-separated option string into trimmed, non-empty options.
pub fn parse_dropdown_options(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{QuestionSpec, VALUE_ERROR_LOADING, VALUE_NOT_FOUND};
    use chrono::Utc;
    use proptest::prelude::*;

    fn form_with(questions: Vec<QuestionSpec>) -> FormInstance {
        FormInstance {
            id: "f1".into(),
            form_type: "guias".into(),
            title: None,
            subtitle: None,
            created_at: Utc::now(),
            status: "active".into(),
            item_name: None,
            header_data: Default::default(),
            questions,
            webhook_data: serde_json::Value::Null,
        }
    }

    fn monday_question(value: Option<&str>) -> QuestionSpec {
        QuestionSpec {
            id: "m1".into(),
            kind: QuestionKind::MondayColumn,
            column_value: value.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn sentinel_monday_column_yields_no_widget() {
        for value in [
            None,
            Some(""),
            Some("   "),
            Some(VALUE_NOT_FOUND),
            Some(VALUE_ERROR_LOADING),
            Some("Dados não disponíveis"),
            Some("Configuração incompleta"),
        ] {
            let form = form_with(vec![monday_question(value)]);
            assert!(render(&form).is_empty(), "value {value:?} must be hidden");
        }
    }

    #[test]
    fn monday_column_value_becomes_rating_label() {
        let form = form_with(vec![monday_question(Some("Hotel Atlântico"))]);
        assert_eq!(
            render(&form),
            vec![Widget::Rating {
                id: "m1".into(),
                label: "Hotel Atlântico".into(),
                required: false,
            }]
        );
    }

    #[test]
    fn dropdown_options_are_trimmed_and_filtered() {
        assert_eq!(
            parse_dropdown_options("Bom; Mau ; ;Razoável;"),
            vec!["Bom", "Mau", "Razoável"]
        );
        assert!(parse_dropdown_options("").is_empty());
        assert!(parse_dropdown_options(" ; ; ").is_empty());
    }

    #[test]
    fn divider_keeps_position_and_title() {
        let form = form_with(vec![
            QuestionSpec {
                id: "q1".into(),
                text: "Nome".into(),
                ..Default::default()
            },
            QuestionSpec {
                kind: QuestionKind::Divider,
                text: "Alojamento".into(),
                ..Default::default()
            },
            QuestionSpec {
                id: "q2".into(),
                kind: QuestionKind::Rating,
                text: "Avaliação geral".into(),
                ..Default::default()
            },
        ]);

        let widgets = render(&form);
        assert_eq!(widgets.len(), 3);
        assert_eq!(
            widgets[1],
            Widget::Divider {
                label: Some("Alojamento".into())
            }
        );
    }

    proptest! {
        #[test]
        fn parsed_options_are_never_empty_or_padded(raw in ".{0,64}") {
            for option in parse_dropdown_options(&raw) {
                prop_assert!(!option.is_empty());
                prop_assert_eq!(option.trim(), option.as_str());
            }
        }
    }
}
