//! HTML assembly — turns widget descriptors and store documents into the
//! served pages. All user- and board-sourced text is escaped; structure and
//! labels follow the Portuguese survey pages this service hands out.

use crate::forms::config::FormConfig;
use crate::forms::FormInstance;
use crate::render::{Widget, RATING_MAX, RATING_MIN};

/// Header fields shown on the form page, in display order.
const HEADER_FIELDS: [&str; 4] = ["Viagem", "Destino", "Data", "Cliente"];

/// Escape text for use in HTML body text and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page_shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
  body {{ font-family: system-ui, sans-serif; margin: 0; background: #f5f6f8; color: #323338; }}
  .container {{ max-width: 720px; margin: 0 auto; padding: 24px 16px 64px; }}
  h1 {{ font-size: 1.6rem; }}
  .card {{ background: #fff; border: 1px solid #d0d4e4; border-radius: 8px; padding: 16px; margin: 16px 0; }}
  label {{ display: block; font-weight: 600; margin-bottom: 6px; }}
  input[type="text"], textarea, select {{ width: 100%; box-sizing: border-box; padding: 10px;
    border: 2px solid #d0d4e4; border-radius: 8px; font: inherit; }}
  .radio-group label {{ font-weight: 400; display: inline-flex; align-items: center; gap: 6px; margin-right: 16px; }}
  .rating-scale {{ display: flex; gap: 8px; flex-wrap: wrap; margin-top: 8px; }}
  .rating-circle {{ width: 40px; height: 40px; border-radius: 50%; border: 2px solid #d0d4e4;
    display: flex; align-items: center; justify-content: center; cursor: pointer; font-weight: 600;
    background: #fff; user-select: none; }}
  .rating-circle.selected {{ background: #0073ea; border-color: #0073ea; color: #fff; }}
  .section-divider {{ border: 0; border-top: 2px solid #d0d4e4; margin: 8px 0 0; }}
  .header-item {{ margin: 4px 0; }}
  button {{ background: #0073ea; color: #fff; border: 0; border-radius: 8px; padding: 12px 24px;
    font: inherit; font-weight: 600; cursor: pointer; }}
  .error {{ color: #d83a52; }}
</style>
</head>
<body>
<div class="container">
{body}
</div>
</body>
</html>
"#,
        title = escape(title),
        body = body,
    )
}

// ─── Pages ────────────────────────────────────────────────────────────────────

pub fn base_page() -> String {
    page_shell(
        "Formulários",
        r#"<h1>Formulários</h1>
<div class="card">
  <p>Serviço de formulários ligado aos quadros Monday.com.</p>
  <p><a href="/admin">Administração de formulários</a></p>
</div>"#,
    )
}

/// Editable configuration page: the raw document in a textarea plus the
/// current form list, both wired to the JSON API.
pub fn admin_page(config: &FormConfig) -> String {
    let config_json = serde_json::to_string_pretty(config).unwrap_or_else(|_| "{}".to_string());
    let body = format!(
        r#"<h1>Administração</h1>
<div class="card">
  <label for="config">Configuração (JSON)</label>
  <textarea id="config" rows="24" spellcheck="false">{config}</textarea>
  <p><button onclick="saveConfig()">Guardar configuração</button> <span id="config-status"></span></p>
</div>
<div class="card">
  <h2>Formulários gerados</h2>
  <ul id="form-list"><li>A carregar…</li></ul>
</div>
<script>
async function saveConfig() {{
  const status = document.getElementById('config-status');
  try {{
    const body = JSON.parse(document.getElementById('config').value);
    const resp = await fetch('/api/config', {{
      method: 'POST',
      headers: {{ 'Content-Type': 'application/json' }},
      body: JSON.stringify(body),
    }});
    status.textContent = resp.ok ? 'Guardado.' : 'Falha ao guardar.';
    status.className = resp.ok ? '' : 'error';
  }} catch (e) {{
    status.textContent = 'JSON inválido: ' + e.message;
    status.className = 'error';
  }}
}}
async function loadForms() {{
  const list = document.getElementById('form-list');
  const forms = await (await fetch('/api/forms')).json();
  if (!forms.length) {{ list.innerHTML = '<li>Nenhum formulário gerado.</li>'; return; }}
  list.innerHTML = forms.map(f =>
    `<li><a href="/form/${{f.id}}">${{f.title}}</a> — ${{f.type}} — ${{f.created_at}}
     <button onclick="deleteForm('${{f.id}}')">Apagar</button></li>`).join('');
}}
async function deleteForm(id) {{
  await fetch('/api/forms/' + id, {{ method: 'DELETE' }});
  loadForms();
}}
loadForms();
</script>"#,
        config = escape(&config_json),
    );
    page_shell("Administração", &body)
}

pub fn form_page(form: &FormInstance, widgets: &[Widget]) -> String {
    let title = form.title.as_deref().unwrap_or("Formulário");
    let mut body = String::new();

    body.push_str(&format!("<h1>{}</h1>\n", escape(title)));
    if let Some(subtitle) = form.subtitle.as_deref().filter(|s| !s.is_empty()) {
        body.push_str(&format!("<p>{}</p>\n", escape(subtitle)));
    }

    body.push_str(&header_section(form));

    body.push_str(&format!(
        "<form method=\"post\" action=\"/submit_form/{}\">\n",
        escape(&form.id)
    ));
    for widget in widgets {
        body.push_str(&widget_markup(widget));
    }
    body.push_str("<p><button type=\"submit\">Enviar respostas</button></p>\n</form>\n");
    body.push_str(RATING_SCRIPT);

    page_shell(title, &body)
}

pub fn success_page() -> String {
    page_shell(
        "Obrigado",
        r#"<h1>Obrigado!</h1>
<div class="card">
  <p>As suas respostas foram enviadas com sucesso.</p>
</div>"#,
    )
}

// ─── Fragments ────────────────────────────────────────────────────────────────

/// "Informações da Viagem" block: the resolved header fields, fixed order,
/// absent fields skipped.
fn header_section(form: &FormInstance) -> String {
    let items: String = HEADER_FIELDS
        .iter()
        .filter_map(|field| {
            let value = form.header_data.get(*field)?;
            if value.trim().is_empty() {
                return None;
            }
            Some(format!(
                "  <div class=\"header-item\"><strong>{}:</strong> {}</div>\n",
                field,
                escape(value)
            ))
        })
        .collect();

    if items.is_empty() {
        return String::new();
    }
    format!("<div class=\"card\">\n<h3>Informações da Viagem</h3>\n{items}</div>\n")
}

fn required_mark(required: bool) -> &'static str {
    if required {
        " *"
    } else {
        ""
    }
}

fn required_attr(required: bool) -> &'static str {
    if required {
        " required"
    } else {
        ""
    }
}

fn widget_markup(widget: &Widget) -> String {
    match widget {
        Widget::Text {
            id,
            label,
            placeholder,
            required,
        } => format!(
            r#"<div class="card">
  <label for="{id}">{label}{mark}</label>
  <input type="text" id="{id}" name="{id}" placeholder="{placeholder}"{req}>
</div>
"#,
            id = escape(id),
            label = escape(label),
            mark = required_mark(*required),
            placeholder = escape(placeholder),
            req = required_attr(*required),
        ),
        Widget::LongText {
            id,
            label,
            placeholder,
            required,
        } => format!(
            r#"<div class="card">
  <label for="{id}">{label}{mark}</label>
  <textarea id="{id}" name="{id}" rows="4" placeholder="{placeholder}"{req}></textarea>
</div>
"#,
            id = escape(id),
            label = escape(label),
            mark = required_mark(*required),
            placeholder = escape(placeholder),
            req = required_attr(*required),
        ),
        Widget::Dropdown {
            id,
            label,
            options,
            required,
        } => {
            let mut options_html =
                String::from("    <option value=\"\">Selecione uma opção</option>\n");
            for option in options {
                let escaped = escape(option);
                options_html
                    .push_str(&format!("    <option value=\"{escaped}\">{escaped}</option>\n"));
            }
            format!(
                r#"<div class="card">
  <label for="{id}">{label}{mark}</label>
  <select id="{id}" name="{id}"{req}>
{options}  </select>
</div>
"#,
                id = escape(id),
                label = escape(label),
                mark = required_mark(*required),
                req = required_attr(*required),
                options = options_html,
            )
        }
        Widget::YesNo {
            id,
            label,
            required,
        } => format!(
            r#"<div class="card">
  <label>{label}{mark}</label>
  <div class="radio-group">
    <label><input type="radio" name="{id}" value="yes"{req}> Sim</label>
    <label><input type="radio" name="{id}" value="no"{req}> Não</label>
  </div>
</div>
"#,
            id = escape(id),
            label = escape(label),
            mark = required_mark(*required),
            req = required_attr(*required),
        ),
        Widget::Rating {
            id,
            label,
            required,
        } => {
            let circles: String = (RATING_MIN..=RATING_MAX)
                .map(|value| {
                    format!(
                        "    <div class=\"rating-circle\" data-value=\"{value}\" \
                         onclick=\"selectRating('{id}', {value})\">{value}</div>\n",
                        id = escape(id),
                    )
                })
                .collect();
            format!(
                r#"<div class="card">
  <label>{label}{mark}</label>
  <div class="rating-scale" id="{id}_scale">
{circles}  </div>
  <input type="hidden" id="{id}_input" name="{id}"{req}>
</div>
"#,
                id = escape(id),
                label = escape(label),
                mark = required_mark(*required),
                req = required_attr(*required),
                circles = circles,
            )
        }
        Widget::Divider { label } => {
            let heading = label
                .as_deref()
                .map(|t| format!("  <h3>{}</h3>\n", escape(t)))
                .unwrap_or_default();
            format!("<div>\n{heading}  <hr class=\"section-divider\">\n</div>\n")
        }
    }
}

/// Rating circles feed the hidden scalar input; the selected circle is the
/// only highlighted one.
const RATING_SCRIPT: &str = r#"<script>
function selectRating(id, value) {
  document.getElementById(id + '_input').value = value;
  const scale = document.getElementById(id + '_scale');
  for (const circle of scale.querySelectorAll('.rating-circle')) {
    circle.classList.toggle('selected', circle.dataset.value == value);
  }
}
</script>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::QuestionSpec;
    use crate::render;
    use chrono::Utc;

    fn form_fixture() -> FormInstance {
        FormInstance {
            id: "form-1".into(),
            form_type: "guias".into(),
            title: Some("Formulário de Guias".into()),
            subtitle: None,
            created_at: Utc::now(),
            status: "active".into(),
            item_name: None,
            header_data: [("Viagem".to_string(), "Trip <X>".to_string())]
                .into_iter()
                .collect(),
            questions: vec![QuestionSpec {
                id: "q1".into(),
                text: "Nome & apelido".into(),
                required: true,
                ..Default::default()
            }],
            webhook_data: serde_json::Value::Null,
        }
    }

    #[test]
    fn form_page_escapes_board_sourced_text() {
        let form = form_fixture();
        let page = form_page(&form, &render::render(&form));
        assert!(page.contains("Trip &lt;X&gt;"));
        assert!(page.contains("Nome &amp; apelido"));
        assert!(!page.contains("Trip <X>"));
    }

    #[test]
    fn form_page_posts_to_submit_endpoint() {
        let form = form_fixture();
        let page = form_page(&form, &render::render(&form));
        assert!(page.contains("action=\"/submit_form/form-1\""));
    }

    #[test]
    fn rating_widget_emits_ten_circles_and_hidden_input() {
        let widget = Widget::Rating {
            id: "r1".into(),
            label: "Avaliação".into(),
            required: true,
        };
        let markup = widget_markup(&widget);
        assert_eq!(markup.matches("rating-circle").count(), 10);
        assert!(markup.contains("name=\"r1\""));
        assert!(markup.contains("type=\"hidden\""));
    }

    #[test]
    fn dropdown_placeholder_is_always_first() {
        let widget = Widget::Dropdown {
            id: "d1".into(),
            label: "Opções".into(),
            options: vec!["Bom".into(), "Mau".into()],
            required: false,
        };
        let markup = widget_markup(&widget);
        let placeholder = markup.find("Selecione uma opção").unwrap();
        let first_option = markup.find(">Bom<").unwrap();
        assert!(placeholder < first_option);
    }
}
