//! HTML pages.
//!
//! Static pages are embedded as-is; the few dynamic ones fill `{{placeholder}}`
//! markers with escaped values.

use crate::models::Permit;

const INDEX: &str = include_str!("web/index.html");
const MENU: &str = include_str!("web/menu.html");
const COMPANY_FORM: &str = include_str!("web/empresa.html");
const LOOKUP_FORM: &str = include_str!("web/validar_datos.html");
const EXIT: &str = include_str!("web/salida.html");
const USERS: &str = include_str!("web/registrar.html");
const RESET: &str = include_str!("web/reset.html");
const NO_RECORDS: &str = include_str!("web/sin_registros.html");
const LOGIN_ERROR: &str = include_str!("web/error_ingreso.html");
const ERROR: &str = include_str!("web/error.html");
const LAYOUT: &str = include_str!("web/layout.html");

pub fn index() -> &'static str {
    INDEX
}

pub fn menu() -> &'static str {
    MENU
}

pub fn lookup_form() -> &'static str {
    LOOKUP_FORM
}

pub fn exit() -> &'static str {
    EXIT
}

/// Registration and login forms
pub fn users() -> &'static str {
    USERS
}

pub fn reset_done() -> &'static str {
    RESET
}

pub fn no_records() -> &'static str {
    NO_RECORDS
}

pub fn login_error() -> &'static str {
    LOGIN_ERROR
}

/// Company permit form, optionally greeting the logged-in user
pub fn company_form(user_name: Option<&str>) -> String {
    let greeting = user_name
        .map(|name| format!("<p>Hola, {}</p>", escape_html(name)))
        .unwrap_or_default();
    COMPANY_FORM.replace("{{greeting}}", &greeting)
}

pub fn error_page(message: &str) -> String {
    ERROR.replace("{{message}}", &escape_html(message))
}

/// Confirmation echoing a stored permit
pub fn permit_submitted(permit: &Permit) -> String {
    let content = format!(
        "<p>Se registraron los siguientes datos:</p>\n{}",
        permits_table(std::slice::from_ref(permit))
    );
    with_layout("Permiso registrado", &content)
}

/// Lookup result for a circulation code
pub fn permit_lookup(permits: &[Permit]) -> String {
    let content = format!(
        "{}\n<p><a href=\"/validar_datos.html\">Consultar otro código</a></p>",
        permits_table(permits)
    );
    with_layout("Permiso habilitado", &content)
}

fn with_layout(title: &str, content: &str) -> String {
    LAYOUT
        .replace("{{title}}", &escape_html(title))
        .replace("{{content}}", content)
}

fn permits_table(permits: &[Permit]) -> String {
    let mut html = String::from("<table>\n<tr>");
    if let Some(first) = permits.first() {
        for (label, _) in first.labeled_fields() {
            html.push_str(&format!("<th>{}</th>", escape_html(label)));
        }
    }
    html.push_str("</tr>\n");

    for permit in permits {
        html.push_str("<tr>");
        for (_, value) in permit.labeled_fields() {
            html.push_str(&format!("<td>{}</td>", escape_html(&value)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>");
    html
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permit() -> Permit {
        Permit {
            code: 77,
            company: "<B>ACME</B>".to_string(),
            activity: "SALUD".to_string(),
            person_name: "JUAN".to_string(),
            age: 40,
            national_id: 20111222,
            issued_at: "2021-05-01 10:00:00.000000".to_string(),
            risk: "MEDIO".to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("PLAIN 123"), "PLAIN 123");
    }

    #[test]
    fn test_permit_page_escapes_values() {
        let html = permit_submitted(&permit());

        assert!(html.contains("&lt;B&gt;ACME&lt;/B&gt;"));
        assert!(!html.contains("<B>ACME"));
        assert!(html.contains("<td>20111222</td>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_company_form_greeting() {
        let html = company_form(Some("ana <script>"));
        assert!(html.contains("Hola, ana &lt;script&gt;"));
        assert!(html.contains("action=\"/procesar\""));

        let html = company_form(None);
        assert!(!html.contains("Hola"));
        assert!(!html.contains("{{greeting}}"));
    }

    #[test]
    fn test_error_page_message() {
        let html = error_page("Datos ingresados incorrectos");
        assert!(html.contains("<p>Datos ingresados incorrectos</p>"));
    }
}
