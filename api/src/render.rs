//! HTML views
//!
//! Pages are rendered through the [`Renderer`] capability so handlers only
//! pick a view name and pass its data.

use serde_json::Value;
use thiserror::Error;

pub const HOME_VIEW: &str = "home";
pub const PIN_FORM_VIEW: &str = "pinform";
pub const FAILURE_VIEW: &str = "failure";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("unknown view: {0}")]
    UnknownView(String),
}

/// Renders a named view with its data
pub trait Renderer: Send + Sync {
    fn render(&self, view: &str, data: &Value) -> Result<String, RenderError>;
}

/// Built-in renderer for the three pages of the verification flow
///
/// - `home`: `{ "verified": bool }`
/// - `pinform`: no data
/// - `failure`: `{ "message": string }`
#[derive(Debug, Default, Clone)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn home(data: &Value) -> String {
        let verified = data
            .get("verified")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let body = if verified {
            "<p>your telephone number is verified</p>".to_string()
        } else {
            concat!(
                "<p>your telephone number is not verified yet</p>\n",
                "<form method=\"post\" action=\"/verify\">\n",
                "<label for=\"tel\">telephone number (E.164)</label>\n",
                "<input id=\"tel\" name=\"tel\" type=\"tel\" placeholder=\"+819012345678\" required>\n",
                "<button type=\"submit\">send PIN</button>\n",
                "</form>"
            )
            .to_string()
        };
        page("home", &body)
    }

    fn pin_form() -> String {
        page(
            "check",
            concat!(
                "<p>enter the 4 digit PIN sent to your telephone</p>\n",
                "<form method=\"post\" action=\"/check\">\n",
                "<label for=\"pin\">PIN</label>\n",
                "<input id=\"pin\" name=\"pin\" inputmode=\"numeric\" maxlength=\"4\" required>\n",
                "<button type=\"submit\">verify</button>\n",
                "</form>"
            ),
        )
    }

    fn failure(data: &Value) -> String {
        let message = data
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("something went wrong");
        page(
            "failure",
            &format!(
                "<p>{}</p>\n<a href=\"/\">go to home</a>",
                escape_html(message)
            ),
        )
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, view: &str, data: &Value) -> Result<String, RenderError> {
        match view {
            HOME_VIEW => Ok(Self::home(data)),
            PIN_FORM_VIEW => Ok(Self::pin_form()),
            FAILURE_VIEW => Ok(Self::failure(data)),
            other => Err(RenderError::UnknownView(other.to_string())),
        }
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        title, body
    )
}

/// Escape text for HTML element content
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
