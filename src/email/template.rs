//! Quote notification template

use serde::{Deserialize, Deserializer};
use tera::{Context, Tera};

use super::{EmailError, EmailMessage};
use crate::quote::QuoteFormData;

/// Fields interpolated into the notification.
///
/// Matches the `POST /api/send-email` body. Numeric fields accept either JSON
/// numbers or strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEmailFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(deserialize_with = "number_or_string")]
    pub coverage_amount: f64,
    #[serde(default)]
    pub coverage_type: String,
    #[serde(deserialize_with = "text_or_number")]
    pub term_length: String,
}

impl QuoteEmailFields {
    /// Fields for a submitted wizard form; missing values render empty
    pub fn from_form(form: &QuoteFormData) -> Self {
        Self {
            first_name: form.first_name.clone().unwrap_or_default(),
            last_name: form.last_name.clone().unwrap_or_default(),
            email: form.email.clone().unwrap_or_default(),
            coverage_amount: form.coverage_amount.unwrap_or_default(),
            coverage_type: "Term Life".to_string(),
            term_length: form
                .term_length
                .map(|t| t.years().to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse()
            .map_err(serde::de::Error::custom),
    }
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => format!("{}", n),
        NumberOrString::Text(s) => s,
    })
}

/// US dollar amount with thousands separators, rounded to whole dollars
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.abs().round() as u64;
    let digits = rounded.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0.0 && rounded > 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

const TEMPLATE_NAME: &str = "quote_request.html";

/// `.html` name keeps Tera's autoescaping on for every field
const QUOTE_REQUEST_HTML: &str = r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #1e3a8a;">New Quote Request</h1>
  <p>A new life insurance quote request has been submitted.</p>
  <table style="width: 100%; border-collapse: collapse;">
    <tr><td style="padding: 8px; font-weight: bold;">Name</td><td style="padding: 8px;">{{ first_name }} {{ last_name }}</td></tr>
    <tr><td style="padding: 8px; font-weight: bold;">Email</td><td style="padding: 8px;">{{ email }}</td></tr>
    <tr><td style="padding: 8px; font-weight: bold;">Coverage Amount</td><td style="padding: 8px;">{{ coverage }}</td></tr>
    <tr><td style="padding: 8px; font-weight: bold;">Coverage Type</td><td style="padding: 8px;">{{ coverage_type }}</td></tr>
    <tr><td style="padding: 8px; font-weight: bold;">Term Length</td><td style="padding: 8px;">{{ term_length }} years</td></tr>
  </table>
  <p style="color: #6b7280; font-size: 12px;">Reply to this email to reach the applicant directly.</p>
</div>"#;

/// Render the notification body
pub fn render_quote_email(fields: &QuoteEmailFields) -> Result<String, EmailError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, QUOTE_REQUEST_HTML)?;

    let mut context = Context::new();
    context.insert("first_name", &fields.first_name);
    context.insert("last_name", &fields.last_name);
    context.insert("email", &fields.email);
    context.insert("coverage", &format_currency(fields.coverage_amount));
    context.insert("coverage_type", &fields.coverage_type);
    context.insert("term_length", &fields.term_length);

    Ok(tera.render(TEMPLATE_NAME, &context)?)
}

/// Build the notification message for the agency inbox
pub fn quote_email(
    fields: &QuoteEmailFields,
    from: &str,
    to: &[String],
) -> Result<EmailMessage, EmailError> {
    Ok(EmailMessage {
        from: from.to_string(),
        to: to.to_vec(),
        subject: format!(
            "New Quote Request from {} {}",
            fields.first_name, fields.last_name
        ),
        html: render_quote_email(fields)?,
        reply_to: (!fields.email.is_empty()).then(|| fields.email.clone()),
    })
}
