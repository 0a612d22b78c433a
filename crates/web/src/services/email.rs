//! Outbound email via the Resend HTTP API.
//!
//! Renders Askama template pairs (HTML + plain text) and posts them to
//! Resend's `/emails` endpoint. Every email carries both parts.

use askama::Template;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;

use ayka_core::HistoryEntry;

use crate::config::ResendConfig;

/// HTML template for the password reset email.
#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetEmailHtml<'a> {
    display_name: &'a str,
    reset_url: &'a str,
}

/// Plain text template for the password reset email.
#[derive(Template)]
#[template(path = "email/password_reset.txt")]
struct PasswordResetEmailText<'a> {
    display_name: &'a str,
    reset_url: &'a str,
}

/// HTML template for the stock report email.
#[derive(Template)]
#[template(path = "email/stock_report.html")]
struct StockReportEmailHtml<'a> {
    entries: &'a [HistoryEntry],
}

/// Plain text template for the stock report email.
#[derive(Template)]
#[template(path = "email/stock_report.txt")]
struct StockReportEmailText<'a> {
    entries: &'a [HistoryEntry],
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum ResendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("Resend API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Failed to build the request.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Request payload for Resend's send endpoint.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    base_url: String,
    from_address: String,
}

impl Mailer {
    /// Create a new mailer from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ResendConfig) -> Result<Self, ResendError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ResendError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            from_address: config.from_address.clone(),
        })
    }

    /// Send a password reset email containing the reset link.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or a template fails to render.
    pub async fn send_password_reset(
        &self,
        to: &str,
        display_name: &str,
        reset_url: &str,
    ) -> Result<(), ResendError> {
        let html = PasswordResetEmailHtml {
            display_name,
            reset_url,
        }
        .render()?;
        let text = PasswordResetEmailText {
            display_name,
            reset_url,
        }
        .render()?;

        self.send_email(to, "Reset your AykaSosyal password", &text, &html)
            .await
    }

    /// Send a stock report email listing recent stock movements.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or a template fails to render.
    pub async fn send_stock_report(
        &self,
        to: &str,
        entries: &[HistoryEntry],
    ) -> Result<(), ResendError> {
        let html = StockReportEmailHtml { entries }.render()?;
        let text = StockReportEmailText { entries }.render()?;
        let subject = format!("AykaSosyal stock report - {}", Utc::now().format("%Y-%m-%d"));

        self.send_email(to, &subject, &text, &html).await
    }

    /// Post an email with both plain text and HTML bodies to Resend.
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), ResendError> {
        let payload = SendEmailRequest {
            from: &self.from_address,
            to: [to],
            subject,
            html: html_body,
            text: text_body,
        };

        let url = format!("{}/emails", self.base_url);
        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ResendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}
