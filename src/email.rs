use color_eyre::Result;
use serde::Serialize;

use crate::services::access_request::CodeMailer;

#[derive(Serialize)]
struct SendEmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
}

/// Mailer backed by the Resend API. With an empty API key the mailer is
/// disabled and every send is skipped upstream (dev mode).
#[derive(Clone)]
pub struct ResendMailer {
    api_key: String,
    app_url: String,
}

impl ResendMailer {
    pub fn new(api_key: String, app_url: String) -> Self {
        Self { api_key, app_url }
    }
}

impl CodeMailer for ResendMailer {
    fn is_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn send_access_code_email(
        &self,
        to_email: &str,
        student_name: &str,
        code: &str,
    ) -> Result<()> {
        let client = reqwest::Client::new();

        let body = SendEmailRequest {
            from: "Prüfungstrainer <noreply@dzkb.bayern>".to_string(),
            to: vec![to_email.to_string()],
            subject: "Dein Zugangscode für den Prüfungstrainer".to_string(),
            html: access_code_mail_html(student_name, code, &self.app_url),
        };

        let resp = client
            .post("https://api.resend.com/emails")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!("Resend API error: {status} - {text}");
            color_eyre::eyre::bail!("Resend API returned {status}");
        }

        tracing::info!("access code email sent to {to_email}");
        Ok(())
    }
}

fn access_code_mail_html(student_name: &str, code: &str, app_url: &str) -> String {
    format!(
        r#"<h2>Hallo {student_name},</h2>
<p>dein persönlicher Zugangscode für den Prüfungstrainer lautet:</p>
<p style="font-size:18px;font-weight:700;letter-spacing:1px;">{code}</p>
<p>Hier kannst du dich einloggen: <a href="{app_url}">{app_url}</a></p>
<p>Wenn du diese E-Mail nicht erwartet hast, kannst du sie ignorieren.</p>"#
    )
}
