use crate::config::EmailConfig;
use crate::error::app_error::AppError;
use crate::guard::LockoutNotifier;
use crate::models::account::Account;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the account-locked notice after too many failed login attempts.
    pub async fn send_account_locked_email(&self, to_email: &str, to_name: &str, lockout_minutes: i64) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::warn!("Email service is disabled, skipping account locked email to {}", to_email);
            return Ok(());
        }

        let subject = format!("Your {} account has been locked", self.config.site_name);
        let html_body = self.generate_locked_email_html(to_name, lockout_minutes);
        let text_body = self.generate_locked_email_text(to_name, lockout_minutes);

        self.send_email(to_email, &subject, &html_body, &text_body).await
    }

    /// Send a login/verification OTP.
    pub async fn send_otp_email(&self, to_email: &str, otp: &str, expiry_minutes: i64) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::warn!("Email service is disabled, skipping OTP email to {}", to_email);
            return Ok(());
        }

        let subject = "Your OTP code for login";
        let html_body = self.generate_otp_email_html(otp, expiry_minutes);
        let text_body = self.generate_otp_email_text(otp, expiry_minutes);

        self.send_email(to_email, subject, &html_body, &text_body).await
    }

    fn generate_locked_email_html(&self, to_name: &str, lockout_minutes: i64) -> String {
        format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Account locked</title>
    <style>
        body {{
            margin: 0;
            padding: 0;
            background-color: #FAFBFC;
            color: #141517;
            font-family: Inter, -apple-system, 'Segoe UI', Roboto, Arial, sans-serif;
            line-height: 1.6;
        }}
        .card {{
            max-width: 640px;
            margin: 28px auto;
            background-color: #FFFFFF;
            border: 1px solid rgba(0, 0, 0, 0.08);
            border-radius: 16px;
            padding: 28px 24px;
        }}
        .title {{
            margin: 0 0 14px;
            font-size: 26px;
            font-weight: 700;
        }}
        .body-text {{
            margin: 0 0 14px;
            font-size: 15px;
            color: #2E3035;
        }}
        .warning {{
            margin: 20px 0;
            padding: 14px 16px;
            background-color: #F8F9FA;
            border-left: 4px solid #FFA940;
            border-radius: 12px;
            font-size: 14px;
        }}
        .footer {{
            margin-top: 20px;
            font-size: 12px;
            color: #5C5F66;
        }}
    </style>
</head>
<body>
    <div class="card">
        <h1 class="title">Your account has been locked</h1>
        <p class="body-text">Hi {},</p>
        <p class="body-text">Your {} account was locked after repeated failed login attempts.</p>
        <div class="warning">
            You can try again in {} minutes. If these attempts were not made by you, please contact our support team immediately.
        </div>
        <p class="footer">{} Security</p>
    </div>
</body>
</html>
"##,
            to_name, self.config.site_name, lockout_minutes, self.config.site_name
        )
    }

    fn generate_locked_email_text(&self, to_name: &str, lockout_minutes: i64) -> String {
        format!(
            r#"{} | Account Locked

Hi {},

Your {} account was locked after repeated failed login attempts.

You can try again in {} minutes. If these attempts were not made by you, please contact our support team immediately.

{} Security
"#,
            self.config.site_name, to_name, self.config.site_name, lockout_minutes, self.config.site_name
        )
    }

    fn generate_otp_email_html(&self, otp: &str, expiry_minutes: i64) -> String {
        format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Your OTP code</title>
    <style>
        body {{
            margin: 0;
            padding: 0;
            background-color: #FAFBFC;
            color: #141517;
            font-family: Inter, -apple-system, 'Segoe UI', Roboto, Arial, sans-serif;
            line-height: 1.6;
        }}
        .card {{
            max-width: 640px;
            margin: 28px auto;
            background-color: #FFFFFF;
            border: 1px solid rgba(0, 0, 0, 0.08);
            border-radius: 16px;
            padding: 28px 24px;
        }}
        .title {{
            margin: 0 0 14px;
            font-size: 26px;
            font-weight: 700;
        }}
        .body-text {{
            margin: 0 0 14px;
            font-size: 15px;
            color: #2E3035;
        }}
        .otp {{
            margin: 20px 0;
            padding: 14px 16px;
            background-color: #F1F3F5;
            border-radius: 12px;
            font-size: 28px;
            font-weight: 700;
            letter-spacing: 0.3em;
            text-align: center;
        }}
        .footer {{
            margin-top: 20px;
            font-size: 12px;
            color: #5C5F66;
        }}
    </style>
</head>
<body>
    <div class="card">
        <h1 class="title">Your OTP code for login</h1>
        <p class="body-text">Use this one-time passcode to sign in to {}:</p>
        <div class="otp">{}</div>
        <p class="body-text">This code expires in {} minutes. Never share it with anyone; {} will never ask for it.</p>
        <p class="footer">{} Security</p>
    </div>
</body>
</html>
"##,
            self.config.site_name, otp, expiry_minutes, self.config.site_name, self.config.site_name
        )
    }

    fn generate_otp_email_text(&self, otp: &str, expiry_minutes: i64) -> String {
        format!(
            r#"{} | OTP Code

Use this one-time passcode to sign in:

{}

This code expires in {} minutes. Never share it with anyone; {} will never ask for it.

{} Security
"#,
            self.config.site_name, otp, expiry_minutes, self.config.site_name, self.config.site_name
        )
    }

    /// Send an email using SMTP
    async fn send_email(&self, to_email: &str, subject: &str, html_body: &str, text_body: &str) -> Result<(), AppError> {
        let email = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_address)
                    .parse()
                    .map_err(|e| AppError::email(format!("Invalid from address: {}", e)))?,
            )
            .to(to_email.parse().map_err(|e| AppError::email(format!("Invalid to address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::email(format!("Failed to build email: {}", e)))?;

        let creds = Credentials::new(self.config.smtp_username.clone(), self.config.smtp_password.clone());

        let mailer = SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| AppError::email(format!("Failed to create SMTP transport: {}", e)))?
            .credentials(creds)
            .port(self.config.smtp_port)
            .build();

        // Send the email (blocking operation, should be run in a separate thread)
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::email(format!("Failed to spawn email sending task: {}", e)))?;

        result.map_err(|e| AppError::email(format!("Failed to send email: {}", e)))?;

        tracing::info!("Email sent successfully to {}", to_email);
        Ok(())
    }
}

#[async_trait::async_trait]
impl LockoutNotifier for EmailService {
    async fn account_locked(&self, account: &Account, lockout_minutes: i64) -> Result<(), AppError> {
        self.send_account_locked_email(&account.email, &account.full_name(), lockout_minutes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: "test".to_string(),
            smtp_password: "test".to_string(),
            from_address: "noreply@nextgenbank.test".to_string(),
            from_name: "NextGen Bank".to_string(),
            site_name: "NextGen Bank".to_string(),
            enabled: false,
        }
    }

    #[test]
    fn test_generate_locked_email_html() {
        let service = EmailService::new(config());
        let html = service.generate_locked_email_html("John Doe", 1);

        assert!(html.contains("John Doe"));
        assert!(html.contains("locked after repeated failed login attempts"));
        assert!(html.contains("try again in 1 minutes"));
        assert!(html.contains("NextGen Bank"));
    }

    #[test]
    fn test_generate_locked_email_text() {
        let service = EmailService::new(config());
        let text = service.generate_locked_email_text("Jane Smith", 30);

        assert!(text.contains("Jane Smith"));
        assert!(text.contains("Account Locked"));
        assert!(text.contains("30 minutes"));
    }

    #[test]
    fn test_generate_otp_email_bodies() {
        let service = EmailService::new(config());
        let html = service.generate_otp_email_html("482913", 1);
        let text = service.generate_otp_email_text("482913", 1);

        assert!(html.contains("482913"));
        assert!(html.contains("expires in 1 minutes"));
        assert!(text.contains("482913"));
        assert!(text.contains("OTP Code"));
    }

    #[tokio::test]
    async fn disabled_service_skips_sending() {
        let service = EmailService::new(config());
        service.send_account_locked_email("jane@nextgenbank.test", "Jane Doe", 1).await.expect("skip");
        service.send_otp_email("jane@nextgenbank.test", "482913", 1).await.expect("skip");
    }
}
