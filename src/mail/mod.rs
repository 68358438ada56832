//! 邮件发送
//!
//! 邮箱确认与重置密码令牌通过 SMTP 发出。未配置 SMTP 时由调用方写入日志。

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::debug;

use crate::config::SmtpConfig;
use crate::errors::{JournalError, Result};

/// 一封纯文本邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailContent {
    pub subject: String,
    pub body: String,
}

fn ttl_text(ttl: u64) -> String {
    if ttl >= 3600 && ttl % 3600 == 0 {
        format!("{} hour(s)", ttl / 3600)
    } else {
        format!("{} minute(s)", ttl.div_ceil(60).max(1))
    }
}

pub fn confirmation_mail(system_name: &str, token: &str, ttl: u64) -> MailContent {
    MailContent {
        subject: format!("{system_name}: email confirmation"),
        body: format!(
            "Your email confirmation token:\n\n{token}\n\nThe token is valid for {}.\n\
             If you did not request it, ignore this message.\n",
            ttl_text(ttl)
        ),
    }
}

pub fn reset_mail(system_name: &str, token: &str, ttl: u64) -> MailContent {
    MailContent {
        subject: format!("{system_name}: password reset"),
        body: format!(
            "Your password reset token:\n\n{token}\n\nThe token is valid for {}.\n\
             If you did not request a password reset, ignore this message.\n",
            ttl_text(ttl)
        ),
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| JournalError::mail(format!("Invalid email address '{address}': {e}")))
}

/// 组装邮件
pub fn compose(from: &Mailbox, to: &str, content: &MailContent) -> Result<Message> {
    Message::builder()
        .from(from.clone())
        .to(parse_mailbox(to)?)
        .subject(content.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(content.body.clone())
        .map_err(|e| JournalError::mail(format!("Failed to build message: {e}")))
}

pub struct MailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl MailSender {
    /// host 或发件人为空时返回 Ok(None)
    pub fn from_config(config: &SmtpConfig) -> Result<Option<Self>> {
        if !config.is_enabled() {
            return Ok(None);
        }

        let from = parse_mailbox(&config.email)?;
        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| JournalError::mail(format!("Invalid SMTP host '{}': {e}", config.host)))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.email.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Some(Self { transport, from }))
    }

    pub async fn send(&self, to: &str, content: &MailContent) -> Result<()> {
        let message = compose(&self.from, to, content)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| JournalError::mail(format!("SMTP delivery to {to} failed: {e}")))?;
        debug!("Sent '{}' to {}", content.subject, to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_texts() {
        let mail = confirmation_mail("Sirius Journal", "tok123", 86_400);
        assert_eq!(mail.subject, "Sirius Journal: email confirmation");
        assert!(mail.body.contains("tok123"));
        assert!(mail.body.contains("24 hour(s)"));

        let mail = reset_mail("Sirius Journal", "abc", 900);
        assert!(mail.subject.ends_with("password reset"));
        assert!(mail.body.contains("15 minute(s)"));
    }

    #[test]
    fn test_compose_message() {
        let from: Mailbox = "journal@sirius.edu".parse().unwrap();
        let mail = confirmation_mail("Sirius Journal", "tok123", 3600);
        let message = compose(&from, "ivan@sirius.edu", &mail).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: ivan@sirius.edu"));
        assert!(raw.contains("From: journal@sirius.edu"));
        assert!(raw.contains("tok123"));

        let err = compose(&from, "not an address", &mail).unwrap_err();
        assert!(matches!(err, JournalError::Mail(_)));
    }

    #[test]
    fn test_disabled_without_host() {
        let config = SmtpConfig {
            host: String::new(),
            port: 465,
            email: "journal@sirius.edu".into(),
            password: String::new(),
            use_tls: true,
        };
        assert!(MailSender::from_config(&config).unwrap().is_none());
    }
}
