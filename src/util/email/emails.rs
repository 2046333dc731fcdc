use anyhow::Context;

pub const PASSWORD_RESET_EMAIL: &str = include_str!("./password_reset.html");

const FROM_ADDRESS: &str = "fixlog <donotreply@fixlog.dev>";

pub struct PasswordResetEmail {
    pub email: String,
}

impl Default for PasswordResetEmail {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordResetEmail {
    pub fn new() -> Self {
        PasswordResetEmail {
            email: PASSWORD_RESET_EMAIL.to_string(),
        }
    }

    pub fn set_link(mut self, link: &str) -> Self {
        self.email = self.email.replace("$1", link);
        self
    }

    pub fn to_message(self, user_email: &str) -> anyhow::Result<lettre::Message> {
        lettre::Message::builder()
            .from(FROM_ADDRESS.parse()?)
            .to(user_email
                .parse()
                .with_context(|| format!("unparseable recipient address: {user_email}"))?)
            .subject("Reset your fixlog password")
            .header(lettre::message::header::ContentType::TEXT_HTML)
            .body(self.email)
            .map_err(|e| anyhow::anyhow!(e))
    }
}

/// The address the reset email points the user at; the token rides along as
/// query parameters the client feeds back into the consume step.
pub fn password_reset_link(public_base_url: &str, user_email: &str, token: &uuid::Uuid) -> String {
    format!(
        "{}/reset-password?email={}&token={}",
        public_base_url, user_email, token
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_substitution_hits_every_slot() {
        let link = "https://fixlog.dev/reset-password?email=a@b.dev&token=x";
        let email = PasswordResetEmail::new().set_link(link);

        assert!(!email.email.contains("$1"));
        assert!(email.email.matches(link).count() >= 2);
    }

    #[test]
    fn message_builds_for_a_normal_address() {
        let message = PasswordResetEmail::new()
            .set_link("https://fixlog.dev/reset")
            .to_message("dev@example.com");
        assert!(message.is_ok());
    }

    #[test]
    fn reset_link_carries_email_and_token() {
        let token = uuid::Uuid::new_v4();
        let link = password_reset_link("https://fixlog.dev", "dev@example.com", &token);

        assert!(link.starts_with("https://fixlog.dev/reset-password?"));
        assert!(link.contains("email=dev@example.com"));
        assert!(link.contains(&token.to_string()));
    }
}
