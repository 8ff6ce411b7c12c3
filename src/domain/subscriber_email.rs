/// Subscriber email address. Only presence is checked: the address is trimmed and must not be empty,
/// no format validation or confirmation step is applied.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        let email = email.trim();

        if email.is_empty() {
            return Err(String::from("Email is required"));
        }

        Ok(Self(email.to_string()))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
