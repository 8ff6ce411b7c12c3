use unicode_segmentation::UnicodeSegmentation;

const MAX_CHAR_LENGTH: usize = 256;

/// Display name of a subscriber or profile, stored as typed. Only blank and overly long names are refused.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SubscriberName(String);

impl SubscriberName {
    pub fn parse(name: String) -> Result<SubscriberName, String> {
        let is_empty_or_whitespace = name.trim().is_empty();
        let is_too_long = name.graphemes(true).count() > MAX_CHAR_LENGTH;

        if is_empty_or_whitespace || is_too_long {
            return Err(format!("{} is not a valid subscriber name", name));
        }

        Ok(Self(name))
    }

    /// Names are optional on subscription: missing or blank values mean "no name".
    pub fn parse_optional(name: Option<String>) -> Result<Option<SubscriberName>, String> {
        match name {
            Some(name) if !name.trim().is_empty() => Self::parse(name).map(Some),
            _ => Ok(None),
        }
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
