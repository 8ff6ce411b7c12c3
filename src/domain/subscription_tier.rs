#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Pro,
}

impl SubscriptionTier {
    pub fn is_free(&self) -> bool {
        matches!(self, SubscriptionTier::Free)
    }

    pub fn is_pro(&self) -> bool {
        matches!(self, SubscriptionTier::Pro)
    }

    pub fn parse(tier: String) -> Result<SubscriptionTier, String> {
        match tier.as_str() {
            "free" => Ok(SubscriptionTier::Free),
            "pro" => Ok(SubscriptionTier::Pro),
            _ => Err(format!("{} is not a valid subscription tier", tier)),
        }
    }
}

impl AsRef<str> for SubscriptionTier {
    fn as_ref(&self) -> &str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Pro => "pro",
        }
    }
}
