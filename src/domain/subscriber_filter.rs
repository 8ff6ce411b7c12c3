use serde::Deserialize;

use crate::domain::subscriber::Subscriber;

/// Categorical filter of the subscriber directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriberFilter {
    #[default]
    All,
    Active,
    Inactive,
    Free,
    Pro,
}

impl SubscriberFilter {
    pub fn parse(filter: String) -> Result<SubscriberFilter, String> {
        match filter.as_str() {
            "all" => Ok(SubscriberFilter::All),
            "active" => Ok(SubscriberFilter::Active),
            "inactive" => Ok(SubscriberFilter::Inactive),
            "free" => Ok(SubscriberFilter::Free),
            "pro" => Ok(SubscriberFilter::Pro),
            _ => Err(format!("{} is not a valid subscriber filter", filter)),
        }
    }

    pub fn matches(&self, subscriber: &Subscriber) -> bool {
        match self {
            SubscriberFilter::All => true,
            SubscriberFilter::Active => subscriber.is_active,
            SubscriberFilter::Inactive => !subscriber.is_active,
            SubscriberFilter::Free => subscriber.subscription_tier.is_free(),
            SubscriberFilter::Pro => subscriber.subscription_tier.is_pro(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct SubscriberQueryParameters {
    pub search: Option<String>,
    pub filter: Option<String>,
}

/// Free-text search on email or name (case insensitive substring) combined with a categorical filter.
#[derive(Debug, Default)]
pub struct SubscriberQuery {
    search: String,
    filter: SubscriberFilter,
}

impl SubscriberQuery {
    pub fn new(search: &str, filter: SubscriberFilter) -> Self {
        Self {
            search: search.to_lowercase(),
            filter,
        }
    }

    pub fn matches(&self, subscriber: &Subscriber) -> bool {
        let matches_search = subscriber
            .email
            .as_ref()
            .to_lowercase()
            .contains(&self.search)
            || subscriber
                .name
                .as_ref()
                .map(|name| name.to_lowercase().contains(&self.search))
                .unwrap_or(false);

        matches_search && self.filter.matches(subscriber)
    }

    pub fn apply<'a>(&self, subscribers: &'a [Subscriber]) -> Vec<&'a Subscriber> {
        subscribers
            .iter()
            .filter(|subscriber| self.matches(subscriber))
            .collect()
    }
}

impl TryFrom<SubscriberQueryParameters> for SubscriberQuery {
    type Error = String;

    fn try_from(parameters: SubscriberQueryParameters) -> Result<Self, Self::Error> {
        let filter = match parameters.filter {
            Some(filter) => SubscriberFilter::parse(filter)?,
            None => SubscriberFilter::All,
        };

        Ok(SubscriberQuery::new(
            parameters.search.as_deref().unwrap_or_default(),
            filter,
        ))
    }
}

/// Directory counters, always computed over the whole list regardless of the active query.
#[derive(Debug, Default, PartialEq, serde::Serialize)]
pub struct SubscriberStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub free: usize,
    pub pro: usize,
}

impl From<&[Subscriber]> for SubscriberStats {
    fn from(subscribers: &[Subscriber]) -> Self {
        subscribers
            .iter()
            .fold(SubscriberStats::default(), |mut stats, subscriber| {
                stats.total += 1;
                if subscriber.is_active {
                    stats.active += 1;
                } else {
                    stats.inactive += 1;
                }
                if subscriber.subscription_tier.is_pro() {
                    stats.pro += 1;
                } else {
                    stats.free += 1;
                }
                stats
            })
    }
}
