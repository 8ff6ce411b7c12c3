use chrono::{DateTime, Utc};
use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

const MAX_TITLE_LENGTH: usize = 256;

/// A row of the `newsletters` table.
///
/// There are only two states, draft (`is_published == false`) and published. A published newsletter always
/// carries `published_at`, a draft never does.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Newsletter {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub is_published: bool,
    pub is_premium: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i32,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Newsletter {
    pub fn is_draft(&self) -> bool {
        !self.is_published
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsletterTitle(String);

impl NewsletterTitle {
    pub fn parse(title: String) -> Result<NewsletterTitle, String> {
        if title.trim().is_empty() {
            return Err(String::from("Newsletter title is required"));
        }

        if title.graphemes(true).count() > MAX_TITLE_LENGTH {
            return Err(format!(
                "Newsletter title cannot be longer than {} characters",
                MAX_TITLE_LENGTH
            ));
        }

        Ok(Self(title))
    }
}

impl AsRef<str> for NewsletterTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Body sent by the editor both when creating and when updating a newsletter.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterDraftBody {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub publish: bool,
}

pub struct NewsletterDraft {
    pub title: NewsletterTitle,
    pub content: String,
    pub excerpt: Option<String>,
    pub is_premium: bool,
    pub publish: bool,
}

impl NewsletterDraft {
    /// Saving with `publish` stamps the publication time, saving without it turns the newsletter back into a draft.
    pub fn published_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.publish {
            Some(now)
        } else {
            None
        }
    }
}

impl TryFrom<NewsletterDraftBody> for NewsletterDraft {
    type Error = String;

    fn try_from(body: NewsletterDraftBody) -> Result<Self, Self::Error> {
        let title = NewsletterTitle::parse(body.title)?;
        let excerpt = body.excerpt.filter(|excerpt| !excerpt.trim().is_empty());

        Ok(NewsletterDraft {
            title,
            content: body.content,
            excerpt,
            is_premium: body.is_premium,
            publish: body.publish,
        })
    }
}
