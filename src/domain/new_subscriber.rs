use serde::Deserialize;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;

#[derive(Debug)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub name: Option<SubscriberName>,
}

#[derive(Deserialize, Debug)]
pub struct NewSubscriberBody {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl TryFrom<NewSubscriberBody> for NewSubscriber {
    type Error = String;

    fn try_from(body: NewSubscriberBody) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(body.email.unwrap_or_default())?;
        let name = SubscriberName::parse_optional(body.name)?;

        Ok(NewSubscriber { email, name })
    }
}
