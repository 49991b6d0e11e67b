use crate::models;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 200)]
    #[validate(pattern = r"\S")]
    pub name: String,
    #[serde(default)]
    #[validate(max_length = 5000)]
    pub bio: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub twitter_url: Option<String>,
}

// blank links are dropped so they are omitted from responses
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<SpeakerForm> for models::Speaker {
    fn from(form: SpeakerForm) -> Self {
        models::Speaker {
            id: String::new(),
            name: form.name.trim().to_string(),
            bio: form.bio,
            image_url: non_blank(form.image_url),
            linkedin_url: non_blank(form.linkedin_url),
            twitter_url: non_blank(form.twitter_url),
        }
    }
}
