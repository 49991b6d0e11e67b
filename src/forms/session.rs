use crate::models;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SessionForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 300)]
    #[validate(pattern = r"\S")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub speaker_ids: Vec<String>,
}

impl From<SessionForm> for models::Session {
    fn from(form: SessionForm) -> Self {
        models::Session {
            id: String::new(),
            title: form.title.trim().to_string(),
            description: form.description,
            time: form.time,
            duration: form.duration,
            speaker_ids: form.speaker_ids,
        }
    }
}
