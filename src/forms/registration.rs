use crate::models;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 200)]
    #[validate(pattern = r"\S")]
    pub name: String,
    #[validate(pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$")]
    #[validate(max_length = 254)]
    pub email: String,
    #[validate(min_length = 1)]
    #[validate(max_length = 200)]
    #[validate(pattern = r"\S")]
    pub designation: String,
}

impl RegistrationForm {
    pub fn into_model(self, created_at: DateTime<Utc>) -> models::Registration {
        models::Registration {
            id: String::new(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            designation: self.designation.trim().to_string(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, designation: &str) -> RegistrationForm {
        RegistrationForm {
            name: name.to_string(),
            email: email.to_string(),
            designation: designation.to_string(),
        }
    }

    #[test]
    fn accepts_complete_registration() {
        assert!(form("Ada", "ada@example.com", "Engineer").validate().is_ok());
    }

    #[test]
    fn rejects_bad_email_and_empty_fields() {
        assert!(form("Ada", "not-an-email", "Engineer").validate().is_err());
        assert!(form("Ada", "ada@example", "Engineer").validate().is_err());
        assert!(form("", "ada@example.com", "Engineer").validate().is_err());
        assert!(form("Ada", "ada@example.com", "").validate().is_err());
        assert!(form("   ", "ada@example.com", "Engineer").validate().is_err());
    }
}
