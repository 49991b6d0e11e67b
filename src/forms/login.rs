use serde::Deserialize;

/// Body of `POST /api/admin/login`. A missing password is rejected by the handler.
#[derive(Deserialize, Default)]
pub struct LoginForm {
    #[serde(default)]
    pub password: Option<String>,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}
