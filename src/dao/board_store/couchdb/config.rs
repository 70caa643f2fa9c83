use super::error::{CouchDaoError, CouchResult};

/// Database used when `COUCH_DB` is not set.
const DEFAULT_DATABASE: &str = "bingo_boards";

const BASE_URL_VAR: &str = "COUCH_BASE_URL";
const DATABASE_VAR: &str = "COUCH_DB";
const USERNAME_VAR: &str = "COUCH_USERNAME";
const PASSWORD_VAR: &str = "COUCH_PASSWORD";

/// Server location, database and optional basic-auth credentials of the CouchDB board store.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    /// Server URL without trailing slash.
    pub base_url: String,
    /// Database holding board and tile documents.
    pub database: String,
    /// Basic-auth user, set together with `password`.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
}

impl CouchConfig {
    /// Anonymous access to `database` on `base_url`.
    pub fn new(base_url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            database: database.into(),
            username: None,
            password: None,
        }
    }

    /// Authenticate with basic auth.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Read `COUCH_BASE_URL`, `COUCH_DB` and the optional credential pair from the environment.
    pub fn from_env() -> CouchResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CouchResult<Self> {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|value| !value.is_empty())
            .ok_or(CouchDaoError::MissingEnvVar { var: BASE_URL_VAR })?;
        let database = lookup(DATABASE_VAR)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_owned());

        let config = Self::new(base_url, database);
        // Credentials only count when both halves are present.
        Ok(match (lookup(USERNAME_VAR), lookup(PASSWORD_VAR)) {
            (Some(username), Some(password)) => config.with_credentials(username, password),
            _ => config,
        })
    }
}
