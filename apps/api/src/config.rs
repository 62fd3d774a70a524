use anyhow::{bail, Context, Result};

const DEV_FRONTEND_URL: &str = "http://localhost:5173";
const DEV_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];
const MIN_SESSION_SECRET_LEN: usize = 32;

/// Deployment environment, selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" => Ok(Environment::Development),
            "prod" | "production" => Ok(Environment::Production),
            other => bail!("APP_ENV must be 'development' or 'production', got '{other}'"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub database_url: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub jwt_secret: String,
    pub session_secret: String,
    pub anthropic_api_key: String,
    pub frontend_url: String,
    pub public_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let environment = Environment::parse(&std::env::var("APP_ENV").unwrap_or_default())?;
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "9000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        // Production deployments must say where they live; development falls back to localhost.
        let (frontend_url, public_base_url) = match environment {
            Environment::Production => (
                require_env("FRONTEND_URL")?,
                require_env("PUBLIC_BASE_URL")?,
            ),
            Environment::Development => (
                std::env::var("FRONTEND_URL").unwrap_or_else(|_| DEV_FRONTEND_URL.to_string()),
                std::env::var("PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| format!("http://localhost:{port}")),
            ),
        };

        let session_secret = require_env("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            bail!("SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes long");
        }

        Ok(Config {
            environment,
            database_url: require_env("DATABASE_URL")?,
            google_client_id: require_env("GOOGLE_CLIENT_ID")?,
            google_client_secret: require_env("GOOGLE_CLIENT_SECRET")?,
            jwt_secret: require_env("JWT_SECRET")?,
            session_secret,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            frontend_url: trim_trailing_slash(frontend_url),
            public_base_url: trim_trailing_slash(public_base_url),
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Where Google sends the browser back to after consent.
    pub fn oauth_callback_url(&self) -> String {
        format!("{}/api/auth/google/callback", self.public_base_url)
    }

    /// Browser origins allowed to make credentialed cross-origin calls.
    pub fn cors_origins(&self) -> Vec<String> {
        match self.environment {
            Environment::Production => vec![self.frontend_url.clone()],
            Environment::Development => {
                let mut origins: Vec<String> =
                    DEV_CORS_ORIGINS.iter().map(|s| s.to_string()).collect();
                if !origins.contains(&self.frontend_url) {
                    origins.push(self.frontend_url.clone());
                }
                origins
            }
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn trim_trailing_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        environment: Environment::Development,
        database_url: "postgres://localhost/resumeport_test".to_string(),
        google_client_id: "client-id".to_string(),
        google_client_secret: "client-secret".to_string(),
        jwt_secret: "test_jwt_secret_key_12345".to_string(),
        session_secret: "test_session_secret_that_is_long_enough".to_string(),
        anthropic_api_key: "test-key".to_string(),
        frontend_url: DEV_FRONTEND_URL.to_string(),
        public_base_url: "http://localhost:9000".to_string(),
        port: 9000,
        rust_log: "debug".to_string(),
    }
}
