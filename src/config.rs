use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    /// Static token granting admin claims without a JWT. Disabled when unset.
    pub admin_api_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub holidays_api_key: Option<String>,
    pub leave_allotments: LeaveAllotments,
}

/// Default yearly allotment (in days) per leave bucket.
#[derive(Debug, Clone, Copy)]
pub struct LeaveAllotments {
    pub casual: f64,
    pub sick: f64,
    pub earned: f64,
    pub unpaid: f64,
    pub maternity: f64,
    pub paternity: f64,
}

impl Default for LeaveAllotments {
    fn default() -> Self {
        Self {
            casual: 12.0,
            sick: 12.0,
            earned: 21.0,
            unpaid: 365.0,
            maternity: 180.0,
            paternity: 15.0,
        }
    }
}

impl LeaveAllotments {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            casual: env_f64("LEAVE_ALLOTMENT_CASUAL", defaults.casual),
            sick: env_f64("LEAVE_ALLOTMENT_SICK", defaults.sick),
            earned: env_f64("LEAVE_ALLOTMENT_EARNED", defaults.earned),
            unpaid: env_f64("LEAVE_ALLOTMENT_UNPAID", defaults.unpaid),
            maternity: env_f64("LEAVE_ALLOTMENT_MATERNITY", defaults.maternity),
            paternity: env_f64("LEAVE_ALLOTMENT_PATERNITY", defaults.paternity),
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/peopledesk".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                "your-super-secret-jwt-key-change-this-in-production-12345".to_string()
            }),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            admin_api_token: env::var("ADMIN_API_TOKEN").ok().filter(|t| !t.is_empty()),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            holidays_api_key: env::var("HOLIDAYS_API_KEY").ok().filter(|k| !k.is_empty()),
            leave_allotments: LeaveAllotments::from_env(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allotments_match_policy() {
        let a = LeaveAllotments::default();
        assert_eq!(a.casual, 12.0);
        assert_eq!(a.sick, 12.0);
        assert_eq!(a.earned, 21.0);
        assert_eq!(a.unpaid, 365.0);
        assert_eq!(a.maternity, 180.0);
        assert_eq!(a.paternity, 15.0);
    }
}
