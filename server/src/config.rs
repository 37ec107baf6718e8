use anyhow::Result;
use platform_db::DatabaseSettings;

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database = DatabaseSettings::from_lookup(&lookup)?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            database,
            cors_allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_cors_origins() {
        let config = AppConfig::from_lookup(|key| match key {
            "CORS_ALLOWED_ORIGINS" => Some(" http://localhost:5173, ,https://hr.example.com".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:5173", "https://hr.example.com"]
        );
    }

    #[test]
    fn missing_env_means_any_origin_and_no_url() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.database.database_url().is_err());
    }
}
