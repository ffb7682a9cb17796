use std::env;

/// Connection settings for the meal store.
///
/// The URL is taken from `MEALWEEK_DATABASE_URL` when set, otherwise the
/// local default applies.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
}

impl DbConfig {
    pub const DEFAULT_URL: &str = "postgresql://localhost:5432/mealweek";

    pub fn from_env() -> Self {
        let database_url =
            env::var("MEALWEEK_DATABASE_URL").unwrap_or_else(|_| Self::DEFAULT_URL.to_owned());
        Self { database_url }
    }

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Database name component of the URL, if present.
    pub fn database_name(&self) -> Option<&str> {
        let (_, name) = self.database_url.rsplit_once('/')?;
        if name.is_empty() { None } else { Some(name) }
    }

    /// URL of the `postgres` maintenance database on the same server, used
    /// to issue `CREATE DATABASE` before the target database exists.
    pub fn maintenance_url(&self) -> String {
        match self.database_url.rsplit_once('/') {
            Some((server, _)) => format!("{server}/postgres"),
            None => self.database_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_name_is_last_path_component() {
        let cfg = DbConfig::new("postgresql://localhost:5432/weekly_meals");
        assert_eq!(cfg.database_name(), Some("weekly_meals"));
    }

    #[test]
    fn database_name_missing() {
        let cfg = DbConfig::new("postgresql:");
        assert_eq!(cfg.database_name(), None);
    }

    #[test]
    fn maintenance_url_swaps_database() {
        let cfg = DbConfig::new("postgresql://localhost:5432/mealweek");
        assert_eq!(
            cfg.maintenance_url(),
            "postgresql://localhost:5432/postgres"
        );
    }
}
