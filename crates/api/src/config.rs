//! Application configuration loaded from environment variables.

/// Credentials of the manager account seeded at startup.
#[derive(Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("username", &self.username)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Default for AdminAccount {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "123".to_string(),
            name: "Sr. Joaquim".to_string(),
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DATABASE_URL` — PostgreSQL connection string; unset runs in memory
/// - `DATABASE_MAX_CONNECTIONS` — pool size (default: `5`)
/// - `BAKERY_NAME` — shown on the dashboard (default: `"Pão FresQUIM"`)
/// - `ADMIN_USERNAME`, `ADMIN_PASSWORD`, `ADMIN_NAME` — seeded manager account
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub bakery_name: String,
    pub admin: AdminAccount,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from any key lookup, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(default)
        };

        Self {
            host: text("HOST", defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: text("RUST_LOG", defaults.log_level),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.database_max_connections),
            bakery_name: text("BAKERY_NAME", defaults.bakery_name),
            admin: AdminAccount {
                username: text("ADMIN_USERNAME", defaults.admin.username),
                password: text("ADMIN_PASSWORD", defaults.admin.password),
                name: text("ADMIN_NAME", defaults.admin.name),
            },
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            database_max_connections: 5,
            bakery_name: "Pão FresQUIM".to_string(),
            admin: AdminAccount::default(),
        }
    }
}
