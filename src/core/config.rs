use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub dashboard: DashboardConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Daily submission cap per authenticated identity (0 disables the check)
    pub daily_report_limit: i64,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

/// Settings for validating gateway-issued bearer tokens.
/// Token issuance lives upstream; this service only verifies the signature
/// and reads the caller identity out of the claims.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub token_secret: String,
    pub issuer: String,
    pub leeway: Duration,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// How long a computed metrics snapshot stays valid per date-range key
    pub cache_ttl: Duration,
    /// Upper bound on one whole metrics computation (all fan-out queries)
    pub compute_deadline: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            dashboard: DashboardConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_DAILY_REPORT_LIMIT: i64 = 20;

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let daily_report_limit = env::var("DAILY_REPORT_LIMIT")
            .unwrap_or_else(|_| Self::DEFAULT_DAILY_REPORT_LIMIT.to_string())
            .parse::<i64>()
            .map_err(|_| "DAILY_REPORT_LIMIT must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            daily_report_limit,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Conservative pool defaults for small-medium deployments
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            idle_timeout: Duration::from_secs(idle_timeout_secs),
            max_lifetime: Duration::from_secs(max_lifetime_secs),
        })
    }
}

impl AuthConfig {
    const DEFAULT_LEEWAY_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let token_secret = env::var("AUTH_TOKEN_SECRET")
            .map_err(|_| "AUTH_TOKEN_SECRET environment variable is required".to_string())?;

        let issuer = env::var("AUTH_TOKEN_ISSUER")
            .map_err(|_| "AUTH_TOKEN_ISSUER environment variable is required".to_string())?;

        let leeway_secs = env::var("AUTH_TOKEN_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "AUTH_TOKEN_LEEWAY must be a valid number".to_string())?;

        Ok(Self {
            token_secret,
            issuer,
            leeway: Duration::from_secs(leeway_secs),
        })
    }
}

impl DashboardConfig {
    const DEFAULT_CACHE_TTL_SECS: u64 = 60;
    const DEFAULT_COMPUTE_DEADLINE_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let cache_ttl_secs = env::var("DASHBOARD_CACHE_TTL")
            .unwrap_or_else(|_| Self::DEFAULT_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DASHBOARD_CACHE_TTL must be a valid number".to_string())?;

        let compute_deadline_secs = env::var("DASHBOARD_COMPUTE_DEADLINE")
            .unwrap_or_else(|_| Self::DEFAULT_COMPUTE_DEADLINE_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DASHBOARD_COMPUTE_DEADLINE must be a valid number".to_string())?;

        Ok(Self {
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            compute_deadline: Duration::from_secs(compute_deadline_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Phytowatch API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Pest outbreak reporting, verification and dashboard API".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
