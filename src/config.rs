//! Process Configuration
//!
//! All runtime settings are loaded once at startup and passed by reference
//! into the components that need them. Nothing reads the environment after
//! this point.

pub struct Config {
    pub database_path: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "./sweetshop.db".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        let jwt_secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-in-production".to_string());

        let token_ttl_hours = std::env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(168); // 7-day tokens by default

        let admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "adminpass".to_string());

        Self {
            database_path,
            port,
            jwt_secret,
            token_ttl_hours,
            admin_password,
        }
    }
}
