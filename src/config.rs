use anyhow::Result;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb_url: String,
    pub database_name: String,
    pub default_collection: String,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            mongodb_url: env::var("MONGODB_URL")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "service".to_string()),
            default_collection: env::var("MONGODB_DEFAULT_COLLECTION")
                .unwrap_or_else(|_| "documents".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key".to_string()),
        })
    }
}
