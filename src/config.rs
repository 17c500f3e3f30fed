// src/config.rs

use std::env;

use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub rust_log: String,
    pub accept_invalid_certs: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| "https://localhost:7026".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        // Dev backends commonly run behind a self-signed certificate.
        let accept_invalid_certs = env::var("ACCEPT_INVALID_CERTS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            api_base_url,
            rust_log,
            accept_invalid_certs,
        }
    }
}
