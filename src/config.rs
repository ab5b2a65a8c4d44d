use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cache_ttl_secs: u64,
    pub page_size: usize,
    pub feed_window_months: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            cache_ttl_secs: env::var("CACHE_TTL_SECS").unwrap_or_else(|_| "3600".to_string()).parse().expect("CACHE_TTL_SECS must be a number"),
            page_size: env::var("FEED_PAGE_SIZE").unwrap_or_else(|_| "12".to_string()).parse().expect("FEED_PAGE_SIZE must be a number"),
            feed_window_months: env::var("FEED_WINDOW_MONTHS").unwrap_or_else(|_| "6".to_string()).parse().expect("FEED_WINDOW_MONTHS must be a number"),
        }
    }
}
