use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub rate_limit: RateLimit,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimit {
	#[serde(default = "default_max_requests")]
	pub max_requests: u32,
	#[serde(default = "default_window_secs")]
	pub window_secs: u64,
}
impl Default for RateLimit {
	fn default() -> Self {
		Self { max_requests: default_max_requests(), window_secs: default_window_secs() }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	#[serde(default = "default_max_keyword_chars")]
	pub max_keyword_chars: usize,
	#[serde(default = "default_max_slug_chars")]
	pub max_slug_chars: usize,
	#[serde(default = "default_page_size")]
	pub default_page_size: u32,
	#[serde(default = "default_max_page_size")]
	pub max_page_size: u32,
	#[serde(default = "default_cache_max_age_secs")]
	pub cache_max_age_secs: u64,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			max_keyword_chars: default_max_keyword_chars(),
			max_slug_chars: default_max_slug_chars(),
			default_page_size: default_page_size(),
			max_page_size: default_max_page_size(),
			cache_max_age_secs: default_cache_max_age_secs(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	#[serde(default)]
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: false }
	}
}

fn default_max_requests() -> u32 {
	50
}

fn default_window_secs() -> u64 {
	300
}

fn default_max_keyword_chars() -> usize {
	200
}

fn default_max_slug_chars() -> usize {
	50
}

fn default_page_size() -> u32 {
	20
}

fn default_max_page_size() -> u32 {
	100
}

fn default_cache_max_age_secs() -> u64 {
	300
}
