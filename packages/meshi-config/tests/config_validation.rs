use meshi_config::{Config, Error, validate};

fn base_toml() -> String {
	r#"
[service]
http_bind = "127.0.0.1:8080"
admin_bind = "127.0.0.1:8081"
log_level = "info"

[storage.postgres]
dsn = "postgres://localhost/meshi"
pool_max_conns = 4
"#
	.to_string()
}

fn parse(raw: &str) -> Config {
	toml::from_str(raw).expect("Failed to parse config.")
}

#[test]
fn defaults_match_plugin_limits() {
	let cfg = parse(&base_toml());

	assert_eq!(cfg.rate_limit.max_requests, 50);
	assert_eq!(cfg.rate_limit.window_secs, 300);
	assert_eq!(cfg.search.max_keyword_chars, 200);
	assert_eq!(cfg.search.max_slug_chars, 50);
	assert_eq!(cfg.search.cache_max_age_secs, 300);

	validate(&cfg).expect("Defaults must validate.");
}

#[test]
fn rejects_zero_quota() {
	let raw = format!("{}\n[rate_limit]\nmax_requests = 0\n", base_toml());
	let cfg = parse(&raw);

	assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
}

#[test]
fn rejects_zero_window() {
	let raw = format!("{}\n[rate_limit]\nwindow_secs = 0\n", base_toml());
	let cfg = parse(&raw);

	assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
}

#[test]
fn rejects_page_size_inversion() {
	let raw =
		format!("{}\n[search]\ndefault_page_size = 50\nmax_page_size = 10\n", base_toml());
	let cfg = parse(&raw);

	assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
}

#[test]
fn rejects_empty_admin_bind() {
	let mut cfg = parse(&base_toml());

	cfg.service.admin_bind = " ".to_string();

	assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
}

#[test]
fn rejects_zero_pool() {
	let mut cfg = parse(&base_toml());

	cfg.storage.postgres.pool_max_conns = 0;

	assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
}
