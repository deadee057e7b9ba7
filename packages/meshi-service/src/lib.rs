pub mod admin;
pub mod list;
pub mod rate_limit;
pub mod resolve;
pub mod search;
pub mod time_serde;

pub use admin::{
	AssignTermRequest, CreateRestaurantRequest, CreateTermRequest, RestaurantCreated, TermCreated,
};
pub use list::{ListRequest, ListResponse, RestaurantItem};
pub use rate_limit::RateLimiter;
pub use resolve::Resolution;
pub use search::{CountResponse, SearchRequest, SearchResponse};

use meshi_config::Config;
use meshi_storage::db::Db;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Too many search requests from this address.")]
	RateLimited,
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<meshi_storage::Error> for Error {
	fn from(err: meshi_storage::Error) -> Self {
		match err {
			meshi_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			meshi_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			meshi_storage::Error::NotFound(message) => Self::NotFound { message },
			meshi_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}

/// The search scoping service. Explicitly constructed and injected into
/// request handlers; holds the only cross-request mutable state (the rate
/// limiter's per-IP windows).
pub struct MeshiService {
	pub cfg: Config,
	pub db: Db,
	pub limiter: RateLimiter,
}
impl MeshiService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let limiter = RateLimiter::new(&cfg.rate_limit);

		Self { cfg, db, limiter }
	}
}
