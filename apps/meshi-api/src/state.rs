use std::sync::Arc;

use meshi_service::MeshiService;
use meshi_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MeshiService>,
}
impl AppState {
	pub async fn new(config: meshi_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = MeshiService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
