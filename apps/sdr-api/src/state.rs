use std::sync::Arc;

use sdr_service::SdrService;
use sdr_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SdrService>,
}
impl AppState {
	pub async fn new(config: sdr_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(SdrService::new(config, db)))
	}

	pub fn from_service(service: SdrService) -> Self {
		Self { service: Arc::new(service) }
	}
}
