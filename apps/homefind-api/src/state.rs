use std::sync::Arc;

use homefind_service::SearchService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
}
impl AppState {
	/// Loads the listings table and broker directory once; every request reads from them.
	pub async fn new(config: homefind_config::Config) -> color_eyre::Result<Self> {
		let service = SearchService::load(config).await?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: SearchService) -> Self {
		Self { service: Arc::new(service) }
	}
}
