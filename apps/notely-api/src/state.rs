use std::sync::Arc;

use notely_service::NotelyService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<NotelyService>,
}
impl AppState {
	pub async fn new(config: notely_config::Config) -> color_eyre::Result<Self> {
		let service = NotelyService::connect(config).await?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: NotelyService) -> Self {
		Self { service: Arc::new(service) }
	}
}
