pub mod annotate;
pub mod brokers;
pub mod cache;
pub mod carousel;
pub mod export;
pub mod extract;
pub mod keywords;
pub mod matcher;
pub mod saved;
pub mod search;
pub mod synthesis;

mod error;
mod prompts;

pub use brokers::{BrokerDetailsRequest, BrokerDetailsResponse};
pub use cache::CompletionCache;
pub use carousel::CarouselRequest;
pub use error::{Error, ExtractionStage, Result};
pub use export::{ExportRequest, ExportResponse};
pub use saved::{
	DeleteSavedSearchRequest, MessageResponse, SaveSearchRequest, SavedSearch,
	SavedSearchesResponse,
};
pub use search::{
	ExtractInformationResponse, SearchRequest, SearchResponse, SearchResultsResponse,
};

use std::{future::Future, pin::Pin, sync::Arc};

use tokio::sync::Mutex;

use homefind_config::{Config, LlmProviderConfig, MessagingProviderConfig};
use homefind_domain::statement::StatementGuard;
use homefind_providers::{CarouselMessage, CompletionRequest, completion, messaging};
use homefind_storage::{Brokers, Listings};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		request: &'a CompletionRequest,
	) -> BoxFuture<'a, homefind_providers::Result<String>>;
}

pub trait MessagingProvider
where
	Self: Send + Sync,
{
	fn send<'a>(
		&'a self,
		cfg: &'a MessagingProviderConfig,
		message: &'a CarouselMessage,
	) -> BoxFuture<'a, homefind_providers::Result<()>>;
}

#[derive(Clone)]
pub struct Providers {
	pub completion: Arc<dyn CompletionProvider>,
	pub messaging: Arc<dyn MessagingProvider>,
}
impl Providers {
	pub fn new(completion: Arc<dyn CompletionProvider>) -> Self {
		Self { completion, messaging: Arc::new(DefaultProviders) }
	}

	pub fn with_messaging(mut self, messaging: Arc<dyn MessagingProvider>) -> Self {
		self.messaging = messaging;

		self
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { completion: Arc::new(DefaultProviders), messaging: Arc::new(DefaultProviders) }
	}
}

/// The search pipeline and its collaborators. The listings table and broker directory are
/// loaded once before construction and only read afterwards; the cache is shared by every
/// request served by this instance.
pub struct SearchService {
	pub cfg: Config,
	pub listings: Listings,
	pub brokers: Brokers,
	pub cache: CompletionCache,
	pub providers: Providers,
	guard: StatementGuard,
	saved_lock: Mutex<()>,
}
impl SearchService {
	pub fn new(cfg: Config, listings: Listings, brokers: Brokers) -> Self {
		Self::with_providers(cfg, listings, brokers, Providers::default())
	}

	pub fn with_providers(
		cfg: Config,
		listings: Listings,
		brokers: Brokers,
		providers: Providers,
	) -> Self {
		let guard = StatementGuard::new(listings.table(), listings.columns());
		let cache = CompletionCache::from_config(&cfg.cache);

		Self { cfg, listings, brokers, cache, providers, guard, saved_lock: Mutex::new(()) }
	}

	/// Loads the listings table and broker directory named by `cfg`.
	pub async fn load(cfg: Config) -> Result<Self> {
		let listings = Listings::load(&cfg.dataset).await?;
		let brokers = Brokers::load(cfg.dataset.brokers_path.as_deref())?;

		Ok(Self::new(cfg, listings, brokers))
	}

	/// One provider call. Failures are logged under `stage` and reported as `None`; callers
	/// turn that into their own neutral value.
	pub(crate) async fn complete(
		&self,
		stage: &'static str,
		request: CompletionRequest,
	) -> Option<String> {
		match self.providers.completion.complete(&self.cfg.providers.llm, &request).await {
			Ok(text) => Some(text),
			Err(err) => {
				tracing::error!(stage, error = %err, "Completion request failed.");

				None
			},
		}
	}
}

struct DefaultProviders;

impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		request: &'a CompletionRequest,
	) -> BoxFuture<'a, homefind_providers::Result<String>> {
		Box::pin(completion::complete(cfg, request))
	}
}

impl MessagingProvider for DefaultProviders {
	fn send<'a>(
		&'a self,
		cfg: &'a MessagingProviderConfig,
		message: &'a CarouselMessage,
	) -> BoxFuture<'a, homefind_providers::Result<()>> {
		Box::pin(messaging::send(cfg, message))
	}
}
