//! Saved searches, kept as one JSON list in the completion cache. They expire with the cache
//! TTL like any other entry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use homefind_domain::sanitize;

use crate::{Error, Result, SearchService};

pub const SAVED_SEARCHES_KEY: &str = "saved_searches";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
	pub search: String,
	#[serde(default)]
	pub response: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveSearchRequest {
	#[serde(default)]
	pub search: Option<String>,
	#[serde(default)]
	pub response: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteSavedSearchRequest {
	#[serde(default)]
	pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
	pub message: String,
}
impl MessageResponse {
	pub(crate) fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSearchesResponse {
	pub saved_searches: Vec<SavedSearch>,
}

impl SearchService {
	/// Appends a search unless one with the same text is already saved.
	pub async fn save_search(&self, req: SaveSearchRequest) -> Result<MessageResponse> {
		let search = required_search(req.search.as_deref())?;
		let _guard = self.saved_lock.lock().await;
		let mut saved = self.load_saved()?;

		if saved.iter().any(|entry| entry.search == search) {
			return Ok(MessageResponse::new("Search already saved."));
		}

		let response = if req.response.is_null() {
			Value::Object(Default::default())
		} else {
			sanitize::strip_internal_fields(req.response, &self.cfg.dataset.internal_fields)
		};

		saved.push(SavedSearch { search: search.to_string(), response });

		self.store_saved(&saved)?;

		tracing::info!(search, "Saved search.");

		Ok(MessageResponse::new("Search saved successfully."))
	}

	pub async fn saved_searches(&self) -> Result<SavedSearchesResponse> {
		let _guard = self.saved_lock.lock().await;

		Ok(SavedSearchesResponse { saved_searches: self.load_saved()? })
	}

	pub async fn delete_saved_search(
		&self,
		req: DeleteSavedSearchRequest,
	) -> Result<MessageResponse> {
		let search = required_search(req.search.as_deref())?;
		let _guard = self.saved_lock.lock().await;
		let mut saved = self.load_saved()?;
		let before = saved.len();

		saved.retain(|entry| entry.search != search);

		if saved.len() == before {
			return Err(Error::not_found("Search not found."));
		}

		self.store_saved(&saved)?;

		tracing::info!(search, "Deleted saved search.");

		Ok(MessageResponse::new("Search deleted successfully."))
	}

	pub async fn clear_saved_searches(&self) -> Result<MessageResponse> {
		let _guard = self.saved_lock.lock().await;

		self.store_saved(&[])?;

		Ok(MessageResponse::new("All saved searches cleared."))
	}

	fn load_saved(&self) -> Result<Vec<SavedSearch>> {
		match self.cache.get(SAVED_SEARCHES_KEY) {
			Some(raw) => Ok(serde_json::from_str(&raw)?),
			None => Ok(Vec::new()),
		}
	}

	fn store_saved(&self, saved: &[SavedSearch]) -> Result<()> {
		self.cache.set(SAVED_SEARCHES_KEY, &serde_json::to_string(saved)?);

		Ok(())
	}
}

fn required_search(search: Option<&str>) -> Result<&str> {
	let search = search.map(str::trim).unwrap_or_default();

	if search.is_empty() {
		return Err(Error::invalid_request("No search query provided."));
	}

	Ok(search)
}
