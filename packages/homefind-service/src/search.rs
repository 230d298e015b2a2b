//! The pipeline orchestrator.
//!
//! Stages run strictly in order and the first empty stage output ends the request with that
//! stage's error: intent, traits, key phrases (full search only), filter statement, execution.
//! The keyword summary never fails a request, and an empty result set is a success.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use homefind_domain::{AnnotationMode, sanitize};

use crate::{Error, ExtractionStage, Result, SearchService};

pub const NO_QUERY: &str = "No query provided.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
	#[serde(default)]
	pub query: Option<String>,
}
impl SearchRequest {
	pub fn new(query: impl Into<String>) -> Self {
		Self { query: Some(query.into()) }
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
	pub query: String,
	pub user_intent: String,
	pub traits: Vec<String>,
	pub key_phrases: Vec<String>,
	pub property_keywords: String,
	pub filter_statement: String,
	pub result: Vec<Value>,
	pub annotation_columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultsResponse {
	pub result: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractInformationResponse {
	pub user_intent: String,
	pub traits: Vec<String>,
	pub key_phrases: Vec<String>,
}

pub(crate) struct Extracted {
	pub(crate) query: String,
	pub(crate) user_intent: String,
	pub(crate) traits: Vec<String>,
}

impl SearchService {
	/// Full pipeline with key phrases, keyword summary and glyph annotations.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let Extracted { query, user_intent, traits } = self.intent_and_traits(req).await?;
		let key_phrases = self.required_key_phrases(&user_intent, &traits, &query).await?;
		let filter_statement = self
			.synthesize_filter(&user_intent, &traits, &key_phrases, &query)
			.await
			.ok_or(Error::Synthesis)?;
		let mut rows = self.run_filter(&filter_statement).await?;
		let property_keywords = self
			.summarize_keywords(&query, &user_intent, &traits, &key_phrases, &filter_statement)
			.await;
		let annotation_columns = self.annotate(&mut rows, &traits, AnnotationMode::Glyph).await;
		let result = sanitize::sanitize_records(&rows, &self.cfg.dataset.internal_fields);

		Ok(SearchResponse {
			query,
			user_intent,
			traits,
			key_phrases,
			property_keywords,
			filter_statement,
			result,
			annotation_columns,
		})
	}

	/// Results only, annotated with literal yes/no. Key phrases are skipped.
	pub async fn search_results(&self, req: SearchRequest) -> Result<SearchResultsResponse> {
		let Extracted { query, user_intent, traits } = self.intent_and_traits(req).await?;
		let filter_statement = self
			.synthesize_filter(&user_intent, &traits, &[], &query)
			.await
			.ok_or(Error::Synthesis)?;
		let mut rows = self.run_filter(&filter_statement).await?;

		self.annotate(&mut rows, &traits, AnnotationMode::Binary).await;

		Ok(SearchResultsResponse {
			result: sanitize::sanitize_records(&rows, &self.cfg.dataset.internal_fields),
		})
	}

	/// The three extraction stages and nothing else.
	pub async fn extract_information(
		&self,
		req: SearchRequest,
	) -> Result<ExtractInformationResponse> {
		let Extracted { query, user_intent, traits } = self.intent_and_traits(req).await?;
		let key_phrases = self.required_key_phrases(&user_intent, &traits, &query).await?;

		Ok(ExtractInformationResponse { user_intent, traits, key_phrases })
	}

	pub(crate) async fn intent_and_traits(&self, req: SearchRequest) -> Result<Extracted> {
		let query = req.query.as_deref().map(str::trim).unwrap_or_default();

		if query.is_empty() {
			return Err(Error::invalid_request(NO_QUERY));
		}

		let user_intent = self
			.extract_intent(query)
			.await
			.ok_or(Error::Extraction { stage: ExtractionStage::Intent })?;
		let traits = self.extract_traits(&user_intent, query).await;

		if traits.is_empty() {
			return Err(Error::Extraction { stage: ExtractionStage::Traits });
		}

		tracing::info!(traits = traits.len(), "Extracted traits.");

		Ok(Extracted { query: query.to_string(), user_intent, traits })
	}

	pub(crate) async fn required_key_phrases(
		&self,
		user_intent: &str,
		traits: &[String],
		query: &str,
	) -> Result<Vec<String>> {
		let key_phrases = self.extract_key_phrases(user_intent, traits, query).await;

		if key_phrases.is_empty() {
			return Err(Error::Extraction { stage: ExtractionStage::KeyPhrases });
		}

		Ok(key_phrases)
	}
}
