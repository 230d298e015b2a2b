use homefind_providers::CompletionRequest;

use crate::{
	SearchService,
	prompts::{self, KeywordsPrompt},
};

pub const NO_KEYWORDS: &str = "No keywords generated.";

const KEYWORDS_MAX_TOKENS: u32 = 100;

impl SearchService {
	/// "Column: Value" summary of a search. Never fails: an empty or failed completion
	/// yields [`NO_KEYWORDS`].
	pub async fn summarize_keywords(
		&self,
		query: &str,
		intent: &str,
		traits: &[String],
		key_phrases: &[String],
		filter: &str,
	) -> String {
		let prompt = prompts::property_keywords(KeywordsPrompt {
			query,
			intent,
			traits,
			key_phrases,
			statement: filter,
		});
		let request = CompletionRequest::new(prompt, KEYWORDS_MAX_TOKENS).with_stop("\n\n");
		let keywords = self
			.complete("property_keywords", request)
			.await
			.map(|text| text.trim().to_string())
			.filter(|text| !text.is_empty())
			.unwrap_or_else(|| NO_KEYWORDS.to_string());

		tracing::info!(keywords = %keywords, "Generated property keywords.");

		keywords
	}
}
