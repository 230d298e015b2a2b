//! Intent, trait and key-phrase extraction. Each stage is one uncached completion and
//! degrades to an empty value on failure.

use homefind_providers::CompletionRequest;

use crate::{SearchService, prompts};

const INTENT_MAX_TOKENS: u32 = 150;
const TRAITS_MAX_TOKENS: u32 = 200;
const KEY_PHRASES_MAX_TOKENS: u32 = 150;

impl SearchService {
	pub async fn extract_intent(&self, query: &str) -> Option<String> {
		let request = CompletionRequest::new(prompts::intent(query), INTENT_MAX_TOKENS);
		let intent = self.complete("intent", request).await?;

		if intent.trim().is_empty() {
			tracing::error!("Intent completion was empty.");

			return None;
		}

		Some(intent.trim().to_string())
	}

	/// Ordered trait phrases, one per response line.
	pub async fn extract_traits(&self, intent: &str, query: &str) -> Vec<String> {
		let request = CompletionRequest::new(prompts::traits(intent, query), TRAITS_MAX_TOKENS);
		let Some(response) = self.complete("traits", request).await else {
			return Vec::new();
		};
		let traits = list_items(&response);

		if traits.is_empty() {
			tracing::error!("Trait completion contained no traits.");
		}

		traits
	}

	/// At most `pipeline.max_key_phrases` phrases, in model order.
	pub async fn extract_key_phrases(
		&self,
		intent: &str,
		traits: &[String],
		query: &str,
	) -> Vec<String> {
		let max = self.cfg.pipeline.max_key_phrases;
		let request = CompletionRequest::new(
			prompts::key_phrases(intent, traits, query, max),
			KEY_PHRASES_MAX_TOKENS,
		)
		.with_stop("\n\n");
		let Some(response) = self.complete("key_phrases", request).await else {
			return Vec::new();
		};
		let mut phrases = list_items(&response);

		phrases.truncate(max);

		if phrases.is_empty() {
			tracing::error!("Key phrase completion contained no phrases.");
		}

		phrases
	}
}

/// Non-blank lines with list markers (`-`, `*`, `•`, `1.`, `2)`) and surrounding space removed.
pub(crate) fn list_items(response: &str) -> Vec<String> {
	response.lines().map(strip_marker).filter(|item| !item.is_empty()).map(str::to_string).collect()
}

fn strip_marker(line: &str) -> &str {
	let line = line.trim().trim_start_matches(['-', '*', '•']).trim_start();
	let digits = line.len() - line.trim_start_matches(|ch: char| ch.is_ascii_digit()).len();

	if digits > 0
		&& let Some(rest) = line[digits..].strip_prefix(['.', ')'])
		&& rest.starts_with(char::is_whitespace)
	{
		return rest.trim().trim_end_matches('-').trim_end();
	}

	line.trim_end_matches('-').trim_end()
}
