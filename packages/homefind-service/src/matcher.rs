use homefind_domain::{PropertyRecord, Verdict};
use homefind_providers::CompletionRequest;

use crate::{SearchService, prompts};

const MATCH_MAX_TOKENS: u32 = 3;

/// Cache key for a verdict: property identity plus the lowercased trait.
pub fn match_key(record: &PropertyRecord, trait_phrase: &str) -> String {
	format!("{}_{}", record.identity(), trait_phrase.to_lowercase())
}

impl SearchService {
	/// Verdict for one (record, trait) pair.
	///
	/// Cached for the cache TTL, including coerced `unsure` answers. Provider failures yield
	/// `unsure` and are not cached, so the next request asks again.
	pub async fn match_trait(&self, record: &PropertyRecord, trait_phrase: &str) -> Verdict {
		let key = match_key(record, trait_phrase);

		if let Some(cached) = self.cache.get(&key)
			&& let Some(verdict) = Verdict::parse(&cached)
		{
			tracing::debug!(key = %key, verdict = verdict.as_str(), "Trait verdict cache hit.");

			return verdict;
		}

		let prompt =
			prompts::trait_match(&record.prompt_details(), trait_phrase, self.listings.cities());
		let request = CompletionRequest::new(prompt, MATCH_MAX_TOKENS).with_stop("\n");
		let Some(raw) = self.complete("trait_match", request).await else {
			return Verdict::Unsure;
		};
		let verdict = Verdict::from_response(&raw);

		if Verdict::parse(&raw).is_none() {
			tracing::warn!(response = %raw, "Unexpected trait verdict. Recording unsure.");
		}

		self.cache.set(&key, verdict.as_str());

		verdict
	}
}
