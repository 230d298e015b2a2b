use homefind_domain::{PropertyRecord, statement};
use homefind_providers::CompletionRequest;

use crate::{
	Error, Result, SearchService,
	prompts::{self, FilterPrompt},
};

const FILTER_MAX_TOKENS: u32 = 150;

impl SearchService {
	/// Asks the model for a filter statement and returns it only when it passes the
	/// read-only gate and the table/column allow-list.
	pub async fn synthesize_filter(
		&self,
		intent: &str,
		traits: &[String],
		key_phrases: &[String],
		query: &str,
	) -> Option<String> {
		let prompt = prompts::filter_statement(FilterPrompt {
			table: self.listings.table(),
			columns: self.listings.columns(),
			cities: self.listings.cities(),
			intent,
			traits,
			key_phrases,
			query,
		});
		let request = CompletionRequest::new(prompt, FILTER_MAX_TOKENS);
		let response = self.complete("filter_statement", request).await?;
		let Some(filter) = statement::extract_statement(&response) else {
			tracing::error!("Filter completion contained no statement.");

			return None;
		};

		if let Err(rejection) = self.guard.check(&filter) {
			tracing::error!(%rejection, statement = %filter, "Rejected filter statement.");

			return None;
		}

		tracing::info!(statement = %filter, "Generated filter statement.");

		Some(filter)
	}

	/// Runs a guarded filter statement. An empty result set is a valid outcome.
	pub async fn run_filter(&self, filter: &str) -> Result<Vec<PropertyRecord>> {
		match self.listings.execute(filter).await {
			Ok(rows) => {
				tracing::info!(rows = rows.len(), "Filter statement executed.");

				Ok(rows)
			},
			Err(err) => {
				tracing::error!(error = %err, statement = %filter, "Filter statement failed.");

				Err(Error::Execution)
			},
		}
	}
}
