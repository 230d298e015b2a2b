use serde::{Deserialize, Serialize};
use serde_json::Value;

use homefind_domain::sanitize;

use crate::{Error, Result, SearchService};

/// A search bundle to write out. Accepts `sql_query` for the statement field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportRequest {
	#[serde(default)]
	pub query: String,
	#[serde(default)]
	pub user_intent: String,
	#[serde(default)]
	pub traits: Vec<String>,
	#[serde(default)]
	pub key_phrases: Vec<String>,
	#[serde(default)]
	pub property_keywords: String,
	#[serde(default, alias = "sql_query")]
	pub filter_statement: String,
	#[serde(default)]
	pub result: Vec<Value>,
}
impl ExportRequest {
	fn is_complete(&self) -> bool {
		!self.query.trim().is_empty()
			&& !self.user_intent.trim().is_empty()
			&& !self.traits.is_empty()
			&& !self.key_phrases.is_empty()
			&& !self.property_keywords.trim().is_empty()
			&& !self.filter_statement.trim().is_empty()
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
	pub message: String,
}

impl SearchService {
	/// Writes a plain-text report of a search to `export.path`, replacing any earlier report.
	pub async fn export(&self, req: ExportRequest) -> Result<ExportResponse> {
		if !req.is_complete() {
			return Err(Error::invalid_request("Incomplete data provided."));
		}

		let path = &self.cfg.export.path;
		let report = render_report(&req, &self.cfg.dataset.internal_fields);

		tokio::fs::write(path, report).await.map_err(|err| {
			tracing::error!(error = %err, path = %path.display(), "Failed to write report.");

			Error::Export { message: err.to_string() }
		})?;

		tracing::info!(path = %path.display(), "Search report written.");

		Ok(ExportResponse { message: format!("Results saved to {}", path.display()) })
	}
}

fn render_report(req: &ExportRequest, internal_fields: &[String]) -> String {
	let mut out = format!(
		"Input Query: {}\n\nUser Intent: {}\n\nTraits: {}\n\nKey Phrases: {}\n\n\
		 PropertyKeywords: {}\n\nGenerated SQL Query: {}\n\n",
		req.query.trim(),
		req.user_intent.trim(),
		req.traits.join(", "),
		req.key_phrases.join(", "),
		req.property_keywords.trim(),
		req.filter_statement.trim(),
	);

	if req.result.is_empty() {
		out.push_str("Final Output from CSV: No results found.\n");

		return out;
	}

	out.push_str("Final Output from CSV:\n");

	for record in &req.result {
		let record = sanitize::strip_internal_fields(record.clone(), internal_fields);

		out.push_str(&record.to_string());
		out.push('\n');
	}

	out
}
