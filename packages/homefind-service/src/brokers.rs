use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result, SearchService};

/// Broker columns shown to users, in display order, with their labels.
pub const BROKER_DISPLAY_COLUMNS: [(&str, &str); 9] = [
	("broker", "Broker Name"),
	("city", "City"),
	("state", "State"),
	("zip_code", "Zip Code"),
	("reviews", "Reviews"),
	("recent_homes_sold", "Recent Homes Sold"),
	("negotiations_done", "Negotiations Done"),
	("years_of_experience", "Years of Experience"),
	("rating", "Rating"),
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrokerDetailsRequest {
	#[serde(default)]
	pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerDetailsResponse {
	pub brokers: Vec<Map<String, Value>>,
}

impl SearchService {
	pub fn broker_details(&self, req: BrokerDetailsRequest) -> Result<BrokerDetailsResponse> {
		let zip_code = req.zip_code.as_deref().map(str::trim).unwrap_or_default();

		if zip_code.is_empty() {
			return Err(Error::invalid_request("No zip_code provided."));
		}

		let brokers = self
			.brokers
			.by_zip(zip_code)
			.into_iter()
			.map(|row| {
				BROKER_DISPLAY_COLUMNS
					.iter()
					.map(|(column, label)| {
						let value = row.get(column).map(|cell| cell.to_json());

						(label.to_string(), value.unwrap_or(Value::Null))
					})
					.collect::<Map<String, Value>>()
			})
			.collect::<Vec<_>>();

		if brokers.is_empty() {
			tracing::info!(zip_code, "No brokers found.");

			return Err(Error::not_found(format!("No brokers found for zip code: {zip_code}")));
		}

		Ok(BrokerDetailsResponse { brokers })
	}
}
