//! Carousel dispatch: the top matches for a query, sent as RCS cards to one phone number.

use serde::Deserialize;
use serde_json::{Map, Value};

use homefind_domain::sanitize;
use homefind_providers::{CardAction, CarouselCard, CarouselMessage};

use crate::{Error, MessageResponse, Result, SearchRequest, SearchService, search::Extracted};

pub const MAX_CARDS: usize = 5;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarouselRequest {
	#[serde(default)]
	pub query: Option<String>,
	#[serde(default)]
	pub phone_number: Option<String>,
}

impl SearchService {
	/// Runs the filter pipeline without annotation and sends up to [`MAX_CARDS`] result cards.
	pub async fn send_carousel(&self, req: CarouselRequest) -> Result<MessageResponse> {
		let query = req.query.as_deref().map(str::trim).unwrap_or_default();
		let phone_number = req.phone_number.as_deref().map(str::trim).unwrap_or_default();

		if query.is_empty() || phone_number.is_empty() {
			return Err(Error::invalid_request("Query and phone_number are required."));
		}

		let Some(messaging_cfg) = self.cfg.providers.messaging.as_ref() else {
			return Err(Error::Messaging {
				message: "Messaging provider is not configured.".to_string(),
			});
		};
		let Extracted { query, user_intent, traits } =
			self.intent_and_traits(SearchRequest::new(query)).await?;
		let key_phrases = self.required_key_phrases(&user_intent, &traits, &query).await?;
		let filter_statement = self
			.synthesize_filter(&user_intent, &traits, &key_phrases, &query)
			.await
			.ok_or(Error::Synthesis)?;
		let rows = self.run_filter(&filter_statement).await?;
		let result = sanitize::sanitize_records(&rows, &self.cfg.dataset.internal_fields);

		if result.is_empty() {
			return Err(Error::not_found("No properties found matching the query."));
		}

		let message = CarouselMessage {
			from: messaging_cfg.sender.clone(),
			to: phone_number.to_string(),
			cards: carousel_cards(&result),
		};

		if let Err(err) = self.providers.messaging.send(messaging_cfg, &message).await {
			tracing::error!(error = %err, "Failed to send carousel.");

			return Err(Error::Messaging { message: "Failed to send carousel.".to_string() });
		}

		tracing::info!(cards = message.cards.len(), "Carousel sent.");

		Ok(MessageResponse::new("Carousel sent successfully."))
	}
}

/// Cards for the first [`MAX_CARDS`] rows. Field lookups ignore case.
pub fn carousel_cards(rows: &[Value]) -> Vec<CarouselCard> {
	rows.iter().filter_map(Value::as_object).take(MAX_CARDS).map(card).collect()
}

fn card(row: &Map<String, Value>) -> CarouselCard {
	let title = text_field(row, "property_name")
		.or_else(|| text_field(row, "address"))
		.unwrap_or_else(|| "Property".to_string());
	let description = format!(
		"Price: ${}\nBeds: {}\nBaths: {}",
		display_field(row, "price"),
		display_field(row, "beds"),
		display_field(row, "baths"),
	);
	let media_url = text_field(row, "image_url").or_else(|| text_field(row, "media_url"));
	let actions = text_field(row, "listingurl")
		.filter(|url| url != "#")
		.map(|url| vec![CardAction::open_url(url, "View Listing")])
		.unwrap_or_default();

	CarouselCard { title, description, media_url, actions }
}

fn field<'a>(row: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
	row.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value)
}

fn text_field(row: &Map<String, Value>, name: &str) -> Option<String> {
	match field(row, name)? {
		Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

fn display_field(row: &Map<String, Value>, name: &str) -> String {
	match field(row, name) {
		Some(Value::String(text)) if !text.trim().is_empty() => text.trim().to_string(),
		Some(Value::Number(number)) => number.to_string(),
		_ => "N/A".to_string(),
	}
}
