use std::time::Duration;

use reqwest::{
	Client,
	header::{HeaderMap, HeaderName},
};
use serde::Serialize;

use crate::Result;

/// One carousel delivery. Serializes to the `{ from, to, cards }` body the endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselMessage {
	pub from: String,
	pub to: String,
	pub cards: Vec<CarouselCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselCard {
	pub title: String,
	pub description: String,
	#[serde(rename = "mediaUrl", skip_serializing_if = "Option::is_none")]
	pub media_url: Option<String>,
	#[serde(rename = "cards", skip_serializing_if = "Vec::is_empty")]
	pub actions: Vec<CardAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardAction {
	#[serde(rename = "type")]
	pub kind: String,
	pub url: String,
	pub label: String,
}
impl CardAction {
	pub fn open_url(url: impl Into<String>, label: impl Into<String>) -> Self {
		Self { kind: "open_url".to_string(), url: url.into(), label: label.into() }
	}
}

/// Posts `message` and treats any non-success status as a failure.
pub async fn send(
	cfg: &homefind_config::MessagingProviderConfig,
	message: &CarouselMessage,
) -> Result<()> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let res = client.post(url).headers(key_headers(cfg)?).json(message).send().await?;

	res.error_for_status()?;

	Ok(())
}

fn key_headers(cfg: &homefind_config::MessagingProviderConfig) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(HeaderName::from_bytes(cfg.api_key_header.as_bytes())?, cfg.api_key.parse()?);

	Ok(headers)
}
