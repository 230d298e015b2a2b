use std::{collections::HashMap, sync::Arc, sync::Mutex};

use serde_json::json;

use homefind_config::{LlmProviderConfig, MessagingProviderConfig};
use homefind_domain::{Verdict, verdict};
use homefind_providers::{CarouselMessage, CompletionRequest};
use homefind_service::{
	BoxFuture, BrokerDetailsRequest, CarouselRequest, CompletionProvider, DeleteSavedSearchRequest,
	Error, ExportRequest, ExtractionStage, MessagingProvider, Providers, SaveSearchRequest,
	SearchRequest, SearchService, keywords::NO_KEYWORDS,
};
use homefind_storage::{Brokers, Listings};
use homefind_testkit::Fixture;

const SF_QUERY: &str = "3 bed 2 bath house in San Francisco with a big backyard";
const SF_FILTER: &str = "SELECT * FROM zillow_data WHERE beds = 3 AND baths = 2 AND city LIKE \
	'%San Francisco%' AND neighborhood_desc LIKE '%backyard%';";

/// Canned completions keyed by pipeline stage. `None` makes that stage's call fail.
#[derive(Clone)]
struct Script {
	intent: Option<&'static str>,
	traits: Option<&'static str>,
	key_phrases: Option<&'static str>,
	filter: Option<String>,
	keywords: Option<&'static str>,
	/// Raw verdict per trait; unlisted traits answer "yes".
	verdicts: Vec<(&'static str, &'static str)>,
	fail_matches: bool,
}
impl Script {
	fn san_francisco() -> Self {
		Self {
			intent: Some("The user wants a 3 bed, 2 bath house in San Francisco with a big backyard."),
			traits: Some(
				"- is a house\n- has 3 bed, 2 bath\n- is in San Francisco\n- has a big backyard",
			),
			key_phrases: Some("3 bedroom house San Francisco\nbig backyard\nfamily home"),
			filter: Some(format!("```sql\n{SF_FILTER}\n```")),
			keywords: Some("Beds: 3, Baths: 2, City: San Francisco, Feature: backyard"),
			verdicts: vec![("is a house", "Maybe"), ("has a big backyard", "Yes")],
			fail_matches: false,
		}
	}
}

/// Records every carousel instead of sending it. `fail` makes every send fail.
#[derive(Default)]
struct RecordingSender {
	fail: bool,
	sent: Mutex<Vec<CarouselMessage>>,
}
impl RecordingSender {
	fn sent(&self) -> Vec<CarouselMessage> {
		self.sent.lock().expect("Sent lock poisoned.").clone()
	}
}
impl MessagingProvider for RecordingSender {
	fn send<'a>(
		&'a self,
		_cfg: &'a MessagingProviderConfig,
		message: &'a CarouselMessage,
	) -> BoxFuture<'a, homefind_providers::Result<()>> {
		self.sent.lock().expect("Sent lock poisoned.").push(message.clone());

		let fail = self.fail;

		Box::pin(async move {
			if fail {
				Err(homefind_providers::Error::invalid_response("Recorded failure."))
			} else {
				Ok(())
			}
		})
	}
}

struct ScriptedProvider {
	script: Script,
	calls: Mutex<HashMap<&'static str, usize>>,
}
impl ScriptedProvider {
	fn new(script: Script) -> Arc<Self> {
		Arc::new(Self { script, calls: Mutex::new(HashMap::new()) })
	}

	fn count(&self, stage: &str) -> usize {
		self.calls.lock().expect("Calls lock poisoned.").get(stage).copied().unwrap_or(0)
	}

	fn total(&self) -> usize {
		self.calls.lock().expect("Calls lock poisoned.").values().sum()
	}

	fn respond(&self, prompt: &str) -> Option<String> {
		let stage = stage_of(prompt);

		*self.calls.lock().expect("Calls lock poisoned.").entry(stage).or_insert(0) += 1;

		match stage {
			"intent" => self.script.intent.map(str::to_string),
			"traits" => self.script.traits.map(str::to_string),
			"key_phrases" => self.script.key_phrases.map(str::to_string),
			"filter" => self.script.filter.clone(),
			"keywords" => self.script.keywords.map(str::to_string),
			"match" if self.script.fail_matches => None,
			"match" => {
				let trait_phrase = prompt
					.rsplit("Trait: ")
					.next()
					.and_then(|tail| tail.strip_suffix("\nAnswer:"))
					.unwrap_or_default();
				let verdict = self
					.script
					.verdicts
					.iter()
					.find(|(phrase, _)| phrase.eq_ignore_ascii_case(trait_phrase))
					.map(|(_, verdict)| *verdict)
					.unwrap_or("yes");

				Some(verdict.to_string())
			},
			_ => None,
		}
	}
}
impl CompletionProvider for ScriptedProvider {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		request: &'a CompletionRequest,
	) -> BoxFuture<'a, homefind_providers::Result<String>> {
		let response = self.respond(&request.prompt);

		Box::pin(async move {
			response.ok_or_else(|| homefind_providers::Error::invalid_response("Scripted failure."))
		})
	}
}

fn stage_of(prompt: &str) -> &'static str {
	[
		("User intent:", "intent"),
		("Traits:", "traits"),
		("Key phrases:", "key_phrases"),
		("Statement:", "filter"),
		("Keywords:", "keywords"),
		("Answer:", "match"),
	]
	.into_iter()
	.find(|(suffix, _)| prompt.ends_with(suffix))
	.map(|(_, stage)| stage)
	.unwrap_or("unknown")
}

struct Harness {
	service: SearchService,
	provider: Arc<ScriptedProvider>,
	fixture: Fixture,
}

async fn harness(script: Script) -> Harness {
	let fixture = Fixture::new().expect("Failed to write fixtures.");
	let cfg = fixture.config();
	let listings = Listings::load(&cfg.dataset).await.expect("Failed to load listings.");
	let brokers =
		Brokers::load(cfg.dataset.brokers_path.as_deref()).expect("Failed to load brokers.");
	let provider = ScriptedProvider::new(script);
	let service =
		SearchService::with_providers(cfg, listings, brokers, Providers::new(provider.clone()));

	Harness { service, provider, fixture }
}

#[tokio::test]
async fn search_runs_every_stage_and_annotates_rows() {
	let Harness { service, provider, .. } = harness(Script::san_francisco()).await;
	let response = service.search(SearchRequest::new(SF_QUERY)).await.expect("Search failed.");

	assert_eq!(response.query, SF_QUERY);
	assert!(response.user_intent.contains("San Francisco"));
	assert!(response.user_intent.contains("backyard"));
	assert_eq!(
		response.traits,
		vec!["is a house", "has 3 bed, 2 bath", "is in San Francisco", "has a big backyard"]
	);
	assert_eq!(response.key_phrases.len(), 3);
	assert_eq!(response.filter_statement, SF_FILTER);
	assert_eq!(
		response.property_keywords,
		"Beds: 3, Baths: 2, City: San Francisco, Feature: backyard"
	);
	assert_eq!(
		response.annotation_columns,
		vec!["is house", "3 bed 2 bath", "is in san francisco", "big backyard"]
	);
	assert_eq!(response.result.len(), 1);

	let row = &response.result[0];

	assert_eq!(row["zip_code"], "94118");
	assert_eq!(row["city"], "San Francisco");
	assert_eq!(row["hoa_fees"], serde_json::Value::Null);
	assert!(row.get("crawl_url_result").is_none());
	assert_eq!(row["is house"], verdict::GLYPH_UNSURE);
	assert_eq!(row["3 bed 2 bath"], verdict::GLYPH_YES);
	assert_eq!(row["big backyard"], verdict::GLYPH_YES);
	assert_eq!(provider.count("match"), 4);
	assert_eq!(provider.count("keywords"), 1);
}

#[tokio::test]
async fn trait_verdicts_are_cached_per_identity_and_lowercased_trait() {
	let Harness { service, provider, .. } = harness(Script::san_francisco()).await;
	let rows = service.run_filter(SF_FILTER).await.expect("Filter failed.");
	let record = &rows[0];

	assert_eq!(service.match_trait(record, "has a big backyard").await, Verdict::Yes);
	assert_eq!(service.match_trait(record, "Has A Big Backyard").await, Verdict::Yes);
	assert_eq!(provider.count("match"), 1);
	assert_eq!(service.cache.get("94118_1250000_has a big backyard").as_deref(), Some("yes"));
}

#[tokio::test]
async fn unexpected_verdicts_are_recorded_as_unsure() {
	let Harness { service, provider, .. } = harness(Script::san_francisco()).await;
	let rows = service.run_filter(SF_FILTER).await.expect("Filter failed.");

	assert_eq!(service.match_trait(&rows[0], "is a house").await, Verdict::Unsure);
	assert_eq!(service.match_trait(&rows[0], "is a house").await, Verdict::Unsure);
	assert_eq!(provider.count("match"), 1);
	assert_eq!(service.cache.get("94118_1250000_is a house").as_deref(), Some("unsure"));
}

#[tokio::test]
async fn failed_verdicts_are_unsure_and_not_cached() {
	let script = Script { fail_matches: true, ..Script::san_francisco() };
	let Harness { service, provider, .. } = harness(script).await;
	let rows = service.run_filter(SF_FILTER).await.expect("Filter failed.");

	assert_eq!(service.match_trait(&rows[0], "has a pool").await, Verdict::Unsure);
	assert_eq!(service.match_trait(&rows[0], "has a pool").await, Verdict::Unsure);
	assert_eq!(provider.count("match"), 2);
	assert!(service.cache.get("94118_1250000_has a pool").is_none());
}

#[tokio::test]
async fn empty_traits_stop_the_pipeline() {
	let script = Script { traits: Some("\n - \n"), ..Script::san_francisco() };
	let Harness { service, provider, .. } = harness(script).await;
	let err = service.search(SearchRequest::new(SF_QUERY)).await.expect_err("Expected failure.");

	assert!(matches!(err, Error::Extraction { stage: ExtractionStage::Traits }));
	assert_eq!(err.to_string(), "Failed to extract traits.");
	assert_eq!(provider.count("key_phrases"), 0);
	assert_eq!(provider.count("filter"), 0);
	assert_eq!(provider.count("match"), 0);
}

#[tokio::test]
async fn intent_failure_is_stage_named() {
	let script = Script { intent: None, ..Script::san_francisco() };
	let Harness { service, provider, .. } = harness(script).await;
	let err = service.search(SearchRequest::new(SF_QUERY)).await.expect_err("Expected failure.");

	assert_eq!(err.to_string(), "Failed to extract user intent.");
	assert_eq!(provider.total(), 1);
}

#[tokio::test]
async fn empty_key_phrases_stop_before_synthesis() {
	let script = Script { key_phrases: Some(""), ..Script::san_francisco() };
	let Harness { service, provider, .. } = harness(script).await;
	let err = service.search(SearchRequest::new(SF_QUERY)).await.expect_err("Expected failure.");

	assert_eq!(err.to_string(), "Failed to extract key phrases.");
	assert_eq!(provider.count("filter"), 0);
}

#[tokio::test]
async fn key_phrases_are_capped() {
	let script = Script {
		key_phrases: Some("a\nb\nc\nd\ne\nf\ng\nh\ni\nj\nk\nl"),
		..Script::san_francisco()
	};
	let Harness { service, .. } = harness(script).await;
	let response = service
		.extract_information(SearchRequest::new(SF_QUERY))
		.await
		.expect("Extraction failed.");

	assert_eq!(response.key_phrases.len(), 10);
	assert_eq!(response.key_phrases.last().map(String::as_str), Some("j"));
}

#[tokio::test]
async fn unsafe_statements_are_refused() {
	for filter in [
		"DELETE FROM zillow_data;",
		"I am not able to write that query.",
		"SELECT * FROM zillow_data WHERE has_pool = 1;",
		"SELECT * FROM sqlite_master;",
		"SELECT * FROM zillow_data UNION SELECT * FROM zillow_data;",
	] {
		let script = Script { filter: Some(filter.to_string()), ..Script::san_francisco() };
		let Harness { service, provider, .. } = harness(script).await;
		let err =
			service.search(SearchRequest::new(SF_QUERY)).await.expect_err("Expected refusal.");

		assert!(matches!(err, Error::Synthesis), "{filter} was not refused");
		assert_eq!(err.to_string(), "Failed to generate SQL query.");
		assert_eq!(provider.count("keywords"), 0);
	}
}

#[tokio::test]
async fn engine_errors_are_execution_failures() {
	let script = Script {
		filter: Some("SELECT * FROM zillow_data WHERE no_such_fn(price) > 1;".to_string()),
		..Script::san_francisco()
	};
	let Harness { service, provider, .. } = harness(script).await;
	let err = service.search(SearchRequest::new(SF_QUERY)).await.expect_err("Expected failure.");

	assert!(matches!(err, Error::Execution));
	assert_eq!(err.to_string(), "Failed to execute SQL query.");
	assert_eq!(provider.count("match"), 0);
}

#[tokio::test]
async fn no_rows_is_a_successful_empty_result() {
	let script = Script {
		filter: Some("SELECT * FROM zillow_data WHERE city LIKE '%Atlantis%';".to_string()),
		..Script::san_francisco()
	};
	let Harness { service, provider, .. } = harness(script).await;
	let response = service.search(SearchRequest::new(SF_QUERY)).await.expect("Search failed.");

	assert!(response.result.is_empty());
	assert_eq!(response.annotation_columns.len(), 4);
	assert_eq!(provider.count("match"), 0);
}

#[tokio::test]
async fn colliding_trait_names_stay_unique() {
	let script = Script {
		traits: Some("has a pool\nhas the pool\nhas an pool\nhas the city"),
		filter: Some("SELECT * FROM zillow_data WHERE city LIKE '%Oakland%';".to_string()),
		..Script::san_francisco()
	};
	let Harness { service, .. } = harness(script).await;
	let response =
		service.search(SearchRequest::new("pool in oakland")).await.expect("Search failed.");

	assert_eq!(response.annotation_columns, vec!["pool", "pool_1", "pool_2", "city_1"]);
	assert_eq!(response.result[0]["city"], "Oakland");
	assert_eq!(response.result[0]["city_1"], verdict::GLYPH_YES);
}

#[tokio::test]
async fn search_results_use_binary_markers() {
	let Harness { service, provider, .. } = harness(Script::san_francisco()).await;
	let response =
		service.search_results(SearchRequest::new(SF_QUERY)).await.expect("Search failed.");

	assert_eq!(response.result.len(), 1);
	assert_eq!(response.result[0]["is house"], "no");
	assert_eq!(response.result[0]["big backyard"], "yes");
	assert_eq!(provider.count("key_phrases"), 0);
	assert_eq!(provider.count("keywords"), 0);
}

#[tokio::test]
async fn extract_information_stops_after_key_phrases() {
	let Harness { service, provider, .. } = harness(Script::san_francisco()).await;
	let response = service
		.extract_information(SearchRequest::new(SF_QUERY))
		.await
		.expect("Extraction failed.");

	assert_eq!(response.traits.len(), 4);
	assert_eq!(response.key_phrases[0], "3 bedroom house San Francisco");
	assert_eq!(provider.count("filter"), 0);
}

#[tokio::test]
async fn blank_query_is_rejected_without_calls() {
	let Harness { service, provider, .. } = harness(Script::san_francisco()).await;

	for req in [SearchRequest::default(), SearchRequest::new("   ")] {
		let err = service.search(req).await.expect_err("Expected invalid request.");

		assert!(
			matches!(err, Error::InvalidRequest { ref message } if message == "No query provided.")
		);
	}

	assert_eq!(provider.total(), 0);
}

#[tokio::test]
async fn keyword_failure_does_not_fail_search() {
	let script = Script { keywords: None, ..Script::san_francisco() };
	let Harness { service, .. } = harness(script).await;
	let response = service.search(SearchRequest::new(SF_QUERY)).await.expect("Search failed.");

	assert_eq!(response.property_keywords, NO_KEYWORDS);
}

#[tokio::test]
async fn saved_searches_round_trip_through_the_cache() {
	let Harness { service, .. } = harness(Script::san_francisco()).await;
	let save = |search: &str| SaveSearchRequest {
		search: Some(search.to_string()),
		response: json!({ "result": [{ "city": "Oakland", "crawl_url_result": "x" }] }),
	};

	assert_eq!(
		service.save_search(save("pool in oakland")).await.expect("Save failed.").message,
		"Search saved successfully."
	);
	assert_eq!(
		service.save_search(save("pool in oakland")).await.expect("Save failed.").message,
		"Search already saved."
	);

	let listed = service.saved_searches().await.expect("List failed.");

	assert_eq!(listed.saved_searches.len(), 1);
	assert_eq!(listed.saved_searches[0].response, json!({ "result": [{ "city": "Oakland" }] }));

	let missing = service
		.delete_saved_search(DeleteSavedSearchRequest { search: Some("unknown".to_string()) })
		.await
		.expect_err("Expected not found.");

	assert!(matches!(missing, Error::NotFound { ref message } if message == "Search not found."));

	service
		.delete_saved_search(DeleteSavedSearchRequest {
			search: Some("pool in oakland".to_string()),
		})
		.await
		.expect("Delete failed.");
	service.save_search(save("condo in irvine")).await.expect("Save failed.");
	service.clear_saved_searches().await.expect("Clear failed.");

	assert!(service.saved_searches().await.expect("List failed.").saved_searches.is_empty());

	let blank = service
		.save_search(SaveSearchRequest { search: Some(" ".to_string()), ..Default::default() })
		.await
		.expect_err("Expected invalid request.");

	assert!(matches!(blank, Error::InvalidRequest { .. }));
}

#[tokio::test]
async fn broker_details_use_display_labels() {
	let Harness { service, .. } = harness(Script::san_francisco()).await;
	let found = service
		.broker_details(BrokerDetailsRequest { zip_code: Some("94118".to_string()) })
		.expect("Lookup failed.");

	assert_eq!(found.brokers.len(), 2);
	assert_eq!(found.brokers[0]["Broker Name"], "Bay Realty");
	assert_eq!(found.brokers[0]["City"], "San Francisco");
	assert_eq!(found.brokers[0]["Years of Experience"], 12);
	assert_eq!(
		found.brokers[0].keys().map(String::as_str).collect::<Vec<_>>(),
		vec![
			"Broker Name",
			"City",
			"State",
			"Zip Code",
			"Reviews",
			"Recent Homes Sold",
			"Negotiations Done",
			"Years of Experience",
			"Rating",
		]
	);

	let missing = service
		.broker_details(BrokerDetailsRequest { zip_code: Some("10001".to_string()) })
		.expect_err("Expected not found.");

	assert_eq!(missing.to_string(), "Not found: No brokers found for zip code: 10001");
	assert!(matches!(
		service.broker_details(BrokerDetailsRequest::default()),
		Err(Error::InvalidRequest { .. })
	));
}

#[tokio::test]
async fn export_writes_the_report() {
	let Harness { service, fixture, .. } = harness(Script::san_francisco()).await;
	let response = service.search(SearchRequest::new(SF_QUERY)).await.expect("Search failed.");
	let bundle = serde_json::to_value(&response).expect("Failed to serialize bundle.");
	let req: ExportRequest = serde_json::from_value(bundle).expect("Failed to parse bundle.");
	let saved = service.export(req).await.expect("Export failed.");
	let report = std::fs::read_to_string(&fixture.export_path).expect("Failed to read report.");

	assert!(saved.message.starts_with("Results saved to "));
	assert!(report.starts_with(&format!("Input Query: {SF_QUERY}\n\n")));
	assert!(report.contains(&format!("Generated SQL Query: {SF_FILTER}")));
	assert_eq!(report.lines().filter(|line| line.starts_with('{')).count(), 1);

	let err =
		service.export(ExportRequest::default()).await.expect_err("Expected invalid request.");

	assert!(matches!(
		err,
		Error::InvalidRequest { ref message } if message == "Incomplete data provided."
	));
}

const DENVER_LISTINGS_CSV: &str = "\
price,beds,baths,city,state,zip_code,address,image_url,listingUrl
700000,2,1,denver,co,80202,1 Blake St,https://img.test/1.jpg,https://listings.test/1
710000,3,2,denver,co,80203,,,#
720000,3,2,denver,co,80204,3 Larimer St,,
730000,3,2,denver,co,80205,4 Larimer St,,
740000,3,2,denver,co,80206,5 Larimer St,,
750000,3,2,denver,co,80207,6 Larimer St,,
760000,3,2,boulder,co,80302,7 Pearl St,,
";

fn denver_script() -> Script {
	Script {
		intent: Some("The user wants a home in Denver."),
		traits: Some("- is in Denver"),
		key_phrases: Some("Denver home"),
		filter: Some("SELECT * FROM zillow_data WHERE city = 'Denver';".to_string()),
		keywords: None,
		verdicts: Vec::new(),
		fail_matches: false,
	}
}

struct CarouselHarness {
	service: SearchService,
	provider: Arc<ScriptedProvider>,
	sender: Arc<RecordingSender>,
	_fixture: Fixture,
}

async fn carousel_harness(script: Script, sender: RecordingSender) -> CarouselHarness {
	let fixture = Fixture::with_listings(DENVER_LISTINGS_CSV).expect("Failed to write fixtures.");
	let cfg = fixture.config();
	let listings = Listings::load(&cfg.dataset).await.expect("Failed to load listings.");
	let brokers =
		Brokers::load(cfg.dataset.brokers_path.as_deref()).expect("Failed to load brokers.");
	let provider = ScriptedProvider::new(script);
	let sender = Arc::new(sender);
	let providers = Providers::new(provider.clone()).with_messaging(sender.clone());
	let service = SearchService::with_providers(cfg, listings, brokers, providers);

	CarouselHarness { service, provider, sender, _fixture: fixture }
}

fn carousel_request(query: &str, phone_number: &str) -> CarouselRequest {
	CarouselRequest {
		query: Some(query.to_string()),
		phone_number: Some(phone_number.to_string()),
	}
}

#[tokio::test]
async fn carousel_sends_the_top_five_matches() {
	let CarouselHarness { service, provider, sender, .. } =
		carousel_harness(denver_script(), RecordingSender::default()).await;
	let response = service
		.send_carousel(carousel_request("homes in denver", " +15550100 "))
		.await
		.expect("Carousel failed.");

	assert_eq!(response.message, "Carousel sent successfully.");
	assert_eq!(provider.count("key_phrases"), 1);
	assert_eq!(provider.count("match"), 0);

	let sent = sender.sent();

	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].from, "test");
	assert_eq!(sent[0].to, "+15550100");
	assert_eq!(sent[0].cards.len(), 5);

	let first = &sent[0].cards[0];

	assert_eq!(first.title, "1 Blake St");
	assert_eq!(first.description, "Price: $700000.0\nBeds: 2.0\nBaths: 1.0");
	assert_eq!(first.media_url.as_deref(), Some("https://img.test/1.jpg"));
	assert_eq!(first.actions.len(), 1);
	assert_eq!(first.actions[0].url, "https://listings.test/1");
	assert_eq!(first.actions[0].label, "View Listing");

	let second = &sent[0].cards[1];

	assert_eq!(second.title, "Property");
	assert!(second.media_url.is_none());
	assert!(second.actions.is_empty());
	assert_eq!(sent[0].cards[4].title, "5 Larimer St");
}

#[tokio::test]
async fn carousel_requires_query_and_phone_number() {
	let CarouselHarness { service, provider, sender, .. } =
		carousel_harness(denver_script(), RecordingSender::default()).await;
	let err = service
		.send_carousel(carousel_request("homes in denver", "  "))
		.await
		.expect_err("Expected missing phone number.");

	assert!(matches!(
		err,
		Error::InvalidRequest { ref message } if message == "Query and phone_number are required."
	));
	assert_eq!(provider.total(), 0);
	assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn carousel_without_matches_is_not_found() {
	let script = Script {
		filter: Some("SELECT * FROM zillow_data WHERE city = 'Aspen';".to_string()),
		..denver_script()
	};
	let CarouselHarness { service, sender, .. } =
		carousel_harness(script, RecordingSender::default()).await;
	let err = service
		.send_carousel(carousel_request("homes in aspen", "+15550100"))
		.await
		.expect_err("Expected no matches.");

	assert!(matches!(
		err,
		Error::NotFound { ref message } if message == "No properties found matching the query."
	));
	assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn carousel_stage_failures_stop_before_sending() {
	let script = Script { key_phrases: None, ..denver_script() };
	let CarouselHarness { service, sender, .. } =
		carousel_harness(script, RecordingSender::default()).await;
	let err = service
		.send_carousel(carousel_request("homes in denver", "+15550100"))
		.await
		.expect_err("Expected key phrase failure.");

	assert!(matches!(err, Error::Extraction { stage: ExtractionStage::KeyPhrases }));
	assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn carousel_send_failure_is_reported() {
	let CarouselHarness { service, sender, .. } =
		carousel_harness(denver_script(), RecordingSender { fail: true, ..Default::default() })
			.await;
	let err = service
		.send_carousel(carousel_request("homes in denver", "+15550100"))
		.await
		.expect_err("Expected send failure.");

	assert_eq!(err.to_string(), "Failed to send carousel.");
	assert_eq!(sender.sent().len(), 1);
}
