mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	path::{Path, PathBuf},
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use serde_json::Map;

use homefind_config::{
	Cache, Config, Dataset, Export, LlmProviderConfig, MessagingProviderConfig, Pipeline,
	Providers, Service,
};

/// Raw listings as they arrive from the crawler: padded and mixed-case headers, a repeated
/// `beds` header, thousands separators, lowercase cities, a leading-zero zip and an
/// unparseable price.
pub const LISTINGS_CSV: &str = "\
\" Price \",Beds,BATHS,area,listing_agent,year_built,property_tax,school_ratings,neighborhood_desc,broker,city,state,zip_code,hoa_fees,crawl_url_result,beds
\"1,250,000\",3,2,1800,Jane Doe,1925,12000,8,Quiet street with a big backyard and garden,Bay Realty,san francisco,ca,94118,,https://listings.test/1,9
\"980,000\",3,2,1500,John Roe,1950,9000,7,\"Updated kitchen, small patio\",Bay Realty,San Francisco,CA,94110,250,https://listings.test/2,9
\"1,100,000\",4,3,2400,Ann Lee,2001,11000,9,Pool and a huge backyard,Coast Homes,oakland,ca,94611,0,https://listings.test/3,9
650000,2,1,900,Sam Park,1978,6000,6,Condo near transit,Coast Homes,Irvine,ca,92618,400,https://listings.test/4,9
n/a,3,2,1600,Kim Wu,1999,,5,Fixer upper with backyard,Valley Brokers,boston,ma,02134,,https://listings.test/5,9
";

pub const BROKERS_CSV: &str = "\
Broker,City,State,zip_code,reviews,recent_homes_sold,negotiations_done,years_of_experience,rating
Bay Realty,san francisco,ca,94118,120,14,30,12,4.8
Golden Gate Homes,San Francisco,CA,94118,80,9,18,7,4.5
Coast Homes,oakland,ca,94611,45,5,11,4,4.1
";

pub const LISTING_ROWS: usize = 5;

/// Temp files for one test: listings and brokers written from the constants above, plus
/// an export target. Removed on drop.
pub struct Fixture {
	pub listings_path: PathBuf,
	pub brokers_path: PathBuf,
	pub export_path: PathBuf,
}
impl Fixture {
	pub fn new() -> Result<Self> {
		Self::with_listings(LISTINGS_CSV)
	}

	pub fn with_listings(listings_csv: &str) -> Result<Self> {
		let listings_path = temp_path("listings", "csv");
		let brokers_path = temp_path("brokers", "csv");
		let export_path = temp_path("export", "txt");

		write(&listings_path, listings_csv)?;
		write(&brokers_path, BROKERS_CSV)?;

		Ok(Self { listings_path, brokers_path, export_path })
	}

	pub fn config(&self) -> Config {
		test_config(&self.listings_path, Some(&self.brokers_path), &self.export_path)
	}
}
impl Drop for Fixture {
	fn drop(&mut self) {
		for path in [&self.listings_path, &self.brokers_path, &self.export_path] {
			let _ = fs::remove_file(path);
		}
	}
}

pub fn test_config(
	listings_path: &Path,
	brokers_path: Option<&Path>,
	export_path: &Path,
) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			cors_allow_any_origin: true,
		},
		dataset: Dataset {
			listings_path: listings_path.to_path_buf(),
			brokers_path: brokers_path.map(Path::to_path_buf),
			table: "zillow_data".to_string(),
			internal_fields: vec!["crawl_url_result".to_string()],
		},
		providers: Providers {
			llm: dummy_llm_provider(),
			messaging: Some(dummy_messaging_provider()),
		},
		cache: Cache::default(),
		pipeline: Pipeline::default(),
		export: Export { path: export_path.to_path_buf() },
	}
}

/// Points at a closed local port so an accidental real call fails fast.
pub fn dummy_llm_provider() -> LlmProviderConfig {
	LlmProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:9".to_string(),
		api_key: "test-key".to_string(),
		path: "/v1/chat/completions".to_string(),
		model: "test-model".to_string(),
		system_prompt: "You are a test assistant.".to_string(),
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

pub fn dummy_messaging_provider() -> MessagingProviderConfig {
	MessagingProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:9".to_string(),
		api_key: "test-key".to_string(),
		api_key_header: "PINNACLE-API-Key".to_string(),
		path: "/api/send/rcs".to_string(),
		sender: "test".to_string(),
		timeout_ms: 1_000,
	}
}

pub fn temp_path(prefix: &str, extension: &str) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("homefind_{prefix}_{nanos}_{pid}_{ordinal}.{extension}"));

	path
}

fn write(path: &Path, contents: &str) -> Result<()> {
	fs::write(path, contents)
		.map_err(|source| Error::WriteFixture { path: path.to_path_buf(), source })
}
