use std::path::Path;

use homefind_domain::PropertyRecord;

use crate::{Result, ingest};

/// Broker rows held in memory, looked up by zip code.
#[derive(Clone, Debug, Default)]
pub struct Brokers {
	rows: Vec<PropertyRecord>,
}
impl Brokers {
	/// An unset path yields an empty directory.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let Some(path) = path else {
			tracing::warn!("No broker file configured. Broker lookups will return nothing.");

			return Ok(Self::default());
		};
		let table = ingest::read_brokers(path)?;

		if table.position("zip_code").is_none() {
			tracing::warn!(path = %path.display(), "Broker file has no zip_code column.");
		}

		let brokers = Self { rows: table.records() };

		tracing::info!(path = %path.display(), rows = brokers.rows.len(), "Brokers loaded.");

		Ok(brokers)
	}

	pub fn from_records(rows: Vec<PropertyRecord>) -> Self {
		Self { rows }
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn by_zip(&self, zip_code: &str) -> Vec<&PropertyRecord> {
		let zip_code = zip_code.trim();

		self.rows
			.iter()
			.filter(|row| {
				row.get("zip_code").and_then(|cell| cell.as_text()).map(str::trim) == Some(zip_code)
			})
			.collect()
	}
}
