use std::collections::HashSet;

use homefind_domain::{AnnotationMode, PropertyRecord, column};

use crate::SearchService;

// Used when a trait is nothing but stop phrases.
const FALLBACK_COLUMN: &str = "trait";

impl SearchService {
	/// Appends one annotation column per trait to every record and returns the column names
	/// in trait order.
	///
	/// A name already used by any record, or by an earlier trait, gets the first free
	/// `_1`, `_2`, ... suffix. Names are resolved even when `records` is empty.
	pub async fn annotate(
		&self,
		records: &mut [PropertyRecord],
		traits: &[String],
		mode: AnnotationMode,
	) -> Vec<String> {
		let mut taken: HashSet<String> =
			records.iter().flat_map(|record| record.columns().map(str::to_string)).collect();
		let mut columns = Vec::with_capacity(traits.len());

		for trait_phrase in traits {
			let mut base = column::feature_column(trait_phrase);

			if base.is_empty() {
				base = FALLBACK_COLUMN.to_string();
			}

			let name = column::unique_column(&base, |candidate| taken.contains(candidate));

			for record in records.iter_mut() {
				let verdict = self.match_trait(record, trait_phrase).await;

				record.annotate(&name, mode.marker(verdict));
			}

			taken.insert(name.clone());
			columns.push(name);
		}

		columns
	}
}
