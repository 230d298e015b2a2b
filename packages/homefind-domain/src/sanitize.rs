use serde_json::{Map, Value};

use crate::PropertyRecord;

/// Response form of a result set: absent cells become JSON `null` and ingestion-internal
/// columns are dropped. Every other field is emitted unchanged and in record order.
pub fn sanitize_records<S>(records: &[PropertyRecord], internal_fields: &[S]) -> Vec<Value>
where
	S: AsRef<str>,
{
	records
		.iter()
		.map(|record| {
			let mut map = Map::with_capacity(record.len());

			for (column, cell) in record.fields() {
				if is_internal(column, internal_fields) {
					continue;
				}

				map.insert(column.clone(), cell.to_json());
			}

			Value::Object(map)
		})
		.collect()
}

/// Removes internal fields from every object nested anywhere in `value`.
pub fn strip_internal_fields<S>(value: Value, internal_fields: &[S]) -> Value
where
	S: AsRef<str>,
{
	match value {
		Value::Object(map) => Value::Object(
			map.into_iter()
				.filter(|(key, _)| !is_internal(key, internal_fields))
				.map(|(key, nested)| (key, strip_internal_fields(nested, internal_fields)))
				.collect(),
		),
		Value::Array(items) => Value::Array(
			items.into_iter().map(|item| strip_internal_fields(item, internal_fields)).collect(),
		),
		other => other,
	}
}

fn is_internal<S>(key: &str, internal_fields: &[S]) -> bool
where
	S: AsRef<str>,
{
	internal_fields.iter().any(|field| field.as_ref().eq_ignore_ascii_case(key))
}
