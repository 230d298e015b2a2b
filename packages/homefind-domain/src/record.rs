use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::Value;

/// Columns a trait-match prompt shows, in display order.
pub const PROMPT_COLUMNS: [&str; 14] = [
	"price",
	"beds",
	"baths",
	"area",
	"listing_agent",
	"year_built",
	"property_tax",
	"school_ratings",
	"neighborhood_desc",
	"broker",
	"city",
	"state",
	"zip_code",
	"hoa_fees",
];

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
	Null,
	Integer(i64),
	Real(f64),
	Text(String),
}
impl Cell {
	/// True for SQL nulls and for reals that carry no number (NaN, infinities).
	pub fn is_absent(&self) -> bool {
		match self {
			Self::Null => true,
			Self::Real(value) => !value.is_finite(),
			_ => false,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(value) => Some(value.as_str()),
			_ => None,
		}
	}

	pub fn to_json(&self) -> Value {
		if self.is_absent() {
			return Value::Null;
		}

		match self {
			Self::Integer(value) => Value::from(*value),
			Self::Real(value) =>
				serde_json::Number::from_f64(*value).map(Value::Number).unwrap_or(Value::Null),
			Self::Text(value) => Value::String(value.clone()),
			Self::Null => Value::Null,
		}
	}
}

impl fmt::Display for Cell {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => Ok(()),
			Self::Integer(value) => write!(f, "{value}"),
			Self::Real(value) if !value.is_finite() => Ok(()),
			Self::Real(value) => write!(f, "{value}"),
			Self::Text(value) => f.write_str(value),
		}
	}
}

impl Serialize for Cell {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.to_json().serialize(serializer)
	}
}

/// One listing row: ordered column name to cell. Dataset columns are fixed once the row is
/// produced; annotation columns may only be appended.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyRecord {
	fields: Vec<(String, Cell)>,
}
impl PropertyRecord {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_fields(fields: Vec<(String, Cell)>) -> Self {
		let mut record = Self::new();

		for (column, cell) in fields {
			record.push(column, cell);
		}

		record
	}

	/// Appends a column. A repeated column name keeps the first value, the way a projection
	/// with duplicate names resolves on lookup.
	pub fn push(&mut self, column: impl Into<String>, cell: Cell) {
		let column = column.into();

		if !self.contains(&column) {
			self.fields.push((column, cell));
		}
	}

	/// Adds an annotation column. Returns false, leaving the record untouched, when the
	/// column already exists.
	pub fn annotate(&mut self, column: &str, marker: &str) -> bool {
		if self.contains(column) {
			return false;
		}

		self.fields.push((column.to_string(), Cell::Text(marker.to_string())));

		true
	}

	pub fn get(&self, column: &str) -> Option<&Cell> {
		self.fields.iter().find(|(name, _)| name == column).map(|(_, cell)| cell)
	}

	pub fn contains(&self, column: &str) -> bool {
		self.get(column).is_some()
	}

	pub fn columns(&self) -> impl Iterator<Item = &str> {
		self.fields.iter().map(|(name, _)| name.as_str())
	}

	pub fn fields(&self) -> &[(String, Cell)] {
		&self.fields
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Cache identity for trait verdicts: zip code and price joined by an underscore.
	///
	/// Two listings sharing both values share verdicts.
	pub fn identity(&self) -> String {
		let zip = self.get("zip_code").map(ToString::to_string).unwrap_or_default();
		let price = self.get("price").map(ToString::to_string).unwrap_or_default();

		format!("{zip}_{price}")
	}

	/// "Label: value" lines over [`PROMPT_COLUMNS`], absent values rendered as `N/A`.
	pub fn prompt_details(&self) -> String {
		PROMPT_COLUMNS
			.iter()
			.map(|column| {
				let value = match self.get(column) {
					Some(cell) if !cell.is_absent() => cell.to_string(),
					_ => "N/A".to_string(),
				};

				format!("{}: {value}", column_label(column))
			})
			.collect::<Vec<_>>()
			.join("\n")
	}
}

impl Serialize for PropertyRecord {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.fields.len()))?;

		for (column, cell) in &self.fields {
			map.serialize_entry(column, cell)?;
		}

		map.end()
	}
}

/// `school_ratings` -> `School Ratings`.
pub fn column_label(column: &str) -> String {
	column
		.split('_')
		.filter(|part| !part.is_empty())
		.map(|part| {
			let mut chars = part.chars();

			match chars.next() {
				Some(first) =>
					first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<String>>()
		.join(" ")
}
