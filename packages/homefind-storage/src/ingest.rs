//! CSV ingestion: header cleanup, per-column normalization and storage-type inference.

use std::{fs::File, io::Read, path::Path};

use csv::ReaderBuilder;

use homefind_domain::{Cell, PropertyRecord};

use crate::{Error, Result};

/// Listing columns the pipeline prompts and filters rely on. Their absence is logged.
pub const CANONICAL_LISTING_COLUMNS: [&str; 6] =
	["price", "beds", "baths", "city", "state", "zip_code"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
	Integer,
	Real,
	Text,
}
impl ColumnKind {
	pub fn sql_type(self) -> &'static str {
		match self {
			Self::Integer => "INTEGER",
			Self::Real => "REAL",
			Self::Text => "TEXT",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
	pub name: String,
	pub kind: ColumnKind,
}

/// A normalized CSV: typed columns and rows of cells in column order.
#[derive(Clone, Debug, Default)]
pub struct Table {
	pub columns: Vec<Column>,
	pub rows: Vec<Vec<Cell>>,
}
impl Table {
	pub fn column_names(&self) -> impl Iterator<Item = &str> {
		self.columns.iter().map(|column| column.name.as_str())
	}

	pub fn position(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|column| column.name == name)
	}

	pub fn records(&self) -> Vec<PropertyRecord> {
		self.rows
			.iter()
			.map(|row| {
				PropertyRecord::from_fields(
					self.columns
						.iter()
						.zip(row.iter())
						.map(|(column, cell)| (column.name.clone(), cell.clone()))
						.collect(),
				)
			})
			.collect()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
	/// Thousands separators removed, then parsed as a real number.
	Price,
	Real,
	TitleCase,
	UpperCase,
	Text,
	Infer,
}

pub fn read_listings(path: &Path, internal_fields: &[String]) -> Result<Table> {
	let table = parse_listings(open(path)?, internal_fields)?;

	for column in CANONICAL_LISTING_COLUMNS {
		if table.position(column).is_none() {
			tracing::warn!(column, path = %path.display(), "Listing column not found.");
		}
	}

	Ok(table)
}

pub fn parse_listings<R>(reader: R, internal_fields: &[String]) -> Result<Table>
where
	R: Read,
{
	parse(reader, internal_fields, listing_rule)
}

pub fn read_brokers(path: &Path) -> Result<Table> {
	parse_brokers(open(path)?)
}

pub fn parse_brokers<R>(reader: R) -> Result<Table>
where
	R: Read,
{
	parse(reader, &[], broker_rule)
}

fn open(path: &Path) -> Result<File> {
	if !path.exists() {
		return Err(Error::NotFound(format!("{} does not exist.", path.display())));
	}

	Ok(File::open(path)?)
}

fn listing_rule(column: &str) -> Rule {
	match column {
		"price" => Rule::Price,
		"beds" | "baths" => Rule::Real,
		"city" => Rule::TitleCase,
		"state" => Rule::UpperCase,
		"zip_code" => Rule::Text,
		_ => Rule::Infer,
	}
}

fn broker_rule(column: &str) -> Rule {
	match column {
		"city" => Rule::TitleCase,
		"state" => Rule::UpperCase,
		"zip_code" => Rule::Text,
		_ => Rule::Infer,
	}
}

fn parse<R>(reader: R, internal_fields: &[String], rule_for: fn(&str) -> Rule) -> Result<Table>
where
	R: Read,
{
	let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
	let headers = reader.headers()?.clone();
	// Index into the raw record for every kept column; repeated headers keep the first.
	let mut kept: Vec<(usize, String)> = Vec::new();

	for (idx, header) in headers.iter().enumerate() {
		let name = header.trim().to_lowercase();

		if name.is_empty()
			|| internal_fields.iter().any(|field| field == &name)
			|| kept.iter().any(|(_, existing)| existing == &name)
		{
			continue;
		}

		kept.push((idx, name));
	}

	if kept.is_empty() {
		return Err(Error::InvalidArgument("CSV input has no usable header columns.".to_string()));
	}

	let mut raw_rows: Vec<Vec<String>> = Vec::new();

	for record in reader.records() {
		let record = record?;

		raw_rows.push(
			kept.iter()
				.map(|(idx, _)| record.get(*idx).unwrap_or_default().trim().to_string())
				.collect(),
		);
	}

	let mut columns = Vec::with_capacity(kept.len());
	let mut rows: Vec<Vec<Cell>> = vec![Vec::with_capacity(kept.len()); raw_rows.len()];

	for (position, (_, name)) in kept.into_iter().enumerate() {
		let rule = rule_for(&name);
		let kind = column_kind(rule, raw_rows.iter().map(|row| row[position].as_str()));

		for (row, raw) in rows.iter_mut().zip(raw_rows.iter()) {
			row.push(convert(rule, kind, &raw[position]));
		}

		columns.push(Column { name, kind });
	}

	Ok(Table { columns, rows })
}

fn column_kind<'a, I>(rule: Rule, values: I) -> ColumnKind
where
	I: Iterator<Item = &'a str>,
{
	match rule {
		Rule::Price | Rule::Real => ColumnKind::Real,
		Rule::TitleCase | Rule::UpperCase | Rule::Text => ColumnKind::Text,
		Rule::Infer => {
			let mut kind = ColumnKind::Integer;
			let mut seen = false;

			for value in values.filter(|value| !value.is_empty()) {
				seen = true;

				if kind == ColumnKind::Integer && value.parse::<i64>().is_err() {
					kind = ColumnKind::Real;
				}
				if kind == ColumnKind::Real && value.parse::<f64>().is_err() {
					return ColumnKind::Text;
				}
			}

			if seen { kind } else { ColumnKind::Text }
		},
	}
}

fn convert(rule: Rule, kind: ColumnKind, raw: &str) -> Cell {
	if raw.is_empty() {
		return Cell::Null;
	}

	match rule {
		Rule::Price => parse_real(&raw.replace(',', "")),
		Rule::TitleCase => Cell::Text(title_case(raw)),
		Rule::UpperCase => Cell::Text(raw.to_uppercase()),
		Rule::Text => Cell::Text(raw.to_string()),
		Rule::Real | Rule::Infer => match kind {
			ColumnKind::Integer => raw.parse::<i64>().map(Cell::Integer).unwrap_or(Cell::Null),
			ColumnKind::Real => parse_real(raw),
			ColumnKind::Text => Cell::Text(raw.to_string()),
		},
	}
}

fn parse_real(raw: &str) -> Cell {
	match raw.trim().parse::<f64>() {
		Ok(value) if value.is_finite() => Cell::Real(value),
		_ => Cell::Null,
	}
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
pub fn title_case(value: &str) -> String {
	let mut out = String::with_capacity(value.len());
	let mut in_word = false;

	for ch in value.chars() {
		if ch.is_alphabetic() {
			if in_word {
				out.extend(ch.to_lowercase());
			} else {
				out.extend(ch.to_uppercase());
			}

			in_word = true;
		} else {
			out.push(ch);

			in_word = false;
		}
	}

	out
}
