//! The listings table: a shared-cache in-memory SQLite database loaded once from CSV and
//! opened read-only for every statement the pipeline runs.

use std::{str::FromStr, sync::Mutex};

use sqlx::{
	Column as _, ConnectOptions, Connection, Executor, Row, TypeInfo, ValueRef,
	sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow},
};

use homefind_domain::{Cell, PropertyRecord};

use crate::{
	Error, Result,
	ingest::{self, Table},
	schema,
};

const MAX_READERS: u32 = 4;

pub struct Listings {
	pool: SqlitePool,
	// Holds the in-memory database open while pool connections come and go.
	_anchor: Mutex<SqliteConnection>,
	table: String,
	columns: Vec<String>,
	cities: Vec<String>,
	row_count: usize,
}
impl Listings {
	pub async fn load(cfg: &homefind_config::Dataset) -> Result<Self> {
		let table = ingest::read_listings(&cfg.listings_path, &cfg.internal_fields)?;
		let listings = Self::from_table(&cfg.table, table).await?;

		tracing::info!(
			path = %cfg.listings_path.display(),
			table = %listings.table,
			rows = listings.row_count,
			cities = listings.cities.len(),
			"Listings loaded."
		);

		Ok(listings)
	}

	pub async fn from_table(name: &str, table: Table) -> Result<Self> {
		if name.trim().is_empty() {
			return Err(Error::InvalidArgument("Table name must be non-empty.".to_string()));
		}

		let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
		let mut anchor = options.connect().await?;

		write_table(&mut anchor, name, &table).await?;

		let pool = SqlitePoolOptions::new()
			.max_connections(MAX_READERS)
			.after_connect(|conn, _meta| {
				Box::pin(async move {
					conn.execute("PRAGMA query_only = ON").await?;

					Ok(())
				})
			})
			.connect_with(options)
			.await?;
		let cities = distinct_cities(&table);

		Ok(Self {
			pool,
			_anchor: Mutex::new(anchor),
			table: name.to_string(),
			columns: table.column_names().map(str::to_string).collect(),
			cities,
			row_count: table.rows.len(),
		})
	}

	pub fn table(&self) -> &str {
		&self.table
	}

	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	/// Sorted distinct non-null cities, as normalized at load.
	pub fn cities(&self) -> &[String] {
		&self.cities
	}

	pub fn row_count(&self) -> usize {
		self.row_count
	}

	/// Runs one read-only statement and returns its rows in engine order. Column names and
	/// types come from the result set itself.
	pub async fn execute(&self, statement: &str) -> Result<Vec<PropertyRecord>> {
		if statement.trim().is_empty() {
			return Err(Error::InvalidArgument("Statement must be non-empty.".to_string()));
		}

		let rows = sqlx::query(statement).persistent(false).fetch_all(&self.pool).await?;

		rows.iter().map(decode_row).collect()
	}
}

async fn write_table(conn: &mut SqliteConnection, name: &str, table: &Table) -> Result<()> {
	let mut tx = conn.begin().await?;

	sqlx::query(&schema::render_create_table(name, &table.columns)).execute(&mut *tx).await?;

	let insert = schema::render_insert(name, &table.columns);

	for row in &table.rows {
		let mut query = sqlx::query(&insert);

		for cell in row {
			query = match cell {
				Cell::Null => query.bind(None::<String>),
				Cell::Integer(value) => query.bind(*value),
				Cell::Real(value) => query.bind(*value),
				Cell::Text(value) => query.bind(value.as_str()),
			};
		}

		query.execute(&mut *tx).await?;
	}

	tx.commit().await?;

	Ok(())
}

fn distinct_cities(table: &Table) -> Vec<String> {
	let Some(idx) = table.position("city") else {
		return Vec::new();
	};
	let mut cities = table
		.rows
		.iter()
		.filter_map(|row| row.get(idx).and_then(Cell::as_text))
		.map(str::to_string)
		.collect::<Vec<_>>();

	cities.sort();
	cities.dedup();

	cities
}

fn decode_row(row: &SqliteRow) -> Result<PropertyRecord> {
	let mut record = PropertyRecord::new();

	for (idx, column) in row.columns().iter().enumerate() {
		record.push(column.name(), decode_cell(row, idx)?);
	}

	Ok(record)
}

fn decode_cell(row: &SqliteRow, idx: usize) -> Result<Cell> {
	let raw = row.try_get_raw(idx)?;

	if raw.is_null() {
		return Ok(Cell::Null);
	}

	let type_name = raw.type_info().name().to_string();
	let cell = match type_name.as_str() {
		"INTEGER" | "BOOLEAN" => Cell::Integer(row.try_get_unchecked::<i64, _>(idx)?),
		"REAL" | "NUMERIC" => Cell::Real(row.try_get_unchecked::<f64, _>(idx)?),
		"BLOB" => {
			let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx)?;

			Cell::Text(String::from_utf8_lossy(&bytes).into_owned())
		},
		_ => Cell::Text(row.try_get_unchecked::<String, _>(idx)?),
	};

	Ok(cell)
}
