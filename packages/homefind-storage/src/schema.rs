use crate::ingest::Column;

/// Double-quoted SQLite identifier with embedded quotes doubled.
pub fn quote_ident(name: &str) -> String {
	format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn render_create_table(table: &str, columns: &[Column]) -> String {
	let defs = columns
		.iter()
		.map(|column| format!("{} {}", quote_ident(&column.name), column.kind.sql_type()))
		.collect::<Vec<_>>()
		.join(", ");

	format!("CREATE TABLE {} ({defs})", quote_ident(table))
}

pub fn render_insert(table: &str, columns: &[Column]) -> String {
	let names = columns.iter().map(|column| quote_ident(&column.name)).collect::<Vec<_>>();
	let params = vec!["?"; columns.len()].join(", ");

	format!("INSERT INTO {} ({}) VALUES ({params})", quote_ident(table), names.join(", "))
}
