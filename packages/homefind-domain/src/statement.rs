//! Filter statements synthesized by the model: pulling the statement out of a free-form
//! response, and the gate every statement passes before it reaches the listings table.

use std::{collections::HashSet, ops::ControlFlow, sync::LazyLock};

use regex::Regex;
use sqlparser::{
	ast::{Expr, Ident, SelectItem, SetExpr, Statement, visit_expressions, visit_relations},
	dialect::SQLiteDialect,
	parser::Parser,
};

static LEADING_FENCE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)^\s*```(?:sql)?\s*").expect("fence pattern is valid"));
static TRAILING_FENCE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\s*```\s*$").expect("fence pattern is valid"));
static FIRST_SELECT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)\bselect\b[\s\S]+?;").expect("select pattern is valid"));

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
	#[error("Statement is empty.")]
	Empty,
	#[error("Statement does not start with SELECT.")]
	NotReadOnly,
	#[error("Statement does not parse: {0}")]
	Unparsable(String),
	#[error("Expected exactly one statement, found {0}.")]
	MultipleStatements(usize),
	#[error("Unsupported statement shape: {0}.")]
	UnsupportedShape(&'static str),
	#[error("Statement references unknown table {0}.")]
	UnknownTable(String),
	#[error("Statement references unknown column {0}.")]
	UnknownColumn(String),
}

/// Strips code fences and returns the first `SELECT ... ;` in the response, or the whole
/// trimmed response when no terminated statement is present. `None` for blank responses.
pub fn extract_statement(response: &str) -> Option<String> {
	let unfenced = LEADING_FENCE.replace(response, "");
	let unfenced = TRAILING_FENCE.replace(&unfenced, "");
	let statement = match FIRST_SELECT.find(&unfenced) {
		Some(found) => found.as_str().to_string(),
		None => unfenced.trim().to_string(),
	};

	if statement.is_empty() { None } else { Some(statement) }
}

pub fn is_read_only(statement: &str) -> bool {
	statement.trim_start().to_uppercase().starts_with("SELECT")
}

/// Allow-list check for model-generated statements against one table and its columns.
#[derive(Clone, Debug)]
pub struct StatementGuard {
	table: String,
	columns: HashSet<String>,
}
impl StatementGuard {
	pub fn new<I, S>(table: &str, columns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self {
			table: table.to_lowercase(),
			columns: columns.into_iter().map(|column| column.as_ref().to_lowercase()).collect(),
		}
	}

	pub fn table(&self) -> &str {
		&self.table
	}

	pub fn check(&self, statement: &str) -> Result<(), Rejection> {
		if statement.trim().is_empty() {
			return Err(Rejection::Empty);
		}
		if !is_read_only(statement) {
			return Err(Rejection::NotReadOnly);
		}

		let statements = Parser::parse_sql(&SQLiteDialect {}, statement)
			.map_err(|err| Rejection::Unparsable(err.to_string()))?;
		let parsed = match statements.as_slice() {
			[single] => single,
			[] => return Err(Rejection::Empty),
			many => return Err(Rejection::MultipleStatements(many.len())),
		};
		let Statement::Query(query) = parsed else {
			return Err(Rejection::NotReadOnly);
		};

		if query.with.is_some() {
			return Err(Rejection::UnsupportedShape("common table expression"));
		}

		let SetExpr::Select(select) = query.body.as_ref() else {
			return Err(Rejection::UnsupportedShape("set operation or nested query body"));
		};
		let aliases: HashSet<String> = select
			.projection
			.iter()
			.filter_map(|item| match item {
				SelectItem::ExprWithAlias { alias, .. } => Some(alias.value.to_lowercase()),
				_ => None,
			})
			.collect();

		if let ControlFlow::Break(rejection) = visit_relations(parsed, |name| {
			let matches = name.0.len() == 1
				&& name.0.first().is_some_and(|ident| ident.value.to_lowercase() == self.table);

			if matches {
				ControlFlow::Continue(())
			} else {
				ControlFlow::Break(Rejection::UnknownTable(name.to_string()))
			}
		}) {
			return Err(rejection);
		}

		if let ControlFlow::Break(rejection) = visit_expressions(parsed, |expr| match expr {
			Expr::Identifier(ident) => self.check_identifier(ident, &aliases),
			Expr::CompoundIdentifier(parts) => self.check_qualified(parts),
			_ => ControlFlow::Continue(()),
		}) {
			return Err(rejection);
		}

		Ok(())
	}

	fn check_identifier(&self, ident: &Ident, aliases: &HashSet<String>) -> ControlFlow<Rejection> {
		let name = ident.value.to_lowercase();

		// SQLite reads an unknown double-quoted identifier as a string literal.
		if self.columns.contains(&name) || aliases.contains(&name) || ident.quote_style == Some('"')
		{
			return ControlFlow::Continue(());
		}

		ControlFlow::Break(Rejection::UnknownColumn(ident.value.clone()))
	}

	fn check_qualified(&self, parts: &[Ident]) -> ControlFlow<Rejection> {
		match parts {
			[table, column]
				if table.value.to_lowercase() == self.table
					&& self.columns.contains(&column.value.to_lowercase()) =>
				ControlFlow::Continue(()),
			_ => ControlFlow::Break(Rejection::UnknownColumn(
				parts.iter().map(|part| part.value.as_str()).collect::<Vec<_>>().join("."),
			)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn guard() -> StatementGuard {
		StatementGuard::new(
			"zillow_data",
			["price", "beds", "baths", "city", "state", "zip_code", "neighborhood_desc"],
		)
	}

	#[test]
	fn extracts_first_terminated_select() {
		let response = "```sql\nSELECT * FROM zillow_data WHERE beds = 3;\nSELECT 1;\n```";

		assert_eq!(
			extract_statement(response).as_deref(),
			Some("SELECT * FROM zillow_data WHERE beds = 3;")
		);
	}

	#[test]
	fn falls_back_to_whole_response_without_terminator() {
		assert_eq!(
			extract_statement("  select * from zillow_data where beds = 2  ").as_deref(),
			Some("select * from zillow_data where beds = 2")
		);
		assert_eq!(extract_statement("```\n```"), None);
	}

	#[test]
	fn skips_leading_prose() {
		assert_eq!(
			extract_statement("Here you go: SELECT * FROM zillow_data;").as_deref(),
			Some("SELECT * FROM zillow_data;")
		);
	}

	#[test]
	fn accepts_known_columns() {
		let statement = "SELECT * FROM zillow_data WHERE beds = 3 AND baths = 2 AND city LIKE \
			'%San Francisco%' AND (neighborhood_desc LIKE '%backyard%');";

		assert_eq!(guard().check(statement), Ok(()));
	}

	#[test]
	fn accepts_aliases_and_qualified_columns() {
		let statement = "SELECT zillow_data.price AS p FROM zillow_data WHERE zillow_data.beds >= 2 \
			ORDER BY p DESC LIMIT 5;";

		assert_eq!(guard().check(statement), Ok(()));
	}

	#[test]
	fn rejects_writes() {
		assert_eq!(guard().check("DELETE FROM zillow_data;"), Err(Rejection::NotReadOnly));
		assert_eq!(
			guard().check("SELECT * FROM zillow_data; DROP TABLE zillow_data;"),
			Err(Rejection::MultipleStatements(2))
		);
	}

	#[test]
	fn rejects_unknown_relations() {
		assert_eq!(
			guard().check("SELECT * FROM sqlite_master;"),
			Err(Rejection::UnknownTable("sqlite_master".to_string()))
		);
		assert!(matches!(
			guard().check("SELECT * FROM zillow_data WHERE price IN (SELECT price FROM brokers);"),
			Err(Rejection::UnknownTable(_))
		));
	}

	#[test]
	fn rejects_unknown_columns() {
		assert_eq!(
			guard().check("SELECT * FROM zillow_data WHERE pool = 1;"),
			Err(Rejection::UnknownColumn("pool".to_string()))
		);
	}

	#[test]
	fn rejects_set_operations() {
		assert!(matches!(
			guard().check("SELECT price FROM zillow_data UNION SELECT price FROM zillow_data;"),
			Err(Rejection::UnsupportedShape(_))
		));
	}

	#[test]
	fn double_quoted_literals_pass() {
		assert_eq!(guard().check("SELECT * FROM zillow_data WHERE city LIKE \"%Irvine%\";"), Ok(()));
	}
}
