//! Prompt text for every LLM stage. Few-shot examples are kept inline so a prompt can be read
//! top to bottom the way the model sees it.

const INTENT_EXAMPLES: &str = r#"### Example 1
Query: "Looking for a 3 bedroom house with a big backyard in San Francisco."
User intent: The user wants a three-bedroom house in San Francisco and cares most about a large backyard, likely for gardening or entertaining outdoors.

### Example 2
Query: "2 bed 2 bath in Irvine and 3 bed 2 bath in Redwood under 1600000."
User intent: The user is comparing two options, a 2-bedroom, 2-bathroom home in Irvine and a 3-bedroom, 2-bathroom home in Redwood City, with a budget under 1,600,000.

### Example 3
Query: "4 bedroom villa in redwood with a pool and sea view below 2 million."
User intent: The user wants a four-bedroom villa in Redwood City with a pool and a sea view, priced below 2 million, and values luxury and scenery."#;

const TRAIT_EXAMPLES: &str = r#"### Example 1
User intent: The user wants a three-bedroom house in San Francisco and cares most about a large backyard.
Query: "Looking for a 3 bedroom, 2 bathroom house with a big backyard in San Francisco."
Traits:
is a house
has 3 bed, 2 bath
is in San Francisco
has a big backyard

### Example 2
User intent: The user is comparing a 2-bedroom, 2-bathroom home in Irvine and a 3-bedroom, 3-bathroom home in San Francisco, both under 1,595,000.
Query: "2 bed 2 bath in Irvine and 3 bed 3 bath in San Francisco both under 1,595,000."
Traits:
has 2 bed, 2 bath
is in Irvine
has 3 bed, 3 bath
is in San Francisco
is under $1,595,000"#;

const KEY_PHRASE_EXAMPLES: &str = r#"### Example
User intent: The user wants a three-bedroom house in San Francisco and cares most about a large backyard.
Traits: is a house, has 3 bed, 2 bath, is in San Francisco, has a big backyard
Query: "Looking for a 3 bedroom, 2 bathroom house with a big backyard in San Francisco."
Key phrases:
3 bedroom house San Francisco
2 bathroom home
big backyard
San Francisco family home
outdoor space"#;

const FILTER_EXAMPLES: &str = r#"### Example 1
Query: "3 bed 2 bath house in San Francisco with a big backyard"
Statement: SELECT * FROM {table} WHERE beds = 3 AND baths = 2 AND city LIKE '%San Francisco%' AND (neighborhood_desc LIKE '%backyard%');

### Example 2
Query: "2 bed in irvine or 3 bed in redwood under 1.6M near good schools with a pool or fireplace"
Statement: SELECT * FROM {table} WHERE ((beds = 2 AND city LIKE '%Irvine%') OR (beds = 3 AND city LIKE '%Redwood City%')) AND price < 1600000 AND school_ratings >= 7 AND (neighborhood_desc LIKE '%pool%' OR neighborhood_desc LIKE '%fireplace%');"#;

const MATCH_EXAMPLES: &str = r#"### Example 1 (clear match)
Price: 850000
Beds: 3
City: San Francisco
Neighborhood Desc: Spacious backyard with a swimming pool.
Trait: has a swimming pool
Answer: yes

### Example 2 (clear miss)
Price: 600000
Beds: 2
City: Irvine
Neighborhood Desc: Close to downtown parks.
Trait: has a home gym
Answer: no

### Example 3 (not enough information)
Price: 720000
Beds: 3
City: Bronx
Neighborhood Desc: Modern kitchen appliances.
Trait: has a fireplace
Answer: unsure

### Example 4 (truncated city name)
Price: 800000
City: Redwood
Trait: is in Redwood City
Answer: yes

### Example 5 (misspelled city name)
Price: 950000
City: San Franciscso
Trait: is in San Francisco
Answer: yes"#;

pub(crate) fn intent(query: &str) -> String {
	format!(
		"Summarize the intent behind the following real estate search as one short paragraph. \
		 Write only the paragraph. Complete partial place names with the most likely full name, \
		 for example 'redwood' becomes 'Redwood City'.\n\n\
		 {INTENT_EXAMPLES}\n\n---\n\nQuery: \"{query}\"\nUser intent:"
	)
}

pub(crate) fn traits(intent: &str, query: &str) -> String {
	format!(
		"List the traits the searcher wants, one per line, each starting with a verb such as \
		 'is' or 'has'. Keep numbers such as prices on a single line. List each property \
		 separately when several are requested. Only add 'is a house' when a house or property \
		 type is actually mentioned. Write nothing except the traits.\n\n\
		 {TRAIT_EXAMPLES}\n\n---\n\nUser intent: {intent}\nQuery: \"{query}\"\nTraits:"
	)
}

pub(crate) fn key_phrases(intent: &str, traits: &[String], query: &str, max: usize) -> String {
	format!(
		"Give up to {max} short search phrases for this request, one per line, most relevant \
		 first. Write nothing except the phrases.\n\n\
		 {KEY_PHRASE_EXAMPLES}\n\n---\n\nUser intent: {intent}\nTraits: {}\nQuery: \"{query}\"\n\
		 Key phrases:",
		traits.join(", ")
	)
}

pub(crate) struct FilterPrompt<'a> {
	pub(crate) table: &'a str,
	pub(crate) columns: &'a [String],
	pub(crate) cities: &'a [String],
	pub(crate) intent: &'a str,
	pub(crate) traits: &'a [String],
	pub(crate) key_phrases: &'a [String],
	pub(crate) query: &'a str,
}

pub(crate) fn filter_statement(args: FilterPrompt<'_>) -> String {
	let FilterPrompt { table, columns, cities, intent, traits, key_phrases, query } = args;
	let examples = FILTER_EXAMPLES.replace("{table}", table);

	format!(
		"Write one SQLite SELECT statement over the table {table} that finds listings for the \
		 request below. End it with a semicolon and write nothing else.\n\n\
		 Columns: {columns}\n\
		 Known cities: {cities}\n\n\
		 Rules:\n\
		 - Match text columns with LIKE '%value%', never with exact equality.\n\
		 - Map partial or misspelled places to the closest known city.\n\
		 - Put every feature (pool, fireplace, backyard, view) into one neighborhood_desc \
		 condition, joined with OR. Never invent feature columns.\n\
		 - Leave out conditions for anything the request does not mention.\n\
		 - Join alternatives for the same column with OR and different columns with AND.\n\
		 - School ratings: 'good' means school_ratings >= 7, 'excellent' means \
		 school_ratings >= 8.\n\n\
		 {examples}\n\n---\n\n\
		 User intent: {intent}\nTraits: {traits}\nKey phrases: {key_phrases}\n\
		 Query: \"{query}\"\nStatement:",
		columns = columns.join(", "),
		cities = cities.join(", "),
		traits = traits.join(", "),
		key_phrases = key_phrases.join(", "),
	)
}

pub(crate) struct KeywordsPrompt<'a> {
	pub(crate) query: &'a str,
	pub(crate) intent: &'a str,
	pub(crate) traits: &'a [String],
	pub(crate) key_phrases: &'a [String],
	pub(crate) statement: &'a str,
}

pub(crate) fn property_keywords(args: KeywordsPrompt<'_>) -> String {
	let KeywordsPrompt { query, intent, traits, key_phrases, statement } = args;

	format!(
		"Describe the listings this search is after as comma-separated 'Column: Value' pairs on \
		 one line, for example 'Beds: 3, Baths: 2, City: San Francisco, Feature: backyard'. \
		 Write nothing else.\n\n\
		 Query: \"{query}\"\nUser intent: {intent}\nTraits: {}\nKey phrases: {}\n\
		 Statement: {statement}\nKeywords:",
		traits.join(", "),
		key_phrases.join(", "),
	)
}

pub(crate) fn trait_match(details: &str, trait_phrase: &str, cities: &[String]) -> String {
	format!(
		"Decide whether the property below has the given trait. Answer with exactly one word: \
		 yes when the details clearly satisfy the trait, no when they clearly do not, unsure \
		 when the details are missing or only partly match. Treat a partial or misspelled city \
		 as the closest city from the known list.\n\n\
		 Known cities: {}\n\n\
		 {MATCH_EXAMPLES}\n\n---\n\n{details}\nTrait: {trait_phrase}\nAnswer:",
		cities.join(", ")
	)
}
