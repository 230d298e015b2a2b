use std::sync::LazyLock;

use regex::Regex;

// Applied in order, case-sensitive, whole words only. "is near" keeps its copula.
static STOP_PHRASES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
	[(r"\bhas\b", ""), (r"\bthe\b", ""), (r"\ba\b", ""), (r"\ban\b", ""), (r"\bis near\b", "is")]
		.into_iter()
		.map(|(pattern, replacement)| {
			(Regex::new(pattern).expect("stop phrase patterns are valid"), replacement)
		})
		.collect()
});
static NON_WORD: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\W+").expect("non-word pattern is valid"));

/// Base annotation-column name for a trait phrase.
///
/// `"has a big backyard"` becomes `"big backyard"`, `"is near a good school"` becomes
/// `"is good school"`. Pure: the same trait always yields the same name. Uniqueness within a
/// result set is the caller's job, see [`unique_column`].
pub fn feature_column(trait_phrase: &str) -> String {
	let mut cleaned = trait_phrase.to_string();

	for (pattern, replacement) in STOP_PHRASES.iter() {
		cleaned = pattern.replace_all(&cleaned, *replacement).trim().to_string();
	}

	NON_WORD
		.split(&cleaned)
		.filter(|token| !token.is_empty())
		.map(str::to_lowercase)
		.collect::<Vec<_>>()
		.join(" ")
}

/// `base` if free, else the first free `base_1`, `base_2`, ...
pub fn unique_column<F>(base: &str, is_taken: F) -> String
where
	F: Fn(&str) -> bool,
{
	if !is_taken(base) {
		return base.to_string();
	}

	let mut counter = 1_usize;

	loop {
		let candidate = format!("{base}_{counter}");

		if !is_taken(&candidate) {
			return candidate;
		}

		counter += 1;
	}
}
