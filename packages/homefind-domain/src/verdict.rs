use serde::{Deserialize, Serialize};

pub const GLYPH_YES: &str = "🟢";
pub const GLYPH_UNSURE: &str = "🟡";
pub const GLYPH_NO: &str = "⚪";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
	Yes,
	No,
	Unsure,
}
impl Verdict {
	/// Reads a model response. Anything other than yes/no/unsure (after trimming and
	/// lowercasing) is coerced to [`Verdict::Unsure`].
	pub fn from_response(raw: &str) -> Self {
		Self::parse(raw).unwrap_or(Self::Unsure)
	}

	/// Strict form of [`Verdict::from_response`].
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_lowercase().as_str() {
			"yes" => Some(Self::Yes),
			"no" => Some(Self::No),
			"unsure" => Some(Self::Unsure),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Yes => "yes",
			Self::No => "no",
			Self::Unsure => "unsure",
		}
	}
}

/// How a verdict is written into an annotation column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotationMode {
	/// Colored dots: yes, unsure, no.
	Glyph,
	/// Literal "yes"/"no"; unsure is reported as "no".
	Binary,
}
impl AnnotationMode {
	pub fn marker(self, verdict: Verdict) -> &'static str {
		match (self, verdict) {
			(Self::Glyph, Verdict::Yes) => GLYPH_YES,
			(Self::Glyph, Verdict::Unsure) => GLYPH_UNSURE,
			(Self::Glyph, Verdict::No) => GLYPH_NO,
			(Self::Binary, Verdict::Yes) => "yes",
			(Self::Binary, Verdict::No | Verdict::Unsure) => "no",
		}
	}
}
