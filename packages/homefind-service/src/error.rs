use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// LLM-backed extraction stages whose empty output ends a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractionStage {
	Intent,
	Traits,
	KeyPhrases,
}
impl fmt::Display for ExtractionStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Intent => "user intent",
			Self::Traits => "traits",
			Self::KeyPhrases => "key phrases",
		})
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Failed to extract {stage}.")]
	Extraction { stage: ExtractionStage },
	#[error("Failed to generate SQL query.")]
	Synthesis,
	#[error("Failed to execute SQL query.")]
	Execution,
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Export error: {message}")]
	Export { message: String },
	#[error("{message}")]
	Messaging { message: String },
}
impl Error {
	pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into() }
	}

	pub(crate) fn not_found(message: impl Into<String>) -> Self {
		Self::NotFound { message: message.into() }
	}
}

impl From<homefind_storage::Error> for Error {
	fn from(err: homefind_storage::Error) -> Self {
		match err {
			homefind_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			homefind_storage::Error::NotFound(message) => Self::NotFound { message },
			other => Self::Storage { message: other.to_string() },
		}
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
