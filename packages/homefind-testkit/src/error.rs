pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to write fixture {path:?}: {source}")]
	WriteFixture { path: std::path::PathBuf, source: std::io::Error },
}
