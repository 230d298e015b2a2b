//! Process-wide completion cache with a fixed time-to-live.

use std::{
	collections::HashMap,
	sync::Mutex,
	time::{Duration, Instant},
};

#[derive(Debug)]
struct Entry {
	value: String,
	expires_at: Instant,
}

/// Key to text store. Every entry lives for the same `ttl` from its last `set`.
///
/// `get` and `set` each take the lock once; a miss followed by a `set` is not atomic, so two
/// callers racing on a cold key may both compute the value.
#[derive(Debug)]
pub struct CompletionCache {
	ttl: Duration,
	sweep_threshold: usize,
	entries: Mutex<HashMap<String, Entry>>,
}
impl CompletionCache {
	pub fn new(ttl: Duration, sweep_threshold: usize) -> Self {
		Self { ttl, sweep_threshold, entries: Mutex::new(HashMap::new()) }
	}

	pub fn from_config(cfg: &homefind_config::Cache) -> Self {
		Self::new(Duration::from_secs(cfg.ttl_seconds), cfg.sweep_threshold)
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	pub fn get(&self, key: &str) -> Option<String> {
		self.get_at(key, Instant::now())
	}

	pub fn set(&self, key: &str, value: &str) {
		self.set_at(key, value, Instant::now());
	}

	/// Live entries only.
	pub fn len(&self) -> usize {
		let now = Instant::now();
		let entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.values().filter(|entry| entry.expires_at > now).count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn get_at(&self, key: &str, now: Instant) -> Option<String> {
		let entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.get(key).filter(|entry| entry.expires_at > now).map(|entry| entry.value.clone())
	}

	fn set_at(&self, key: &str, value: &str, now: Instant) {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		if entries.len() >= self.sweep_threshold {
			let before = entries.len();

			entries.retain(|_, entry| entry.expires_at > now);

			tracing::debug!(dropped = before - entries.len(), "Swept expired cache entries.");
		}

		let entry = Entry { value: value.to_string(), expires_at: now + self.ttl };

		entries.insert(key.to_string(), entry);
	}

	#[cfg(test)]
	fn stored(&self) -> usize {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}
}
