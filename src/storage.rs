//! Best-score persistence.
//!
//! The only durable state in the game is one integer. Reads treat anything
//! missing or unparsable as zero and write failures are logged and dropped;
//! a broken store must never end a run.

use web_sys::Storage;

use crate::error::{Error, Result};

/// `localStorage` key holding the best total.
pub const HIGH_SCORE_KEY: &str = "flagGameHighScore";

pub trait HighScoreStore {
    /// Raw stored value, `None` when nothing has been written yet.
    fn read(&self) -> Result<Option<String>>;
    fn write(&mut self, value: &str) -> Result<()>;
}

/// Parses a stored value; absent or corrupt values read as zero.
pub fn parse_high_score(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.floor() as i64)
        .unwrap_or(0)
}

pub fn load_high_score(store: &dyn HighScoreStore) -> i64 {
    match store.read() {
        Ok(raw) => parse_high_score(raw.as_deref()),
        Err(err) => {
            log::warn!("could not read high score, assuming 0: {err}");
            0
        }
    }
}

/// Outcome of offering a finished run's total to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighScoreUpdate {
    pub high_score: i64,
    pub new_record: bool,
}

/// Persists `total` when it strictly beats the stored best.
pub fn record_total(store: &mut dyn HighScoreStore, total: i64) -> HighScoreUpdate {
    let stored = load_high_score(store);
    if total <= stored {
        return HighScoreUpdate { high_score: stored, new_record: false };
    }
    if let Err(err) = store.write(&total.to_string()) {
        log::warn!("could not persist high score {total}: {err}");
    }
    HighScoreUpdate { high_score: total, new_record: true }
}

/// In-process store, used natively and whenever `localStorage` is unavailable.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    value: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self { value: Some(value.into()) }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl HighScoreStore for MemoryStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> Result<()> {
        self.value = Some(value.to_string());
        Ok(())
    }
}

/// Browser `localStorage` backed store.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// `None` when storage is disabled (privacy mode, sandboxed iframe, no window).
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl HighScoreStore for LocalStorageStore {
    fn read(&self) -> Result<Option<String>> {
        self.storage
            .get_item(HIGH_SCORE_KEY)
            .map_err(|e| Error::Storage(Error::js(e).to_string()))
    }

    fn write(&mut self, value: &str) -> Result<()> {
        self.storage
            .set_item(HIGH_SCORE_KEY, value)
            .map_err(|e| Error::Storage(Error::js(e).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl HighScoreStore for Broken {
        fn read(&self) -> Result<Option<String>> {
            Err(Error::Storage("quota".into()))
        }
        fn write(&mut self, _value: &str) -> Result<()> {
            Err(Error::Storage("quota".into()))
        }
    }

    #[test]
    fn parse_treats_garbage_as_zero() {
        assert_eq!(parse_high_score(None), 0);
        assert_eq!(parse_high_score(Some("")), 0);
        assert_eq!(parse_high_score(Some("abc")), 0);
        assert_eq!(parse_high_score(Some("NaN")), 0);
        assert_eq!(parse_high_score(Some("-40")), 0);
        assert_eq!(parse_high_score(Some(" 1234 ")), 1234);
        assert_eq!(parse_high_score(Some("99.9")), 99);
    }

    #[test]
    fn record_only_on_strict_improvement() {
        let mut store = MemoryStore::with_value("1000");
        let same = record_total(&mut store, 1000);
        assert_eq!(same, HighScoreUpdate { high_score: 1000, new_record: false });
        assert_eq!(store.value(), Some("1000"));

        let better = record_total(&mut store, 1001);
        assert_eq!(better, HighScoreUpdate { high_score: 1001, new_record: true });
        assert_eq!(store.value(), Some("1001"));
    }

    #[test]
    fn broken_store_never_fails_the_run() {
        let mut store = Broken;
        assert_eq!(load_high_score(&store), 0);
        let update = record_total(&mut store, 10);
        assert!(update.new_record);
        assert_eq!(update.high_score, 10);
    }
}
