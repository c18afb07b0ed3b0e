use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

const HISTORY_DIR: &str = "chat_histories";
const GLOBAL_HISTORY_FILE: &str = "history.json";

/// Artificial reply latency, sampled uniformly from `min_ms..=max_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Pacing {
    pub const fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    pub fn is_instant(&self) -> bool {
        self.max_ms == 0
    }

    /// The sampling range, tolerating a reversed configuration.
    pub fn range_ms(&self) -> RangeInclusive<u64> {
        self.min_ms.min(self.max_ms)..=self.max_ms.max(self.min_ms)
    }

    pub fn clamp(&self, ms: u64) -> Duration {
        let range = self.range_ms();
        Duration::from_millis(ms.clamp(*range.start(), *range.end()))
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            min_ms: 1000,
            max_ms: 2000,
        }
    }
}

/// Runtime settings for a chat process.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Directory holding one `<user>_history.json` per user.
    pub history_dir: PathBuf,
    /// The transcript shared by all users.
    pub global_history_path: PathBuf,
    /// Chance per turn of answering with a disconnection notice.
    pub disconnect_probability: f64,
    pub reply_delay: Pacing,
}

impl ChatSettings {
    /// Settings rooted at `dir`: `<dir>/chat_histories/` and `<dir>/history.json`.
    pub fn with_data_dir(dir: &Path) -> Self {
        Self {
            history_dir: dir.join(HISTORY_DIR),
            global_history_path: dir.join(GLOBAL_HISTORY_FILE),
            ..Self::default()
        }
    }

    pub fn without_delay(mut self) -> Self {
        self.reply_delay = Pacing::none();
        self
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            history_dir: PathBuf::from(HISTORY_DIR),
            global_history_path: PathBuf::from(GLOBAL_HISTORY_FILE),
            disconnect_probability: 0.1,
            reply_delay: Pacing::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_layout() {
        let settings = ChatSettings::with_data_dir(Path::new("/srv/chat"));
        assert_eq!(settings.history_dir, Path::new("/srv/chat/chat_histories"));
        assert_eq!(settings.global_history_path, Path::new("/srv/chat/history.json"));
        assert!((settings.disconnect_probability - 0.1).abs() < f64::EPSILON);
        assert_eq!(settings.reply_delay, Pacing::default());
    }

    #[test]
    fn test_pacing_range() {
        let reversed = Pacing {
            min_ms: 2000,
            max_ms: 1000,
        };
        assert_eq!(reversed.range_ms(), 1000..=2000);
        assert_eq!(reversed.clamp(5000), Duration::from_millis(2000));
        assert!(ChatSettings::default().without_delay().reply_delay.is_instant());
    }
}
