pub const BOOT_RECORD_VERSION: u32 = 1;
pub const SETTINGS_VERSION: u32 = 1;
pub const HIGH_SCORES_VERSION: u32 = 1;

pub const BOOT_RECORD_KEY: &str = "boot.v1";
pub const SETTINGS_KEY: &str = "settings.v1";
pub const HIGH_SCORES_KEY: &str = "scores.v1";
pub const SNAPSHOT_KEY: &str = "snapshot.v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub enum ThemeMode {
    System,
    Light,
    Dark,
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::System
    }
}

#[derive(Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct BootRecord {
    pub version: u32,
    pub last_game: Option<String>,
    pub resume_pending: bool,
}

impl Default for BootRecord {
    fn default() -> Self {
        Self {
            version: BOOT_RECORD_VERSION,
            last_game: None,
            resume_pending: false,
        }
    }
}

#[derive(Clone, Copy, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct SettingsBlob {
    pub version: u32,
    pub theme_mode: ThemeMode,
    pub sound_enabled: bool,
    pub show_debug: bool,
}

impl Default for SettingsBlob {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            theme_mode: ThemeMode::default(),
            sound_enabled: true,
            show_debug: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct HighScoreEntry {
    pub slug: String,
    pub score: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct HighScoreTable {
    pub version: u32,
    pub entries: Vec<HighScoreEntry>,
}

impl Default for HighScoreTable {
    fn default() -> Self {
        Self {
            version: HIGH_SCORES_VERSION,
            entries: Vec::new(),
        }
    }
}

impl HighScoreTable {
    pub fn best(&self, slug: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.slug == slug)
            .map(|entry| entry.score)
    }

    // Only improvements are kept; returns whether the table changed.
    pub fn record(&mut self, slug: &str, score: u64) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.slug == slug) {
            if score > entry.score {
                entry.score = score;
                return true;
            }
            return false;
        }
        self.entries.push(HighScoreEntry {
            slug: slug.to_string(),
            score,
        });
        true
    }
}
