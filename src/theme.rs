//! Light/dark theme preference.
//!
//! The preference is tri-state (`light`, `dark`, `system`). What is shown is
//! the effective [`Appearance`], which resolves `system` against the host's
//! own light/dark signal. Toggling always stores an explicit choice: the
//! opposite of what is currently shown.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Stored theme choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

/// What is actually painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
}

impl ThemePreference {
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::System];

    pub const fn resolve(self, system: Appearance) -> Appearance {
        match self {
            Self::Light => Appearance::Light,
            Self::Dark => Appearance::Dark,
            Self::System => system,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme `{other}` (expected light, dark or system)")),
        }
    }
}

impl Appearance {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn as_preference(self) -> ThemePreference {
        match self {
            Self::Light => ThemePreference::Light,
            Self::Dark => ThemePreference::Dark,
        }
    }

    /// Terminal light/dark signal from `COLORFGBG` (`fg;bg`), dark when unknown.
    pub fn detect() -> Self {
        env::var("COLORFGBG")
            .ok()
            .and_then(|value| Self::from_colorfgbg(&value))
            .unwrap_or(Self::Dark)
    }

    fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        // ANSI 7 (white) and the bright range 9..=15 are light backgrounds
        Some(if bg == 7 || (9..=15).contains(&bg) {
            Self::Light
        } else {
            Self::Dark
        })
    }
}

// ============================================================================
// Persistence
// ============================================================================

/// Where the preference survives between sessions.
pub trait ThemeStore {
    fn load(&self) -> Result<Option<ThemePreference>>;
    fn save(&mut self, preference: ThemePreference) -> Result<()>;
}

/// Preference kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    value: Option<ThemePreference>,
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<ThemePreference>> {
        Ok(self.value)
    }

    fn save(&mut self, preference: ThemePreference) -> Result<()> {
        self.value = Some(preference);
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct StoredTheme {
    theme: ThemePreference,
}

/// Preference persisted as `{"theme": "dark"}` in a JSON file.
#[derive(Debug)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    /// Directory under the site root holding local state.
    pub const STATE_DIR: &'static str = ".folio";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<root>/.folio/theme.json`
    pub fn in_root(root: &Path) -> Self {
        Self::new(root.join(Self::STATE_DIR).join("theme.json"))
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<ThemePreference>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        // A corrupt file is treated as "no preference"
        Ok(serde_json::from_str::<StoredTheme>(&content)
            .ok()
            .map(|stored| stored.theme))
    }

    fn save(&mut self, preference: ThemePreference) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string(&StoredTheme { theme: preference })?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

// ============================================================================
// Theme State
// ============================================================================

/// Owned theme state with a single update entry point ([`toggle`](Self::toggle)).
pub struct ThemeState<S: ThemeStore> {
    store: S,
    preference: ThemePreference,
}

impl<S: ThemeStore> ThemeState<S> {
    /// Load the stored preference, falling back to `default`.
    pub fn load(store: S, default: ThemePreference) -> Result<Self> {
        let preference = store.load()?.unwrap_or(default);
        Ok(Self { store, preference })
    }

    pub const fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub const fn effective(&self, system: Appearance) -> Appearance {
        self.preference.resolve(system)
    }

    /// Store the explicit opposite of the current appearance and return it.
    pub fn toggle(&mut self, system: Appearance) -> Result<Appearance> {
        let next = self.effective(system).opposite();
        self.set(next.as_preference())?;
        Ok(next)
    }

    pub fn set(&mut self, preference: ThemePreference) -> Result<()> {
        self.store.save(preference)?;
        self.preference = preference;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve() {
        assert_eq!(ThemePreference::Light.resolve(Appearance::Dark), Appearance::Light);
        assert_eq!(ThemePreference::Dark.resolve(Appearance::Light), Appearance::Dark);
        assert_eq!(ThemePreference::System.resolve(Appearance::Light), Appearance::Light);
        assert_eq!(ThemePreference::System.resolve(Appearance::Dark), Appearance::Dark);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Dark".parse::<ThemePreference>(), Ok(ThemePreference::Dark));
        assert_eq!(" system ".parse::<ThemePreference>(), Ok(ThemePreference::System));
        assert!("sepia".parse::<ThemePreference>().is_err());
    }

    #[test]
    fn test_toggle_from_system_writes_explicit_choice() {
        let mut state = ThemeState::load(MemoryThemeStore::default(), ThemePreference::System).unwrap();
        assert_eq!(state.effective(Appearance::Dark), Appearance::Dark);

        let shown = state.toggle(Appearance::Dark).unwrap();
        assert_eq!(shown, Appearance::Light);
        assert_eq!(state.preference(), ThemePreference::Light);

        // explicit choice no longer follows the system
        assert_eq!(state.effective(Appearance::Dark), Appearance::Light);
        state.toggle(Appearance::Light).unwrap();
        assert_eq!(state.preference(), ThemePreference::Dark);
    }

    #[test]
    fn test_stored_preference_wins_over_default() {
        let mut store = MemoryThemeStore::default();
        store.save(ThemePreference::Light).unwrap();
        let state = ThemeState::load(store, ThemePreference::Dark).unwrap();
        assert_eq!(state.preference(), ThemePreference::Light);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = FileThemeStore::in_root(dir.path());
        assert_eq!(store.load().unwrap(), None);

        store.save(ThemePreference::Dark).unwrap();
        let reopened = FileThemeStore::in_root(dir.path());
        assert_eq!(reopened.load().unwrap(), Some(ThemePreference::Dark));

        let raw = fs::read_to_string(dir.path().join(".folio/theme.json")).unwrap();
        assert_eq!(raw, r#"{"theme":"dark"}"#);
    }

    #[test]
    fn test_file_store_ignores_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("theme.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(FileThemeStore::new(&path).load().unwrap(), None);
    }

    #[test]
    fn test_colorfgbg() {
        assert_eq!(Appearance::from_colorfgbg("15;0"), Some(Appearance::Dark));
        assert_eq!(Appearance::from_colorfgbg("0;15"), Some(Appearance::Light));
        assert_eq!(Appearance::from_colorfgbg("0;default;7"), Some(Appearance::Light));
        assert_eq!(Appearance::from_colorfgbg("garbage"), None);
    }
}
