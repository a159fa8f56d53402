use std::collections::{BTreeSet, HashMap};

use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 20;
pub const MIN_TIMER_SECONDS: u32 = 30;
pub const MAX_TIMER_SECONDS: u32 = 600;
pub const DEFAULT_TIMER_SECONDS: u32 = 120;
const DEFAULT_PLAYER_COUNT: usize = 4;

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, Sequence, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "camelCase")]
pub enum Language {
    #[default]
    En,
    Sr,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Sr => "sr",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        enum_iterator::all::<Language>().find(|l| l.code().eq_ignore_ascii_case(code))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct WordItem {
    // What crewmates see
    pub word: String,
    // Vague clue impostors see
    pub hint: String,
}

impl WordItem {
    pub fn new(word: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            hint: hint.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub localized_names: HashMap<Language, String>,
    pub localized_words: HashMap<Language, Vec<WordItem>>,
}

impl Category {
    /// Name shown for the category, falling back to the id when untranslated
    pub fn name(&self, language: Language) -> &str {
        self.localized_names
            .get(&language)
            .map(String::as_str)
            .unwrap_or(&self.id)
    }

    pub fn words(&self, language: Language) -> &[WordItem] {
        self.localized_words
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_playable(&self, language: Language) -> bool {
        !self.words(language).is_empty()
    }
}

/// How much the spy learns on top of the impostors' identities
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, Sequence, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpyHintLevel {
    #[default]
    Word,
    Category,
    Hint,
    HintAndCategory,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Crewmate,
    Impostor,
    Spy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    // 1-based seat number, stable for the round
    pub number: usize,
    pub name: String,
    pub role: Role,
}

impl Player {
    pub fn is_impostor(&self) -> bool {
        self.role == Role::Impostor
    }

    pub fn is_spy(&self) -> bool {
        self.role == Role::Spy
    }

    /// Spies win and lose with the impostors
    pub fn on_impostor_side(&self) -> bool {
        matches!(self.role, Role::Impostor | Role::Spy)
    }
}

/// Everything configured before a round starts. Fields are only changed
/// through the setters, and deserializing goes through `normalized`, so
/// `impostor_count <= player_count - 1` always holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", from = "RawSetupConfig")]
pub struct SetupConfig {
    player_count: usize,
    impostor_count: usize,
    // Blank entries get "Player N" when the round starts
    player_names: Vec<String>,
    selected_category_ids: BTreeSet<String>,
    troll_mode_enabled: bool,
    spy_mode_enabled: bool,
    spy_hint_level: SpyHintLevel,
    punishments_enabled: bool,
    // Impostors also see the category name
    category_hint_enabled: bool,
    timer_enabled: bool,
    timer_seconds: u32,
    language: Language,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            player_count: DEFAULT_PLAYER_COUNT,
            impostor_count: 1,
            player_names: vec![String::new(); DEFAULT_PLAYER_COUNT],
            selected_category_ids: BTreeSet::new(),
            troll_mode_enabled: false,
            spy_mode_enabled: false,
            spy_hint_level: SpyHintLevel::Word,
            punishments_enabled: false,
            category_hint_enabled: false,
            timer_enabled: true,
            timer_seconds: DEFAULT_TIMER_SECONDS,
            language: Language::En,
        }
    }
}

// Setup as written on disk, before any clamping
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSetupConfig {
    player_count: usize,
    impostor_count: usize,
    player_names: Vec<String>,
    selected_category_ids: BTreeSet<String>,
    troll_mode_enabled: bool,
    spy_mode_enabled: bool,
    spy_hint_level: SpyHintLevel,
    punishments_enabled: bool,
    category_hint_enabled: bool,
    timer_enabled: bool,
    timer_seconds: u32,
    language: Language,
}

impl Default for RawSetupConfig {
    fn default() -> Self {
        let setup = SetupConfig::default();
        Self {
            player_count: setup.player_count,
            impostor_count: setup.impostor_count,
            player_names: setup.player_names,
            selected_category_ids: setup.selected_category_ids,
            troll_mode_enabled: setup.troll_mode_enabled,
            spy_mode_enabled: setup.spy_mode_enabled,
            spy_hint_level: setup.spy_hint_level,
            punishments_enabled: setup.punishments_enabled,
            category_hint_enabled: setup.category_hint_enabled,
            timer_enabled: setup.timer_enabled,
            timer_seconds: setup.timer_seconds,
            language: setup.language,
        }
    }
}

impl From<RawSetupConfig> for SetupConfig {
    fn from(raw: RawSetupConfig) -> Self {
        SetupConfig {
            player_count: raw.player_count,
            impostor_count: raw.impostor_count,
            player_names: raw.player_names,
            selected_category_ids: raw.selected_category_ids,
            troll_mode_enabled: raw.troll_mode_enabled,
            spy_mode_enabled: raw.spy_mode_enabled,
            spy_hint_level: raw.spy_hint_level,
            punishments_enabled: raw.punishments_enabled,
            category_hint_enabled: raw.category_hint_enabled,
            timer_enabled: raw.timer_enabled,
            timer_seconds: raw.timer_seconds,
            language: raw.language,
        }
        .normalized()
    }
}

impl SetupConfig {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    /// Re-apply every clamp
    pub fn normalized(mut self) -> Self {
        let impostors = self.impostor_count;
        self.set_player_count(self.player_count);
        self.set_impostor_count(impostors);
        self.set_timer_seconds(self.timer_seconds);
        self
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn impostor_count(&self) -> usize {
        self.impostor_count
    }

    pub fn player_names(&self) -> &[String] {
        &self.player_names
    }

    pub fn selected_category_ids(&self) -> &BTreeSet<String> {
        &self.selected_category_ids
    }

    pub fn troll_mode_enabled(&self) -> bool {
        self.troll_mode_enabled
    }

    pub fn spy_mode_enabled(&self) -> bool {
        self.spy_mode_enabled
    }

    pub fn spy_hint_level(&self) -> SpyHintLevel {
        self.spy_hint_level
    }

    pub fn punishments_enabled(&self) -> bool {
        self.punishments_enabled
    }

    pub fn category_hint_enabled(&self) -> bool {
        self.category_hint_enabled
    }

    pub fn timer_enabled(&self) -> bool {
        self.timer_enabled
    }

    pub fn timer_seconds(&self) -> u32 {
        self.timer_seconds
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn max_impostors(&self) -> usize {
        self.player_count.saturating_sub(1).max(1)
    }

    /// Clamps to 3..=20, resizes the name list keeping existing entries and
    /// pulls the impostor count down if needed
    pub fn set_player_count(&mut self, count: usize) {
        self.player_count = count.clamp(MIN_PLAYERS, MAX_PLAYERS);
        self.player_names.resize(self.player_count, String::new());
        self.impostor_count = self.impostor_count.clamp(1, self.max_impostors());
    }

    pub fn set_impostor_count(&mut self, count: usize) {
        self.impostor_count = count.clamp(1, self.max_impostors());
    }

    /// Out of range indexes are ignored
    pub fn set_player_name(&mut self, index: usize, name: impl Into<String>) {
        if let Some(slot) = self.player_names.get_mut(index) {
            *slot = name.into();
        }
    }

    pub fn toggle_category(&mut self, category_id: &str) {
        if !self.selected_category_ids.remove(category_id) {
            self.selected_category_ids.insert(category_id.to_string());
        }
    }

    pub fn select_categories<I, S>(&mut self, category_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_category_ids = category_ids.into_iter().map(Into::into).collect();
    }

    pub fn deselect_all_categories(&mut self) {
        self.selected_category_ids.clear();
    }

    pub fn set_troll_mode(&mut self, enabled: bool) {
        self.troll_mode_enabled = enabled;
    }

    pub fn set_spy_mode(&mut self, enabled: bool) {
        self.spy_mode_enabled = enabled;
    }

    pub fn set_spy_hint_level(&mut self, level: SpyHintLevel) {
        self.spy_hint_level = level;
    }

    pub fn set_punishments_enabled(&mut self, enabled: bool) {
        self.punishments_enabled = enabled;
    }

    pub fn set_category_hint(&mut self, enabled: bool) {
        self.category_hint_enabled = enabled;
    }

    pub fn set_timer_enabled(&mut self, enabled: bool) {
        self.timer_enabled = enabled;
    }

    pub fn set_timer_seconds(&mut self, seconds: u32) {
        self.timer_seconds = seconds.clamp(MIN_TIMER_SECONDS, MAX_TIMER_SECONDS);
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }
}

/// A fully resolved round. Never mutated once assembled; each phase reads
/// from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    players: Vec<Player>,
    secret_word: WordItem,
    category_name: String,
    is_troll_round: bool,
    // Parallel to players, empty unless this is a troll round
    troll_hints: Vec<String>,
    category_hint_enabled: bool,
}

impl Round {
    pub(crate) fn new(
        players: Vec<Player>,
        secret_word: WordItem,
        category_name: String,
        is_troll_round: bool,
        troll_hints: Vec<String>,
        category_hint_enabled: bool,
    ) -> Self {
        Self {
            players,
            secret_word,
            category_name,
            is_troll_round,
            troll_hints,
            category_hint_enabled,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn secret_word(&self) -> &WordItem {
        &self.secret_word
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    pub fn is_troll_round(&self) -> bool {
        self.is_troll_round
    }

    pub fn troll_hints(&self) -> &[String] {
        &self.troll_hints
    }

    pub fn category_hint_enabled(&self) -> bool {
        self.category_hint_enabled
    }

    pub fn impostors(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_impostor())
    }

    pub fn spy(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_spy())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RevealCursor {
    pub current_player_index: usize,
    // Card currently held open
    pub is_card_shown: bool,
    // Card was opened at least once for the current player
    pub has_been_viewed_this_turn: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionState {
    pub timer_enabled: bool,
    pub seconds_remaining: u32,
    pub is_running: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impostor_count_clamp() {
        let mut setup = SetupConfig::default();
        setup.set_player_count(4);
        setup.set_impostor_count(10);
        assert_eq!(setup.impostor_count(), 3);

        setup.set_player_count(3);
        assert!(setup.impostor_count() <= 2);
        assert_eq!(setup.impostor_count(), 2);

        setup.set_impostor_count(0);
        assert_eq!(setup.impostor_count(), 1);
    }

    #[test]
    fn test_player_count_clamp_and_names() {
        let mut setup = SetupConfig::default();
        setup.set_player_name(0, "Alex");
        setup.set_player_name(3, "Sam");
        setup.set_player_count(2);
        assert_eq!(setup.player_count(), MIN_PLAYERS);
        assert_eq!(setup.player_names(), &["Alex", "", ""]);

        setup.set_player_count(50);
        assert_eq!(setup.player_count(), MAX_PLAYERS);
        assert_eq!(setup.player_names().len(), MAX_PLAYERS);
        assert_eq!(setup.player_names()[0], "Alex");

        // Ignored
        setup.set_player_name(25, "Nobody");
        assert_eq!(setup.player_names().len(), MAX_PLAYERS);
    }

    #[test]
    fn test_timer_seconds_clamp() {
        let mut setup = SetupConfig::default();
        setup.set_timer_seconds(5);
        assert_eq!(setup.timer_seconds(), MIN_TIMER_SECONDS);
        setup.set_timer_seconds(10_000);
        assert_eq!(setup.timer_seconds(), MAX_TIMER_SECONDS);
        setup.set_timer_seconds(90);
        assert_eq!(setup.timer_seconds(), 90);
    }

    #[test]
    fn test_toggle_category() {
        let mut setup = SetupConfig::default();
        setup.toggle_category("animals");
        setup.toggle_category("food");
        assert_eq!(setup.selected_category_ids().len(), 2);
        setup.toggle_category("animals");
        assert!(setup.selected_category_ids().contains("food"));
        assert!(!setup.selected_category_ids().contains("animals"));
        setup.deselect_all_categories();
        assert!(setup.selected_category_ids().is_empty());
    }

    #[test]
    fn test_deserialized_config_is_clamped() {
        let json = r#"{"playerCount": 4, "impostorCount": 9, "timerSeconds": 1, "playerNames": ["A"]}"#;
        let setup: SetupConfig = serde_json::from_str(json).unwrap();
        assert_eq!(setup.clone().normalized(), setup);
        assert_eq!(setup.impostor_count(), 3);
        assert_eq!(setup.timer_seconds(), MIN_TIMER_SECONDS);
        assert_eq!(setup.player_names().len(), 4);
        assert!(setup.timer_enabled());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("SR"), Some(Language::Sr));
        assert_eq!(Language::from_code("en"), Some(Language::En));
        assert_eq!(Language::from_code("de"), None);
    }
}
