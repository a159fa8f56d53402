//! The round lifecycle: Setup -> RoleReveal -> Discussion -> Summary, with
//! play again (Summary -> RoleReveal on the last setup) and new game
//! (anything -> Setup, round counter cleared).

use std::fmt::{Display, Formatter, Result as FmtResult};

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::catalog::CategoryCatalog;
use crate::error::{GameError, GameResult, ValidationKind};
use crate::game::model::{
    Category, DiscussionState, Language, RevealCursor, Round, SetupConfig, MIN_PLAYERS,
};
use crate::game::reveal::{compute_content, RevealAdvance, RevealContent, RevealSequencer};
use crate::game::round::assemble;
use crate::game::scoring::{ScoreOutcome, SummaryState};
use crate::game::timer::DiscussionTimer;
use crate::store::ScoreStore;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    Setup,
    RoleReveal,
    Discussion,
    Summary,
}

impl Display for PhaseKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PhaseKind::Setup => write!(f, "setup"),
            PhaseKind::RoleReveal => write!(f, "role reveal"),
            PhaseKind::Discussion => write!(f, "discussion"),
            PhaseKind::Summary => write!(f, "summary"),
        }
    }
}

#[derive(Debug)]
pub struct RoleRevealPhase {
    pub round: Round,
    pub sequencer: RevealSequencer,
}

#[derive(Debug)]
pub struct DiscussionPhase {
    pub round: Round,
    pub timer: DiscussionTimer,
}

#[derive(Debug)]
pub enum Phase {
    Setup,
    RoleReveal(RoleRevealPhase),
    Discussion(DiscussionPhase),
    Summary(SummaryState),
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Setup => PhaseKind::Setup,
            Phase::RoleReveal(_) => PhaseKind::RoleReveal,
            Phase::Discussion(_) => PhaseKind::Discussion,
            Phase::Summary(_) => PhaseKind::Summary,
        }
    }

    pub fn round(&self) -> Option<&Round> {
        match self {
            Phase::Setup => None,
            Phase::RoleReveal(reveal) => Some(&reveal.round),
            Phase::Discussion(discussion) => Some(&discussion.round),
            Phase::Summary(summary) => Some(summary.round()),
        }
    }
}

/// Single owner of all mutable game state. Every command runs to
/// completion before the next; the only concurrent activity is the
/// discussion countdown.
pub struct Game<C, S> {
    // Current setup, which is also what play again reuses
    setup: SetupConfig,
    phase: Phase,
    // Games started since the last new game, drives the troll round gate
    round_counter: u32,
    catalog: C,
    categories: Vec<Category>,
    scores: S,
    rng: StdRng,
}

impl<C: CategoryCatalog, S: ScoreStore> Game<C, S> {
    pub fn new(catalog: C, scores: S) -> Self {
        Self::with_rng(catalog, scores, StdRng::from_entropy())
    }

    /// Deterministic game for tests and replays
    pub fn with_seed(catalog: C, scores: S, seed: u64) -> Self {
        Self::with_rng(catalog, scores, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: C, scores: S, rng: StdRng) -> Self {
        let categories = catalog.list_categories();
        Self {
            setup: SetupConfig::default(),
            phase: Phase::Setup,
            round_counter: 0,
            catalog,
            categories,
            scores,
            rng,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn round(&self) -> Option<&Round> {
        self.phase.round()
    }

    pub fn round_counter(&self) -> u32 {
        self.round_counter
    }

    pub fn setup(&self) -> &SetupConfig {
        &self.setup
    }

    fn wrong_phase(&self, expected: PhaseKind) -> GameError {
        GameError::WrongPhase {
            expected,
            actual: self.phase_kind(),
        }
    }

    /// Setup can only be edited on the setup screen
    pub fn setup_mut(&mut self) -> GameResult<&mut SetupConfig> {
        match self.phase {
            Phase::Setup => Ok(&mut self.setup),
            _ => Err(self.wrong_phase(PhaseKind::Setup)),
        }
    }

    /// Replace the whole setup, e.g. one loaded from disk
    pub fn load_setup(&mut self, setup: SetupConfig) -> GameResult<()> {
        *self.setup_mut()? = setup.normalized();
        Ok(())
    }

    /// Language can change from any screen. A round in progress keeps the
    /// words it was dealt; the next round uses the new language.
    pub fn set_language(&mut self, language: Language) {
        self.setup.set_language(language);
        debug!(language = language.code(), "language changed");
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Call `reload_categories` after editing custom decks through this
    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    pub fn reload_categories(&mut self) {
        self.categories = self.catalog.list_categories();
        debug!(categories = self.categories.len(), "categories reloaded");
    }

    pub fn select_all_categories(&mut self) -> GameResult<()> {
        let ids: Vec<String> = self.categories.iter().map(|c| c.id.clone()).collect();
        self.setup_mut()?.select_categories(ids);
        Ok(())
    }

    pub fn scores(&self) -> Vec<(String, i32)> {
        self.scores.list_all()
    }

    pub fn score_store(&self) -> &S {
        &self.scores
    }

    pub fn clear_scores(&mut self) -> GameResult<()> {
        info!("clearing leaderboard");
        self.scores.clear()
    }

    fn validate_setup(&self) -> GameResult<()> {
        if self.setup.selected_category_ids().is_empty() {
            return Err(GameError::Validation(ValidationKind::NoCategorySelected));
        }
        if self.setup.player_count() < MIN_PLAYERS {
            return Err(GameError::Validation(ValidationKind::TooFewPlayers));
        }
        Ok(())
    }

    /// Build a round from the current setup and enter role reveal. On any
    /// failure nothing changes.
    fn begin_round(&mut self) -> GameResult<()> {
        self.validate_setup()?;
        let round_number = self.round_counter + 1;
        let round = assemble(&self.setup, &self.categories, round_number, &mut self.rng)?;
        self.round_counter = round_number;
        info!(
            round_number,
            players = round.players().len(),
            "round started"
        );
        let sequencer = RevealSequencer::new(round.players().len());
        self.phase = Phase::RoleReveal(RoleRevealPhase { round, sequencer });
        Ok(())
    }

    pub fn start_game(&mut self) -> GameResult<()> {
        if !matches!(self.phase, Phase::Setup) {
            return Err(self.wrong_phase(PhaseKind::Setup));
        }
        self.begin_round()
    }

    fn reveal_phase(&mut self) -> GameResult<&mut RoleRevealPhase> {
        let actual = self.phase_kind();
        match &mut self.phase {
            Phase::RoleReveal(reveal) => Ok(reveal),
            _ => Err(GameError::WrongPhase {
                expected: PhaseKind::RoleReveal,
                actual,
            }),
        }
    }

    pub fn reveal_cursor(&self) -> GameResult<RevealCursor> {
        match &self.phase {
            Phase::RoleReveal(reveal) => Ok(reveal.sequencer.cursor()),
            _ => Err(GameError::NoActiveRound),
        }
    }

    pub fn start_card(&mut self) -> GameResult<()> {
        self.reveal_phase()?.sequencer.start_card();
        Ok(())
    }

    pub fn end_card(&mut self) -> GameResult<()> {
        self.reveal_phase()?.sequencer.end_card();
        Ok(())
    }

    /// Hand the device to the next player, or move on to the discussion
    /// once the last player has seen their card
    pub fn advance(&mut self) -> GameResult<PhaseKind> {
        let reveal = self.reveal_phase()?;
        match reveal.sequencer.advance() {
            RevealAdvance::NextPlayer(index) => {
                debug!(index, "next player");
                Ok(PhaseKind::RoleReveal)
            }
            RevealAdvance::RoundFullyRevealed => {
                let round = reveal.round.clone();
                let timer = DiscussionTimer::new(
                    self.setup.timer_enabled(),
                    self.setup.timer_seconds(),
                );
                self.phase = Phase::Discussion(DiscussionPhase { round, timer });
                info!("all roles revealed, discussion started");
                Ok(PhaseKind::Discussion)
            }
        }
    }

    /// Content of the card for the player currently holding the device
    pub fn reveal_content(&self) -> GameResult<RevealContent> {
        match &self.phase {
            Phase::RoleReveal(reveal) => compute_content(
                &reveal.round,
                &reveal.sequencer.cursor(),
                self.setup.spy_hint_level(),
            ),
            _ => Err(GameError::NoActiveRound),
        }
    }

    fn discussion_phase(&mut self) -> GameResult<&mut DiscussionPhase> {
        let actual = self.phase_kind();
        match &mut self.phase {
            Phase::Discussion(discussion) => Ok(discussion),
            _ => Err(GameError::WrongPhase {
                expected: PhaseKind::Discussion,
                actual,
            }),
        }
    }

    /// Start (or resume after a cancel) the countdown from the seconds left.
    /// Needs a tokio runtime.
    pub fn start_timer(&mut self) -> GameResult<()> {
        let discussion = self.discussion_phase()?;
        let remaining = discussion.timer.state().seconds_remaining;
        discussion.timer.start(remaining)
    }

    pub fn cancel_timer(&mut self) -> GameResult<()> {
        self.discussion_phase()?.timer.cancel();
        Ok(())
    }

    pub fn discussion_state(&self) -> GameResult<DiscussionState> {
        match &self.phase {
            Phase::Discussion(discussion) => Ok(discussion.timer.state()),
            _ => Err(GameError::NoActiveRound),
        }
    }

    pub fn subscribe_timer(&self) -> GameResult<watch::Receiver<DiscussionState>> {
        match &self.phase {
            Phase::Discussion(discussion) => Ok(discussion.timer.subscribe()),
            _ => Err(GameError::NoActiveRound),
        }
    }

    /// Confirmed "reveal impostor": stop the timer and show the results
    pub fn reveal_impostor(&mut self) -> GameResult<()> {
        let discussion = self.discussion_phase()?;
        discussion.timer.cancel();
        let round = discussion.round.clone();
        self.phase = Phase::Summary(SummaryState::new(
            round,
            self.setup.punishments_enabled(),
        ));
        info!("impostor revealed");
        Ok(())
    }

    /// Apply the round's points once. Repeated calls return the first outcome.
    pub fn award_scores(&mut self, crewmates_won: bool) -> GameResult<ScoreOutcome> {
        let language = self.setup.language();
        let actual = self.phase_kind();
        match &mut self.phase {
            Phase::Summary(summary) => summary
                .award(crewmates_won, language, &mut self.scores, &mut self.rng)
                .cloned(),
            _ => Err(GameError::WrongPhase {
                expected: PhaseKind::Summary,
                actual,
            }),
        }
    }

    pub fn summary(&self) -> GameResult<&SummaryState> {
        match &self.phase {
            Phase::Summary(summary) => Ok(summary),
            _ => Err(GameError::NoActiveRound),
        }
    }

    /// New round from the last used setup, skipping the setup screen. If
    /// the round cannot be built the summary stays.
    pub fn play_again(&mut self) -> GameResult<()> {
        if !matches!(self.phase, Phase::Summary(_)) {
            return Err(self.wrong_phase(PhaseKind::Summary));
        }
        self.begin_round()
    }

    /// Back to the setup screen with the current settings kept
    pub fn reset_to_setup(&mut self) {
        self.phase = Phase::Setup;
        debug!("returned to setup");
    }

    /// Full reset: the round and any timer are dropped, the round counter is
    /// cleared and the setup goes back to defaults in the same language
    pub fn new_game(&mut self) {
        self.phase = Phase::Setup;
        self.round_counter = 0;
        self.setup = SetupConfig::new(self.setup.language());
        info!("new game");
    }
}
