use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::GameResult;
use crate::game::model::{Language, Round};
use crate::locale;
use crate::store::ScoreStore;
use crate::utils::pick_one;

/// Each crewmate scores this when the crew catches the impostor
pub const CREW_WIN_POINTS: i32 = 1;
/// Each impostor and the spy score this when the impostor side wins
pub const IMPOSTOR_WIN_POINTS: i32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDelta {
    pub name: String,
    pub points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Punishment {
    // Label of the side that lost, e.g. "Crewmates"
    pub losers: String,
    pub task: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOutcome {
    pub crewmates_won: bool,
    // One entry per player, in seat order, zeros included
    pub deltas: Vec<ScoreDelta>,
    pub punishment: Option<Punishment>,
}

pub fn score_deltas(round: &Round, crewmates_won: bool) -> Vec<ScoreDelta> {
    round
        .players()
        .iter()
        .map(|player| {
            let points = match (crewmates_won, player.on_impostor_side()) {
                (true, false) => CREW_WIN_POINTS,
                (false, true) => IMPOSTOR_WIN_POINTS,
                _ => 0,
            };
            ScoreDelta {
                name: player.name.clone(),
                points,
            }
        })
        .collect()
}

/// Compute and apply deltas to the store in one batch. Player names are the
/// store key, so equal names in different rounds accumulate together.
pub fn award_scores(
    round: &Round,
    crewmates_won: bool,
    store: &mut impl ScoreStore,
) -> GameResult<Vec<ScoreDelta>> {
    let deltas = score_deltas(round, crewmates_won);
    let earned: Vec<ScoreDelta> = deltas.iter().filter(|d| d.points != 0).cloned().collect();
    store.apply(&earned)?;
    Ok(deltas)
}

pub fn pick_punishment(
    crewmates_won: bool,
    language: Language,
    rng: &mut impl Rng,
) -> GameResult<Punishment> {
    let strings = locale::strings(language);
    let losers = if crewmates_won {
        strings.the_impostors
    } else {
        strings.the_crewmates
    };
    Ok(Punishment {
        losers: losers.to_string(),
        task: pick_one(strings.punishments, rng)?.to_string(),
    })
}

/// Results screen for one round. Scores are applied at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryState {
    round: Round,
    punishments_enabled: bool,
    outcome: Option<ScoreOutcome>,
}

impl SummaryState {
    pub fn new(round: Round, punishments_enabled: bool) -> Self {
        Self {
            round,
            punishments_enabled,
            outcome: None,
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn punishments_enabled(&self) -> bool {
        self.punishments_enabled
    }

    pub fn scores_awarded(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&ScoreOutcome> {
        self.outcome.as_ref()
    }

    pub fn punishment(&self) -> Option<&Punishment> {
        self.outcome.as_ref().and_then(|o| o.punishment.as_ref())
    }

    /// Award scores for the declared winner. Later calls return the cached
    /// outcome without touching the store, whatever winner they pass.
    pub fn award(
        &mut self,
        crewmates_won: bool,
        language: Language,
        store: &mut impl ScoreStore,
        rng: &mut impl Rng,
    ) -> GameResult<&ScoreOutcome> {
        match self.outcome {
            Some(ref outcome) => {
                warn!("scores already awarded for this round");
                Ok(outcome)
            }
            None => {
                let deltas = award_scores(&self.round, crewmates_won, store)?;
                let punishment = if self.punishments_enabled {
                    Some(pick_punishment(crewmates_won, language, rng)?)
                } else {
                    None
                };
                info!(crewmates_won, "scores awarded");
                Ok(self.outcome.insert(ScoreOutcome {
                    crewmates_won,
                    deltas,
                    punishment,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::game::model::{Player, Role, WordItem};
    use crate::store::{InMemoryScoreStore, JsonFileScoreStore};

    fn round(roles: &[Role]) -> Round {
        let players = roles
            .iter()
            .enumerate()
            .map(|(i, role)| Player {
                number: i + 1,
                name: format!("P{}", i + 1),
                role: *role,
            })
            .collect();
        Round::new(
            players,
            WordItem::new("Banana", "Yellow fruit"),
            "Food".to_string(),
            false,
            vec![],
            false,
        )
    }

    fn five_players() -> Round {
        round(&[
            Role::Crewmate,
            Role::Impostor,
            Role::Crewmate,
            Role::Crewmate,
            Role::Crewmate,
        ])
    }

    #[test]
    fn test_crewmates_win() {
        let mut store = InMemoryScoreStore::default();
        let deltas = award_scores(&five_players(), true, &mut store).unwrap();
        let points: Vec<i32> = deltas.iter().map(|d| d.points).collect();
        assert_eq!(points, vec![1, 0, 1, 1, 1]);
        assert_eq!(store.points("P1"), 1);
        assert_eq!(store.points("P2"), 0);
        assert_eq!(store.list_all().len(), 4);
    }

    #[test]
    fn test_impostor_wins() {
        let mut store = InMemoryScoreStore::default();
        let deltas = award_scores(&five_players(), false, &mut store).unwrap();
        let points: Vec<i32> = deltas.iter().map(|d| d.points).collect();
        assert_eq!(points, vec![0, 2, 0, 0, 0]);
        assert_eq!(store.list_all(), vec![("P2".to_string(), 2)]);
    }

    #[test]
    fn test_spy_scores_with_impostors() {
        let round = round(&[Role::Impostor, Role::Spy, Role::Crewmate]);
        let deltas = score_deltas(&round, false);
        let points: Vec<i32> = deltas.iter().map(|d| d.points).collect();
        assert_eq!(points, vec![2, 2, 0]);
        let deltas = score_deltas(&round, true);
        let points: Vec<i32> = deltas.iter().map(|d| d.points).collect();
        assert_eq!(points, vec![0, 0, 1]);
    }

    #[test]
    fn test_award_is_idempotent() {
        let mut store = InMemoryScoreStore::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut summary = SummaryState::new(five_players(), true);
        assert!(!summary.scores_awarded());

        let first = summary
            .award(true, Language::En, &mut store, &mut rng)
            .unwrap()
            .clone();
        let after_first = store.list_all();
        // A different winner on the second call changes nothing
        let second = summary
            .award(false, Language::En, &mut store, &mut rng)
            .unwrap()
            .clone();

        assert!(summary.scores_awarded());
        assert_eq!(first, second);
        assert_eq!(store.list_all(), after_first);
    }

    #[test]
    fn test_failed_award_can_be_retried_once() {
        let dir = tempfile::tempdir().unwrap();
        let board = dir.path().join("board");
        let mut store = JsonFileScoreStore::open(board.join("scores.json")).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let mut summary = SummaryState::new(five_players(), false);

        assert!(summary
            .award(true, Language::En, &mut store, &mut rng)
            .is_err());
        assert!(!summary.scores_awarded());
        assert!(store.list_all().is_empty());

        std::fs::create_dir(&board).unwrap();
        summary
            .award(true, Language::En, &mut store, &mut rng)
            .unwrap();
        summary
            .award(true, Language::En, &mut store, &mut rng)
            .unwrap();
        assert!(summary.scores_awarded());
        for name in ["P1", "P3", "P4", "P5"] {
            assert_eq!(store.points(name), 1, "{}", name);
        }
        assert_eq!(store.points("P2"), 0);
    }

    #[test]
    fn test_punishment_targets_losers() {
        let mut rng = StdRng::seed_from_u64(4);
        let punishment = pick_punishment(true, Language::En, &mut rng).unwrap();
        assert_eq!(punishment.losers, "Impostor(s)");
        assert!(locale::strings(Language::En)
            .punishments
            .contains(&punishment.task.as_str()));

        let punishment = pick_punishment(false, Language::Sr, &mut rng).unwrap();
        assert_eq!(punishment.losers, "Seljane");
    }

    #[test]
    fn test_punishment_only_when_enabled() {
        let mut store = InMemoryScoreStore::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut summary = SummaryState::new(five_players(), false);
        summary
            .award(false, Language::En, &mut store, &mut rng)
            .unwrap();
        assert!(summary.punishment().is_none());

        let mut summary = SummaryState::new(five_players(), true);
        summary
            .award(false, Language::En, &mut store, &mut rng)
            .unwrap();
        assert_eq!(summary.punishment().unwrap().losers, "Crewmates");
    }
}
