//! Round assembly: turns a setup and the category catalog into a fully
//! determined round (secret word, roles, troll hints, player names).

use rand::Rng;
use tracing::debug;

use crate::error::{GameError, GameResult};
use crate::game::model::{Category, Language, Player, Role, Round, SetupConfig, WordItem};
use crate::locale;
use crate::utils::{bernoulli_trial, pick_distinct_subset, pick_one};

/// Every 10th round is a troll round when troll mode is on
pub const TROLL_ROUND_PERIOD: u32 = 10;
/// Independent chance of a troll round on any other round
pub const TROLL_ROUND_PROBABILITY: f64 = 0.1;

/// Either condition triggers a troll round, so the effective rate is a bit
/// above 10% with a guaranteed one on every 10th round.
pub fn is_troll_round(troll_mode_enabled: bool, round_number: u32, rng: &mut impl Rng) -> bool {
    troll_mode_enabled
        && (round_number % TROLL_ROUND_PERIOD == 0
            || bernoulli_trial(TROLL_ROUND_PROBABILITY, rng))
}

/// Configured name trimmed, or "Player N" in the setup language
pub fn resolve_player_name(names: &[String], number: usize, language: Language) -> String {
    let entered = names.get(number - 1).map(|n| n.trim()).unwrap_or("");
    if entered.is_empty() {
        format!("{} {}", locale::strings(language).player_label, number)
    } else {
        entered.to_string()
    }
}

/// Build a round. `round_number` is the 1-based count of games started since
/// the last new game and only matters for the troll round gate.
pub fn assemble(
    config: &SetupConfig,
    catalog: &[Category],
    round_number: u32,
    rng: &mut impl Rng,
) -> GameResult<Round> {
    let language = config.language();
    if config.selected_category_ids().is_empty() {
        return Err(GameError::NoCategorySelected);
    }

    let resolved: Vec<&Category> = catalog
        .iter()
        .filter(|c| config.selected_category_ids().contains(&c.id))
        .collect();
    if resolved.is_empty() {
        return Err(GameError::NoCategorySelected);
    }

    let playable: Vec<&Category> = resolved
        .into_iter()
        .filter(|c| c.is_playable(language))
        .collect();
    // The word pool spans every selected category, not just the displayed one
    let word_pool: Vec<&WordItem> = playable.iter().flat_map(|c| c.words(language)).collect();
    if word_pool.is_empty() {
        return Err(GameError::NoWordsAvailable);
    }

    let category_name = pick_one(&playable, rng)?.name(language).to_string();
    let secret_word = (*pick_one(&word_pool, rng)?).clone();

    let player_count = config.player_count();
    let troll_round = is_troll_round(config.troll_mode_enabled(), round_number, rng);

    let (roles, troll_hints) = if troll_round {
        let hints = (0..player_count)
            .map(|_| pick_one(&word_pool, rng).map(|w| w.hint.clone()))
            .collect::<GameResult<Vec<String>>>()?;
        (vec![Role::Impostor; player_count], hints)
    } else {
        (
            assign_roles(
                player_count,
                config.impostor_count(),
                config.spy_mode_enabled(),
                rng,
            )?,
            vec![],
        )
    };

    let players: Vec<Player> = roles
        .into_iter()
        .enumerate()
        .map(|(index, role)| Player {
            number: index + 1,
            name: resolve_player_name(config.player_names(), index + 1, language),
            role,
        })
        .collect();

    debug!(
        round_number,
        players = players.len(),
        troll_round,
        spy = players.iter().any(Player::is_spy),
        "assembled round"
    );

    Ok(Round::new(
        players,
        secret_word,
        category_name,
        troll_round,
        troll_hints,
        config.category_hint_enabled(),
    ))
}

/// Shuffle the seats; the first `impostor_count` are impostors and the next
/// one (if any) is the spy.
fn assign_roles(
    player_count: usize,
    impostor_count: usize,
    spy_mode_enabled: bool,
    rng: &mut impl Rng,
) -> GameResult<Vec<Role>> {
    let impostor_count = impostor_count.clamp(1, player_count.saturating_sub(1).max(1));
    let seats: Vec<usize> = (0..player_count).collect();
    let shuffled = pick_distinct_subset(&seats, player_count, rng)?;

    let mut roles = vec![Role::Crewmate; player_count];
    for seat in shuffled.iter().take(impostor_count) {
        roles[*seat] = Role::Impostor;
    }
    if spy_mode_enabled {
        if let Some(seat) = shuffled.get(impostor_count) {
            roles[*seat] = Role::Spy;
        }
    }
    Ok(roles)
}
