use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::game::model::{RevealCursor, Role, Round, SpyHintLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealAdvance {
    // Cursor moved on to this player index
    NextPlayer(usize),
    // The last player has seen their card
    RoundFullyRevealed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RevealKind {
    Crewmate,
    Impostor,
    Spy,
}

/// What the spy learns besides who the impostors are
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SpyIntel {
    Word(String),
    Category(String),
    Hint(String),
    HintAndCategory { hint: String, category: String },
}

/// Semantic content of a player's card. Rendering into text is left to the
/// front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RevealContent {
    Crewmate {
        word: String,
    },
    Impostor {
        hint: String,
        // Only present when the category hint is enabled
        category: Option<String>,
    },
    Spy {
        impostor_names: Vec<String>,
        intel: SpyIntel,
    },
}

impl RevealContent {
    pub fn kind(&self) -> RevealKind {
        match self {
            RevealContent::Crewmate { .. } => RevealKind::Crewmate,
            RevealContent::Impostor { .. } => RevealKind::Impostor,
            RevealContent::Spy { .. } => RevealKind::Spy,
        }
    }
}

/// Walks the players of one round one card at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealSequencer {
    cursor: RevealCursor,
    player_count: usize,
}

impl RevealSequencer {
    pub fn new(player_count: usize) -> Self {
        Self {
            cursor: RevealCursor::default(),
            player_count,
        }
    }

    pub fn cursor(&self) -> RevealCursor {
        self.cursor
    }

    pub fn start_card(&mut self) {
        self.cursor.is_card_shown = true;
        self.cursor.has_been_viewed_this_turn = true;
    }

    pub fn end_card(&mut self) {
        self.cursor.is_card_shown = false;
    }

    pub fn advance(&mut self) -> RevealAdvance {
        self.cursor.is_card_shown = false;
        self.cursor.has_been_viewed_this_turn = false;
        if self.cursor.current_player_index + 1 >= self.player_count {
            return RevealAdvance::RoundFullyRevealed;
        }
        self.cursor.current_player_index += 1;
        RevealAdvance::NextPlayer(self.cursor.current_player_index)
    }
}

pub fn compute_content(
    round: &Round,
    cursor: &RevealCursor,
    spy_hint_level: SpyHintLevel,
) -> GameResult<RevealContent> {
    let index = cursor.current_player_index;
    let player = round.players().get(index).ok_or(GameError::NoActiveRound)?;
    let secret = round.secret_word();

    let content = match player.role {
        Role::Impostor => {
            let hints = round.troll_hints();
            let hint = if round.is_troll_round() && !hints.is_empty() {
                hints[index % hints.len()].clone()
            } else {
                secret.hint.clone()
            };
            RevealContent::Impostor {
                hint,
                category: round
                    .category_hint_enabled()
                    .then(|| round.category_name().to_string()),
            }
        }
        Role::Spy => {
            let category = round.category_name().to_string();
            let intel = match spy_hint_level {
                SpyHintLevel::Word => SpyIntel::Word(secret.word.clone()),
                SpyHintLevel::Category => SpyIntel::Category(category),
                SpyHintLevel::Hint => SpyIntel::Hint(secret.hint.clone()),
                SpyHintLevel::HintAndCategory => SpyIntel::HintAndCategory {
                    hint: secret.hint.clone(),
                    category,
                },
            };
            RevealContent::Spy {
                impostor_names: round.impostors().map(|p| p.name.clone()).collect(),
                intel,
            }
        }
        Role::Crewmate => RevealContent::Crewmate {
            word: secret.word.clone(),
        },
    };
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::model::{Player, WordItem};

    fn player(number: usize, name: &str, role: Role) -> Player {
        Player {
            number,
            name: name.to_string(),
            role,
        }
    }

    fn round(category_hint: bool) -> Round {
        Round::new(
            vec![
                player(1, "Alex", Role::Impostor),
                player(2, "Bo", Role::Spy),
                player(3, "Cy", Role::Crewmate),
            ],
            WordItem::new("Banana", "Yellow fruit"),
            "Food".to_string(),
            false,
            vec![],
            category_hint,
        )
    }

    fn at(index: usize) -> RevealCursor {
        RevealCursor {
            current_player_index: index,
            ..Default::default()
        }
    }

    #[test]
    fn test_cursor_card_flags() {
        let mut sequencer = RevealSequencer::new(3);
        sequencer.start_card();
        sequencer.start_card();
        assert_eq!(
            sequencer.cursor(),
            RevealCursor {
                current_player_index: 0,
                is_card_shown: true,
                has_been_viewed_this_turn: true,
            }
        );
        sequencer.end_card();
        assert!(!sequencer.cursor().is_card_shown);
        assert!(sequencer.cursor().has_been_viewed_this_turn);

        assert_eq!(sequencer.advance(), RevealAdvance::NextPlayer(1));
        assert_eq!(sequencer.cursor(), at(1));
    }

    #[test]
    fn test_fully_revealed_only_on_last_advance() {
        for players in 3..=20 {
            let mut sequencer = RevealSequencer::new(players);
            for call in 1..=players {
                let result = sequencer.advance();
                if call == players {
                    assert_eq!(result, RevealAdvance::RoundFullyRevealed);
                } else {
                    assert_eq!(result, RevealAdvance::NextPlayer(call));
                }
            }
        }
    }

    #[test]
    fn test_spy_hint_and_category() {
        let content = compute_content(&round(false), &at(1), SpyHintLevel::HintAndCategory).unwrap();
        assert_eq!(content.kind(), RevealKind::Spy);
        assert_eq!(
            content,
            RevealContent::Spy {
                impostor_names: vec!["Alex".to_string()],
                intel: SpyIntel::HintAndCategory {
                    hint: "Yellow fruit".to_string(),
                    category: "Food".to_string(),
                },
            }
        );
        let rendered = format!("{:?}", content);
        assert!(!rendered.contains("Banana"));
    }

    #[test]
    fn test_spy_levels() {
        let round = round(true);
        let cases = [
            (SpyHintLevel::Word, SpyIntel::Word("Banana".to_string())),
            (SpyHintLevel::Category, SpyIntel::Category("Food".to_string())),
            (SpyHintLevel::Hint, SpyIntel::Hint("Yellow fruit".to_string())),
        ];
        for (level, expected) in cases {
            match compute_content(&round, &at(1), level).unwrap() {
                RevealContent::Spy { intel, .. } => assert_eq!(intel, expected),
                other => panic!("expected spy content, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_impostor_and_crewmate_content() {
        let content = compute_content(&round(false), &at(0), SpyHintLevel::Word).unwrap();
        assert_eq!(
            content,
            RevealContent::Impostor {
                hint: "Yellow fruit".to_string(),
                category: None,
            }
        );
        let content = compute_content(&round(true), &at(0), SpyHintLevel::Word).unwrap();
        assert_eq!(
            content,
            RevealContent::Impostor {
                hint: "Yellow fruit".to_string(),
                category: Some("Food".to_string()),
            }
        );
        let content = compute_content(&round(true), &at(2), SpyHintLevel::Word).unwrap();
        assert_eq!(
            content,
            RevealContent::Crewmate {
                word: "Banana".to_string()
            }
        );
    }

    #[test]
    fn test_troll_round_uses_own_hint() {
        let troll = Round::new(
            vec![
                player(1, "A", Role::Impostor),
                player(2, "B", Role::Impostor),
                player(3, "C", Role::Impostor),
            ],
            WordItem::new("Banana", "Yellow fruit"),
            "Food".to_string(),
            true,
            vec!["Purrs".to_string(), "Barks".to_string()],
            false,
        );
        let hints: Vec<RevealContent> = (0..3)
            .map(|i| compute_content(&troll, &at(i), SpyHintLevel::Word).unwrap())
            .collect();
        let expected = ["Purrs", "Barks", "Purrs"];
        for (content, hint) in hints.iter().zip(expected) {
            assert_eq!(
                content,
                &RevealContent::Impostor {
                    hint: hint.to_string(),
                    category: None
                }
            );
        }
    }

    #[test]
    fn test_out_of_range_cursor() {
        assert_eq!(
            compute_content(&round(false), &at(7), SpyHintLevel::Word),
            Err(GameError::NoActiveRound)
        );
    }
}
