//! Localized text. The engine itself only needs the player label, the
//! losing side labels and the punishment list; the rest is used by the
//! terminal front end to render the structured results.

use crate::game::Language;

pub struct Strings {
    pub player_label: &'static str,
    pub the_crewmates: &'static str,
    pub the_impostors: &'static str,
    pub punishment_for: &'static str,
    pub punishments: &'static [&'static str],
    pub pass_device_to: &'static str,
    pub press_enter_to_reveal: &'static str,
    pub press_enter_to_hide: &'static str,
    pub you_are_crewmate: &'static str,
    pub you_are_impostor: &'static str,
    pub you_are_spy: &'static str,
    pub the_word_is: &'static str,
    pub hint_label: &'static str,
    pub category_label: &'static str,
    pub impostors_are: &'static str,
    pub discussion: &'static str,
    pub seconds_left: &'static str,
    pub times_up: &'static str,
    pub press_enter_to_reveal_impostor: &'static str,
    pub troll_round: &'static str,
    pub did_crewmates_win: &'static str,
    pub leaderboard: &'static str,
    pub points: &'static str,
    pub next_action: &'static str,
}

static EN: Strings = Strings {
    player_label: "Player",
    the_crewmates: "Crewmates",
    the_impostors: "Impostor(s)",
    punishment_for: "Punishment for",
    punishments: &[
        "Drink a full glass of water in one go.",
        "The winners pick the next song.",
        "Talk with a silly accent until the next round.",
        "Tell an embarrassing story about yourself.",
        "Dance like nobody is watching for 15 seconds.",
        "Act like a chicken until the next round starts.",
        "Give a sincere compliment to the person on your left.",
        "Speak only in questions for the next round.",
    ],
    pass_device_to: "Pass the device to",
    press_enter_to_reveal: "Press Enter to see your card",
    press_enter_to_hide: "Press Enter to hide your card",
    you_are_crewmate: "You are a crewmate",
    you_are_impostor: "You are the IMPOSTOR!",
    you_are_spy: "You are the SPY!",
    the_word_is: "The word is:",
    hint_label: "Hint:",
    category_label: "Category:",
    impostors_are: "The impostor is:",
    discussion: "Discuss! Who is the impostor?",
    seconds_left: "seconds left",
    times_up: "Time's up!",
    press_enter_to_reveal_impostor: "Press Enter to reveal the impostor",
    troll_round: "TROLL ROUND! Everyone was an impostor!",
    did_crewmates_win: "Did the crewmates win? [y/n]",
    leaderboard: "Leaderboard",
    points: "pts",
    next_action: "[p]lay again, [n]ew game or [q]uit?",
};

static SR: Strings = Strings {
    player_label: "Igrač",
    the_crewmates: "Seljane",
    the_impostors: "Impostora",
    punishment_for: "Kazna za",
    punishments: &[
        "Popij punu čašu vode na eks.",
        "Pobednici biraju sledeću pesmu.",
        "Pričaj sa smešnim akcentom do sledeće runde.",
        "Ispričaj jednu blamantnu priču o sebi.",
        "Pleši 15 sekundi kao da te niko ne gleda.",
        "Ponašaj se kao kokoška dok ne počne nova runda.",
        "Daj iskren kompliment osobi sa tvoje leve strane.",
        "Sledeću rundu pričaj samo u pitanjima.",
    ],
    pass_device_to: "Dodaj uređaj igraču",
    press_enter_to_reveal: "Pritisni Enter da vidiš kartu",
    press_enter_to_hide: "Pritisni Enter da sakriješ kartu",
    you_are_crewmate: "Ti si seljanin",
    you_are_impostor: "Ti si IMPOSTOR!",
    you_are_spy: "Ti si ŠPIJUN!",
    the_word_is: "Reč je:",
    hint_label: "Hint:",
    category_label: "Kategorija:",
    impostors_are: "Impostor je:",
    discussion: "Diskutujte! Ko je impostor?",
    seconds_left: "sekundi preostalo",
    times_up: "Vreme je isteklo!",
    press_enter_to_reveal_impostor: "Pritisni Enter da otkriješ impostora",
    troll_round: "TROLL RUNDA! Svi su bili impostori!",
    did_crewmates_win: "Da li su seljani pobedili? [y/n]",
    leaderboard: "Tabela",
    points: "poena",
    next_action: "[p] igraj ponovo, [n] nova igra ili [q] izlaz?",
};

pub fn strings(language: Language) -> &'static Strings {
    match language {
        Language::En => &EN,
        Language::Sr => &SR,
    }
}

#[cfg(test)]
mod tests {
    use enum_iterator::all;

    use super::*;

    #[test]
    fn test_every_language_has_punishments() {
        for language in all::<Language>() {
            assert!(!strings(language).punishments.is_empty());
            assert!(!strings(language).player_label.is_empty());
        }
    }
}
