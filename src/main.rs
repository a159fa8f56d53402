use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use impostor_rs::catalog::{
    BuiltInCatalog, CategoryCatalog, CustomCategory, CustomCategoryStore, JsonFileCategoryStore,
    MergedCatalog,
};
use impostor_rs::game::{
    Game, Language, PhaseKind, RevealContent, SetupConfig, SpyHintLevel, SpyIntel,
};
use impostor_rs::locale::{strings, Strings};
use impostor_rs::store::JsonFileScoreStore;
use impostor_rs::telemetry::init_tracing;

type Catalog = MergedCatalog<BuiltInCatalog, JsonFileCategoryStore>;
type CliResult<T> = Result<T, Box<dyn Error>>;

/// Pass-the-device word game: everyone but the impostor knows the word
#[derive(Debug, Parser)]
#[command(name = "impostor", version)]
struct Cli {
    /// Leaderboard file
    #[arg(long, default_value = "impostor_scores.json")]
    scores: PathBuf,

    /// Custom decks file
    #[arg(long, default_value = "impostor_custom_decks.json")]
    custom_decks: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play rounds on this device (default)
    Play(PlayArgs),
    /// Add or replace a custom deck
    AddDeck {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name_en: String,
        /// Defaults to the English name
        #[arg(long)]
        name_sr: Option<String>,
        /// Comma separated words
        #[arg(long, value_delimiter = ',', required = true)]
        words: Vec<String>,
    },
    /// Delete a custom deck
    RemoveDeck { id: String },
    /// List every deck, built-in and custom
    ListDecks,
    /// Show the leaderboard
    Scores,
    /// Reset the leaderboard
    ClearScores,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SpyHint {
    Word,
    Category,
    Hint,
    HintAndCategory,
}

impl From<SpyHint> for SpyHintLevel {
    fn from(hint: SpyHint) -> Self {
        match hint {
            SpyHint::Word => SpyHintLevel::Word,
            SpyHint::Category => SpyHintLevel::Category,
            SpyHint::Hint => SpyHintLevel::Hint,
            SpyHint::HintAndCategory => SpyHintLevel::HintAndCategory,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
struct PlayArgs {
    /// JSON setup to start from (camelCase fields)
    #[arg(long)]
    setup: Option<PathBuf>,
    /// "en" or "sr"
    #[arg(long)]
    language: Option<String>,
    #[arg(long)]
    players: Option<usize>,
    #[arg(long)]
    impostors: Option<usize>,
    /// Player names in seat order, repeat the flag per player
    #[arg(long = "name")]
    names: Vec<String>,
    /// Deck ids to play with, all decks when omitted
    #[arg(long = "category")]
    categories: Vec<String>,
    #[arg(long)]
    troll: bool,
    #[arg(long)]
    spy: bool,
    #[arg(long, value_enum)]
    spy_hint: Option<SpyHint>,
    #[arg(long)]
    punishments: bool,
    /// Impostors also see the category
    #[arg(long)]
    category_hint: bool,
    #[arg(long)]
    no_timer: bool,
    #[arg(long)]
    timer_seconds: Option<u32>,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{}", err.to_string().red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let catalog = MergedCatalog::new(BuiltInCatalog, JsonFileCategoryStore::open(&cli.custom_decks));
    let scores = JsonFileScoreStore::open(&cli.scores)?;
    let mut game = Game::new(catalog, scores);

    match cli.command.unwrap_or(Command::Play(PlayArgs::default())) {
        Command::Play(args) => play(&mut game, &args).await?,
        Command::AddDeck {
            id,
            name_en,
            name_sr,
            words,
        } => {
            let words: Vec<String> = words
                .iter()
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .collect();
            game.catalog_mut().custom.save(CustomCategory {
                name_sr: name_sr.unwrap_or_else(|| name_en.clone()),
                id,
                name_en,
                words,
            })?;
            game.reload_categories();
            print_decks(game.catalog());
        }
        Command::RemoveDeck { id } => {
            game.catalog_mut().custom.delete(&id)?;
            game.reload_categories();
            print_decks(game.catalog());
        }
        Command::ListDecks => print_decks(game.catalog()),
        Command::Scores => print_leaderboard(&game.scores(), strings(Language::En)),
        Command::ClearScores => game.clear_scores()?,
    }
    Ok(())
}

fn configure(game: &mut Game<Catalog, JsonFileScoreStore>, args: &PlayArgs) -> CliResult<()> {
    if let Some(path) = &args.setup {
        let setup: SetupConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
        game.load_setup(setup)?;
    }
    if let Some(code) = &args.language {
        let language =
            Language::from_code(code).ok_or_else(|| format!("unknown language: {}", code))?;
        game.set_language(language);
    }

    let setup = game.setup_mut()?;
    if let Some(players) = args.players {
        setup.set_player_count(players);
    } else if args.names.len() > setup.player_count() {
        setup.set_player_count(args.names.len());
    }
    if let Some(impostors) = args.impostors {
        setup.set_impostor_count(impostors);
    }
    for (index, name) in args.names.iter().enumerate() {
        setup.set_player_name(index, name.as_str());
    }
    if !args.categories.is_empty() {
        setup.select_categories(args.categories.iter().cloned());
    }
    if args.troll {
        setup.set_troll_mode(true);
    }
    if args.spy {
        setup.set_spy_mode(true);
    }
    if let Some(level) = args.spy_hint {
        setup.set_spy_hint_level(level.into());
    }
    if args.punishments {
        setup.set_punishments_enabled(true);
    }
    if args.category_hint {
        setup.set_category_hint(true);
    }
    if args.no_timer {
        setup.set_timer_enabled(false);
    }
    if let Some(seconds) = args.timer_seconds {
        setup.set_timer_seconds(seconds);
    }
    if setup.selected_category_ids().is_empty() {
        game.select_all_categories()?;
    }
    Ok(())
}

async fn play(game: &mut Game<Catalog, JsonFileScoreStore>, args: &PlayArgs) -> CliResult<()> {
    configure(game, args)?;
    game.start_game()?;
    loop {
        play_round(game).await?;
        let text = strings(game.setup().language());
        print_leaderboard(&game.scores(), text);
        match prompt(text.next_action).await?.trim().to_lowercase().as_str() {
            "p" => game.play_again()?,
            "n" => {
                game.new_game();
                configure(game, args)?;
                game.start_game()?;
            }
            _ => break,
        }
    }
    Ok(())
}

async fn play_round(game: &mut Game<Catalog, JsonFileScoreStore>) -> CliResult<()> {
    let text = strings(game.setup().language());

    while game.phase_kind() == PhaseKind::RoleReveal {
        let index = game.reveal_cursor()?.current_player_index;
        let name = game
            .round()
            .and_then(|round| round.players().get(index))
            .map(|player| player.name.clone())
            .unwrap_or_default();
        clear_screen()?;
        println!("{} {}", text.pass_device_to, name.bold());
        prompt(text.press_enter_to_reveal).await?;
        game.start_card()?;
        print_card(&game.reveal_content()?, text);
        prompt(text.press_enter_to_hide).await?;
        game.end_card()?;
        game.advance()?;
    }

    clear_screen()?;
    println!("{}", text.discussion.bold());
    let ticker = if game.discussion_state()?.timer_enabled {
        game.start_timer()?;
        let mut updates = game.subscribe_timer()?;
        println!("{} {}", updates.borrow().seconds_remaining, text.seconds_left);
        Some(tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let state = *updates.borrow_and_update();
                if state.seconds_remaining == 0 {
                    println!("{}", text.times_up.red().bold());
                    break;
                }
                if state.seconds_remaining % 30 == 0 || state.seconds_remaining <= 5 {
                    println!("{} {}", state.seconds_remaining, text.seconds_left);
                }
            }
        }))
    } else {
        None
    };
    prompt(text.press_enter_to_reveal_impostor).await?;
    if let Some(ticker) = ticker {
        ticker.abort();
    }
    game.reveal_impostor()?;

    let summary = game.summary()?;
    let round = summary.round();
    if round.is_troll_round() {
        println!("{}", text.troll_round.magenta().bold());
    }
    println!("{} {}", text.the_word_is, round.secret_word().word.bold());
    println!("{} {}", text.category_label, round.category_name());
    for player in round.players() {
        println!("  {}: {:?}", player.name, player.role);
    }

    let crewmates_won = loop {
        match prompt(text.did_crewmates_win).await?.trim().to_lowercase().as_str() {
            "y" => break true,
            "n" => break false,
            _ => continue,
        }
    };
    let outcome = game.award_scores(crewmates_won)?;
    for delta in outcome.deltas.iter().filter(|d| d.points > 0) {
        println!("  {} +{}", delta.name, delta.points.to_string().green());
    }
    if let Some(punishment) = &outcome.punishment {
        println!(
            "\n{} {}\n{}",
            text.punishment_for,
            punishment.losers.bold(),
            punishment.task.yellow()
        );
    }
    Ok(())
}

fn print_card(content: &RevealContent, text: &Strings) {
    match content {
        RevealContent::Crewmate { word } => {
            println!("{}", text.you_are_crewmate.green().bold());
            println!("{} {}", text.the_word_is, word.bold());
        }
        RevealContent::Impostor { hint, category } => {
            println!("{}", text.you_are_impostor.red().bold());
            if !hint.is_empty() {
                println!("{} {}", text.hint_label, hint);
            }
            if let Some(category) = category {
                println!("{} {}", text.category_label, category);
            }
        }
        RevealContent::Spy {
            impostor_names,
            intel,
        } => {
            println!("{}", text.you_are_spy.yellow().bold());
            println!("{} {}", text.impostors_are, impostor_names.join(", ").bold());
            match intel {
                SpyIntel::Word(word) => println!("{} {}", text.the_word_is, word),
                SpyIntel::Category(category) => println!("{} {}", text.category_label, category),
                SpyIntel::Hint(hint) => println!("{} {}", text.hint_label, hint),
                SpyIntel::HintAndCategory { hint, category } => {
                    println!("{} {}", text.hint_label, hint);
                    println!("{} {}", text.category_label, category);
                }
            }
        }
    }
}

fn print_leaderboard(scores: &[(String, i32)], text: &Strings) {
    println!("\n{}", text.leaderboard.bold());
    for (rank, (name, points)) in scores.iter().enumerate() {
        println!("{:>3}. {} {} {}", rank + 1, name, points, text.points);
    }
}

fn print_decks(catalog: &Catalog) {
    for category in catalog.list_categories() {
        println!(
            "{} ({}, {} words)",
            category.id.bold(),
            category.name(Language::En),
            category.words(Language::En).len()
        );
    }
}

fn clear_screen() -> io::Result<()> {
    print!("\x1B[2J\x1B[1;1H");
    io::stdout().flush()
}

/// Read one line without blocking the runtime the countdown runs on
async fn prompt(message: &str) -> CliResult<String> {
    println!("{}", message.dimmed());
    let line = tokio::task::spawn_blocking(|| -> io::Result<String> {
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line)
    })
    .await??;
    Ok(line)
}
