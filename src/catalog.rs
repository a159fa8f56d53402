//! Category sources: the built-in decks, user-authored custom decks and
//! the merged view a round is assembled from.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use enum_iterator::all;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GameResult;
use crate::game::{Category, Language, WordItem};

pub trait CategoryCatalog {
    fn list_categories(&self) -> Vec<Category>;
}

impl CategoryCatalog for Vec<Category> {
    fn list_categories(&self) -> Vec<Category> {
        self.clone()
    }
}

type Words = &'static [(&'static str, &'static str)];

fn deck(id: &str, name_en: &str, name_sr: &str, words_en: Words, words_sr: Words) -> Category {
    let to_items = |words: Words| -> Vec<WordItem> {
        words.iter().map(|(w, h)| WordItem::new(*w, *h)).collect()
    };
    Category {
        id: id.to_string(),
        localized_names: HashMap::from([
            (Language::En, name_en.to_string()),
            (Language::Sr, name_sr.to_string()),
        ]),
        localized_words: HashMap::from([
            (Language::En, to_items(words_en)),
            (Language::Sr, to_items(words_sr)),
        ]),
    }
}

static BUILT_IN: Lazy<Vec<Category>> = Lazy::new(|| {
    vec![
        deck(
            "animals",
            "Animals",
            "Životinje",
            &[
                ("Elephant", "Never forgets"),
                ("Penguin", "Formal wear"),
                ("Kangaroo", "Built-in pocket"),
                ("Owl", "Night shift"),
                ("Giraffe", "Tall order"),
                ("Octopus", "Eight arms"),
                ("Bee", "Busy worker"),
                ("Chameleon", "Blends in"),
            ],
            &[
                ("Slon", "Nikad ne zaboravlja"),
                ("Pingvin", "Svečano odelo"),
                ("Kengur", "Ugrađen džep"),
                ("Sova", "Noćna smena"),
                ("Žirafa", "Visoko"),
                ("Hobotnica", "Osam ruku"),
                ("Pčela", "Vredan radnik"),
                ("Kameleon", "Uklapa se"),
            ],
        ),
        deck(
            "food",
            "Food & Drink",
            "Hrana i piće",
            &[
                ("Banana", "Yellow fruit"),
                ("Pizza", "Round slices"),
                ("Coffee", "Morning fuel"),
                ("Sushi", "Raw roll"),
                ("Popcorn", "Cinema snack"),
                ("Honey", "Sticky gold"),
                ("Pancake", "Flipped breakfast"),
                ("Lemonade", "Sour and sweet"),
            ],
            &[
                ("Banana", "Žuto voće"),
                ("Pica", "Okrugle kriške"),
                ("Kafa", "Jutarnje gorivo"),
                ("Suši", "Sirova rolnica"),
                ("Kokice", "Bioskopska grickalica"),
                ("Med", "Lepljivo zlato"),
                ("Palačinka", "Preokrenut doručak"),
                ("Limunada", "Kiselo i slatko"),
            ],
        ),
        deck(
            "places",
            "Countries & Cities",
            "Države i gradovi",
            &[
                ("Paris", "City of light"),
                ("Egypt", "Ancient triangles"),
                ("Venice", "Streets of water"),
                ("Japan", "Rising sun"),
                ("New York", "Never sleeps"),
                ("Iceland", "Fire and ice"),
                ("Brazil", "Carnival"),
                ("Belgrade", "Two rivers"),
            ],
            &[
                ("Pariz", "Grad svetlosti"),
                ("Egipat", "Drevni trouglovi"),
                ("Venecija", "Ulice od vode"),
                ("Japan", "Izlazeće sunce"),
                ("Njujork", "Nikad ne spava"),
                ("Island", "Vatra i led"),
                ("Brazil", "Karneval"),
                ("Beograd", "Dve reke"),
            ],
        ),
        deck(
            "objects",
            "Everyday Objects",
            "Svakodnevni predmeti",
            &[
                ("Umbrella", "Portable roof"),
                ("Toothbrush", "Morning routine"),
                ("Mirror", "Looks back"),
                ("Pillow", "Soft landing"),
                ("Key", "Opens doors"),
                ("Clock", "Keeps ticking"),
                ("Scissors", "Two blades"),
                ("Candle", "Melting light"),
            ],
            &[
                ("Kišobran", "Prenosivi krov"),
                ("Četkica za zube", "Jutarnja rutina"),
                ("Ogledalo", "Gleda nazad"),
                ("Jastuk", "Meko sletanje"),
                ("Ključ", "Otvara vrata"),
                ("Sat", "Stalno kuca"),
                ("Makaze", "Dva sečiva"),
                ("Sveća", "Svetlo koje se topi"),
            ],
        ),
        deck(
            "sports",
            "Sports",
            "Sportovi",
            &[
                ("Tennis", "Love means nothing"),
                ("Basketball", "Hoops"),
                ("Chess", "Quiet battle"),
                ("Surfing", "Riding waves"),
                ("Boxing", "Gloves on"),
                ("Skiing", "Downhill"),
                ("Golf", "Small holes"),
                ("Marathon", "Long run"),
            ],
            &[
                ("Tenis", "Reket i mreža"),
                ("Košarka", "Obruč"),
                ("Šah", "Tiha bitka"),
                ("Surfovanje", "Jahanje talasa"),
                ("Boks", "Rukavice"),
                ("Skijanje", "Nizbrdo"),
                ("Golf", "Male rupe"),
                ("Maraton", "Dugo trčanje"),
            ],
        ),
    ]
});

/// The decks that ship with the game
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltInCatalog;

impl CategoryCatalog for BuiltInCatalog {
    fn list_categories(&self) -> Vec<Category> {
        BUILT_IN.clone()
    }
}

/// On-disk shape of a custom deck. Custom words have no hint and are
/// shared by every language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomCategory {
    pub id: String,
    pub name_en: String,
    pub name_sr: String,
    pub words: Vec<String>,
}

impl CustomCategory {
    pub fn to_category(&self) -> Category {
        let words: Vec<WordItem> = self
            .words
            .iter()
            .map(|w| WordItem::new(w.as_str(), ""))
            .collect();
        Category {
            id: self.id.clone(),
            localized_names: HashMap::from([
                (Language::En, self.name_en.clone()),
                (Language::Sr, self.name_sr.clone()),
            ]),
            localized_words: all::<Language>().map(|l| (l, words.clone())).collect(),
        }
    }
}

pub trait CustomCategoryStore {
    fn custom_categories(&self) -> &[CustomCategory];

    /// Replaces a deck with the same id, otherwise appends
    fn save(&mut self, category: CustomCategory) -> GameResult<()>;

    fn delete(&mut self, category_id: &str) -> GameResult<()>;
}

fn upsert(categories: &mut Vec<CustomCategory>, category: CustomCategory) {
    match categories.iter_mut().find(|c| c.id == category.id) {
        Some(existing) => *existing = category,
        None => categories.push(category),
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCategoryStore {
    categories: Vec<CustomCategory>,
}

impl CustomCategoryStore for InMemoryCategoryStore {
    fn custom_categories(&self) -> &[CustomCategory] {
        &self.categories
    }

    fn save(&mut self, category: CustomCategory) -> GameResult<()> {
        upsert(&mut self.categories, category);
        Ok(())
    }

    fn delete(&mut self, category_id: &str) -> GameResult<()> {
        self.categories.retain(|c| c.id != category_id);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileCategoryStore {
    path: PathBuf,
    categories: Vec<CustomCategory>,
}

impl JsonFileCategoryStore {
    /// A missing or unreadable file yields no custom decks
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let categories = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "ignoring unreadable custom decks");
                vec![]
            }),
            Err(_) => vec![],
        };
        debug!(path = %path.display(), decks = categories.len(), "loaded custom decks");
        Self { path, categories }
    }

    /// Memory follows disk: the new list is kept only once it is written
    fn commit(&mut self, categories: Vec<CustomCategory>) -> GameResult<()> {
        let json = serde_json::to_string_pretty(&categories)?;
        fs::write(&self.path, json).map_err(|err| {
            warn!(path = %self.path.display(), %err, "failed to save custom decks");
            err
        })?;
        self.categories = categories;
        Ok(())
    }
}

impl CustomCategoryStore for JsonFileCategoryStore {
    fn custom_categories(&self) -> &[CustomCategory] {
        &self.categories
    }

    fn save(&mut self, category: CustomCategory) -> GameResult<()> {
        let mut categories = self.categories.clone();
        upsert(&mut categories, category);
        self.commit(categories)
    }

    fn delete(&mut self, category_id: &str) -> GameResult<()> {
        let mut categories = self.categories.clone();
        categories.retain(|c| c.id != category_id);
        self.commit(categories)
    }
}

/// Built-in decks followed by custom ones
#[derive(Debug, Clone, Default)]
pub struct MergedCatalog<B, S> {
    pub base: B,
    pub custom: S,
}

impl<B, S> MergedCatalog<B, S> {
    pub fn new(base: B, custom: S) -> Self {
        Self { base, custom }
    }
}

impl<B: CategoryCatalog, S: CustomCategoryStore> CategoryCatalog for MergedCatalog<B, S> {
    fn list_categories(&self) -> Vec<Category> {
        let mut categories = self.base.list_categories();
        categories.extend(self.custom.custom_categories().iter().map(CustomCategory::to_category));
        categories
    }
}
