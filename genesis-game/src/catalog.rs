//! Static combination table
//!
//! Elements, combination rules, quotes and day descriptions are embedded at
//! build time from `assets/creation.json` and never mutated afterwards.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{FIRST_DAY, LAST_DAY, PAIR_SEPARATOR};

const DEFAULT_CREATION_DATA: &str = include_str!("../assets/creation.json");

/// Stable element key, e.g. `"dry_land"`.
pub type ElementId = String;

/// Grouping tag used by the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Primordial,
    Divine,
    Cosmic,
    Geographic,
    Plant,
    Celestial,
    Animal,
    Human,
    Place,
    Sacred,
    Material,
    Weather,
    Covenant,
    Time,
}

impl Category {
    pub const ALL: [Self; 14] = [
        Self::Primordial,
        Self::Divine,
        Self::Cosmic,
        Self::Geographic,
        Self::Plant,
        Self::Celestial,
        Self::Animal,
        Self::Human,
        Self::Place,
        Self::Sacred,
        Self::Material,
        Self::Weather,
        Self::Covenant,
        Self::Time,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primordial => "primordial",
            Self::Divine => "divine",
            Self::Cosmic => "cosmic",
            Self::Geographic => "geographic",
            Self::Plant => "plant",
            Self::Celestial => "celestial",
            Self::Animal => "animal",
            Self::Human => "human",
            Self::Place => "place",
            Self::Sacred => "sacred",
            Self::Material => "material",
            Self::Weather => "weather",
            Self::Covenant => "covenant",
            Self::Time => "time",
        }
    }

    /// Greek section heading shown above the category's elements.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Primordial => "Πρωτογενή",
            Self::Divine => "Θεῖα",
            Self::Cosmic => "Κοσμικά",
            Self::Geographic => "Γεωγραφικά",
            Self::Plant => "Φυτά",
            Self::Celestial => "Ουράνια",
            Self::Animal => "Ζῷα",
            Self::Human => "Ἀνθρώπινα",
            Self::Place => "Τόποι",
            Self::Sacred => "Ἱερά",
            Self::Material => "Ὑλικά",
            Self::Weather => "Καιρός",
            Self::Covenant => "Διαθήκη",
            Self::Time => "Χρόνος",
        }
    }

    /// Accent colour as `#RRGGBB`.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Primordial => "#8B4513",
            Self::Divine => "#FFD700",
            Self::Cosmic => "#4169E1",
            Self::Geographic => "#228B22",
            Self::Plant => "#32CD32",
            Self::Celestial => "#F0E68C",
            Self::Animal => "#CD853F",
            Self::Human => "#DDA0DD",
            Self::Place => "#98FB98",
            Self::Sacred => "#B22222",
            Self::Material => "#696969",
            Self::Weather => "#87CEEB",
            Self::Covenant => "#9370DB",
            Self::Time => "#DAA520",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discoverable element. Field names follow the persisted slot layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: ElementId,
    pub name: String,
    pub english_name: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub verse: String,
    #[serde(default)]
    pub icon: String,
    pub discovered_day: u8,
}

/// Order-independent key for a pair of inputs: ids sorted and joined by `+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairKey(String);

impl PairKey {
    #[must_use]
    pub fn new(first: &str, second: &str) -> Self {
        let (lo, hi) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        Self(format!("{lo}{PAIR_SEPARATOR}{hi}"))
    }

    /// Parse a persisted key, re-normalizing the order of its halves.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (first, second) = raw.split_once(PAIR_SEPARATOR)?;
        let (first, second) = (first.trim(), second.trim());
        if first.is_empty() || second.is_empty() || second.contains(PAIR_SEPARATOR) {
            return None;
        }
        Some(Self::new(first, second))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the combination table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationRule {
    pub inputs: [ElementId; 2],
    pub result: ElementRecord,
}

impl CombinationRule {
    #[must_use]
    pub fn matches(&self, first: &str, second: &str) -> bool {
        let [a, b] = &self.inputs;
        (a == first && b == second) || (a == second && b == first)
    }

    #[must_use]
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.inputs[0], &self.inputs[1])
    }
}

/// A citation shown alongside a discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Quote {
    pub text: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog defines no primordial elements")]
    NoPrimordial,
    #[error("primordial element `{0}` is defined twice")]
    DuplicatePrimordial(String),
    #[error("rule {index} has an empty input or result id")]
    EmptyId { index: usize },
    #[error("element `{id}` has day {day}, expected 1..=7")]
    DayOutOfRange { id: String, day: u8 },
}

/// The complete, read-only combination table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub primordial: Vec<ElementRecord>,
    pub combinations: Vec<CombinationRule>,
    #[serde(default)]
    pub quotes: BTreeMap<ElementId, Quote>,
    #[serde(default)]
    pub opening_quote: Quote,
    #[serde(default)]
    pub closing_quote: Quote,
    #[serde(default)]
    pub exhausted_quote: Quote,
    #[serde(default)]
    pub day_descriptions: BTreeMap<u8, String>,
}

impl Catalog {
    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the embedded creation table.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_CREATION_DATA).unwrap_or_default()
    }

    /// Rules whose unordered input pair equals `{first, second}`, in table order.
    pub fn rules_for<'a>(
        &'a self,
        first: &'a str,
        second: &'a str,
    ) -> impl Iterator<Item = &'a CombinationRule> + 'a {
        self.combinations
            .iter()
            .filter(move |rule| rule.matches(first, second))
    }

    /// True when some rule is keyed on `key`.
    #[must_use]
    pub fn defines_pair(&self, key: &PairKey) -> bool {
        self.combinations.iter().any(|rule| rule.pair_key() == *key)
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.combinations.len()
    }

    pub fn primordial_ids(&self) -> impl Iterator<Item = &str> {
        self.primordial.iter().map(|e| e.id.as_str())
    }

    /// First record defined under `id`, primordial elements first.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&ElementRecord> {
        self.primordial
            .iter()
            .chain(self.combinations.iter().map(|rule| &rule.result))
            .find(|record| record.id == id)
    }

    #[must_use]
    pub fn quote_for(&self, id: &str) -> Option<&Quote> {
        self.quotes.get(id)
    }

    #[must_use]
    pub fn day_description(&self, day: u8) -> Option<&str> {
        self.day_descriptions.get(&day).map(String::as_str)
    }

    /// Check the structural rules the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.primordial.is_empty() {
            return Err(CatalogError::NoPrimordial);
        }
        let mut seen = HashSet::new();
        for element in &self.primordial {
            if !seen.insert(element.id.as_str()) {
                return Err(CatalogError::DuplicatePrimordial(element.id.clone()));
            }
            check_day(element)?;
        }
        for (index, rule) in self.combinations.iter().enumerate() {
            let empty = rule.inputs.iter().any(String::is_empty) || rule.result.id.is_empty();
            if empty {
                return Err(CatalogError::EmptyId { index });
            }
            check_day(&rule.result)?;
        }
        Ok(())
    }
}

fn check_day(element: &ElementRecord) -> Result<(), CatalogError> {
    if (FIRST_DAY..=LAST_DAY).contains(&element.discovered_day) {
        Ok(())
    } else {
        Err(CatalogError::DayOutOfRange {
            id: element.id.clone(),
            day: element.discovered_day,
        })
    }
}

/// Shared handle to the embedded creation table.
#[must_use]
pub fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(Catalog::load_from_static)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_parses_and_validates() {
        let table = catalog();
        assert_eq!(table.primordial.len(), 4);
        assert_eq!(table.rule_count(), 43);
        table.validate().unwrap();
        let ids: Vec<_> = table.primordial_ids().collect();
        assert_eq!(ids, vec!["air", "water", "earth", "fire"]);
    }

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(PairKey::new("fire", "air"), PairKey::new("air", "fire"));
        assert_eq!(PairKey::new("fire", "air").as_str(), "air+fire");
        assert_eq!(PairKey::parse("water+earth").unwrap().as_str(), "earth+water");
        assert!(PairKey::parse("water").is_none());
        assert!(PairKey::parse("+earth").is_none());
        assert!(PairKey::parse("a+b+c").is_none());
    }

    #[test]
    fn rules_for_keeps_table_order() {
        let table = catalog();
        let results: Vec<_> = table
            .rules_for("darkness", "light")
            .map(|rule| rule.result.id.as_str())
            .collect();
        assert_eq!(results, vec!["day", "night", "stars"]);
        assert_eq!(table.rules_for("fire", "fire").count(), 0);
    }

    #[test]
    fn duplicate_logos_records_are_preserved() {
        let table = catalog();
        let from_voice: Vec<_> = table
            .rules_for("voice", "light")
            .map(|rule| rule.result.id.as_str())
            .collect();
        assert_eq!(from_voice, vec!["word", "logos"]);
        assert_eq!(
            table.element("word").unwrap().name,
            table.element("logos").unwrap().name
        );
    }

    #[test]
    fn quotes_and_days_are_keyed() {
        let table = catalog();
        assert_eq!(table.quote_for("man").unwrap().reference, "Γένεσις 2:7");
        assert!(table.quote_for("dust").is_none());
        assert_eq!(table.day_description(7), Some("Καὶ κατέπαυσεν"));
        assert!(table.day_description(8).is_none());
    }

    #[test]
    fn validate_rejects_out_of_range_day() {
        let mut table = catalog().clone();
        table.combinations[0].result.discovered_day = 9;
        assert_eq!(
            table.validate(),
            Err(CatalogError::DayOutOfRange {
                id: "light".to_string(),
                day: 9
            })
        );
    }

    #[test]
    fn category_metadata_covers_every_tag() {
        for category in Category::ALL {
            assert!(category.color().starts_with('#'));
            assert!(!category.label().is_empty());
        }
        let json = serde_json::to_string(&Category::Geographic).unwrap();
        assert_eq!(json, "\"geographic\"");
    }
}
