//! Plain view models handed to the page as JSON.
//!
//! Everything here is pure so it can be tested natively; the bridge only
//! serializes these structs.
use std::collections::BTreeMap;

use genesis_game::{
    Catalog, Category, CombineOutcome, CombineReport, CompletionSummary, DiscoveryStore,
    ElementId, ElementRecord, Hint, Quote, progress_percent,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementView {
    pub id: String,
    pub icon: String,
    pub name: String,
    pub english_name: String,
    pub day_label: String,
    pub tooltip: String,
    pub color: &'static str,
}

impl From<&ElementRecord> for ElementView {
    fn from(record: &ElementRecord) -> Self {
        Self {
            id: record.id.clone(),
            icon: record.icon.clone(),
            name: record.name.clone(),
            english_name: record.english_name.clone(),
            day_label: day_label(record.discovered_day),
            tooltip: format!("{}\n{}", record.description, record.verse),
            color: record.category.color(),
        }
    }
}

/// One collapsible palette section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: Category,
    pub label: &'static str,
    pub color: &'static str,
    pub count: usize,
    pub elements: Vec<ElementView>,
}

fn day_label(day: u8) -> String {
    format!("Ημέρα {day}")
}

/// Group the known elements by category, in category order, skipping empty
/// categories. Elements within a group follow their day of creation.
#[must_use]
pub fn palette(discovered: &BTreeMap<ElementId, ElementRecord>) -> Vec<CategoryGroup> {
    Category::ALL
        .into_iter()
        .filter_map(|category| {
            let mut records: Vec<&ElementRecord> = discovered
                .values()
                .filter(|record| record.category == category)
                .collect();
            if records.is_empty() {
                return None;
            }
            records.sort_by_key(|record| (record.discovered_day, record.id.as_str()));
            Some(CategoryGroup {
                category,
                label: category.label(),
                color: category.color(),
                count: records.len(),
                elements: records.into_iter().map(ElementView::from).collect(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteView {
    pub text: String,
    pub reference: String,
}

impl From<&Quote> for QuoteView {
    fn from(quote: &Quote) -> Self {
        Self {
            text: quote.text.clone(),
            reference: quote.reference.clone(),
        }
    }
}

/// Hint bubble text, or the encouragement quote once nothing is left.
#[must_use]
pub fn hint_view(hint: Option<&Hint>, catalog: &Catalog) -> QuoteView {
    let Some(hint) = hint else {
        return QuoteView::from(&catalog.exhausted_quote);
    };
    QuoteView {
        text: format!(
            "Υπόδειξη: Δοκιμάστε να συνδυάσετε {} ({}) με {} ({}) για να ανακαλύψετε κάτι νέο από την {}η ημέρα της δημιουργίας.",
            hint.first.name,
            hint.first.english_name,
            hint.second.name,
            hint.second.english_name,
            hint.day
        ),
        reference: format!("Υπόδειξη - {}", hint.verse),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultKind {
    New,
    Known,
    None,
}

/// Contents of the result slot after a combine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub kind: ResultKind,
    pub icon: String,
    pub name: String,
    pub badge: &'static str,
}

impl From<&CombineOutcome> for ResultView {
    fn from(outcome: &CombineOutcome) -> Self {
        match outcome {
            CombineOutcome::NewDiscovery(record) => Self {
                kind: ResultKind::New,
                icon: record.icon.clone(),
                name: record.name.clone(),
                badge: "ΝΕΟ!",
            },
            CombineOutcome::AlreadyKnown(record) => Self {
                kind: ResultKind::Known,
                icon: record.icon.clone(),
                name: record.name.clone(),
                badge: "ΓΝΩΣΤΟ",
            },
            CombineOutcome::NoMatch => Self {
                kind: ResultKind::None,
                icon: "❌".to_string(),
                name: String::new(),
                badge: "Κανένας Συνδυασμός",
            },
        }
    }
}

/// Header counters and the progress bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    pub elements: usize,
    pub combinations: String,
    pub day: u8,
    pub progress: u8,
}

#[must_use]
pub fn stats_view(store: &DiscoveryStore, catalog: &Catalog) -> StatsView {
    StatsView {
        elements: store.discovered_count(),
        combinations: format!("{}/{}", store.found_count(), catalog.rule_count()),
        day: store.current_day(),
        progress: rounded_percent(progress_percent(store, catalog)),
    }
}

/// Whole percent for the progress bar and header.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rounded_percent(percent: f64) -> u8 {
    percent.round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTransitionView {
    pub title: String,
    pub description: String,
}

#[must_use]
pub fn day_transition_view(day: u8, catalog: &Catalog) -> DayTransitionView {
    DayTransitionView {
        title: day_label(day),
        description: catalog.day_description(day).unwrap_or_default().to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionView {
    pub title: &'static str,
    pub message: &'static str,
    pub stats: Vec<String>,
    pub final_quote: QuoteView,
}

#[must_use]
pub fn completion_view(summary: &CompletionSummary, catalog: &Catalog) -> CompletionView {
    CompletionView {
        title: "☦ Συγχαρητήρια! ☦",
        message: "Ολοκληρώσατε τη δημιουργία σύμφωνα με την Παλαιά Διαθήκη",
        stats: vec![
            format!("Στοιχεία: {}", summary.elements),
            format!("Συνδυασμοί: {}/{}", summary.found, summary.total),
            format!("Ημέρες: {}", summary.day),
        ],
        final_quote: QuoteView::from(&catalog.closing_quote),
    }
}

/// Entry appended to the discovery log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryView {
    pub icon: String,
    pub name: String,
    pub day_label: String,
    pub description: String,
    pub verse: String,
}

impl From<&ElementRecord> for LogEntryView {
    fn from(record: &ElementRecord) -> Self {
        Self {
            icon: record.icon.clone(),
            name: record.name.clone(),
            day_label: day_label(record.discovered_day),
            description: record.description.clone(),
            verse: record.verse.clone(),
        }
    }
}

/// Everything the page updates after one combine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombineView {
    pub result: ResultView,
    pub log_entry: Option<LogEntryView>,
    pub quote: Option<QuoteView>,
    pub day_transition: Option<DayTransitionView>,
    pub completion: Option<CompletionView>,
    pub stats: StatsView,
    pub autosave_failed: bool,
}

#[must_use]
pub fn combine_view(
    report: &CombineReport,
    store: &DiscoveryStore,
    catalog: &Catalog,
) -> CombineView {
    let log_entry = match &report.outcome {
        CombineOutcome::NewDiscovery(record) => Some(LogEntryView::from(record)),
        CombineOutcome::AlreadyKnown(_) | CombineOutcome::NoMatch => None,
    };
    CombineView {
        result: ResultView::from(&report.outcome),
        log_entry,
        quote: report.quote.as_ref().map(QuoteView::from),
        day_transition: report
            .day_advanced
            .map(|day| day_transition_view(day, catalog)),
        completion: report
            .completed
            .then(|| completion_view(&CompletionSummary::from_store(store, catalog), catalog)),
        stats: stats_view(store, catalog),
        autosave_failed: report.autosave_error.is_some(),
    }
}
