pub mod extract;
pub mod locate;
pub mod normalize;

use serde::Serialize;
use tracing::debug;

use crate::fetch::{self, FetchError};

/// Display-clean recipe record produced by one ingestion attempt.
/// Every string has already passed the normalizer. The record is not
/// persisted here; the caller decides whether to store it.
#[derive(Debug, PartialEq, Serialize)]
pub struct NormalizedRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl NormalizedRecipe {
    /// Denormalized form stored in the recipes table.
    pub fn ingredients_joined(&self) -> String {
        self.ingredients.join(", ")
    }

    /// Denormalized form stored in the recipes table, one step per line.
    pub fn instructions_joined(&self) -> String {
        self.instructions.join("\n")
    }

    /// True when the page yielded no usable recipe data at all.
    pub fn is_empty(&self) -> bool {
        self.name == extract::NAME_FALLBACK
            && self.ingredients.is_empty()
            && self.instructions.is_empty()
    }
}

/// Ingestion entry point: fetch the page and scrape it. `FetchError`
/// is the only failure that crosses this boundary; a page without
/// structured data comes back as an all-defaults record.
pub fn import_recipe(url: &str) -> Result<NormalizedRecipe, FetchError> {
    let html = fetch::fetch_page(url)?;
    Ok(scrape_document(&html))
}

/// Locator -> extractor -> normalizer over already-fetched markup.
/// Total: every anomaly past the fetch degrades to defaults.
pub fn scrape_document(html: &str) -> NormalizedRecipe {
    let document = locate::locate_structured_data(html);
    if document.is_none() {
        debug!("no structured data block found");
    }
    let raw = extract::extract_fields(document.as_ref());

    NormalizedRecipe {
        name: normalize::normalize(&raw.name),
        ingredients: raw.ingredients.iter().map(|s| normalize::normalize(s)).collect(),
        instructions: raw.instructions.iter().map(|s| normalize::normalize(s)).collect(),
    }
}

// ── Tests ──
