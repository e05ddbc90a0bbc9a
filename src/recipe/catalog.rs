//! Recipe catalog loading and search

use std::{collections::HashSet, fs, path::{Path, PathBuf}};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::model::{Recipe, Step};

/// Errors raised while loading a catalog file
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate recipe id in catalog: {0}")]
    DuplicateId(String),
}

/// Category name that matches every recipe
pub const ALL_CATEGORIES: &str = "All";

/// A recipe addressable by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(default)]
    pub category: String,
    /// Short blurb shown in listings; searched along with the title
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub recipe: Recipe,
}

impl CatalogEntry {
    /// Uncategorized entry without a description
    pub fn new(id: impl Into<String>, recipe: Recipe) -> Self {
        Self {
            id: id.into(),
            category: String::new(),
            description: String::new(),
            recipe,
        }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn listed_under(&self, category: &str) -> bool {
        category.is_empty()
            || category.eq_ignore_ascii_case(ALL_CATEGORIES)
            || self.category.trim().eq_ignore_ascii_case(category)
    }

    fn mentions(&self, query: &str) -> bool {
        query.is_empty()
            || self.recipe.title.to_lowercase().contains(query)
            || self.description.to_lowercase().contains(query)
    }
}

/// The set of recipes a host can start sessions from
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Load a catalog from a JSON array of recipes
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::new(entries)?;
        info!("Loaded {} recipes from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Load from `path` when given, otherwise use the built-in recipes.
    /// A configured file that fails to load is an error, never a silent fallback.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                info!("No catalog file configured, using built-in recipes");
                Ok(Self::builtin())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Case-insensitive search over title and description, limited to
    /// `category`. A blank query or a blank/`All` category matches everything.
    pub fn search(&self, query: &str, category: &str) -> Vec<&CatalogEntry> {
        let query = query.trim().to_lowercase();
        let category = category.trim();

        let matches: Vec<&CatalogEntry> = self.entries
            .iter()
            .filter(|entry| entry.listed_under(category) && entry.mentions(&query))
            .collect();
        debug!("Search {:?} in {:?} matched {} recipes", query, category, matches.len());
        matches
    }

    /// `All` followed by each distinct category in catalog order
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for entry in &self.entries {
            let category = entry.category.trim();
            if category.is_empty() || categories.iter().any(|known| known.eq_ignore_ascii_case(category)) {
                continue;
            }
            categories.push(category.to_string());
        }
        categories
    }

    /// Sample recipes used when no catalog file is configured
    pub fn builtin() -> Self {
        let placeholder = "https://via.placeholder.com/300";
        let entries = vec![
            CatalogEntry::new(
                "chocolate-cake",
                Recipe::new(
                    "Chocolate Cake",
                    vec![
                        Step::new(1, "Preheat the oven to 180°C and grease a round pan.", placeholder, 60),
                        Step::new(2, "In a bowl, mix 2 cups of flour, 1 cup of sugar and 1/2 cup of cocoa powder.", placeholder, 120),
                        Step::new(3, "Add 3 eggs, 1 cup of milk and 1/2 cup of oil. Mix until smooth.", placeholder, 180),
                        Step::new(4, "Pour the batter into the pan and bake for about 35 minutes.", placeholder, 2100),
                        Step::new(5, "Take it out of the oven and let it cool before unmolding.", placeholder, 600),
                    ],
                    "#f96163",
                ),
            )
            .in_category("Desserts")
            .described("A simple cocoa sponge for any afternoon."),
            CatalogEntry::new(
                "soft-boiled-eggs",
                Recipe::new(
                    "Soft-Boiled Eggs",
                    vec![
                        Step::new(1, "Bring a small pot of water to a rolling boil.", placeholder, 300),
                        Step::new(2, "Lower the eggs in gently and cook.", placeholder, 390),
                        Step::new(3, "Move the eggs to an ice bath.", placeholder, 120),
                        Step::new(4, "Peel and serve.", placeholder, 0),
                    ],
                    "#f2c94c",
                ),
            )
            .in_category("Breakfast")
            .described("Runny yolks with set whites."),
        ];

        Self { entries }
    }
}
