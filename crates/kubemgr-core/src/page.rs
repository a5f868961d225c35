//! Host page structure the search filter attaches to.
//!
//! A page may lack either of its two interactive parts: the search input or the
//! tile grid. The filter only attaches when both are present.

use crate::store::NamespaceInfo;
use crate::tile::Tile;

/// The search box. Holds the raw text as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    pub(crate) value: String,
}

impl SearchInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub(crate) search: Option<SearchInput>,
    pub(crate) grid: Option<Vec<Tile>>,
}

impl Page {
    /// An empty page: no search input, no grid.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_input(mut self, value: impl Into<String>) -> Self {
        self.search = Some(SearchInput::new(value));
        self
    }

    pub fn with_grid(mut self, tiles: Vec<Tile>) -> Self {
        self.grid = Some(tiles);
        self
    }

    /// Builds the namespaces page: an empty search box and one tile per namespace.
    pub fn from_namespaces(namespaces: &[NamespaceInfo]) -> Self {
        let tiles = namespaces
            .iter()
            .map(|ns| Tile::new(ns.name.clone()).with_subtitle(namespace_subtitle(ns)))
            .collect();
        Self::new().with_search_input("").with_grid(tiles)
    }

    pub fn search_input(&self) -> Option<&SearchInput> {
        self.search.as_ref()
    }

    pub fn has_grid(&self) -> bool {
        self.grid.is_some()
    }

    /// Tiles in grid order; empty when the page has no grid.
    pub fn tiles(&self) -> &[Tile] {
        self.grid.as_deref().unwrap_or(&[])
    }

    pub fn visible_count(&self) -> usize {
        self.tiles().iter().filter(|t| t.is_visible()).count()
    }
}

fn namespace_subtitle(ns: &NamespaceInfo) -> String {
    let items = match ns.item_count {
        1 => "1 item".to_string(),
        n => format!("{n} items"),
    };
    if ns.updated_human.is_empty() {
        items
    } else {
        format!("{items} · updated {}", ns.updated_human)
    }
}
