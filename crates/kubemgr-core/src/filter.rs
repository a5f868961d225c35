//! Search-box filter for the tile grid.
//!
//! On every input event the whole grid is rescanned: a tile stays visible iff
//! its lower-cased title contains the lower-cased query. An empty query shows
//! everything; a tile without title text only matches the empty query.

use crate::page::{Page, SearchInput};
use crate::tile::{Display, Tile};

/// Normalized search query: trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query(String);

impl Query {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Number of tiles shown and hidden by one filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterOutcome {
    pub shown: usize,
    pub hidden: usize,
}

impl FilterOutcome {
    pub fn total(&self) -> usize {
        self.shown + self.hidden
    }
}

/// Case-insensitive substring test. Missing title text counts as "".
pub fn title_matches(title: Option<&str>, query: &Query) -> bool {
    title.unwrap_or_default().to_lowercase().contains(query.as_str())
}

/// Sets the display state of every tile for `query`.
pub fn apply(query: &Query, tiles: &mut [Tile]) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for tile in tiles.iter_mut() {
        if title_matches(tile.title(), query) {
            tile.set_display(Display::Shown);
            outcome.shown += 1;
        } else {
            tile.set_display(Display::Hidden);
            outcome.hidden += 1;
        }
    }
    outcome
}

/// Filter bound to a page's search input and tile grid.
///
/// The tile list is the one the page held at attach time; the handler borrows
/// it for as long as it is attached.
pub struct FilterHandler<'a> {
    input: &'a mut SearchInput,
    tiles: &'a mut [Tile],
}

impl<'a> FilterHandler<'a> {
    /// Returns `None` when the page lacks a search input or a grid.
    pub fn attach(page: &'a mut Page) -> Option<Self> {
        let Page { search, grid } = page;
        let input = search.as_mut()?;
        let tiles = grid.as_deref_mut()?;
        Some(Self { input, tiles })
    }

    /// Handles one input event: stores the new value and rescans the grid.
    pub fn on_input(&mut self, value: &str) -> FilterOutcome {
        self.input.value = value.to_string();
        let query = Query::new(&self.input.value);
        let outcome = apply(&query, self.tiles);
        tracing::debug!(
            query = query.as_str(),
            shown = outcome.shown,
            hidden = outcome.hidden,
            "filter applied"
        );
        outcome
    }

    pub fn tiles(&self) -> &[Tile] {
        self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(titles: &[&str]) -> Vec<Tile> {
        titles.iter().map(|t| Tile::new(*t)).collect()
    }

    fn visible(tiles: &[Tile]) -> Vec<&str> {
        tiles
            .iter()
            .filter(|t| t.is_visible())
            .filter_map(|t| t.title())
            .collect()
    }

    fn page(titles: &[&str]) -> Page {
        Page::new().with_search_input("").with_grid(grid(titles))
    }

    #[test]
    fn test_alpha_beta_gamma_scenario() {
        let mut page = page(&["Alpha", "Beta", "Gamma"]);
        let mut handler = FilterHandler::attach(&mut page).unwrap();

        handler.on_input("a");
        assert_eq!(visible(handler.tiles()), vec!["Alpha", "Beta", "Gamma"]);

        handler.on_input("al");
        assert_eq!(visible(handler.tiles()), vec!["Alpha"]);

        handler.on_input("z");
        assert!(visible(handler.tiles()).is_empty());

        handler.on_input("");
        assert_eq!(visible(handler.tiles()), vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_empty_query_shows_all() {
        let mut tiles = grid(&["one", "two"]);
        apply(&Query::new("zzz"), &mut tiles);
        let outcome = apply(&Query::new(""), &mut tiles);
        assert_eq!(outcome, FilterOutcome { shown: 2, hidden: 0 });
        assert!(tiles.iter().all(Tile::is_visible));
    }

    #[test]
    fn test_no_match_hides_all() {
        let mut tiles = grid(&["default", "kube-system"]);
        let outcome = apply(&Query::new("prod"), &mut tiles);
        assert_eq!(outcome, FilterOutcome { shown: 0, hidden: 2 });
        assert_eq!(outcome.total(), 2);
    }

    #[test]
    fn test_case_insensitive() {
        let mut upper = grid(&["ABCdef", "xyz", "aBc"]);
        let mut lower = upper.clone();
        apply(&Query::new("ABC"), &mut upper);
        apply(&Query::new("abc"), &mut lower);
        assert_eq!(upper, lower);
        assert_eq!(visible(&upper), vec!["ABCdef", "aBc"]);
    }

    #[test]
    fn test_untitled_tile_matches_only_empty_query() {
        let mut tiles = vec![Tile::untitled(), Tile::new("monitoring")];

        apply(&Query::new("m"), &mut tiles);
        assert!(!tiles[0].is_visible());
        assert!(tiles[1].is_visible());

        apply(&Query::new(""), &mut tiles);
        assert!(tiles[0].is_visible());
    }

    #[test]
    fn test_query_is_trimmed() {
        assert_eq!(Query::new("  Al \t").as_str(), "al");
        assert!(Query::new("   ").is_empty());
    }

    #[test]
    fn test_visibility_matches_substring_rule() {
        let titles = ["Alpha", "alphabet", "BETA", "gamma-ray", "", "ΣIGMA"];
        let queries = ["", "a", "AL", "eta", "-", "ray", "σ", "missing"];
        for q in queries {
            let mut tiles = grid(&titles);
            apply(&Query::new(q), &mut tiles);
            for tile in &tiles {
                let title = tile.title().unwrap();
                let expected = title.to_lowercase().contains(&q.to_lowercase());
                assert_eq!(tile.is_visible(), expected, "title={title:?} query={q:?}");
            }
        }
    }

    #[test]
    fn test_on_input_trims_query() {
        let mut page = page(&["Alpha", "Beta", "Gamma"]);
        let mut handler = FilterHandler::attach(&mut page).unwrap();

        let outcome = handler.on_input("  AL ");
        assert_eq!(outcome, FilterOutcome { shown: 1, hidden: 2 });
        assert_eq!(visible(handler.tiles()), vec!["Alpha"]);

        handler.on_input(" \t ");
        assert_eq!(visible(handler.tiles()), vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_attach_requires_search_input() {
        let mut page = Page::new().with_grid(grid(&["a"]));
        assert!(FilterHandler::attach(&mut page).is_none());
        assert_eq!(page.visible_count(), 1);
    }

    #[test]
    fn test_attach_requires_grid() {
        let mut page = Page::new().with_search_input("x");
        assert!(FilterHandler::attach(&mut page).is_none());
        assert_eq!(page.search_input().map(|s| s.value()), Some("x"));
    }

    #[test]
    fn test_on_input_updates_page() {
        let mut page = page(&["team-a", "team-b"]);
        {
            let mut handler = FilterHandler::attach(&mut page).unwrap();
            let outcome = handler.on_input("B");
            assert_eq!(outcome, FilterOutcome { shown: 1, hidden: 1 });
        }
        assert_eq!(page.search_input().map(|s| s.value()), Some("B"));
        assert_eq!(page.visible_count(), 1);
    }
}
