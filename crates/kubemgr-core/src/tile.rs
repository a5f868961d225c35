//! Tile model: a single displayable item in the namespace grid.

/// Display state toggled by the search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Shown,
    Hidden,
}

/// A grid tile.
///
/// The title is optional: a tile rendered without title text never matches a
/// non-empty query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    title: Option<String>,
    subtitle: Option<String>,
    display: Display,
}

impl Tile {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            subtitle: None,
            display: Display::Shown,
        }
    }

    pub fn untitled() -> Self {
        Self {
            title: None,
            subtitle: None,
            display: Display::Shown,
        }
    }

    /// Secondary line shown under the title. Not considered by the filter.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn display(&self) -> Display {
        self.display
    }

    pub fn is_visible(&self) -> bool {
        self.display == Display::Shown
    }

    pub(crate) fn set_display(&mut self, display: Display) {
        self.display = display;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tile_is_shown() {
        let tile = Tile::new("default");
        assert!(tile.is_visible());
        assert_eq!(tile.title(), Some("default"));
        assert_eq!(tile.subtitle(), None);
    }

    #[test]
    fn test_untitled_tile_has_no_title() {
        let tile = Tile::untitled().with_subtitle("3 items");
        assert_eq!(tile.title(), None);
        assert_eq!(tile.subtitle(), Some("3 items"));
    }

    #[test]
    fn test_set_display_hidden() {
        let mut tile = Tile::new("kube-system");
        tile.set_display(Display::Hidden);
        assert!(!tile.is_visible());
        assert_eq!(tile.display(), Display::Hidden);
    }
}
