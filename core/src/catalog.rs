#[derive(Clone, Copy, Debug)]
pub struct GameCatalogEntry {
    pub label: &'static str,
    pub slug: &'static str,
    pub tagline: &'static str,
}

pub const DEFAULT_GAME_SLUG: &str = "gem-swap";

pub const GAME_CATALOG: &[GameCatalogEntry] = &[
    GameCatalogEntry {
        label: "Gem Swap",
        slug: "gem-swap",
        tagline: "swap neighbors, chase cascades",
    },
    GameCatalogEntry {
        label: "Gem Columns",
        slug: "gem-columns",
        tagline: "stack falling triples before the well fills",
    },
    GameCatalogEntry {
        label: "Color Sense",
        slug: "color-sense",
        tagline: "a timed color-theory quiz",
    },
    GameCatalogEntry {
        label: "Coloring Book",
        slug: "coloring-book",
        tagline: "flood-fill painting with undo",
    },
];

pub fn game_by_slug(slug: &str) -> Option<&'static GameCatalogEntry> {
    let trimmed = slug.trim();
    GAME_CATALOG
        .iter()
        .find(|entry| entry.slug.eq_ignore_ascii_case(trimmed))
}

pub fn game_by_label(label: &str) -> Option<&'static GameCatalogEntry> {
    let trimmed = label.trim();
    GAME_CATALOG
        .iter()
        .find(|entry| entry.label.eq_ignore_ascii_case(trimmed))
}
