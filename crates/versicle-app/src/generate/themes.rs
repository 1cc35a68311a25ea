//! Theme catalog
//!
//! The user-visible theme list is a subset of the full catalog. Picking
//! the sentinel resolves to a uniformly random catalog theme before any
//! prompt is built, so the sentinel string itself never reaches a prompt.

use rand::Rng;

/// Sentinel meaning "pick a theme for me"
pub const SURPRISE_THEME: &str = "Surprise me";

/// Themes offered directly in the UI
pub const VISIBLE_THEMES: &[&str] = &[
    "Hope",
    "Faith",
    "Gratitude",
    "Courage",
    "Peace",
    "Forgiveness",
    "Perseverance",
    "Love",
];

/// Full theme catalog, a superset of [`VISIBLE_THEMES`] that the
/// sentinel draws from
pub const THEME_CATALOG: &[&str] = &[
    "Hope",
    "Faith",
    "Gratitude",
    "Courage",
    "Peace",
    "Forgiveness",
    "Perseverance",
    "Love",
    "Wisdom",
    "Humility",
    "Patience",
    "Joy",
    "Trust",
    "Renewal",
    "Purpose",
    "Comfort",
];

/// Resolve a requested theme to a concrete one.
///
/// The sentinel becomes a uniformly random catalog theme; anything else
/// passes through unchanged.
pub fn resolve_theme(theme: &str) -> String {
    resolve_theme_with(&mut rand::thread_rng(), theme)
}

/// [`resolve_theme`] with an explicit RNG (used by tests)
pub fn resolve_theme_with<R: Rng>(rng: &mut R, theme: &str) -> String {
    if theme == SURPRISE_THEME {
        THEME_CATALOG[rng.gen_range(0..THEME_CATALOG.len())].to_string()
    } else {
        theme.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn visible_themes_are_in_catalog() {
        for theme in VISIBLE_THEMES {
            assert!(THEME_CATALOG.contains(theme), "{} missing from catalog", theme);
        }
    }

    #[test]
    fn catalog_is_a_strict_superset() {
        assert!(THEME_CATALOG.len() > VISIBLE_THEMES.len());
    }

    #[test]
    fn sentinel_is_not_a_theme() {
        assert!(!THEME_CATALOG.contains(&SURPRISE_THEME));
        assert!(!VISIBLE_THEMES.contains(&SURPRISE_THEME));
    }

    #[test]
    fn concrete_theme_passes_through() {
        assert_eq!(resolve_theme("Hope"), "Hope");
        // Even unknown themes pass through; the catalog only feeds the sentinel
        assert_eq!(resolve_theme("Stillness"), "Stillness");
    }

    #[test]
    fn sentinel_resolves_into_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let picked = resolve_theme_with(&mut rng, SURPRISE_THEME);
            assert_ne!(picked, SURPRISE_THEME);
            assert!(THEME_CATALOG.contains(&picked.as_str()));
        }
    }

    #[test]
    fn sentinel_draws_across_the_catalog() {
        // Uniform draw over 16 themes: 400 tries hit well more than one
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..400 {
            seen.insert(resolve_theme_with(&mut rng, SURPRISE_THEME));
        }
        assert!(seen.len() > THEME_CATALOG.len() / 2);
    }
}
