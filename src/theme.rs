//! Light/dark theme toggle persisted under the `theme` store key.

use crate::dom::{self, Page};
use crate::storage::KeyValueStore;

pub const STORAGE_KEY: &str = "theme";
pub const TOGGLE_ID: &str = "theme-toggle";
pub const DARK_CLASS: &str = "dark-mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// Only the exact string `"dark"` selects dark; anything else, including nothing, is light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => ThemePreference::Dark,
            _ => ThemePreference::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemePreference::Light => "☀️ Light",
            ThemePreference::Dark => "🌙 Dark",
        }
    }
}

pub fn load(store: &impl KeyValueStore) -> anyhow::Result<ThemePreference> {
    let stored = store.get(STORAGE_KEY)?;
    Ok(ThemePreference::from_stored(stored.as_deref()))
}

pub fn save(store: &mut impl KeyValueStore, theme: ThemePreference) -> anyhow::Result<()> {
    store.set(STORAGE_KEY, theme.as_str())
}

/// Sets the body class and the toggle label for `theme`.
pub fn apply(page: &Page, theme: ThemePreference) {
    match page.body() {
        Some(body) => dom::set_class(&body, DARK_CLASS, theme == ThemePreference::Dark),
        None => tracing::debug!("page has no body; theme class not applied"),
    }
    match page.element_by_id(TOGGLE_ID) {
        Some(button) => dom::set_text(&button, theme.label()),
        None => tracing::debug!("#{TOGGLE_ID} absent; label not updated"),
    }
}

/// Page-ready pass: restores the persisted theme onto the page.
pub fn hydrate(page: &Page, store: &impl KeyValueStore) -> anyhow::Result<ThemePreference> {
    let theme = load(store)?;
    apply(page, theme);
    tracing::debug!(theme = theme.as_str(), "theme applied");
    Ok(theme)
}

/// A click on the toggle button: flips the body class, persists the result
/// and relabels the button. Returns `None` when the page has no toggle button.
pub fn click(
    page: &Page,
    store: &mut impl KeyValueStore,
) -> anyhow::Result<Option<ThemePreference>> {
    if page.element_by_id(TOGGLE_ID).is_none() {
        return Ok(None);
    }
    let Some(body) = page.body() else {
        return Ok(None);
    };

    let theme = if dom::toggle_class(&body, DARK_CLASS) {
        ThemePreference::Dark
    } else {
        ThemePreference::Light
    };
    save(store, theme)?;
    apply(page, theme);
    tracing::info!(theme = theme.as_str(), "theme toggled");
    Ok(Some(theme))
}

/// Flips the persisted preference without a page.
pub fn toggle_stored(store: &mut impl KeyValueStore) -> anyhow::Result<ThemePreference> {
    let theme = load(store)?.toggled();
    save(store, theme)?;
    tracing::info!(theme = theme.as_str(), "stored theme toggled");
    Ok(theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const PAGE: &str = r#"<html><body><button id="theme-toggle">?</button></body></html>"#;

    fn label(page: &Page) -> String {
        page.element_by_id(TOGGLE_ID).unwrap().text_contents()
    }

    fn is_dark(page: &Page) -> bool {
        dom::has_class(&page.body().unwrap(), DARK_CLASS)
    }

    #[test]
    fn stored_value_parsing() {
        assert_eq!(ThemePreference::from_stored(None), ThemePreference::Light);
        assert_eq!(ThemePreference::from_stored(Some("light")), ThemePreference::Light);
        assert_eq!(ThemePreference::from_stored(Some("Dark")), ThemePreference::Light);
        assert_eq!(ThemePreference::from_stored(Some("dark")), ThemePreference::Dark);
    }

    #[test]
    fn first_load_click_reload() {
        let mut store = MemoryStore::new();

        let page = Page::parse(PAGE);
        assert_eq!(hydrate(&page, &store).unwrap(), ThemePreference::Light);
        assert!(!is_dark(&page));
        assert_eq!(label(&page), ThemePreference::Light.label());

        assert_eq!(click(&page, &mut store).unwrap(), Some(ThemePreference::Dark));
        assert!(is_dark(&page));
        assert_eq!(label(&page), ThemePreference::Dark.label());
        assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("dark"));

        let reloaded = Page::parse(PAGE);
        assert_eq!(hydrate(&reloaded, &store).unwrap(), ThemePreference::Dark);
        assert!(is_dark(&reloaded));
        assert_eq!(label(&reloaded), ThemePreference::Dark.label());
    }

    #[test]
    fn click_follows_body_class() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "light").unwrap();
        let page = Page::parse(
            r#"<html><body class="dark-mode"><button id="theme-toggle"></button></body></html>"#,
        );
        assert_eq!(click(&page, &mut store).unwrap(), Some(ThemePreference::Light));
        assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn click_without_button_does_nothing() {
        let mut store = MemoryStore::new();
        let page = Page::parse("<html><body><p>no toggle</p></body></html>");
        assert_eq!(click(&page, &mut store).unwrap(), None);
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
        assert!(!is_dark(&page));
    }

    #[test]
    fn stored_toggle_round_trips() {
        let mut store = MemoryStore::new();
        assert_eq!(toggle_stored(&mut store).unwrap(), ThemePreference::Dark);
        assert_eq!(toggle_stored(&mut store).unwrap(), ThemePreference::Light);
        assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("light"));
    }
}
