use crate::confidence::{BAR_ID, CONFIDENCE_ATTR, TEXT_ID};
use crate::dom::{self, Page};
use crate::theme::TOGGLE_ID;

/// Checks a rendered result page before it is hydrated and written: the
/// component hooks must exist and nothing may load from outside the page.
pub fn assert_page_contract(page: &Page) -> anyhow::Result<()> {
    assert_hooks(page)?;
    assert_offline(page)?;
    Ok(())
}

fn assert_hooks(page: &Page) -> anyhow::Result<()> {
    let Some(bar) = page.element_by_id(BAR_ID) else {
        anyhow::bail!("page contract failed: missing #{BAR_ID}");
    };
    if dom::attr(&bar, CONFIDENCE_ATTR).is_none() {
        anyhow::bail!("page contract failed: #{BAR_ID} has no {CONFIDENCE_ATTR}");
    }
    for id in [TEXT_ID, TOGGLE_ID] {
        if page.element_by_id(id).is_none() {
            anyhow::bail!("page contract failed: missing #{id}");
        }
    }
    Ok(())
}

fn assert_offline(page: &Page) -> anyhow::Result<()> {
    for (selector, attr) in [
        ("img", "src"),
        ("script", "src"),
        ("link", "href"),
        ("iframe", "src"),
    ] {
        for el in page.select_all(selector) {
            if let Some(v) = dom::attr(&el, attr) {
                if is_disallowed_autoload(&v) {
                    anyhow::bail!(
                        "page contract failed: <{} {}=\"{}\"> is not local",
                        selector,
                        attr,
                        v
                    );
                }
            }
        }
    }
    Ok(())
}

fn is_disallowed_autoload(v: &str) -> bool {
    let s = v.trim();
    if s.is_empty() {
        return false;
    }
    let lowered = s.to_ascii_lowercase();
    if lowered.starts_with("data:") || lowered.starts_with("blob:") {
        return false;
    }
    lowered.starts_with("http://")
        || lowered.starts_with("https://")
        || s.starts_with("//")
        || s.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOOKS: &str = r#"<button id="theme-toggle"></button><div id="progress" data-confidence="0.5"></div><span id="confidence-value"></span>"#;

    #[test]
    fn accepts_local_page() {
        let page = Page::parse(&format!(r#"{HOOKS}<img src="assets/img/a.png">"#));
        assert_page_contract(&page).unwrap();
    }

    #[test]
    fn rejects_remote_image() {
        let page = Page::parse(&format!(r#"{HOOKS}<img src="https://cdn.example.com/a.png">"#));
        let err = assert_page_contract(&page).unwrap_err().to_string();
        assert!(err.contains("is not local"), "{err}");
    }

    #[test]
    fn rejects_missing_hook() {
        let page = Page::parse(r#"<div id="progress" data-confidence="1"></div>"#);
        let err = assert_page_contract(&page).unwrap_err().to_string();
        assert!(err.contains("#confidence-value"), "{err}");
    }
}
