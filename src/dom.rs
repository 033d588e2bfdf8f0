use anyhow::Context as _;
use kuchiki::traits::TendrilSink as _;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

pub type Element = NodeDataRef<ElementData>;

/// A parsed HTML document the page components operate on.
pub struct Page {
    document: NodeRef,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: kuchiki::parse_html().one(html),
        }
    }

    pub fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.select_first(&format!("#{id}")).ok()
    }

    pub fn select_all(&self, selector: &str) -> Vec<Element> {
        match self.document.select(selector) {
            Ok(nodes) => nodes.collect(),
            Err(()) => Vec::new(),
        }
    }

    pub fn body(&self) -> Option<Element> {
        self.document.select_first("body").ok()
    }

    pub fn to_html(&self) -> anyhow::Result<String> {
        let mut out = Vec::new();
        self.document
            .serialize(&mut out)
            .context("serialize page")?;
        String::from_utf8(out).context("page html not utf-8")
    }
}

pub fn attr(el: &Element, name: &str) -> Option<String> {
    el.attributes.borrow().get(name).map(|s| s.to_string())
}

pub fn set_text(el: &Element, text: &str) {
    let node = el.as_node();
    for child in node.children().collect::<Vec<_>>() {
        child.detach();
    }
    node.append(NodeRef::new_text(text));
}

/// Sets one CSS property in the element's `style` attribute, keeping the others.
pub fn set_style_property(el: &Element, property: &str, value: &str) {
    let mut attrs = el.attributes.borrow_mut();
    let current = attrs.get("style").unwrap_or("").to_string();

    let mut decls = split_declarations(&current);
    match decls
        .iter_mut()
        .find(|(name, _)| name.eq_ignore_ascii_case(property))
    {
        Some(decl) => decl.1 = value.to_string(),
        None => decls.push((property.to_string(), value.to_string())),
    }

    let style = decls
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("; ");
    attrs.insert("style", style);
}

pub fn style_property(el: &Element, property: &str) -> Option<String> {
    let style = attr(el, "style")?;
    split_declarations(&style)
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(property))
        .map(|(_, value)| value)
}

pub fn has_class(el: &Element, class: &str) -> bool {
    el.attributes
        .borrow()
        .get("class")
        .is_some_and(|c| c.split_whitespace().any(|c| c == class))
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    let mut attrs = el.attributes.borrow_mut();
    let mut classes: Vec<String> = attrs
        .get("class")
        .unwrap_or("")
        .split_whitespace()
        .filter(|c| *c != class)
        .map(str::to_string)
        .collect();
    if on {
        classes.push(class.to_string());
    }
    if classes.is_empty() {
        attrs.remove("class");
    } else {
        attrs.insert("class", classes.join(" "));
    }
}

/// Flips `class` on the element and returns whether it is now present.
pub fn toggle_class(el: &Element, class: &str) -> bool {
    let on = !has_class(el, class);
    set_class(el, class, on);
    on
}

// Semicolons inside parentheses (e.g. `url(data:image/png;base64,...)`) do not end a declaration.
fn split_declarations(style: &str) -> Vec<(String, String)> {
    let mut decls = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in style.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                push_declaration(&mut decls, &style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_declaration(&mut decls, &style[start..]);
    decls
}

fn push_declaration(decls: &mut Vec<(String, String)>, raw: &str) {
    let Some((name, value)) = raw.split_once(':') else {
        return;
    };
    let name = name.trim();
    if name.is_empty() {
        return;
    }
    decls.push((name.to_string(), value.trim().to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_property_replaced_in_place() {
        let page = Page::parse(r#"<div id="bar" style="height: 8px; width: 10%"></div>"#);
        let bar = page.element_by_id("bar").unwrap();
        set_style_property(&bar, "width", "55%");
        set_style_property(&bar, "background", "red");
        assert_eq!(
            attr(&bar, "style").as_deref(),
            Some("height: 8px; width: 55%; background: red")
        );
    }

    #[test]
    fn style_split_respects_parentheses() {
        let decls = split_declarations("background: url(data:image/png;base64,AAA); color: red");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].1, "url(data:image/png;base64,AAA)");
    }

    #[test]
    fn class_toggling() {
        let page = Page::parse(r#"<body class="a"><p>x</p></body>"#);
        let body = page.body().unwrap();
        assert!(toggle_class(&body, "dark-mode"));
        assert_eq!(attr(&body, "class").as_deref(), Some("a dark-mode"));
        assert!(!toggle_class(&body, "dark-mode"));
        assert_eq!(attr(&body, "class").as_deref(), Some("a"));
    }

    #[test]
    fn set_text_replaces_children() {
        let page = Page::parse(r#"<span id="t"><b>old</b> text</span>"#);
        let t = page.element_by_id("t").unwrap();
        set_text(&t, "new");
        assert_eq!(t.text_contents(), "new");
    }
}
