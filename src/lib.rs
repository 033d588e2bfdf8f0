mod assets;
mod builtin;
mod cli;
pub mod confidence;
pub mod dom;
mod html;
pub mod storage;
mod strict;
pub mod theme;

use std::path::Path;

use anyhow::Context as _;
use assets::AssetStore;
use dom::Page;
use storage::{FileStore, KeyValueStore};

pub use cli::{Args as CliArgs, Command, Mode};
pub use confidence::{BarState, ConfidenceBand, ConfidenceReading};
pub use storage::MemoryStore;
pub use theme::ThemePreference;

pub fn run(args: CliArgs) -> anyhow::Result<()> {
    match args.command {
        Command::Render {
            name,
            confidence,
            image,
            mode,
            out,
            assets_dir_name,
        } => {
            let store = FileStore::open(&args.store)?;
            render(
                &RenderRequest {
                    name: &name,
                    confidence,
                    image: image.as_deref(),
                    mode,
                    out: &out,
                    assets_dir_name: &assets_dir_name,
                },
                &store,
            )
        }
        Command::Hydrate { input, out } => {
            let store = FileStore::open(&args.store)?;
            let html = read_page(&input)?;
            let hydrated = hydrate_html(&html, &store)?;
            let out = out.unwrap_or(input);
            write_page(&out, &hydrated)
        }
        Command::Toggle { page } => {
            let mut store = FileStore::open(&args.store)?;
            let theme = match page {
                Some(path) => {
                    let html = read_page(&path)?;
                    let page = Page::parse(&html);
                    let Some(theme) = theme::click(&page, &mut store)? else {
                        anyhow::bail!("{} has no #{} button", path.display(), theme::TOGGLE_ID);
                    };
                    write_page(&path, &page.to_html()?)?;
                    theme
                }
                None => theme::toggle_stored(&mut store)?,
            };
            println!("{} {}", theme.as_str(), theme.label());
            Ok(())
        }
        Command::Theme => {
            let store = FileStore::open(&args.store)?;
            let theme = theme::load(&store)?;
            println!("{} {}", theme.as_str(), theme.label());
            Ok(())
        }
        Command::Confidence { raw } => {
            let state = ConfidenceReading::parse(&raw).bar_state();
            let json = serde_json::to_string(&state).context("encode bar state")?;
            println!("{json}");
            Ok(())
        }
    }
}

pub struct RenderRequest<'a> {
    pub name: &'a str,
    pub confidence: f64,
    pub image: Option<&'a Path>,
    pub mode: Mode,
    pub out: &'a Path,
    pub assets_dir_name: &'a str,
}

/// Builds the result page, checks it, hydrates it and writes it to `req.out`.
pub fn render(req: &RenderRequest<'_>, store: &impl KeyValueStore) -> anyhow::Result<()> {
    let out_dir = req
        .out
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| ".".into());

    let assets = match req.mode {
        Mode::Single => AssetStore::new_single(),
        Mode::Dir => AssetStore::new_dir(out_dir, req.assets_dir_name.to_string()),
    };
    let image_src = req
        .image
        .map(|path| assets.store_image(path))
        .transpose()?;

    tracing::info!(
        name = req.name,
        confidence = req.confidence,
        mode = ?req.mode,
        "rendering result page"
    );
    let html = html::build_result_html(&html::ResultPage {
        name: req.name,
        confidence: req.confidence,
        image_src: image_src.as_deref(),
    });

    let page = Page::parse(&html);
    strict::assert_page_contract(&page)?;
    hydrate_page(&page, store)?;
    write_page(req.out, &page.to_html()?)
}

/// Page-ready pass over an HTML document: confidence bar first, then theme.
pub fn hydrate_html(html: &str, store: &impl KeyValueStore) -> anyhow::Result<String> {
    let page = Page::parse(html);
    hydrate_page(&page, store)?;
    page.to_html()
}

fn hydrate_page(page: &Page, store: &impl KeyValueStore) -> anyhow::Result<()> {
    if let Some(reading) = confidence::hydrate(page) {
        tracing::info!(text = %reading.text(), band = ?reading.band(), "confidence bar hydrated");
    }
    let theme = theme::hydrate(page, store)?;
    tracing::info!(theme = theme.as_str(), "theme hydrated");
    Ok(())
}

fn read_page(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn write_page(path: &Path, html: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    std::fs::write(path, html).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote page");
    Ok(())
}
