use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// HTML page plus an assets/ directory beside it.
    Dir,
    /// One self-contained HTML file with the photo inlined.
    Single,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// JSON file holding persisted UI preferences (the `theme` key).
    #[arg(
        long,
        global = true,
        env = "RECOGNITION_UI_STORE",
        default_value = "recognition-ui.json"
    )]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a result page for one recognition and hydrate it.
    Render {
        /// Recognized name shown on the page.
        #[arg(long)]
        name: String,

        /// Confidence score, either a fraction (0.87) or a percentage (87).
        #[arg(long, allow_negative_numbers = true)]
        confidence: f64,

        /// Local photo to show above the result.
        #[arg(long)]
        image: Option<PathBuf>,

        /// Output mode: `single` (one self-contained HTML) or `dir` (HTML + assets/).
        #[arg(long, value_enum, default_value = "single")]
        mode: Mode,

        /// Output HTML file path.
        #[arg(long, default_value = "result.html")]
        out: PathBuf,

        /// Assets directory name for `dir` mode.
        #[arg(long, default_value = "assets")]
        assets_dir_name: String,
    },

    /// Run the page-ready pass (confidence bar and theme) over an existing HTML file.
    Hydrate {
        /// HTML file to hydrate.
        #[arg(long)]
        input: PathBuf,

        /// Output path; defaults to rewriting the input in place.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Click the theme toggle: flip the theme and persist it.
    Toggle {
        /// Page to click on; rewritten in place. Without it only the stored preference flips.
        #[arg(long)]
        page: Option<PathBuf>,
    },

    /// Print the persisted theme.
    Theme,

    /// Print the bar state for a raw `data-confidence` value as JSON.
    Confidence {
        /// Raw attribute value, e.g. `0.87`, `87` or `87%`.
        #[arg(allow_hyphen_values = true)]
        raw: String,
    },
}
