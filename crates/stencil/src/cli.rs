//! Command-line interface definition
//!
//! The generator is a single-action CLI: every invocation scaffolds an
//! application into the target directory. Flags select the view engine,
//! CSS preprocessor, and output style.

use clap::{Parser, ValueEnum};
use stencil_core::templates::{CssEngine, ViewEngine};

/// Express-style web application generator
#[derive(Debug, Parser)]
#[command(
    name = "stencil",
    version,
    about = "Generate an Express-style web application skeleton"
)]
pub struct Cli {
    /// Destination directory for the generated application
    #[arg(value_name = "dir", default_value = ".")]
    pub dir: String,

    /// View engine to wire into the generated application
    #[arg(long, value_name = "engine", conflicts_with = "no_view")]
    pub view: Option<ViewArg>,

    /// Add ejs engine support (renamed to --view=ejs)
    #[arg(long, conflicts_with_all = ["view", "no_view"])]
    pub ejs: bool,

    /// Add handlebars engine support (renamed to --view=hbs)
    #[arg(long, conflicts_with_all = ["view", "no_view"])]
    pub hbs: bool,

    /// Add hogan.js engine support (renamed to --view=hjs)
    #[arg(long, conflicts_with_all = ["view", "no_view"])]
    pub hogan: bool,

    /// Add pug engine support (renamed to --view=pug)
    #[arg(long, conflicts_with_all = ["view", "no_view"])]
    pub pug: bool,

    /// Use static html instead of a view engine
    #[arg(long)]
    pub no_view: bool,

    /// Add stylesheet preprocessor support (plain css when omitted)
    #[arg(long, value_name = "engine")]
    pub css: Option<CssArg>,

    /// Add a .gitignore
    #[arg(long)]
    pub git: bool,

    /// Generate ES5-compatible JavaScript (var/function style)
    #[arg(long)]
    pub es5: bool,

    /// Generate into a non-empty directory
    #[arg(short, long)]
    pub force: bool,
}

/// View engines accepted by `--view`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Dust,
    Ejs,
    Hbs,
    Hjs,
    Jade,
    Pug,
    Twig,
    Vash,
}

impl From<ViewArg> for ViewEngine {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Dust => ViewEngine::Dust,
            ViewArg::Ejs => ViewEngine::Ejs,
            ViewArg::Hbs => ViewEngine::Hbs,
            ViewArg::Hjs => ViewEngine::Hjs,
            ViewArg::Jade => ViewEngine::Jade,
            ViewArg::Pug => ViewEngine::Pug,
            ViewArg::Twig => ViewEngine::Twig,
            ViewArg::Vash => ViewEngine::Vash,
        }
    }
}

/// Stylesheet preprocessors accepted by `--css`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CssArg {
    Less,
    Sass,
    Stylus,
}

impl From<CssArg> for CssEngine {
    fn from(arg: CssArg) -> Self {
        match arg {
            CssArg::Less => CssEngine::Less,
            CssArg::Sass => CssEngine::Sass,
            CssArg::Stylus => CssEngine::Stylus,
        }
    }
}

/// How the view engine was chosen, so the command layer can emit the
/// right notice for legacy flags and the jade default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSelection {
    /// `--view <engine>` was given explicitly
    Explicit(ViewEngine),
    /// A renamed shorthand flag was given; carries the old flag name
    Renamed(ViewEngine, &'static str),
    /// `--no-view` was given
    Static,
    /// No view flag at all; jade applies with a deprecation notice
    DefaultJade,
}

impl Cli {
    /// Resolve the view-engine flags into a single selection.
    ///
    /// Shorthand flags keep their historical priority order: when several
    /// are combined the last one in this chain wins.
    pub fn view_selection(&self) -> ViewSelection {
        if self.no_view {
            return ViewSelection::Static;
        }
        if let Some(arg) = self.view {
            return ViewSelection::Explicit(arg.into());
        }
        let mut renamed = None;
        if self.ejs {
            renamed = Some((ViewEngine::Ejs, "--ejs"));
        }
        if self.hbs {
            renamed = Some((ViewEngine::Hbs, "--hbs"));
        }
        if self.hogan {
            renamed = Some((ViewEngine::Hjs, "--hogan"));
        }
        if self.pug {
            renamed = Some((ViewEngine::Pug, "--pug"));
        }
        match renamed {
            Some((engine, flag)) => ViewSelection::Renamed(engine, flag),
            None => ViewSelection::DefaultJade,
        }
    }

    /// CSS engine, defaulting to plain css when the flag is absent.
    pub fn css_engine(&self) -> CssEngine {
        self.css.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stencil").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_current_directory_and_jade() {
        let cli = parse(&[]);
        assert_eq!(cli.dir, ".");
        assert_eq!(cli.view_selection(), ViewSelection::DefaultJade);
        assert_eq!(cli.css_engine(), CssEngine::Plain);
        assert!(!cli.git);
        assert!(!cli.es5);
        assert!(!cli.force);
    }

    #[test]
    fn explicit_view_wins() {
        let cli = parse(&["--view", "pug"]);
        assert_eq!(
            cli.view_selection(),
            ViewSelection::Explicit(ViewEngine::Pug)
        );
    }

    #[test]
    fn renamed_flags_resolve_with_notice() {
        let cli = parse(&["--hogan"]);
        assert_eq!(
            cli.view_selection(),
            ViewSelection::Renamed(ViewEngine::Hjs, "--hogan")
        );
    }

    #[test]
    fn no_view_selects_static_output() {
        let cli = parse(&["--no-view"]);
        assert_eq!(cli.view_selection(), ViewSelection::Static);
    }

    #[test]
    fn view_conflicts_with_no_view() {
        let result = Cli::try_parse_from(["stencil", "--view", "ejs", "--no-view"]);
        assert!(result.is_err());
    }

    #[test]
    fn css_flag_parses_each_engine() {
        assert_eq!(parse(&["--css", "less"]).css_engine(), CssEngine::Less);
        assert_eq!(parse(&["--css", "sass"]).css_engine(), CssEngine::Sass);
        assert_eq!(parse(&["--css", "stylus"]).css_engine(), CssEngine::Stylus);
    }

    #[test]
    fn directory_argument_is_positional() {
        let cli = parse(&["my-app", "--git"]);
        assert_eq!(cli.dir, "my-app");
        assert!(cli.git);
    }
}
