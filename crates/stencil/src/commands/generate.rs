//! Application generation
//!
//! Turns parsed CLI flags into a scaffold run, then renders the report:
//! one `create :` line per entry plus the follow-up instructions for
//! installing dependencies and starting the app.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use stencil_core::scaffold::{scaffold, ScaffoldOptions, ScaffoldReport};
use stencil_core::templates::ViewEngine;

use crate::cli::{Cli, ViewSelection};

pub fn execute(cli: &Cli) -> Result<()> {
    let selection = cli.view_selection();
    emit_view_notice(&selection);

    let opts = ScaffoldOptions {
        view: match selection {
            ViewSelection::Explicit(engine) | ViewSelection::Renamed(engine, _) => Some(engine),
            ViewSelection::Static => None,
            ViewSelection::DefaultJade => Some(ViewEngine::Jade),
        },
        css: cli.css_engine(),
        git: cli.git,
        es5: cli.es5,
        force: cli.force,
    };

    debug!(dir = %cli.dir, ?opts, "Generating application skeleton");
    let report = scaffold(Path::new(&cli.dir), &cli.dir, &opts)
        .with_context(|| format!("Failed to generate application in {:?}", cli.dir))?;

    print_report(&report, &cli.dir);
    Ok(())
}

fn emit_view_notice(selection: &ViewSelection) {
    match selection {
        ViewSelection::Renamed(engine, flag) => {
            eprintln!();
            eprintln!(
                "  warning: option `{flag}' has been renamed to `--view={}'",
                engine.as_str()
            );
            eprintln!();
        }
        ViewSelection::DefaultJade => {
            eprintln!();
            eprintln!("  warning: the default view engine will not be jade in future releases");
            eprintln!("  warning: use `--view=jade' or `--help' for additional options");
            eprintln!();
        }
        ViewSelection::Explicit(_) | ViewSelection::Static => {}
    }
}

fn print_report(report: &ScaffoldReport, dir: &str) {
    println!();
    for entry in &report.entries {
        println!("   create : {entry}");
    }

    if dir != "." {
        println!();
        println!("   change directory:");
        println!("     $ cd {dir}");
    }

    println!();
    println!("   install dependencies:");
    println!("     $ npm install");

    println!();
    println!("   run the app:");
    if cfg!(windows) {
        println!("     > SET DEBUG={}:* & npm start", report.app_name);
    } else {
        println!("     $ DEBUG={}:* npm start", report.app_name);
    }
    println!();
}
