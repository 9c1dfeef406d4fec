//! Package manifest generation
//!
//! Builds the package.json for a generated application. Field order is
//! fixed (name, version, private, scripts, dependencies) and dependencies
//! are sorted alphabetically, so the output is byte-for-byte deterministic
//! for a given option set.

use crate::templates::{CssEngine, ViewEngine};
use serde::Serialize;
use std::collections::BTreeMap;

const VERSION: &str = "0.0.0";
const START_SCRIPT: &str = "node ./bin/www";

/// Base runtime dependencies shared by every generated application
const BASE_DEPENDENCIES: &[(&str, &str)] = &[
    ("cookie-parser", "~1.4.4"),
    ("debug", "~2.6.9"),
    ("express", "~4.16.1"),
    ("morgan", "~1.9.1"),
];

#[derive(Serialize)]
struct PackageJson<'a> {
    name: &'a str,
    version: &'a str,
    private: bool,
    scripts: BTreeMap<&'a str, &'a str>,
    dependencies: BTreeMap<&'a str, &'a str>,
}

/// Render the package.json content for the given application options
///
/// The returned string is pretty-printed with two-space indentation and
/// ends with a newline.
pub fn package_json(name: &str, view: Option<ViewEngine>, css: CssEngine) -> String {
    let mut dependencies: BTreeMap<&str, &str> = BASE_DEPENDENCIES.iter().copied().collect();
    if let Some(engine) = view {
        // http-errors backs the 404 handler, which only exists with a view
        dependencies.insert("http-errors", "~1.6.3");
        for (pkg, version) in engine.dependencies() {
            dependencies.insert(pkg, version);
        }
    }
    for (pkg, version) in css.dependencies() {
        dependencies.insert(pkg, version);
    }

    let mut scripts = BTreeMap::new();
    scripts.insert("start", START_SCRIPT);

    let manifest = PackageJson {
        name,
        version: VERSION,
        private: true,
        scripts,
        dependencies,
    };

    // Serialization of this fixed shape cannot fail
    let mut rendered =
        serde_json::to_string_pretty(&manifest).unwrap_or_else(|_| String::from("{}"));
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest_exact_content() {
        let rendered = package_json("myapp", Some(ViewEngine::Jade), CssEngine::Plain);
        assert_eq!(
            rendered,
            "{\n".to_string()
                + "  \"name\": \"myapp\",\n"
                + "  \"version\": \"0.0.0\",\n"
                + "  \"private\": true,\n"
                + "  \"scripts\": {\n"
                + "    \"start\": \"node ./bin/www\"\n"
                + "  },\n"
                + "  \"dependencies\": {\n"
                + "    \"cookie-parser\": \"~1.4.4\",\n"
                + "    \"debug\": \"~2.6.9\",\n"
                + "    \"express\": \"~4.16.1\",\n"
                + "    \"http-errors\": \"~1.6.3\",\n"
                + "    \"jade\": \"~1.11.0\",\n"
                + "    \"morgan\": \"~1.9.1\"\n"
                + "  }\n"
                + "}\n"
        );
    }

    #[test]
    fn test_view_engine_dependency_present() {
        for (engine, pkg) in [
            (ViewEngine::Pug, "\"pug\""),
            (ViewEngine::Hbs, "\"hbs\""),
            (ViewEngine::Hjs, "\"hjs\""),
            (ViewEngine::Twig, "\"twig\""),
            (ViewEngine::Vash, "\"vash\""),
            (ViewEngine::Ejs, "\"ejs\""),
        ] {
            let rendered = package_json("app", Some(engine), CssEngine::Plain);
            assert!(rendered.contains(pkg), "{engine:?} manifest missing {pkg}");
        }

        let dust = package_json("app", Some(ViewEngine::Dust), CssEngine::Plain);
        assert!(dust.contains("\"dustjs-linkedin\""));
        assert!(dust.contains("\"adaro\""));
    }

    #[test]
    fn test_css_engine_dependency_present() {
        let less = package_json("app", Some(ViewEngine::Jade), CssEngine::Less);
        assert!(less.contains("\"less-middleware\""));

        let sass = package_json("app", Some(ViewEngine::Jade), CssEngine::Sass);
        assert!(sass.contains("\"node-sass-middleware\""));

        let stylus = package_json("app", Some(ViewEngine::Jade), CssEngine::Stylus);
        assert!(stylus.contains("\"stylus\""));
    }

    #[test]
    fn test_no_view_omits_view_dependencies() {
        let rendered = package_json("app", None, CssEngine::Plain);
        assert!(!rendered.contains("jade"));
        assert!(!rendered.contains("http-errors"));
        assert!(rendered.contains("\"express\""));
    }

    #[test]
    fn test_dependencies_sorted() {
        let rendered = package_json("app", Some(ViewEngine::Jade), CssEngine::Plain);
        let cookie = rendered.find("cookie-parser").unwrap();
        let debug = rendered.find("\"debug\"").unwrap();
        let express = rendered.find("\"express\"").unwrap();
        let morgan = rendered.find("\"morgan\"").unwrap();
        assert!(cookie < debug && debug < express && express < morgan);
    }
}
