//! Destination tree scaffolding
//!
//! Plans and writes the generated application's directory tree, recording
//! one entry per created directory and file. The recorded entries are the
//! contract the CLI prints as `   create : <path>` lines, and
//! [`parse_created_files`] is the inverse used by callers that scrape the
//! generator's stdout.

use crate::errors::{Result, ScaffoldError};
use crate::manifest;
use crate::naming::app_name_from_dir;
use crate::templates::{self, CssEngine, ViewEngine};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Options selecting what the scaffolder generates
#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    /// View engine, or None for a static public/index.html
    pub view: Option<ViewEngine>,
    /// CSS preprocessor
    pub css: CssEngine,
    /// Write a .gitignore
    pub git: bool,
    /// Emit var/function style JavaScript
    pub es5: bool,
    /// Allow generating into a non-empty directory
    pub force: bool,
}

/// Outcome of a scaffold run
#[derive(Debug)]
pub struct ScaffoldReport {
    /// Package name derived from the destination directory
    pub app_name: String,
    /// Created directories and files, in creation order, relative to the
    /// invocation directory (prefixed when a directory argument was given)
    pub entries: Vec<String>,
}

struct TreeWriter {
    dest: PathBuf,
    prefix: String,
    entries: Vec<String>,
}

impl TreeWriter {
    fn dir(&mut self, rel: &str) -> Result<()> {
        let path = self.dest.join(rel);
        fs::create_dir_all(&path).map_err(|source| ScaffoldError::Create {
            path: path.display().to_string(),
            source,
        })?;
        self.entries.push(format!("{}{}", self.prefix, rel));
        Ok(())
    }

    fn file(&mut self, rel: &str, content: &str) -> Result<()> {
        let path = self.dest.join(rel);
        fs::write(&path, content).map_err(|source| ScaffoldError::Create {
            path: path.display().to_string(),
            source,
        })?;
        self.entries.push(format!("{}{}", self.prefix, rel));
        Ok(())
    }

    #[cfg(unix)]
    fn make_executable(&self, rel: &str) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let path = self.dest.join(rel);
        let mut perms = fs::metadata(&path)
            .map_err(ScaffoldError::Io)?
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).map_err(ScaffoldError::Io)?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn make_executable(&self, _rel: &str) -> Result<()> {
        Ok(())
    }
}

/// Scaffold a starter application into `dest`
///
/// `dest_display` is the path exactly as the user supplied it (`.` when the
/// generator runs against the current directory); it controls the prefix on
/// reported entries and whether the destination directory itself counts as
/// a created entry.
///
/// The destination must be empty (or absent) unless `opts.force` is set.
#[instrument(skip(opts), fields(dest = %dest.display()))]
pub fn scaffold(dest: &Path, dest_display: &str, opts: &ScaffoldOptions) -> Result<ScaffoldReport> {
    let app_name = app_name_from_dir(dest);
    debug!("Scaffolding application {:?}", app_name);

    let prefix = if dest_display == "." {
        String::new()
    } else {
        format!("{}/", dest_display.trim_end_matches('/'))
    };

    let mut writer = TreeWriter {
        dest: dest.to_path_buf(),
        prefix,
        entries: Vec::new(),
    };

    if dest.exists() {
        if !dest.is_dir() {
            return Err(ScaffoldError::NotADirectory {
                path: dest.display().to_string(),
            }
            .into());
        }
        let occupied = fs::read_dir(dest)
            .map_err(ScaffoldError::Io)?
            .next()
            .is_some();
        if occupied && !opts.force {
            return Err(ScaffoldError::DestinationNotEmpty {
                path: dest.display().to_string(),
            }
            .into());
        }
    } else {
        fs::create_dir_all(dest).map_err(|source| ScaffoldError::Create {
            path: dest.display().to_string(),
            source,
        })?;
    }

    // The destination itself counts as an entry whenever a directory
    // argument was given, whether or not it had to be created.
    if !writer.prefix.is_empty() {
        writer
            .entries
            .push(writer.prefix.trim_end_matches('/').to_string());
    }

    let (style_name, style_content) = opts.css.stylesheet();

    writer.dir("public")?;
    writer.dir("public/javascripts")?;
    writer.dir("public/images")?;
    writer.dir("public/stylesheets")?;
    writer.file(&format!("public/stylesheets/{style_name}"), style_content)?;

    writer.dir("routes")?;
    writer.file(
        "routes/index.js",
        &templates::routes_index_js(opts.view, opts.es5),
    )?;
    writer.file("routes/users.js", &templates::routes_users_js(opts.es5))?;

    match opts.view {
        Some(engine) => {
            writer.dir("views")?;
            for (name, content) in engine.view_files() {
                writer.file(&format!("views/{name}"), content)?;
            }
        }
        None => {
            writer.file("public/index.html", templates::INDEX_HTML)?;
        }
    }

    writer.file("app.js", &templates::app_js(opts.view, opts.css, opts.es5))?;

    if opts.git {
        writer.file(".gitignore", templates::GITIGNORE)?;
    }

    writer.file(
        "package.json",
        &manifest::package_json(&app_name, opts.view, opts.css),
    )?;

    writer.dir("bin")?;
    writer.file("bin/www", &templates::www_js(&app_name, opts.es5))?;
    writer.make_executable("bin/www")?;

    debug!("Created {} entries", writer.entries.len());
    Ok(ScaffoldReport {
        app_name,
        entries: writer.entries,
    })
}

static CREATE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*create : (.+)$").unwrap());

/// Extract the created-entry paths from generator stdout
///
/// Scans for `create : <path>` lines and returns the paths in order, with
/// any trailing directory slash removed. Everything else on stdout (the
/// next-step instructions) is ignored.
pub fn parse_created_files(stdout: &str) -> Vec<String> {
    CREATE_LINE
        .captures_iter(stdout)
        .map(|cap| cap[1].trim().trim_end_matches('/').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scaffold_into_temp(opts: &ScaffoldOptions) -> (TempDir, ScaffoldReport) {
        let tmp = TempDir::new().unwrap();
        let report = scaffold(tmp.path(), ".", opts).unwrap();
        (tmp, report)
    }

    #[test]
    fn test_default_scaffold_has_sixteen_entries() {
        let (tmp, report) = scaffold_into_temp(&ScaffoldOptions {
            view: Some(ViewEngine::Jade),
            ..Default::default()
        });
        assert_eq!(report.entries.len(), 16);
        assert!(report.entries.contains(&"bin/www".to_string()));
        assert!(report.entries.contains(&"app.js".to_string()));
        assert!(report.entries.contains(&"package.json".to_string()));
        assert!(report.entries.contains(&"views/layout.jade".to_string()));
        assert!(tmp.path().join("bin/www").exists());
    }

    #[test]
    fn test_dir_prefix_adds_entry_for_directory() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("foo");
        let report = scaffold(
            &dest,
            "foo",
            &ScaffoldOptions {
                view: Some(ViewEngine::Jade),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(report.entries.len(), 17);
        assert_eq!(report.entries[0], "foo");
        assert!(report.entries.contains(&"foo/bin/www".to_string()));
        assert_eq!(report.app_name, "foo");
    }

    #[test]
    fn test_existing_empty_directory_still_counts_as_entry() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("foo");
        fs::create_dir(&dest).unwrap();

        let report = scaffold(
            &dest,
            "foo",
            &ScaffoldOptions {
                view: Some(ViewEngine::Jade),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(report.entries.len(), 17);
        assert_eq!(report.entries[0], "foo");
    }

    #[test]
    fn test_no_view_scaffold() {
        let (tmp, report) = scaffold_into_temp(&ScaffoldOptions::default());
        assert_eq!(report.entries.len(), 13);
        assert!(report.entries.contains(&"public/index.html".to_string()));
        assert!(!report.entries.iter().any(|e| e.starts_with("views")));
        assert!(!tmp.path().join("views").exists());
    }

    #[test]
    fn test_git_adds_gitignore() {
        let (_tmp, report) = scaffold_into_temp(&ScaffoldOptions {
            view: Some(ViewEngine::Jade),
            git: true,
            ..Default::default()
        });
        assert_eq!(report.entries.len(), 17);
        assert!(report.entries.contains(&".gitignore".to_string()));
    }

    #[test]
    fn test_engines_without_layout_have_fifteen_entries() {
        for engine in [ViewEngine::Ejs, ViewEngine::Hjs, ViewEngine::Dust] {
            let (_tmp, report) = scaffold_into_temp(&ScaffoldOptions {
                view: Some(engine),
                ..Default::default()
            });
            assert_eq!(report.entries.len(), 15, "engine {engine:?}");
        }
    }

    #[test]
    fn test_css_engine_style_file() {
        let (tmp, report) = scaffold_into_temp(&ScaffoldOptions {
            view: Some(ViewEngine::Jade),
            css: CssEngine::Less,
            ..Default::default()
        });
        assert_eq!(report.entries.len(), 16);
        assert!(report
            .entries
            .contains(&"public/stylesheets/style.less".to_string()));
        assert!(tmp.path().join("public/stylesheets/style.less").exists());
    }

    #[test]
    fn test_non_empty_destination_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("existing.txt"), "occupied").unwrap();

        let result = scaffold(
            tmp.path(),
            ".",
            &ScaffoldOptions {
                view: Some(ViewEngine::Jade),
                ..Default::default()
            },
        );
        assert!(matches!(
            result,
            Err(crate::errors::StencilError::Scaffold(
                ScaffoldError::DestinationNotEmpty { .. }
            ))
        ));
    }

    #[test]
    fn test_force_overrides_non_empty_destination() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("existing.txt"), "occupied").unwrap();

        let report = scaffold(
            tmp.path(),
            ".",
            &ScaffoldOptions {
                view: Some(ViewEngine::Jade),
                force: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(report.entries.len(), 16);
    }

    #[test]
    fn test_parse_created_files() {
        let stdout = "\n   create : foo\n   create : foo/public/\n   create : foo/app.js\n\n   install dependencies:\n     $ npm install\n";
        let files = parse_created_files(stdout);
        assert_eq!(files, vec!["foo", "foo/public", "foo/app.js"]);
    }

    #[test]
    fn test_parse_created_files_ignores_instructions() {
        assert!(parse_created_files("run the app:\n  $ npm start\n").is_empty());
    }
}
