//! View discovery.
//!
//! A view pairs a SPARQL query with a page template. Each view is declared
//! in its own YAML file under the views root:
//!
//! ```yaml
//! output: posts/{{slug}}.html
//! template: templates/post.html
//! multipage_variable: slug
//! query: |
//!   SELECT ?slug ?title WHERE { ... }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use serde::Deserialize;

use crate::Error;

/// Whether a view produces a single page or one page per result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// One page; the template sees the full result set.
    Single,
    /// One page per row; the named column's value is substituted into the
    /// output pattern, and the template sees only that row.
    Multipage(String),
}

// On-disk shape of a view declaration file.
#[derive(Debug, Deserialize)]
struct ViewDeclaration {
    output: String,
    query: String,
    template: String,
    multipage_variable: Option<String>,
}

/// A discovered view, immutable for the duration of a build.
#[derive(Debug, Clone)]
pub struct ViewDescriptor {
    /// Derived from the declaration file name, minus its extension.
    pub name: String,
    /// Output path pattern, relative to the site root. In multipage mode it
    /// contains the `{{column}}` token for the multipage variable.
    pub output_pattern: String,
    /// Raw SPARQL text sent to the endpoint.
    pub query: String,
    /// The view's template file, relative to the project root.
    pub template_path: PathBuf,
    pub mode: OutputMode,
}

/// The substitution token a multipage column appears as in output patterns.
pub(crate) fn placeholder(column: &str) -> String {
    format!("{{{{{}}}}}", column)
}

impl ViewDescriptor {
    fn from_declaration(path: &Path, decl: ViewDeclaration) -> Result<Self, Error> {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| Error::CannotExtractFileName(path.to_path_buf()))?
            .to_string();
        if decl.output.trim().is_empty() {
            return Err(Error::ViewFieldEmpty(name, "output"));
        }
        if decl.query.trim().is_empty() {
            return Err(Error::ViewFieldEmpty(name, "query"));
        }
        if decl.template.trim().is_empty() {
            return Err(Error::ViewFieldEmpty(name, "template"));
        }
        let mode = match decl.multipage_variable {
            Some(column) => {
                if column.trim().is_empty() {
                    return Err(Error::ViewFieldEmpty(name, "multipage_variable"));
                }
                if !decl.output.contains(&placeholder(&column)) {
                    return Err(Error::MissingPlaceholder(name, column, decl.output));
                }
                OutputMode::Multipage(column)
            }
            None => {
                if decl.output.contains("{{") {
                    return Err(Error::UnexpectedPlaceholder(name, decl.output));
                }
                OutputMode::Single
            }
        };
        Ok(Self {
            name,
            output_pattern: decl.output,
            query: decl.query,
            template_path: PathBuf::from(decl.template),
            mode,
        })
    }
}

/// Discovers every view declared under the given root, in lexicographic
/// order so that build output and logs are reproducible across runs.
///
/// Any unreadable or malformed declaration aborts the build; partial site
/// generation from a broken configuration is not attempted.
pub fn discover_views<P: AsRef<Path>>(views_root: P) -> Result<Vec<ViewDescriptor>> {
    let pattern = views_root.as_ref().join("*.yaml");
    let mut views = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy()).map_err(Error::WalkPattern)? {
        let path = entry.map_err(Error::Walk)?;
        if !path.is_file() {
            continue;
        }
        let raw = fs::read_to_string(&path).map_err(|e| Error::ViewRead(path.clone(), e))?;
        let decl: ViewDeclaration =
            serde_yaml::from_str(&raw).map_err(|e| Error::ViewParse(path.clone(), e))?;
        let view = ViewDescriptor::from_declaration(&path, decl)?;
        debug!(
            "Discovered view {} ({})",
            view.name,
            match &view.mode {
                OutputMode::Single => "single page".to_string(),
                OutputMode::Multipage(column) => format!("multipage on \"{}\"", column),
            }
        );
        views.push(view);
    }
    Ok(views)
}

#[cfg(test)]
mod test {
    use super::*;

    fn write_view(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    const SINGLE: &str = "output: index.html\ntemplate: templates/index.html\nquery: SELECT ?a WHERE { ?a ?b ?c }\n";
    const MULTI: &str = "output: posts/{{slug}}.html\ntemplate: templates/post.html\nmultipage_variable: slug\nquery: SELECT ?slug WHERE { ?a ?b ?slug }\n";

    #[test]
    fn discovery_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        // Written in non-lexicographic order on purpose.
        write_view(dir.path(), "zebra.yaml", SINGLE);
        write_view(dir.path(), "apple.yaml", MULTI);
        write_view(dir.path(), "mango.yaml", SINGLE);

        let first = discover_views(dir.path()).unwrap();
        let second = discover_views(dir.path()).unwrap();
        let names = |views: &[ViewDescriptor]| {
            views.iter().map(|v| v.name.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&first), vec!["apple", "mango", "zebra"]);
        assert_eq!(names(&first), names(&second));
    }

    #[test]
    fn parses_both_modes() {
        let dir = tempfile::tempdir().unwrap();
        write_view(dir.path(), "index.yaml", SINGLE);
        write_view(dir.path(), "post.yaml", MULTI);

        let views = discover_views(dir.path()).unwrap();
        assert_eq!(views[0].mode, OutputMode::Single);
        assert_eq!(views[1].mode, OutputMode::Multipage("slug".to_string()));
        assert_eq!(views[1].output_pattern, "posts/{{slug}}.html");
    }

    #[test]
    fn malformed_declaration_aborts_discovery() {
        let dir = tempfile::tempdir().unwrap();
        write_view(dir.path(), "broken.yaml", "output: [not, a, string");
        let err = discover_views(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::ViewParse(_, _))
        ));
    }

    #[test]
    fn multipage_variable_requires_its_token() {
        let dir = tempfile::tempdir().unwrap();
        write_view(
            dir.path(),
            "post.yaml",
            "output: posts/{{id}}.html\ntemplate: t.html\nmultipage_variable: slug\nquery: SELECT ?slug WHERE {}\n",
        );
        let err = discover_views(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::MissingPlaceholder(_, _, _))
        ));
    }

    #[test]
    fn single_mode_rejects_unresolved_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        write_view(
            dir.path(),
            "index.yaml",
            "output: pages/{{slug}}.html\ntemplate: t.html\nquery: SELECT ?slug WHERE {}\n",
        );
        let err = discover_views(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnexpectedPlaceholder(_, _))
        ));
    }

    #[test]
    fn empty_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_view(
            dir.path(),
            "index.yaml",
            "output: index.html\ntemplate: t.html\nquery: \"\"\n",
        );
        let err = discover_views(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::ViewFieldEmpty(_, "query"))
        ));
    }
}
