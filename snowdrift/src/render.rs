//! Page rendering through handlebars.

use std::fs;
use std::path::Path;

use eyre::Result;
use handlebars::Handlebars;
use log::debug;

use crate::fs::ensure_parent_path_exists;
use crate::{Error, RenderJob, ViewDescriptor};

/// Renders planned pages. Holds the handlebars registry with the shared
/// include set registered up front; includes are read-only for the duration
/// of a build and visible to every view as partials (`{{> name.html}}`).
#[derive(Debug)]
pub struct Renderer<'a> {
    hb: Handlebars<'a>,
}

impl<'a> Renderer<'a> {
    /// Constructor. Walks the includes root and registers every file found
    /// there under its path relative to that root.
    pub fn new<P: AsRef<Path>>(includes_root: P) -> Result<Self> {
        let mut hb = Handlebars::new();
        // A template referencing a column the row does not bind must fail
        // that row's render, not silently emit an empty string.
        hb.set_strict_mode(true);
        let mut renderer = Self { hb };
        renderer.register_includes(includes_root.as_ref())?;
        Ok(renderer)
    }

    fn register_includes(&mut self, root: &Path) -> Result<()> {
        if !root.is_dir() {
            return Err(Error::IncludesMissing(root.to_path_buf()).into());
        }
        let pattern = root.join("**").join("*");
        for entry in glob::glob(&pattern.to_string_lossy()).map_err(Error::WalkPattern)? {
            let path = entry.map_err(Error::Walk)?;
            if !path.is_file() {
                continue;
            }
            let name = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            let content =
                fs::read_to_string(&path).map_err(|e| Error::TemplateLoad(path.clone(), e))?;
            self.hb
                .register_template_string(&name, content)
                .map_err(|e| Error::TemplateCompile(name.clone(), e))?;
            debug!("Registered include {}", name);
        }
        Ok(())
    }

    /// Compiles the view's own template and registers it under the view's
    /// name, alongside the includes.
    pub fn register_view_template(
        &mut self,
        view: &ViewDescriptor,
        project_root: &Path,
    ) -> Result<()> {
        let path = project_root.join(&view.template_path);
        let content = fs::read_to_string(&path).map_err(|e| Error::TemplateLoad(path, e))?;
        self.hb
            .register_template_string(&view.name, content)
            .map_err(|e| Error::TemplateCompile(view.name.clone(), e))?;
        debug!("Registered template for view {}", view.name);
        Ok(())
    }

    /// Renders one planned page and writes it below the site root, creating
    /// any missing parent directories.
    pub fn render_job(&self, view: &ViewDescriptor, job: &RenderJob, site_root: &Path) -> Result<()> {
        let rendered = self
            .hb
            .render(&view.name, &job.context)
            .map_err(|e| Error::TemplateRender(view.name.clone(), e))?;
        let output_path = site_root.join(&job.output_path);
        ensure_parent_path_exists(&output_path)?;
        fs::write(&output_path, &rendered)
            .map_err(|e| Error::Io(output_path.display().to_string(), e))?;
        debug!("View {} generated {}", view.name, output_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::*;
    use crate::{OutputMode, PageContext, Term};

    fn project_with_includes(includes: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let includes_root = dir.path().join("templates").join("includes");
        fs::create_dir_all(&includes_root).unwrap();
        for (name, content) in includes {
            fs::write(includes_root.join(name), content).unwrap();
        }
        dir
    }

    fn view(template: &str) -> ViewDescriptor {
        ViewDescriptor {
            name: "post".to_string(),
            output_pattern: "posts/{{slug}}.html".to_string(),
            query: "SELECT ?slug WHERE { ?s ?p ?slug }".to_string(),
            template_path: PathBuf::from(template),
            mode: OutputMode::Multipage("slug".to_string()),
        }
    }

    #[test]
    fn renders_row_context_with_includes() {
        let dir = project_with_includes(&[("footer.html", "-- footer --")]);
        fs::write(
            dir.path().join("templates").join("post.html"),
            "<h1>{{title.value}}</h1>{{> footer.html}}",
        )
        .unwrap();

        let mut renderer =
            Renderer::new(dir.path().join("templates").join("includes")).unwrap();
        let view = view("templates/post.html");
        renderer.register_view_template(&view, dir.path()).unwrap();

        let mut row = crate::ResultRow::new();
        row.insert("title".to_string(), Term::Literal("Hello".to_string()));
        let job = RenderJob {
            output_path: PathBuf::from("posts/hello.html"),
            context: PageContext::Row(row),
        };
        let site_root = dir.path().join("site");
        renderer.render_job(&view, &job, &site_root).unwrap();

        let written = fs::read_to_string(site_root.join("posts").join("hello.html")).unwrap();
        assert_eq!(written, "<h1>Hello</h1>-- footer --");
    }

    #[test]
    fn full_context_is_iterable() {
        let dir = project_with_includes(&[]);
        fs::write(
            dir.path().join("templates").join("post.html"),
            "{{#each this}}[{{slug.value}}]{{/each}}",
        )
        .unwrap();

        let mut renderer =
            Renderer::new(dir.path().join("templates").join("includes")).unwrap();
        let view = view("templates/post.html");
        renderer.register_view_template(&view, dir.path()).unwrap();

        let rows = ["x", "y"]
            .iter()
            .map(|slug| {
                let mut row = crate::ResultRow::new();
                row.insert("slug".to_string(), Term::Literal(slug.to_string()));
                row
            })
            .collect::<Vec<_>>();
        let job = RenderJob {
            output_path: PathBuf::from("index.html"),
            context: PageContext::Full(rows),
        };
        let site_root = dir.path().join("site");
        renderer.render_job(&view, &job, &site_root).unwrap();

        let written = fs::read_to_string(site_root.join("index.html")).unwrap();
        assert_eq!(written, "[x][y]");
    }

    #[test]
    fn unbound_column_fails_the_render() {
        let dir = project_with_includes(&[]);
        fs::write(
            dir.path().join("templates").join("post.html"),
            "<h1>{{title.value}}</h1>",
        )
        .unwrap();

        let mut renderer =
            Renderer::new(dir.path().join("templates").join("includes")).unwrap();
        let view = view("templates/post.html");
        renderer.register_view_template(&view, dir.path()).unwrap();

        let job = RenderJob {
            output_path: PathBuf::from("posts/empty.html"),
            context: PageContext::Row(crate::ResultRow::new()),
        };
        let err = renderer
            .render_job(&view, &job, &dir.path().join("site"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::TemplateRender(_, _))
        ));
    }

    #[test]
    fn missing_includes_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Renderer::new(dir.path().join("templates").join("includes")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::IncludesMissing(_))
        ));
    }
}
