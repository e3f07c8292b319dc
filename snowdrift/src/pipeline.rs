//! The build pipeline: discovery, querying, planning and rendering, driven
//! sequentially and in deterministic order.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use log::{debug, info};

use crate::view::discover_views;
use crate::{copy_static, plan_pages, Error, QueryClient, Renderer};

/// Name of the site configuration file expected in the project root.
pub const CONFIG_FILE: &str = "snowdrift.yaml";

const VIEWS_DIR: &str = "views";
const INCLUDES_DIR: &str = "templates/includes";
const STATIC_DIR: &str = "static";
const SITE_DIR: &str = "site";

/// Drives one build run. Owns the shared include set (inside the renderer,
/// read-only for the whole run) and the query client; views pass through
/// discovery, planning and rendering one at a time, in discovery order.
pub struct Pipeline<'a, C: QueryClient> {
    client: C,
    renderer: Renderer<'a>,
    project_root: PathBuf,
    site_root: PathBuf,
}

impl<'a, C: QueryClient> Pipeline<'a, C> {
    /// Constructor. Resolves the include set immediately, so a missing or
    /// broken includes directory fails before anything is written.
    pub fn new<P: AsRef<Path>>(project_root: P, client: C) -> Result<Self> {
        let project_root = project_root.as_ref().to_path_buf();
        let renderer = Renderer::new(project_root.join(INCLUDES_DIR))?;
        let site_root = project_root.join(SITE_DIR);
        Ok(Self {
            client,
            renderer,
            project_root,
            site_root,
        })
    }

    /// Where rendered pages and copied assets end up.
    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    /// Runs the whole build, returning the number of pages rendered. The
    /// site directory is created fresh; any error aborts the entire build.
    pub fn build(&mut self) -> Result<u64> {
        if self.site_root.exists() {
            return Err(Error::SiteDirExists(self.site_root.clone()).into());
        }
        fs::create_dir_all(&self.site_root)
            .map_err(|e| Error::Io(self.site_root.display().to_string(), e))?;

        let static_root = self.project_root.join(STATIC_DIR);
        if static_root.is_dir() {
            copy_static(&static_root, &self.site_root)?;
        } else {
            info!("Failed to locate static files. Skipping...");
        }

        let views = discover_views(self.project_root.join(VIEWS_DIR))?;
        debug!("Discovered {} view(s)", views.len());

        let mut page_count = 0_u64;
        for view in &views {
            self.renderer
                .register_view_template(view, &self.project_root)?;
            let rows = self
                .client
                .query(&view.query)
                .wrap_err_with(|| format!("query for view \"{}\" failed", view.name))?;
            debug!("View {} returned {} row(s)", view.name, rows.len());
            let jobs = plan_pages(view, rows)?;
            for job in &jobs {
                self.renderer.render_job(view, job, &self.site_root)?;
            }
            info!("View {} generated {} page(s)", view.name, jobs.len());
            page_count += jobs.len() as u64;
        }
        Ok(page_count)
    }
}
