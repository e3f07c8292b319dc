//! Snowdrift turns declarative views — each pairing a SPARQL query with a
//! page template — into a static site. One query execution fans out into
//! either a single rendered page or many pages, one per distinct value of a
//! designated result column.
//!
//! This crate provides an API that allows for embedding snowdrift into
//! another application. For the command line interface, see the
//! `snowdrift-cli` crate.

mod assets;
mod config;
mod error;
mod fs;
mod pipeline;
mod plan;
mod render;
mod sparql;
mod view;

pub use assets::copy_static;
pub use config::SiteConfig;
pub use error::Error;
pub use pipeline::{Pipeline, CONFIG_FILE};
pub use plan::{plan_pages, PageContext, RenderJob};
pub use render::Renderer;
pub use sparql::{HttpQueryClient, QueryClient, ResultRow, Term};
pub use view::{discover_views, OutputMode, ViewDescriptor};
