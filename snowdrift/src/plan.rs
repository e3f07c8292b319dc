//! Page planning: deciding how a view's result rows map onto output files.

use std::collections::HashSet;
use std::path::PathBuf;

use eyre::Result;
use serde::Serialize;

use crate::view::placeholder;
use crate::{Error, OutputMode, ResultRow, ViewDescriptor};

/// The template context for one planned page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageContext {
    /// The full result set, for index/listing pages.
    Full(Vec<ResultRow>),
    /// A single row, for multipage fan-out.
    Row(ResultRow),
}

/// A planned (output path, context) pair, ready for rendering. The path is
/// relative to the site root.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub output_path: PathBuf,
    pub context: PageContext,
}

/// Plans the pages for one view.
///
/// Single mode yields exactly one job whose context is the full result set.
/// Multipage mode yields one job per row, substituting the first occurrence
/// of the `{{column}}` token with that row's value, verbatim — a value
/// containing path separators deliberately creates nested directories.
///
/// A row lacking the multipage column fails the whole view, as does a pair
/// of rows substituting to the same output path: silently dropped or
/// overwritten pages would desynchronize a site's navigation from its
/// content.
pub fn plan_pages(view: &ViewDescriptor, rows: Vec<ResultRow>) -> Result<Vec<RenderJob>> {
    match &view.mode {
        OutputMode::Single => Ok(vec![RenderJob {
            output_path: PathBuf::from(&view.output_pattern),
            context: PageContext::Full(rows),
        }]),
        OutputMode::Multipage(column) => {
            let token = placeholder(column);
            let mut seen = HashSet::new();
            let mut jobs = Vec::with_capacity(rows.len());
            for (index, row) in rows.into_iter().enumerate() {
                let term = row.get(column).ok_or_else(|| Error::MissingMultipageColumn {
                    view: view.name.clone(),
                    column: column.clone(),
                    row: index,
                })?;
                let output_path = PathBuf::from(view.output_pattern.replacen(&token, term.value(), 1));
                if !seen.insert(output_path.clone()) {
                    return Err(Error::OutputPathCollision(view.name.clone(), output_path).into());
                }
                jobs.push(RenderJob {
                    output_path,
                    context: PageContext::Row(row),
                });
            }
            Ok(jobs)
        }
    }
}
