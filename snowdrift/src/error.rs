use std::path::PathBuf;

use thiserror::Error;

/// The primary error type that can be produced by snowdrift.
///
/// Every variant aborts the whole build; there is no partial-success mode.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to locate configuration file: {0}")]
    ConfigMissing(PathBuf),
    #[error("failed to parse configuration file {0}: {1}")]
    ConfigParse(PathBuf, serde_yaml::Error),
    #[error("invalid SPARQL endpoint \"{0}\": {1}")]
    InvalidEndpoint(String, url::ParseError),
    #[error("I/O error {0}: {1}")]
    Io(String, std::io::Error),
    #[error("invalid file pattern: {0}")]
    WalkPattern(#[from] glob::PatternError),
    #[error("directory walk failed: {0}")]
    Walk(#[from] glob::GlobError),
    #[error("cannot extract file name from path: {0}")]
    CannotExtractFileName(PathBuf),
    #[error("failed to read view declaration {0}: {1}")]
    ViewRead(PathBuf, std::io::Error),
    #[error("malformed view declaration {0}: {1}")]
    ViewParse(PathBuf, serde_yaml::Error),
    #[error("view \"{0}\" has an empty \"{1}\" field")]
    ViewFieldEmpty(String, &'static str),
    #[error("view \"{0}\" declares multipage variable \"{1}\" but its output pattern \"{2}\" does not contain the {{{{{1}}}}} token")]
    MissingPlaceholder(String, String, String),
    #[error("view \"{0}\" has an unresolved placeholder in output pattern \"{1}\" but declares no multipage variable")]
    UnexpectedPlaceholder(String, String),
    #[error("no includes directory at {0}")]
    IncludesMissing(PathBuf),
    #[error("SPARQL request to {0} failed: {1}")]
    QueryTransport(String, reqwest::Error),
    #[error("SPARQL endpoint rejected the query (HTTP {0}): {1}")]
    QueryRejected(u16, String),
    #[error("failed to decode SPARQL results: {0}")]
    QueryDecode(#[from] serde_json::Error),
    #[error("row {row} of view \"{view}\" has no binding for multipage variable \"{column}\"")]
    MissingMultipageColumn {
        view: String,
        column: String,
        row: usize,
    },
    #[error("view \"{0}\": two rows produce the same output path {1}")]
    OutputPathCollision(String, PathBuf),
    #[error("failed to load template {0}: {1}")]
    TemplateLoad(PathBuf, std::io::Error),
    #[error("failed to compile template \"{0}\": {1}")]
    TemplateCompile(String, handlebars::TemplateError),
    #[error("failed to render template \"{0}\": {1}")]
    TemplateRender(String, handlebars::RenderError),
    #[error("output path {0} has no parent directory")]
    PathMissingParent(PathBuf),
    #[error("site directory {0} already exists")]
    SiteDirExists(PathBuf),
    #[error("failed to copy static file {0}: {1}")]
    AssetCopy(PathBuf, std::io::Error),
}
