use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::ContentError;
use crate::posts::PostStore;
use crate::projects::Project;
use crate::reads::ReadInput;

const BLOG_DIR: &str = "blog";
const READS_FILE: &str = "reads.json";
const PROJECTS_FILE: &str = "projects.json";

/// Everything the site serves, loaded from one content directory:
///
/// ```text
/// content/
///   blog/*.mdx
///   reads.json
///   projects.json
/// ```
///
/// Posts are read from disk on each request; reads and projects are loaded once.
#[derive(Debug, Clone)]
pub struct SiteContent {
    pub root: PathBuf,
    pub posts: PostStore,
    pub reads: Vec<ReadInput>,
    pub projects: Vec<Project>,
}

impl SiteContent {
    pub fn load(root: &Path) -> Result<Self, ContentError> {
        let reads: Vec<ReadInput> = load_json_list(&root.join(READS_FILE))?;
        let projects: Vec<Project> = load_json_list(&root.join(PROJECTS_FILE))?;
        info!(
            root = %root.display(),
            reads = reads.len(),
            projects = projects.len(),
            "content loaded"
        );
        Ok(Self {
            root: root.to_path_buf(),
            posts: PostStore::new(root.join(BLOG_DIR)),
            reads,
            projects,
        })
    }
}

/// A missing file is an empty list; a malformed one is an error.
fn load_json_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ContentError> {
    if !path.exists() {
        warn!(path = %path.display(), "data file not found, using empty list");
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ContentError::Data {
        path: path.to_path_buf(),
        source,
    })
}
