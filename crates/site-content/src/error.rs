use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid front matter in post {slug}: {source}")]
    FrontMatter {
        slug: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid data file {}: {source}", path.display())]
    Data {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
