use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::error::ContentError;
use crate::frontmatter;

const POST_EXTENSIONS: &[&str] = &["mdx", "md"];
const WORDS_PER_MINUTE: f64 = 200.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub read_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMeta,
    /// Markdown body with the front matter removed.
    pub content: String,
}

/// Articles stored as `{slug}.mdx` (or `.md`) files in one directory.
#[derive(Debug, Clone)]
pub struct PostStore {
    dir: PathBuf,
}

impl PostStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Slugs of every article file. A missing directory means no posts.
    pub fn slugs(&self) -> Result<Vec<String>, ContentError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.dir).map_err(|source| ContentError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut slugs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_post = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| POST_EXTENSIONS.contains(&e));
            if !is_post {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_slug(stem) {
                    slugs.push(stem.to_string());
                }
            }
        }
        slugs.sort();
        slugs.dedup();
        Ok(slugs)
    }

    /// Metadata for every post, newest first. Posts that fail to parse are
    /// logged and left out.
    pub fn list(&self) -> Result<Vec<PostMeta>, ContentError> {
        let mut posts = Vec::new();
        for slug in self.slugs()? {
            match self.get(&slug) {
                Ok(Some(post)) => posts.push(post.meta),
                Ok(None) => {}
                Err(e) => warn!(slug = %slug, error = %e, "skipping unreadable post"),
            }
        }
        posts.sort_by(|a, b| parse_date(&b.date).cmp(&parse_date(&a.date)));
        Ok(posts)
    }

    /// Loads one post. Unknown or malformed slugs yield `Ok(None)`.
    pub fn get(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        if !is_valid_slug(slug) {
            return Ok(None);
        }
        let Some(path) = POST_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{slug}.{ext}")))
            .find(|p| p.is_file())
        else {
            return Ok(None);
        };

        let source = std::fs::read_to_string(&path)
            .map_err(|source| ContentError::Io { path, source })?;
        parse_post(slug, &source).map(Some)
    }
}

/// Builds a post from its source text. Missing metadata falls back to
/// "Untitled", the current time, an empty excerpt and no tags.
pub fn parse_post(slug: &str, source: &str) -> Result<Post, ContentError> {
    let (meta, body) = frontmatter::parse(source).map_err(|source| ContentError::FrontMatter {
        slug: slug.to_string(),
        source,
    })?;

    Ok(Post {
        meta: PostMeta {
            slug: slug.to_string(),
            title: meta.title.unwrap_or_else(|| "Untitled".to_string()),
            date: meta.date.unwrap_or_else(|| Utc::now().to_rfc3339()),
            excerpt: meta.excerpt.unwrap_or_default(),
            tags: meta.tags,
            read_time: reading_time(body),
        },
        content: body.to_string(),
    })
}

/// Estimated reading time at 200 words per minute, e.g. "3 min read".
pub fn reading_time(text: &str) -> String {
    let words = text.split_whitespace().count() as f64;
    let minutes = (words / WORDS_PER_MINUTE * 100.0).round() / 100.0;
    format!("{} min read", minutes.ceil() as u64)
}

/// Long-form display date, e.g. "January 5, 2026". Unparsable input is returned as is.
pub fn format_date(date: &str) -> String {
    match parse_date(date) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => date.to_string(),
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_date(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S").ok()
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn lists_posts_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "older.mdx", "---\ntitle: Older\ndate: 2025-03-01\n---\nbody");
        write(tmp.path(), "newer.md", "---\ntitle: Newer\ndate: 2026-01-05\ntags: [rust]\n---\nbody");
        write(tmp.path(), "notes.txt", "not a post");

        let store = PostStore::new(tmp.path());
        let posts = store.list().unwrap();
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);
        assert_eq!(posts[0].tags, vec!["rust"]);
    }

    #[test]
    fn broken_post_is_skipped_in_listing() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "good.mdx", "---\ntitle: Good\ndate: 2026-01-01\n---\nbody");
        write(tmp.path(), "bad.mdx", "---\ntitle: [oops\n---\nbody");

        let store = PostStore::new(tmp.path());
        let posts = store.list().unwrap();
        assert_eq!(posts.len(), 1);
        assert!(store.get("bad").is_err());
    }

    #[test]
    fn missing_directory_has_no_posts() {
        let store = PostStore::new("/definitely/not/here");
        assert!(store.list().unwrap().is_empty());
        assert!(store.get("anything").unwrap().is_none());
    }

    #[test]
    fn traversal_slugs_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = PostStore::new(tmp.path());
        assert!(store.get("../secret").unwrap().is_none());
        assert!(store.get("").unwrap().is_none());
    }

    #[test]
    fn defaults_apply_without_front_matter() {
        let post = parse_post("plain", "## Heading\n\nsome words here").unwrap();
        assert_eq!(post.meta.title, "Untitled");
        assert_eq!(post.meta.excerpt, "");
        assert!(post.meta.tags.is_empty());
        assert!(parse_date(&post.meta.date).is_some());
        assert_eq!(post.content, "## Heading\n\nsome words here");
    }

    #[test]
    fn reading_time_rounds_up() {
        assert_eq!(reading_time(""), "0 min read");
        assert_eq!(reading_time("one two three"), "1 min read");
        let words = vec!["word"; 450].join(" ");
        assert_eq!(reading_time(&words), "3 min read");
    }

    #[test]
    fn formats_long_dates() {
        assert_eq!(format_date("2026-01-05"), "January 5, 2026");
        assert_eq!(format_date("2025-12-24T10:00:00Z"), "December 24, 2025");
        assert_eq!(format_date("someday"), "someday");
    }
}
