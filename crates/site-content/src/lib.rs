//! Content transforms for the portfolio site: articles and their headings,
//! the weekly reads list, and the projects list.

pub mod catalog;
pub mod error;
pub mod frontmatter;
pub mod headings;
pub mod posts;
pub mod projects;
pub mod reads;
pub mod render;

pub use catalog::SiteContent;
pub use error::ContentError;
pub use headings::{extract_headings, Heading};
