use serde::Deserialize;

/// Metadata block at the top of an article.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
}

/// Splits a document into its raw YAML front matter (if any) and the body.
///
/// The block must open on the very first line with `---` and close with a line that
/// is exactly `---`. Without a closing fence the whole input is body.
pub fn split(source: &str) -> (Option<&str>, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let Some(rest) = source
        .strip_prefix("---\r\n")
        .or_else(|| source.strip_prefix("---\n"))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &rest[..offset];
            return (Some(yaml), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, source)
}

/// Parses the front matter of `source`, returning it with the remaining body.
pub fn parse(source: &str) -> Result<(FrontMatter, &str), serde_yaml::Error> {
    match split(source) {
        (Some(yaml), body) if !yaml.trim().is_empty() => Ok((serde_yaml::from_str(yaml)?, body)),
        (_, body) => Ok((FrontMatter::default(), body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_metadata_and_body() {
        let source = "---\ntitle: Hello\ndate: 2026-01-05\ntags:\n  - rust\n  - web\n---\n\n## First\n";
        let (meta, body) = parse(source).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.date.as_deref(), Some("2026-01-05"));
        assert_eq!(meta.tags, vec!["rust", "web"]);
        assert_eq!(meta.excerpt, None);
        assert_eq!(body, "\n## First\n");
    }

    #[test]
    fn missing_block_is_all_body() {
        let (meta, body) = parse("## Only body\n").unwrap();
        assert_eq!(meta, FrontMatter::default());
        assert_eq!(body, "## Only body\n");
    }

    #[test]
    fn unterminated_block_is_all_body() {
        let source = "---\ntitle: nope\n## body\n";
        assert_eq!(split(source), (None, source));
    }

    #[test]
    fn empty_block_uses_defaults() {
        let (meta, body) = parse("---\n---\ntext").unwrap();
        assert_eq!(meta, FrontMatter::default());
        assert_eq!(body, "text");
    }

    #[test]
    fn crlf_fences_are_accepted() {
        let (meta, body) = parse("---\r\ntitle: Win\r\n---\r\nbody").unwrap();
        assert_eq!(meta.title.as_deref(), Some("Win"));
        assert_eq!(body, "body");
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(parse("---\ntitle: [unclosed\n---\nbody").is_err());
    }
}
