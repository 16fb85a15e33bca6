use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A level-2 or level-3 heading of an article, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Scans article body text for `##` and `###` heading lines.
///
/// Every match yields one entry, duplicates included: two headings with the same
/// text share an id. Use [`dedupe_ids`] when ids must be unique.
pub fn extract_headings(content: &str) -> Vec<Heading> {
    let heading_re = Regex::new(r"(?m)^(#{2,3})\s+(.+)$").expect("valid regex");

    heading_re
        .captures_iter(content)
        .map(|caps| {
            let level = caps[1].len() as u8;
            let text = caps[2].trim().to_string();
            let id = heading_id(&text);
            Heading { id, text, level }
        })
        .collect()
}

/// Lowercases `text`, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, and strips leading and trailing dashes.
pub fn heading_id(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut last_dash = false;
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

/// Hands out unique ids: the first occurrence keeps its base id, later ones get
/// `-1`, `-2`, ... appended.
#[derive(Debug, Default)]
pub struct IdDeduper {
    seen: HashMap<String, usize>,
}

impl IdDeduper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, base: String) -> String {
        let count = self.seen.entry(base.clone()).or_insert(0);
        let id = if *count == 0 {
            base.clone()
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        if id != base {
            // Reserve the suffixed id so a later heading literally named "x-1" moves on.
            self.seen.entry(id.clone()).or_insert(1);
        }
        id
    }
}

/// Rewrites repeated ids in place so every heading can be deep-linked.
pub fn dedupe_ids(headings: &mut [Heading]) {
    let mut deduper = IdDeduper::new();
    for heading in headings.iter_mut() {
        heading.id = deduper.assign(std::mem::take(&mut heading.id));
    }
}
