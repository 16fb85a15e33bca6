//! Weekly reads: dated links grouped into per-week buckets.
//!
//! Week numbers use a simplified day-of-year division (`ceil(day_of_year / 7)`, weeks
//! always start on January 1st). This is not ISO-8601 week numbering. Labels and
//! date ranges are derived from the same formula, so the scheme is kept as is.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

/// A read as authored: only `date` and `url` are essential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadInput {
    /// `YYYY-MM-DD`
    pub date: String,
    pub url: String,
    pub title: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Read {
    pub id: usize,
    pub title: String,
    pub source: String,
    pub url: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    pub week: String,
    pub date_range: String,
    pub reads: Vec<Read>,
}

/// Simplified week index within a calendar year. Orders by year, then week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekOfYear {
    pub year: i32,
    pub week: u32,
}

impl WeekOfYear {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            week: date.ordinal().div_ceil(7),
        }
    }

    /// e.g. "Week 1, 2026"
    pub fn label(&self) -> String {
        format!("Week {}, {}", self.week, self.year)
    }

    /// First and last calendar day of the week. The last day may fall in the next year.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let jan1 = NaiveDate::from_yo_opt(self.year, 1)?;
        let start = jan1.checked_add_days(Days::new(u64::from(self.week.saturating_sub(1)) * 7))?;
        let end = start.checked_add_days(Days::new(6))?;
        Some((start, end))
    }

    /// e.g. "Jan 1 - Jan 7"
    pub fn date_range(&self) -> String {
        match self.bounds() {
            Some((start, end)) => format!("{} - {}", start.format("%b %-d"), end.format("%b %-d")),
            None => String::new(),
        }
    }
}

/// Parses a read's date. Full timestamps are accepted and truncated to their date.
pub fn parse_read_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|dt| dt.date_naive()))
}

/// Hostname of `url` without a leading `www.`; the raw string if it does not parse.
pub fn extract_source(url: &str) -> String {
    match Url::parse(url).ok().as_ref().and_then(Url::host_str) {
        Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
        None => url.to_string(),
    }
}

/// Visible weekly buckets, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeeklyReads {
    pub weeks: Vec<WeekBucket>,
}

/// Groups reads by week and drops every week later than the week containing `today`.
///
/// Reads keep their input order inside a bucket and are numbered from 1 by input
/// position. Entries with unparsable dates are skipped.
pub fn group_reads_into_weeks(reads: &[ReadInput], today: NaiveDate) -> WeeklyReads {
    let current = WeekOfYear::of(today);
    let mut buckets: BTreeMap<WeekOfYear, Vec<Read>> = BTreeMap::new();

    for (index, input) in reads.iter().enumerate() {
        let Some(date) = parse_read_date(&input.date) else {
            warn!(date = %input.date, url = %input.url, "skipping read with invalid date");
            continue;
        };
        buckets.entry(WeekOfYear::of(date)).or_default().push(Read {
            id: index + 1,
            title: input.title.clone(),
            source: input
                .source
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| extract_source(&input.url)),
            url: input.url.clone(),
            category: input.category.clone(),
            note: input.note.clone(),
        });
    }

    let weeks = buckets
        .into_iter()
        .rev()
        .filter(|(week, _)| *week <= current)
        .map(|(week, reads)| WeekBucket {
            week: week.label(),
            date_range: week.date_range(),
            reads,
        })
        .collect();

    WeeklyReads { weeks }
}

impl WeeklyReads {
    /// Unique categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.all_reads()
            .map(|r| r.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn total_reads(&self) -> usize {
        self.weeks.iter().map(|w| w.reads.len()).sum()
    }

    /// The first `count` reads walking weeks newest first.
    pub fn latest(&self, count: usize) -> Vec<Read> {
        self.all_reads().take(count).cloned().collect()
    }

    pub fn category_count(&self, category: &str) -> usize {
        self.all_reads().filter(|r| r.category == category).count()
    }

    /// Only reads of `category`; weeks left empty are dropped.
    pub fn filter_category(&self, category: &str) -> WeeklyReads {
        let weeks = self
            .weeks
            .iter()
            .filter_map(|w| {
                let reads: Vec<Read> = w
                    .reads
                    .iter()
                    .filter(|r| r.category == category)
                    .cloned()
                    .collect();
                (!reads.is_empty()).then(|| WeekBucket {
                    week: w.week.clone(),
                    date_range: w.date_range.clone(),
                    reads,
                })
            })
            .collect();
        WeeklyReads { weeks }
    }

    fn all_reads(&self) -> impl Iterator<Item = &Read> {
        self.weeks.iter().flat_map(|w| w.reads.iter())
    }
}
