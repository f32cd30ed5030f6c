use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use std::sync::Arc;

/// Envelope every GraphQL response arrives in. A response may carry `data`, `errors` or both.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

// Repository languages

#[derive(Debug, Deserialize)]
pub struct ViewerData {
    pub viewer: Viewer,
}

#[derive(Debug, Deserialize)]
pub struct Viewer {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryConnection {
    #[serde(default)]
    pub nodes: Vec<RepositoryLanguages>,
}

/// Languages of a single repository, as reported by GitHub. Sizes are in bytes.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RepositoryLanguages {
    pub name: Arc<str>,
    pub languages: LanguageConnection,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct LanguageConnection {
    #[serde(default)]
    pub edges: Vec<LanguageEdge>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LanguageEdge {
    pub size: u64,
    pub node: LanguageNode,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LanguageNode {
    pub name: Arc<str>,
    /// Not every language has a color assigned on GitHub.
    pub color: Option<Arc<str>>,
}

#[cfg(test)]
impl RepositoryLanguages {
    pub fn new(name: &str, languages: impl IntoIterator<Item = (&'static str, u64)>) -> Self {
        Self {
            name: name.into(),
            languages: LanguageConnection {
                edges: languages
                    .into_iter()
                    .map(|(name, size)| LanguageEdge {
                        size,
                        node: LanguageNode {
                            name: name.into(),
                            color: None,
                        },
                    })
                    .collect(),
            },
        }
    }
}

// Contribution calendar

#[derive(Debug, Deserialize)]
pub struct UserData {
    pub user: Option<CalendarUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarUser {
    pub contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    pub contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize)]
pub struct ContributionCalendar {
    #[serde(default)]
    pub weeks: Vec<ContributionWeek>,
}

/// One column of the calendar. GitHub returns up to seven days, Sunday first; the first and last
/// weeks of a range can be shorter.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    #[serde(default)]
    pub contribution_days: Vec<CalendarDay>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub contribution_count: u32,
}

/// A single day placed on the city grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionDay {
    pub week_index: u32,
    /// Position inside the week column, `0..=6`.
    pub day_of_week: u32,
    pub date: NaiveDate,
    pub count: u32,
}

/// Flattens the week-major calendar into grid cells. The week position becomes the `x` axis and
/// the weekday of the date (Sunday first) becomes the `y` axis, so the short first week of a
/// year still lands in the right rows.
pub fn flatten_weeks(weeks: &[ContributionWeek]) -> Vec<ContributionDay> {
    weeks
        .iter()
        .enumerate()
        .flat_map(|(week_index, week)| {
            week.contribution_days.iter().map(move |day| ContributionDay {
                week_index: week_index as u32,
                day_of_week: day.date.weekday().num_days_from_sunday(),
                date: day.date,
                count: day.contribution_count,
            })
        })
        .collect()
}
