//! Language statistics across repositories.

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    github::entities::RepositoryLanguages,
    utils::percentage::{share, Percentage},
};

/// Languages the profile card skips by default. They are usually vendored engine assets rather
/// than code the user wrote.
pub const DEFAULT_IGNORED_LANGUAGES: [&str; 2] = ["GDShader", "ShaderLab"];

pub const DEFAULT_LANGUAGE_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageShare {
    pub name: Arc<str>,
    pub total_bytes: u64,
    pub percent: Percentage,
    /// Color GitHub associates with the language, if it has one.
    pub color: Option<Arc<str>>,
}

#[derive(Debug, Clone, Default)]
pub struct AggregateOptions {
    /// Keep only the first `limit` languages after sorting. Percentages still refer to the
    /// untruncated total.
    pub limit: Option<usize>,
    /// Case-sensitive names dropped before summing. They don't count toward the total either.
    pub ignored: Vec<String>,
}

struct LanguageTotal {
    name: Arc<str>,
    total_bytes: u64,
    color: Option<Arc<str>>,
}

/// Sums language sizes across repositories and returns them largest first.
///
/// Languages with equal totals keep the order in which they were first seen. When nothing was
/// counted at all (no repositories, or only empty ones) the result is empty rather than a set of
/// undefined percentages.
#[instrument(skip_all, fields(repositories = repositories.len()))]
pub fn aggregate_languages(
    repositories: &[RepositoryLanguages],
    options: &AggregateOptions,
) -> Vec<LanguageShare> {
    let mut index = HashMap::<Arc<str>, usize>::new();
    let mut totals = Vec::<LanguageTotal>::new();
    let mut grand_total = 0u64;

    let edges = repositories.iter().flat_map(|r| r.languages.edges.iter());
    for edge in edges {
        if options.ignored.iter().any(|v| v.as_str() == &*edge.node.name) {
            continue;
        }
        let position = *index.entry(edge.node.name.clone()).or_insert_with(|| {
            totals.push(LanguageTotal {
                name: edge.node.name.clone(),
                total_bytes: 0,
                color: None,
            });
            totals.len() - 1
        });
        let total = &mut totals[position];
        total.total_bytes += edge.size;
        if total.color.is_none() {
            total.color = edge.node.color.clone();
        }
        grand_total += edge.size;
    }

    debug!("Found {} languages totalling {grand_total} bytes", totals.len());

    // Vec::sort_by is stable, so equal sizes stay in encounter order.
    totals.sort_by(|a, b| b.total_bytes.cmp(&a.total_bytes));

    let limit = options.limit.unwrap_or(usize::MAX);
    totals
        .into_iter()
        .take(limit)
        .filter_map(|total| {
            let percent = share(total.total_bytes, grand_total)?;
            Some(LanguageShare {
                name: total.name,
                total_bytes: total.total_bytes,
                percent,
                color: total.color,
            })
        })
        .collect()
}
