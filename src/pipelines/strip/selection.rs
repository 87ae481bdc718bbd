// SPDX-License-Identifier: GPL-3.0-only

//! Per-panel filter selection
//!
//! A [`FilterMode`] is the token the capture screen hands over. Mixed modes
//! only tint some panels, and which ones depends on the arrangement; that
//! rule lives in one table ([`mixed_indices`]) instead of being spread over
//! branches.

use super::filters::Filter;
use super::layout::Arrangement;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Filter preference for a whole session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    #[default]
    None,
    #[serde(rename = "bw")]
    BlackAndWhite,
    #[serde(rename = "bw-mixed")]
    BlackAndWhiteMixed,
    Sepia,
    SepiaMixed,
    LineArt,
}

impl FilterMode {
    /// Get all modes for UI iteration
    pub const ALL: [FilterMode; 6] = [
        FilterMode::None,
        FilterMode::BlackAndWhite,
        FilterMode::BlackAndWhiteMixed,
        FilterMode::Sepia,
        FilterMode::SepiaMixed,
        FilterMode::LineArt,
    ];

    /// Token used in configuration files and on the command line
    pub fn token(&self) -> &'static str {
        match self {
            FilterMode::None => "none",
            FilterMode::BlackAndWhite => "bw",
            FilterMode::BlackAndWhiteMixed => "bw-mixed",
            FilterMode::Sepia => "sepia",
            FilterMode::SepiaMixed => "sepia-mixed",
            FilterMode::LineArt => "line-art",
        }
    }

    /// The filter this mode applies, and whether it is restricted to some panels
    fn rule(&self) -> (Filter, bool) {
        match self {
            FilterMode::None => (Filter::None, false),
            FilterMode::BlackAndWhite => (Filter::BlackAndWhite, false),
            FilterMode::BlackAndWhiteMixed => (Filter::BlackAndWhite, true),
            FilterMode::Sepia => (Filter::Sepia, false),
            FilterMode::SepiaMixed => (Filter::Sepia, true),
            FilterMode::LineArt => (Filter::LineArt, false),
        }
    }

    /// Resolve the filter for each of `count` panels under `arrangement`
    pub fn selection(&self, arrangement: Arrangement, count: usize) -> Vec<Filter> {
        let (filter, mixed) = self.rule();
        if !mixed {
            return vec![filter; count];
        }

        let mut filters = vec![Filter::None; count];
        for &index in mixed_indices(arrangement) {
            if let Some(slot) = filters.get_mut(index) {
                *slot = filter;
            }
        }
        filters
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterMode::ALL
            .into_iter()
            .find(|mode| mode.token().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown filter mode '{}'", s))
    }
}

/// Panels tinted by the mixed filter modes
pub const fn mixed_indices(arrangement: Arrangement) -> &'static [usize] {
    match arrangement {
        // Opposite corners of the 2x2 grid
        Arrangement::Box => &[0, 3],
        Arrangement::Vertical | Arrangement::Horizontal => &[0, 2],
    }
}

/// How filters are chosen for each panel of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPlan {
    /// Resolve through the mode table
    Mode(FilterMode),
    /// Explicit filter per panel index; missing entries get no filter
    PerIndex(Vec<Filter>),
}

impl FilterPlan {
    pub fn resolve(&self, arrangement: Arrangement, count: usize) -> Vec<Filter> {
        match self {
            FilterPlan::Mode(mode) => mode.selection(arrangement, count),
            FilterPlan::PerIndex(filters) => (0..count)
                .map(|i| filters.get(i).copied().unwrap_or_default())
                .collect(),
        }
    }
}

impl Default for FilterPlan {
    fn default() -> Self {
        FilterPlan::Mode(FilterMode::None)
    }
}

impl From<FilterMode> for FilterPlan {
    fn from(mode: FilterMode) -> Self {
        FilterPlan::Mode(mode)
    }
}
