//! Layout mode selection for the wash / rollers / idle engine section
//!
//! The section holds two tables (wash events, roller gauge checks) and the
//! idle engine chart. Depending on their row counts they share one page or
//! spread over up to four. The idle chart is moved first, then the roller
//! table, then the roller table is split into a continuation page.

use serde::{Deserialize, Serialize};

/// Row counts of the three variable-length blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutCounts {
    /// Wash table rows
    pub table_a: usize,
    /// Roller gauge table rows
    pub table_b: usize,
    /// Idle engine chart rows
    pub chart_c: usize,
}

impl LayoutCounts {
    pub fn new(table_a: usize, table_b: usize, chart_c: usize) -> Self {
        Self {
            table_a,
            table_b,
            chart_c,
        }
    }

    /// Rows of both tables
    pub fn tables_sum(&self) -> usize {
        self.table_a + self.table_b
    }

    /// Rows of every block
    pub fn total(&self) -> usize {
        self.tables_sum() + self.chart_c
    }
}

/// Capacity thresholds, in rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutCapacities {
    /// Most chart rows that may stay on the shared page
    pub max_inline_chart: usize,
    /// Most wash rows that let the chart stay on the shared page
    pub max_inline_table_a: usize,
    /// Most roller rows that let the chart stay on the shared page
    pub max_inline_table_b: usize,
    /// Rows of all three blocks that fit on one page
    pub single_page_rows: usize,
    /// Rows of both tables that fit on one page
    pub shared_tables_rows: usize,
    /// Roller rows per page
    pub page_cap: usize,
    /// Roller rows plus chart rows that fit on one page
    pub colocated_rows: usize,
}

impl Default for LayoutCapacities {
    fn default() -> Self {
        Self {
            max_inline_chart: 7,
            max_inline_table_a: 10,
            max_inline_table_b: 2,
            single_page_rows: 18,
            shared_tables_rows: 26,
            page_cap: 28,
            colocated_rows: 21,
        }
    }
}

impl LayoutCapacities {
    /// Whether the idle chart has to leave the shared page
    pub fn must_move_chart(&self, counts: &LayoutCounts) -> bool {
        counts.chart_c > self.max_inline_chart
            || counts.table_a > self.max_inline_table_a
            || counts.table_b > self.max_inline_table_b
    }

    /// Roller rows left for the continuation page
    pub fn overflow(&self, counts: &LayoutCounts) -> usize {
        counts.table_b.saturating_sub(self.page_cap)
    }
}

/// How the section is spread over pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// [wash, rollers, idle]
    SinglePage,
    /// [wash, rollers] [idle]
    SplitMotorOnly,
    /// [wash] [rollers, idle]
    SplitTablesCombined,
    /// [wash] [rollers] [idle]
    SplitTablesSeparated,
    /// [wash] [rollers 1] [rollers 2, idle]
    SplitPaginatedCombined,
    /// [wash] [rollers 1] [rollers 2] [idle]
    SplitPaginatedSeparated,
}

impl LayoutMode {
    /// Number of pages the section takes
    pub fn page_count(&self) -> usize {
        match self {
            LayoutMode::SinglePage => 1,
            LayoutMode::SplitMotorOnly | LayoutMode::SplitTablesCombined => 2,
            LayoutMode::SplitTablesSeparated | LayoutMode::SplitPaginatedCombined => 3,
            LayoutMode::SplitPaginatedSeparated => 4,
        }
    }

    /// Whether the roller table is split into a continuation page
    pub fn is_paginated(&self) -> bool {
        matches!(
            self,
            LayoutMode::SplitPaginatedCombined | LayoutMode::SplitPaginatedSeparated
        )
    }
}

type Rule = fn(&LayoutCounts, &LayoutCapacities) -> bool;

/// Ordered decision table. The first matching rule wins; the last rule
/// always matches.
const RULES: [(Rule, LayoutMode); 6] = [
    (
        |c, cap| !cap.must_move_chart(c) && c.total() <= cap.single_page_rows,
        LayoutMode::SinglePage,
    ),
    (
        |c, cap| c.tables_sum() <= cap.shared_tables_rows,
        LayoutMode::SplitMotorOnly,
    ),
    (
        |c, cap| c.table_b <= cap.page_cap && c.table_b + c.chart_c <= cap.colocated_rows,
        LayoutMode::SplitTablesCombined,
    ),
    (
        |c, cap| c.table_b <= cap.page_cap,
        LayoutMode::SplitTablesSeparated,
    ),
    (
        |c, cap| cap.overflow(c) + c.chart_c <= cap.colocated_rows,
        LayoutMode::SplitPaginatedCombined,
    ),
    (|_, _| true, LayoutMode::SplitPaginatedSeparated),
];

/// Pick the layout mode for the given row counts
pub fn plan(counts: LayoutCounts, capacities: &LayoutCapacities) -> LayoutMode {
    let mode = RULES
        .iter()
        .find(|(rule, _)| rule(&counts, capacities))
        .map(|(_, mode)| *mode)
        .unwrap_or(LayoutMode::SplitPaginatedSeparated);

    log::debug!(
        "layout for wash={} rollers={} idle={}: {:?}",
        counts.table_a,
        counts.table_b,
        counts.chart_c,
        mode
    );
    mode
}
