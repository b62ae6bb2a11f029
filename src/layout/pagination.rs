//! Page descriptors: which blocks sit on which page

use crate::layout::planner::{LayoutCapacities, LayoutCounts, LayoutMode};
use serde::Serialize;
use smallvec::{smallvec, SmallVec};
use std::ops::Range;

/// Equipment timelines per interval page
pub const TIMELINES_PER_PAGE: usize = 4;

/// Heading of the operation interval pages
pub const TIMELINE_SECTION_TITLE: &str = "Intervalos de Operação";

/// Identity of a content block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockId {
    EnergyEfficiency,
    ElevatorHours,
    Tonnage,
    GpsUsage,
    GpsMap,
    WorkedArea,
    AverageSpeed,
    Maneuvers,
    Wash,
    Rollers,
    IdleEngine,
    Offenders,
    MechanicalAvailability,
    Timeline,
    KpiCards,
    SummaryTable,
}

impl BlockId {
    /// Section heading printed above the block
    pub fn title(&self) -> &'static str {
        match self {
            BlockId::EnergyEfficiency => "Eficiência Energética",
            BlockId::ElevatorHours => "Horas Elevador",
            BlockId::Tonnage => "Toneladas / Frota",
            BlockId::GpsUsage => "Uso GPS",
            BlockId::GpsMap => "Mapa de utilização GPS",
            BlockId::WorkedArea => "Área Trabalhada",
            BlockId::AverageSpeed => "Média de Velocidade",
            BlockId::Maneuvers => "Manobras",
            BlockId::Wash => "Lavagem",
            BlockId::Rollers => "Aferição de Roletes",
            BlockId::IdleEngine => "Motor Ocioso",
            BlockId::Offenders => "Top 5 Ofensores",
            BlockId::MechanicalAvailability => "Disponibilidade Mecânica",
            BlockId::Timeline => TIMELINE_SECTION_TITLE,
            BlockId::KpiCards => "Indicadores",
            BlockId::SummaryTable => "Resumo por Frota",
        }
    }

    /// Kind of content the block renders
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockId::Wash | BlockId::Rollers | BlockId::Offenders | BlockId::SummaryTable => {
                BlockKind::Table
            }
            BlockId::GpsMap | BlockId::WorkedArea => BlockKind::Map,
            _ => BlockKind::Chart,
        }
    }
}

/// Kind of content in a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Table,
    Chart,
    Map,
}

/// A block placed on a page.
///
/// `rows` is a slice of the block's data; a continuation page holds the
/// remaining range of the same table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBlock {
    pub id: BlockId,
    pub kind: BlockKind,
    pub title: String,
    pub rows: Range<usize>,
}

impl PageBlock {
    /// Block covering `rows` of its data
    pub fn new(id: BlockId, rows: Range<usize>) -> Self {
        Self {
            id,
            kind: id.kind(),
            title: id.title().to_string(),
            rows,
        }
    }

    /// Block showing every one of `len` rows
    pub fn whole(id: BlockId, len: usize) -> Self {
        Self::new(id, 0..len)
    }

    /// Remaining rows of a split table
    pub fn continuation(id: BlockId, rows: Range<usize>) -> Self {
        let mut block = Self::new(id, rows);
        block.title = format!("{} (Continuação)", id.title());
        block
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Blocks of one page
pub type PageBlocks = SmallVec<[PageBlock; 4]>;

/// A laid-out report page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    /// Page index (0-based)
    pub index: usize,
    /// Report title printed in the page header
    pub title: String,
    /// Page-wide heading, for pages that carry one
    pub section_title: Option<String>,
    pub blocks: PageBlocks,
}

impl PageDescriptor {
    pub fn new(index: usize, title: impl Into<String>, blocks: PageBlocks) -> Self {
        Self {
            index,
            title: title.into(),
            section_title: None,
            blocks,
        }
    }

    pub fn with_section_title(mut self, section_title: impl Into<String>) -> Self {
        self.section_title = Some(section_title.into());
        self
    }

    /// Check if this page holds a given block
    pub fn contains_block(&self, id: BlockId) -> bool {
        self.blocks.iter().any(|block| block.id == id)
    }

    /// The page's block with the given identity
    pub fn block(&self, id: BlockId) -> Option<&PageBlock> {
        self.blocks.iter().find(|block| block.id == id)
    }
}

impl LayoutMode {
    /// Page-to-block assignment of the wash / rollers / idle section
    pub fn pages(
        &self,
        counts: &LayoutCounts,
        capacities: &LayoutCapacities,
    ) -> SmallVec<[PageBlocks; 4]> {
        let wash = PageBlock::whole(BlockId::Wash, counts.table_a);
        let rollers = PageBlock::whole(BlockId::Rollers, counts.table_b);
        let idle = PageBlock::whole(BlockId::IdleEngine, counts.chart_c);

        let split = capacities.page_cap.min(counts.table_b);
        let rollers_head = PageBlock::new(BlockId::Rollers, 0..split);
        let rollers_tail = PageBlock::continuation(BlockId::Rollers, split..counts.table_b);

        match self {
            LayoutMode::SinglePage => smallvec![smallvec![wash, rollers, idle]],
            LayoutMode::SplitMotorOnly => smallvec![smallvec![wash, rollers], smallvec![idle]],
            LayoutMode::SplitTablesCombined => {
                smallvec![smallvec![wash], smallvec![rollers, idle]]
            }
            LayoutMode::SplitTablesSeparated => {
                smallvec![smallvec![wash], smallvec![rollers], smallvec![idle]]
            }
            LayoutMode::SplitPaginatedCombined => smallvec![
                smallvec![wash],
                smallvec![rollers_head],
                smallvec![rollers_tail, idle],
            ],
            LayoutMode::SplitPaginatedSeparated => smallvec![
                smallvec![wash],
                smallvec![rollers_head],
                smallvec![rollers_tail],
                smallvec![idle],
            ],
        }
    }
}

/// Heading of interval page `page` (0-based) out of `total`
pub fn timeline_section_title(page: usize, total: usize) -> String {
    if total > 1 {
        format!("{} - página {}", TIMELINE_SECTION_TITLE, page + 1)
    } else {
        TIMELINE_SECTION_TITLE.to_string()
    }
}

/// Chunk `equipment_count` timelines into pages of `per_page`.
///
/// Each page gets one timeline block whose rows index the grouped equipment
/// list, paired with its section heading.
pub fn timeline_pages(equipment_count: usize, per_page: usize) -> Vec<(String, PageBlocks)> {
    let per_page = per_page.max(1);
    let total = equipment_count.div_ceil(per_page);

    (0..total)
        .map(|page| {
            let start = page * per_page;
            let end = (start + per_page).min(equipment_count);
            let blocks: PageBlocks = smallvec![PageBlock::new(BlockId::Timeline, start..end)];
            (timeline_section_title(page, total), blocks)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::planner::plan;

    fn ids(page: &PageBlocks) -> Vec<BlockId> {
        page.iter().map(|block| block.id).collect()
    }

    #[test]
    fn test_single_page_holds_everything() {
        let counts = LayoutCounts::new(5, 1, 4);
        let capacities = LayoutCapacities::default();
        let pages = plan(counts, &capacities).pages(&counts, &capacities);
        assert_eq!(pages.len(), 1);
        assert_eq!(
            ids(&pages[0]),
            vec![BlockId::Wash, BlockId::Rollers, BlockId::IdleEngine]
        );
        assert_eq!(pages[0][0].rows, 0..5);
    }

    #[test]
    fn test_motor_only_moves_chart() {
        let counts = LayoutCounts::new(12, 1, 4);
        let capacities = LayoutCapacities::default();
        let pages = plan(counts, &capacities).pages(&counts, &capacities);
        assert_eq!(pages.len(), 2);
        assert_eq!(ids(&pages[0]), vec![BlockId::Wash, BlockId::Rollers]);
        assert_eq!(ids(&pages[1]), vec![BlockId::IdleEngine]);
    }

    #[test]
    fn test_paginated_rollers_use_row_ranges() {
        let counts = LayoutCounts::new(0, 30, 5);
        let capacities = LayoutCapacities::default();
        let mode = plan(counts, &capacities);
        assert_eq!(mode, LayoutMode::SplitPaginatedCombined);

        let pages = mode.pages(&counts, &capacities);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1][0].rows, 0..28);
        assert_eq!(pages[2][0].rows, 28..30);
        assert_eq!(pages[2][0].title, "Aferição de Roletes (Continuação)");
        assert_eq!(ids(&pages[2]), vec![BlockId::Rollers, BlockId::IdleEngine]);
    }

    #[test]
    fn test_paginated_separated_has_four_pages() {
        let counts = LayoutCounts::new(3, 40, 20);
        let capacities = LayoutCapacities::default();
        let mode = plan(counts, &capacities);
        let pages = mode.pages(&counts, &capacities);
        assert_eq!(pages.len(), mode.page_count());
        assert_eq!(ids(&pages[3]), vec![BlockId::IdleEngine]);
        assert_eq!(pages[2][0].row_count(), 12);
    }

    #[test]
    fn test_every_mode_page_count_matches() {
        let capacities = LayoutCapacities::default();
        for (a, b, c) in [(5, 1, 4), (12, 1, 4), (20, 10, 5), (20, 10, 12), (0, 30, 5), (3, 40, 20)] {
            let counts = LayoutCounts::new(a, b, c);
            let mode = plan(counts, &capacities);
            assert_eq!(mode.pages(&counts, &capacities).len(), mode.page_count());
        }
    }

    #[test]
    fn test_block_kinds() {
        assert_eq!(BlockId::Wash.kind(), BlockKind::Table);
        assert_eq!(BlockId::IdleEngine.kind(), BlockKind::Chart);
        assert_eq!(BlockId::GpsMap.kind(), BlockKind::Map);
    }

    #[test]
    fn test_timeline_pages() {
        let pages = timeline_pages(9, TIMELINES_PER_PAGE);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].0, "Intervalos de Operação - página 1");
        assert_eq!(pages[2].1[0].rows, 8..9);

        let single = timeline_pages(3, TIMELINES_PER_PAGE);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].0, "Intervalos de Operação");

        assert!(timeline_pages(0, TIMELINES_PER_PAGE).is_empty());
    }

    #[test]
    fn test_page_descriptor() {
        let page = PageDescriptor::new(
            2,
            "Relatório",
            smallvec![PageBlock::whole(BlockId::Offenders, 5)],
        )
        .with_section_title("Resumo");
        assert!(page.contains_block(BlockId::Offenders));
        assert!(!page.contains_block(BlockId::Wash));
        assert_eq!(page.block(BlockId::Offenders).map(|b| b.row_count()), Some(5));
        assert_eq!(page.section_title.as_deref(), Some("Resumo"));
    }
}
