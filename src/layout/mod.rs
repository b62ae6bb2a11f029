//! Page layout planning

mod pagination;
mod planner;

pub use pagination::{
    timeline_pages, timeline_section_title, BlockId, BlockKind, PageBlock, PageBlocks,
    PageDescriptor, TIMELINES_PER_PAGE, TIMELINE_SECTION_TITLE,
};
pub use planner::{plan, LayoutCapacities, LayoutCounts, LayoutMode};
