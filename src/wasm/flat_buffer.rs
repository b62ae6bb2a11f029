//! Flat buffer protocol for zero-copy transfer of timeline geometry
//!
//! ## u32 Buffer Layout:
//! ```text
//! Header:
//! [0]     MAGIC (0x48525456 = "HRTV" for validation)
//! [1]     SCHEMA_VERSION (currently 1)
//! [2]     timeline_count
//! [3]     text_buffer_len
//! [4]     tick_count
//! [5]     u32_tick_offset (index in u32_data where ticks start, 0 if none)
//! [6]     f32_tick_offset (index in f32_data where ticks start, 0 if none)
//! [7..]   timeline data...
//!
//! Per-timeline:
//!   [name_offset, name_len, name_utf16_offset, name_utf16_len, lane_count, bar_count]
//!   per-lane: [category]
//!   per-bar:  [category, flags, label_offset, label_len, label_utf16_offset, label_utf16_len,
//!              caption_offset, caption_len, caption_utf16_offset, caption_utf16_len]
//!     flags: bit0=has_label, bit1=has_caption
//!
//! At u32_tick_offset (shared by every timeline):
//!   per-tick: [hour, anchor, label_offset, label_len, label_utf16_offset, label_utf16_len]
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! Per-timeline: [width, height]
//! Per-lane: [x, y, width, height]
//! Per-bar: [x, y, width, height]
//! At f32_tick_offset: per-tick [x, y_top, y_bottom]
//! ```

use crate::timeline::{GridLine, IntervalCategory, TextAnchor, TimelineGeometry};

/// Magic number for format validation: "HRTV" (Harvest Report TimeView)
pub const MAGIC: u32 = 0x48525456;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 7;

/// Category opcodes
pub const CATEGORY_PRODUCTIVE: u32 = 0;
pub const CATEGORY_AVAILABLE: u32 = 1;
pub const CATEGORY_MAINTENANCE: u32 = 2;
pub const CATEGORY_NO_DATA: u32 = 3;
pub const CATEGORY_UNKNOWN: u32 = u32::MAX;

/// Anchor opcodes
pub const ANCHOR_START: u32 = 0;
pub const ANCHOR_MIDDLE: u32 = 1;
pub const ANCHOR_END: u32 = 2;

/// Flags bitmask
pub const FLAG_HAS_LABEL: u32 = 0b0001;
pub const FLAG_HAS_CAPTION: u32 = 0b0010;

pub const U32_PER_TIMELINE: usize = 6;
pub const F32_PER_TIMELINE: usize = 2;
pub const U32_PER_LANE: usize = 1;
pub const F32_PER_LANE: usize = 4;
pub const U32_PER_BAR: usize = 10;
pub const F32_PER_BAR: usize = 4;
pub const U32_PER_TICK: usize = 6;
pub const F32_PER_TICK: usize = 3;

/// Timeline buffer for zero-copy WASM transfer
pub struct TimelineBuffer {
    /// Integer data (counts, offsets, opcodes)
    pub u32_data: Vec<u32>,
    /// Float data (positions, dimensions)
    pub f32_data: Vec<f32>,
    /// UTF-8 text buffer
    pub text_data: Vec<u8>,

    // Ticks are shared, written once in finalize()
    pending_ticks: Vec<GridLine>,

    // Track cumulative UTF-16 offset for efficient JS decoding
    utf16_text_offset: usize,
}

impl Default for TimelineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineBuffer {
    pub fn new() -> Self {
        Self {
            u32_data: Vec::with_capacity(256),
            f32_data: Vec::with_capacity(256),
            text_data: Vec::with_capacity(512),
            pending_ticks: Vec::new(),
            utf16_text_offset: 0,
        }
    }

    /// Encode every timeline in one pass
    pub fn from_timelines(timelines: &[TimelineGeometry]) -> Self {
        let mut buf = Self::new();
        buf.encode(timelines);
        buf
    }

    /// Re-encode into the existing buffers
    pub fn encode(&mut self, timelines: &[TimelineGeometry]) {
        let ticks: &[GridLine] = timelines.first().map_or(&[], |t| t.ticks.as_slice());
        let lanes: usize = timelines.iter().map(|t| t.lanes.len()).sum();
        let bars: usize = timelines.iter().map(|t| t.bars.len()).sum();
        let text: usize = timelines
            .iter()
            .map(|t| {
                t.equipment.len()
                    + t.bars
                        .iter()
                        .map(|b| {
                            b.label.as_ref().map_or(0, String::len)
                                + b.caption.as_ref().map_or(0, String::len)
                        })
                        .sum::<usize>()
            })
            .sum::<usize>()
            + ticks.iter().map(|t| t.label.len()).sum::<usize>();

        self.prepare(
            HEADER_SIZE
                + timelines.len() * U32_PER_TIMELINE
                + lanes * U32_PER_LANE
                + bars * U32_PER_BAR
                + ticks.len() * U32_PER_TICK,
            timelines.len() * F32_PER_TIMELINE
                + lanes * F32_PER_LANE
                + bars * F32_PER_BAR
                + ticks.len() * F32_PER_TICK,
            text,
        );
        self.write_header(timelines.len() as u32);
        for timeline in timelines {
            self.write_timeline(timeline);
        }
        self.write_ticks(ticks);
        self.finalize();
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.f32_data.clear();
        self.text_data.clear();
        self.pending_ticks.clear();
        self.utf16_text_offset = 0;
    }

    /// Pre-allocate buffers to avoid reallocation while encoding.
    /// JS holds pointers to these buffers, so a realloc would leave them dangling.
    pub fn prepare(&mut self, u32_needed: usize, f32_needed: usize, text_needed: usize) {
        let u32_target = u32_needed + 32;
        let f32_target = f32_needed + 32;
        let text_target = text_needed + 256;

        if self.u32_data.capacity() < u32_target {
            self.u32_data = Vec::with_capacity(u32_target);
        } else {
            self.u32_data.clear();
        }

        if self.f32_data.capacity() < f32_target {
            self.f32_data = Vec::with_capacity(f32_target);
        } else {
            self.f32_data.clear();
        }

        if self.text_data.capacity() < text_target {
            self.text_data = Vec::with_capacity(text_target);
        } else {
            self.text_data.clear();
        }

        self.pending_ticks.clear();
        self.utf16_text_offset = 0;
    }

    pub fn write_header(&mut self, timeline_count: u32) {
        self.u32_data.push(MAGIC); // [0] magic number
        self.u32_data.push(SCHEMA_VERSION); // [1] schema version
        self.u32_data.push(timeline_count); // [2] timeline_count
        self.u32_data.push(0); // [3] text_buffer_len (placeholder)
        self.u32_data.push(0); // [4] tick_count (placeholder)
        self.u32_data.push(0); // [5] u32_tick_offset (placeholder)
        self.u32_data.push(0); // [6] f32_tick_offset (placeholder)
    }

    /// Append text, returning [offset, len, utf16_offset, utf16_len]
    fn push_text(&mut self, text: &str) -> [u32; 4] {
        let offset = self.text_data.len() as u32;
        self.text_data.extend_from_slice(text.as_bytes());
        let utf16_offset = self.utf16_text_offset as u32;
        let utf16_len = text.chars().map(|c| c.len_utf16()).sum::<usize>();
        self.utf16_text_offset += utf16_len;
        [offset, text.len() as u32, utf16_offset, utf16_len as u32]
    }

    /// Optional text; absent text is written as zeros and must be skipped
    /// by checking the flags
    fn push_optional_text(&mut self, text: Option<&str>) -> [u32; 4] {
        text.map_or([0; 4], |t| self.push_text(t))
    }

    pub fn write_timeline(&mut self, timeline: &TimelineGeometry) {
        let name = self.push_text(&timeline.equipment);
        self.u32_data.extend_from_slice(&name);
        self.u32_data.push(timeline.lanes.len() as u32);
        self.u32_data.push(timeline.bars.len() as u32);
        self.f32_data.push(timeline.width);
        self.f32_data.push(timeline.height);

        for lane in &timeline.lanes {
            self.u32_data.push(category_opcode(lane.category));
            self.f32_data
                .extend_from_slice(&[lane.rect.x, lane.rect.y, lane.rect.width, lane.rect.height]);
        }

        for bar in &timeline.bars {
            let mut flags = 0;
            if bar.label.is_some() {
                flags |= FLAG_HAS_LABEL;
            }
            if bar.caption.is_some() {
                flags |= FLAG_HAS_CAPTION;
            }
            let label = self.push_optional_text(bar.label.as_deref());
            let caption = self.push_optional_text(bar.caption.as_deref());

            self.u32_data.push(category_opcode(bar.category));
            self.u32_data.push(flags);
            self.u32_data.extend_from_slice(&label);
            self.u32_data.extend_from_slice(&caption);
            self.f32_data
                .extend_from_slice(&[bar.rect.x, bar.rect.y, bar.rect.width, bar.rect.height]);
        }
    }

    /// Set the shared hour ticks (written to buffers in finalize())
    pub fn write_ticks(&mut self, ticks: &[GridLine]) {
        self.pending_ticks = ticks.to_vec();
    }

    /// Write pending ticks and synchronize the header.
    /// Must be called after every timeline has been written.
    pub fn finalize(&mut self) {
        if self.u32_data.len() < HEADER_SIZE {
            return;
        }

        let ticks = std::mem::take(&mut self.pending_ticks);
        if ticks.is_empty() {
            self.u32_data[5] = 0;
            self.u32_data[6] = 0;
        } else {
            self.u32_data[5] = self.u32_data.len() as u32;
            self.u32_data[6] = self.f32_data.len() as u32;
            for tick in &ticks {
                let label = self.push_text(&tick.label);
                self.u32_data.push(tick.hour);
                self.u32_data.push(anchor_opcode(tick.anchor));
                self.u32_data.extend_from_slice(&label);
                self.f32_data.extend_from_slice(&[tick.x, tick.y_top, tick.y_bottom]);
            }
        }
        self.u32_data[4] = ticks.len() as u32;

        // Sync text buffer length
        self.u32_data[3] = self.text_data.len() as u32;
    }

    // Accessors for WASM (wasm32 linear memory uses u32 offsets)

    pub fn u32_ptr(&self) -> u32 {
        self.u32_data.as_ptr() as u32
    }

    pub fn u32_len(&self) -> u32 {
        self.u32_data.len() as u32
    }

    pub fn f32_ptr(&self) -> u32 {
        self.f32_data.as_ptr() as u32
    }

    pub fn f32_len(&self) -> u32 {
        self.f32_data.len() as u32
    }

    pub fn text_ptr(&self) -> u32 {
        self.text_data.as_ptr() as u32
    }

    pub fn text_len(&self) -> u32 {
        self.text_data.len() as u32
    }
}

/// Convert an interval category to its opcode
pub fn category_opcode(category: IntervalCategory) -> u32 {
    match category {
        IntervalCategory::Productive => CATEGORY_PRODUCTIVE,
        IntervalCategory::Available => CATEGORY_AVAILABLE,
        IntervalCategory::Maintenance => CATEGORY_MAINTENANCE,
        IntervalCategory::NoData => CATEGORY_NO_DATA,
        IntervalCategory::Unknown => CATEGORY_UNKNOWN,
    }
}

pub fn anchor_opcode(anchor: TextAnchor) -> u32 {
    match anchor {
        TextAnchor::Start => ANCHOR_START,
        TextAnchor::Middle => ANCHOR_MIDDLE,
        TextAnchor::End => ANCHOR_END,
    }
}
