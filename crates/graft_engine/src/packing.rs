//! # Row Packer
//!
//! Packs an ordered list of controls into a vertical stack of rows. A row
//! holds either two half-width slots or one full-width slot.
//!
//! ```text
//!   y = -top_padding
//!   ┌──────────────┬──────────────┐
//!   │ half  (L)    │ half  (R)    │  row 0   pair
//!   ├──────────────┴──────────────┤
//!   │ full (deferred while 0 open)│  row 1   full
//!   ├──────────────┬──────────────┤
//!   │ half  (L)    │              │  row 2   pair, closed as-is
//!   └──────────────┴──────────────┘
//! ```
//!
//! ## State machine
//!
//! | Open row        | Item | Action                                    |
//! |-----------------|------|-------------------------------------------|
//! | none            | full | emit a full row                           |
//! | none            | half | open a pair row, place left               |
//! | left empty      | half | place left                                |
//! | left empty      | full | defer                                     |
//! | left filled     | half | place right, close, flush deferred (FIFO) |
//! | left filled     | full | defer                                     |
//!
//! The packer owns no tree state. Everything it emits goes through a
//! [`RowSink`], so the same state machine drives the live host tree and the
//! [`RecordingSink`] used by tests and benchmarks.

use std::collections::VecDeque;
use std::convert::Infallible;

use graft_shared::constants::LAYOUT_EPSILON;
use graft_shared::Vec2;

// =============================================================================
// METRICS
// =============================================================================

/// Column geometry for one packing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackMetrics {
    /// Template cell size.
    pub cell_size: Vec2,
    /// Column and row spacing.
    pub spacing: Vec2,
    /// Distance from the section top to the first row.
    pub top_padding: f32,
    /// Width left for rows once both insets are removed.
    pub available: f32,
    /// Width of one half slot.
    pub column_width: f32,
}

impl PackMetrics {
    /// Derives the column geometry from the measured section width.
    ///
    /// A width too small for a single cell (including an unmeasurable one)
    /// falls back to two cells plus the column spacing.
    #[must_use]
    pub fn new(
        cell_size: Vec2,
        spacing: Vec2,
        top_padding: f32,
        inset_left: f32,
        inset_right: f32,
        section_width: f32,
    ) -> Self {
        let fallback = 2.0 * cell_size.x + spacing.x;
        let width = if section_width > 0.0 { section_width } else { fallback };

        let mut available = width - inset_left - inset_right;
        if available < cell_size.x {
            available = fallback;
        }

        let mut column_width = (available - spacing.x) / 2.0;
        if column_width < 1.0 {
            column_width = cell_size.x;
        }

        Self {
            cell_size,
            spacing,
            top_padding,
            available,
            column_width,
        }
    }

    /// Height a control asks for: its preferred height, or the cell height
    /// when it declares none.
    #[must_use]
    pub fn desired_height(&self, preferred: Option<Vec2>) -> f32 {
        match preferred {
            Some(size) if size.y > 0.0 => size.y,
            _ => self.cell_size.y,
        }
    }

    /// Returns true if a control is wider than one column.
    #[must_use]
    pub fn is_full_width(&self, preferred: Option<Vec2>) -> bool {
        preferred.is_some_and(|size| size.x > self.column_width + LAYOUT_EPSILON)
    }
}

// =============================================================================
// SINK
// =============================================================================

/// Receives the rows and placements decided by a [`RowPacker`].
pub trait RowSink {
    /// What gets placed.
    type Item;
    /// Handle to one slot.
    type Slot: Copy;
    /// Failure while materializing a row or a placement.
    type Error;

    /// Opens a two-column row and returns its left and right slots.
    fn open_pair_row(
        &mut self,
        index: usize,
        y: f32,
        height: f32,
        column_width: f32,
    ) -> Result<(Self::Slot, Self::Slot), Self::Error>;

    /// Opens a single-slot row spanning `width`.
    fn open_full_row(
        &mut self,
        index: usize,
        y: f32,
        height: f32,
        width: f32,
    ) -> Result<Self::Slot, Self::Error>;

    /// Grows an open row (and its slots) to `height`.
    fn grow_row(&mut self, index: usize, height: f32) -> Result<(), Self::Error>;

    /// Puts an item into a slot.
    fn place(&mut self, item: Self::Item, slot: Self::Slot) -> Result<(), Self::Error>;
}

// =============================================================================
// PACKER
// =============================================================================

/// Outcome of a packing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PackSummary {
    /// Rows emitted; indices `0..rows` are in use.
    pub rows: usize,
    /// Items placed.
    pub placed: usize,
    /// Largest number of items waiting at once.
    pub deferred_peak: usize,
    /// Cursor below the last row.
    pub cursor: f32,
}

#[derive(Debug, Clone, Copy)]
struct OpenRow<S> {
    index: usize,
    height: f32,
    left: S,
    right: S,
    left_filled: bool,
}

/// Streaming two-column packer.
pub struct RowPacker<'a, S: RowSink> {
    sink: &'a mut S,
    metrics: PackMetrics,
    cursor: f32,
    next_row: usize,
    open: Option<OpenRow<S::Slot>>,
    deferred: VecDeque<(S::Item, f32)>,
    placed: usize,
    deferred_peak: usize,
}

impl<'a, S: RowSink> RowPacker<'a, S> {
    /// Starts a pass at `-top_padding`.
    pub fn new(sink: &'a mut S, metrics: PackMetrics) -> Self {
        Self {
            sink,
            metrics,
            cursor: -metrics.top_padding,
            next_row: 0,
            open: None,
            deferred: VecDeque::new(),
            placed: 0,
            deferred_peak: 0,
        }
    }

    /// Feeds the next item in request order.
    ///
    /// # Errors
    ///
    /// Propagates the first sink failure.
    pub fn push(&mut self, item: S::Item, preferred: Option<Vec2>) -> Result<(), S::Error> {
        let full = self.metrics.is_full_width(preferred);
        let height = self.metrics.desired_height(preferred);

        match self.open {
            None if full => self.emit_full(item, height),
            None => {
                let row_height = height.max(self.metrics.cell_size.y);
                let index = self.next_row;
                let (left, right) = self.sink.open_pair_row(
                    index,
                    self.cursor,
                    row_height,
                    self.metrics.column_width,
                )?;
                self.open = Some(OpenRow {
                    index,
                    height: row_height,
                    left,
                    right,
                    left_filled: false,
                });
                self.place_in_open(item, height)
            }
            Some(_) if full => {
                self.deferred.push_back((item, height));
                self.deferred_peak = self.deferred_peak.max(self.deferred.len());
                Ok(())
            }
            Some(_) => self.place_in_open(item, height),
        }
    }

    /// Closes the open row, flushes what is still deferred and reports.
    ///
    /// # Errors
    ///
    /// Propagates the first sink failure.
    pub fn finish(mut self) -> Result<PackSummary, S::Error> {
        self.close_row();
        self.flush_deferred()?;
        Ok(PackSummary {
            rows: self.next_row,
            placed: self.placed,
            deferred_peak: self.deferred_peak,
            cursor: self.cursor,
        })
    }

    fn place_in_open(&mut self, item: S::Item, height: f32) -> Result<(), S::Error> {
        let Some(mut row) = self.open else {
            return Ok(());
        };

        if height > row.height {
            self.sink.grow_row(row.index, height)?;
            row.height = height;
        }

        if row.left_filled {
            self.sink.place(item, row.right)?;
            self.placed += 1;
            self.open = Some(row);
            self.close_row();
            self.flush_deferred()
        } else {
            self.sink.place(item, row.left)?;
            self.placed += 1;
            row.left_filled = true;
            self.open = Some(row);
            Ok(())
        }
    }

    fn close_row(&mut self) {
        if let Some(row) = self.open.take() {
            self.cursor -= row.height + self.metrics.spacing.y;
            self.next_row = row.index + 1;
        }
    }

    fn flush_deferred(&mut self) -> Result<(), S::Error> {
        while let Some((item, height)) = self.deferred.pop_front() {
            self.emit_full(item, height)?;
        }
        Ok(())
    }

    fn emit_full(&mut self, item: S::Item, height: f32) -> Result<(), S::Error> {
        let height = height.max(self.metrics.cell_size.y);
        let index = self.next_row;
        let slot = self
            .sink
            .open_full_row(index, self.cursor, height, self.metrics.available)?;
        self.sink.place(item, slot)?;
        self.placed += 1;
        self.cursor -= height + self.metrics.spacing.y;
        self.next_row = index + 1;
        Ok(())
    }
}

// =============================================================================
// RECORDING SINK
// =============================================================================

/// Contents of a recorded row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowLayout<I> {
    /// Two-column row.
    Pair {
        /// Left occupant.
        left: Option<I>,
        /// Right occupant.
        right: Option<I>,
    },
    /// Single-slot row.
    Full(Option<I>),
}

/// A row as the packer emitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRow<I> {
    /// Dense row index.
    pub index: usize,
    /// Top edge, relative to the section top.
    pub y: f32,
    /// Final height.
    pub height: f32,
    /// Occupants.
    pub layout: RowLayout<I>,
}

/// Slot handle of a [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSlot {
    /// Left half of a pair row.
    Left(usize),
    /// Right half of a pair row.
    Right(usize),
    /// The only slot of a full row.
    Full(usize),
}

/// Sink that only records the plan.
#[derive(Debug)]
pub struct RecordingSink<I> {
    /// Rows in emission order.
    pub rows: Vec<PlannedRow<I>>,
}

impl<I> RecordingSink<I> {
    /// Creates an empty recording.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<I> Default for RecordingSink<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> RowSink for RecordingSink<I> {
    type Item = I;
    type Slot = PlanSlot;
    type Error = Infallible;

    fn open_pair_row(
        &mut self,
        index: usize,
        y: f32,
        height: f32,
        _column_width: f32,
    ) -> Result<(PlanSlot, PlanSlot), Infallible> {
        self.rows.push(PlannedRow {
            index,
            y,
            height,
            layout: RowLayout::Pair {
                left: None,
                right: None,
            },
        });
        Ok((PlanSlot::Left(index), PlanSlot::Right(index)))
    }

    fn open_full_row(
        &mut self,
        index: usize,
        y: f32,
        height: f32,
        _width: f32,
    ) -> Result<PlanSlot, Infallible> {
        self.rows.push(PlannedRow {
            index,
            y,
            height,
            layout: RowLayout::Full(None),
        });
        Ok(PlanSlot::Full(index))
    }

    fn grow_row(&mut self, index: usize, height: f32) -> Result<(), Infallible> {
        if let Some(row) = self.rows.iter_mut().find(|row| row.index == index) {
            row.height = row.height.max(height);
        }
        Ok(())
    }

    fn place(&mut self, item: I, slot: PlanSlot) -> Result<(), Infallible> {
        let index = match slot {
            PlanSlot::Left(index) | PlanSlot::Right(index) | PlanSlot::Full(index) => index,
        };
        let Some(row) = self.rows.iter_mut().find(|row| row.index == index) else {
            return Ok(());
        };
        match (&mut row.layout, slot) {
            (RowLayout::Pair { left, .. }, PlanSlot::Left(_)) => *left = Some(item),
            (RowLayout::Pair { right, .. }, PlanSlot::Right(_)) => *right = Some(item),
            (RowLayout::Full(occupant), PlanSlot::Full(_)) => *occupant = Some(item),
            _ => {}
        }
        Ok(())
    }
}

/// Packs `items` without touching a tree and returns the rows.
pub fn plan<I>(
    metrics: PackMetrics,
    items: impl IntoIterator<Item = (I, Option<Vec2>)>,
) -> (Vec<PlannedRow<I>>, PackSummary) {
    let mut sink = RecordingSink::new();
    let mut packer = RowPacker::new(&mut sink, metrics);
    for (item, preferred) in items {
        match packer.push(item, preferred) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
    let summary = match packer.finish() {
        Ok(summary) => summary,
        Err(never) => match never {},
    };
    (sink.rows, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: Option<Vec2> = Some(Vec2::new(300.0, 60.0));

    fn metrics() -> PackMetrics {
        // 760 wide, 30px insets -> 700 available, 345 per column.
        PackMetrics::new(
            Vec2::new(300.0, 60.0),
            Vec2::new(10.0, 10.0),
            0.0,
            30.0,
            30.0,
            760.0,
        )
    }

    fn full(height: f32) -> Option<Vec2> {
        Some(Vec2::new(700.0, height))
    }

    fn pair<I>(left: I, right: Option<I>) -> RowLayout<I> {
        RowLayout::Pair {
            left: Some(left),
            right,
        }
    }

    #[test]
    fn test_metrics() {
        let m = metrics();
        assert_eq!(m.available, 700.0);
        assert_eq!(m.column_width, 345.0);
        assert!(!m.is_full_width(HALF));
        assert!(!m.is_full_width(None));
        assert!(m.is_full_width(full(60.0)));
        assert!(!m.is_full_width(Some(Vec2::new(345.005, 60.0))));
        assert_eq!(m.desired_height(Some(Vec2::new(100.0, 0.0))), 60.0);
    }

    #[test]
    fn test_narrow_section_falls_back() {
        let unmeasured = PackMetrics::new(Vec2::new(300.0, 60.0), Vec2::new(10.0, 10.0), 0.0, 30.0, 30.0, 0.0);
        assert_eq!(unmeasured.available, 550.0);
        assert_eq!(unmeasured.column_width, 270.0);

        let tight = PackMetrics::new(Vec2::new(300.0, 60.0), Vec2::new(10.0, 10.0), 0.0, 30.0, 30.0, 200.0);
        assert_eq!(tight.available, 610.0);
        assert_eq!(tight.column_width, 300.0);
    }

    #[test]
    fn test_four_halves_then_full() {
        let items = [("a", HALF), ("b", HALF), ("c", HALF), ("d", HALF), ("e", full(80.0))];
        let (rows, summary) = plan(metrics(), items);

        assert_eq!(summary.rows, 3);
        assert_eq!(summary.placed, 5);
        assert_eq!(rows[0].layout, pair("a", Some("b")));
        assert_eq!(rows[1].layout, pair("c", Some("d")));
        assert_eq!(rows[2].layout, RowLayout::Full(Some("e")));
        assert_eq!(rows[2].height, 80.0);
        assert_eq!(
            rows.iter().map(|row| row.y).collect::<Vec<_>>(),
            vec![0.0, -70.0, -140.0]
        );
    }

    #[test]
    fn test_full_waits_for_open_row() {
        let items = [("a", HALF), ("wide", full(60.0)), ("b", HALF)];
        let (rows, summary) = plan(metrics(), items);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].layout, pair("a", Some("b")));
        assert_eq!(rows[1].layout, RowLayout::Full(Some("wide")));
        assert_eq!(summary.deferred_peak, 1);
    }

    #[test]
    fn test_deferred_keep_order() {
        let items = [
            ("a", HALF),
            ("x", full(60.0)),
            ("y", full(90.0)),
            ("b", HALF),
            ("c", HALF),
            ("z", full(60.0)),
        ];
        let (rows, _) = plan(metrics(), items);

        let layouts: Vec<_> = rows.into_iter().map(|row| row.layout).collect();
        assert_eq!(
            layouts,
            vec![
                pair("a", Some("b")),
                RowLayout::Full(Some("x")),
                RowLayout::Full(Some("y")),
                pair("c", None),
                RowLayout::Full(Some("z")),
            ]
        );
    }

    #[test]
    fn test_row_grows_to_tallest_occupant() {
        let items = [("a", HALF), ("b", Some(Vec2::new(300.0, 90.0))), ("c", HALF)];
        let (rows, summary) = plan(metrics(), items);

        assert_eq!(rows[0].height, 90.0);
        assert_eq!(rows[1].y, -100.0);
        assert_eq!(rows[1].height, 60.0);
        assert_eq!(summary.cursor, -170.0);
    }

    #[test]
    fn test_short_half_keeps_cell_height() {
        let items = [("a", Some(Vec2::new(300.0, 30.0)))];
        let (rows, _) = plan(metrics(), items);
        assert_eq!(rows[0].height, 60.0);
    }

    #[test]
    fn test_short_full_keeps_cell_height() {
        let items = [("a", full(30.0)), ("b", full(90.0))];
        let (rows, summary) = plan(metrics(), items);

        assert_eq!(rows[0].height, 60.0);
        assert_eq!(rows[1].y, -70.0);
        assert_eq!(rows[1].height, 90.0);
        assert_eq!(summary.cursor, -170.0);
    }

    #[test]
    fn test_all_full_width() {
        let items = [("a", full(60.0)), ("b", full(70.0)), ("c", full(80.0))];
        let (rows, summary) = plan(metrics(), items);

        assert_eq!(summary.rows, 3);
        assert!(rows.iter().all(|row| matches!(row.layout, RowLayout::Full(Some(_)))));
        assert_eq!(summary.deferred_peak, 0);
    }

    #[test]
    fn test_halves_make_ceil_rows() {
        for n in 0..9usize {
            let items = (0..n).map(|i| (i, HALF));
            let (rows, summary) = plan(metrics(), items);

            assert_eq!(summary.rows, n.div_ceil(2));
            for row in &rows[..rows.len().saturating_sub(1)] {
                assert!(matches!(row.layout, RowLayout::Pair { right: Some(_), .. }));
            }
        }
    }

    #[test]
    fn test_empty_pass() {
        let (rows, summary) = plan::<&str>(metrics(), []);
        assert!(rows.is_empty());
        assert_eq!(summary, PackSummary::default());
    }
}
