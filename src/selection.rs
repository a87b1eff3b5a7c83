//! Row selection over an ordered list
//!
//! Selection is modelled as a sorted set of closed integer intervals with
//! explicit merge and split operations, plus a focused (anchor) row. The
//! focus decides where a shift-click range starts and where attention lands
//! after a row is toggled out of a contiguous block.

/// A closed interval of row indices, `start <= end`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

impl Interval {
    pub fn new(start: usize, end: usize) -> Interval {
        debug_assert!(start <= end);
        Interval { start, end }
    }

    pub fn point(idx: usize) -> Interval {
        Interval::new(idx, idx)
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.start <= idx && idx <= self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// The current row selection and focus
///
/// Indices are positions in the row list the host currently displays
/// (`Coordinator::visible_rows`), not raw snapshot positions: whoever
/// renders the rows and whoever acts on the selection must index the same
/// list. A reload or filter change may reorder that list, so hosts clear
/// the selection when the displayed rows change under it.
///
/// Invariants: intervals are sorted, non-overlapping, and non-adjacent
/// (adjacent intervals are merged on insert). An empty selection always has
/// no focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    intervals: Vec<Interval>,
    focus: Option<usize>,
}

impl Selection {
    pub fn new() -> Selection {
        Selection::default()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.intervals.iter().map(Interval::len).sum()
    }

    pub fn focused(&self) -> Option<usize> {
        self.focus
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn is_selected(&self, idx: usize) -> bool {
        self.intervals.iter().any(|iv| iv.contains(idx))
    }

    /// All selected indices in ascending order
    pub fn indices(&self) -> Vec<usize> {
        self.intervals
            .iter()
            .flat_map(|iv| iv.start..=iv.end)
            .collect()
    }

    /// Plain click: select only this row, or toggle it out if selected
    pub fn click(&mut self, idx: usize) {
        if self.is_selected(idx) {
            self.focus = self.refocus_after_removal(idx);
            self.remove(idx);
        } else {
            self.intervals = vec![Interval::point(idx)];
            self.focus = Some(idx);
        }
    }

    /// Shift-click: contiguous inclusive range between the focus and this row
    ///
    /// Both orderings are accepted; the range replaces the selection. Without
    /// a focus this degrades to a plain click.
    pub fn shift_click(&mut self, idx: usize) {
        match self.focus {
            Some(anchor) => {
                let (start, end) = if anchor <= idx { (anchor, idx) } else { (idx, anchor) };
                self.intervals = vec![Interval::new(start, end)];
            }
            None => self.click(idx),
        }
    }

    /// Ctrl/cmd-click: toggle this row without disturbing the others
    pub fn toggle_click(&mut self, idx: usize) {
        if self.is_selected(idx) {
            self.focus = self.refocus_after_removal(idx);
            self.remove(idx);
        } else {
            self.insert(idx);
            self.focus = Some(idx);
        }
    }

    /// Back to no focus and an empty selection, regardless of current state
    pub fn clear(&mut self) {
        self.intervals.clear();
        self.focus = None;
    }

    /// New focus when `idx` is about to be toggled out of the selection:
    /// prefer the next row in the same block, else the start of the previous
    /// block, else nothing.
    fn refocus_after_removal(&self, idx: usize) -> Option<usize> {
        let pos = self.intervals.iter().position(|iv| iv.contains(idx))?;
        let block = self.intervals[pos];
        if idx > block.start {
            return Some(block.start);
        }
        if block.end > idx {
            return Some(idx + 1);
        }
        // Removing a singleton block: fall back to the previous one
        if pos > 0 {
            Some(self.intervals[pos - 1].start)
        } else {
            None
        }
    }

    fn insert(&mut self, idx: usize) {
        if self.is_selected(idx) {
            return;
        }
        let pos = self
            .intervals
            .iter()
            .position(|iv| iv.start > idx)
            .unwrap_or(self.intervals.len());
        self.intervals.insert(pos, Interval::point(idx));

        // Merge with the right neighbour, then the left
        if pos + 1 < self.intervals.len() && self.intervals[pos + 1].start == idx + 1 {
            self.intervals[pos].end = self.intervals[pos + 1].end;
            self.intervals.remove(pos + 1);
        }
        if pos > 0 && idx > 0 && self.intervals[pos - 1].end == idx - 1 {
            self.intervals[pos - 1].end = self.intervals[pos].end;
            self.intervals.remove(pos);
        }
    }

    fn remove(&mut self, idx: usize) {
        let Some(pos) = self.intervals.iter().position(|iv| iv.contains(idx)) else {
            return;
        };
        let block = self.intervals[pos];
        match (idx == block.start, idx == block.end) {
            (true, true) => {
                self.intervals.remove(pos);
            }
            (true, false) => self.intervals[pos].start = idx + 1,
            (false, true) => self.intervals[pos].end = idx - 1,
            (false, false) => {
                // Split the block around the removed row
                self.intervals[pos].end = idx - 1;
                self.intervals
                    .insert(pos + 1, Interval::new(idx + 1, block.end));
            }
        }
        if self.intervals.is_empty() {
            self.focus = None;
        }
    }
}
