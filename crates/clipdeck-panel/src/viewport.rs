use std::ops::Range;

/// Scroll window over the presented rows.
///
/// A height of zero means the front end has not reported its size yet;
/// every row counts as visible until it does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Viewport { offset: 0, height }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
    }

    /// Scroll the least amount needed for `row` to be visible, aligning it
    /// with whichever edge it is closest to.
    pub fn scroll_into_view(&mut self, row: usize) {
        if self.height == 0 {
            return;
        }
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + self.height {
            self.offset = row + 1 - self.height;
        }
    }

    /// Keep the offset inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        let max_offset = len.saturating_sub(self.height.max(1));
        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }

    /// Range of row positions currently on screen.
    pub fn visible(&self, len: usize) -> Range<usize> {
        if self.height == 0 {
            return 0..len;
        }
        let start = self.offset.min(len);
        let end = (self.offset + self.height).min(len);
        start..end
    }
}
