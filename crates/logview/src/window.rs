#![allow(
    clippy::cast_possible_truncation, // Pixel offsets floor/ceil into indices
    clippy::cast_sign_loss,           // Offsets are clamped non-negative first
    clippy::cast_precision_loss       // Index-to-pixel products stay far below 2^52
)]

//! Scroll-position to rendered-slice mapping with hysteresis

/// The renderable portion of the log list for the current scroll position.
///
/// `start..end` index into the log store (0 = newest); the spacers are the
/// pixel heights that stand in for everything outside the window so the
/// scrollbar geometry stays correct.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowSlice {
    pub start: usize,
    pub end: usize,
    pub top_spacer: f64,
    pub bottom_spacer: f64,
}

impl WindowSlice {
    /// Number of entries actually rendered.
    #[must_use]
    pub fn rendered_count(&self) -> usize {
        self.end - self.start
    }
}

/// Maps a pixel scroll offset and viewport height onto a bounded slice of
/// the log store, with lookahead/lookbehind buffering.
///
/// The cost of a recompute is O(visible count) regardless of total log
/// length, and sub-half-item scroll jitter returns the cached slice without
/// recomputing at all.
#[derive(Debug, Clone)]
pub struct VirtualWindow {
    item_height: f64,
    viewport_height: f64,
    buffer_count: usize,
    last_offset: f64,
    slice: WindowSlice,
}

/// Fixed row height of the log viewer, in pixels.
pub const DEFAULT_ITEM_HEIGHT: f64 = 24.0;

/// Extra rows rendered above and below the viewport.
pub const DEFAULT_BUFFER_COUNT: usize = 2;

impl VirtualWindow {
    #[must_use]
    pub fn new(item_height: f64, viewport_height: f64, buffer_count: usize) -> Self {
        Self {
            item_height,
            viewport_height,
            buffer_count,
            last_offset: 0.0,
            slice: WindowSlice::default(),
        }
    }

    /// Window with the standard log-viewer geometry.
    #[must_use]
    pub fn with_viewport(viewport_height: f64) -> Self {
        Self::new(DEFAULT_ITEM_HEIGHT, viewport_height, DEFAULT_BUFFER_COUNT)
    }

    /// Handle a scroll event. Recomputes only when the offset moved by more
    /// than half an item height since the last accepted offset; smaller
    /// deltas (sub-pixel scroll storms) return the cached slice.
    pub fn on_scroll(&mut self, offset: f64, total_len: usize) -> WindowSlice {
        if (offset - self.last_offset).abs() <= self.item_height / 2.0 {
            return self.slice;
        }
        self.last_offset = offset.max(0.0);
        self.recompute(total_len)
    }

    /// Handle a viewport resize; always recomputes.
    pub fn on_resize(&mut self, viewport_height: f64, total_len: usize) -> WindowSlice {
        self.viewport_height = viewport_height.max(0.0);
        self.recompute(total_len)
    }

    /// Recompute at the current offset (after the store grew or was cleared).
    pub fn refresh(&mut self, total_len: usize) -> WindowSlice {
        self.recompute(total_len)
    }

    /// The most recently computed slice.
    #[must_use]
    pub fn current(&self) -> WindowSlice {
        self.slice
    }

    /// Upper bound on rendered entries for the current geometry.
    #[must_use]
    pub fn max_rendered(&self) -> usize {
        (self.viewport_height / self.item_height).ceil() as usize + 2 * self.buffer_count
    }

    fn recompute(&mut self, total_len: usize) -> WindowSlice {
        let first_visible = (self.last_offset / self.item_height).floor() as usize;
        let start = first_visible.saturating_sub(self.buffer_count);
        let visible_count = self.max_rendered();
        let end = (start + visible_count).min(total_len);
        let start = start.min(end);

        let rendered = end - start;
        let below = total_len - (start + rendered);

        self.slice = WindowSlice {
            start,
            end,
            top_spacer: start as f64 * self.item_height,
            bottom_spacer: below as f64 * self.item_height,
        };
        self.slice
    }
}
