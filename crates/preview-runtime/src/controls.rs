//! Dialog control state
//!
//! Small state structs the dialog composes instead of inheriting widget
//! behavior: a clamped numeric field and a sheet cursor for the preview pane.

/// Numeric field state shared by the copies, scale, and margin inputs.
///
/// `set` keeps whatever the user typed; the value only clamps into range
/// when it is committed (focus leaves the field) or stepped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedInput {
    value: f32,
    min: f32,
    max: f32,
    step: f32,
}

impl BoundedInput {
    pub fn new(value: f32, min: f32, max: f32, step: f32) -> Self {
        Self {
            value: value.clamp(min, max),
            min,
            max,
            step,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Raw edit, left unclamped until committed
    pub fn set(&mut self, value: f32) {
        self.value = value;
    }

    /// Clamp the current edit into range and return the effective value
    pub fn commit(&mut self) -> f32 {
        if !self.value.is_finite() {
            self.value = self.min;
        }
        self.value = self.value.clamp(self.min, self.max);
        self.value
    }

    pub fn step_up(&mut self) -> f32 {
        self.commit();
        self.value = (self.value + self.step).min(self.max);
        self.value
    }

    pub fn step_down(&mut self) -> f32 {
        self.commit();
        self.value = (self.value - self.step).max(self.min);
        self.value
    }
}

/// Which sheet the preview pane shows.
///
/// The sheet count changes under the cursor on every reflow, so all movement
/// clamps against the current count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewCursor {
    sheet_count: usize,
    current: usize,
}

impl PreviewCursor {
    pub fn new(sheet_count: usize) -> Self {
        Self {
            sheet_count,
            current: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn sheet_count(&self) -> usize {
        self.sheet_count
    }

    /// Clamp a requested position into the valid sheet range
    pub fn scroll_to(&mut self, index: usize) -> usize {
        self.current = index.min(self.sheet_count.saturating_sub(1));
        self.current
    }

    pub fn next(&mut self) -> usize {
        self.scroll_to(self.current.saturating_add(1))
    }

    pub fn prev(&mut self) -> usize {
        self.scroll_to(self.current.saturating_sub(1))
    }

    /// Adopt a new sheet count after a reflow, keeping the position stable
    /// where possible
    pub fn set_sheet_count(&mut self, sheet_count: usize) {
        self.sheet_count = sheet_count;
        self.scroll_to(self.current);
    }
}
