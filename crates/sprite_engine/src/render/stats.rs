//! Render statistics for performance monitoring

/// Per-frame render statistics
///
/// Draw-call and triangle counters reset at the start of every render pass;
/// the peak draw-call count survives frames until explicitly reset.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderStats {
    /// Draw calls issued this frame
    pub draw_calls: u32,

    /// Triangles submitted this frame
    pub triangles: u32,

    /// Highest per-frame draw-call count since the last peak reset
    pub peak_draw_calls: u32,
}

impl RenderStats {
    /// Create zeroed statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the per-frame counters (called at render pass start)
    pub fn begin_frame(&mut self) {
        self.draw_calls = 0;
        self.triangles = 0;
    }

    /// Record one issued draw call
    pub fn record_draw(&mut self, triangles: u32) {
        self.draw_calls += 1;
        self.triangles += triangles;
        self.peak_draw_calls = self.peak_draw_calls.max(self.draw_calls);
    }

    /// Reset the peak draw-call counter
    pub fn reset_peak(&mut self) {
        self.peak_draw_calls = 0;
    }
}
