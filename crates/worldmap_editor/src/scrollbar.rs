//! Linear mapping between scrollbar handle pixels and scroll offsets

/// A scrollbar track with a fixed-length handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrack {
    /// Length of the whole track in pixels
    pub track_length: f32,
    /// Length of the draggable handle in pixels
    pub handle_length: f32,
}

impl ScrollTrack {
    pub fn new(track_length: f32, handle_length: f32) -> Self {
        Self {
            track_length,
            handle_length,
        }
    }

    /// Pixels the handle can travel
    fn travel(&self) -> f32 {
        self.track_length - self.handle_length
    }

    /// Offset for a handle grabbed at its middle and dragged to `pixel`,
    /// clamped to `[0, max_offset]`
    pub fn offset_at(&self, pixel: f32, max_offset: u32) -> u32 {
        let travel = self.travel();
        if max_offset == 0 || travel <= 0.0 {
            return 0;
        }
        let offset = ((pixel - 0.5 * self.handle_length) * max_offset as f32 / travel).floor();
        offset.clamp(0.0, max_offset as f32) as u32
    }

    /// Leading edge of the handle for `offset`
    pub fn handle_position(&self, offset: u32, max_offset: u32) -> f32 {
        let travel = self.travel();
        if max_offset == 0 || travel <= 0.0 {
            return 0.0;
        }
        offset.min(max_offset) as f32 * travel / max_offset as f32
    }
}
