//! Pointer and host events waiting for the next fixed step.

/// Input events the map understands.
/// Coordinates are canvas pixels (CSS pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    /// Host event; `kind` picks the meaning of `a`, `b`, `c`.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// Viewport resize: `a` = width, `b` = height in CSS pixels, `c` = DPR.
pub const CUSTOM_RESIZE: u32 = 99;

/// Pending events beyond which further pointer moves are dropped.
pub const MAX_PENDING_INPUT: usize = 512;

/// Events in arrival order. Each one is validated individually when the
/// map consumes it, so moves are never merged.
///
/// When the host stalls (hidden tab, long frame) moves past
/// `MAX_PENDING_INPUT` are dropped; downs, ups and custom events are
/// always kept so a drag cannot get stuck.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
    dropped: usize,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
            dropped: 0,
        }
    }

    /// Returns false when the event was dropped.
    pub fn push(&mut self, event: InputEvent) -> bool {
        if self.events.len() >= MAX_PENDING_INPUT && matches!(event, InputEvent::PointerMove { .. }) {
            self.dropped += 1;
            return false;
        }
        self.events.push(event);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Moves dropped since the last `clear`.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_arrival_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::PointerMove { x: 12.0, y: 20.0 });
        q.push(InputEvent::PointerMove { x: 12.0, y: 20.0 });
        assert_eq!(q.len(), 3);
        let events: Vec<_> = q.iter().copied().collect();
        assert_eq!(events[1], InputEvent::PointerMove { x: 12.0, y: 20.0 });
        q.clear();
        assert!(q.is_empty());
    }

    #[test]
    fn overflow_drops_moves_but_keeps_release() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        for i in 0..MAX_PENDING_INPUT + 10 {
            q.push(InputEvent::PointerMove { x: i as f32, y: 0.0 });
        }
        assert!(q.push(InputEvent::PointerUp { x: 0.0, y: 0.0 }));
        assert_eq!(q.len(), MAX_PENDING_INPUT + 1);
        assert_eq!(q.dropped(), 11);
        assert!(matches!(q.iter().last(), Some(InputEvent::PointerUp { .. })));
    }
}
