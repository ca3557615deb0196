use crate::api::types::{SurfaceSize, Theme};

/// Environment changes delivered to a running field.
/// Listeners on the platform side only translate and enqueue;
/// the runner applies them at the start of the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldEvent {
    /// The surface was laid out at a new size. Triggers batch re-creation.
    Resize(SurfaceSize),
    /// `prefers-reduced-motion` changed.
    ReducedMotion(bool),
    /// Light/dark theme changed.
    Theme(Theme),
    /// The surface is being unmounted.
    Teardown,
}

/// A queue of field events.
/// The host writes events into the queue; the runner drains them each frame.
/// Holds at most one event per kind, so it stays bounded while no frame runs.
pub struct EventQueue {
    events: Vec<FieldEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(8),
        }
    }

    /// Enqueue `event`, replacing a pending event of the same kind.
    pub fn push(&mut self, event: FieldEvent) {
        let kind = std::mem::discriminant(&event);
        match self.events.iter().position(|e| std::mem::discriminant(e) == kind) {
            Some(i) => self.events[i] = event,
            None => self.events.push(event),
        }
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<FieldEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = EventQueue::new();
        q.push(FieldEvent::Resize(SurfaceSize::new(640.0, 480.0)));
        q.push(FieldEvent::Theme(Theme::Light));
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn drain_preserves_order() {
        let mut q = EventQueue::new();
        q.push(FieldEvent::ReducedMotion(true));
        q.push(FieldEvent::Teardown);
        let events = q.drain();
        assert_eq!(events, vec![FieldEvent::ReducedMotion(true), FieldEvent::Teardown]);
    }

    #[test]
    fn repeated_events_keep_only_the_latest() {
        let mut q = EventQueue::new();
        for i in 0..1000 {
            q.push(FieldEvent::Theme(if i % 2 == 0 { Theme::Light } else { Theme::Dark }));
            q.push(FieldEvent::Resize(SurfaceSize::new(i as f32, 10.0)));
        }
        q.push(FieldEvent::ReducedMotion(false));
        assert_eq!(q.len(), 3);
        assert_eq!(
            q.drain(),
            vec![
                FieldEvent::Theme(Theme::Dark),
                FieldEvent::Resize(SurfaceSize::new(999.0, 10.0)),
                FieldEvent::ReducedMotion(false),
            ]
        );
    }
}
