use egui::{Context, LayerId, Pos2, Rect};

/// Pointer events on the drawing region, in viewport (screen) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary button pressed over the surface
    Down { position: Pos2 },
    /// Pointer moved over the surface, with or without the button held
    Move { position: Pos2 },
    /// Primary button released
    Up { position: Pos2 },
    /// Pointer left the surface
    Leave,
}

/// One frame of pointer state as seen by the drawing region
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSnapshot {
    pub hover: Option<Pos2>,
    /// Another layer (popup, window, tooltip) is on top of the surface at `hover`
    pub occluded: bool,
    pub pressed: bool,
    pub released: bool,
}

/// Handles converting raw egui input into [`PointerEvent`]s for one drawing region
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process this frame's raw egui input against the on-screen surface rect.
    ///
    /// `surface_layer` is the layer the surface is painted on. The pointer is
    /// ignored while an area on another layer (popup, window) lies under it;
    /// panels register no area, so `layer_id_at` yields `None` over them.
    pub fn process_input(
        &mut self,
        ctx: &Context,
        surface_rect: Rect,
        surface_layer: LayerId,
    ) -> Vec<PointerEvent> {
        let (hover, pressed, released) = ctx.input(|input| {
            (
                input.pointer.hover_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
            )
        });
        let occluded = hover.is_some_and(|pos| {
            ctx.layer_id_at(pos)
                .is_some_and(|top| top != surface_layer)
        });
        let snapshot = PointerSnapshot {
            hover,
            occluded,
            pressed,
            released,
        };
        self.translate(snapshot, surface_rect)
    }

    /// Event generation independent of egui's input state.
    ///
    /// Order within a frame: leave, move, down, up. An occluded pointer is
    /// treated as outside the surface.
    pub fn translate(
        &mut self,
        snapshot: PointerSnapshot,
        surface_rect: Rect,
    ) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let inside = snapshot
            .hover
            .filter(|pos| !snapshot.occluded && surface_rect.contains(*pos));

        match (self.last_pointer_pos, inside) {
            (Some(_), None) => events.push(PointerEvent::Leave),
            (last, Some(pos)) if last != Some(pos) => {
                events.push(PointerEvent::Move { position: pos });
            }
            _ => {}
        }

        if let Some(pos) = inside {
            if snapshot.pressed {
                events.push(PointerEvent::Down { position: pos });
            }
            if snapshot.released {
                events.push(PointerEvent::Up { position: pos });
            }
        }

        self.last_pointer_pos = inside;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn rect() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0))
    }

    fn at(x: f32, y: f32) -> PointerSnapshot {
        PointerSnapshot {
            hover: Some(pos2(x, y)),
            ..Default::default()
        }
    }

    #[test]
    fn test_press_inside_yields_move_then_down() {
        let mut handler = InputHandler::new();
        let events = handler.translate(PointerSnapshot { pressed: true, ..at(10.0, 10.0) }, rect());
        assert_eq!(
            events,
            vec![
                PointerEvent::Move { position: pos2(10.0, 10.0) },
                PointerEvent::Down { position: pos2(10.0, 10.0) },
            ]
        );
    }

    #[test]
    fn test_stationary_pointer_yields_nothing() {
        let mut handler = InputHandler::new();
        handler.translate(at(10.0, 10.0), rect());
        assert!(handler.translate(at(10.0, 10.0), rect()).is_empty());
    }

    #[test]
    fn test_leaving_the_surface() {
        let mut handler = InputHandler::new();
        handler.translate(at(50.0, 50.0), rect());
        let events = handler.translate(at(150.0, 50.0), rect());
        assert_eq!(events, vec![PointerEvent::Leave]);

        // Already outside: no repeated leave, and presses outside are ignored
        let gone = PointerSnapshot { pressed: true, ..Default::default() };
        assert!(handler.translate(gone, rect()).is_empty());
    }

    #[test]
    fn test_release_inside_yields_up() {
        let mut handler = InputHandler::new();
        handler.translate(PointerSnapshot { pressed: true, ..at(20.0, 20.0) }, rect());
        let release = PointerSnapshot { released: true, ..at(20.0, 20.0) };
        let events = handler.translate(release, rect());
        assert_eq!(events, vec![PointerEvent::Up { position: pos2(20.0, 20.0) }]);
    }

    #[test]
    fn test_occluded_press_yields_no_down() {
        let mut handler = InputHandler::new();
        let covered = PointerSnapshot {
            occluded: true,
            pressed: true,
            ..at(30.0, 30.0)
        };
        assert!(handler.translate(covered, rect()).is_empty());

        // Moving within the popup keeps producing nothing
        let drag = PointerSnapshot { occluded: true, ..at(40.0, 30.0) };
        assert!(handler.translate(drag, rect()).is_empty());
    }

    #[test]
    fn test_popup_over_active_stroke_leaves() {
        let mut handler = InputHandler::new();
        handler.translate(PointerSnapshot { pressed: true, ..at(30.0, 30.0) }, rect());
        let covered = PointerSnapshot { occluded: true, ..at(35.0, 30.0) };
        assert_eq!(handler.translate(covered, rect()), vec![PointerEvent::Leave]);
    }
}
