use egui::Pos2;

/// Pointer tracking state of the drawing surface.
///
/// Both states remember the last known surface position so that a stroke
/// started right after a move does not jump from a stale point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeState {
    Idle { last_point: Pos2 },
    Drawing { last_point: Pos2 },
}

impl Default for StrokeState {
    fn default() -> Self {
        Self::Idle { last_point: Pos2::ZERO }
    }
}

/// A segment that should be rendered as the result of a pointer move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Pos2,
    pub to: Pos2,
}

impl StrokeState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    pub fn last_point(&self) -> Pos2 {
        match *self {
            Self::Idle { last_point } | Self::Drawing { last_point } => last_point,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle { .. } => "Idle",
            Self::Drawing { .. } => "Drawing",
        }
    }

    /// Pointer down: enter `Drawing` from either state and capture the point
    pub fn press(&mut self, point: Pos2) {
        *self = Self::Drawing { last_point: point };
    }

    /// Pointer move: always track the point, and yield a segment while drawing
    pub fn advance(&mut self, point: Pos2) -> Option<Segment> {
        match self {
            Self::Drawing { last_point } => {
                let segment = Segment { from: *last_point, to: point };
                *last_point = point;
                Some(segment)
            }
            Self::Idle { last_point } => {
                *last_point = point;
                None
            }
        }
    }

    /// Pointer up or leave: back to `Idle`, keeping the last point
    pub fn release(&mut self) {
        *self = Self::Idle { last_point: self.last_point() };
    }
}
