//! Pointer events delivered by the host's gesture recognizer

use crate::geometry::Point;

/// Identity of one touch sequence, from pointer-down to up or cancel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GestureId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    PointerDown,
    PointerMove,
    /// The recognizer decided the pointer has been held long enough
    LongPress,
    PointerUp,
    Cancel,
}

/// One pointer event in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub id: GestureId,
    pub kind: GestureKind,
    pub position: Point,
}

impl GestureEvent {
    pub fn new(id: GestureId, kind: GestureKind, position: Point) -> Self {
        Self { id, kind, position }
    }

    pub fn down(id: GestureId, position: Point) -> Self {
        Self::new(id, GestureKind::PointerDown, position)
    }

    pub fn long_press(id: GestureId, position: Point) -> Self {
        Self::new(id, GestureKind::LongPress, position)
    }

    pub fn moved(id: GestureId, position: Point) -> Self {
        Self::new(id, GestureKind::PointerMove, position)
    }

    pub fn up(id: GestureId, position: Point) -> Self {
        Self::new(id, GestureKind::PointerUp, position)
    }

    pub fn cancel(id: GestureId, position: Point) -> Self {
        Self::new(id, GestureKind::Cancel, position)
    }
}
