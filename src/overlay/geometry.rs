use serde::{Deserialize, Serialize};

/// Top-left screen offset of the widget, in screen pixels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WidgetPosition {
    pub x: i32,
    pub y: i32,
}

impl WidgetPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Raw pointer coordinate in screen space, as delivered by the host.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned screen rectangle. `contains` is half-open on the right and bottom edges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Pointer coordinates are truncated to whole pixels before the test.
    pub fn contains(&self, point: PointerPosition) -> bool {
        let px = i64::from(point.x as i32);
        let py = i64::from(point.y as i32);
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        px >= x
            && px < x + i64::from(self.width)
            && py >= y
            && py < y + i64::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_half_open() {
        let bounds = Bounds::new(10, 20, 30, 40);
        assert!(bounds.contains(PointerPosition::new(10.0, 20.0)));
        assert!(bounds.contains(PointerPosition::new(39.9, 59.9)));
        assert!(!bounds.contains(PointerPosition::new(40.0, 30.0)));
        assert!(!bounds.contains(PointerPosition::new(20.0, 60.0)));
        assert!(!bounds.contains(PointerPosition::new(9.0, 30.0)));
    }

    #[test]
    fn bounds_at_the_integer_edge() {
        let bounds = Bounds::new(i32::MAX - 5, i32::MAX - 5, 10, 10);
        assert!(bounds.contains(PointerPosition::new(3e9, 3e9)));
        assert!(!bounds.contains(PointerPosition::new(0.0, 0.0)));
    }

    #[test]
    fn offset_moves_both_axes() {
        let moved = WidgetPosition::new(30, 120).offset(-5, 7);
        assert_eq!(moved, WidgetPosition::new(25, 127));
    }
}
