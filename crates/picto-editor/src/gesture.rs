//! Click vs. drag classification.

use picto_core::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureClass {
    Click,
    Drag,
}

/// Classify a displacement: within `threshold_sq` (squared pixels) is a click.
pub fn classify(dx: f64, dy: f64, threshold_sq: f64) -> GestureClass {
    if dx * dx + dy * dy > threshold_sq {
        GestureClass::Drag
    } else {
        GestureClass::Click
    }
}

/// Tracks one gesture from its pointer-down. Sticky: once any sample
/// exceeds the threshold the gesture stays a drag, even if the pointer
/// comes back to where it started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickClassifier {
    start: Point,
    threshold_sq: f64,
    dragged: bool,
}

impl ClickClassifier {
    pub fn new(start: Point, threshold_sq: f64) -> Self {
        Self {
            start,
            threshold_sq,
            dragged: false,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    /// Feed a pointer sample; returns the gesture class so far.
    pub fn update(&mut self, p: Point) -> GestureClass {
        if !self.dragged {
            let d = p - self.start;
            self.dragged = classify(d.x, d.y, self.threshold_sq) == GestureClass::Drag;
        }
        self.class()
    }

    pub fn class(&self) -> GestureClass {
        if self.dragged {
            GestureClass::Drag
        } else {
            GestureClass::Click
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundary() {
        assert_eq!(classify(3.0, 4.0, 25.0), GestureClass::Click);
        assert_eq!(classify(0.0, 0.0, 25.0), GestureClass::Click);
        assert_eq!(classify(3.0, 4.1, 25.0), GestureClass::Drag);
        assert_eq!(classify(-6.0, 0.0, 25.0), GestureClass::Drag);
    }

    #[test]
    fn classification_is_sticky() {
        let mut c = ClickClassifier::new(Point::new(100.0, 100.0), 25.0);
        assert_eq!(c.update(Point::new(102.0, 101.0)), GestureClass::Click);
        assert_eq!(c.update(Point::new(120.0, 100.0)), GestureClass::Drag);
        assert_eq!(c.update(Point::new(100.0, 100.0)), GestureClass::Drag);
        assert_eq!(c.class(), GestureClass::Drag);
    }
}
