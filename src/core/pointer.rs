// MediAdmin - core/pointer.rs
//
// Outside-click detection for the bulk action menu. One listener instance
// belongs to one mounted list view; it is created on mount and dropped on
// unmount.

/// Axis-aligned screen rectangle in logical points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Bounds::new(x, y, right - x, bottom - y)
    }
}

/// Reports pointer presses that land outside the designated container.
#[derive(Debug, Clone, Default)]
pub struct OutsideClickListener {
    container: Option<Bounds>,
}

impl OutsideClickListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the current screen bounds of the container. Called every
    /// frame the container is laid out.
    pub fn set_container(&mut self, bounds: Bounds) {
        self.container = Some(bounds);
    }

    pub fn container(&self) -> Option<Bounds> {
        self.container
    }

    /// True if the press at (x, y) is outside the container. While no
    /// container has been laid out nothing counts as outside.
    pub fn is_outside(&self, x: f32, y: f32) -> bool {
        self.container.is_some_and(|b| !b.contains(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_inside_is_not_outside() {
        let mut listener = OutsideClickListener::new();
        listener.set_container(Bounds::new(10.0, 10.0, 100.0, 20.0));
        assert!(!listener.is_outside(50.0, 15.0));
        assert!(listener.is_outside(5.0, 15.0));
        assert!(listener.is_outside(50.0, 31.0));
    }

    #[test]
    fn no_container_means_nothing_is_outside() {
        assert!(!OutsideClickListener::new().is_outside(0.0, 0.0));
    }

    #[test]
    fn union_covers_button_and_popup() {
        let button = Bounds::new(10.0, 10.0, 80.0, 20.0);
        let popup = Bounds::new(10.0, 30.0, 160.0, 40.0);
        let both = button.union(&popup);
        assert_eq!(both, Bounds::new(10.0, 10.0, 160.0, 60.0));
    }
}
