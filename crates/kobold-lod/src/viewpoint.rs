//! Where the ranking pass measures distances from.

use glam::Vec3;

/// Supplies the active viewpoint once per tick. `None` means no camera is
/// active; the tick is skipped.
pub trait ViewpointSource {
    fn viewpoint(&self) -> Option<Vec3>;
}

impl ViewpointSource for Vec3 {
    fn viewpoint(&self) -> Option<Vec3> {
        Some(*self)
    }
}

impl ViewpointSource for Option<Vec3> {
    fn viewpoint(&self) -> Option<Vec3> {
        *self
    }
}

impl<T: ViewpointSource + ?Sized> ViewpointSource for &T {
    fn viewpoint(&self) -> Option<Vec3> {
        (**self).viewpoint()
    }
}

/// The primary source's viewpoint, or the secondary's when the primary has
/// none (e.g. the camera currently rendering, else the main camera).
#[derive(Clone, Copy, Debug, Default)]
pub struct FallbackViewpoint<P, S> {
    pub primary: P,
    pub secondary: S,
}

impl<P, S> FallbackViewpoint<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: ViewpointSource, S: ViewpointSource> ViewpointSource for FallbackViewpoint<P, S> {
    fn viewpoint(&self) -> Option<Vec3> {
        self.primary
            .viewpoint()
            .or_else(|| self.secondary.viewpoint())
    }
}
