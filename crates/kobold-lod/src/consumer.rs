//! Consumer identity and the seams between the ranking pass and its host.

use std::fmt;

use glam::Vec3;

/// Name of a consumer category. Each pool serves exactly one type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerType(String);

impl ConsumerType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConsumerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConsumerType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for ConsumerType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// An object whose detail level is driven by its rank.
///
/// The ranking pass reads [`position`](LodConsumer::position) and writes the
/// two flags; interpreting the flags (mesh swaps, animation rate, ...) is the
/// renderer's job.
pub trait LodConsumer {
    fn position(&self) -> Vec3;
    fn set_close(&mut self, close: bool);
    fn set_very_far(&mut self, very_far: bool);
}

/// Resolves consumer handles for the ranking pass.
///
/// `position` returning `None` means the consumer behind `handle` has been
/// destroyed; the pass prunes such handles from its pool.
pub trait ConsumerStore<H> {
    fn position(&self, handle: H) -> Option<Vec3>;
    fn set_close(&mut self, handle: H, close: bool);
    fn set_very_far(&mut self, handle: H, very_far: bool);
}

/// Plain consumer: a position plus the two flags last pushed to it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointConsumer {
    pub position: Vec3,
    pub close: bool,
    pub very_far: bool,
}

impl PointConsumer {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

impl LodConsumer for PointConsumer {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_close(&mut self, close: bool) {
        self.close = close;
    }

    fn set_very_far(&mut self, very_far: bool) {
        self.very_far = very_far;
    }
}
