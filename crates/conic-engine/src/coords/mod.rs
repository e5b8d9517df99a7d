//! Coordinate and geometry types shared by the projection, hit-testing and
//! painter.
//!
//! World space is right-handed with no fixed unit. Screen space produced by
//! the projection is centered on the viewport with +X right and +Y up.

mod color;
mod vec2;
mod vec3;
mod viewport;

pub use color::ColorRgba;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use viewport::Viewport;
