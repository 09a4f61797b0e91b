//! A small Whitted-style ray tracer.
//!
//! Scenes are an ordered list of spheres and planar quads lit by two point
//! lights. [`Camera::render_pixel`] fires four fixed sub-pixel rays into
//! [`trace`], which recurses for mirrors, glass and translucent surfaces up
//! to [`MAX_DEPTH`].

pub mod camera;
pub mod config;
pub mod frame;
pub mod hit;
pub mod material;
pub mod quad;
pub mod ray;
pub mod scene;
pub mod sphere;
pub mod surface;
pub mod trace;

pub use camera::{Camera, ImagePlane};
pub use frame::FrameBuffer;
pub use hit::{Hit, Record};
pub use material::{Color, Finish, Material};
pub use quad::Quad;
pub use ray::Ray;
pub use scene::{Light, Scene};
pub use sphere::Sphere;
pub use surface::{Shape, Surface};
pub use trace::{trace, TraceStats, MAX_DEPTH};
