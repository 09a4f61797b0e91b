//! The surface registry and the compiled-in reference scene.

use log::debug;
use nalgebra::Vector3;

use crate::{
    hit::{forward, Record},
    material::{Color, Finish},
    Hit, Quad, Ray, Sphere, Surface,
};

/// Point light. No color, no falloff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vector3<f64>,
}

impl Light {
    pub fn new(position: Vector3<f64>) -> Self {
        Self { position }
    }
}

/// Append-only. The tracer only ever sees `&Scene`.
#[derive(Clone, Debug)]
pub struct Scene {
    surfaces: Vec<Surface>,
    /// Key light first, fill light second.
    lights: [Light; 2],
}

impl Scene {
    pub fn new(key: Light, fill: Light) -> Self {
        Self {
            surfaces: Vec::new(),
            lights: [key, fill],
        }
    }

    pub fn push(&mut self, surface: Surface) -> usize {
        let index = self.surfaces.len();
        debug!("surface {index}: {:?}", surface.shape);
        self.surfaces.push(surface);
        index
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn surface(&self, index: usize) -> &Surface {
        &self.surfaces[index]
    }

    pub fn lights(&self) -> &[Light; 2] {
        &self.lights
    }

    /// Nearest hit of `ray` among all surfaces. Ties go to the surface
    /// registered first.
    pub fn closest_hit(&self, ray: &Ray) -> Option<Record> {
        let mut closest: Option<(usize, f64)> = None;
        for (index, surface) in self.surfaces.iter().enumerate() {
            let Some(t) = surface.hit(ray, forward()) else {
                continue;
            };
            if closest.map_or(true, |(_, best)| t < best) {
                closest = Some((index, t));
            }
        }
        closest.map(|(index, t)| Record::new(ray, index, t))
    }
}

pub fn reference() -> Scene {
    let mut scene = Scene::new(
        Light::new(Vector3::new(10.0, 40.0, -3.0)),
        Light::new(Vector3::new(30.0, 40.0, 0.0)),
    );

    scene.push(
        Surface::new(Sphere::new(Vector3::new(-5.0, 0.0, -90.0), 15.0))
            .with_color(Color::new(0.0, 0.0, 1.0))
            .with_shininess(25.0)
            .with_reflectivity(0.8),
    );
    scene.push(
        Surface::new(Sphere::new(Vector3::new(5.0, -10.0, -60.0), 5.0))
            .with_color(Color::new(0.0, 1.0, 0.0))
            .with_shininess(25.0)
            .with_reflectivity(0.3),
    );
    scene.push(
        Surface::new(Sphere::new(Vector3::new(5.0, 5.0, -70.0), 4.0))
            .with_color(Color::new(1.0, 0.0, 0.0))
            .with_shininess(25.0)
            .with_reflectivity(0.3)
            .with_finish(Finish::Stripes {
                bands: [
                    Color::new(0.9, 0.0, 0.0),
                    Color::new(0.0, 0.4, 0.0),
                    Color::new(0.8, 0.8, 0.2),
                ],
            }),
    );
    scene.push(
        Surface::new(Sphere::new(Vector3::new(10.0, 10.0, -60.0), 3.0))
            .with_color(Color::new(1.0, 1.0, 1.0))
            .with_shininess(25.0)
            .with_finish(Finish::Glass {
                index: 1.5,
                transparency: 0.8,
            }),
    );
    scene.push(
        Surface::new(Quad::new(
            Vector3::new(-50.0, -20.0, -40.0),
            Vector3::new(50.0, -20.0, -40.0),
            Vector3::new(50.0, -20.0, -200.0),
            Vector3::new(-50.0, -20.0, -200.0),
        ))
        .with_color(Color::repeat(0.8))
        .with_specular(true)
        .with_shininess(1.0)
        .with_finish(Finish::Checker {
            tile: 8.0,
            anchor: (50.0, 200.0),
            dark: Color::repeat(0.2),
            light: Color::repeat(1.0),
        }),
    );
    scene.push(
        Surface::new(Quad::new(
            Vector3::new(-50.0, -20.0, -200.0),
            Vector3::new(50.0, -20.0, -200.0),
            Vector3::new(50.0, 50.0, -200.0),
            Vector3::new(-50.0, 50.0, -200.0),
        ))
        .with_color(Color::repeat(0.2))
        .with_finish(Finish::Diagonal {
            odd: Color::new(0.6, 0.2, 0.9),
            even: Color::new(0.4, 0.5, 0.2),
        }),
    );
    scene.push(
        Surface::new(Sphere::new(Vector3::new(-10.0, 10.0, -70.0), 2.0))
            .with_color(Color::new(0.2, 0.4, 0.9))
            .with_finish(Finish::Translucent { transparency: 0.7 }),
    );

    push_box(
        &mut scene,
        Vector3::new(10.0, -5.0, -70.0),
        Vector3::new(5.0, 5.0, 5.0),
        Color::new(0.0, 0.0, 1.0),
    );

    scene
}

/// Pushes the six faces of an axis-aligned box. `corner` is the
/// front-bottom-left corner; the box extends `size.x` along +X, `size.y`
/// along +Y and `size.z` along -Z.
pub fn push_box(scene: &mut Scene, corner: Vector3<f64>, size: Vector3<f64>, color: Color) {
    let (x, y, z) = (corner.x, corner.y, corner.z);
    let a = corner;
    let b = Vector3::new(x + size.x, y, z);
    let c = Vector3::new(x + size.x, y + size.y, z);
    let d = Vector3::new(x, y + size.y, z);
    let e = Vector3::new(x + size.x, y, z - size.z);
    let f = Vector3::new(x + size.x, y + size.y, z - size.z);
    let g = Vector3::new(x, y + size.y, z - size.z);
    let h = Vector3::new(x, y, z - size.z);

    for face in [
        Quad::new(a, b, c, d),
        Quad::new(b, e, f, c),
        Quad::new(e, h, g, f),
        Quad::new(d, g, h, a),
        Quad::new(d, c, f, g),
        Quad::new(h, e, b, a),
    ] {
        scene.push(Surface::new(face).with_color(color));
    }
}
