use core::ops::Range;

use crate::{
    material::{Color, Finish, Material},
    Hit, Quad, Ray, Sphere,
};
use nalgebra::Vector3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Quad(Quad),
}

impl Hit for Shape {
    fn hit(&self, ray: &Ray, interval: Range<f64>) -> Option<f64> {
        match self {
            Shape::Sphere(s) => s.hit(ray, interval),
            Shape::Quad(q) => q.hit(ray, interval),
        }
    }

    fn normal(&self, point: &Vector3<f64>) -> Vector3<f64> {
        match self {
            Shape::Sphere(s) => s.normal(point),
            Shape::Quad(q) => q.normal(point),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Quad> for Shape {
    fn from(quad: Quad) -> Self {
        Shape::Quad(quad)
    }
}

/// A renderable primitive: geometry plus material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub shape: Shape,
    pub material: Material,
}

impl Surface {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            material: Material::default(),
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.material.color = color;
        self
    }

    pub fn with_shininess(mut self, shininess: f64) -> Self {
        self.material.shininess = Some(shininess);
        self
    }

    pub fn with_specular(mut self, specular: bool) -> Self {
        self.material.specular = specular;
        self
    }

    pub fn with_reflectivity(mut self, coefficient: f64) -> Self {
        self.material.reflectivity = Some(coefficient);
        self
    }

    pub fn with_finish(mut self, finish: Finish) -> Self {
        self.material.finish = finish;
        self
    }

    pub fn color(&self) -> Color {
        self.material.color
    }

    pub fn finish(&self) -> Finish {
        self.material.finish
    }

    /// Color of the surface before any global illumination is composed in.
    pub fn local_color(
        &self,
        _light: &Vector3<f64>,
        _view: &Vector3<f64>,
        _point: &Vector3<f64>,
    ) -> Color {
        self.material.color
    }

    pub fn is_reflective(&self) -> bool {
        self.material.reflectivity.is_some()
    }

    /// Zero for surfaces that are not reflective.
    pub fn reflection_coefficient(&self) -> f64 {
        self.material.reflectivity.unwrap_or(0.0)
    }
}

impl Hit for Surface {
    fn hit(&self, ray: &Ray, interval: Range<f64>) -> Option<f64> {
        self.shape.hit(ray, interval)
    }

    fn normal(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.shape.normal(point)
    }
}
