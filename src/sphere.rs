use core::ops::Range;

use crate::{Hit, Ray};
use nalgebra::Vector3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vector3<f64>,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vector3<f64>, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Hit for Sphere {
    fn hit(&self, ray: &Ray, interval: Range<f64>) -> Option<f64> {
        let oc = self.center - ray.origin;
        let a = ray.direction.dot(&ray.direction);
        let h = ray.direction.dot(&oc);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let d = (h * h) - (a * c);

        if d < 0.0 {
            return None;
        }

        let mut root = (h - d.sqrt()) / a;

        if !interval.contains(&root) {
            root = (h + d.sqrt()) / a;
            if !interval.contains(&root) {
                return None;
            }
        }

        Some(root)
    }

    fn normal(&self, point: &Vector3<f64>) -> Vector3<f64> {
        (point - self.center) / self.radius
    }
}
