use core::ops::Range;

use crate::{Hit, Ray};
use nalgebra::Vector3;

/// A bounded planar quadrilateral. The vertices must be coplanar and listed
/// in a consistent winding; the normal follows the right-hand rule over
/// `v0 -> v1` and `v0 -> v3`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub vertices: [Vector3<f64>; 4],
    normal: Vector3<f64>,
}

impl Quad {
    pub fn new(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>, d: Vector3<f64>) -> Self {
        let normal = (b - a).cross(&(d - a)).normalize();
        Self {
            vertices: [a, b, c, d],
            normal,
        }
    }

    fn contains(&self, point: &Vector3<f64>) -> bool {
        (0..4).all(|i| {
            let from = self.vertices[i];
            let to = self.vertices[(i + 1) % 4];
            (to - from).cross(&(point - from)).dot(&self.normal) >= 0.0
        })
    }
}

impl Hit for Quad {
    fn hit(&self, ray: &Ray, interval: Range<f64>) -> Option<f64> {
        let denom = self.normal.dot(&ray.direction);

        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.vertices[0] - ray.origin).dot(&self.normal) / denom;

        if !interval.contains(&t) {
            return None;
        }

        if self.contains(&ray.at(t)) {
            Some(t)
        } else {
            None
        }
    }

    fn normal(&self, _: &Vector3<f64>) -> Vector3<f64> {
        self.normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::forward;
    use approx::assert_relative_eq;

    fn floor() -> Quad {
        Quad::new(
            Vector3::new(-50.0, -20.0, -40.0),
            Vector3::new(50.0, -20.0, -40.0),
            Vector3::new(50.0, -20.0, -200.0),
            Vector3::new(-50.0, -20.0, -200.0),
        )
    }

    #[test]
    fn normal_follows_winding() {
        assert_relative_eq!(floor().normal(&Vector3::zeros()), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn hit_inside() {
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, -20.0, -100.0));
        let t = floor().hit(&ray, forward()).unwrap();
        let point = ray.at(t);
        assert_relative_eq!(point, Vector3::new(0.0, -20.0, -100.0), epsilon = 1e-9);
    }

    #[test]
    fn plane_hit_outside_bounds_misses() {
        // Meets the plane y = -20 at z = -20, in front of the near edge.
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, -20.0, -20.0));
        assert!(floor().hit(&ray, forward()).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray::new(Vector3::new(0.0, -10.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(floor().hit(&ray, forward()).is_none());
    }

    #[test]
    fn plane_behind_origin_misses() {
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, 1.0, -1.0));
        assert!(floor().hit(&ray, forward()).is_none());
    }

    #[test]
    fn hit_from_back_side() {
        let ray = Ray::new(Vector3::new(0.0, -30.0, -100.0), Vector3::y());
        let t = floor().hit(&ray, forward()).unwrap();
        assert_relative_eq!(t, 10.0, epsilon = 1e-9);
    }
}
