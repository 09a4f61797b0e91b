use core::ops::Range;

use crate::Ray;
use nalgebra::Vector3;

/// Keeps secondary rays from re-hitting the surface they start on.
pub const EPSILON: f64 = 1e-3;

pub fn forward() -> Range<f64> {
    EPSILON..f64::INFINITY
}

pub trait Hit {
    fn hit(&self, ray: &Ray, interval: Range<f64>) -> Option<f64>;

    fn normal(&self, point: &Vector3<f64>) -> Vector3<f64>;
}

/// Only built for an actual hit, so `point == ray.at(t)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Record {
    pub index: usize,
    pub t: f64,
    pub point: Vector3<f64>,
}

impl Record {
    pub(crate) fn new(ray: &Ray, index: usize, t: f64) -> Self {
        Self {
            index,
            t,
            point: ray.at(t),
        }
    }
}
