use std::time::Instant;

use log::info;
use nalgebra::{Vector2, Vector3};
use rayon::prelude::*;
use serde::Deserialize;

use crate::{
    frame::FrameBuffer,
    material::Color,
    trace::{trace_counted, TraceStats},
    Ray, Scene,
};

/// Sub-pixel sample positions, as fractions of the cell size.
const SAMPLE_OFFSETS: [(f64, f64); 4] = [(0.25, 0.25), (0.25, 0.75), (0.75, 0.25), (0.75, 0.75)];

/// Rectangle centered on the view axis at `distance` in front of the eye,
/// split into `divisions` x `divisions` cells. Cell `(0, 0)` is the
/// bottom-left one.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImagePlane {
    pub width: f64,
    pub height: f64,
    pub distance: f64,
    pub divisions: usize,
}

impl Default for ImagePlane {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
            distance: 40.0,
            divisions: 500,
        }
    }
}

impl ImagePlane {
    pub fn cell_size(&self) -> Vector2<f64> {
        Vector2::new(
            self.width / self.divisions as f64,
            self.height / self.divisions as f64,
        )
    }

    /// Lower-left corner of cell `(i, j)`; `i` grows along X, `j` along Y.
    pub fn cell_origin(&self, i: usize, j: usize) -> Vector2<f64> {
        let cell = self.cell_size();
        Vector2::new(
            -self.width / 2.0 + i as f64 * cell.x,
            -self.height / 2.0 + j as f64 * cell.y,
        )
    }
}

/// Pinhole camera looking down -Z.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vector3<f64>,
    pub plane: ImagePlane,
}

impl Camera {
    pub fn new(eye: Vector3<f64>, plane: ImagePlane) -> Self {
        Self { eye, plane }
    }

    /// A frame buffer sized to the image plane's grid.
    pub fn frame(&self) -> FrameBuffer {
        FrameBuffer::new(self.plane.divisions, self.plane.divisions)
    }

    /// Color of the cell at `origin` with size `cell`: the mean of four
    /// fixed sub-pixel samples, each traced from depth 1.
    pub fn render_pixel(&self, scene: &Scene, origin: Vector2<f64>, cell: Vector2<f64>) -> Color {
        self.sample(scene, origin, cell).0
    }

    fn sample(&self, scene: &Scene, origin: Vector2<f64>, cell: Vector2<f64>) -> (Color, TraceStats) {
        let mut color = Color::zeros();
        let mut stats = TraceStats::default();
        for (fx, fy) in SAMPLE_OFFSETS {
            let direction = Vector3::new(
                origin.x + fx * cell.x,
                origin.y + fy * cell.y,
                -self.plane.distance,
            );
            let (c, s) = trace_counted(scene, &Ray::new(self.eye, direction), 1);
            color += c;
            stats = stats.merge(s);
        }
        (color / SAMPLE_OFFSETS.len() as f64, stats)
    }

    /// Fills `frame` row by row in parallel. Raster row 0 is the top of the
    /// image plane.
    ///
    /// # Panics
    ///
    /// If `frame` is not `divisions` x `divisions`; [`Camera::frame`] builds
    /// one that fits.
    pub fn render(&self, scene: &Scene, frame: &mut FrameBuffer) -> TraceStats {
        let n = self.plane.divisions;
        assert_eq!(
            (frame.width(), frame.height()),
            (n, n),
            "frame does not match the image plane"
        );
        if n == 0 {
            return TraceStats::default();
        }
        let cell = self.plane.cell_size();

        info!(
            "rendering {n}x{n} on {} threads",
            rayon::current_num_threads()
        );
        let start = Instant::now();

        let stats = frame
            .par_rows_mut()
            .enumerate()
            .map(|(row, mut pixels)| {
                let j = n - 1 - row;
                let mut stats = TraceStats::default();
                for i in 0..n {
                    let (color, s) = self.sample(scene, self.plane.cell_origin(i, j), cell);
                    pixels.set_pixel(i, color);
                    stats = stats.merge(s);
                }
                stats
            })
            .reduce(TraceStats::default, TraceStats::merge);

        info!(
            "rendered in {:.2?}: {} rays, deepest recursion {}",
            start.elapsed(),
            stats.rays,
            stats.deepest
        );
        stats
    }
}
