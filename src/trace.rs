//! Recursive Whitted-style shading.
//!
//! [`trace`] finds the closest surface along a ray, applies the surface's
//! finish, recurses for mirror, glass and translucent surfaces, and then
//! composes direct light from the scene's two point lights with hard
//! shadows.
//!
//! The lighting pass uses a fixed accumulation order: each
//! light's specular term is added to the ambient factor before that factor
//! scales the running color, and the fill light is applied on top of the
//! color the key light already produced.

use nalgebra::Vector3;

use crate::{
    hit::forward,
    material::{Color, Finish},
    Hit, Ray, Scene, Surface,
};

/// Depth of the deepest `trace` call. Primary rays start at depth 1.
pub const MAX_DEPTH: u32 = 5;

const AMBIENT: f64 = 0.2;
const PHONG_EXPONENT: i32 = 10;

const KEY: usize = 0;
const FILL: usize = 1;

pub fn background() -> Color {
    Color::zeros()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub rays: u64,
    pub deepest: u32,
}

impl TraceStats {
    fn enter(&mut self, depth: u32) {
        self.rays += 1;
        self.deepest = self.deepest.max(depth);
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            rays: self.rays + other.rays,
            deepest: self.deepest.max(other.deepest),
        }
    }
}

pub fn reflect(v: &Vector3<f64>, n: &Vector3<f64>) -> Vector3<f64> {
    v - 2.0 * v.dot(n) * n
}

/// Bends unit vector `incident` through a boundary with unit normal `n`
/// (facing against `incident`) and relative index `eta`. `None` on total
/// internal reflection.
pub fn refract(incident: &Vector3<f64>, n: &Vector3<f64>, eta: f64) -> Option<Vector3<f64>> {
    let cos = n.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - cos * cos);
    if k < 0.0 {
        None
    } else {
        Some(eta * incident - (eta * cos + k.sqrt()) * n)
    }
}

/// Color seen along `ray`. `depth` is 1 for primary rays.
pub fn trace(scene: &Scene, ray: &Ray, depth: u32) -> Color {
    let mut stats = TraceStats::default();
    shade(scene, ray, depth, &mut stats)
}

pub fn trace_counted(scene: &Scene, ray: &Ray, depth: u32) -> (Color, TraceStats) {
    let mut stats = TraceStats::default();
    let color = shade(scene, ray, depth, &mut stats);
    (color, stats)
}

fn shade(scene: &Scene, ray: &Ray, depth: u32, stats: &mut TraceStats) -> Color {
    stats.enter(depth);

    let Some(hit) = scene.closest_hit(ray) else {
        return background();
    };
    let surface = scene.surface(hit.index);
    let finish = surface.finish();
    let point = hit.point;
    let normal = surface.normal(&point);
    let view = -ray.direction;
    let recurse = depth < MAX_DEPTH;

    let mut color = surface.local_color(&scene.lights()[KEY].position, &view, &point);

    if recurse {
        if let Some(pattern) = finish.pattern(&point) {
            color = pattern;
        }

        if let Finish::Glass {
            index,
            transparency,
        } = finish
        {
            if let Some(through) = transmit(surface, ray, &point, &normal, index) {
                let behind = shade(scene, &through, depth + 1, stats);
                color = color * (1.0 - transparency) + behind * transparency;
            }
        }

        if surface.is_reflective() {
            let mirrored = Ray::new(point, reflect(&ray.direction, &normal));
            let reflected = shade(scene, &mirrored, depth + 1, stats);
            color += surface.reflection_coefficient() * reflected;
        }
    }

    let mut ambient = AMBIENT;
    for (slot, light) in scene.lights().iter().enumerate() {
        let to_light = light.position - point;
        let l = to_light.normalize();
        let diffuse = l.dot(&normal);
        let rv = reflect(&-l, &normal).dot(&view);
        let specular = if rv > 0.0 && highlights(finish, slot) {
            rv.powi(PHONG_EXPONENT)
        } else {
            0.0
        };
        ambient += specular;

        let unlit = diffuse <= 0.0
            || !lit_directly(finish, slot)
            || occluded(scene, &point, &to_light);
        color = if unlit {
            ambient * color
        } else {
            ambient * color + diffuse * color + Color::repeat(specular)
        };
    }

    if let Finish::Translucent { transparency } = finish {
        if recurse {
            let onward = Ray::new(point, ray.direction);
            let behind = shade(scene, &onward, depth + 1, stats);
            color += (1.0 - transparency) * color + transparency * behind;
        }
    }

    color
}

/// Whether anything sits between `point` and the light at `point + to_light`.
fn occluded(scene: &Scene, point: &Vector3<f64>, to_light: &Vector3<f64>) -> bool {
    let shadow = Ray::new(*point, *to_light);
    scene
        .closest_hit(&shadow)
        .is_some_and(|blocker| blocker.t < to_light.norm())
}

fn lit_directly(finish: Finish, slot: usize) -> bool {
    !matches!((finish, slot), (Finish::Diagonal { .. }, KEY))
}

fn highlights(finish: Finish, slot: usize) -> bool {
    !matches!(
        (finish, slot),
        (Finish::Translucent { .. }, KEY) | (Finish::Diagonal { .. }, FILL)
    )
}

/// Refracts `ray` into `surface` at `point`, follows it to the far side and
/// refracts it back out. `None` when the inner ray never leaves the surface.
fn transmit(
    surface: &Surface,
    ray: &Ray,
    point: &Vector3<f64>,
    normal: &Vector3<f64>,
    index: f64,
) -> Option<Ray> {
    let inward = bend(&ray.direction, normal, 1.0 / index);
    let inner = Ray::new(*point, inward);
    let t = surface.hit(&inner, forward())?;
    let exit = inner.at(t);
    let outward = bend(&inner.direction, &-surface.normal(&exit), index);
    Some(Ray::new(exit, outward))
}

/// Refraction that falls back to a mirror bounce on total internal
/// reflection.
fn bend(incident: &Vector3<f64>, n: &Vector3<f64>, eta: f64) -> Vector3<f64> {
    refract(incident, n, eta).unwrap_or_else(|| reflect(incident, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scene, Light, Quad, Sphere};
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn floor() -> Surface {
        Surface::new(Quad::new(
            Vector3::new(-50.0, 0.0, 50.0),
            Vector3::new(50.0, 0.0, 50.0),
            Vector3::new(50.0, 0.0, -50.0),
            Vector3::new(-50.0, 0.0, -50.0),
        ))
        .with_color(Color::repeat(0.5))
    }

    /// Key light straight above (0, 0, -10), fill light below the floor.
    fn lit(surface: Surface) -> Scene {
        let mut scene = Scene::new(
            Light::new(Vector3::new(0.0, 10.0, -10.0)),
            Light::new(Vector3::new(0.0, -10.0, 0.0)),
        );
        scene.push(surface);
        scene
    }

    fn lit_floor() -> Scene {
        lit(floor())
    }

    fn eye_ray() -> Ray {
        Ray::new(Vector3::new(0.0, 5.0, 0.0), Vector3::new(0.0, -5.0, -10.0))
    }

    /// Square in the plane `z`, facing the origin.
    fn panel(z: f64, half: f64) -> Quad {
        Quad::new(
            Vector3::new(-half, -half, z),
            Vector3::new(half, -half, z),
            Vector3::new(half, half, z),
            Vector3::new(-half, half, z),
        )
    }

    fn lights(key: Vector3<f64>, fill: Vector3<f64>) -> Scene {
        Scene::new(Light::new(key), Light::new(fill))
    }

    /// Both lights far behind everything facing the origin, so those
    /// surfaces get ambient only: 0.2 * 0.2 * color.
    fn backlit() -> Scene {
        lights(Vector3::new(0.0, 0.0, -100.0), Vector3::new(5.0, 5.0, -100.0))
    }

    fn down_z() -> Ray {
        Ray::new(Vector3::zeros(), -Vector3::z())
    }

    fn random_primary(rng: &mut StdRng) -> Ray {
        let x = rng.gen_range(-10.0..10.0);
        let y = rng.gen_range(-10.0..10.0);
        Ray::new(Vector3::zeros(), Vector3::new(x, y, -40.0))
    }

    #[test]
    fn reflect_flips_normal_component() {
        let v = Vector3::new(1.0, -1.0, 0.0);
        assert_relative_eq!(reflect(&v, &Vector3::y()), Vector3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn refract_head_on_keeps_direction() {
        let d = -Vector3::z();
        let out = refract(&d, &Vector3::z(), 1.0 / 1.5).unwrap();
        assert_relative_eq!(out, d, epsilon = 1e-12);
    }

    #[test]
    fn refract_obeys_snell() {
        let incident = Vector3::new(1.0, -1.0, 0.0).normalize();
        let eta = 1.0 / 1.5;
        let out = refract(&incident, &Vector3::y(), eta).unwrap();
        assert_relative_eq!(out.norm(), 1.0, epsilon = 1e-12);
        let sin_in = incident.x;
        let sin_out = out.x;
        assert_relative_eq!(sin_out, eta * sin_in, epsilon = 1e-12);
        assert!(out.y < 0.0);
    }

    #[test]
    fn refract_total_internal_reflection() {
        let grazing = Vector3::new(0.9, -0.1, 0.0).normalize();
        assert!(refract(&grazing, &Vector3::y(), 1.5).is_none());
    }

    #[test_log::test]
    fn miss_is_background() {
        let scene = lit_floor();
        let up = Ray::new(Vector3::new(0.0, 1.0, 0.0), Vector3::y());
        assert_eq!(trace(&scene, &up, 1), background());
    }

    #[test_log::test]
    fn unshadowed_floor_gets_key_light() {
        let scene = lit_floor();
        let base = Color::repeat(0.5);
        // r = l = +y, so r . (-dir) = 1/sqrt(5).
        let spec = (1.0f64 / 5.0).powi(5);
        let ambient = AMBIENT + spec;
        let after_key = ambient * base + base + Color::repeat(spec);
        let expected = ambient * after_key;
        assert_relative_eq!(trace(&scene, &eye_ray(), 1), expected, epsilon = 1e-9);
    }

    #[test_log::test]
    fn blocked_light_contributes_nothing() {
        let mut scene = lit_floor();
        scene.push(Surface::new(Sphere::new(Vector3::new(0.0, 5.0, -10.0), 1.0)));
        let base = Color::repeat(0.5);
        let spec = (1.0f64 / 5.0).powi(5);
        let ambient = AMBIENT + spec;
        // Key is blocked and fill is below the floor: only ambient remains.
        let expected = ambient * ambient * base;
        assert_relative_eq!(trace(&scene, &eye_ray(), 1), expected, epsilon = 1e-9);
    }

    #[test_log::test]
    fn blocker_beyond_light_casts_no_shadow() {
        let mut scene = lit_floor();
        scene.push(Surface::new(Sphere::new(Vector3::new(0.0, 20.0, -10.0), 1.0)));
        assert_relative_eq!(
            trace(&scene, &eye_ray(), 1),
            trace(&lit_floor(), &eye_ray(), 1),
            epsilon = 1e-12
        );
    }

    #[test_log::test]
    fn diagonal_finish_ignores_key_light() {
        let odd = Color::new(0.6, 0.2, 0.9);
        let even = Color::new(0.4, 0.5, 0.2);
        let scene = lit(floor().with_finish(Finish::Diagonal { odd, even }));
        // Hit point (0, 0, -10): trunc(0) + trunc(0) is even.
        let spec = (1.0f64 / 5.0).powi(5);
        let ambient = AMBIENT + spec;
        let expected = ambient * ambient * even;
        assert_relative_eq!(trace(&scene, &eye_ray(), 1), expected, epsilon = 1e-9);
    }

    #[test_log::test]
    fn patterns_switch_off_at_max_depth() {
        let scene = lit(floor().with_finish(Finish::Checker {
            tile: 8.0,
            anchor: (50.0, 200.0),
            dark: Color::repeat(0.2),
            light: Color::repeat(1.0),
        }));
        let plain = lit_floor();

        let at_max = trace(&scene, &eye_ray(), MAX_DEPTH);
        assert_relative_eq!(at_max, trace(&plain, &eye_ray(), MAX_DEPTH), epsilon = 1e-12);
        assert!((trace(&scene, &eye_ray(), 1) - at_max).norm() > 1e-3);
    }

    #[test_log::test]
    fn mirror_recursion_is_bounded() {
        let mut scene = Scene::new(
            Light::new(Vector3::new(0.0, 100.0, 0.0)),
            Light::new(Vector3::new(100.0, 0.0, 0.0)),
        );
        scene.push(
            Surface::new(Sphere::new(Vector3::zeros(), 10.0))
                .with_color(Color::repeat(0.5))
                .with_reflectivity(1.0),
        );

        let ray = Ray::new(Vector3::new(1.0, 2.0, 0.5), Vector3::new(0.3, -0.2, -1.0));
        let (color, stats) = trace_counted(&scene, &ray, 1);
        assert!(color.iter().all(|c| c.is_finite()));
        assert_eq!(stats.deepest, MAX_DEPTH);
        assert_eq!(stats.rays, MAX_DEPTH as u64);
    }

    #[test_log::test]
    fn starting_at_max_depth_does_not_recurse() {
        let scene = scene::reference();
        let ray = Ray::new(Vector3::zeros(), Vector3::new(-5.0, 0.0, -90.0));
        let (_, stats) = trace_counted(&scene, &ray, MAX_DEPTH);
        assert_eq!(stats, TraceStats { rays: 1, deepest: MAX_DEPTH });
    }

    #[test_log::test]
    fn glass_sphere_traces_through() {
        let scene = scene::reference();
        // Straight at the glass sphere's center.
        let ray = Ray::new(Vector3::zeros(), Vector3::new(10.0, 10.0, -60.0));
        assert_eq!(scene.closest_hit(&ray).unwrap().index, 3);
        let (color, stats) = trace_counted(&scene, &ray, 1);
        assert!(stats.rays >= 2);
        assert!(color.iter().all(|c| c.is_finite()));
    }

    #[test_log::test]
    fn translucent_sphere_traces_onward() {
        let scene = scene::reference();
        let ray = Ray::new(Vector3::zeros(), Vector3::new(-10.0, 10.0, -70.0));
        assert_eq!(scene.closest_hit(&ray).unwrap().index, 6);
        let (_, stats) = trace_counted(&scene, &ray, 1);
        assert!(stats.rays >= 2);
    }

    #[test_log::test]
    fn glass_blends_base_with_what_lies_behind() {
        let base = Color::new(0.9, 0.6, 0.3);
        let wall = Color::new(0.2, 0.4, 1.0);
        let mut scene = backlit();
        scene.push(
            Surface::new(Sphere::new(Vector3::new(0.0, 0.0, -10.0), 2.0))
                .with_color(base)
                .with_finish(Finish::Glass {
                    index: 1.5,
                    transparency: 0.7,
                }),
        );
        scene.push(Surface::new(panel(-50.0, 1000.0)).with_color(wall));

        // Head on, the ray passes straight through and lands on the wall.
        let behind = 0.04 * wall;
        let expected = 0.04 * (0.3 * base + 0.7 * behind);
        let (color, stats) = trace_counted(&scene, &down_z(), 1);
        assert_relative_eq!(color, expected, epsilon = 1e-9);
        assert_eq!(stats, TraceStats { rays: 2, deepest: 2 });
    }

    #[test_log::test]
    fn mirror_adds_scaled_reflection() {
        let base = Color::new(0.1, 0.2, 0.3);
        let mut scene = backlit();
        scene.push(
            Surface::new(panel(-10.0, 1000.0))
                .with_color(base)
                .with_reflectivity(0.3),
        );
        scene.push(
            Surface::new(Quad::new(
                Vector3::new(-1000.0, -1000.0, 10.0),
                Vector3::new(-1000.0, 1000.0, 10.0),
                Vector3::new(1000.0, 1000.0, 10.0),
                Vector3::new(1000.0, -1000.0, 10.0),
            ))
            .with_color(Color::new(1.0, 0.5, 0.0)),
        );

        let bounce = Ray::new(Vector3::new(0.0, 0.0, -10.0), Vector3::z());
        assert_eq!(scene.closest_hit(&bounce).unwrap().index, 1);
        let reflected = trace(&scene, &bounce, 2);
        assert!(reflected.norm() > 1e-3);

        let expected = 0.04 * (base + 0.3 * reflected);
        assert_relative_eq!(trace(&scene, &down_z(), 1), expected, epsilon = 1e-9);
    }

    #[test_log::test]
    fn translucent_adds_blend_of_itself_and_behind() {
        let base = Color::new(0.2, 0.4, 0.9);
        let wall = Color::new(1.0, 0.5, 0.25);
        let mut scene = backlit();
        scene.push(
            Surface::new(panel(-10.0, 5.0))
                .with_color(base)
                .with_finish(Finish::Translucent { transparency: 0.6 }),
        );
        scene.push(Surface::new(panel(-50.0, 1000.0)).with_color(wall));

        let front = 0.04 * base;
        let behind = 0.04 * wall;
        let expected = front + 0.4 * front + 0.6 * behind;
        assert_relative_eq!(trace(&scene, &down_z(), 1), expected, epsilon = 1e-9);
    }

    #[test_log::test]
    fn translucent_has_no_key_highlight() {
        // Key light on the axis in front: l = r = view, so rv = 1.
        let key = Vector3::new(0.0, 0.0, 10.0);
        let fill = Vector3::new(0.0, 0.0, -100.0);
        let base = Color::new(0.2, 0.4, 0.9);

        let mut scene = lights(key, fill);
        scene.push(
            Surface::new(panel(-10.0, 5.0))
                .with_color(base)
                .with_finish(Finish::Translucent { transparency: 0.6 }),
        );
        // Key: 0.2 * base + base. Fill is behind: ambient only. Nothing behind.
        let front = AMBIENT * (AMBIENT * base + base);
        assert_relative_eq!(trace(&scene, &down_z(), 1), 1.4 * front, epsilon = 1e-9);

        let mut plain = lights(key, fill);
        plain.push(Surface::new(panel(-10.0, 5.0)).with_color(base));
        let ambient = AMBIENT + 1.0;
        let after_key = ambient * base + base + Color::repeat(1.0);
        assert_relative_eq!(trace(&plain, &down_z(), 1), ambient * after_key, epsilon = 1e-9);
    }

    #[test_log::test]
    fn diagonal_has_no_fill_highlight() {
        let key = Vector3::new(0.0, 0.0, -100.0);
        let fill = Vector3::new(0.0, 0.0, 10.0);
        let odd = Color::new(0.6, 0.2, 0.9);
        let even = Color::new(0.4, 0.5, 0.2);

        let mut scene = lights(key, fill);
        scene.push(Surface::new(panel(-10.0, 5.0)).with_finish(Finish::Diagonal { odd, even }));
        // (0, 0, -10) is an even cell. Key: ambient only. Fill: diffuse 1, rv 1.
        let after_key = AMBIENT * even;
        let expected = AMBIENT * after_key + after_key;
        assert_relative_eq!(trace(&scene, &down_z(), 1), expected, epsilon = 1e-9);

        let mut plain = lights(key, fill);
        plain.push(Surface::new(panel(-10.0, 5.0)).with_color(even));
        let ambient = AMBIENT + 1.0;
        let expected = ambient * after_key + after_key + Color::repeat(1.0);
        assert_relative_eq!(trace(&plain, &down_z(), 1), expected, epsilon = 1e-9);
    }

    #[test_log::test]
    fn reference_scene_is_deterministic_and_bounded() {
        let scene = scene::reference();
        let mut rng = StdRng::seed_from_u64(363);
        for _ in 0..500 {
            let ray = random_primary(&mut rng);
            let (first, stats) = trace_counted(&scene, &ray, 1);
            let second = trace(&scene, &ray, 1);
            assert_eq!(first, second);
            assert!(first.iter().all(|c| c.is_finite()), "{ray:?} -> {first:?}");
            assert!(stats.deepest <= MAX_DEPTH);
        }
    }

    #[test]
    fn stats_merge() {
        let a = TraceStats { rays: 3, deepest: 2 };
        let b = TraceStats { rays: 4, deepest: 5 };
        assert_eq!(a.merge(b), TraceStats { rays: 7, deepest: 5 });
    }
}
