use nalgebra::Vector3;

pub type Color = Vector3<f64>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Finish {
    Plain,
    Stripes { bands: [Color; 3] },
    Glass { index: f64, transparency: f64 },
    /// World X/Z, offset by `anchor` before tiling.
    Checker {
        tile: f64,
        anchor: (f64, f64),
        dark: Color,
        light: Color,
    },
    /// No direct key light and no fill specular.
    Diagonal { odd: Color, even: Color },
    Translucent { transparency: f64 },
}

impl Finish {
    pub fn pattern(&self, point: &Vector3<f64>) -> Option<Color> {
        match *self {
            Finish::Stripes { bands } => {
                let f = (point.y + point.x) % 3.0;
                Some(if f <= 1.0 {
                    bands[0]
                } else if f <= 2.0 {
                    bands[1]
                } else {
                    bands[2]
                })
            }
            Finish::Checker {
                tile,
                anchor: (ax, az),
                dark,
                light,
            } => {
                // Parity of a negative tile is -1, which counts as odd.
                let cx = ((point.x + ax) / tile).trunc() as i64 % 2 != 0;
                let cz = ((point.z + az) / tile).trunc() as i64 % 2 != 0;
                Some(if cx == cz { dark } else { light })
            }
            Finish::Diagonal { odd, even } => {
                let cell = point.x.trunc() as i64 + point.y.trunc() as i64;
                Some(if cell % 2 != 0 { odd } else { even })
            }
            Finish::Plain | Finish::Glass { .. } | Finish::Translucent { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub shininess: Option<f64>,
    pub specular: bool,
    pub reflectivity: Option<f64>,
    pub finish: Finish,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::new(1.0, 1.0, 1.0),
            shininess: None,
            specular: false,
            reflectivity: None,
            finish: Finish::Plain,
        }
    }
}
