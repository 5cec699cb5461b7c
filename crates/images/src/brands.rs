use std::{fmt, str::FromStr};

use maud::{Markup, html};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Brand {
    #[default]
    Yearn,
    Katana,
    Bearn,
}

impl Brand {
    pub const fn variants() -> &'static [Self] { &[Self::Yearn, Self::Katana, Self::Bearn] }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yearn => "yearn",
            Self::Katana => "katana",
            Self::Bearn => "bearn",
        }
    }

    /// Brand named in a query string. Missing or unknown names fall back to
    /// the default brand.
    pub fn from_query(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn config(&self) -> &'static BrandConfig {
        match self {
            Self::Yearn => &YEARN,
            Self::Katana => &KATANA,
            Self::Bearn => &BEARN,
        }
    }
}

impl FromStr for Brand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yearn" => Ok(Self::Yearn),
            "katana" => Ok(Self::Katana),
            "bearn" => Ok(Self::Bearn),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Percent along the gradient.
    pub offset: f32,
    pub color: &'static str,
    pub opacity: f32,
}

const fn stop(offset: f32, color: &'static str, opacity: f32) -> GradientStop {
    GradientStop { offset, color, opacity }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gradient {
    /// CSS-style angle in degrees: 0 points up, 90 points right.
    Linear { angle: f32, stops: &'static [GradientStop] },
    /// Center and radius as fractions of the bounding box.
    Radial { cx: f32, cy: f32, r: f32, stops: &'static [GradientStop] },
}

impl Gradient {
    pub fn stops(&self) -> &'static [GradientStop] {
        match self {
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => stops,
        }
    }

    /// Start and end points in bounding box units, reaching the corners for
    /// diagonal angles.
    fn linear_points(angle: f32) -> (f32, f32, f32, f32) {
        let (s, c) = angle.to_radians().sin_cos();
        let half = 0.5 * (s.abs() + c.abs());
        (0.5 - s * half, 0.5 + c * half, 0.5 + s * half, 0.5 - c * half)
    }

    /// SVG paint server with the given id.
    pub fn svg_def(&self, id: &str) -> Markup {
        let stops = html! {
            @for stop in self.stops() {
                stop
                    offset=(format!("{}%", stop.offset))
                    stop-color=(stop.color)
                    stop-opacity=(stop.opacity) {}
            }
        };
        match *self {
            Self::Linear { angle, .. } => {
                let (x1, y1, x2, y2) = Self::linear_points(angle);
                html! {
                    linearGradient id=(id) x1=(x1) y1=(y1) x2=(x2) y2=(y2) { (stops) }
                }
            }
            Self::Radial { cx, cy, r, .. } => html! {
                radialGradient id=(id) cx=(cx) cy=(cy) r=(r) { (stops) }
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrandConfig {
    pub gradient: Gradient,
    /// Call to action shown in the footer.
    pub cta: &'static str,
    pub logo_color: &'static str,
    /// Full-bleed background image, as a path on the site origin.
    pub background: Option<&'static str>,
}

pub static YEARN: BrandConfig = BrandConfig {
    gradient: Gradient::Linear {
        angle: 225.0,
        stops: &[stop(0.0, "#b51055", 1.0), stop(100.0, "#263490", 1.0)],
    },
    cta: "Earn With Yearn",
    logo_color: "#FFFFFF",
    background: None,
};

pub static KATANA: BrandConfig = BrandConfig {
    gradient: Gradient::Radial {
        cx: 1.0,
        cy: 1.0,
        r: 1.0,
        stops: &[
            stop(0.0, "#ffb413", 1.0),
            stop(30.0, "#e04300", 0.8),
            stop(100.0, "#263490", 1.0),
        ],
    },
    cta: "Enter the Dojo",
    logo_color: "#FFFFFF",
    background: Some("/graphics/katana-bg.png"),
};

pub static BEARN: BrandConfig = BrandConfig {
    gradient: Gradient::Linear {
        angle: 225.0,
        stops: &[stop(0.0, "#004bff", 1.0), stop(100.0, "#00c2ff", 1.0)],
    },
    cta: "Built by Mom",
    logo_color: "#FFFFFF",
    background: None,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        let cases: &[(Option<&str>, Brand)] = &[
            (None, Brand::Yearn),
            (Some("yearn"), Brand::Yearn),
            (Some("katana"), Brand::Katana),
            (Some("bearn"), Brand::Bearn),
            (Some("Katana"), Brand::Yearn),
            (Some("unknown"), Brand::Yearn),
            (Some(""), Brand::Yearn),
        ];
        for &(value, expected) in cases {
            assert_eq!(Brand::from_query(value), expected, "{value:?}");
        }
        for brand in Brand::variants() {
            assert_eq!(brand.to_string().parse::<Brand>(), Ok(*brand));
        }
    }

    #[test]
    fn test_brand_configs() {
        assert_eq!(Brand::Yearn.config().cta, "Earn With Yearn");
        assert_eq!(Brand::Bearn.config().cta, "Built by Mom");
        assert_eq!(Brand::Katana.config().cta, "Enter the Dojo");
        assert_eq!(Brand::Katana.config().background, Some("/graphics/katana-bg.png"));
        assert!(Brand::Yearn.config().background.is_none());
    }

    #[test]
    fn test_linear_points() {
        let close = |a: f32, b: f32| (a - b).abs() < 1e-5;
        // 225deg runs from the top-right corner to the bottom-left.
        let (x1, y1, x2, y2) = Gradient::linear_points(225.0);
        assert!(close(x1, 1.0) && close(y1, 0.0) && close(x2, 0.0) && close(y2, 1.0));
        // 180deg runs top to bottom.
        let (x1, y1, x2, y2) = Gradient::linear_points(180.0);
        assert!(close(x1, 0.5) && close(y1, 0.0) && close(x2, 0.5) && close(y2, 1.0));
    }

    #[test]
    fn test_svg_def() {
        let def = Brand::Katana.config().gradient.svg_def("bg").into_string();
        assert!(def.starts_with("<radialGradient id=\"bg\" cx=\"1\" cy=\"1\" r=\"1\">"));
        assert!(def.contains(
            "<stop offset=\"30%\" stop-color=\"#e04300\" stop-opacity=\"0.8\"></stop>"
        ));
    }
}
