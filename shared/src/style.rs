use crate::features::PointProperties;

/// Two-stop linear interpolation over an input domain, the shape every
/// zoom- or attribute-driven paint property here takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl Ramp {
    pub const fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self { start, end }
    }

    /// A ramp that evaluates to `value` for every input.
    pub const fn constant(value: f64) -> Self {
        Self::new((0.0, value), (0.0, value))
    }

    /// Evaluate at `input`, clamping outside the stop range.
    pub fn eval(&self, input: f64) -> f64 {
        let (x0, y0) = self.start;
        let (x1, y1) = self.end;
        if x1 <= x0 {
            return y0;
        }
        let t = ((input - x0) / (x1 - x0)).clamp(0.0, 1.0);
        y0 + (y1 - y0) * t
    }
}

/// A ramp whose input is a named attribute of the point dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRamp {
    pub property: String,
    pub ramp: Ramp,
}

impl PropertyRamp {
    /// Evaluate against a feature's properties. Attributes the dataset does
    /// not carry contribute nothing.
    pub fn eval(&self, properties: &PointProperties) -> f64 {
        properties
            .number(&self.property)
            .map(|value| self.ramp.eval(value))
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string for canvas fill styles.
    pub fn css(&self) -> String {
        if self.a == 255 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f64 / 255.0
            )
        }
    }
}

fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    let t = t.clamp(0.0, 1.0);
    let value = a as f64 + (b as f64 - a as f64) * t;
    value.round().clamp(0.0, 255.0) as u8
}

/// Density-indexed color gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    pub stops: Vec<(f64, Rgba)>,
}

impl ColorRamp {
    /// The fixed heatmap gradient: transparent blue through white into
    /// deep red.
    pub fn heat() -> Self {
        Self {
            stops: vec![
                (0.0, Rgba::rgba(33, 102, 172, 0)),
                (0.2, Rgba::rgb(103, 169, 207)),
                (0.4, Rgba::rgb(209, 229, 240)),
                (0.6, Rgba::rgb(253, 219, 199)),
                (0.8, Rgba::rgb(239, 138, 98)),
                (1.0, Rgba::rgb(178, 24, 43)),
            ],
        }
    }

    /// Interpolated color at a density in [0, 1].
    pub fn eval(&self, density: f64) -> Rgba {
        let density = density.clamp(0.0, 1.0);
        for window in self.stops.windows(2) {
            let (left_pos, left) = window[0];
            let (right_pos, right) = window[1];
            if density >= left_pos && density <= right_pos {
                let span = (right_pos - left_pos).max(f64::EPSILON);
                let t = (density - left_pos) / span;
                return Rgba {
                    r: lerp_u8(left.r, right.r, t),
                    g: lerp_u8(left.g, right.g, t),
                    b: lerp_u8(left.b, right.b, t),
                    a: lerp_u8(left.a, right.a, t),
                };
            }
        }
        self.stops
            .last()
            .map(|&(_, color)| color)
            .unwrap_or(Rgba::rgba(0, 0, 0, 0))
    }
}

/// Attribute equality predicate, the only filter shape the layers use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualsFilter {
    pub property: String,
    pub value: String,
}

impl EqualsFilter {
    /// Filter on the `Date` attribute. An empty value matches no feature,
    /// which is how freshly created layers stay blank.
    pub fn date(value: impl Into<String>) -> Self {
        Self {
            property: "Date".to_owned(),
            value: value.into(),
        }
    }

    /// True when the feature's named attribute equals the filter value.
    /// Date labels are compared trimmed so padded source labels still match
    /// their index entry.
    pub fn matches(&self, properties: &PointProperties) -> bool {
        match self.property.as_str() {
            "Date" => !self.value.is_empty() && properties.date.trim() == self.value,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Paint properties of a heatmap layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapPaint {
    /// Per-point weight from the category attribute.
    pub weight: PropertyRamp,
    /// Density multiplier by zoom.
    pub intensity: Ramp,
    /// Kernel radius in pixels by zoom.
    pub radius: Ramp,
    /// Density gradient.
    pub color: ColorRamp,
    /// Layer opacity by zoom; the top stop carries the UI opacity setting.
    pub opacity: Ramp,
}

/// Paint properties of a fill layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FillPaint {
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Heatmap(HeatmapPaint),
    Fill(FillPaint),
}

/// Complete description of one styled layer as handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    pub kind: LayerKind,
    pub filter: Option<EqualsFilter>,
    pub visibility: Visibility,
}

impl LayerSpec {
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_interpolates_and_clamps() {
        let ramp = Ramp::new((7.0, 80.0), (12.0, 20.0));
        assert_eq!(ramp.eval(7.0), 80.0);
        assert_eq!(ramp.eval(12.0), 20.0);
        assert_eq!(ramp.eval(9.5), 50.0);
        assert_eq!(ramp.eval(5.0), 80.0);
        assert_eq!(ramp.eval(14.0), 20.0);
    }

    #[test]
    fn ramp_with_degenerate_domain_returns_start() {
        let ramp = Ramp::new((3.0, 1.0), (3.0, 9.0));
        assert_eq!(ramp.eval(3.0), 1.0);
        assert_eq!(ramp.eval(100.0), 1.0);
    }

    #[test]
    fn constant_ramp_ignores_its_input() {
        let ramp = Ramp::constant(0.7);
        for input in [0.0, 7.0, 10.0, 12.0, 99.0] {
            assert_eq!(ramp.eval(input), 0.7);
        }
    }

    #[test]
    fn property_ramp_reads_the_named_attribute() {
        let weight = PropertyRamp {
            property: "Sum".to_owned(),
            ramp: Ramp::new((0.0, 0.0), (10.0, 1.0)),
        };
        let props = PointProperties {
            sum: 5.0,
            ..PointProperties::default()
        };
        assert_eq!(weight.eval(&props), 0.5);

        let unknown = PropertyRamp {
            property: "Elevation".to_owned(),
            ramp: Ramp::new((0.0, 0.0), (10.0, 1.0)),
        };
        assert_eq!(unknown.eval(&props), 0.0);
    }

    #[test]
    fn heat_gradient_endpoints() {
        let ramp = ColorRamp::heat();
        assert_eq!(ramp.eval(0.0), Rgba::rgba(33, 102, 172, 0));
        assert_eq!(ramp.eval(1.0), Rgba::rgb(178, 24, 43));
        assert_eq!(ramp.eval(2.0), Rgba::rgb(178, 24, 43));
    }

    #[test]
    fn heat_gradient_hits_every_stop() {
        let ramp = ColorRamp::heat();
        assert_eq!(ramp.eval(0.2), Rgba::rgb(103, 169, 207));
        assert_eq!(ramp.eval(0.4), Rgba::rgb(209, 229, 240));
        assert_eq!(ramp.eval(0.6), Rgba::rgb(253, 219, 199));
        assert_eq!(ramp.eval(0.8), Rgba::rgb(239, 138, 98));
    }

    #[test]
    fn heat_gradient_fades_in_from_transparent() {
        let ramp = ColorRamp::heat();
        let low = ramp.eval(0.1);
        assert!(low.a > 0 && low.a < 255);
    }

    #[test]
    fn date_filter_matches_trimmed_labels() {
        let filter = EqualsFilter::date("2020-01-02");
        let padded = PointProperties {
            date: " 2020-01-02 ".to_owned(),
            ..PointProperties::default()
        };
        let other = PointProperties {
            date: "2020-01-03".to_owned(),
            ..PointProperties::default()
        };
        assert!(filter.matches(&padded));
        assert!(!filter.matches(&other));
    }

    #[test]
    fn empty_date_filter_matches_nothing() {
        let filter = EqualsFilter::date("");
        let blank = PointProperties::default();
        assert!(!filter.matches(&blank));
    }

    #[test]
    fn css_strings() {
        assert_eq!(Rgba::rgb(255, 255, 255).css(), "rgb(255, 255, 255)");
        assert_eq!(Rgba::rgba(10, 20, 30, 0).css(), "rgba(10, 20, 30, 0.000)");
    }
}
