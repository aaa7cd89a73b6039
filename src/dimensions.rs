use crate::dom::Element;
use crate::source::parse_leading_int;

/// Width applied to the element once the image is in.
#[derive(Clone, Debug, PartialEq)]
pub enum Width {
    Px(f64),
    /// Author supplied inline style width, kept verbatim (`50%`, `20em`, ...).
    Css(String),
    /// Left to the stylesheet, e.g. fluid images bounded by `max-width`.
    Unset,
}

impl Width {
    pub fn to_css(&self) -> String {
        match self {
            Width::Px(px) => format!("{px}px"),
            Width::Css(value) => value.clone(),
            Width::Unset => String::new(),
        }
    }
}

/// Layout state read from the page before anything is wrapped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measurements {
    pub width: Option<f64>,
    pub inline_width: String,
    pub max_width: String,
    pub parent_width: Option<f64>,
}

impl Measurements {
    pub fn read<E: Element>(element: &E) -> Self {
        Self {
            width: css_px(&element.computed_style("width")),
            inline_width: element.inline_style("width"),
            max_width: element.computed_style("max-width"),
            parent_width: element
                .parent()
                .and_then(|parent| css_px(&parent.computed_style("width"))),
        }
    }

    fn has_max_width(&self) -> bool {
        !self.max_width.is_empty() && self.max_width != "none"
    }

    fn styled_width(&self, fallback: f64) -> Width {
        if self.inline_width.is_empty() {
            Width::Px(fallback)
        } else {
            Width::Css(self.inline_width.clone())
        }
    }
}

fn css_px(value: &str) -> Option<f64> {
    parse_leading_int(value).map(|px| px as f64)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dimensions {
    pub initial_width: f64,
    pub initial_height: f64,
    pub width: Width,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            initial_width: 0.0,
            initial_height: 0.0,
            width: Width::Px(0.0),
        }
    }
}

impl Dimensions {
    /// Containers keep their rendered width.
    pub fn background(measurements: &Measurements, ratio: f64) -> Self {
        let initial_width = measurements.width.unwrap_or(0.0);
        Self {
            initial_width,
            initial_height: initial_width / ratio,
            width: measurements.styled_width(initial_width),
        }
    }

    /// Images without a width of their own take the parent's.
    pub fn inline(measurements: &Measurements, ratio: f64) -> Self {
        let (initial_width, width) = match measurements.width.filter(|width| *width != 0.0) {
            Some(width) => (width, measurements.styled_width(width)),
            None => {
                let inherited = measurements.parent_width.unwrap_or(0.0);
                if measurements.has_max_width() {
                    (inherited, Width::Unset)
                } else {
                    (inherited, Width::Px(inherited))
                }
            }
        };

        Self {
            initial_width,
            initial_height: initial_width / ratio,
            width,
        }
    }
}
