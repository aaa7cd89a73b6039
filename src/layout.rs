//! Class names, timings and the style tables used to reserve space for an image
//! before it is known.

use crate::dimensions::Dimensions;
use crate::dom::Element;

pub const SLOTH: &str = "sloth";
pub const LOADING: &str = "is-loading";
pub const ERRORED: &str = "is-errored";
pub const SQUARE: &str = "is-square";
pub const PORTRAIT: &str = "is-portrait";
pub const LANDSCAPE: &str = "is-landscape";
pub const BACKGROUND_LAYER: &str = "sloth__background";
pub const CONTENT_LAYER: &str = "sloth__content";

pub const FADE_IN_MS: u32 = 880;
pub const HEIGHT_CORRECTION_MS: u32 = 220;

/// Longhands copied one by one when the `background` shorthand comes back empty.
pub const BACKGROUND_LONGHANDS: [&str; 6] = [
    "background-size",
    "background-repeat",
    "background-position",
    "background-origin",
    "background-clip",
    "background-color",
];

type Styles = Vec<(&'static str, String)>;

/// Placeholder box for an `<img>`, sized to the assumed ratio.
pub fn inline_wrapper_styles(dimensions: &Dimensions, max_width: &str) -> Styles {
    let mut styles = vec![
        ("width", format!("{}px", dimensions.initial_width)),
        ("height", format!("{}px", dimensions.initial_height)),
        ("display", "inline-block".to_string()),
        // no gaps from whitespace around the image
        ("font-size", "0".to_string()),
    ];
    if !max_width.is_empty() && max_width != "none" {
        styles.push(("max-width", max_width.to_string()));
    }
    styles
}

/// The image fills its wrapper.
pub fn inline_image_styles() -> Styles {
    vec![
        ("display", "block".to_string()),
        ("width", "100%".to_string()),
        ("position", "relative".to_string()),
        ("z-index", "2".to_string()),
    ]
}

pub fn content_layer_styles() -> Styles {
    vec![
        ("position", "relative".to_string()),
        ("z-index", "2".to_string()),
    ]
}

pub fn background_layer_styles() -> Styles {
    vec![
        ("position", "absolute".to_string()),
        ("top", "0".to_string()),
        ("left", "0".to_string()),
        ("right", "0".to_string()),
        ("bottom", "0".to_string()),
        ("z-index", "1".to_string()),
    ]
}

/// Background properties the layer takes over from the container.
pub fn inherited_background<E: Element>(element: &E) -> Styles {
    let shorthand = element.computed_style("background");
    if !shorthand.is_empty() {
        return vec![("background", shorthand)];
    }

    BACKGROUND_LONGHANDS
        .iter()
        .map(|property| (*property, element.computed_style(property)))
        .filter(|(_, value)| !value.is_empty())
        .collect()
}

/// Whether the container must become `position: relative` to scope the layers.
pub fn needs_relative_position(position: &str) -> bool {
    matches!(position, "" | "static" | "relative")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Square,
    Portrait,
    Landscape,
}

impl Orientation {
    /// Compares the placeholder width with the height the real image needs at it.
    pub fn classify(width: f64, height: f64) -> Self {
        if width == height {
            Orientation::Square
        } else if width < height {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Orientation::Square => SQUARE,
            Orientation::Portrait => PORTRAIT,
            Orientation::Landscape => LANDSCAPE,
        }
    }
}
