use crate::error::SlothError;
use crate::preload::Preload;

/// Callback run once an animation has finished.
pub type Done = Box<dyn FnOnce()>;

/// The slice of the DOM a widget touches.
///
/// Handles are cheap references to the same underlying node, so cloning one and
/// moving it into a callback is how deferred work reaches back into the page.
pub trait Element: Clone + 'static {
    fn tag_name(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    /// Resolved value of a css property, as `getComputedStyle` reports it.
    fn computed_style(&self, property: &str) -> String;

    /// Value from the element's own `style` attribute, empty when unset.
    fn inline_style(&self, property: &str) -> String;

    /// Sets an inline style; an empty value removes the property.
    fn set_style(&self, property: &str, value: &str);

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    fn has_class(&self, class: &str) -> bool;

    /// Whether the element has any inner markup.
    fn has_content(&self) -> bool;

    fn parent(&self) -> Option<Self>;

    /// Inserts a new `tag` element where `self` is and moves `self` inside it.
    fn wrap(&self, tag: &str) -> Result<Self, SlothError>;

    /// Moves all children of `self` into a new `tag` element appended to `self`.
    fn wrap_inner(&self, tag: &str) -> Result<Self, SlothError>;

    /// Appends a new, empty `tag` element as the last child of `self`.
    fn append_new(&self, tag: &str) -> Result<Self, SlothError>;

    fn set_src(&self, src: &str);

    /// Fades the element's opacity in over `duration_ms`, undoing a `display: none`.
    fn fade_in(&self, duration_ms: u32, done: Done);

    /// Moves the element's height from its current value to `height` pixels.
    fn animate_height(&self, height: f64, duration_ms: u32, done: Done);

    fn set_styles(&self, styles: &[(&str, String)]) {
        for (property, value) in styles {
            self.set_style(property, value);
        }
    }

    fn hide(&self) {
        self.set_style("display", "none");
    }
}

/// The page a widget lives in.
pub trait Host {
    type Element: Element;

    fn device_pixel_ratio(&self) -> f64;

    fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, SlothError>;

    /// Starts fetching `source` off screen. Resolves exactly once.
    fn preload(&self, source: Option<String>) -> Preload;
}
