use crate::dimensions::{Dimensions, Measurements};
use crate::dom::Element;
use crate::error::SlothError;
use crate::layout::{
    inline_image_styles, inline_wrapper_styles, Orientation, ERRORED, FADE_IN_MS,
    HEIGHT_CORRECTION_MS, LOADING, SLOTH,
};
use crate::preload::{LoadError, Probe};
use crate::settings::Settings;
use crate::widget::{Variant, Widget};

/// Widget for an `<img>` element.
///
/// The image is wrapped in an inline-block `span` sized to the assumed ratio, and
/// the wrapper's height is corrected once the real image is known.
#[derive(Debug)]
pub struct Inline<E> {
    widget: Widget<E>,
    wrapper: Option<E>,
}

impl<E: Element> Inline<E> {
    pub fn new(element: E, settings: Settings) -> Self {
        Self {
            widget: Widget::new(element, settings),
            wrapper: None,
        }
    }

    /// The placeholder span, once wrapped.
    pub fn wrapper(&self) -> Option<&E> {
        self.wrapper.as_ref()
    }

    fn marked(&self) -> &E {
        self.wrapper.as_ref().unwrap_or(&self.widget.element)
    }
}

impl<E: Element> Variant for Inline<E> {
    type Element = E;

    fn widget(&self) -> &Widget<E> {
        &self.widget
    }

    fn widget_mut(&mut self) -> &mut Widget<E> {
        &mut self.widget
    }

    fn calculate_dimensions(&mut self) {
        let measurements = Measurements::read(&self.widget.element);
        self.widget.dimensions = Dimensions::inline(&measurements, self.widget.ratio);
    }

    fn wrap(&mut self) -> Result<(), SlothError> {
        let element = &self.widget.element;
        let max_width = element.computed_style("max-width");

        let wrapper = element.wrap("span")?;
        wrapper.add_class(SLOTH);
        wrapper.add_class(LOADING);
        wrapper.set_styles(&inline_wrapper_styles(&self.widget.dimensions, &max_width));

        element.set_styles(&inline_image_styles());

        self.wrapper = Some(wrapper);
        Ok(())
    }

    fn on_load(&mut self, probe: &Probe) {
        let wrapper = self.marked().clone();
        let dimensions = &self.widget.dimensions;

        // hand the width back to the stylesheet or the element's own width
        wrapper.set_style("width", &dimensions.width.to_css());

        let corrected = probe.height_at(dimensions.initial_width, dimensions.initial_height);
        let orientation = Orientation::classify(dimensions.initial_width, corrected);

        let element = &self.widget.element;
        element.set_style("opacity", "0");
        element.set_src(&probe.src);
        element.fade_in(FADE_IN_MS, {
            let wrapper = wrapper.clone();
            Box::new(move || wrapper.remove_class(LOADING))
        });

        wrapper.add_class(orientation.class());
        wrapper.animate_height(corrected, HEIGHT_CORRECTION_MS, {
            let target = wrapper.clone();
            Box::new(move || target.set_style("height", ""))
        });
    }

    fn on_error(&mut self, error: &LoadError) {
        let wrapper = self.marked();
        wrapper.remove_class(LOADING);
        wrapper.add_class(ERRORED);
        log::error!("{error}");
    }
}
