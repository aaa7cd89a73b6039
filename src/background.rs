use crate::dimensions::{Dimensions, Measurements};
use crate::dom::Element;
use crate::error::SlothError;
use crate::layout::{
    background_layer_styles, content_layer_styles, inherited_background,
    needs_relative_position, BACKGROUND_LAYER, CONTENT_LAYER, ERRORED, FADE_IN_MS, LOADING,
    SLOTH,
};
use crate::preload::{LoadError, Probe};
use crate::settings::Settings;
use crate::widget::{Variant, Widget};

/// Widget for any container showing the image as a css background.
///
/// Existing content is lifted into a layer above a full-bleed background layer,
/// which fades in once the image has loaded.
#[derive(Debug)]
pub struct Background<E> {
    widget: Widget<E>,
    layer: Option<E>,
}

impl<E: Element> Background<E> {
    pub fn new(element: E, settings: Settings) -> Self {
        Self {
            widget: Widget::new(element, settings),
            layer: None,
        }
    }

    pub fn layer(&self) -> Option<&E> {
        self.layer.as_ref()
    }
}

impl<E: Element> Variant for Background<E> {
    type Element = E;

    fn widget(&self) -> &Widget<E> {
        &self.widget
    }

    fn widget_mut(&mut self) -> &mut Widget<E> {
        &mut self.widget
    }

    fn calculate_dimensions(&mut self) {
        let measurements = Measurements::read(&self.widget.element);
        self.widget.dimensions = Dimensions::background(&measurements, self.widget.ratio);
    }

    fn wrap(&mut self) -> Result<(), SlothError> {
        let element = &self.widget.element;
        let inherited = inherited_background(element);

        element.add_class(SLOTH);
        element.add_class(LOADING);

        if needs_relative_position(&element.computed_style("position")) {
            element.set_style("position", "relative");
        }

        if element.has_content() {
            let content = element.wrap_inner("div")?;
            content.add_class(CONTENT_LAYER);
            content.set_styles(&content_layer_styles());
        }

        let layer = element.append_new("div")?;
        layer.add_class(BACKGROUND_LAYER);
        layer.set_styles(&background_layer_styles());
        layer.set_styles(&inherited);
        layer.hide();

        self.layer = Some(layer);
        Ok(())
    }

    fn on_load(&mut self, probe: &Probe) {
        let element = self.widget.element.clone();
        let Some(layer) = &self.layer else {
            element.remove_class(LOADING);
            return;
        };

        layer.set_style("background-image", &format!("url(\"{}\")", probe.src));
        layer.fade_in(FADE_IN_MS, Box::new(move || element.remove_class(LOADING)));
    }

    fn on_error(&mut self, error: &LoadError) {
        let element = &self.widget.element;
        element.remove_class(LOADING);
        element.add_class(ERRORED);
        log::error!("{error}");
    }
}
