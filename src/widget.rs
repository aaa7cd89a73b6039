use crate::background::Background;
use crate::dimensions::Dimensions;
use crate::dom::{Element, Host};
use crate::error::SlothError;
use crate::inline::Inline;
use crate::preload::{LoadError, Preload, Probe};
use crate::settings::{Settings, SettingsOverrides};
use crate::source::{parse_ratio, resolve_source, select_modifier, RATIO_ATTRIBUTE};

/// Per element settings overrides, as a query string.
pub const SETTINGS_ATTRIBUTE: &str = "data-sloth";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Errored,
}

/// State shared by both variants.
#[derive(Debug)]
pub struct Widget<E> {
    pub(crate) element: E,
    pub(crate) settings: Settings,
    pub(crate) ratio: f64,
    pub(crate) dimensions: Dimensions,
    pub(crate) source: Option<String>,
    pub(crate) state: LoadState,
}

impl<E: Element> Widget<E> {
    pub fn new(element: E, settings: Settings) -> Self {
        let ratio = settings.ratio;
        Self {
            element,
            settings,
            ratio,
            dimensions: Dimensions::default(),
            source: None,
            state: LoadState::Loading,
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub(crate) fn parse_options(&mut self) {
        let attribute = self.element.attribute(RATIO_ATTRIBUTE);
        self.ratio = parse_ratio(attribute.as_deref(), self.settings.ratio);
    }

    pub(crate) fn parse_source(&mut self, pixel_ratio: f64) {
        let modifier = select_modifier(self.dimensions.initial_width, &self.settings.versions);
        self.source = resolve_source(&self.element, &self.settings, modifier, pixel_ratio);
        log::debug!(
            "resolved {:?} for width {} (modifier {:?})",
            self.source,
            self.dimensions.initial_width,
            modifier
        );
    }

    /// Moves out of `Loading`. Settled widgets stay as they are.
    pub(crate) fn transition(&mut self, to: LoadState) -> Result<(), SlothError> {
        if self.state != LoadState::Loading {
            return Err(SlothError::AlreadySettled(self.state));
        }
        self.state = to;
        Ok(())
    }
}

/// Behaviour that differs between `<img>` elements and background containers.
pub trait Variant {
    type Element: Element;

    fn widget(&self) -> &Widget<Self::Element>;

    fn widget_mut(&mut self) -> &mut Widget<Self::Element>;

    fn calculate_dimensions(&mut self);

    /// Reserves layout space and puts the element into its loading state.
    fn wrap(&mut self) -> Result<(), SlothError>;

    fn on_load(&mut self, probe: &Probe);

    fn on_error(&mut self, error: &LoadError);

    /// Runs up to the preload. A failed wrap leaves the element errored, not loading.
    fn init(&mut self, pixel_ratio: f64) -> Result<(), SlothError> {
        self.widget_mut().parse_options();
        self.calculate_dimensions();
        self.widget_mut().parse_source(pixel_ratio);
        if let Err(err) = self.wrap() {
            log::error!("could not wrap element: {err}");
            self.widget_mut().transition(LoadState::Errored)?;
            let error = LoadError {
                url: self.widget().source.clone(),
            };
            self.on_error(&error);
            return Err(err);
        }
        Ok(())
    }

    fn settle(&mut self, outcome: Result<Probe, LoadError>) -> Result<LoadState, SlothError> {
        match outcome {
            Ok(probe) => {
                self.widget_mut().transition(LoadState::Loaded)?;
                self.on_load(&probe);
            }
            Err(error) => {
                self.widget_mut().transition(LoadState::Errored)?;
                self.on_error(&error);
            }
        }
        Ok(self.widget().state())
    }
}

#[derive(Debug)]
pub enum Sloth<E: Element> {
    Inline(Inline<E>),
    Background(Background<E>),
}

impl<E: Element> Sloth<E> {
    /// Picks the variant from the tag name.
    pub fn new(element: Option<E>, settings: Settings) -> Result<Self, SlothError> {
        let Some(element) = element else {
            log::error!("{}", SlothError::MissingElement);
            return Err(SlothError::MissingElement);
        };

        if element.tag_name().eq_ignore_ascii_case("img") {
            Ok(Sloth::Inline(Inline::new(element, settings)))
        } else {
            Ok(Sloth::Background(Background::new(element, settings)))
        }
    }

    /// Initializes the widget and issues its one preload.
    pub fn start<H>(host: &H, element: Option<E>, settings: Settings) -> Result<Pending<E>, SlothError>
    where
        H: Host<Element = E>,
    {
        let mut sloth = Sloth::new(element, settings)?;
        sloth.init(host.device_pixel_ratio())?;
        let preload = host.preload(sloth.widget().source.clone());
        Ok(Pending { sloth, preload })
    }

    pub fn widget(&self) -> &Widget<E> {
        match self {
            Sloth::Inline(inline) => inline.widget(),
            Sloth::Background(background) => background.widget(),
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Sloth::Inline(_))
    }

    fn init(&mut self, pixel_ratio: f64) -> Result<(), SlothError> {
        match self {
            Sloth::Inline(inline) => inline.init(pixel_ratio),
            Sloth::Background(background) => background.init(pixel_ratio),
        }
    }

    fn settle(&mut self, outcome: Result<Probe, LoadError>) -> Result<LoadState, SlothError> {
        match self {
            Sloth::Inline(inline) => inline.settle(outcome),
            Sloth::Background(background) => background.settle(outcome),
        }
    }
}

/// A widget waiting on its preload.
pub struct Pending<E: Element> {
    sloth: Sloth<E>,
    preload: Preload,
}

impl<E: Element> Pending<E> {
    pub fn sloth(&self) -> &Sloth<E> {
        &self.sloth
    }

    pub async fn settle(self) -> Result<Sloth<E>, SlothError> {
        let Pending { mut sloth, preload } = self;
        let outcome = preload.await;
        let state = sloth.settle(outcome)?;
        log::debug!("{:?} settled as {:?}", sloth.widget().source(), state);
        Ok(sloth)
    }
}

/// Starts one widget for every element matching `selector`.
///
/// A `data-sloth` query string on an element overrides `settings` for that
/// element only. Elements that fail to initialize are logged and skipped.
pub fn load<H: Host>(
    host: &H,
    selector: &str,
    settings: &Settings,
) -> Result<Vec<Pending<H::Element>>, SlothError> {
    let elements = host.query_all(selector)?;
    let mut pending = Vec::with_capacity(elements.len());
    for element in elements {
        let settings = match element.attribute(SETTINGS_ATTRIBUTE) {
            Some(query) if !query.trim().is_empty() => {
                match SettingsOverrides::from_query(&query) {
                    Ok(overrides) => settings.clone().merge(overrides),
                    Err(err) => {
                        log::error!("skipping element matching `{selector}`: {err}");
                        continue;
                    }
                }
            }
            _ => settings.clone(),
        };
        match Sloth::start(host, Some(element), settings) {
            Ok(widget) => pending.push(widget),
            Err(err) => log::error!("skipping element matching `{selector}`: {err}"),
        }
    }
    Ok(pending)
}
