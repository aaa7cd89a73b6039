//! Browser backed [`Element`] and [`Host`], built on `web-sys`.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::FutureExt;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlImageElement, Node, Window};

use crate::dom::{Done, Element, Host};
use crate::error::SlothError;
use crate::preload::{self, LoadError, Preload, Probe};
use crate::settings::Settings;
use crate::widget::Pending;

fn js_error(err: JsValue) -> SlothError {
    SlothError::Dom(format!("{err:?}"))
}

fn document() -> Result<Document, SlothError> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| SlothError::Dom("no document".into()))
}

fn create(document: &Document, tag: &str) -> Result<HtmlElement, SlothError> {
    document
        .create_element(tag)
        .map_err(js_error)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| SlothError::Dom(format!("<{tag}> is not an html element")))
}

#[derive(Clone, Debug)]
pub struct WebElement(pub HtmlElement);

impl From<HtmlElement> for WebElement {
    fn from(element: HtmlElement) -> Self {
        WebElement(element)
    }
}

impl WebElement {
    // Forces a style flush so the next change starts a transition.
    fn reflow(&self) {
        let _ = self.0.offset_height();
    }

    fn transition(&self, property: &str, duration_ms: u32, done: Done) {
        self.set_style("transition", &format!("{property} {duration_ms}ms"));
        let element = self.clone();
        Timeout::new(duration_ms, move || {
            element.set_style("transition", "");
            done();
        })
        .forget();
    }
}

impl Element for WebElement {
    fn tag_name(&self) -> String {
        self.0.tag_name()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn computed_style(&self, property: &str) -> String {
        web_sys::window()
            .and_then(|window| window.get_computed_style(&self.0).ok().flatten())
            .and_then(|style| style.get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn inline_style(&self, property: &str) -> String {
        self.0
            .style()
            .get_property_value(property)
            .unwrap_or_default()
    }

    fn set_style(&self, property: &str, value: &str) {
        let style = self.0.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            log::warn!("could not set {property}: {err:?}");
        }
    }

    fn add_class(&self, class: &str) {
        if let Err(err) = self.0.class_list().add_1(class) {
            log::warn!("could not add class {class}: {err:?}");
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(err) = self.0.class_list().remove_1(class) {
            log::warn!("could not remove class {class}: {err:?}");
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn has_content(&self) -> bool {
        !self.0.inner_html().is_empty()
    }

    fn parent(&self) -> Option<Self> {
        self.0
            .parent_element()
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
            .map(WebElement)
    }

    fn wrap(&self, tag: &str) -> Result<Self, SlothError> {
        let wrapper = create(&document()?, tag)?;
        // a detached element still gets its wrapper; the caller attaches it
        if let Some(parent) = self.0.parent_node() {
            let node: &Node = &self.0;
            parent.insert_before(&wrapper, Some(node)).map_err(js_error)?;
        }
        wrapper.append_child(&self.0).map_err(js_error)?;
        Ok(WebElement(wrapper))
    }

    fn wrap_inner(&self, tag: &str) -> Result<Self, SlothError> {
        let inner = create(&document()?, tag)?;
        while let Some(child) = self.0.first_child() {
            inner.append_child(&child).map_err(js_error)?;
        }
        self.0.append_child(&inner).map_err(js_error)?;
        Ok(WebElement(inner))
    }

    fn append_new(&self, tag: &str) -> Result<Self, SlothError> {
        let child = create(&document()?, tag)?;
        self.0.append_child(&child).map_err(js_error)?;
        Ok(WebElement(child))
    }

    fn set_src(&self, src: &str) {
        match self.0.dyn_ref::<HtmlImageElement>() {
            Some(img) => img.set_src(src),
            None => {
                if let Err(err) = self.0.set_attribute("src", src) {
                    log::warn!("could not set src: {err:?}");
                }
            }
        }
    }

    fn fade_in(&self, duration_ms: u32, done: Done) {
        self.set_style("opacity", "0");
        if self.inline_style("display") == "none" {
            self.set_style("display", "");
        }
        self.reflow();
        let element = self.clone();
        self.transition(
            "opacity",
            duration_ms,
            Box::new(move || {
                element.set_style("opacity", "");
                done();
            }),
        );
        self.set_style("opacity", "1");
    }

    fn animate_height(&self, height: f64, duration_ms: u32, done: Done) {
        self.set_style("height", &format!("{}px", self.0.offset_height()));
        self.reflow();
        self.transition("height", duration_ms, done);
        self.set_style("height", &format!("{height}px"));
    }
}

/// The current browser window.
#[derive(Clone, Debug)]
pub struct WebHost {
    window: Window,
    document: Document,
}

impl WebHost {
    pub fn new() -> Result<Self, SlothError> {
        let window = web_sys::window().ok_or_else(|| SlothError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| SlothError::Dom("no document".into()))?;
        Ok(Self { window, document })
    }
}

impl Host for WebHost {
    type Element = WebElement;

    fn device_pixel_ratio(&self) -> f64 {
        match self.window.device_pixel_ratio() {
            ratio if ratio > 0.0 => ratio,
            _ => 1.0,
        }
    }

    fn query_all(&self, selector: &str) -> Result<Vec<WebElement>, SlothError> {
        let nodes = self
            .document
            .query_selector_all(selector)
            .map_err(js_error)?;
        Ok((0..nodes.length())
            .filter_map(|idx| nodes.item(idx))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .map(WebElement)
            .collect())
    }

    fn preload(&self, source: Option<String>) -> Preload {
        let Some(url) = source else {
            return preload::failed(None);
        };
        let Some(body) = self.document.body() else {
            return preload::failed(Some(url));
        };
        let probe = match HtmlImageElement::new() {
            Ok(probe) => probe,
            Err(_) => return preload::failed(Some(url)),
        };

        // attached (hidden) so load events fire reliably
        if let Err(err) = probe.style().set_property("display", "none") {
            log::warn!("could not hide preload image: {err:?}");
        }
        if body.append_child(&probe).is_err() {
            return preload::failed(Some(url));
        }

        let (sender, receiver) = oneshot::channel::<Result<Probe, LoadError>>();
        let sender = Rc::new(RefCell::new(Some(sender)));

        let on_load = EventListener::once(&probe, "load", {
            let sender = sender.clone();
            let probe = probe.clone();
            move |_| {
                if let Some(sender) = sender.borrow_mut().take() {
                    let _ = sender.send(Ok(Probe {
                        src: probe.src(),
                        natural_width: f64::from(probe.natural_width()),
                        natural_height: f64::from(probe.natural_height()),
                    }));
                }
            }
        });
        let on_error = EventListener::once(&probe, "error", {
            let url = url.clone();
            move |_| {
                if let Some(sender) = sender.borrow_mut().take() {
                    let _ = sender.send(Err(LoadError { url: Some(url) }));
                }
            }
        });

        probe.set_src(&url);

        async move {
            let outcome = receiver
                .await
                .unwrap_or_else(|_| Err(LoadError { url: Some(url) }));
            drop((on_load, on_error));
            probe.remove();
            outcome
        }
        .boxed_local()
    }
}

/// Starts a widget for every element matching `selector` and drives each one on
/// the browser's event loop. Returns how many widgets were started.
pub fn load(selector: &str, settings: &Settings) -> Result<usize, SlothError> {
    let host = WebHost::new()?;
    let pending = crate::widget::load(&host, selector, settings)?;
    let started = pending.len();
    for widget in pending {
        spawn(widget);
    }
    Ok(started)
}

/// Drives a started widget until its preload settles.
pub fn spawn(widget: Pending<WebElement>) {
    leptos::spawn_local(async move {
        if let Err(err) = widget.settle().await {
            log::error!("{err}");
        }
    });
}
