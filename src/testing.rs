//! In-memory page used by the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures::FutureExt;

use crate::dom::{Done, Element, Host};
use crate::error::SlothError;
use crate::preload::{self, Preload, Probe};

#[derive(Debug, Default)]
struct Node {
    tag: String,
    attributes: HashMap<String, String>,
    computed: HashMap<String, String>,
    inline: HashMap<String, String>,
    classes: Vec<String>,
    text: String,
    src: Option<String>,
    children: Vec<FakeElement>,
    parent: Option<Weak<RefCell<Node>>>,
    fades: u32,
    animated_heights: Vec<f64>,
    broken: bool,
}

#[derive(Clone, Debug)]
pub struct FakeElement(Rc<RefCell<Node>>);

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(Node {
            tag: tag.to_uppercase(),
            ..Default::default()
        })))
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.into(), value.into());
        self
    }

    pub fn with_computed(self, property: &str, value: &str) -> Self {
        self.0
            .borrow_mut()
            .computed
            .insert(property.into(), value.into());
        self
    }

    pub fn with_inline(self, property: &str, value: &str) -> Self {
        self.set_style(property, value);
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Makes every structural change on this node fail.
    pub fn with_broken_dom(self) -> Self {
        self.0.borrow_mut().broken = true;
        self
    }

    fn check(&self) -> Result<(), SlothError> {
        if self.0.borrow().broken {
            return Err(SlothError::Dom("node refused the change".into()));
        }
        Ok(())
    }

    pub fn with_text(self, text: &str) -> Self {
        self.0.borrow_mut().text = text.into();
        self
    }

    pub fn append(&self, child: &FakeElement) {
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child.clone());
    }

    pub fn children(&self) -> Vec<FakeElement> {
        self.0.borrow().children.clone()
    }

    pub fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    pub fn src(&self) -> Option<String> {
        self.0.borrow().src.clone()
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub fn fades(&self) -> u32 {
        self.0.borrow().fades
    }

    pub fn animated_heights(&self) -> Vec<f64> {
        self.0.borrow().animated_heights.clone()
    }

    pub fn same_node(&self, other: &FakeElement) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Removes the node from its parent.
    pub fn remove(&self) {
        let parent = self.0.borrow_mut().parent.take();
        if let Some(parent) = parent.and_then(|parent| parent.upgrade()) {
            parent
                .borrow_mut()
                .children
                .retain(|child| !Rc::ptr_eq(&child.0, &self.0));
        }
    }
}

impl Element for FakeElement {
    fn tag_name(&self) -> String {
        self.0.borrow().tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn computed_style(&self, property: &str) -> String {
        let node = self.0.borrow();
        // canned layout first, the way a stylesheet would resolve `80%` to pixels
        if let Some(value) = node.computed.get(property) {
            return value.clone();
        }
        if let Some(value) = node.inline.get(property) {
            return value.clone();
        }
        match property {
            "max-width" => "none".into(),
            "position" => "static".into(),
            _ => String::new(),
        }
    }

    fn inline_style(&self, property: &str) -> String {
        self.0
            .borrow()
            .inline
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut node = self.0.borrow_mut();
        if value.is_empty() {
            node.inline.remove(property);
        } else {
            node.inline.insert(property.into(), value.into());
        }
    }

    fn add_class(&self, class: &str) {
        let mut node = self.0.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.into());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn has_content(&self) -> bool {
        let node = self.0.borrow();
        !node.text.is_empty() || !node.children.is_empty()
    }

    fn parent(&self) -> Option<Self> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(|parent| parent.upgrade())
            .map(FakeElement)
    }

    fn wrap(&self, tag: &str) -> Result<Self, SlothError> {
        self.check()?;
        let wrapper = FakeElement::new(tag);
        let Some(parent) = self.parent() else {
            wrapper.append(self);
            return Ok(wrapper);
        };
        let wrapper_node = wrapper.clone();
        {
            let mut parent_node = parent.0.borrow_mut();
            let position = parent_node
                .children
                .iter()
                .position(|child| Rc::ptr_eq(&child.0, &self.0))
                .ok_or_else(|| SlothError::Dom("element not in parent".into()))?;
            parent_node.children[position] = wrapper_node;
        }
        wrapper.0.borrow_mut().parent = Some(Rc::downgrade(&parent.0));
        self.0.borrow_mut().parent = None;
        wrapper.append(self);
        Ok(wrapper)
    }

    fn wrap_inner(&self, tag: &str) -> Result<Self, SlothError> {
        self.check()?;
        let inner = FakeElement::new(tag);
        let (children, text) = {
            let mut node = self.0.borrow_mut();
            (
                std::mem::take(&mut node.children),
                std::mem::take(&mut node.text),
            )
        };
        for child in &children {
            inner.append(child);
        }
        inner.0.borrow_mut().text = text;
        self.append(&inner);
        Ok(inner)
    }

    fn append_new(&self, tag: &str) -> Result<Self, SlothError> {
        self.check()?;
        let child = FakeElement::new(tag);
        self.append(&child);
        Ok(child)
    }

    fn set_src(&self, src: &str) {
        self.0.borrow_mut().src = Some(src.into());
    }

    fn fade_in(&self, _duration_ms: u32, done: Done) {
        {
            let mut node = self.0.borrow_mut();
            if node.inline.get("display").map(String::as_str) == Some("none") {
                node.inline.remove("display");
            }
            node.inline.remove("opacity");
            node.fades += 1;
        }
        done();
    }

    fn animate_height(&self, height: f64, _duration_ms: u32, done: Done) {
        {
            let mut node = self.0.borrow_mut();
            node.inline.insert("height".into(), format!("{height}px"));
            node.animated_heights.push(height);
        }
        done();
    }
}

/// Page with a fixed set of elements and canned image sizes.
pub struct FakeHost {
    pub body: FakeElement,
    pub pixel_ratio: f64,
    images: HashMap<String, (f64, f64)>,
    pub requested: RefCell<Vec<Option<String>>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            body: FakeElement::new("body").with_computed("width", "1024px"),
            pixel_ratio: 1.0,
            images: HashMap::new(),
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `url` load with the given natural size.
    pub fn with_image(mut self, url: &str, width: f64, height: f64) -> Self {
        self.images.insert(url.into(), (width, height));
        self
    }

    pub fn add(&self, element: &FakeElement) {
        self.body.append(element);
    }

    fn collect(element: &FakeElement, class: &str, found: &mut Vec<FakeElement>) {
        for child in element.children() {
            if child.has_class(class) {
                found.push(child.clone());
            }
            Self::collect(&child, class, found);
        }
    }
}

impl Host for FakeHost {
    type Element = FakeElement;

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Only `.class` selectors are understood.
    fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>, SlothError> {
        let class = selector
            .strip_prefix('.')
            .ok_or_else(|| SlothError::Dom(format!("unsupported selector `{selector}`")))?;
        let mut found = Vec::new();
        Self::collect(&self.body, class, &mut found);
        Ok(found)
    }

    fn preload(&self, source: Option<String>) -> Preload {
        self.requested.borrow_mut().push(source.clone());
        match source {
            Some(url) => match self.images.get(&url) {
                Some((width, height)) => {
                    let probe = Probe {
                        src: url,
                        natural_width: *width,
                        natural_height: *height,
                    };
                    futures::future::ready(Ok(probe)).boxed_local()
                }
                None => preload::failed(Some(url)),
            },
            None => preload::failed(None),
        }
    }
}
