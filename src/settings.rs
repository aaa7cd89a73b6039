use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::Deserialize;

use crate::error::SlothError;

/// Width threshold (in CSS pixels) to modifier label, iterated in ascending order.
pub type Versions = BTreeMap<u32, String>;

lazy_static! {
    /// Defaults every widget starts from. Never mutated, only cloned and extended.
    pub static ref DEFAULT_SETTINGS: Settings = Settings {
        versions: Versions::from([
            (220, "small".to_string()),
            (640, "medium".to_string()),
            (1280, "large".to_string()),
        ]),
        retina: String::new(),
        ratio: 16.0 / 9.0,
        source_getter: None,
    };
}

/// What a [`SourceGetter`] gets to look at when picking a url.
pub struct SourceContext<'a> {
    pub modifier: Option<&'a str>,
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl<'a> SourceContext<'a> {
    pub fn new(modifier: Option<&'a str>, lookup: &'a dyn Fn(&str) -> Option<String>) -> Self {
        Self { modifier, lookup }
    }

    /// Reads an attribute of the element being resolved.
    pub fn attribute(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
    }
}

/// Custom source resolution. Returning `None` or an empty string falls back to the
/// `data-src-<modifier>` and `data-src` attributes.
#[derive(Clone)]
pub struct SourceGetter(Arc<dyn Fn(&SourceContext) -> Option<String> + Send + Sync>);

impl SourceGetter {
    pub fn new(f: impl Fn(&SourceContext) -> Option<String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, context: &SourceContext) -> Option<String> {
        (self.0)(context)
    }

    /// Treats the modifier as a path segment of `data-src`.
    ///
    /// `//c.assets.sh/abc/original` becomes `//c.assets.sh/abc/small`, anything
    /// without exactly five segments gets the modifier appended.
    pub fn path_segment() -> Self {
        Self::new(|context| {
            let modifier = context.modifier?;
            let src = context.attribute("data-src")?;
            let mut segments: Vec<&str> = src.split('/').collect();
            if segments.len() == 5 {
                segments[4] = modifier;
            } else {
                segments.push(modifier);
            }
            Some(segments.join("/"))
        })
    }
}

impl fmt::Debug for SourceGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SourceGetter(..)")
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub versions: Versions,
    /// Appended to the resolved url on high density screens, e.g. `@2x`.
    pub retina: String,
    /// Aspect ratio (width / height) assumed until the image is known.
    pub ratio: f64,
    pub source_getter: Option<SourceGetter>,
}

impl Default for Settings {
    fn default() -> Self {
        DEFAULT_SETTINGS.clone()
    }
}

impl Settings {
    /// Shallow merge of `overrides` onto the defaults.
    pub fn extend(overrides: SettingsOverrides) -> Self {
        Settings::default().merge(overrides)
    }

    pub fn merge(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(versions) = overrides.versions {
            self.versions = versions;
        }
        if let Some(retina) = overrides.retina {
            self.retina = retina;
        }
        if let Some(ratio) = overrides.ratio {
            self.ratio = ratio;
        }
        if let Some(getter) = overrides.source_getter {
            self.source_getter = Some(getter);
        }
        self
    }

    pub fn with_source_getter(mut self, getter: SourceGetter) -> Self {
        self.source_getter = Some(getter);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct SettingsOverrides {
    pub versions: Option<Versions>,
    pub retina: Option<String>,
    pub ratio: Option<f64>,
    pub source_getter: Option<SourceGetter>,
}

// Query strings carry map keys as text.
#[derive(Deserialize)]
struct QueryOverrides {
    versions: Option<BTreeMap<String, String>>,
    retina: Option<String>,
    ratio: Option<f64>,
}

impl SettingsOverrides {
    /// Parses overrides such as `retina=@2x&ratio=1.5&versions[300]=small`.
    pub fn from_query(query: &str) -> Result<Self, SlothError> {
        let query = query.trim_start_matches('?');
        let parsed: QueryOverrides = serde_qs::from_str(query)?;

        let versions = match parsed.versions {
            Some(raw) => {
                let mut versions = Versions::new();
                for (threshold, modifier) in raw {
                    let threshold = threshold.trim().parse::<u32>().map_err(|_| {
                        SlothError::InvalidSettings(format!("bad version threshold `{threshold}`"))
                    })?;
                    versions.insert(threshold, modifier);
                }
                Some(versions)
            }
            None => None,
        };

        if let Some(ratio) = parsed.ratio {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(SlothError::InvalidSettings(format!("bad ratio `{ratio}`")));
            }
        }

        Ok(Self {
            versions,
            retina: parsed.retina,
            ratio: parsed.ratio,
            source_getter: None,
        })
    }
}
