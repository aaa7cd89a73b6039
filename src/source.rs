use crate::dom::Element;
use crate::settings::{Settings, SourceContext, Versions};

pub const SOURCE_ATTRIBUTE: &str = "data-src";
pub const RATIO_ATTRIBUTE: &str = "data-ratio";

/// Picks the largest tier the element qualifies for.
///
/// A tier qualifies when its threshold is strictly below `width`, so an element
/// exactly as wide as the smallest threshold gets no modifier.
pub fn select_modifier(width: f64, versions: &Versions) -> Option<&str> {
    let mut modifier = None;
    for (threshold, version) in versions {
        if width > f64::from(*threshold) {
            modifier = Some(version.as_str());
        } else {
            break;
        }
    }
    modifier
}

/// Reads a `W:H` ratio attribute, e.g. `4:3` or `2` (height defaults to 1).
pub fn parse_ratio(attribute: Option<&str>, default: f64) -> f64 {
    let Some(raw) = attribute.filter(|raw| !raw.is_empty()) else {
        return default;
    };

    let mut parts = raw.split(':');
    let width = parts.next().and_then(parse_leading_int);
    let height = match parts.next() {
        Some(part) if !part.is_empty() => parse_leading_int(part),
        _ => Some(1),
    };

    match (width, height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => width as f64 / height as f64,
        _ => default,
    }
}

/// Integer prefix of `value`, like `parseInt("400px") == 400`.
pub(crate) fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let digits_from = usize::from(value.starts_with(['-', '+']));
    let end = value[digits_from..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value.len(), |idx| idx + digits_from);
    if end == digits_from {
        return None;
    }
    value[..end].parse().ok()
}

/// Resolves the url to load for `element`.
///
/// Tries the configured getter, then `data-src-<modifier>`, then `data-src`;
/// empty strings count as missing. The retina suffix is appended on high density
/// screens without looking for a dedicated retina attribute.
pub fn resolve_source<E: Element>(
    element: &E,
    settings: &Settings,
    modifier: Option<&str>,
    pixel_ratio: f64,
) -> Option<String> {
    let lookup = |name: &str| element.attribute(name);

    let mut source = settings
        .source_getter
        .as_ref()
        .and_then(|getter| getter.call(&SourceContext::new(modifier, &lookup)))
        .filter(|source| !source.is_empty());

    if source.is_none() {
        source = modifier
            .and_then(|modifier| element.attribute(&format!("{SOURCE_ATTRIBUTE}-{modifier}")))
            .filter(|source| !source.is_empty());
    }
    if source.is_none() {
        source = element
            .attribute(SOURCE_ATTRIBUTE)
            .filter(|source| !source.is_empty());
    }

    source.map(|mut source| {
        if pixel_ratio > 1.0 && !settings.retina.is_empty() {
            source.push_str(&settings.retina);
        }
        source
    })
}
