use futures::future::{self, FutureExt, LocalBoxFuture};
use thiserror::Error;

/// What a finished preload learned about the image.
#[derive(Clone, Debug, PartialEq)]
pub struct Probe {
    pub src: String,
    pub natural_width: f64,
    pub natural_height: f64,
}

impl Probe {
    /// Height the image takes up when scaled to `width`.
    ///
    /// Falls back to `fallback` when the image reports no usable size.
    pub fn height_at(&self, width: f64, fallback: f64) -> f64 {
        if self.natural_width > 0.0 && self.natural_height > 0.0 {
            width / self.natural_width * self.natural_height
        } else {
            fallback
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("Could not load {}", url.as_deref().unwrap_or("<no source>"))]
pub struct LoadError {
    pub url: Option<String>,
}

/// Single outcome of one preload attempt.
pub type Preload = LocalBoxFuture<'static, Result<Probe, LoadError>>;

/// A preload that has already failed, used when no source resolved.
pub fn failed(url: Option<String>) -> Preload {
    future::ready(Err(LoadError { url })).boxed_local()
}
