pub mod background;
pub mod component;
pub mod dimensions;
pub mod dom;
pub mod error;
pub mod inline;
pub mod layout;
pub mod preload;
pub mod settings;
pub mod source;
pub mod widget;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
mod testing;

pub use component::SlothImage;
pub use error::SlothError;
pub use settings::{Settings, SettingsOverrides, SourceGetter};
pub use widget::{load, LoadState, Pending, Sloth, Variant};
