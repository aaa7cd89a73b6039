use leptos::*;
use leptos_meta::Link;

use crate::settings::Settings;
use crate::source::{RATIO_ATTRIBUTE, SOURCE_ATTRIBUTE};

/**
 * Lazily loaded, responsive `<img>`.
 *
 * Renders the image without a `src`; in the browser the element is handed to an
 * inline Sloth widget once mounted, which picks the version matching its width.
 */
#[component]
pub fn SlothImage(
    /// Fallback source, `data-src`.
    #[prop(into)]
    src: String,
    /// `(modifier, url)` pairs rendered as `data-src-<modifier>`.
    #[prop(optional)]
    versions: Vec<(String, String)>,
    /// Aspect ratio as `W:H`.
    #[prop(into, optional)]
    ratio: Option<String>,
    #[prop(optional)] settings: Option<Settings>,
    // Will add preload link to head if true.
    #[prop(default = false)]
    priority: bool,
    #[prop(into, optional)] alt: String,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let node_ref = create_node_ref::<html::Img>();

    let mut img = html::img()
        .node_ref(node_ref)
        .attr(SOURCE_ATTRIBUTE, src.clone())
        .attr("alt", alt)
        .attr("class", class);
    if let Some(ratio) = ratio {
        img = img.attr(RATIO_ATTRIBUTE, ratio);
    }
    for (modifier, url) in versions {
        img = img.attr(format!("{SOURCE_ATTRIBUTE}-{modifier}"), url);
    }

    #[cfg(feature = "web")]
    node_ref.on_load(move |img| {
        let element: web_sys::HtmlElement = (*img).clone().into();
        // wait until the node sits in the document, the wrapper needs its parent
        request_animation_frame(move || {
            let settings = settings.unwrap_or_default();
            let started = crate::web::WebHost::new().and_then(|host| {
                crate::widget::Sloth::start(&host, Some(element.into()), settings)
            });
            match started {
                Ok(widget) => crate::web::spawn(widget),
                Err(err) => ::log::error!("{err}"),
            }
        });
    });
    #[cfg(not(feature = "web"))]
    let _ = settings;

    let preload = priority.then(|| view! { <Link rel="preload" as_="image" href=src/> });

    view! {
        {preload}
        {img}
    }
}
