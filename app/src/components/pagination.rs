use leptos::{
    ev,
    html::{button, nav, span},
    prelude::*,
};

use crate::listing::{PageLink, PageMeta};

const BUTTON: &str = "py-1 px-3 rounded-lg transition-all duration-500 cursor-pointer disabled:opacity-40 disabled:cursor-default hover:text-black hover:bg-white";

/// Previous/next buttons around the page window of `meta`.
///
/// Hidden while everything fits on one page. `on_page` receives the raw page
/// number; out-of-range requests are clamped by the server.
pub fn component(
    meta: Signal<PageMeta>,
    pending: Signal<bool>,
    on_page: impl Fn(usize) + Copy + Send + Sync + 'static,
) -> impl IntoView {
    let page_button = move |page: usize| {
        let current = move || meta.with(|meta| meta.current_page == page);
        button()
            .class(BUTTON)
            .class(("bg-white", current))
            .class(("text-black", current))
            .attr("aria-current", move || current().then_some("page"))
            .prop("disabled", move || pending.get())
            .on(ev::click, move |_| on_page(page))
            .child(page.to_string())
            .into_any()
    };

    move || {
        let meta = meta.get();
        (meta.last_page > 1).then(|| {
            nav().aria_label("Pagination").class("flex flex-row flex-wrap gap-1 justify-center items-center mt-8 text-sm").child((
                button()
                    .class(BUTTON)
                    .prop("disabled", move || pending.get() || !meta.has_previous())
                    .on(ev::click, move |_| on_page(meta.current_page.saturating_sub(1)))
                    .child("Previous"),
                meta.window()
                    .into_iter()
                    .map(|link| match link {
                        PageLink::Page(page) => page_button(page),
                        PageLink::Gap => span().class("px-2 text-gray-400").child("\u{2026}").into_any(),
                    })
                    .collect::<Vec<_>>(),
                button()
                    .class(BUTTON)
                    .prop("disabled", move || pending.get() || !meta.has_next())
                    .on(ev::click, move |_| on_page(meta.current_page + 1))
                    .child("Next"),
            ))
        })
    }
}
