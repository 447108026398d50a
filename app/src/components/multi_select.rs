//! Collapsible checkbox dropdown used by the listing filters.
//!
//! Selection and open state are both owned by the caller. The control sizes
//! itself to the widest text it may show, measured with an offscreen probe.

use leptos::{html, prelude::*};

use crate::{
    dropdown::{DropdownOption, display_title, fitted_width, texts_to_measure},
    filter::Selection,
};

pub fn component(
    title: &'static str,
    options: Signal<Vec<DropdownOption>>,
    selected: Signal<Selection>,
    on_change: impl Fn(Selection) + Copy + Send + Sync + 'static,
    open: Signal<bool>,
    set_open: impl Fn(bool) + Copy + Send + Sync + 'static,
    min_width: f64,
) -> impl IntoView {
    let probe = NodeRef::<html::Span>::new();
    let width = RwSignal::new(min_width);

    Effect::new(move |_| {
        let texts = texts_to_measure(title, &options.get(), &selected.get());
        let Some(probe) = probe.get() else {
            return;
        };
        let measured: Vec<f64> = texts
            .iter()
            .map(|text| {
                probe.set_text_content(Some(text));
                probe.get_bounding_client_rect().width()
            })
            .collect();
        probe.set_text_content(None);
        width.set(fitted_width(min_width, measured));
    });

    let label = move || options.with(|options| selected.with(|selected| display_title(title, options, selected)));

    view! {
        <div class="relative text-sm" style:width=move || format!("{}px", width.get())>
            <span
                node_ref=probe
                aria-hidden="true"
                class="absolute invisible whitespace-nowrap pointer-events-none -left-[9999px]"
            ></span>
            <button
                type="button"
                class="flex justify-between items-center py-2 px-3 w-full text-left rounded-lg border border-white/20 bg-card hover:border-[#ffef5c]"
                class=("border-[#ffef5c]", move || !selected.with(Selection::is_empty))
                aria-haspopup="listbox"
                aria-expanded=move || open.get().to_string()
                on:click=move |_| set_open(!open.get_untracked())
            >
                <span class="whitespace-nowrap">{label}</span>
                <span class="ml-2 transition-transform" class=("rotate-180", move || open.get())>"\u{25be}"</span>
            </button>
            <Show when=move || open.get()>
                <fieldset class="flex absolute left-0 z-10 flex-col gap-1 p-2 mt-1 w-full rounded-lg border border-white/20 bg-[#1e1e1e] max-h-72 overflow-y-auto">
                    <legend class="sr-only">{title}</legend>
                    <For
                        each=move || options.get()
                        key=|option| option.id.clone()
                        let:option
                    >
                        {
                            let id = option.id.clone();
                            let checked = {
                                let id = id.clone();
                                move || selected.with(|selected| selected.contains(&id))
                            };
                            view! {
                                <label class="flex gap-2 items-center py-1 px-2 rounded cursor-pointer hover:bg-white/10">
                                    <input
                                        type="checkbox"
                                        class="accent-[#ffef5c]"
                                        prop:checked=checked
                                        on:change=move |_| on_change(selected.with_untracked(|selected| selected.toggled(&id)))
                                    />
                                    <span class="whitespace-nowrap">{option.label}</span>
                                </label>
                            }
                        }
                    </For>
                </fieldset>
            </Show>
        </div>
    }
}
