//! The portfolio listing: search, branding and industry filters and a
//! paginated grid of projects.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::use_query_map;

use crate::{
    api::{filter_projects, portfolio_page},
    components::{cards, error_template, loader, multi_select, pagination},
    controller::{ListingController, params_from_query},
    filter::{BRANDING_KEY, FilterSet, INDUSTRY_KEY, PortfolioFilter},
    scroll::LISTING_SECTION_ID,
    types::{PortfolioPayload, Project},
};

const DROPDOWN_MIN_WIDTH: f64 = 180.0;

pub fn component() -> impl IntoView {
    let query = use_query_map();
    let payload = Resource::new_blocking(
        || (),
        move |()| async move {
            let params = query.with_untracked(params_from_query::<PortfolioFilter>);
            portfolio_page(params).await
        },
    );

    view! {
        <Title text="Portfolio \u{2013} Lumen Studio"/>
        <Suspense fallback=loader::component>
            {move || {
                payload
                    .get()
                    .map(|result| match result {
                        Ok(payload) => listing(payload).into_any(),
                        Err(err) => {
                            leptos::logging::error!("Failed to load the portfolio: {err}");
                            error_template::single(error_template::AppError::Unavailable).into_any()
                        }
                    })
            }}
        </Suspense>
    }
}

fn listing(payload: PortfolioPayload) -> impl IntoView {
    let PortfolioPayload {
        brandings,
        industries,
        projects,
    } = payload;
    let controller = ListingController::<PortfolioFilter, Project>::new(projects, filter_projects);
    let filters = controller.filters;

    view! {
        <div class="flex flex-col gap-10">
            <div class="flex flex-col gap-3">
                <h1 class="text-4xl font-semibold">"Selected work"</h1>
                <p class="text-gray-400">"Identities, packaging and campaigns we have shipped."</p>
            </div>
            <section id=LISTING_SECTION_ID class="flex flex-col gap-6 scroll-mt-28">
                <div class="flex flex-row flex-wrap gap-3 items-start">
                    <input
                        type="search"
                        placeholder="Search projects"
                        aria-label="Search projects"
                        class="py-2 px-3 text-sm rounded-lg border grow border-white/20 bg-card min-w-48 focus:border-[#ffef5c] focus:outline-none"
                        prop:value=move || filters.with(|f| f.search.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            controller.edit(|f| f.search = value);
                        }
                    />
                    {multi_select::component(
                        "Branding",
                        Signal::stored(brandings),
                        Signal::derive(move || filters.with(|f| f.brandings.clone())),
                        move |selection| controller.edit(|f| f.brandings = selection),
                        controller.is_expanded(BRANDING_KEY),
                        move |open| controller.set_expanded(BRANDING_KEY, open),
                        DROPDOWN_MIN_WIDTH,
                    )}
                    {multi_select::component(
                        "Industry",
                        Signal::stored(industries),
                        Signal::derive(move || filters.with(|f| f.industries.clone())),
                        move |selection| controller.edit(|f| f.industries = selection),
                        controller.is_expanded(INDUSTRY_KEY),
                        move |open| controller.set_expanded(INDUSTRY_KEY, open),
                        DROPDOWN_MIN_WIDTH,
                    )}
                    <button
                        type="button"
                        class="py-2 px-3 text-sm rounded-lg transition-all duration-500 cursor-pointer hover:text-black hover:bg-white"
                        class=("opacity-50", move || filters.with(FilterSet::is_blank))
                        on:click=move |_| controller.reset()
                    >
                        "Reset"
                    </button>
                </div>
                <Show
                    when=move || controller.listing.with(|l| !l.items.is_empty())
                    fallback=|| view! { <p class="py-12 text-center text-gray-400">"No projects match these filters."</p> }
                >
                    <div class="grid grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-3" class=("opacity-60", move || controller.pending().get())>
                        <For
                            each=move || controller.listing.with(|l| l.items.clone())
                            key=|project| format!("{:?}", project.id)
                            children=cards::project
                        />
                    </div>
                </Show>
                {pagination::component(
                    Signal::derive(move || controller.listing.with(|l| l.meta)),
                    controller.pending().into(),
                    move |page| controller.go_to_page(page),
                )}
            </section>
        </div>
    }
}
