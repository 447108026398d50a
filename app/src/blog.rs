//! The blog listing: search, category/tag/author filters, a per-category
//! shortcut strip and a paginated grid of posts.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::use_query_map;

use crate::{
    api::{blog_page, filter_posts},
    components::{cards, error_template, loader, multi_select, pagination},
    controller::{ListingController, params_from_query},
    dropdown::DropdownOption,
    filter::{BlogFilter, CATEGORY_KEY, FilterSet, Selection, TAG_KEY},
    scroll::LISTING_SECTION_ID,
    types::{BlogPayload, Post},
};

const DROPDOWN_MIN_WIDTH: f64 = 160.0;

pub fn component() -> impl IntoView {
    let query = use_query_map();
    let payload = Resource::new_blocking(
        || (),
        move |()| async move {
            let params = query.with_untracked(params_from_query::<BlogFilter>);
            blog_page(params).await
        },
    );

    view! {
        <Title text="Blog \u{2013} Lumen Studio"/>
        <Suspense fallback=loader::component>
            {move || {
                payload
                    .get()
                    .map(|result| match result {
                        Ok(payload) => listing(payload).into_any(),
                        Err(err) => {
                            leptos::logging::error!("Failed to load the blog: {err}");
                            error_template::single(error_template::AppError::Unavailable).into_any()
                        }
                    })
            }}
        </Suspense>
    }
}

fn listing(payload: BlogPayload) -> impl IntoView {
    let BlogPayload {
        categories,
        tags,
        authors,
        posts,
    } = payload;
    let controller = ListingController::<BlogFilter, Post>::new(posts, filter_posts);
    let filters = controller.filters;

    let shortcuts = categories.clone();
    let categories = Signal::stored(categories);
    let tags = Signal::stored(tags);

    view! {
        <div class="flex flex-col gap-10">
            <div class="flex flex-col gap-3">
                <h1 class="text-4xl font-semibold">"Journal"</h1>
                <p class="text-gray-400">"Notes on branding, design and the craft behind our work."</p>
            </div>
            {shortcut_strip(shortcuts, controller)}
            <section id=LISTING_SECTION_ID class="flex flex-col gap-6 scroll-mt-28">
                <div class="flex flex-row flex-wrap gap-3 items-start">
                    <input
                        type="search"
                        placeholder="Search posts"
                        aria-label="Search posts"
                        class="py-2 px-3 text-sm rounded-lg border grow border-white/20 bg-card min-w-48 focus:border-[#ffef5c] focus:outline-none"
                        prop:value=move || filters.with(|f| f.search.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            controller.edit(|f| f.search = value);
                        }
                    />
                    {multi_select::component(
                        "Categories",
                        categories,
                        Signal::derive(move || filters.with(|f| f.categories.clone())),
                        move |selection| controller.edit(|f| f.categories = selection),
                        controller.is_expanded(CATEGORY_KEY),
                        move |open| controller.set_expanded(CATEGORY_KEY, open),
                        DROPDOWN_MIN_WIDTH,
                    )}
                    {multi_select::component(
                        "Tags",
                        tags,
                        Signal::derive(move || filters.with(|f| f.tags.clone())),
                        move |selection| controller.edit(|f| f.tags = selection),
                        controller.is_expanded(TAG_KEY),
                        move |open| controller.set_expanded(TAG_KEY, open),
                        DROPDOWN_MIN_WIDTH,
                    )}
                    {author_select(authors, controller)}
                    <button
                        type="button"
                        class="py-2 px-3 text-sm rounded-lg transition-all duration-500 cursor-pointer hover:text-black hover:bg-white"
                        class=("opacity-50", move || filters.with(FilterSet::is_blank))
                        on:click=move |_| controller.reset()
                    >
                        "Reset"
                    </button>
                </div>
                <p class="text-xs text-gray-400" class=("animate-pulse", move || controller.pending().get())>
                    {move || {
                        let total = controller.listing.with(|l| l.meta.total);
                        if total == 1 { "1 post".to_owned() } else { format!("{total} posts") }
                    }}
                </p>
                <Show
                    when=move || controller.listing.with(|l| !l.items.is_empty())
                    fallback=|| view! { <p class="py-12 text-center text-gray-400">"No posts match these filters."</p> }
                >
                    <div class="grid grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-3">
                        <For
                            each=move || controller.listing.with(|l| l.items.clone())
                            key=|post| format!("{:?}", post.id)
                            children=cards::post
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

/// One "View more" button per category, each replacing the filters with just
/// that category.
fn shortcut_strip(
    categories: Vec<DropdownOption>,
    controller: ListingController<BlogFilter, Post>,
) -> impl IntoView {
    (!categories.is_empty()).then(|| {
        view! {
            <nav aria-label="Categories" class="flex flex-row flex-wrap gap-2 text-sm">
                {categories
                    .into_iter()
                    .map(|category| {
                        let DropdownOption { id, label } = category;
                        view! {
                            <button
                                type="button"
                                class="py-2 px-4 rounded-lg transition-all duration-500 cursor-pointer bg-card hover:text-black hover:bg-white"
                                on:click=move |_| {
                                    controller.jump_to(BlogFilter {
                                        categories: Selection::split(&id),
                                        ..BlogFilter::default()
                                    });
                                }
                            >
                                {format!("View more {label}")}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
        }
    })
}

fn author_select(
    authors: Vec<DropdownOption>,
    controller: ListingController<BlogFilter, Post>,
) -> impl IntoView {
    let filters = controller.filters;
    view! {
        <select
            aria-label="Author"
            class="py-2 px-3 text-sm rounded-lg border border-white/20 bg-card focus:border-[#ffef5c] focus:outline-none"
            prop:value=move || filters.with(|f| f.author.clone())
            on:change=move |ev| {
                let value = event_target_value(&ev);
                controller.edit(|f| f.author = value);
            }
        >
            <option value="">"All authors"</option>
            {authors
                .into_iter()
                .map(|author| view! { <option value=author.id>{author.label}</option> })
                .collect_view()}
        </select>
    }
}
