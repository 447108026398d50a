//! Single post page.
//!
//! Fetches the post for the URL slug, counts the view in release builds and
//! links each category back to the filtered blog listing.

use leptos::html::{a, article, div, img, p, span};
use leptos::{ev, prelude::*};
use leptos_meta::{Title, TitleProps};
use leptos_router::hooks::use_params_map;

use crate::{
    api::{increment_views, select_post},
    components::{error_template, loader},
    filter::{BlogFilter, FilterSet, Selection},
    scroll::{FlagStore, JUMP_FLAG, SessionFlags},
    types::Post,
};

/// Link to the listing at `base` filtered by `filter`, raising the jump flag
/// so the listing scrolls itself into view once it mounts.
pub fn listing_link<F: FilterSet>(base: &'static str, filter: F, label: String) -> impl IntoView {
    let href = format!("{base}{}", filter.to_params().to_query_string());
    a().href(href)
        .on(ev::click, |_| SessionFlags.raise(JUMP_FLAG))
        .class("py-1 px-3 text-xs rounded-full transition-all duration-500 bg-white/10 hover:text-black hover:bg-white")
        .child(label)
}

pub fn component() -> impl IntoView {
    let params = use_params_map();
    let slug = move || params.with(|params| params.get("slug").unwrap_or_default());

    let post = Resource::new_blocking(|| (), move |()| async move { select_post(slug()).await });

    let increment_view = Action::new(move |slug: &String| {
        let slug = slug.clone();
        async move {
            let _ = increment_views(slug).await;
        }
    });

    Effect::new(move |_| {
        if cfg!(not(debug_assertions))
            && let Some(Ok(post)) = post.get()
            && let Some(slug) = post.slug
        {
            let _ = increment_view.dispatch(slug);
        }
    });

    let children = move |post: Post| {
        let image = post.image_url();
        let github = post.author.github.clone();
        div().class("flex flex-col items-center").child((
            Title(TitleProps::builder().text(format!("{} \u{2013} Lumen Studio", post.title)).build()),
            image.map(|src| {
                img()
                    .alt(post.title.clone())
                    .class("object-cover self-center mb-6 w-full max-w-3xl rounded-lg aspect-video")
                    .src(src)
            }),
            article().class("w-full").child((
                div().class("flex flex-col gap-4 mx-auto max-w-3xl").child((
                    div().class("flex flex-row flex-wrap gap-2").child(
                        post.categories
                            .iter()
                            .map(|category| {
                                let filter = BlogFilter {
                                    categories: Selection::split(category),
                                    ..BlogFilter::default()
                                };
                                listing_link("/blog", filter, category.clone())
                            })
                            .collect::<Vec<_>>(),
                    ),
                    p().class("text-4xl font-semibold").child(post.title.clone()),
                    div().class("flex flex-wrap gap-3 justify-start items-center text-sm text-muted-foreground").child((
                        p().on(ev::click, move |e| {
                            e.stop_propagation();
                            if let Some(github) = &github {
                                let _ = window().open_with_url_and_target(github, "_blank");
                            }
                        })
                        .class("cursor-pointer hover:underline")
                        .child(("by ", span().class("ml-1 font-semibold").child(post.author.name.clone()))),
                        p().child(post.created_at.clone()),
                        p().child(format!("{} min read", post.read_time)),
                        p().child(format!("{} views", post.total_views)),
                    )),
                )),
                div().class("my-6 mx-auto max-w-3xl prose prose-invert prose-code:before:content-none prose-code:after:content-none prose-pre:bg-transparent prose-pre:rounded-lg prose-pre:p-0 prose-code:text-[#ffef5c] prose-a:text-[#ffef5c]")
                    .inner_html(post.body.clone()),
                div().class("flex flex-row flex-wrap gap-2 mx-auto max-w-3xl").child(
                    post.tags
                        .iter()
                        .map(|tag| span().class("text-xs text-gray-400").child(format!("#{tag}")))
                        .collect::<Vec<_>>(),
                ),
            )),
        ))
    };

    Suspense(
        SuspenseProps::builder()
            .fallback(loader::component)
            .children(TypedChildren::to_children(move || {
                move || {
                    post.get().map(|result| match result {
                        Ok(post) => children(post).into_any(),
                        Err(_) => error_template::single(error_template::AppError::NotFound).into_any(),
                    })
                }
            }))
            .build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PortfolioFilter;

    fn category_chip(category: &str) -> impl IntoView + use<> {
        let filter = BlogFilter {
            categories: Selection::split(category),
            ..BlogFilter::default()
        };
        listing_link("/blog", filter, category.to_owned())
    }

    #[test]
    fn test_chips_outlive_their_filter() {
        let chips = vec![
            category_chip("design").into_any(),
            listing_link(
                "/portfolio",
                PortfolioFilter {
                    industries: Selection::split("retail"),
                    ..PortfolioFilter::default()
                },
                "retail".to_owned(),
            )
            .into_any(),
        ];
        assert_eq!(chips.len(), 2);
    }
}
