//! Grid cards for posts and projects.

use icondata::{BsCalendar, BsClock, BsEye, FiUser};
use leptos::{
    html::{div, img, p, span},
    prelude::*,
};
use leptos_router::components::{A, AProps};

use crate::{
    components::icons::icon,
    types::{Post, Project},
};

const CARD: &str = "flex overflow-hidden flex-col h-full text-left text-white rounded-lg transition-all duration-500 bg-card hover:text-[#ffef5c]";

fn cover(url: Option<String>, alt: String) -> impl IntoView {
    url.map(|src| {
        img()
            .src(src)
            .alt(alt)
            .attr("loading", "lazy")
            .class("object-cover w-full aspect-video")
    })
}

fn chips(labels: Vec<String>) -> impl IntoView {
    div().class("flex flex-row flex-wrap gap-1").child(
        labels
            .into_iter()
            .map(|label| span().class("py-0.5 px-2 rounded-full text-xxs bg-white/10").child(label))
            .collect::<Vec<_>>(),
    )
}

fn stat(glyph: icondata::Icon, text: String) -> impl IntoView {
    div().class("flex flex-row gap-1 items-center").child((icon(glyph, "size-4"), p().child(text)))
}

pub fn post(post: Post) -> impl IntoView {
    let href = format!("/blog/{}", post.slug.as_deref().unwrap_or_default());
    let image = post.image_url();
    A(AProps::builder()
        .href(href)
        .children(ToChildren::to_children(move || {
            div().class(CARD).child((
                cover(image.clone(), post.title.clone()),
                div().class("flex flex-col flex-1 gap-3 p-3").child((
                    chips(post.categories.clone()),
                    div().class("flex flex-col gap-1 font-medium").child((
                        p().class("text-base line-clamp-2").child(post.title.clone()),
                        p().class("italic text-xxs line-clamp-3").child(post.summary.clone()),
                    )),
                    div().class("flex flex-row flex-wrap gap-3 items-center mt-auto text-xxs").child((
                        stat(BsClock, format!("{} min read", post.read_time)),
                        stat(BsEye, format!("{} views", post.total_views)),
                        stat(BsCalendar, post.created_at.clone()),
                        stat(FiUser, post.author.name.clone()),
                    )),
                )),
            ))
        }))
        .build())
}

pub fn project(project: Project) -> impl IntoView {
    let href = format!("/portfolio/{}", project.slug.as_deref().unwrap_or_default());
    let image = project.image_url();
    A(AProps::builder()
        .href(href)
        .children(ToChildren::to_children(move || {
            div().class(CARD).child((
                cover(image.clone(), project.title.clone()),
                div().class("flex flex-col flex-1 gap-3 p-3").child((
                    div().class("flex flex-col gap-1 font-medium").child((
                        p().class("text-base line-clamp-2").child(project.title.clone()),
                        project
                            .client
                            .clone()
                            .map(|client| p().class("text-xs text-gray-400").child(client)),
                        p().class("italic text-xxs line-clamp-3").child(project.summary.clone()),
                    )),
                    div().class("flex flex-col gap-1 mt-auto").child((
                        chips(project.brandings.clone()),
                        chips(project.industries.clone()),
                    )),
                )),
            ))
        }))
        .build())
}
