//! Single portfolio project page.

use leptos::html::{article, div, img, p};
use leptos::prelude::*;
use leptos_meta::{Title, TitleProps};
use leptos_router::hooks::use_params_map;

use crate::{
    api::select_project,
    components::{error_template, loader},
    filter::{PortfolioFilter, Selection},
    post::listing_link,
    types::Project,
};

fn chip_row(links: Vec<AnyView>) -> impl IntoView {
    div().class("flex flex-row flex-wrap gap-2").child(links)
}

pub fn component() -> impl IntoView {
    let params = use_params_map();
    let slug = move || params.with(|params| params.get("slug").unwrap_or_default());

    let project = Resource::new_blocking(|| (), move |()| async move { select_project(slug()).await });

    let children = move |project: Project| {
        let brandings = project
            .brandings
            .iter()
            .map(|branding| {
                let filter = PortfolioFilter {
                    brandings: Selection::split(branding),
                    ..PortfolioFilter::default()
                };
                listing_link("/portfolio", filter, branding.clone()).into_any()
            })
            .collect();
        let industries = project
            .industries
            .iter()
            .map(|industry| {
                let filter = PortfolioFilter {
                    industries: Selection::split(industry),
                    ..PortfolioFilter::default()
                };
                listing_link("/portfolio", filter, industry.clone()).into_any()
            })
            .collect();

        div().class("flex flex-col items-center").child((
            Title(TitleProps::builder().text(format!("{} \u{2013} Lumen Studio", project.title)).build()),
            project.image_url().map(|src| {
                img()
                    .alt(project.title.clone())
                    .class("object-cover self-center mb-6 w-full max-w-4xl rounded-lg aspect-video")
                    .src(src)
            }),
            article().class("w-full").child((
                div().class("flex flex-col gap-4 mx-auto max-w-3xl").child((
                    p().class("text-4xl font-semibold").child(project.title.clone()),
                    project
                        .client
                        .clone()
                        .map(|client| p().class("text-lg text-gray-400").child(format!("for {client}"))),
                    p().class("text-sm text-muted-foreground").child(project.created_at.clone()),
                    chip_row(brandings),
                    chip_row(industries),
                )),
                div().class("my-6 mx-auto max-w-3xl prose prose-invert prose-a:text-[#ffef5c]")
                    .inner_html(project.body.clone()),
            )),
        ))
    };

    Suspense(
        SuspenseProps::builder()
            .fallback(loader::component)
            .children(TypedChildren::to_children(move || {
                move || {
                    project.get().map(|result| match result {
                        Ok(project) => children(project).into_any(),
                        Err(_) => error_template::single(error_template::AppError::NotFound).into_any(),
                    })
                }
            }))
            .build(),
    )
}
