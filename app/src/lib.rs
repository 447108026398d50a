// Core application modules and components
use crate::components::{error_template, header, icons};
use chrono::{Datelike as _, Utc};
use leptos::{
    html::{a, body, div, footer, head, html, meta, p},
    prelude::*,
};
use leptos_meta::{MetaTags, Stylesheet, StylesheetProps, Title, TitleProps, provide_meta_context};
use leptos_router::{
    ParamSegment, SsrMode, StaticSegment,
    components::{FlatRoutes, Route, Router},
};

pub mod api;
mod blog;
mod components;
pub mod controller;
pub mod dispatch;
pub mod dropdown;
pub mod filter;
pub mod listing;
mod portfolio;
mod post;
mod project;
#[cfg(any(feature = "ssr", test))]
pub mod query;
pub mod scroll;
pub mod types;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    let html_comp = html().lang("en").child((
        head().child((
            meta().charset("utf-8"),
            meta()
                .name("viewport")
                .content("width=device-width, initial-scale=1"),
            HydrationScripts(HydrationScriptsProps::builder().options(options).build()),
            MetaTags(),
            Stylesheet(
                StylesheetProps::builder()
                    .id("leptos")
                    .href("/pkg/studio.css")
                    .build(),
            ),
            Title(
                TitleProps::builder()
                    .text("Lumen Studio \u{2013} Branding, Design & Writing")
                    .build(),
            ),
        )),
        body().class("bg-[#1e1e1e]").child(self::component),
    ));

    view! {
        <!DOCTYPE html>
        {html_comp}
    }
}

#[must_use]
pub fn component() -> impl IntoView {
    view! {
        <Router>
            <div class="overflow-auto text-white font-poppins">
                {header::component}
                <main class="container flex flex-col gap-8 px-4 pt-10 pb-24 mx-auto mt-20 max-w-6xl md:px-0">
                    <FlatRoutes fallback=|| error_template::single(error_template::AppError::NotFound)>
                        <Route path=StaticSegment("") view=blog::component ssr=SsrMode::InOrder/>
                        <Route path=StaticSegment("blog") view=blog::component ssr=SsrMode::InOrder/>
                        <Route path=(StaticSegment("blog"), ParamSegment("slug")) view=post::component ssr=SsrMode::Async/>
                        <Route path=StaticSegment("portfolio") view=portfolio::component ssr=SsrMode::InOrder/>
                        <Route path=(StaticSegment("portfolio"), ParamSegment("slug")) view=project::component ssr=SsrMode::Async/>
                    </FlatRoutes>
                </main>
                {footer_component()}
            </div>
        </Router>
    }
}

fn footer_component() -> impl IntoView {
    footer()
        .class("fixed right-0 bottom-0 left-0 z-10 py-2 text-center md:py-4 bg-[#1e1e1e]/80 backdrop-blur-md")
        .child(
            div().class("flex flex-col gap-1 justify-center items-center").child((
                p().class("text-gray-400").child((
                    a()
                        .href("/")
                        .class("hover:underline text-[#ffef5c]")
                        .child("Lumen Studio"),
                    format!(" \u{a9} {}", Utc::now().year()),
                )),
                div().class("block md:hidden").child(icons::component),
            )),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_creation() {
        let options = LeptosOptions::builder().output_name("studio").build();
        let shell_view = shell(options);
        drop(shell_view);
    }

    #[test]
    fn test_component_function_signatures() {
        let _shell_fn: fn(LeptosOptions) -> _ = shell;
        let _component_fn: fn() -> _ = component;

        let options = LeptosOptions::builder().output_name("studio").build();
        assert_eq!(options.output_name.as_ref(), "studio");
    }

    #[cfg(feature = "ssr")]
    #[test]
    fn test_server_function_signatures() {
        use crate::api::*;
        use crate::filter::QueryParams;

        let _blog_fn: fn(QueryParams) -> _ = blog_page;
        let _posts_fn: fn(QueryParams) -> _ = filter_posts;
        let _portfolio_fn: fn(QueryParams) -> _ = portfolio_page;
        let _projects_fn: fn(QueryParams) -> _ = filter_projects;
        let _post_fn: fn(String) -> _ = select_post;
        let _project_fn: fn(String) -> _ = select_project;
        let _views_fn: fn(String) -> _ = increment_views;
    }
}
