//! Error page rendered for unknown routes and for content that failed to load.
//!
//! On the server the first error also decides the HTTP status of the response.

use http::status::StatusCode;
use leptos::{
    html::{div, h1, p},
    prelude::*,
};
use leptos_router::components::{A, AProps};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,
    #[error("Content unavailable")]
    Unavailable,
}

impl AppError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Where the "go back" link of the error page leads.
    pub const fn back_link(&self) -> (&'static str, &'static str) {
        match self {
            Self::NotFound => ("/", "Go back home"),
            Self::Unavailable => ("/blog", "Back to the blog"),
        }
    }
}

/// Renders every [`AppError`] found in `errors`.
pub fn component(errors: Errors) -> impl IntoView {
    let errors: Vec<AppError> = errors
        .into_iter()
        .filter_map(|(_k, v)| v.downcast_ref::<AppError>().cloned())
        .collect();

    #[cfg(feature = "ssr")]
    {
        use leptos_axum::ResponseOptions;
        if let (Some(response), Some(first)) = (use_context::<ResponseOptions>(), errors.first()) {
            response.set_status(first.status_code());
        }
    }

    div().class("grid place-content-center px-4 h-full antialiased").child((
        h1().class("mb-6 text-center").child(if errors.len() > 1 { "Errors" } else { "Error" }),
        For(
            ForProps::builder()
                .each(move || errors.clone().into_iter().enumerate())
                .key(|(index, _error)| *index)
                .children(|(_, error)| {
                    let (href, label) = error.back_link();
                    div().class("flex flex-col gap-1 justify-center items-center").child((
                        p().class("text-xl tracking-widest text-gray-400 uppercase")
                            .child(format!("{}| {error}", error.status_code())),
                        div().class("mt-6 text-center duration-200 hover:text-[#ffef5c]").child(
                            A(AProps::builder()
                                .href(href)
                                .children(ToChildren::to_children(move || label))
                                .build()),
                        ),
                    ))
                })
                .build(),
        ),
    ))
}

/// Shorthand for rendering a single error.
pub fn single(error: AppError) -> impl IntoView {
    let mut errors = Errors::default();
    errors.insert_with_default_key(error);
    component(errors)
}
