//! Spinner shown while a page's initial payload is loading.

use leptos::{
    html::{div, p},
    prelude::*,
};

pub fn component() -> impl IntoView {
    div()
        .class("flex flex-col gap-2 justify-center items-center py-24 m-auto")
        .child((
            div().class("rounded-full border-2 border-white animate-spin size-8 border-t-transparent"),
            p().class("text-sm italic text-muted-foreground").child("Loading..."),
        ))
}
