use icondata::{BsGithub, BsInstagram, BsLinkedin, BsRss, Icon};
use leptos::{
    html::{a, div},
    prelude::*,
    svg::svg,
};

/// Inline SVG for an icondata icon, tinted white.
pub fn icon(icon: Icon, class: &'static str) -> impl IntoView {
    svg()
        .attr("viewBox", icon.view_box)
        .attr("innerHTML", icon.data)
        .attr("fill", "currentColor")
        .attr("aria-hidden", "true")
        .class(class)
}

fn social(href: &'static str, label: &'static str, glyph: Icon) -> impl IntoView {
    a().href(href)
        .rel("noopener noreferrer")
        .target("_blank")
        .aria_label(label)
        .class("transition-all text-white duration-500 size-6 hover:text-[#ffef5c]")
        .child(icon(glyph, "size-6"))
}

pub fn component() -> impl IntoView {
    div().class("flex flex-row gap-3 items-center h-10").child((
        social("https://github.com/lumen-studio", "GitHub", BsGithub),
        social("https://www.instagram.com/lumen.studio", "Instagram", BsInstagram),
        social("https://www.linkedin.com/company/lumen-studio", "LinkedIn", BsLinkedin),
        social("/rss.xml", "RSS", BsRss),
    ))
}
