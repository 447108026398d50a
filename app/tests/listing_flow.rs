//! A visitor's session on the blog listing, driven through the public
//! listing state types without a browser.

use app::dispatch::{FilterDispatcher, ScrollIntent, Trigger};
use app::dropdown::{DropdownOption, WIDTH_PADDING, display_title, fitted_width, texts_to_measure};
use app::filter::{BlogFilter, CATEGORY_KEY, FilterSet, PAGE_KEY, QueryParams, SEARCH_KEY, TAG_KEY};
use app::listing::{Filtered, ListingPage, PageLink, PageMeta};
use app::scroll::{self, FlagStore, JUMP_FLAG, MemoryFlags, ScrollAction};

fn categories() -> Vec<DropdownOption> {
    vec![
        DropdownOption::new("tech", "Technology"),
        DropdownOption::new("design", "Design"),
    ]
}

#[test]
fn typing_then_filtering_keeps_only_the_latest_response() {
    let mut dispatcher = FilterDispatcher::new(BlogFilter::default());
    let mut filter = BlogFilter::default();

    filter.search = "ker".to_owned();
    let early = dispatcher.arm();
    filter.search = "kerning".to_owned();
    let settled = dispatcher.arm();

    assert_eq!(dispatcher.dispatch(Trigger::Settled(early), &filter, 0.0), None);
    let first = dispatcher
        .dispatch(Trigger::Settled(settled), &filter, 320.0)
        .expect("search change dispatches");
    assert_eq!(first.params.get(SEARCH_KEY), Some("kerning"));
    assert_eq!(first.scroll, ScrollIntent::Restore(320.0));

    filter.categories = filter.categories.toggled("design");
    let token = dispatcher.arm();
    let second = dispatcher
        .dispatch(Trigger::Settled(token), &filter, 320.0)
        .expect("category change dispatches");
    assert_eq!(second.params.get(CATEGORY_KEY), Some("design"));
    assert!(second.seq > first.seq);

    assert!(dispatcher.accept(second.seq, filter.clone()));
    assert!(!dispatcher.accept(first.seq, BlogFilter::default()));
    assert_eq!(dispatcher.applied(), &filter);

    // Nothing changed since the accepted response.
    let token = dispatcher.arm();
    assert_eq!(dispatcher.dispatch(Trigger::Settled(token), &filter, 0.0), None);
}

#[test]
fn paging_keeps_filters_and_reset_jumps_to_the_listing() {
    let filter = BlogFilter::from_params(&QueryParams::from_iter([(TAG_KEY, "rust,wasm")]));
    let mut dispatcher = FilterDispatcher::new(filter.clone());
    let flags = MemoryFlags::default();

    let page = dispatcher
        .dispatch(Trigger::Page(3), &filter, 900.0)
        .expect("page request dispatches");
    assert_eq!(page.params.get(TAG_KEY), Some("rust,wasm"));
    assert_eq!(page.params.page(), Some(3));
    scroll::before_dispatch(page.scroll, &flags);
    assert_eq!(
        scroll::after_dispatch(page.scroll, &flags),
        ScrollAction::RestoreTo(900.0)
    );

    let reset = dispatcher
        .dispatch(Trigger::Reset, &filter, 900.0)
        .expect("reset dispatches");
    assert!(reset.params.is_empty());
    scroll::before_dispatch(reset.scroll, &flags);
    assert_eq!(
        scroll::after_dispatch(reset.scroll, &flags),
        ScrollAction::JumpToListing
    );
    assert!(!flags.take(JUMP_FLAG));
}

#[test]
fn failed_reset_leaves_the_next_change_at_its_offset() {
    let mut dispatcher = FilterDispatcher::new(BlogFilter::default());
    let flags = MemoryFlags::default();

    let reset = dispatcher
        .dispatch(Trigger::Reset, &BlogFilter::default(), 0.0)
        .expect("reset dispatches");
    scroll::before_dispatch(reset.scroll, &flags);
    dispatcher.fail(reset.seq);
    scroll::after_failure(reset.scroll, &flags);

    let typed = BlogFilter {
        search: "grid".to_owned(),
        ..Default::default()
    };
    let token = dispatcher.arm();
    let routine = dispatcher
        .dispatch(Trigger::Settled(token), &typed, 420.0)
        .expect("search change dispatches");
    scroll::before_dispatch(routine.scroll, &flags);
    assert_eq!(
        scroll::after_dispatch(routine.scroll, &flags),
        ScrollAction::RestoreTo(420.0)
    );
}

#[test]
fn shortcut_from_another_page_jumps_once_on_mount() {
    let flags = MemoryFlags::default();
    flags.raise(JUMP_FLAG);

    assert_eq!(scroll::on_mount(&flags), ScrollAction::JumpToListing);
    assert_eq!(scroll::on_mount(&flags), ScrollAction::Stay);
}

#[test]
fn filtered_response_reproduces_its_location() {
    let applied = BlogFilter {
        search: "grid".to_owned(),
        tags: ["layout"].into_iter().collect(),
        ..Default::default()
    }
    .to_params();
    let filtered: Filtered<String> = Filtered {
        listing: ListingPage {
            items: vec!["Grids".to_owned()],
            meta: PageMeta::new(2, 9, 30),
        },
        applied,
    };

    let location = filtered.location_params();
    assert_eq!(location.get(PAGE_KEY), Some("2"));
    assert_eq!(location.to_query_string(), "?page=2&search=grid&tag=layout");
    assert_eq!(
        filtered.listing.meta.window(),
        vec![PageLink::Page(1), PageLink::Page(2), PageLink::Page(3), PageLink::Page(4)]
    );
}

#[test]
fn dropdown_title_and_width_follow_the_selection() {
    let options = categories();
    let none = Default::default();
    let one = ["design"].into_iter().collect();
    let both = ["design", "tech"].into_iter().collect();

    assert_eq!(display_title("Categories", &options, &none), "Categories");
    assert_eq!(display_title("Categories", &options, &one), "Categories: Design");
    assert_eq!(display_title("Categories", &options, &both), "Categories: 2 selected");

    let texts = texts_to_measure("Categories", &options, &one);
    assert!(texts.contains(&"Categories: Technology".to_owned()));

    // Pretend every character is 8px wide.
    let widths = texts.iter().map(|text| text.chars().count() as f64 * 8.0);
    let widest = "Categories: Technology".chars().count() as f64 * 8.0;
    assert_eq!(fitted_width(120.0, widths), widest + WIDTH_PADDING);
}
