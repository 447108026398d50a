//! Reactive wiring shared by the blog and portfolio listings.
//!
//! A [`ListingController`] owns the filter signal, the displayed listing and
//! which dropdown is expanded. Every filter change re-arms the debounce timer;
//! resets, shortcuts and page requests go straight through
//! [`FilterDispatcher::dispatch`]. Responses are applied only while they are
//! the latest, after which the dropdowns collapse, the URL query follows the
//! applied filters through the router and the viewport is settled. Query
//! changes the controller did not write itself (links, back and forward) are
//! followed with a request for the filters they describe.

use core::future::Future;
use leptos::{logging, prelude::*};
use leptos_router::{
    NavigateOptions,
    hooks::{use_location, use_navigate, use_query_map},
    params::ParamsMap,
};

use crate::{
    dispatch::{Dispatch, FilterDispatcher, QUIET_PERIOD, Trigger},
    filter::{FilterSet, PAGE_KEY, QueryParams},
    listing::{Filtered, ListingPage},
    scroll::{self, SessionFlags},
};

pub struct ListingController<F, T>
where
    F: FilterSet,
    T: Send + Sync + 'static,
{
    pub filters: RwSignal<F>,
    pub listing: RwSignal<ListingPage<T>>,
    expanded: RwSignal<Option<&'static str>>,
    /// Query of the last applied response, as written to the URL.
    echo: RwSignal<QueryParams>,
    dispatcher: StoredValue<FilterDispatcher<F>>,
    request: Action<Dispatch, ()>,
    pending: Memo<bool>,
}

impl<F, T> Clone for ListingController<F, T>
where
    F: FilterSet,
    T: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<F, T> Copy for ListingController<F, T>
where
    F: FilterSet,
    T: Send + Sync + 'static,
{
}

impl<F, T> ListingController<F, T>
where
    F: FilterSet,
    T: Clone + Send + Sync + 'static,
{
    /// Sets up the listing from the initial payload. `fetch` is the filter
    /// endpoint of this listing.
    pub fn new<Fut>(initial: Filtered<T>, fetch: fn(QueryParams) -> Fut) -> Self
    where
        Fut: Future<Output = Result<Filtered<T>, ServerFnError>> + Send + 'static,
    {
        let applied = F::from_params(&initial.applied);
        let filters = RwSignal::new(applied.clone());
        let echo = RwSignal::new(initial.location_params());
        let listing = RwSignal::new(initial.listing);
        let expanded = RwSignal::new(None::<&'static str>);
        let dispatcher = StoredValue::new(FilterDispatcher::new(applied));

        let request = Action::new(move |dispatch: &Dispatch| {
            let Dispatch { seq, params, scroll } = dispatch.clone();
            async move {
                match fetch(params).await {
                    Ok(filtered) => {
                        let applied = F::from_params(&filtered.applied);
                        let latest = dispatcher
                            .try_update_value(|d| d.accept(seq, applied))
                            .unwrap_or(false);
                        if !latest {
                            logging::warn!("Dropping superseded listing response #{seq}");
                            return;
                        }
                        echo.set(filtered.location_params());
                        listing.set(filtered.listing);
                        expanded.set(None);
                        scroll::perform(scroll::after_dispatch(scroll, &SessionFlags));
                    }
                    Err(err) => {
                        dispatcher.update_value(|d| d.fail(seq));
                        scroll::after_failure(scroll, &SessionFlags);
                        logging::error!("Listing request #{seq} failed: {err}");
                    }
                }
            }
        });

        let controller = Self {
            filters,
            listing,
            expanded,
            echo,
            dispatcher,
            request,
            pending: request.pending(),
        };

        Effect::watch(
            move || filters.track(),
            move |_, _, _| {
                let Some(token) = dispatcher.try_update_value(FilterDispatcher::arm) else {
                    return;
                };
                set_timeout(move || controller.fire(Trigger::Settled(token)), QUIET_PERIOD);
            },
            false,
        );

        let navigate = use_navigate();
        let location = use_location();
        Effect::watch(
            move || echo.get(),
            move |params, _, _| {
                let path = location.pathname.get_untracked();
                navigate(
                    &format!("{path}{}", params.to_query_string()),
                    NavigateOptions {
                        replace: true,
                        scroll: false,
                        ..Default::default()
                    },
                );
            },
            false,
        );

        let query = use_query_map();
        Effect::watch(
            move || query.get(),
            move |query, _, _| {
                if let Some(params) = echo.with_untracked(|echoed| navigated_to::<F>(echoed, query)) {
                    controller.follow(&params);
                }
            },
            false,
        );

        // Effects only run in the browser, after hydration.
        Effect::new(move |_| scroll::perform(scroll::on_mount(&SessionFlags)));

        controller
    }

    fn fire(self, trigger: Trigger) {
        let current = self.filters.get_untracked();
        let offset = scroll::offset();
        let dispatch = self
            .dispatcher
            .try_update_value(|d| d.dispatch(trigger, &current, offset))
            .flatten();
        if let Some(dispatch) = dispatch {
            scroll::before_dispatch(dispatch.scroll, &SessionFlags);
            let _ = self.request.dispatch(dispatch);
        }
    }

    /// Applies a local edit to the filters; the request follows after the
    /// quiet period.
    pub fn edit(self, edit: impl FnOnce(&mut F)) {
        self.filters.update(edit);
    }

    /// Clears every filter and requests the unfiltered listing right away.
    pub fn reset(self) {
        self.filters.set(F::default());
        self.fire(Trigger::Reset);
    }

    /// Replaces the filters and brings the listing into view once it lands.
    pub fn jump_to(self, filters: F) {
        self.filters.set(filters);
        self.fire(Trigger::Jump);
    }

    /// Requests the listing a navigation outside the controller pointed at.
    fn follow(self, params: &QueryParams) {
        self.echo.update_untracked(|echo| *echo = params.clone());
        self.filters.set(F::from_params(params));
        self.fire(Trigger::Page(params.page().unwrap_or(1)));
    }

    pub fn go_to_page(self, page: usize) {
        self.fire(Trigger::Page(page));
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn pending(self) -> Memo<bool> {
        self.pending
    }

    /// Open state of the dropdown registered under `key`.
    #[must_use]
    pub fn is_expanded(self, key: &'static str) -> Signal<bool> {
        let expanded = self.expanded;
        Signal::derive(move || expanded.get() == Some(key))
    }

    /// Opens or closes the dropdown under `key`; at most one stays open.
    pub fn set_expanded(self, key: &'static str, open: bool) {
        self.expanded.update(|current| {
            if open {
                *current = Some(key);
            } else if *current == Some(key) {
                *current = None;
            }
        });
    }
}

/// Params of a listing route: the filter keys of `F` plus `page`, read from
/// the URL query.
#[must_use]
pub fn params_from_query<F: FilterSet>(query: &ParamsMap) -> QueryParams {
    let mut params = QueryParams::new();
    for key in F::KEYS.iter().copied().chain([PAGE_KEY]) {
        if let Some(value) = query.get(key) {
            params.insert(key, value);
        }
    }
    params
}

/// Params of `query` when they differ from what the controller last wrote to
/// the URL, meaning someone else navigated.
#[must_use]
pub fn navigated_to<F: FilterSet>(echoed: &QueryParams, query: &ParamsMap) -> Option<QueryParams> {
    let params = params_from_query::<F>(query);
    (params != *echoed).then_some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{BlogFilter, CATEGORY_KEY, PortfolioFilter};

    fn query(pairs: &[(&'static str, &str)]) -> ParamsMap {
        let mut map = ParamsMap::new();
        for (key, value) in pairs {
            map.insert(*key, (*value).to_owned());
        }
        map
    }

    #[test]
    fn own_url_updates_are_not_followed() {
        let echoed = QueryParams::from_iter([(CATEGORY_KEY, "tech,design"), (PAGE_KEY, "2")]);
        let url = query(&[("category", "tech,design"), ("page", "2")]);
        assert_eq!(navigated_to::<BlogFilter>(&echoed, &url), None);
    }

    #[test]
    fn a_bare_link_to_a_filtered_listing_is_followed() {
        let echoed = QueryParams::from_iter([(CATEGORY_KEY, "tech")]);
        assert_eq!(
            navigated_to::<BlogFilter>(&echoed, &query(&[])),
            Some(QueryParams::new())
        );
    }

    #[test]
    fn back_to_another_page_is_followed() {
        let echoed = QueryParams::from_iter([(PAGE_KEY, "3")]);
        let followed = navigated_to::<BlogFilter>(&echoed, &query(&[("page", "2")]));
        assert_eq!(followed.and_then(|params| params.page()), Some(2));
    }

    #[test]
    fn keys_of_the_other_listing_are_ignored() {
        let echoed = QueryParams::new();
        let url = query(&[("tag", "rust"), ("utm_source", "feed")]);
        assert_eq!(navigated_to::<PortfolioFilter>(&echoed, &url), None);
    }
}
