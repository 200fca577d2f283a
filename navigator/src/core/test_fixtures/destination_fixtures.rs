// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc,
                atomic::{AtomicBool, Ordering}};

use crate::{Destination, DestinationId, GuardDecision, GuardFn, Layout, NavigatorResult,
            RedirectFn, RedirectOutcome};

pub const TABS_LAYOUT: &str = "tabs";
pub const SEARCH_LAYOUT: &str = "search";
pub const SETTINGS_LAYOUT: &str = "settings";

pub fn home() -> Destination { Destination::builder("home").external_link("app://home").build() }

pub fn detail(id: &str) -> Destination {
    Destination::builder(DestinationId::new("detail").with_arg("id", id))
        .external_link(format!("app://detail/{id}"))
        .build()
}

pub fn login(intended: &str) -> Destination {
    Destination::new(DestinationId::new("login").with_arg("intended", intended))
}

/// Redirects to [`login`] while `logged_in` is `false`.
pub fn profile(logged_in: Arc<AtomicBool>) -> Destination {
    Destination::builder("profile")
        .redirect(RedirectFn::new(move |_ctx, _candidate| {
            if logged_in.load(Ordering::SeqCst) {
                RedirectOutcome::Stable
            } else {
                RedirectOutcome::Redirect(login("profile"))
            }
        }))
        .build()
}

/// Its guard denies removal while `unsaved` is `true`.
pub fn editor(unsaved: Arc<AtomicBool>) -> Destination {
    Destination::builder("editor")
        .guard(GuardFn::new(move |_| {
            (!unsaved.load(Ordering::SeqCst)).into()
        }))
        .build()
}

/// Guard always denies.
pub fn locked(name: &str) -> Destination {
    Destination::builder(name)
        .guard(GuardFn::new(|_| GuardDecision::Deny))
        .build()
}

pub fn tab(name: &str) -> Destination { Destination::builder(name).parent(TABS_LAYOUT).build() }

/// Tabs: `feed`, `search` (itself a layout), `profile_tab`.
pub fn tabs_layout() -> NavigatorResult<Layout> {
    Ok(Layout::with_fixed_child(
        Destination::builder(TABS_LAYOUT).layout(TABS_LAYOUT).build(),
        vec![tab("feed"), search_shell(), tab("profile_tab")],
    ))
}

/// The `search` tab, which owns a mutable child path.
pub fn search_shell() -> Destination {
    Destination::builder(SEARCH_LAYOUT)
        .parent(TABS_LAYOUT)
        .layout(SEARCH_LAYOUT)
        .build()
}

pub fn search_layout() -> NavigatorResult<Layout> {
    Ok(Layout::with_mutable_child(search_shell()))
}

/// Lives in the child path of the `search` tab.
pub fn search_result(id: &str) -> Destination {
    Destination::builder(DestinationId::new("result").with_arg("id", id))
        .parent(SEARCH_LAYOUT)
        .external_link(format!("app://search/{id}"))
        .build()
}

/// Settings sit on the root path and own a mutable child path.
pub fn settings_layout() -> NavigatorResult<Layout> {
    Ok(Layout::with_mutable_child(
        Destination::builder(SETTINGS_LAYOUT)
            .layout(SETTINGS_LAYOUT)
            .build(),
    ))
}

pub fn settings_page(name: &str) -> Destination {
    Destination::builder(name).parent(SETTINGS_LAYOUT).build()
}
