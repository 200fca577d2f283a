// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Errors raised by the navigation core. See [`NavError`] for details.

/// Result type for every fallible public operation in this crate.
///
/// Errors returned by user supplied hooks ([`crate::Redirect`], [`crate::Guard`],
/// [`crate::DeepLinkParser`], [`crate::DeepLinkHandler`]) are also [`miette::Report`]s,
/// and they reach the caller of the public operation untouched. To inspect an error
/// raised by the core itself, use [`miette::Report::downcast_ref`] with [`NavError`].
pub type NavigatorResult<T> = miette::Result<T>;

/// Errors raised by the core.
///
/// Guard vetoes and redirect aborts are **not** errors. They are normal outcomes that
/// show up in the typed result of each operation (eg: [`crate::PopOutcome::Vetoed`],
/// [`crate::EnterOutcome::Aborted`]).
///
/// | Family        | Variants                                                                      |
/// | :------------ | :---------------------------------------------------------------------------- |
/// | Configuration | [`MissingLayoutConstructor`], [`LayoutKeyMismatch`], [`LayoutCycle`], [`UnknownPath`], [`MissingDeepLinkParser`] |
/// | Structural    | [`RouteNotInStack`], [`IndexOutOfRange`], [`FixedPathMutation`], [`DestinationSettled`], [`DestinationAlreadyBound`] |
/// | Termination   | [`RedirectCycle`]                                                             |
///
/// [`MissingLayoutConstructor`]: Self::MissingLayoutConstructor
/// [`LayoutKeyMismatch`]: Self::LayoutKeyMismatch
/// [`LayoutCycle`]: Self::LayoutCycle
/// [`UnknownPath`]: Self::UnknownPath
/// [`RouteNotInStack`]: Self::RouteNotInStack
/// [`IndexOutOfRange`]: Self::IndexOutOfRange
/// [`FixedPathMutation`]: Self::FixedPathMutation
/// [`DestinationSettled`]: Self::DestinationSettled
/// [`DestinationAlreadyBound`]: Self::DestinationAlreadyBound
/// [`RedirectCycle`]: Self::RedirectCycle
/// [`MissingDeepLinkParser`]: Self::MissingDeepLinkParser
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum NavError {
    #[error("No layout constructor registered for key '{key}'")]
    #[diagnostic(
        code(r3bl_navigator::layout::missing_constructor),
        help(
            "Call `register_layout_constructor()` for this key before navigating to \
             any destination whose parent is '{key}'."
        )
    )]
    MissingLayoutConstructor { key: String },

    #[error("Layout constructor for '{registered}' built a layout for '{built}'")]
    #[diagnostic(
        code(r3bl_navigator::layout::key_mismatch),
        help("The destination returned by a layout constructor must be a layout for its own key.")
    )]
    LayoutKeyMismatch { registered: String, built: String },

    #[error("Layout parent chain revisits '{key}'")]
    #[diagnostic(code(r3bl_navigator::layout::cycle))]
    LayoutCycle { key: String },

    #[error("Path {path_id} is not registered with this coordinator")]
    #[diagnostic(code(r3bl_navigator::path::unknown))]
    UnknownPath { path_id: usize },

    #[error("'{destination}' is not a member of path '{path}'")]
    #[diagnostic(
        code(r3bl_navigator::path::route_not_in_stack),
        help("Fixed paths never change membership. Check membership before activating.")
    )]
    RouteNotInStack { destination: String, path: String },

    #[error("Index {index} is out of range for path '{path}' (len {len})")]
    #[diagnostic(code(r3bl_navigator::path::index_out_of_range))]
    IndexOutOfRange { index: usize, len: usize, path: String },

    #[error("Path '{path}' is fixed and its membership can't change")]
    #[diagnostic(
        code(r3bl_navigator::path::fixed_path_mutation),
        help("Use `activate_route()` or `activate_index()` on fixed paths.")
    )]
    FixedPathMutation { path: String },

    #[error("'{destination}' was already settled and can't be reused")]
    #[diagnostic(
        code(r3bl_navigator::destination::settled),
        help("Create a fresh destination. Equal destinations compare equal by id.")
    )]
    DestinationSettled { destination: String },

    #[error("'{destination}' is already bound to a path")]
    #[diagnostic(code(r3bl_navigator::destination::already_bound))]
    DestinationAlreadyBound { destination: String },

    #[error("Redirect chain exceeded {depth} substitutions, last candidate '{last}'")]
    #[diagnostic(
        code(r3bl_navigator::redirect::cycle),
        help(
            "Two or more redirect rules substitute each other. Make one of them \
             return `Stable` for the other's destination."
        )
    )]
    RedirectCycle { depth: usize, last: String },

    #[error("No deep link parser is installed")]
    #[diagnostic(
        code(r3bl_navigator::deep_link::missing_parser),
        help("Call `deep_link_parser()` on the `CoordinatorBuilder` before calling `recover()`.")
    )]
    MissingDeepLinkParser,
}
