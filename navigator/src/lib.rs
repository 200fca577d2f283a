// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_navigator
//!
//! Async navigation coordinator for tree-structured user interfaces. Given a requested
//! destination, it decides what the visible stack of screens should become, runs the
//! interception rules (redirects and guards) and reconciles declaratively supplied
//! destination lists against a live stack with minimal disruption.
//!
//! # Table of contents
//!
//! - [Mental model](#mental-model)
//! - [Life of a navigation operation](#life-of-a-navigation-operation)
//! - [Operations](#operations)
//! - [Layouts](#layouts)
//! - [Declared stacks and the diff engine](#declared-stacks-and-the-diff-engine)
//! - [Concurrency](#concurrency)
//! - [Logging](#logging)
//!
//! # Mental model
//!
//! ```text
//! Coordinator
//!  └── PathArena (owns every Path)
//!       └── root Path (Mutable)            [Home, Tabs*]
//!                                                  │ is-a-layout
//!            └── child Path (Fixed)        [Feed, Search*, Profile]
//!                                                  │ is-a-layout
//!                 └── child Path (Mutable) [SearchHome, Result('42')*]
//! ```
//!
//! - A [`Destination`] is a cheap to clone handle to an identity-bearing record. Equality
//!   is by [`DestinationId`], instance identity is by
//!   [`same_instance()`](Destination::same_instance).
//! - A [`Path`] is either [`PathKind::Mutable`] (a stack) or [`PathKind::Fixed`] (constant
//!   membership, switchable active index, eg: tabs).
//! - A layout is a destination that owns a child [`Path`]. Layouts are built lazily
//!   from the per-coordinator [`LayoutRegistry`].
//!
//! # Life of a navigation operation
//!
//! ```text
//! enter(d) ─► operation gate ─► resolve redirects ─► plan layout chain ─► commit
//!                                     │ Abort                 │ Err          │
//!                                     ▼                       ▼              ▼
//!                                 Aborted              state unchanged   mutate Path
//!                                                                            │
//!                                                                            ▼
//!                                                                   notify listeners
//! ```
//!
//! # Operations
//!
//! | [`Coordinator`] method | Guard consulted | History effect |
//! | :--------------------- | :-------------- | :------------- |
//! | [`enter()`]            | no              | adds entry     |
//! | [`leave()`]            | yes             | removes entry  |
//! | [`replace_all()`]      | no              | clears history |
//! | [`reconcile()`]        | yes, per frame  | may shrink     |
//! | [`recover()`]          | per dispatch    | per dispatch   |
//!
//! # Layouts
//!
//! Every destination may name a parent [`LayoutKey`]. The layout resolver walks these keys
//! up to the root, builds missing layouts from their registered constructors, and then
//! activates each layout inside its own parent path before the target path is touched.
//! Planning happens before committing, so a missing constructor leaves the coordinator
//! exactly as it was.
//!
//! # Declared stacks and the diff engine
//!
//! [`diff()`] computes a Myers minimal edit script. Applying it with
//! [`Coordinator::apply_declared_stack()`] keeps every retained destination as the *same
//! instance*, so any state attached to it by the renderer survives.
//!
//! # Concurrency
//!
//! Public operations are serialized by a fair [`tokio::sync::Mutex`] (the operation gate).
//! Hooks run while the gate is held: they receive a [`NavSnapshot`] and must not call
//! back into the coordinator's operations.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events. Use [`try_initialize_logging_global()`] with a
//! [`TracingConfig`] to install a subscriber.
//!
//! [`enter()`]: Coordinator::enter
//! [`leave()`]: Coordinator::leave
//! [`replace_all()`]: Coordinator::replace_all
//! [`reconcile()`]: Coordinator::reconcile
//! [`recover()`]: Coordinator::recover

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules.
pub mod core;
pub mod nav;

// Re-export.
#[allow(ambiguous_glob_reexports)]
pub use core::*;
#[allow(ambiguous_glob_reexports)]
pub use nav::*;
