//! Rewrites ordered n-ary trees according to a per-node policy, either eagerly or as a lazy pull sequence.
//!
//! # Overview
//! A rewrite takes a [`Tree`] and two caller-supplied functions:
//! - `pick`, which decides a [`Policy`] for a node by looking at its label
//! - `transform`, which maps a whole subtree to a new one and may additionally register *side output*: extra trees to be emitted ahead of its result
//!
//! The six policies decide whether a node is kept as-is, transformed, transformed repeatedly until it settles, or rebuilt from its rewritten children with the transform applied before or after descending. See [`Policy`] for the exact semantics of each one.
//!
//! The same computation is available in two forms:
//! - [`rewrite`] recurses through the tree and returns the final result. It is the simpler of the two and serves as the reference for the other one.
//! - [`lazy_rewrite`] returns a [`LazyRewrite`], which computes the rewrite one [`Fragment`] per pull: the final rewrite of every subtree the engine descends into, children before parents, interleaved with side output. Its last fragment is always exactly what [`rewrite`] would have returned. It keeps its own stack instead of recursing, and it can be abandoned at any point.
//!
//! Both have fallible counterparts ([`try_rewrite`] and [`try_lazy_rewrite`]), and a [`Rewriter`] can carry a [`RewriteConfig`] with limits that turn runaway rule sets into errors instead of hangs.
//!
//! # Example
//! ```rust
//! use arbor_rewrite::{rewrite, tree, Policy, Tree};
//!
//! let sum = rewrite(
//!     tree!("+" => ["1", "2"]),
//!     |label| if *label == "+" { Policy::PushDown } else { Policy::Skip },
//!     |node, _| {
//!         assert_eq!(node, tree!("+" => ["1", "2"]));
//!         Tree::leaf("3")
//!     },
//! );
//! assert_eq!(sum, Tree::leaf("3"));
//! ```
//!
//! # Feature flags
//! - `std` (**enabled by default**): enables the full standard library, disabling `no_std` for the crate. Currently, this only adds [`Error`] trait implementations for the error types and standard library support to `tracing`. *An allocator is required either way.*
//! - `smallvec` (**enabled by default**): keeps the first few levels of the lazy rewrite's frame stack inline using [`SmallVec`] instead of allocating a [`Vec`] right away.
//!
//! # Public dependencies
//! - `smallvec` (*optional*): `^1.15`
//!
//! [`Tree`]: tree/struct.Tree.html " "
//! [`Policy`]: enum.Policy.html " "
//! [`rewrite`]: rewrite/fn.rewrite.html " "
//! [`lazy_rewrite`]: rewrite/fn.lazy_rewrite.html " "
//! [`try_rewrite`]: rewrite/fn.try_rewrite.html " "
//! [`try_lazy_rewrite`]: rewrite/fn.try_lazy_rewrite.html " "
//! [`LazyRewrite`]: rewrite/struct.LazyRewrite.html " "
//! [`Fragment`]: rewrite/enum.Fragment.html " "
//! [`Rewriter`]: rewrite/struct.Rewriter.html " "
//! [`RewriteConfig`]: rewrite/struct.RewriteConfig.html " "
//! [`Error`]: https://doc.rust-lang.org/std/error/trait.Error.html " "
//! [`Vec`]: https://doc.rust-lang.org/std/vec/struct.Vec.html " "
//! [`SmallVec`]: https://docs.rs/smallvec/*/smallvec/struct.SmallVec.html " "

#![warn(
    rust_2018_idioms,
    clippy::cargo,
    clippy::nursery,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    clippy::cast_lossless,
    clippy::checked_conversions,
    clippy::copy_iterator,
    clippy::expl_impl_clone_on_copy,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
    clippy::filter_map_next,
    clippy::map_flatten,
    clippy::map_unwrap_or,
    clippy::fn_params_excessive_bools,
    clippy::implicit_hasher,
    clippy::implicit_saturating_sub,
    clippy::inefficient_to_string,
    clippy::invalid_upcast_comparisons,
    clippy::items_after_statements,
    clippy::large_stack_arrays,
    clippy::let_unit_value,
    clippy::macro_use_imports,
    clippy::match_same_arms,
    clippy::match_wild_err_arm,
    clippy::match_wildcard_for_single_variants,
    clippy::mut_mut,
    clippy::needless_pass_by_value,
    clippy::option_option,
    clippy::range_plus_one,
    clippy::range_minus_one,
    clippy::redundant_closure_for_method_calls,
    clippy::same_functions_in_if_condition,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::string_add_assign,
    clippy::too_many_lines,
    clippy::type_repetition_in_bounds,
    clippy::trivially_copy_pass_by_ref,
    clippy::unicode_not_nfc,
    clippy::unnested_or_patterns,
    clippy::unused_self,
    clippy::used_underscore_binding,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::decimal_literal_representation,
    clippy::get_unwrap,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unneeded_field_pattern,
    clippy::unwrap_used, // Only .expect() allowed
    clippy::use_debug,
)]
#![deny(
    anonymous_parameters,
    bare_trait_objects,
    clippy::exit,
)]
#![allow(clippy::use_self)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod tree;
#[doc(no_inline)]
pub use tree::{Tree, IndexOutOfBounds, PreOrder};

mod policy;
pub use policy::Policy;

pub mod rewrite;
#[doc(no_inline)]
pub use rewrite::{
    rewrite,
    try_rewrite,
    lazy_rewrite,
    try_lazy_rewrite,
    Fragment,
    LazyRewrite,
    Rewriter,
    RewriteConfig,
    RewriteError,
    Rules,
    FnRules,
    TryFnRules,
    SideOutput,
};

/// A prelude for rewriting trees, containing the most used items in a renamed form for safe glob-importing.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{
        tree,
        tree::Tree,
        policy::Policy as RewritePolicy,
        rewrite::{
            rewrite,
            try_rewrite,
            lazy_rewrite,
            try_lazy_rewrite,
            Fragment as RewriteFragment,
            LazyRewrite,
            Rewriter,
            RewriteConfig,
            RewriteError,
            Rules as RewriteRules,
            SideOutput,
        },
    };
}

pub(crate) mod util;
