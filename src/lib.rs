#![warn(
    missing_copy_implementations,
    clippy::all,
    clippy::doc_markdown,
    clippy::dbg_macro,
    clippy::todo,
    clippy::empty_enum,
    clippy::enum_glob_use,
    clippy::mem_forget,
    clippy::use_self,
    clippy::filter_map_next,
    clippy::needless_continue,
    clippy::needless_borrow,
    clippy::match_wildcard_for_single_variants,
    clippy::if_let_mutex,
    clippy::mismatched_target_os,
    clippy::await_holding_lock,
    clippy::match_on_vec_items,
    clippy::imprecise_flops,
    clippy::lossy_float_literal,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::fn_params_excessive_bools,
    clippy::exit,
    clippy::inefficient_to_string,
    clippy::linkedlist,
    clippy::macro_use_imports,
    clippy::option_option,
    clippy::verbose_file_reads,
    clippy::unnested_or_patterns,
    clippy::absurd_extreme_comparisons,
    rust_2018_idioms,
    future_incompatible,
    nonstandard_style,
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

//! A regular-expression engine over sequences of user-supplied elements.
//!
//! Atomic patterns (`<…>`/`[…]`) are predicates over one element of the
//! input sequence, supplied by a caller-injected [`TokenFactory`]. The
//! engine composes those predicates with concatenation, alternation,
//! grouping and quantification, compiles the result to a
//! Thompson-construction NFA, and simulates it to report positional
//! matches with named captures. See [`RegularExpression`] for the
//! entry point.

mod error;
mod expr;
mod group;
mod matcher;
mod nfa;
mod parse;
mod regex;

pub mod graph_display;
pub mod literal;
pub mod table;

pub use error::TokenizationError;
pub use expr::{Expression, Predicate};
pub use group::{CapturedGroup, GroupId, Match};
pub use regex::RegularExpression;

/// What a [`TokenFactory`] returns: a predicate, or the boxed error
/// that caused it to reject the token body.
pub type FactoryResult<T> = Result<Predicate<T>, Box<dyn std::error::Error + Send + Sync>>;

/// Turns the raw text inside a `<…>`/`[…]` token into a predicate over
/// one input element. Invoked once per token during parsing (spec §6).
pub trait TokenFactory<T>: Fn(&str) -> FactoryResult<T> + Send + Sync {}

impl<T, F> TokenFactory<T> for F where F: Fn(&str) -> FactoryResult<T> + Send + Sync {}
