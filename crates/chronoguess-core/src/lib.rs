//! Core types and rules for the Chronoguess timeline game.
//!
//! Owns the match state machine, the dealing logic and the wire views. No
//! HTTP or database code lives here; storage backends implement
//! [`store::MatchStore`].

// `MatchStore` spells out `Send` on its futures; implementors use `async fn`.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod game;
pub mod occurrence;
pub mod state;
pub mod store;
pub mod view;

pub use error::{Error, ErrorKind, Result};
