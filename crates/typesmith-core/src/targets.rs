//! Target language back-ends.
//!
//! Each target implements the [`crate::render::Target`] hook set; the
//! driver supplies everything else. The shipped target is Ruby on the
//! `dry-struct`/`dry-types` stack.

pub mod ruby;

pub use ruby::RubyTarget;
