//! # Gazette Shared
//!
//! Presentation types shared across binaries: the view models handed to the
//! HTML layer and the document scaffolding that renders them.

pub mod dto;
pub mod html;

pub use dto::{AuthorView, GroupRef, GroupView, PageMeta, PostFormView, PostView};
