//! Helper functions shared by the content store, templates and SEO output

mod date;
mod text;

pub use date::*;
pub use text::*;
