//! Naming templates: field dispatch, bracket groups and the renderer.

pub mod bracket;
pub mod fields;
pub mod renderer;
pub mod validity;

pub use bracket::{BracketCache, Bracketed};
pub use fields::FieldSource;
pub use renderer::{Rendered, TemplateRenderer};
pub use validity::{MOVIE_VALIDITY_TEMPLATE, TV_VALIDITY_TEMPLATE, ValidityCheck};
