pub mod entity_model;

pub use entity_model::*;
