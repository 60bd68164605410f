//! Read-only queries over one graph/store pair.

pub mod resolver;
pub mod species;

pub use resolver::{resolve, resolve_key, Resolution};
pub use species::{execute as species_search, species_suggestions, SpeciesSearchResult};
