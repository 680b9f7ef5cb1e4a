pub mod completer;
pub mod gazetteer;
pub mod place_search;

pub use completer::SearchCompleter;
pub use gazetteer::{Completion, Gazetteer, Place, PlaceKind};
pub use place_search::{PlaceSearch, Placemark};
