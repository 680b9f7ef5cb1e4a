pub mod track;

pub use track::{build_track, TrackConfig};
