use std::sync::Arc;

use notifycore::geo::Coordinate;

use crate::search::gazetteer::Gazetteer;

/// A resolved geographic location for a textual query. The coordinate is
/// optional; callers fall back to (0, 0) when it is absent.
#[derive(Debug, Clone)]
pub struct Placemark {
    pub name: String,
    pub locality: String,
    pub coordinate: Option<Coordinate>,
}

/// Geocoding search over the place index: natural-language query in,
/// ranked placemarks out. Callers take the first result.
pub struct PlaceSearch {
    gazetteer: Arc<Gazetteer>,
}

impl PlaceSearch {
    pub fn new(gazetteer: Arc<Gazetteer>) -> Self {
        Self { gazetteer }
    }

    pub fn natural_language_query(&self, query: &str) -> Vec<Placemark> {
        self.gazetteer
            .resolve(query)
            .into_iter()
            .map(|place| Placemark {
                name: place.name.clone(),
                locality: place.locality.clone(),
                coordinate: Some(place.coordinate()),
            })
            .collect()
    }
}
