use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use notifycore::geo::Coordinate;

/// Kinds of places the completer can be restricted to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlaceKind {
    PointOfInterest,
    Address,
}

fn default_kind() -> PlaceKind {
    PlaceKind::PointOfInterest
}

/// One entry in the place index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub locality: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_kind")]
    pub kind: PlaceKind,
}

impl Place {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// A ranked autocomplete suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Completion {
    pub title: String,
    pub subtitle: String,
}

impl Completion {
    /// Display form, e.g. "Tokyo Tower, Minato".
    pub fn label(&self) -> String {
        format!("{}, {}", self.title, self.subtitle)
    }
}

/// In-process place index standing in for the platform search services.
pub struct Gazetteer {
    places: Vec<Place>,
}

impl Gazetteer {
    pub fn with_places(places: Vec<Place>) -> Self {
        Self { places }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading place index {}", path_ref.display()))?;
        let places: Vec<Place> = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing place index {}", path_ref.display()))?;
        Ok(Self::with_places(places))
    }

    /// Built-in Tokyo place set used when no index file is given.
    pub fn builtin() -> Self {
        let place = |name: &str, locality: &str, latitude: f64, longitude: f64, kind| Place {
            name: name.to_string(),
            locality: locality.to_string(),
            latitude,
            longitude,
            kind,
        };
        Self::with_places(vec![
            place(
                "Tokyo Tower",
                "Minato",
                35.6586,
                139.7454,
                PlaceKind::PointOfInterest,
            ),
            place(
                "Tokyo Skytree",
                "Sumida",
                35.7101,
                139.8107,
                PlaceKind::PointOfInterest,
            ),
            place(
                "Tokyo Station",
                "Chiyoda",
                35.6812,
                139.7671,
                PlaceKind::PointOfInterest,
            ),
            place(
                "Meiji Jingu",
                "Shibuya",
                35.6764,
                139.6993,
                PlaceKind::PointOfInterest,
            ),
            place(
                "Sensoji",
                "Taito",
                35.7148,
                139.7967,
                PlaceKind::PointOfInterest,
            ),
            place(
                "4 Chome Shibakoen",
                "Minato",
                35.6571,
                139.7481,
                PlaceKind::Address,
            ),
        ])
    }

    /// Ranked lookup: case-insensitive name-prefix matches first, then
    /// substring matches, ties broken by name. Empty fragments match
    /// nothing.
    pub fn lookup(&self, fragment: &str, kind: Option<PlaceKind>) -> Vec<Completion> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<(usize, &Place)> = self
            .places
            .iter()
            .filter(|place| kind.map_or(true, |kind| place.kind == kind))
            .filter_map(|place| {
                let name = place.name.to_lowercase();
                if name.starts_with(&needle) {
                    Some((0, place))
                } else if name.contains(&needle) {
                    Some((1, place))
                } else {
                    None
                }
            })
            .collect();
        ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.name.cmp(&b.1.name)));

        ranked
            .into_iter()
            .map(|(_, place)| Completion {
                title: place.name.clone(),
                subtitle: place.locality.clone(),
            })
            .collect()
    }

    /// Resolves a committed query to places: exact name match when one
    /// exists, otherwise the ranked lookup across every place kind.
    pub fn resolve(&self, query: &str) -> Vec<&Place> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let exact: Vec<&Place> = self
            .places
            .iter()
            .filter(|place| place.name.to_lowercase() == needle)
            .collect();
        if !exact.is_empty() {
            return exact;
        }

        self.lookup(query, None)
            .into_iter()
            .filter_map(|completion| {
                self.places
                    .iter()
                    .find(|place| place.name == completion.title)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn prefix_matches_rank_ahead_of_substring_matches() {
        let gazetteer = Gazetteer::builtin();
        let completions = gazetteer.lookup("s", Some(PlaceKind::PointOfInterest));
        assert_eq!(completions[0].title, "Sensoji");
        assert!(completions
            .iter()
            .any(|completion| completion.title == "Tokyo Station"));
    }

    #[test]
    fn query_matching_is_case_insensitive() {
        let gazetteer = Gazetteer::builtin();
        let completions = gazetteer.lookup("tokyo t", Some(PlaceKind::PointOfInterest));
        assert_eq!(completions[0].title, "Tokyo Tower");
    }

    #[test]
    fn point_of_interest_filter_hides_addresses() {
        let gazetteer = Gazetteer::builtin();
        let completions = gazetteer.lookup("Shibakoen", Some(PlaceKind::PointOfInterest));
        assert!(completions.is_empty());
        assert_eq!(gazetteer.lookup("Shibakoen", None).len(), 1);
    }

    #[test]
    fn empty_fragment_matches_nothing() {
        let gazetteer = Gazetteer::builtin();
        assert!(gazetteer.lookup("", None).is_empty());
        assert!(gazetteer.lookup("   ", None).is_empty());
    }

    #[test]
    fn completion_label_joins_title_and_subtitle() {
        let gazetteer = Gazetteer::builtin();
        let completions = gazetteer.lookup("Tokyo Tower", None);
        assert_eq!(completions[0].label(), "Tokyo Tower, Minato");
    }

    #[test]
    fn resolve_prefers_exact_name_matches() {
        let gazetteer = Gazetteer::builtin();
        let places = gazetteer.resolve("tokyo tower");
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].coordinate(), Coordinate::new(35.6586, 139.7454));
    }

    #[test]
    fn load_reads_yaml_place_lists() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"- name: Osaka Castle\n  locality: Chuo\n  latitude: 34.6873\n  longitude: 135.5262\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let gazetteer = Gazetteer::load(&path).unwrap();
        assert_eq!(gazetteer.lookup("Osaka", None).len(), 1);
    }
}
