//! The closed registry of solar-system bodies Helios serves.
//!
//! The catalog is hand-maintained, process-wide, and read-only: nine
//! planets (Pluto included, grandfathered from the original catalog) and
//! the two Voyager deep-space probes. Each entry carries the internal
//! name used in API payloads, a display label, and the identifier the
//! upstream Horizons API expects in its `COMMAND` parameter.
//!
//! Entries never change at runtime and the listing order is stable --
//! snapshot payloads reproduce it exactly.

use serde::{Deserialize, Serialize};

/// Which half of the catalog a snapshot covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    /// The nine planets, Mercury through Pluto.
    Planet,
    /// The Voyager deep-space probes.
    Probe,
}

/// One body in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Internal name used as the `name`/`id` field in payloads (e.g. `earth`).
    pub name: &'static str,
    /// Human-readable display label (e.g. `Earth`).
    pub label: &'static str,
    /// Horizons `COMMAND` identifier. Negative ids are spacecraft.
    pub horizons_id: &'static str,
}

/// The planet catalog, in heliocentric distance order.
pub const PLANETS: [CatalogEntry; 9] = [
    CatalogEntry { name: "mercury", label: "Mercury", horizons_id: "199" },
    CatalogEntry { name: "venus", label: "Venus", horizons_id: "299" },
    CatalogEntry { name: "earth", label: "Earth", horizons_id: "399" },
    CatalogEntry { name: "mars", label: "Mars", horizons_id: "499" },
    CatalogEntry { name: "jupiter", label: "Jupiter", horizons_id: "599" },
    CatalogEntry { name: "saturn", label: "Saturn", horizons_id: "699" },
    CatalogEntry { name: "uranus", label: "Uranus", horizons_id: "799" },
    CatalogEntry { name: "neptune", label: "Neptune", horizons_id: "899" },
    CatalogEntry { name: "pluto", label: "Pluto", horizons_id: "999" },
];

/// The probe catalog.
pub const PROBES: [CatalogEntry; 2] = [
    CatalogEntry { name: "voyager1", label: "Voyager 1", horizons_id: "-31" },
    CatalogEntry { name: "voyager2", label: "Voyager 2", horizons_id: "-32" },
];

/// Return the catalog slice for the given kind, in stable order.
pub const fn catalog(kind: BodyKind) -> &'static [CatalogEntry] {
    match kind {
        BodyKind::Planet => &PLANETS,
        BodyKind::Probe => &PROBES,
    }
}

/// Look up a catalog entry by internal name across both kinds.
pub fn find(name: &str) -> Option<&'static CatalogEntry> {
    PLANETS
        .iter()
        .chain(PROBES.iter())
        .find(|entry| entry.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planet_catalog_is_complete_and_ordered() {
        let names: Vec<&str> = catalog(BodyKind::Planet).iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            [
                "mercury", "venus", "earth", "mars", "jupiter", "saturn", "uranus", "neptune",
                "pluto"
            ]
        );
    }

    #[test]
    fn probe_catalog_lists_both_voyagers() {
        let probes = catalog(BodyKind::Probe);
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[0].name, "voyager1");
        assert_eq!(probes[0].horizons_id, "-31");
        assert_eq!(probes[1].name, "voyager2");
        assert_eq!(probes[1].horizons_id, "-32");
    }

    #[test]
    fn find_resolves_both_kinds() {
        assert_eq!(find("earth").map(|e| e.horizons_id), Some("399"));
        assert_eq!(find("voyager2").map(|e| e.label), Some("Voyager 2"));
        assert!(find("ceres").is_none());
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = PLANETS
            .iter()
            .chain(PROBES.iter())
            .map(|e| e.name)
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PLANETS.len() + PROBES.len());
    }
}
