use std::{
    collections::{hash_map::Entry, HashMap},
    fmt,
};

use thiserror::Error;
use tracing::warn;

use crate::loader::Table;
use crate::model::base::HomeBases;
use crate::model::entity::{Aeroplane, Airport, Km};
use crate::model::record::{FromRow, RecordError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Airport,
    Aeroplane,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Airport => f.write_str("airport code"),
            CatalogKind::Aeroplane => f.write_str("aeroplane type"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LookupError {
    #[error("Invalid {kind} ({key})")]
    NotFound { kind: CatalogKind, key: String },
    #[error("Invalid home base airport code ({code})")]
    InvalidOrigin { code: String },
}

pub trait Keyed {
    const KIND: CatalogKind;

    fn key(&self) -> &str;
}

impl Keyed for Airport {
    const KIND: CatalogKind = CatalogKind::Airport;

    fn key(&self) -> &str {
        &self.code
    }
}

impl Keyed for Aeroplane {
    const KIND: CatalogKind = CatalogKind::Aeroplane;

    fn key(&self) -> &str {
        &self.type_name
    }
}

/// Insertion-ordered records indexed by key. The first record added under a
/// key is the one lookups return.
#[derive(Debug, Clone)]
pub struct Catalog<R> {
    records: Vec<R>,
    index: HashMap<String, usize>,
}

impl<R> Default for Catalog<R> {
    fn default() -> Self {
        Catalog { records: Vec::new(), index: HashMap::new() }
    }
}

impl<R: Keyed> Catalog<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: R) -> usize {
        match self.index.entry(record.key().to_owned()) {
            Entry::Occupied(_) => {
                warn!(kind = %R::KIND, key = record.key(), "duplicate key; lookups keep the earlier record");
            }
            Entry::Vacant(slot) => {
                slot.insert(self.records.len());
            }
        }
        self.records.push(record);
        self.records.len()
    }

    pub fn search(&self, key: &str) -> Result<&R, LookupError> {
        self.index
            .get(key)
            .map(|&i| &self.records[i])
            .ok_or_else(|| LookupError::NotFound { kind: R::KIND, key: key.to_owned() })
    }

    pub fn list(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Keyed + FromRow> Catalog<R> {
    pub fn from_table(table: &Table) -> Result<Self, RecordError> {
        let mut catalog = Self::new();
        for row in &table.rows {
            catalog.add(R::from_row(row)?);
        }
        Ok(catalog)
    }
}

impl<R: Keyed> FromIterator<R> for Catalog<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut catalog = Self::new();
        iter.into_iter().for_each(|record| {
            catalog.add(record);
        });
        catalog
    }
}

pub type Aeroplanes = Catalog<Aeroplane>;

/// Airport catalog that knows which codes are home bases.
#[derive(Debug, Clone)]
pub struct Airports {
    bases: HomeBases,
    catalog: Catalog<Airport>,
}

impl Airports {
    pub fn new(bases: HomeBases) -> Self {
        Airports { bases, catalog: Catalog::new() }
    }

    pub fn from_table(bases: HomeBases, table: &Table) -> Result<Self, RecordError> {
        Ok(Airports { bases, catalog: Catalog::from_table(table)? })
    }

    pub fn bases(&self) -> &HomeBases {
        &self.bases
    }

    pub fn add(&mut self, airport: Airport) -> usize {
        self.catalog.add(airport)
    }

    pub fn search(&self, code: &str) -> Result<&Airport, LookupError> {
        self.catalog.search(code)
    }

    pub fn list(&self) -> &[Airport] {
        self.catalog.list()
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Distance from a home base to an overseas airport. The destination is
    /// resolved before the origin is checked.
    pub fn find_distance(&self, origin: &str, destination: &str) -> Result<Km, LookupError> {
        let airport = self.search(destination)?;
        let slot = self
            .bases
            .slot(origin)
            .ok_or_else(|| LookupError::InvalidOrigin { code: origin.to_owned() })?;
        Ok(airport.distance_from(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::PerClass;

    fn airport(code: &str, name: &str, a: Km, b: Km) -> Airport {
        Airport { code: code.to_owned(), name: name.to_owned(), distance_from_a: a, distance_from_b: b }
    }

    fn airports() -> Airports {
        let mut airports = Airports::new(HomeBases::default());
        airports.add(airport("JFK", "John F Kennedy", 5556.0, 5555.0));
        airports.add(airport("ORY", "Paris-Orly", 0.0, 367.0));
        airports
    }

    #[test]
    fn add_reports_new_size() {
        let mut planes = Aeroplanes::new();
        let plane = Aeroplane {
            type_name: "X".to_owned(),
            cost_per_seat_per_100km: 1.0,
            max_range: 6000.0,
            seats: PerClass::new(100, 20, 10),
        };
        assert_eq!(planes.add(plane.clone()), 1);
        assert_eq!(planes.add(Aeroplane { type_name: "Y".to_owned(), ..plane }), 2);
        assert_eq!(planes.search("Y").unwrap().type_name, "Y");
    }

    #[test]
    fn find_distance_picks_column_by_base() {
        let airports = airports();
        assert_eq!(airports.find_distance("MAN", "JFK"), Ok(5556.0));
        assert_eq!(airports.find_distance("LGW", "JFK"), Ok(5555.0));
        assert_eq!(airports.find_distance("MAN", "ORY"), Ok(0.0));
        assert_eq!(
            airports.find_distance("LHR", "JFK"),
            Err(LookupError::InvalidOrigin { code: "LHR".to_owned() })
        );
    }

    #[test]
    fn unknown_destination_wins_over_unknown_origin() {
        let err = airports().find_distance("LHR", "SYD").unwrap_err();
        assert_eq!(err, LookupError::NotFound { kind: CatalogKind::Airport, key: "SYD".to_owned() });
        assert_eq!(err.to_string(), "Invalid airport code (SYD)");
    }

    #[test]
    fn duplicates_keep_first_record_but_are_listed() {
        let mut airports = airports();
        assert_eq!(airports.add(airport("JFK", "Shadow", 1.0, 1.0)), 3);
        assert_eq!(airports.search("JFK").unwrap().name, "John F Kennedy");
        assert_eq!(airports.list().iter().map(|a| a.name.as_str()).collect::<Vec<_>>(), [
            "John F Kennedy",
            "Paris-Orly",
            "Shadow"
        ]);
    }

    #[test]
    fn builds_from_loaded_table() {
        let table = crate::loader::read_from(
            "type,cost,range,e,b,f\nA321,$0.12,5600,180,20,0\n".as_bytes(),
            &crate::loader::LoadOptions::default(),
        )
        .unwrap();
        let planes = Aeroplanes::from_table(&table).unwrap();
        assert_eq!(planes.len(), 1);
        assert_eq!(planes.search("A321").unwrap().seats.first, 0);
        assert!(matches!(
            planes.search("B747"),
            Err(LookupError::NotFound { kind: CatalogKind::Aeroplane, .. })
        ));
    }
}
