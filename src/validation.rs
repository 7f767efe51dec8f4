use thiserror::Error;
use tracing::error;

use crate::catalog::{Aeroplanes, Airports, LookupError};
use crate::model::entity::{Flight, Km, SeatClass, Seats};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{aircraft} can't be checked for {route}: {source}")]
    Lookup { aircraft: String, route: String, source: LookupError },
    #[error("{aircraft} doesn't have the range to fly {route} ({distance} km > {max_range} km)")]
    RangeExceeded { aircraft: String, route: String, distance: Km, max_range: Km },
    #[error("{aircraft} doesn't have enough {class} seats for {route} ({booked} > {available})")]
    CapacityExceeded { aircraft: String, route: String, class: SeatClass, booked: Seats, available: Seats },
}

impl ValidationError {
    pub fn capacity_class(&self) -> Option<SeatClass> {
        match self {
            ValidationError::CapacityExceeded { class, .. } => Some(*class),
            _ => None,
        }
    }

    pub fn lookup(&self) -> Option<&LookupError> {
        match self {
            ValidationError::Lookup { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightFailure {
    pub index: usize,
    pub error: ValidationError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchValidation {
    checked: usize,
    failures: Vec<FlightFailure>,
}

impl BatchValidation {
    pub fn checked(&self) -> usize {
        self.checked
    }

    pub fn failures(&self) -> &[FlightFailure] {
        &self.failures
    }

    pub fn all_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn is_valid(&self, index: usize) -> bool {
        index < self.checked && self.failures.iter().all(|f| f.index != index)
    }
}

/// Checks booked flights against the reference catalogs.
pub struct Validator<'a> {
    airports: &'a Airports,
    aeroplanes: &'a Aeroplanes,
}

impl<'a> Validator<'a> {
    pub fn new(airports: &'a Airports, aeroplanes: &'a Aeroplanes) -> Self {
        Validator { airports, aeroplanes }
    }

    /// Stops at the first violated constraint: lookups, then range, then
    /// capacity from first class down to economy.
    pub fn validate(&self, flight: &Flight) -> Result<(), ValidationError> {
        let lookup = |source: LookupError| ValidationError::Lookup {
            aircraft: flight.aircraft_type.clone(),
            route: flight.route(),
            source,
        };
        let distance = self.airports.find_distance(&flight.origin, &flight.destination).map_err(lookup)?;
        let aeroplane = self.aeroplanes.search(&flight.aircraft_type).map_err(lookup)?;

        if distance > aeroplane.max_range {
            return Err(ValidationError::RangeExceeded {
                aircraft: aeroplane.type_name.clone(),
                route: flight.route(),
                distance,
                max_range: aeroplane.max_range,
            });
        }
        for class in SeatClass::CHECK_ORDER {
            let booked = flight.booked.get(class);
            let available = aeroplane.seats.get(class);
            if booked > available {
                return Err(ValidationError::CapacityExceeded {
                    aircraft: aeroplane.type_name.clone(),
                    route: flight.route(),
                    class,
                    booked,
                    available,
                });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self, flight: &Flight) -> bool {
        match self.validate(flight) {
            Ok(()) => true,
            Err(e) => {
                error!("Error: {e}");
                false
            }
        }
    }

    /// Validates every flight; an invalid flight never stops the rest.
    pub fn validate_batch(&self, flights: &[Flight]) -> BatchValidation {
        let failures = flights
            .iter()
            .enumerate()
            .filter_map(|(index, flight)| {
                self.validate(flight).err().map(|error| {
                    error!(index, route = %flight.route(), "Error: {error}");
                    FlightFailure { index, error }
                })
            })
            .collect();
        BatchValidation { checked: flights.len(), failures }
    }
}
