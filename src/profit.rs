use crate::catalog::{Aeroplanes, Airports, LookupError};
use crate::model::entity::{Aeroplane, Flight, Km, Money};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitBreakdown {
    pub income: Money,
    pub total_seats: u64,
    pub distance: Km,
    pub cost_per_seat: Money,
    pub cost: Money,
    /// `income - cost`, rounded to cents.
    pub profit: Money,
}

impl ProfitBreakdown {
    pub fn compute(flight: &Flight, aeroplane: &Aeroplane, distance: Km) -> Self {
        let income = flight
            .booked
            .zip(flight.prices)
            .values()
            .iter()
            .map(|&(seats, price)| f64::from(seats) * price)
            .sum::<Money>();
        let total_seats = flight.booked.values().iter().map(|&s| u64::from(s)).sum::<u64>();
        let cost_per_seat = aeroplane.cost_per_seat_per_100km * distance / 100.0;
        #[allow(clippy::cast_precision_loss)]
        let cost = cost_per_seat * total_seats as f64;
        ProfitBreakdown {
            income,
            total_seats,
            distance,
            cost_per_seat,
            cost,
            profit: round_cents(income - cost),
        }
    }
}

/// Costs flights against the catalogs. Feasibility is not checked here, so
/// callers should only cost flights that passed validation.
pub struct ProfitCalculator<'a> {
    airports: &'a Airports,
    aeroplanes: &'a Aeroplanes,
}

impl<'a> ProfitCalculator<'a> {
    pub fn new(airports: &'a Airports, aeroplanes: &'a Aeroplanes) -> Self {
        ProfitCalculator { airports, aeroplanes }
    }

    pub fn breakdown(&self, flight: &Flight) -> Result<ProfitBreakdown, LookupError> {
        let aeroplane = self.aeroplanes.search(&flight.aircraft_type)?;
        let distance = self.airports.find_distance(&flight.origin, &flight.destination)?;
        Ok(ProfitBreakdown::compute(flight, aeroplane, distance))
    }

    pub fn profit(&self, flight: &Flight) -> Result<Money, LookupError> {
        self.breakdown(flight).map(|b| b.profit)
    }
}

/// Rounds half away from zero to two decimals.
pub fn round_cents(value: Money) -> Money {
    (value * 100.0).round() / 100.0
}

pub fn format_money(value: Money) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::base::HomeBases;
    use crate::model::entity::{Airport, PerClass};

    fn catalogs() -> (Airports, Aeroplanes) {
        let mut airports = Airports::new(HomeBases::default());
        airports.add(Airport {
            code: "JFK".to_owned(),
            name: "John F Kennedy".to_owned(),
            distance_from_a: 5556.0,
            distance_from_b: 5555.0,
        });
        let mut aeroplanes = Aeroplanes::new();
        aeroplanes.add(Aeroplane {
            type_name: "X".to_owned(),
            cost_per_seat_per_100km: 1.0,
            max_range: 6000.0,
            seats: PerClass::new(100, 20, 10),
        });
        (airports, aeroplanes)
    }

    fn flight() -> Flight {
        Flight {
            origin: "MAN".to_owned(),
            destination: "JFK".to_owned(),
            aircraft_type: "X".to_owned(),
            booked: PerClass::new(80, 10, 5),
            prices: PerClass::new(200.0, 500.0, 1000.0),
        }
    }

    #[test]
    fn scenario_breakdown() {
        let (airports, aeroplanes) = catalogs();
        let b = ProfitCalculator::new(&airports, &aeroplanes).breakdown(&flight()).unwrap();

        assert_eq!(b.income, 26000.0);
        assert_eq!(b.total_seats, 95);
        assert_eq!(b.distance, 5556.0);
        assert!((b.cost_per_seat - 55.56).abs() < 1e-9);
        assert!((b.cost - 5278.2).abs() < 1e-6);
        assert!((b.profit - 20721.80).abs() < 1e-9);
        assert_eq!(format_money(b.profit), "20721.80");
    }

    #[test]
    fn second_base_uses_second_distance_column() {
        let (airports, aeroplanes) = catalogs();
        let from_gatwick = Flight { origin: "LGW".to_owned(), ..flight() };
        let b = ProfitCalculator::new(&airports, &aeroplanes).breakdown(&from_gatwick).unwrap();
        assert_eq!(b.distance, 5555.0);
        assert_eq!(format_money(b.profit), "20722.75");
    }

    #[test]
    fn income_is_linear_in_price() {
        let (airports, aeroplanes) = catalogs();
        let calculator = ProfitCalculator::new(&airports, &aeroplanes);
        let base = calculator.breakdown(&flight()).unwrap();
        let doubled = Flight { prices: flight().prices.map(|p| p * 2.0), ..flight() };
        let twice = calculator.breakdown(&doubled).unwrap();

        assert_eq!(twice.income, base.income * 2.0);
        assert_eq!(twice.cost, base.cost);
    }

    #[test]
    fn empty_flight_costs_nothing() {
        let (airports, aeroplanes) = catalogs();
        let empty = Flight { booked: PerClass::default(), ..flight() };
        let b = ProfitCalculator::new(&airports, &aeroplanes).breakdown(&empty).unwrap();
        assert_eq!(b.total_seats, 0);
        assert_eq!(b.profit, 0.0);
    }

    #[test]
    fn unknown_aircraft_has_no_profit() {
        let (airports, aeroplanes) = catalogs();
        let ghost = Flight { aircraft_type: "Z".to_owned(), ..flight() };
        assert!(ProfitCalculator::new(&airports, &aeroplanes).profit(&ghost).is_err());
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        assert_eq!(round_cents(1.005_000_1), 1.01);
        assert_eq!(round_cents(-2.5), -2.5);
        assert_eq!(format_money(round_cents(-0.125_000_1)), "-0.13");
    }
}
