pub mod entity {
    use std::fmt;

    pub type Code = String;
    pub type Km = f64;
    pub type Money = f64;
    pub type Seats = u32;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum SeatClass {
        Economy,
        Business,
        First,
    }

    impl SeatClass {
        /// Order in which capacity is checked against an aircraft.
        pub const CHECK_ORDER: [SeatClass; 3] = [SeatClass::First, SeatClass::Business, SeatClass::Economy];

        pub fn label(self) -> &'static str {
            match self {
                SeatClass::Economy => "economy class",
                SeatClass::Business => "business class",
                SeatClass::First => "first-class",
            }
        }
    }

    impl fmt::Display for SeatClass {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label())
        }
    }

    /// One value per seat class.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct PerClass<T> {
        pub economy: T,
        pub business: T,
        pub first: T,
    }

    impl<T: Copy> PerClass<T> {
        pub fn new(economy: T, business: T, first: T) -> Self {
            PerClass { economy, business, first }
        }

        pub fn get(&self, class: SeatClass) -> T {
            match class {
                SeatClass::Economy => self.economy,
                SeatClass::Business => self.business,
                SeatClass::First => self.first,
            }
        }

        pub fn map<U>(self, f: impl Fn(T) -> U) -> PerClass<U> {
            PerClass { economy: f(self.economy), business: f(self.business), first: f(self.first) }
        }

        pub fn zip<U: Copy>(self, other: PerClass<U>) -> PerClass<(T, U)> {
            PerClass {
                economy: (self.economy, other.economy),
                business: (self.business, other.business),
                first: (self.first, other.first),
            }
        }

        pub fn values(&self) -> [T; 3] {
            [self.economy, self.business, self.first]
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Airport {
        pub code: Code,
        pub name: String,
        pub distance_from_a: Km,
        pub distance_from_b: Km,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Aeroplane {
        pub type_name: Code,
        pub cost_per_seat_per_100km: Money,
        pub max_range: Km,
        pub seats: PerClass<Seats>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct Flight {
        pub origin: Code,
        pub destination: Code,
        pub aircraft_type: Code,
        pub booked: PerClass<Seats>,
        pub prices: PerClass<Money>,
    }

    impl Flight {
        pub fn route(&self) -> String {
            format!("{} -> {}", self.origin, self.destination)
        }
    }
}


pub mod base {
    use super::entity::{Airport, Code, Km};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BaseSlot {
        A,
        B,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct HomeBase {
        pub code: Code,
        pub name: String,
    }

    impl HomeBase {
        pub fn new(code: impl Into<Code>, name: impl Into<String>) -> Self {
            HomeBase { code: code.into(), name: name.into() }
        }
    }

    /// The two domestic airports every flight departs from. Base A reads the
    /// first distance column of an airport record, base B the second.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct HomeBases {
        pub a: HomeBase,
        pub b: HomeBase,
    }

    impl HomeBases {
        pub fn new(a: HomeBase, b: HomeBase) -> Self {
            HomeBases { a, b }
        }

        pub fn slot(&self, code: &str) -> Option<BaseSlot> {
            if code == self.a.code {
                Some(BaseSlot::A)
            } else if code == self.b.code {
                Some(BaseSlot::B)
            } else {
                None
            }
        }

        pub fn get(&self, slot: BaseSlot) -> &HomeBase {
            match slot {
                BaseSlot::A => &self.a,
                BaseSlot::B => &self.b,
            }
        }

        pub fn by_code(&self, code: &str) -> Option<&HomeBase> {
            self.slot(code).map(|slot| self.get(slot))
        }
    }

    impl Default for HomeBases {
        fn default() -> Self {
            HomeBases::new(HomeBase::new("MAN", "Manchester"), HomeBase::new("LGW", "Gatwick"))
        }
    }

    impl Airport {
        pub fn distance_from(&self, slot: BaseSlot) -> Km {
            match slot {
                BaseSlot::A => self.distance_from_a,
                BaseSlot::B => self.distance_from_b,
            }
        }
    }
}


pub mod record {
    use thiserror::Error;

    use super::entity::{Aeroplane, Airport, Flight, Money, PerClass, Seats};
    use crate::loader::{Field, Row};

    #[derive(Debug, Clone, Error, PartialEq)]
    pub enum RecordError {
        #[error("line {line}: expected {expected} fields, found {found}")]
        FieldCount { line: u64, expected: usize, found: usize },
        #[error("line {line}, column `{column}`: expected a number, found `{value}`")]
        NotANumber { line: u64, column: &'static str, value: String },
        #[error("line {line}, column `{column}`: expected a whole seat count, found `{value}`")]
        NotASeatCount { line: u64, column: &'static str, value: String },
        #[error("line {line}, column `{column}`: {value} must not be negative")]
        Negative { line: u64, column: &'static str, value: f64 },
    }

    /// Typed record built from one loaded row.
    pub trait FromRow: Sized {
        const COLUMNS: &'static [&'static str];

        fn from_fields(fields: &Fields<'_>) -> Result<Self, RecordError>;

        fn from_row(row: &Row) -> Result<Self, RecordError> {
            if row.fields.len() != Self::COLUMNS.len() {
                return Err(RecordError::FieldCount {
                    line: row.line,
                    expected: Self::COLUMNS.len(),
                    found: row.fields.len(),
                });
            }
            Self::from_fields(&Fields { line: row.line, columns: Self::COLUMNS, fields: &row.fields })
        }
    }

    /// Column-aware accessor over a row whose width was already checked.
    pub struct Fields<'a> {
        line: u64,
        columns: &'static [&'static str],
        fields: &'a [Field],
    }

    impl<'a> Fields<'a> {
        pub fn text(&self, index: usize) -> String {
            self.fields[index].to_string()
        }

        pub fn number(&self, index: usize) -> Result<f64, RecordError> {
            self.fields[index].as_number().ok_or_else(|| RecordError::NotANumber {
                line: self.line,
                column: self.columns[index],
                value: self.text(index),
            })
        }

        pub fn non_negative(&self, index: usize) -> Result<f64, RecordError> {
            let value = self.number(index)?;
            if value < 0.0 {
                return Err(RecordError::Negative { line: self.line, column: self.columns[index], value });
            }
            Ok(value)
        }

        pub fn seats(&self, index: usize) -> Result<Seats, RecordError> {
            let value = self.non_negative(index)?;
            if value.fract() != 0.0 || value > f64::from(Seats::MAX) {
                return Err(RecordError::NotASeatCount {
                    line: self.line,
                    column: self.columns[index],
                    value: self.text(index),
                });
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let seats = value as Seats;
            Ok(seats)
        }

        /// Amount with an optional single leading currency symbol, e.g. `$1.23`.
        pub fn money(&self, index: usize) -> Result<Money, RecordError> {
            let value = match &self.fields[index] {
                Field::Number(n) => *n,
                Field::Text(s) => {
                    let mut chars = s.chars();
                    let stripped = match chars.next() {
                        Some(c) if !c.is_ascii_digit() && c != '.' && c != '-' && c != '+' => chars.as_str(),
                        _ => s.as_str(),
                    };
                    stripped.trim().parse::<f64>().ok().filter(|n| n.is_finite()).ok_or_else(|| {
                        RecordError::NotANumber {
                            line: self.line,
                            column: self.columns[index],
                            value: s.clone(),
                        }
                    })?
                }
            };
            if value < 0.0 {
                return Err(RecordError::Negative { line: self.line, column: self.columns[index], value });
            }
            Ok(value)
        }
    }

    impl FromRow for Airport {
        const COLUMNS: &'static [&'static str] = &["code", "name", "distanceFromBaseA", "distanceFromBaseB"];

        fn from_fields(f: &Fields<'_>) -> Result<Self, RecordError> {
            Ok(Airport {
                code: f.text(0),
                name: f.text(1),
                distance_from_a: f.non_negative(2)?,
                distance_from_b: f.non_negative(3)?,
            })
        }
    }

    impl FromRow for Aeroplane {
        const COLUMNS: &'static [&'static str] = &[
            "type",
            "costPerSeatPer100km",
            "maxRange",
            "numEconomySeats",
            "numBusinessSeats",
            "numFirstClassSeats",
        ];

        fn from_fields(f: &Fields<'_>) -> Result<Self, RecordError> {
            Ok(Aeroplane {
                type_name: f.text(0),
                cost_per_seat_per_100km: f.money(1)?,
                max_range: f.non_negative(2)?,
                seats: PerClass::new(f.seats(3)?, f.seats(4)?, f.seats(5)?),
            })
        }
    }

    impl FromRow for Flight {
        const COLUMNS: &'static [&'static str] = &[
            "originCode",
            "destinationCode",
            "aircraftType",
            "economyBooked",
            "businessBooked",
            "firstClassBooked",
            "economyPrice",
            "businessPrice",
            "firstClassPrice",
        ];

        fn from_fields(f: &Fields<'_>) -> Result<Self, RecordError> {
            Ok(Flight {
                origin: f.text(0),
                destination: f.text(1),
                aircraft_type: f.text(2),
                booked: PerClass::new(f.seats(3)?, f.seats(4)?, f.seats(5)?),
                prices: PerClass::new(f.non_negative(6)?, f.non_negative(7)?, f.non_negative(8)?),
            })
        }
    }

    pub fn records_from<R: FromRow>(rows: &[Row]) -> Result<Vec<R>, RecordError> {
        rows.iter().map(R::from_row).collect()
    }
}
