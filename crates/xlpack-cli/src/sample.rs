//! Sample customer records for demonstration packages

use chrono::{Days, NaiveDate};
use xlpack::{CellValue, Field, Record};

const FIRST_NAMES: &[&str] = &["Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Frances"];
const LAST_NAMES: &[&str] = &["Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth", "Allen"];
const STREETS: &[&str] = &["Main St", "Oak Ave", "Maple Dr", "Cedar Ln", "Elm St"];
const PLACES: &[(&str, &str, u32)] = &[
    ("Springfield", "IL", 62701),
    ("Madison", "WI", 53703),
    ("Portland", "OR", 97201),
    ("Austin", "TX", 78701),
    ("Burlington", "VT", 5401),
];

/// One customer row
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub entry_date: NaiveDate,
}

impl Record for Customer {
    const FIELDS: &'static [Field<Self>] = &[
        Field::new("Name", |c: &Customer| CellValue::from(c.name.as_str())),
        Field::new("Address", |c: &Customer| CellValue::from(c.address.as_str())),
        Field::new("City", |c: &Customer| CellValue::from(c.city.as_str())),
        Field::new("State", |c: &Customer| CellValue::from(c.state.as_str())),
        Field::new("Zip", |c: &Customer| CellValue::from(c.zip.as_str())),
        Field::new("EntryDate", |c: &Customer| CellValue::from(c.entry_date)),
    ];
}

/// `count` deterministic customers; `seed` varies the mix between packages
pub fn customers(count: usize, seed: usize) -> Vec<Customer> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    (0..count)
        .map(|i| {
            let k = i + seed * 3;
            let (city, state, zip) = PLACES[k % PLACES.len()];
            Customer {
                name: format!(
                    "{} {}",
                    FIRST_NAMES[k % FIRST_NAMES.len()],
                    LAST_NAMES[(k / FIRST_NAMES.len() + k) % LAST_NAMES.len()]
                ),
                address: format!("{} {}", 100 + (k * 17) % 900, STREETS[k % STREETS.len()]),
                city: city.to_string(),
                state: state.to_string(),
                zip: format!("{:05}", zip + (i as u32 % 9)),
                entry_date: start
                    .checked_add_days(Days::new((k * 11) as u64 % 365))
                    .unwrap_or(start),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_customers_are_deterministic() {
        assert_eq!(customers(5, 2), customers(5, 2));
        assert_eq!(customers(10, 0).len(), 10);
    }

    #[test]
    fn test_customer_fields() {
        let c = &customers(1, 0)[0];
        assert_eq!(c.name, "Ada Lovelace");
        assert_eq!(c.zip, "62701");
        assert_eq!(c.entry_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(Customer::field_names().len(), c.values().len());
    }

    #[test]
    fn test_zip_keeps_leading_zero() {
        let vermont = customers(5, 0).into_iter().find(|c| c.state == "VT").unwrap();
        assert!(vermont.zip.starts_with('0'));
    }
}
