//! Availability calculator
//!
//! Pure derivation of a venue's occupied dates from its embedded booking
//! summaries.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::reservation::{BookingSummary, ReservationStatus};

/// Dates from non-cancelled bookings that fall on or after `today`,
/// deduplicated and ascending.
pub fn occupied_dates(bookings: &[BookingSummary], today: NaiveDate) -> Vec<NaiveDate> {
    bookings
        .iter()
        .filter(|b| b.status != ReservationStatus::Cancelada)
        .flat_map(|b| b.dates.iter().copied())
        .filter(|d| *d >= today)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reservation::EntityRef;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn booking(id: &str, status: ReservationStatus, dates: &[NaiveDate]) -> BookingSummary {
        BookingSummary {
            id: id.into(),
            status,
            venue: EntityRef::new("v1", "Salon A"),
            user: EntityRef::new("u1", "Ana"),
            event: EntityRef::new("e1", "Wedding"),
            dates: dates.to_vec(),
            services: None,
        }
    }

    #[test]
    fn empty_for_venue_without_bookings() {
        assert!(occupied_dates(&[], d(12, 1)).is_empty());
    }

    #[test]
    fn skips_cancelled_and_past_dates() {
        let bookings = vec![
            booking("r1", ReservationStatus::Programada, &[d(11, 30), d(12, 10)]),
            booking("r2", ReservationStatus::Cancelada, &[d(12, 15)]),
            booking("r3", ReservationStatus::Completada, &[d(11, 20)]),
        ];
        assert_eq!(occupied_dates(&bookings, d(12, 1)), vec![d(12, 10)]);
    }

    #[test]
    fn today_counts_as_occupied() {
        let bookings = vec![booking("r1", ReservationStatus::Programada, &[d(12, 1)])];
        assert_eq!(occupied_dates(&bookings, d(12, 1)), vec![d(12, 1)]);
    }

    #[test]
    fn sorted_and_deduplicated() {
        let bookings = vec![
            booking("r1", ReservationStatus::Programada, &[d(12, 20), d(12, 10)]),
            booking("r2", ReservationStatus::Programada, &[d(12, 10), d(12, 5)]),
        ];
        let dates = occupied_dates(&bookings, d(12, 1));
        assert_eq!(dates, vec![d(12, 5), d(12, 10), d(12, 20)]);
        // same input, same answer
        assert_eq!(occupied_dates(&bookings, d(12, 1)), dates);
    }

    #[test]
    fn never_contains_cancelled_or_past_dates() {
        let bookings = vec![
            booking("a", ReservationStatus::Cancelada, &[d(12, 3), d(12, 4)]),
            booking("b", ReservationStatus::Programada, &[d(12, 1), d(12, 2), d(12, 4)]),
        ];
        let today = d(12, 2);
        let dates = occupied_dates(&bookings, today);
        assert!(dates.iter().all(|x| *x >= today));
        assert!(!dates.contains(&d(12, 3)));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(dates, vec![d(12, 2), d(12, 4)]);
    }
}
