//! Booking validator
//!
//! Checks a requested date list against a venue's occupancy. The result is
//! advisory on its own: `ReservationService::create` repeats the check under
//! the venue lock right before committing.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;

use super::availability::occupied_dates;
use crate::domain::venue::Venue;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::SharedClock;

/// Sort and de-duplicate requested dates. An empty request is invalid.
pub fn normalize_dates(dates: &[NaiveDate]) -> DomainResult<Vec<NaiveDate>> {
    if dates.is_empty() {
        return Err(DomainError::InvalidReservationDates(
            "at least one date is required".into(),
        ));
    }
    Ok(dates
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect())
}

/// Every date must be strictly after `today`.
pub fn require_future(dates: &[NaiveDate], today: NaiveDate) -> DomainResult<()> {
    let stale: Vec<String> = dates
        .iter()
        .filter(|d| **d <= today)
        .map(NaiveDate::to_string)
        .collect();
    if stale.is_empty() {
        Ok(())
    } else {
        Err(DomainError::InvalidReservationDates(format!(
            "dates must be after {today}: {}",
            stale.join(", ")
        )))
    }
}

/// Reject `requested` if any of it is already occupied at `venue`.
pub fn check_against(venue: &Venue, requested: &[NaiveDate], today: NaiveDate) -> DomainResult<()> {
    let occupied = occupied_dates(&venue.bookings, today);
    let clashes: Vec<NaiveDate> = requested
        .iter()
        .filter(|d| occupied.binary_search(d).is_ok())
        .copied()
        .collect();
    if clashes.is_empty() {
        Ok(())
    } else {
        Err(DomainError::AvailabilityConflict {
            venue_id: venue.id.clone(),
            dates: clashes,
        })
    }
}

pub struct BookingValidator {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
}

impl BookingValidator {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self { repos, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Load a venue that is still bookable
    pub async fn active_venue(&self, venue_id: &str) -> DomainResult<Venue> {
        self.repos
            .venues()
            .find_by_id(venue_id)
            .await?
            .filter(|v| v.active)
            .ok_or_else(|| DomainError::VenueNotFound(venue_id.to_string()))
    }

    pub async fn occupied_dates(&self, venue_id: &str) -> DomainResult<Vec<NaiveDate>> {
        let venue = self.active_venue(venue_id).await?;
        Ok(occupied_dates(&venue.bookings, self.today()))
    }

    /// Normalize `dates` and check them against the venue's current
    /// occupancy. Returns the normalized list on success.
    pub async fn validate(&self, dates: &[NaiveDate], venue_id: &str) -> DomainResult<Vec<NaiveDate>> {
        let today = self.today();
        let dates = normalize_dates(dates)?;
        require_future(&dates, today)?;
        let venue = self.active_venue(venue_id).await?;
        check_against(&venue, &dates, today)?;
        Ok(dates)
    }

    /// Availability as a yes/no answer. Only an occupancy clash maps to
    /// `false`; bad input and unknown venues stay errors.
    pub async fn are_dates_available(&self, dates: &[NaiveDate], venue_id: &str) -> DomainResult<bool> {
        match self.validate(dates, venue_id).await {
            Ok(_) => Ok(true),
            Err(DomainError::AvailabilityConflict { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{Change, MirrorTarget, MirrorUpdate};
    use crate::domain::reservation::model::tests::{date, sample_reservation};
    use crate::domain::venue::model::tests::details;
    use crate::domain::venue::VenueType;
    use crate::domain::ReservationStatus;
    use crate::infrastructure::storage::InMemoryStore;
    use crate::shared::FixedClock;

    async fn setup(booked: &[(NaiveDate, ReservationStatus)]) -> BookingValidator {
        let store = Arc::new(InMemoryStore::new());
        let mut venue = Venue::new("v1", details("Salon A", VenueType::Medium, 150));
        for (i, (day, status)) in booked.iter().enumerate() {
            let mut r = sample_reservation(vec![*day]);
            r.id = format!("r{i}");
            r.status = *status;
            venue.bookings.push(r.summary());
        }
        store
            .unit_of_work()
            .commit(vec![Change::InsertVenue(venue)])
            .await
            .unwrap();
        let clock = Arc::new(FixedClock::new(date(2025, 12, 1)));
        BookingValidator::new(store, clock)
    }

    #[test]
    fn normalize_sorts_and_dedups() {
        let dates = normalize_dates(&[date(2025, 12, 12), date(2025, 12, 10), date(2025, 12, 12)])
            .unwrap();
        assert_eq!(dates, vec![date(2025, 12, 10), date(2025, 12, 12)]);
        assert!(matches!(
            normalize_dates(&[]),
            Err(DomainError::InvalidReservationDates(_))
        ));
    }

    #[tokio::test]
    async fn today_is_rejected_tomorrow_is_fine() {
        let validator = setup(&[]).await;
        assert!(matches!(
            validator.validate(&[date(2025, 12, 1)], "v1").await,
            Err(DomainError::InvalidReservationDates(_))
        ));
        assert!(matches!(
            validator.validate(&[date(2025, 11, 30)], "v1").await,
            Err(DomainError::InvalidReservationDates(_))
        ));
        assert!(validator.validate(&[date(2025, 12, 2)], "v1").await.is_ok());
    }

    #[tokio::test]
    async fn conflict_names_offending_dates() {
        let validator = setup(&[(date(2025, 12, 10), ReservationStatus::Programada)]).await;
        let err = validator
            .validate(&[date(2025, 12, 9), date(2025, 12, 10)], "v1")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::AvailabilityConflict {
                venue_id: "v1".into(),
                dates: vec![date(2025, 12, 10)],
            }
        );
    }

    #[tokio::test]
    async fn day_after_last_occupied_is_accepted() {
        let validator = setup(&[(date(2025, 12, 10), ReservationStatus::Programada)]).await;
        assert_eq!(
            validator.validate(&[date(2025, 12, 11)], "v1").await.unwrap(),
            vec![date(2025, 12, 11)]
        );
    }

    #[tokio::test]
    async fn cancelled_dates_are_free_again() {
        let validator = setup(&[(date(2025, 12, 10), ReservationStatus::Cancelada)]).await;
        assert!(validator
            .are_dates_available(&[date(2025, 12, 10)], "v1")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn availability_answers_false_only_on_conflict() {
        let validator = setup(&[(date(2025, 12, 10), ReservationStatus::Programada)]).await;
        assert!(!validator
            .are_dates_available(&[date(2025, 12, 10)], "v1")
            .await
            .unwrap());
        assert!(matches!(
            validator.are_dates_available(&[date(2025, 12, 10)], "nope").await,
            Err(DomainError::VenueNotFound(_))
        ));
        assert!(matches!(
            validator.are_dates_available(&[], "v1").await,
            Err(DomainError::InvalidReservationDates(_))
        ));
    }

    #[tokio::test]
    async fn inactive_venue_is_not_found() {
        let validator = setup(&[]).await;
        validator
            .repos
            .unit_of_work()
            .commit(vec![Change::DeactivateVenue("v1".into())])
            .await
            .unwrap();
        assert_eq!(
            validator.occupied_dates("v1").await.unwrap_err(),
            DomainError::VenueNotFound("v1".into())
        );
    }

    #[tokio::test]
    async fn occupied_dates_follow_mirror_updates() {
        let validator = setup(&[(date(2025, 12, 10), ReservationStatus::Programada)]).await;
        assert_eq!(
            validator.occupied_dates("v1").await.unwrap(),
            vec![date(2025, 12, 10)]
        );

        let mut r = sample_reservation(vec![date(2025, 12, 10)]);
        r.id = "r0".into();
        r.status = ReservationStatus::Cancelada;
        validator
            .repos
            .unit_of_work()
            .commit(vec![Change::Mirror(MirrorUpdate {
                target: MirrorTarget::Venue("v1".into()),
                summary: r.summary(),
            })])
            .await
            .unwrap();
        assert!(validator.occupied_dates("v1").await.unwrap().is_empty());
    }
}
