//! Denormalization synchronizer
//!
//! The canonical `Reservation` is the source of truth. Venue, event and user
//! records each embed a `BookingSummary` of it; this module produces the
//! mirror changes that keep those copies in step. Callers put them in the
//! same commit as the reservation write.

use crate::domain::repositories::{Change, MirrorTarget, MirrorUpdate};
use crate::domain::reservation::{BookingSummary, Reservation};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

fn targets(reservation: &Reservation) -> [MirrorTarget; 3] {
    [
        MirrorTarget::Venue(reservation.venue.id.clone()),
        MirrorTarget::Event(reservation.event.id.clone()),
        MirrorTarget::User(reservation.user.id.clone()),
    ]
}

/// One mirror upsert per aggregate that embeds `reservation`.
pub fn mirror_changes(reservation: &Reservation) -> Vec<Change> {
    let summary = reservation.summary();
    targets(reservation)
        .into_iter()
        .map(|target| {
            Change::Mirror(MirrorUpdate {
                target,
                summary: summary.clone(),
            })
        })
        .collect()
}

fn mirrored_status(
    bookings: &[BookingSummary],
    reservation: &Reservation,
    target: &MirrorTarget,
) -> DomainResult<()> {
    let copies: Vec<&BookingSummary> = bookings.iter().filter(|b| b.id == reservation.id).collect();
    match copies.as_slice() {
        [one] if one.status == reservation.status && one.dates == reservation.dates => Ok(()),
        [one] => Err(DomainError::Integrity(format!(
            "{} {} mirrors reservation {} as {}, canonical is {}",
            target.entity(),
            target.id(),
            reservation.id,
            one.status,
            reservation.status
        ))),
        other => Err(DomainError::Integrity(format!(
            "{} {} holds {} copies of reservation {}",
            target.entity(),
            target.id(),
            other.len(),
            reservation.id
        ))),
    }
}

/// Confirm that all three embedded copies agree with the canonical record.
pub async fn verify_mirrors(
    repos: &dyn RepositoryProvider,
    reservation: &Reservation,
) -> DomainResult<()> {
    for target in targets(reservation) {
        let bookings = match &target {
            MirrorTarget::Venue(id) => repos.venues().find_by_id(id).await?.map(|v| v.bookings),
            MirrorTarget::Event(id) => repos.events().find_by_id(id).await?.map(|e| e.bookings),
            MirrorTarget::User(id) => repos.users().find_by_id(id).await?.map(|u| u.bookings),
        }
        .ok_or_else(|| {
            DomainError::Integrity(format!("{} {} does not exist", target.entity(), target.id()))
        })?;
        mirrored_status(&bookings, reservation, &target)?;
    }
    Ok(())
}
