//! SeaORM implementation of UnitOfWork
//!
//! A commit runs inside one database transaction. Mirror updates rewrite only
//! the `bookings_json` column of the target row, reading it inside the same
//! transaction. Commits are additionally serialised in-process so two
//! transactions never read-modify-write the same row concurrently.

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use tokio::sync::Mutex;

use super::codec::{db_err, from_json, to_json};
use super::{event_repository, payment_repository, reservation_repository, user_repository, venue_repository};
use crate::domain::repositories::{Change, MirrorTarget, MirrorUpdate, UnitOfWork};
use crate::domain::reservation::{upsert_summary, BookingSummary, Reservation};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{event, payment, reservation, user, venue};

pub struct SeaOrmUnitOfWork {
    db: DatabaseConnection,
    commit_guard: Mutex<()>,
}

impl SeaOrmUnitOfWork {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            commit_guard: Mutex::new(()),
        }
    }
}

fn missing(entity: &str, id: &str) -> DomainError {
    DomainError::Integrity(format!("{entity} {id} does not exist"))
}

fn with_bookings(
    raw: &str,
    summary: BookingSummary,
) -> DomainResult<String> {
    let mut bookings: Vec<BookingSummary> = from_json("bookings_json", raw)?;
    upsert_summary(&mut bookings, summary);
    to_json(&bookings)
}

async fn load_venue(txn: &DatabaseTransaction, id: &str) -> DomainResult<venue::Model> {
    venue::Entity::find_by_id(id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| missing("venue", id))
}

async fn load_event(txn: &DatabaseTransaction, id: &str) -> DomainResult<event::Model> {
    event::Entity::find_by_id(id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| missing("event", id))
}

async fn load_user(txn: &DatabaseTransaction, id: &str) -> DomainResult<user::Model> {
    user::Entity::find_by_id(id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| missing("user", id))
}

async fn reservation_exists(txn: &DatabaseTransaction, id: &str) -> DomainResult<bool> {
    Ok(reservation::Entity::find_by_id(id)
        .one(txn)
        .await
        .map_err(db_err)?
        .is_some())
}

async fn insert_reservation(txn: &DatabaseTransaction, r: &Reservation) -> DomainResult<()> {
    if reservation_exists(txn, &r.id).await? {
        return Err(DomainError::Conflict(format!("reservation {}", r.id)));
    }
    load_venue(txn, &r.venue.id).await?;
    load_event(txn, &r.event.id).await?;
    load_user(txn, &r.user.id).await?;
    reservation_repository::domain_to_active(r)?
        .insert(txn)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn apply_mirror(txn: &DatabaseTransaction, update: MirrorUpdate) -> DomainResult<()> {
    let MirrorUpdate { target, summary } = update;
    match target {
        MirrorTarget::Venue(id) => {
            let row = load_venue(txn, &id).await?;
            let json = with_bookings(&row.bookings_json, summary)?;
            let mut active: venue::ActiveModel = row.into();
            active.bookings_json = Set(json);
            active.update(txn).await.map_err(db_err)?;
        }
        MirrorTarget::Event(id) => {
            let row = load_event(txn, &id).await?;
            let json = with_bookings(&row.bookings_json, summary)?;
            let mut active: event::ActiveModel = row.into();
            active.bookings_json = Set(json);
            active.update(txn).await.map_err(db_err)?;
        }
        MirrorTarget::User(id) => {
            let row = load_user(txn, &id).await?;
            let json = with_bookings(&row.bookings_json, summary)?;
            let mut active: user::ActiveModel = row.into();
            active.bookings_json = Set(json);
            active.update(txn).await.map_err(db_err)?;
        }
    }
    Ok(())
}

async fn apply(txn: &DatabaseTransaction, change: Change) -> DomainResult<()> {
    match change {
        Change::InsertVenue(v) => {
            if venue::Entity::find_by_id(v.id.as_str())
                .one(txn)
                .await
                .map_err(db_err)?
                .is_some()
            {
                return Err(DomainError::Conflict(format!("venue {}", v.id)));
            }
            venue_repository::domain_to_active(&v)?
                .insert(txn)
                .await
                .map_err(db_err)?;
        }
        Change::ReviseVenue { id, details } => {
            let mut current = venue_repository::model_to_domain(load_venue(txn, &id).await?)?;
            current.revise(details);
            let mut active = venue_repository::domain_to_active(&current)?;
            // bookings are owned by mirror updates
            active.bookings_json = sea_orm::ActiveValue::NotSet;
            active.update(txn).await.map_err(db_err)?;
        }
        Change::DeactivateVenue(id) => {
            let mut active: venue::ActiveModel = load_venue(txn, &id).await?.into();
            active.active = Set(false);
            active.update(txn).await.map_err(db_err)?;
        }
        Change::InsertEvent(e) => {
            if event::Entity::find_by_id(e.id.as_str())
                .one(txn)
                .await
                .map_err(db_err)?
                .is_some()
            {
                return Err(DomainError::Conflict(format!("event {}", e.id)));
            }
            event_repository::domain_to_active(&e)?
                .insert(txn)
                .await
                .map_err(db_err)?;
        }
        Change::DeactivateEvent(id) => {
            let mut active: event::ActiveModel = load_event(txn, &id).await?.into();
            active.active = Set(false);
            active.update(txn).await.map_err(db_err)?;
        }
        Change::InsertUser(u) => {
            let taken = user::Entity::find()
                .filter(
                    user::Column::Id
                        .eq(u.id.as_str())
                        .or(user::Column::Email.eq(u.email.trim().to_lowercase())),
                )
                .one(txn)
                .await
                .map_err(db_err)?;
            if taken.is_some() {
                return Err(DomainError::Conflict(format!("user {}", u.id)));
            }
            user_repository::domain_to_active(&u)?
                .insert(txn)
                .await
                .map_err(db_err)?;
        }
        Change::InsertReservation(r) => insert_reservation(txn, &r).await?,
        Change::PutReservation(r) => {
            if !reservation_exists(txn, &r.id).await? {
                return Err(missing("reservation", &r.id));
            }
            reservation_repository::domain_to_active(&r)?
                .update(txn)
                .await
                .map_err(db_err)?;
        }
        Change::InsertPayment(p) => {
            let existing = payment::Entity::find()
                .filter(payment::Column::ReservationId.eq(p.reservation_id.as_str()))
                .one(txn)
                .await
                .map_err(db_err)?;
            if existing.is_some() {
                return Err(DomainError::Conflict(format!(
                    "payment for reservation {}",
                    p.reservation_id
                )));
            }
            if !reservation_exists(txn, &p.reservation_id).await? {
                return Err(missing("reservation", &p.reservation_id));
            }
            payment_repository::domain_to_active(&p)?
                .insert(txn)
                .await
                .map_err(db_err)?;
        }
        Change::PutPayment(p) => {
            if payment::Entity::find_by_id(p.id.as_str())
                .one(txn)
                .await
                .map_err(db_err)?
                .is_none()
            {
                return Err(missing("payment", &p.id));
            }
            payment_repository::domain_to_active(&p)?
                .update(txn)
                .await
                .map_err(db_err)?;
        }
        Change::DeletePayment(id) => {
            let result = payment::Entity::delete_by_id(id.as_str())
                .exec(txn)
                .await
                .map_err(db_err)?;
            if result.rows_affected == 0 {
                return Err(missing("payment", &id));
            }
        }
        Change::Mirror(update) => apply_mirror(txn, update).await?,
    }
    Ok(())
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn commit(&self, changes: Vec<Change>) -> DomainResult<()> {
        let _guard = self.commit_guard.lock().await;
        let txn = self.db.begin().await.map_err(db_err)?;

        let count = changes.len();
        for change in changes {
            let label = change.label();
            if let Err(e) = apply(&txn, change).await {
                debug!("Commit aborted at {}: {}", label, e);
                txn.rollback().await.map_err(db_err)?;
                return Err(e);
            }
        }

        txn.commit().await.map_err(db_err)?;
        debug!("Committed {} change(s)", count);
        Ok(())
    }
}
