//! Entity Store collaborator contract.
//!
//! The store is the single source of truth; this core performs no
//! client-side locking. Concurrent booking transitions are arbitrated by
//! the compare-and-set in [`EntityStore::update_booking_status`], and the
//! favorite insert path is duplicate-tolerant so toggles stay idempotent
//! under races.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::models::{
    Booking, BookingStatus, CatalogService, Favorite, NewBooking, Profile, ServiceOffering,
};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn profile(&self, id: &str) -> Result<Option<Profile>>;

    /// Profiles with role `professional` and status `active`. Only these
    /// profiles have bookable offerings.
    async fn active_professionals(&self) -> Result<Vec<Profile>>;

    async fn catalog_services(&self) -> Result<Vec<CatalogService>>;

    async fn active_offerings(&self) -> Result<Vec<ServiceOffering>>;

    async fn offering(&self, id: i64) -> Result<Option<ServiceOffering>>;

    /// Atomic insert returning the stored record with its generated id.
    async fn insert_booking(&self, new: NewBooking) -> Result<Booking>;

    async fn booking(&self, id: i64) -> Result<Option<Booking>>;

    /// Bookings where the given profile is the client of record, newest first.
    async fn bookings_for_client(&self, client_id: &str) -> Result<Vec<Booking>>;

    /// Bookings where the given profile is the professional of record,
    /// optionally restricted to a status set, newest first.
    async fn bookings_for_professional(
        &self,
        professional_id: &str,
        statuses: Option<&[BookingStatus]>,
    ) -> Result<Vec<Booking>>;

    /// Compare-and-set on the status column. Returns `false` when the row
    /// was not in `expected` (another session already moved it), in which
    /// case the caller must re-read and re-validate.
    async fn update_booking_status(
        &self,
        id: i64,
        expected: BookingStatus,
        to: BookingStatus,
    ) -> Result<bool>;

    async fn favorites_for(&self, client_id: &str) -> Result<Vec<Favorite>>;

    /// Duplicate-tolerant insert. Returns `false` when the pair already
    /// existed; that is not an error.
    async fn insert_favorite(&self, client_id: &str, offering_id: i64) -> Result<bool>;

    /// Returns `false` when no such pair existed.
    async fn delete_favorite(&self, client_id: &str, offering_id: i64) -> Result<bool>;

    /// Completed-booking counts keyed by professional id; feeds the
    /// reputation figure on listings.
    async fn completed_jobs_by_professional(&self) -> Result<HashMap<String, i64>>;
}
