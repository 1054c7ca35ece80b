//! In-memory entity store.
//!
//! Upholds the same contract as the Postgres store, including the
//! compare-and-set status update and duplicate-tolerant favorite insert.
//! Used by the test suite and by single-process embeddings.

use crate::models::{
    Booking, BookingStatus, CatalogService, Favorite, NewBooking, Profile, ServiceOffering,
};
use crate::store::EntityStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    profiles: HashMap<String, Profile>,
    services: BTreeMap<i64, CatalogService>,
    offerings: BTreeMap<i64, ServiceOffering>,
    bookings: BTreeMap<i64, Booking>,
    favorites: HashSet<(String, i64)>,
    next_booking_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn add_profile(&self, profile: Profile) {
        let mut inner = self.inner.lock().unwrap();
        inner.profiles.insert(profile.id.clone(), profile);
    }

    pub fn add_service(&self, service: CatalogService) {
        let mut inner = self.inner.lock().unwrap();
        inner.services.insert(service.id, service);
    }

    pub fn add_offering(&self, offering: ServiceOffering) {
        let mut inner = self.inner.lock().unwrap();
        inner.offerings.insert(offering.id, offering);
    }

    pub fn set_offering_active(&self, id: i64, active: bool) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(offering) = inner.offerings.get_mut(&id) {
            offering.is_active = active;
        }
    }

    pub fn remove_profile(&self, id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.profiles.remove(id);
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn profile(&self, id: &str) -> Result<Option<Profile>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.profiles.get(id).cloned())
    }

    async fn active_professionals(&self) -> Result<Vec<Profile>> {
        use crate::models::{ProfileStatus, Role};
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .profiles
            .values()
            .filter(|p| p.role == Role::Professional && p.status == ProfileStatus::Active)
            .cloned()
            .collect())
    }

    async fn catalog_services(&self) -> Result<Vec<CatalogService>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.services.values().cloned().collect())
    }

    async fn active_offerings(&self) -> Result<Vec<ServiceOffering>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .offerings
            .values()
            .filter(|o| o.is_active)
            .cloned()
            .collect())
    }

    async fn offering(&self, id: i64) -> Result<Option<ServiceOffering>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.offerings.get(&id).cloned())
    }

    async fn insert_booking(&self, new: NewBooking) -> Result<Booking> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_booking_id += 1;
        let booking = Booking {
            id: inner.next_booking_id,
            client_id: new.client_id,
            professional_id: new.professional_id,
            service_id: new.service_id,
            title: new.title,
            description: new.description,
            scheduled_at: new.scheduled_at,
            budget: new.budget,
            status: new.status,
            payment_status: new.payment_status,
            created_at: Utc::now(),
        };
        inner.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn booking(&self, id: i64) -> Result<Option<Booking>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.bookings.get(&id).cloned())
    }

    async fn bookings_for_client(&self, client_id: &str) -> Result<Vec<Booking>> {
        let inner = self.inner.lock().unwrap();
        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| b.client_id == client_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(bookings)
    }

    async fn bookings_for_professional(
        &self,
        professional_id: &str,
        statuses: Option<&[BookingStatus]>,
    ) -> Result<Vec<Booking>> {
        let inner = self.inner.lock().unwrap();
        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| b.professional_id == professional_id)
            .filter(|b| statuses.map_or(true, |wanted| wanted.contains(&b.status)))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(bookings)
    }

    async fn update_booking_status(
        &self,
        id: i64,
        expected: BookingStatus,
        to: BookingStatus,
    ) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner.bookings.get_mut(&id) {
            Some(booking) if booking.status == expected => {
                booking.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn favorites_for(&self, client_id: &str) -> Result<Vec<Favorite>> {
        let inner = self.inner.lock().unwrap();
        let mut favorites: Vec<Favorite> = inner
            .favorites
            .iter()
            .filter(|(client, _)| client.as_str() == client_id)
            .map(|(client, offering)| Favorite {
                client_id: client.clone(),
                offering_id: *offering,
            })
            .collect();
        favorites.sort_by_key(|f| f.offering_id);
        Ok(favorites)
    }

    async fn insert_favorite(&self, client_id: &str, offering_id: i64) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.favorites.insert((client_id.to_string(), offering_id)))
    }

    async fn delete_favorite(&self, client_id: &str, offering_id: i64) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.favorites.remove(&(client_id.to_string(), offering_id)))
    }

    async fn completed_jobs_by_professional(&self) -> Result<HashMap<String, i64>> {
        let inner = self.inner.lock().unwrap();
        let mut counts: HashMap<String, i64> = HashMap::new();
        for booking in inner.bookings.values() {
            if booking.status == BookingStatus::Completed {
                *counts.entry(booking.professional_id.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}
