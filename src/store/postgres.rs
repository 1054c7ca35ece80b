//! Postgres-backed entity store.
//!
//! Table and column names follow the platform schema (`profiles`,
//! `services`, `professional_services`, `bookings`, `favorites`); rows are
//! decoded into domain types at this boundary, including the closed status
//! and role enumerations.

use crate::models::{
    Booking, BookingStatus, CatalogService, Favorite, NewBooking, PaymentStatus, Profile,
    ProfileStatus, Role, ServiceOffering,
};
use crate::store::EntityStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use std::env;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    /// Connect using `DATABASE_URL` (a `.env` file is honored).
    pub async fn connect_from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;
        let pool = PgPoolOptions::new()
            .connect(&database_url)
            .await
            .context("Failed to connect to DB")?;
        Ok(PgStore { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct ProfileRow {
    id: String,
    full_name: String,
    email: String,
    role: String,
    status: String,
    location: Option<String>,
    phone: Option<String>,
    bio: Option<String>,
}

impl ProfileRow {
    fn into_profile(self) -> Result<Profile> {
        Ok(Profile {
            role: self.role.parse::<Role>()?,
            status: self.status.parse::<ProfileStatus>()?,
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            location: self.location,
            phone: self.phone,
            bio: self.bio,
        })
    }
}

#[derive(FromRow)]
struct ServiceRow {
    id: i64,
    name: String,
    category: Option<String>,
    description: Option<String>,
    is_active: bool,
    professionals_count: i64,
}

impl From<ServiceRow> for CatalogService {
    fn from(r: ServiceRow) -> Self {
        CatalogService {
            id: r.id,
            name: r.name,
            category: r.category,
            description: r.description,
            is_active: r.is_active,
            professionals_count: r.professionals_count,
        }
    }
}

#[derive(FromRow)]
struct OfferingRow {
    id: i64,
    professional_id: String,
    service_id: i64,
    custom_title: Option<String>,
    rate: Option<f64>,
    notes: Option<String>,
    is_active: bool,
}

impl From<OfferingRow> for ServiceOffering {
    fn from(r: OfferingRow) -> Self {
        ServiceOffering {
            id: r.id,
            professional_id: r.professional_id,
            service_id: r.service_id,
            custom_title: r.custom_title,
            rate: r.rate,
            notes: r.notes,
            is_active: r.is_active,
        }
    }
}

#[derive(FromRow)]
struct BookingRow {
    id: i64,
    client_id: String,
    professional_id: String,
    service_id: Option<i64>,
    title: String,
    description: Option<String>,
    scheduled_at: Option<DateTime<Utc>>,
    budget: f64,
    status: String,
    payment_status: String,
    created_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking> {
        Ok(Booking {
            status: self.status.parse::<BookingStatus>()?,
            payment_status: self.payment_status.parse::<PaymentStatus>()?,
            id: self.id,
            client_id: self.client_id,
            professional_id: self.professional_id,
            service_id: self.service_id,
            title: self.title,
            description: self.description,
            scheduled_at: self.scheduled_at,
            budget: self.budget,
            created_at: self.created_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, client_id, professional_id, service_id, title, description, \
     scheduled_at, budget, status, payment_status, created_at";

#[async_trait]
impl EntityStore for PgStore {
    async fn profile(&self, id: &str) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, full_name, email, role, status, location, phone, bio
             FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch profile")?;
        row.map(ProfileRow::into_profile).transpose()
    }

    async fn active_professionals(&self) -> Result<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, full_name, email, role, status, location, phone, bio
             FROM profiles WHERE role = $1 AND status = $2",
        )
        .bind(Role::Professional.as_str())
        .bind(ProfileStatus::Active.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch professionals")?;
        rows.into_iter().map(ProfileRow::into_profile).collect()
    }

    async fn catalog_services(&self) -> Result<Vec<CatalogService>> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            "SELECT id, name, category, description, is_active, professionals_count
             FROM services",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch services")?;
        Ok(rows.into_iter().map(CatalogService::from).collect())
    }

    async fn active_offerings(&self) -> Result<Vec<ServiceOffering>> {
        let rows = sqlx::query_as::<_, OfferingRow>(
            "SELECT id, professional_id, service_id, custom_title, rate, notes, is_active
             FROM professional_services WHERE is_active = TRUE",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch active offerings")?;
        Ok(rows.into_iter().map(ServiceOffering::from).collect())
    }

    async fn offering(&self, id: i64) -> Result<Option<ServiceOffering>> {
        let row = sqlx::query_as::<_, OfferingRow>(
            "SELECT id, professional_id, service_id, custom_title, rate, notes, is_active
             FROM professional_services WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch offering")?;
        Ok(row.map(ServiceOffering::from))
    }

    async fn insert_booking(&self, new: NewBooking) -> Result<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "INSERT INTO bookings (client_id, professional_id, service_id, title, description,
                                   scheduled_at, budget, status, payment_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(&new.client_id)
        .bind(&new.professional_id)
        .bind(new.service_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.scheduled_at)
        .bind(new.budget)
        .bind(new.status.as_str())
        .bind(new.payment_status.as_str())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert booking")?;
        row.into_booking()
    }

    async fn booking(&self, id: i64) -> Result<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch booking")?;
        row.map(BookingRow::into_booking).transpose()
    }

    async fn bookings_for_client(&self, client_id: &str) -> Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             WHERE client_id = $1 ORDER BY created_at DESC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch client bookings")?;
        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn bookings_for_professional(
        &self,
        professional_id: &str,
        statuses: Option<&[BookingStatus]>,
    ) -> Result<Vec<Booking>> {
        let rows = match statuses {
            Some(wanted) => {
                let wanted: Vec<String> =
                    wanted.iter().map(|s| s.as_str().to_string()).collect();
                sqlx::query_as::<_, BookingRow>(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings
                     WHERE professional_id = $1 AND status = ANY($2)
                     ORDER BY created_at DESC"
                ))
                .bind(professional_id)
                .bind(wanted)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, BookingRow>(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings
                     WHERE professional_id = $1 ORDER BY created_at DESC"
                ))
                .bind(professional_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .context("Failed to fetch professional bookings")?;
        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn update_booking_status(
        &self,
        id: i64,
        expected: BookingStatus,
        to: BookingStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE bookings SET status = $1 WHERE id = $2 AND status = $3",
        )
        .bind(to.as_str())
        .bind(id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .context("Failed to update booking status")?;
        Ok(result.rows_affected() == 1)
    }

    async fn favorites_for(&self, client_id: &str) -> Result<Vec<Favorite>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT user_id, professional_service_id FROM favorites WHERE user_id = $1",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch favorites")?;
        Ok(rows
            .into_iter()
            .map(|(client_id, offering_id)| Favorite {
                client_id,
                offering_id,
            })
            .collect())
    }

    async fn insert_favorite(&self, client_id: &str, offering_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO favorites (user_id, professional_service_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, professional_service_id) DO NOTHING",
        )
        .bind(client_id)
        .bind(offering_id)
        .execute(&self.pool)
        .await
        .context("Failed to insert favorite")?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_favorite(&self, client_id: &str, offering_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM favorites WHERE user_id = $1 AND professional_service_id = $2",
        )
        .bind(client_id)
        .bind(offering_id)
        .execute(&self.pool)
        .await
        .context("Failed to delete favorite")?;
        Ok(result.rows_affected() == 1)
    }

    async fn completed_jobs_by_professional(&self) -> Result<HashMap<String, i64>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT professional_id, COUNT(*) FROM bookings
             WHERE status = $1 GROUP BY professional_id",
        )
        .bind(BookingStatus::Completed.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to count completed bookings")?;
        Ok(rows.into_iter().collect())
    }
}
