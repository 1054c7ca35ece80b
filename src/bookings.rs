//! Booking Lifecycle Manager.
//!
//! Owns the booking state machine and the ownership rules around it.
//! States: pending -> accepted -> completed, with client-initiated
//! cancellation from any non-terminal state. `completed` and `cancelled`
//! are terminal; nothing moves a booking out of them.
//!
//! All status changes go through a compare-and-set on the store, so a
//! transition racing another session loses cleanly: the loser re-reads the
//! row and reports the change as invalid against the now-current state.

use crate::error::{MarketplaceError, Result};
use crate::identity::Actor;
use crate::models::{Booking, BookingStatus, NewBooking, PaymentStatus, ProfileStatus, Role};
use crate::store::EntityStore;
use chrono::{DateTime, Utc};

/// The actor's relationship to the booking being transitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Party {
    Client,
    Professional,
}

/// Single source of truth for transition legality.
fn transition_allowed(from: BookingStatus, to: BookingStatus, by: Party) -> bool {
    use BookingStatus::*;
    if from.is_terminal() {
        return false;
    }
    match (from, to) {
        (Pending, Accepted) => by == Party::Professional,
        (Pending | Accepted | InProgress, Completed) => true,
        (Pending | Accepted | InProgress, Cancelled) => by == Party::Client,
        _ => false,
    }
}

/// Client request to book an offering off a listing.
#[derive(Debug, Clone)]
pub struct NewBookingRequest {
    pub offering_id: i64,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub hours: u32,
    pub description: Option<String>,
    /// Overrides the rate-derived budget when supplied.
    pub budget: Option<f64>,
}

/// Creates a booking in its initial `pending` state. A single record
/// write; validation failures happen before anything is written.
pub async fn create_booking(
    store: &dyn EntityStore,
    actor: &Actor,
    request: NewBookingRequest,
) -> Result<Booking> {
    if actor.role != Role::Client {
        return Err(MarketplaceError::permission(
            "only clients can create bookings",
        ));
    }
    if request.hours == 0 {
        return Err(MarketplaceError::validation("hours must be positive"));
    }
    let scheduled_at = request
        .scheduled_at
        .ok_or_else(|| MarketplaceError::validation("scheduled date is required"))?;

    let offering = store
        .offering(request.offering_id)
        .await?
        .ok_or_else(|| MarketplaceError::validation("unknown service offering"))?;
    if !offering.is_active {
        return Err(MarketplaceError::validation("offering is not published"));
    }
    let professional = store
        .profile(&offering.professional_id)
        .await?
        .ok_or_else(|| MarketplaceError::validation("professional profile not found"))?;
    // Only an active professional's offerings are listable, so only those
    // are bookable.
    if professional.role != Role::Professional || professional.status != ProfileStatus::Active {
        return Err(MarketplaceError::validation("professional is not active"));
    }

    let title = match &offering.custom_title {
        Some(custom) => custom.clone(),
        None => {
            let services = store.catalog_services().await?;
            services
                .into_iter()
                .find(|s| s.id == offering.service_id)
                .map(|s| s.name)
                .ok_or_else(|| MarketplaceError::validation("catalog service not found"))?
        }
    };

    let budget = request
        .budget
        .unwrap_or_else(|| offering.effective_rate() * f64::from(request.hours));
    let description = request
        .description
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format!("Booking for {title}"));

    let booking = store
        .insert_booking(NewBooking {
            client_id: actor.id.clone(),
            professional_id: professional.id,
            service_id: Some(offering.service_id),
            title,
            description: Some(description),
            scheduled_at: Some(scheduled_at),
            budget,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
        })
        .await?;
    Ok(booking)
}

/// Moves a booking to `target` on behalf of `actor`.
///
/// Identity fields (client, professional, service) never change; only the
/// status column is written, and only through the store's compare-and-set.
pub async fn transition_booking(
    store: &dyn EntityStore,
    actor: &Actor,
    booking_id: i64,
    target: BookingStatus,
) -> Result<Booking> {
    let booking = store
        .booking(booking_id)
        .await?
        .ok_or_else(|| MarketplaceError::validation("booking not found"))?;

    let party = party_of(actor, &booking)?;
    let from = booking.status;
    if !transition_allowed(from, target, party) {
        return Err(MarketplaceError::InvalidTransition { from, to: target });
    }

    if store.update_booking_status(booking_id, from, target).await? {
        return Ok(Booking {
            status: target,
            ..booking
        });
    }

    // Lost the optimistic-concurrency race: another session moved the
    // booking first. Report against whatever state it is in now.
    let current = store
        .booking(booking_id)
        .await?
        .ok_or_else(|| MarketplaceError::validation("booking not found"))?;
    Err(MarketplaceError::InvalidTransition {
        from: current.status,
        to: target,
    })
}

/// Reads one booking on behalf of a client. A booking belonging to a
/// different client is a permission failure, not an empty result.
pub async fn booking_for_client(
    store: &dyn EntityStore,
    actor: &Actor,
    booking_id: i64,
) -> Result<Booking> {
    let booking = store
        .booking(booking_id)
        .await?
        .ok_or_else(|| MarketplaceError::validation("booking not found"))?;
    if booking.client_id != actor.id {
        return Err(MarketplaceError::permission(
            "booking belongs to a different client",
        ));
    }
    Ok(booking)
}

/// All bookings where the actor is the client of record.
pub async fn list_bookings_for_client(
    store: &dyn EntityStore,
    actor: &Actor,
) -> Result<Vec<Booking>> {
    Ok(store.bookings_for_client(&actor.id).await?)
}

/// Bookings where the actor is the professional of record, optionally
/// restricted to a status set (the jobs page asks for
/// pending/accepted/in_progress).
pub async fn list_bookings_for_professional(
    store: &dyn EntityStore,
    actor: &Actor,
    statuses: Option<&[BookingStatus]>,
) -> Result<Vec<Booking>> {
    if actor.role != Role::Professional {
        return Err(MarketplaceError::permission(
            "only professionals can list their jobs",
        ));
    }
    Ok(store.bookings_for_professional(&actor.id, statuses).await?)
}

fn party_of(actor: &Actor, booking: &Booking) -> Result<Party> {
    if actor.id == booking.client_id {
        Ok(Party::Client)
    } else if actor.id == booking.professional_id {
        Ok(Party::Professional)
    } else {
        Err(MarketplaceError::permission(
            "actor is neither client nor professional on this booking",
        ))
    }
}
