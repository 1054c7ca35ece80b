//! Booking lifecycle and marketplace-matching engine for the ProConnect
//! services marketplace.
//!
//! This crate is the library-level core consumed by presentation
//! collaborators (dashboards, listing pages, booking-detail pages) over
//! in-process calls. It owns three things: the public listing set
//! ([`listings`]), the booking state machine ([`bookings`]), and the
//! client/offering favorites relation ([`favorites`]). Durable storage is
//! an external collaborator reached through [`store::EntityStore`];
//! identity is an external collaborator reached through
//! [`identity::IdentityProvider`].

pub mod bookings;
pub mod error;
pub mod favorites;
pub mod identity;
pub mod listings;
pub mod models;
pub mod store;

#[cfg(test)]
mod testutil;

pub use bookings::{
    booking_for_client, create_booking, list_bookings_for_client,
    list_bookings_for_professional, transition_booking, NewBookingRequest,
};
pub use error::{MarketplaceError, Result};
pub use favorites::{favorite_listings, list_favorites, toggle_favorite, ToggleOutcome};
pub use identity::{Actor, IdentityProvider, StaticIdentity};
pub use listings::{search_listings, ListingFilter};
pub use models::{
    Booking, BookingStatus, CatalogService, Favorite, Listing, NewBooking, PaymentStatus,
    Profile, ProfileStatus, Role, ServiceOffering, ALL_CATEGORIES, CATEGORIES,
    DEFAULT_HOURLY_RATE,
};
pub use store::{EntityStore, MemoryStore, PgStore};
