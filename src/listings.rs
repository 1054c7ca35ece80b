//! Listing Aggregator.
//!
//! Joins active service offerings with their owning professional profiles
//! and catalog services to produce the public marketplace listing set. The
//! join is an in-memory hash join keyed by professional id and catalog
//! service id; an offering whose professional or service cannot be resolved
//! is a data-integrity skip, not an error. Offerings owned by a
//! non-active professional are excluded the same way.

use crate::error::Result;
use crate::models::{
    CatalogService, Listing, Profile, ProfileStatus, Role, ServiceOffering, ALL_CATEGORIES,
};
use crate::store::EntityStore;
use log::debug;
use std::collections::HashMap;

/// Search input for the marketplace view. An empty query matches
/// everything; `All Categories` (or `None`) disables the category filter.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub query: Option<String>,
    pub category: Option<String>,
}

impl ListingFilter {
    pub fn new(query: impl Into<String>, category: impl Into<String>) -> Self {
        ListingFilter {
            query: Some(query.into()),
            category: Some(category.into()),
        }
    }

    fn matches(&self, listing: &Listing) -> bool {
        if let Some(query) = self.query.as_deref() {
            if !query.is_empty() {
                let needle = query.to_lowercase();
                let hit = listing.professional_name.to_lowercase().contains(&needle)
                    || listing.title.to_lowercase().contains(&needle)
                    || listing.service_name.to_lowercase().contains(&needle)
                    || listing.category.to_lowercase().contains(&needle);
                if !hit {
                    return false;
                }
            }
        }
        if let Some(category) = self.category.as_deref() {
            if category != ALL_CATEGORIES && listing.category != category {
                return false;
            }
        }
        true
    }
}

/// Currently bookable listings matching the filter. Read-only; any store
/// failure aborts the whole aggregation rather than returning a partial
/// join.
pub async fn search_listings(
    store: &dyn EntityStore,
    filter: &ListingFilter,
) -> Result<Vec<Listing>> {
    let offerings = store.active_offerings().await?;
    let listings = resolve(store, offerings).await?;
    Ok(listings
        .into_iter()
        .filter(|listing| filter.matches(listing))
        .collect())
}

/// Resolves a specific set of offerings through the same join as
/// `search_listings`. Offerings that are inactive, missing, or owned by a
/// non-active professional drop out. Used by the favorites view.
pub async fn resolve_offerings(
    store: &dyn EntityStore,
    offering_ids: &[i64],
) -> Result<Vec<Listing>> {
    let offerings = store.active_offerings().await?;
    let wanted: Vec<ServiceOffering> = offerings
        .into_iter()
        .filter(|o| offering_ids.contains(&o.id))
        .collect();
    resolve(store, wanted).await
}

async fn resolve(
    store: &dyn EntityStore,
    offerings: Vec<ServiceOffering>,
) -> Result<Vec<Listing>> {
    let professionals = store.active_professionals().await?;
    let services = store.catalog_services().await?;
    let jobs_completed = store.completed_jobs_by_professional().await?;

    let professionals: HashMap<&str, &Profile> = professionals
        .iter()
        .map(|p| (p.id.as_str(), p))
        .collect();
    let services: HashMap<i64, &CatalogService> =
        services.iter().map(|s| (s.id, s)).collect();

    let mut listings = Vec::with_capacity(offerings.len());
    for offering in &offerings {
        let professional = match professionals.get(offering.professional_id.as_str()) {
            Some(p) => *p,
            None => {
                debug!(
                    "skipping offering {}: professional {} not resolvable",
                    offering.id, offering.professional_id
                );
                continue;
            }
        };
        // The store query already filters, but the invariant is cheap to
        // restate against a foreign store implementation.
        if professional.role != Role::Professional
            || professional.status != ProfileStatus::Active
        {
            debug!(
                "skipping offering {}: profile {} is not an active professional",
                offering.id, professional.id
            );
            continue;
        }
        let service = match services.get(&offering.service_id) {
            Some(s) => *s,
            None => {
                debug!(
                    "skipping offering {}: service {} not resolvable",
                    offering.id, offering.service_id
                );
                continue;
            }
        };

        let title = offering
            .custom_title
            .clone()
            .unwrap_or_else(|| service.name.clone());
        listings.push(Listing {
            offering_id: offering.id,
            professional_id: offering.professional_id.clone(),
            professional_name: professional.full_name.clone(),
            title,
            location: professional.location.clone(),
            bio: professional.bio.clone(),
            service_name: service.name.clone(),
            category: service.category.clone().unwrap_or_else(|| "Other".to_string()),
            hourly_rate: offering.effective_rate(),
            jobs_completed: jobs_completed
                .get(offering.professional_id.as_str())
                .copied()
                .unwrap_or(0),
        });
    }
    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, NewBooking, PaymentStatus};
    use crate::store::MemoryStore;
    use crate::testutil::{init_logging, offering, professional, service};

    fn seeded_store() -> MemoryStore {
        init_logging();
        let store = MemoryStore::new();
        store.add_profile(professional("pro-1", "Alice Logoworks"));
        store.add_profile(professional("pro-2", "Bob Backend"));
        store.add_service(service(10, "Logo Design", "Design & Creative"));
        store.add_service(service(11, "API Development", "Technology & Development"));
        store.add_offering(offering(100, "pro-1", 10, Some(60.0), true));
        store.add_offering(offering(101, "pro-2", 11, Some(80.0), true));
        store
    }

    #[tokio::test]
    async fn test_inactive_offering_never_listed() {
        let store = seeded_store();
        store.add_offering(offering(102, "pro-1", 11, Some(90.0), false));

        let listings = search_listings(&store, &ListingFilter::default())
            .await
            .unwrap();
        assert_eq!(listings.len(), 2);
        assert!(listings.iter().all(|l| l.offering_id != 102));
    }

    #[tokio::test]
    async fn test_unresolvable_professional_is_skipped() {
        let store = seeded_store();
        store.add_offering(offering(103, "pro-gone", 10, None, true));

        let listings = search_listings(&store, &ListingFilter::default())
            .await
            .unwrap();
        assert!(listings.iter().all(|l| l.offering_id != 103));
        assert_eq!(listings.len(), 2);
    }

    #[tokio::test]
    async fn test_unresolvable_service_is_skipped() {
        let store = seeded_store();
        store.add_offering(offering(104, "pro-1", 999, None, true));

        let listings = search_listings(&store, &ListingFilter::default())
            .await
            .unwrap();
        assert!(listings.iter().all(|l| l.offering_id != 104));
    }

    #[tokio::test]
    async fn test_non_active_professional_excluded() {
        use crate::models::ProfileStatus;
        let store = seeded_store();
        let mut blocked = professional("pro-3", "Mallory");
        blocked.status = ProfileStatus::Blocked;
        store.add_profile(blocked);
        store.add_offering(offering(105, "pro-3", 10, None, true));

        let listings = search_listings(&store, &ListingFilter::default())
            .await
            .unwrap();
        assert!(listings.iter().all(|l| l.offering_id != 105));
    }

    #[tokio::test]
    async fn test_category_and_query_combined() {
        let store = seeded_store();
        let filter = ListingFilter::new("logo", "Design & Creative");

        let listings = search_listings(&store, &filter).await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].offering_id, 100);
        assert_eq!(listings[0].category, "Design & Creative");
    }

    #[tokio::test]
    async fn test_query_matches_any_field_case_insensitive() {
        let store = seeded_store();

        // Professional name hit.
        let by_name = search_listings(&store, &ListingFilter::new("ALICE", ALL_CATEGORIES))
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].professional_id, "pro-1");

        // Category substring hit.
        let by_category = search_listings(&store, &ListingFilter::new("technology", ALL_CATEGORIES))
            .await
            .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].offering_id, 101);

        let none = search_listings(&store, &ListingFilter::new("plumbing", ALL_CATEGORIES))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_all_categories_sentinel_disables_category_filter() {
        let store = seeded_store();
        let listings = search_listings(&store, &ListingFilter::new("", ALL_CATEGORIES))
            .await
            .unwrap();
        assert_eq!(listings.len(), 2);
    }

    #[tokio::test]
    async fn test_custom_title_overrides_service_name() {
        let store = seeded_store();
        let mut titled = offering(106, "pro-1", 10, Some(70.0), true);
        titled.custom_title = Some("Brand Identity Package".to_string());
        store.add_offering(titled);

        let listings = search_listings(&store, &ListingFilter::default())
            .await
            .unwrap();
        let listing = listings.iter().find(|l| l.offering_id == 106).unwrap();
        assert_eq!(listing.title, "Brand Identity Package");
        assert_eq!(listing.service_name, "Logo Design");
    }

    #[tokio::test]
    async fn test_rate_falls_back_to_default() {
        use crate::models::DEFAULT_HOURLY_RATE;
        let store = seeded_store();
        store.add_offering(offering(107, "pro-1", 10, None, true));

        let listings = search_listings(&store, &ListingFilter::default())
            .await
            .unwrap();
        let listing = listings.iter().find(|l| l.offering_id == 107).unwrap();
        assert_eq!(listing.hourly_rate, DEFAULT_HOURLY_RATE);
    }

    #[tokio::test]
    async fn test_jobs_completed_counts_only_completed_bookings() {
        let store = seeded_store();
        for status in [
            BookingStatus::Completed,
            BookingStatus::Completed,
            BookingStatus::Pending,
        ] {
            store
                .insert_booking(NewBooking {
                    client_id: "client-1".to_string(),
                    professional_id: "pro-1".to_string(),
                    service_id: Some(10),
                    title: "Logo Design".to_string(),
                    description: None,
                    scheduled_at: None,
                    budget: 120.0,
                    status,
                    payment_status: PaymentStatus::Unpaid,
                })
                .await
                .unwrap();
        }

        let listings = search_listings(&store, &ListingFilter::default())
            .await
            .unwrap();
        let alice = listings.iter().find(|l| l.offering_id == 100).unwrap();
        let bob = listings.iter().find(|l| l.offering_id == 101).unwrap();
        assert_eq!(alice.jobs_completed, 2);
        assert_eq!(bob.jobs_completed, 0);
    }
}
