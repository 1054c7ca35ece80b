//! Favorites Registry.
//!
//! Many-to-many relation between a client and the offerings they have
//! starred. Toggling is idempotent under concurrent duplicates: the insert
//! path tolerates an already-existing pair and still reports `Added`.
//! Favorite rows are never cleaned up when a listing disappears; the
//! resolved view simply stops showing them.

use crate::error::{MarketplaceError, Result};
use crate::identity::Actor;
use crate::listings;
use crate::models::{Favorite, Listing, Role};
use crate::store::EntityStore;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Stars or unstars an offering for the acting client.
pub async fn toggle_favorite(
    store: &dyn EntityStore,
    actor: &Actor,
    offering_id: i64,
) -> Result<ToggleOutcome> {
    if actor.role != Role::Client {
        return Err(MarketplaceError::permission(
            "only clients can manage favorites",
        ));
    }
    if store.delete_favorite(&actor.id, offering_id).await? {
        return Ok(ToggleOutcome::Removed);
    }
    // A concurrent toggle may have inserted the pair since the delete saw
    // nothing; the duplicate-tolerant insert makes that an Added, not an
    // error.
    store.insert_favorite(&actor.id, offering_id).await?;
    Ok(ToggleOutcome::Added)
}

/// Raw favorite pairs for the acting client, dangling references included.
pub async fn list_favorites(store: &dyn EntityStore, actor: &Actor) -> Result<Vec<Favorite>> {
    Ok(store.favorites_for(&actor.id).await?)
}

/// The client's favorites resolved into listings. Offerings that have gone
/// inactive or lost their professional drop out of the view while the
/// underlying Favorite rows persist.
pub async fn favorite_listings(store: &dyn EntityStore, actor: &Actor) -> Result<Vec<Listing>> {
    let favorites = store.favorites_for(&actor.id).await?;
    let ids: Vec<i64> = favorites.iter().map(|f| f.offering_id).collect();
    listings::resolve_offerings(store, &ids).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testutil::{client, init_logging, offering, professional, service};
    use std::sync::Arc;

    fn seeded_store() -> MemoryStore {
        init_logging();
        let store = MemoryStore::new();
        store.add_profile(client("client-1", "Carol"));
        store.add_profile(professional("pro-1", "Alice"));
        store.add_service(service(10, "Logo Design", "Design & Creative"));
        store.add_offering(offering(100, "pro-1", 10, Some(60.0), true));
        store
    }

    #[tokio::test]
    async fn test_toggle_alternates_added_removed() {
        let store = seeded_store();
        let actor = Actor::new("client-1", Role::Client);

        assert_eq!(
            toggle_favorite(&store, &actor, 100).await.unwrap(),
            ToggleOutcome::Added
        );
        assert_eq!(
            toggle_favorite(&store, &actor, 100).await.unwrap(),
            ToggleOutcome::Removed
        );
        assert!(list_favorites(&store, &actor).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_toggles_never_duplicate_pair() {
        let store = Arc::new(seeded_store());
        let actor = Actor::new("client-1", Role::Client);

        let mut handles = Vec::new();
        for _ in 0..2 {
            let store = Arc::clone(&store);
            let actor = actor.clone();
            handles.push(tokio::spawn(async move {
                toggle_favorite(store.as_ref(), &actor, 100).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let favorites = list_favorites(store.as_ref(), &actor).await.unwrap();
        assert!(favorites.len() <= 1);
    }

    #[tokio::test]
    async fn test_professional_cannot_toggle() {
        let store = seeded_store();
        let err = toggle_favorite(&store, &Actor::new("pro-1", Role::Professional), 100)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::Permission(_)));
    }

    #[tokio::test]
    async fn test_deactivated_offering_drops_from_view_but_row_persists() {
        let store = seeded_store();
        let actor = Actor::new("client-1", Role::Client);
        toggle_favorite(&store, &actor, 100).await.unwrap();

        let resolved = favorite_listings(&store, &actor).await.unwrap();
        assert_eq!(resolved.len(), 1);

        store.set_offering_active(100, false);

        let resolved = favorite_listings(&store, &actor).await.unwrap();
        assert!(resolved.is_empty());
        // The registry still holds the pair.
        let raw = list_favorites(&store, &actor).await.unwrap();
        assert_eq!(
            raw,
            vec![Favorite {
                client_id: "client-1".to_string(),
                offering_id: 100
            }]
        );
    }

    #[tokio::test]
    async fn test_deactivated_professional_drops_from_view() {
        let store = seeded_store();
        let actor = Actor::new("client-1", Role::Client);
        toggle_favorite(&store, &actor, 100).await.unwrap();

        store.remove_profile("pro-1");

        let resolved = favorite_listings(&store, &actor).await.unwrap();
        assert!(resolved.is_empty());
        assert_eq!(list_favorites(&store, &actor).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_favorites_are_per_client() {
        let store = seeded_store();
        store.add_profile(client("client-2", "Dave"));
        let carol = Actor::new("client-1", Role::Client);
        let dave = Actor::new("client-2", Role::Client);

        toggle_favorite(&store, &carol, 100).await.unwrap();

        assert_eq!(list_favorites(&store, &carol).await.unwrap().len(), 1);
        assert!(list_favorites(&store, &dave).await.unwrap().is_empty());
    }
}
