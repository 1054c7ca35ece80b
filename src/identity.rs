use crate::models::Role;
use anyhow::Result;
use async_trait::async_trait;

/// Capability token for the requesting user, acquired at request start and
/// passed explicitly into every lifecycle and registry call. Never cached
/// in shared process state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Actor {
            id: id.into(),
            role,
        }
    }
}

/// The identity collaborator: resolves the current session to an actor.
/// `None` means no session; routing the caller to an unauthenticated state
/// is the presentation layer's concern.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_actor(&self) -> Result<Option<Actor>>;
}

/// Fixed-identity provider for tests and single-user embeddings.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    actor: Option<Actor>,
}

impl StaticIdentity {
    pub fn new(actor: Actor) -> Self {
        StaticIdentity { actor: Some(actor) }
    }

    pub fn anonymous() -> Self {
        StaticIdentity { actor: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_actor(&self) -> Result<Option<Actor>> {
        Ok(self.actor.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_identity_resolves_actor() {
        let provider = StaticIdentity::new(Actor::new("client-1", Role::Client));
        let actor = provider.current_actor().await.unwrap().unwrap();
        assert_eq!(actor.id, "client-1");
        assert_eq!(actor.role, Role::Client);

        assert!(StaticIdentity::anonymous()
            .current_actor()
            .await
            .unwrap()
            .is_none());
    }
}
