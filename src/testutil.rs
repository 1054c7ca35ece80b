//! Shared fixture constructors for the test suite.

use crate::models::{CatalogService, Profile, ProfileStatus, Role, ServiceOffering};

/// Logging for test debugging, driven by `RUST_LOG`. Safe to call from
/// every fixture; repeat initialization is ignored.
pub fn init_logging() {
    let _ = pretty_env_logger::try_init();
}

pub fn professional(id: &str, name: &str) -> Profile {
    Profile {
        id: id.to_string(),
        full_name: name.to_string(),
        email: format!("{id}@example.com"),
        role: Role::Professional,
        status: ProfileStatus::Active,
        location: Some("Remote".to_string()),
        phone: None,
        bio: Some(format!("{name} bio")),
    }
}

pub fn client(id: &str, name: &str) -> Profile {
    Profile {
        id: id.to_string(),
        full_name: name.to_string(),
        email: format!("{id}@example.com"),
        role: Role::Client,
        status: ProfileStatus::Active,
        location: None,
        phone: None,
        bio: None,
    }
}

pub fn service(id: i64, name: &str, category: &str) -> CatalogService {
    CatalogService {
        id,
        name: name.to_string(),
        category: Some(category.to_string()),
        description: None,
        is_active: true,
        professionals_count: 0,
    }
}

pub fn offering(
    id: i64,
    professional_id: &str,
    service_id: i64,
    rate: Option<f64>,
    is_active: bool,
) -> ServiceOffering {
    ServiceOffering {
        id,
        professional_id: professional_id.to_string(),
        service_id,
        custom_title: None,
        rate,
        notes: None,
        is_active,
    }
}
