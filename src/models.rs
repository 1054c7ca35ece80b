use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Hourly rate applied when an offering has no rate of its own.
pub const DEFAULT_HOURLY_RATE: f64 = 50.0;

/// Category sentinel meaning "do not filter by category".
pub const ALL_CATEGORIES: &str = "All Categories";

/// Category vocabulary offered to presentation layers.
pub const CATEGORIES: &[&str] = &[
    "Technology & Development",
    "Design & Creative",
    "Marketing & Business",
    "Data & Analytics",
    "Writing & Translation",
    "Audio & Music",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Professional,
    Support,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Professional => "professional",
            Role::Support => "support",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "professional" => Ok(Role::Professional),
            "support" => Ok(Role::Support),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownVariant::new("role", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    Active,
    Pending,
    Inactive,
    Blocked,
}

impl ProfileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::Active => "active",
            ProfileStatus::Pending => "pending",
            ProfileStatus::Inactive => "inactive",
            ProfileStatus::Blocked => "blocked",
        }
    }
}

impl FromStr for ProfileStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProfileStatus::Active),
            "pending" => Ok(ProfileStatus::Pending),
            "inactive" => Ok(ProfileStatus::Inactive),
            "blocked" => Ok(ProfileStatus::Blocked),
            other => Err(UnknownVariant::new("profile status", other)),
        }
    }
}

/// Lifecycle state of a booking. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "accepted" => Ok(BookingStatus::Accepted),
            "in_progress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(UnknownVariant::new("booking status", other)),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(UnknownVariant::new("payment status", other)),
        }
    }
}

/// A stored enum column held a string outside the closed vocabulary.
#[derive(Debug, Clone)]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(field: &'static str, value: &str) -> Self {
        UnknownVariant {
            field,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value: {:?}", self.field, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub status: ProfileStatus,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogService {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub professionals_count: i64,
}

/// A professional's instantiation of a catalog service.
/// Created inactive; the professional flips `is_active` to go live.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceOffering {
    pub id: i64,
    pub professional_id: String,
    pub service_id: i64,
    pub custom_title: Option<String>,
    pub rate: Option<f64>,
    pub notes: Option<String>,
    pub is_active: bool,
}

impl ServiceOffering {
    /// Rate used for budgets and listings, falling back to the platform default.
    pub fn effective_rate(&self) -> f64 {
        self.rate.unwrap_or(DEFAULT_HOURLY_RATE)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: i64,
    pub client_id: String,
    pub professional_id: String,
    pub service_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub budget: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a booking. The store assigns id and created_at.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub client_id: String,
    pub professional_id: String,
    pub service_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub budget: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Favorite {
    pub client_id: String,
    pub offering_id: i64,
}

/// Marketplace-facing projection of an offering joined with its
/// professional's profile and catalog service.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub offering_id: i64,
    pub professional_id: String,
    pub professional_name: String,
    pub title: String,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub service_name: String,
    pub category: String,
    pub hourly_rate: f64,
    pub jobs_completed: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_wire_strings() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Accepted,
            BookingStatus::InProgress,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert!("confirmed".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Accepted.is_terminal());
        assert!(!BookingStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_effective_rate_falls_back_to_default() {
        let offering = ServiceOffering {
            id: 1,
            professional_id: "p1".into(),
            service_id: 7,
            custom_title: None,
            rate: None,
            notes: None,
            is_active: true,
        };
        assert_eq!(offering.effective_rate(), DEFAULT_HOURLY_RATE);
    }
}
