// src/core/alert/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(pub Uuid);

impl AlertId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

const EARTH_RADIUS_M: f64 = 6_371_000.0;

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Haversine great-circle distance in meters.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }

    pub fn within_radius(&self, other: &GeoPoint, radius_m: f64) -> bool {
        self.distance_m(other) <= radius_m
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Emergency,
    Medical,
}

impl AlertCategory {
    pub fn default_description(&self) -> &'static str {
        match self {
            AlertCategory::Emergency => "Emergency alert triggered",
            AlertCategory::Medical => "Medical assistance requested",
        }
    }
}

/// A persisted emergency event. Created once, never deleted; only the
/// status and the notified-responder roster change after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub creator: UserId,
    pub location: GeoPoint,
    pub status: AlertStatus,
    pub category: AlertCategory,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub notified_responders: Vec<UserId>,
}

impl Alert {
    pub fn new(creator: UserId, category: AlertCategory, location: GeoPoint) -> Self {
        Self {
            id: AlertId::generate(),
            creator,
            location,
            status: AlertStatus::Active,
            category,
            description: category.default_description().to_string(),
            created_at: Utc::now(),
            notified_responders: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }

    pub fn resolve(&mut self) {
        self.status = AlertStatus::Resolved;
    }

    /// Replaces the roster, keeping ids unique. Identity is a unique key on
    /// the responder side, so duplicates here would be a caller bug.
    pub fn set_notified(&mut self, responders: Vec<UserId>) {
        let mut seen = Vec::with_capacity(responders.len());
        for id in responders {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        self.notified_responders = seen;
    }
}

/// Read-side projection of a user row for the responder lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderCandidate {
    pub id: UserId,
    pub location: GeoPoint,
}

/// Full user row as stored. Profile management beyond what the responder
/// query needs is out of scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub display_name: String,
    pub location: Option<GeoPoint>,
    pub is_responder: bool,
    pub verified: bool,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            location: None,
            is_responder: false,
            verified: false,
            updated_at: Utc::now(),
        }
    }

    pub fn eligible_responder(&self) -> bool {
        self.is_responder && self.verified && self.location.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub alert_id: AlertId,
    pub sender: UserId,
    pub sender_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_alert_is_active_with_empty_roster() {
        let alert = Alert::new(
            UserId::generate(),
            AlertCategory::Emergency,
            GeoPoint::new(-33.9249, 18.4241),
        );

        assert!(alert.is_active());
        assert!(alert.notified_responders.is_empty());
        assert_eq!(alert.description, "Emergency alert triggered");
    }

    #[test]
    fn test_resolve_transitions_status() {
        let mut alert = Alert::new(
            UserId::generate(),
            AlertCategory::Medical,
            GeoPoint::new(0.0, 0.0),
        );

        alert.resolve();
        assert_eq!(alert.status, AlertStatus::Resolved);
        assert!(!alert.is_active());
    }

    #[test]
    fn test_set_notified_deduplicates() {
        let mut alert = Alert::new(
            UserId::generate(),
            AlertCategory::Emergency,
            GeoPoint::new(0.0, 0.0),
        );
        let a = UserId::generate();
        let b = UserId::generate();

        alert.set_notified(vec![a, b, a]);
        assert_eq!(alert.notified_responders, vec![a, b]);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Cape Town city centre to Sea Point, roughly 4.4 km.
        let centre = GeoPoint::new(-33.9249, 18.4241);
        let sea_point = GeoPoint::new(-33.9180, 18.3770);

        let d = centre.distance_m(&sea_point);
        assert!(d > 4000.0 && d < 5000.0, "unexpected distance: {d}");
        assert!(centre.within_radius(&sea_point, 5000.0));
        assert!(!centre.within_radius(&sea_point, 2000.0));
    }

    #[test]
    fn test_zero_distance() {
        let p = GeoPoint::new(51.5, -0.12);
        assert!(p.distance_m(&p) < 1e-6);
    }

    #[test]
    fn test_eligible_responder_requires_all_flags_and_location() {
        let mut user = UserRecord::new(UserId::generate(), "sam");
        assert!(!user.eligible_responder());

        user.is_responder = true;
        user.verified = true;
        assert!(!user.eligible_responder());

        user.location = Some(GeoPoint::new(0.0, 0.0));
        assert!(user.eligible_responder());
    }
}
