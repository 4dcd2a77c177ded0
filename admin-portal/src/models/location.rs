//! Wire model for the remote location directory.
//!
//! The backend persists a forest of five-level location trees and always
//! returns the entire forest in one read. Field names mirror the backend's
//! JSON contract; node ids are opaque and only guaranteed unique within a
//! sibling array.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Level 0: a primary location (campus, plant, client site).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationNode {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "PrimaryLocation", default)]
    pub primary_location: String,
    #[serde(rename = "SubLocation", default)]
    pub sub_locations: Vec<StateNode>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Level 1: a state/region under a primary location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateNode {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "PrimarySubLocation", default)]
    pub primary_sub_location: String,
    #[serde(rename = "SecondaryLocation", default)]
    pub secondary_locations: Vec<CityNode>,
}

/// Level 2: a city.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityNode {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "SecondaryLocation", default)]
    pub secondary_location: String,
    #[serde(rename = "SecondarySubLocation", default)]
    pub secondary_sub_locations: Vec<AreaNode>,
}

/// Level 3: an area/zone inside a city.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaNode {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "SecondarySubLocation", default)]
    pub secondary_sub_location: String,
    #[serde(rename = "ThirdLocation", default)]
    pub third_locations: Vec<BuildingNode>,
}

/// Level 4: a building. The optional floor leaf (level 5) is a bare string,
/// not a child array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingNode {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "ThirdLocation", default)]
    pub third_location: String,
    #[serde(rename = "ThirdSubLocation", default, skip_serializing_if = "Option::is_none")]
    pub third_sub_location: Option<String>,
}

/// Response envelope of `GET /api/Location/getLocations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationsResponse {
    #[serde(rename = "Location", default)]
    pub location: Vec<LocationNode>,
}
