pub mod location;
pub mod user;

pub use location::{AreaNode, BuildingNode, CityNode, LocationNode, LocationsResponse, StateNode};
pub use user::{AuthUser, OperatorProfile};
