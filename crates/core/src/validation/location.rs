//! Coverage location schemas (region / city / area tree).

use serde::Serialize;
use serde_json::Value;

use super::fields::{Fields, Slot};
use super::{Schema, ValidationError};
use crate::types::{LocationId, LocationType, Nullable};

const NAME_TOO_SHORT: &str = "Location name must be at least 2 characters";
const INVALID_PARENT: &str = "Invalid parent location";

/// A location to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    pub name: String,
    /// Defaults to [`LocationType::Area`].
    #[serde(rename = "type")]
    pub kind: LocationType,
    /// Hierarchy rules (an AREA under a CITY, no cycles) are enforced by
    /// persistence, not here.
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    pub parent_id: Nullable<LocationId>,
}

/// Changes to an existing location. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<LocationType>,
    /// `Null` detaches the location from its parent.
    #[serde(skip_serializing_if = "Nullable::is_absent")]
    pub parent_id: Nullable<LocationId>,
}

fn location_name(slot: Slot<'_>) -> Result<String, String> {
    slot.min_chars(2, NAME_TOO_SHORT)
}

fn parent_location(slot: Slot<'_>) -> Result<Nullable<LocationId>, String> {
    slot.nullable(|s| s.uuid(INVALID_PARENT).map(LocationId::new))
}

impl Schema for NewLocation {
    fn parse(input: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::of(input)?;
        let name = fields.check("name", location_name);
        let kind = fields.check("type", |s| s.enum_or(LocationType::default()));
        let parent_id = fields.check("parentId", parent_location);

        match (name, kind, parent_id) {
            (Some(name), Some(kind), Some(parent_id)) => fields.finish(Self {
                name,
                kind,
                parent_id,
            }),
            _ => Err(fields.into_error()),
        }
    }
}

impl Schema for LocationUpdate {
    fn parse(input: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::of(input)?;
        let name = fields.check("name", |s| s.if_present(location_name));
        let kind = fields.check("type", |s| s.if_present(Slot::required_enum));
        let parent_id = fields.check("parentId", parent_location);

        match (name, kind, parent_id) {
            (Some(name), Some(kind), Some(parent_id)) => fields.finish(Self {
                name,
                kind,
                parent_id,
            }),
            _ => Err(fields.into_error()),
        }
    }
}
