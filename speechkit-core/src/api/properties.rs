//! Property bag handles.
//!
//! A property bag handle shares the bag of the object it was taken from:
//! writes through the handle are visible to the object and vice versa.
//! Releasing the bag handle never affects the object.

use crate::capability::{caps, Query, SpxObject};
use crate::error::{Result, SpeechKitError};
use crate::handles::{Handle, HandleTable, HandleTableManager};
use crate::properties::PropertyId;

use super::require;

/// Track the bag of the object behind `handle` and return a bag handle.
///
/// # Errors
/// `InvalidArgument` if `handle` is not valid in `table` or the object has no
/// property bag.
pub fn get_property_bag<T>(
    tables: &HandleTableManager,
    table: &HandleTable<T>,
    handle: Handle,
) -> Result<Handle>
where
    T: ?Sized + SpxObject,
{
    let object = require(table, handle)?;
    let bag = object.query::<caps::NamedProperties>().ok_or_else(|| {
        SpeechKitError::invalid_argument(format!("{} has no property bag", table.kind()))
    })?;
    tables.property_bags().track(bag)
}

/// Resolve the key a caller addressed: a known numeric id, or `name` when
/// `id` is negative.
pub fn property_key(id: i32, name: Option<&str>) -> Result<String> {
    if id >= 0 {
        return PropertyId::from_raw(id)
            .map(|id| id.name().to_string())
            .ok_or_else(|| SpeechKitError::invalid_argument(format!("unknown property id {id}")));
    }
    match name {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(SpeechKitError::invalid_argument(
            "a property name is required when no id is given",
        )),
    }
}

pub fn property_bag_set_string(
    tables: &HandleTableManager,
    bag: Handle,
    id: i32,
    name: Option<&str>,
    value: &str,
) -> Result<()> {
    let bag = require(&tables.property_bags(), bag)?;
    bag.set(property_key(id, name)?, value);
    Ok(())
}

/// Read a property, falling back to `default` when it is absent.
pub fn property_bag_get_string(
    tables: &HandleTableManager,
    bag: Handle,
    id: i32,
    name: Option<&str>,
    default: &str,
) -> Result<String> {
    let bag = require(&tables.property_bags(), bag)?;
    Ok(bag.get_or(&property_key(id, name)?, default))
}

pub fn property_bag_release(tables: &HandleTableManager, bag: Handle) -> Result<()> {
    tables.property_bags().release(bag).map(drop)
}
