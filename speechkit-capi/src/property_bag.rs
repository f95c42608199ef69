//! Property bag handles.
//!
//! Properties are addressed by numeric id, or by `name` when `id` is
//! negative.

use std::ffi::c_char;

use speechkit_core::{api, Handle};

use crate::guard::{ffi_call, free_string, opt_str_arg, str_arg, tables, write_string};
use crate::{SpxHandle, SpxStatus};

/// # Safety
/// String arguments must be null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn property_bag_set_string(
    bag: SpxHandle,
    id: i32,
    name: *const c_char,
    value: *const c_char,
) -> SpxStatus {
    ffi_call("property_bag_set_string", || {
        let name = unsafe { opt_str_arg(name, "property name") }?;
        let value = unsafe { str_arg(value, "property value") }?;
        api::property_bag_set_string(tables(), Handle::from_raw(bag), id, name, value)
    })
}

/// Read a property into `*out`, or `default_value` when it is absent. A null
/// `default_value` reads as the empty string. Free the result with
/// [`property_bag_free_string`].
///
/// # Safety
/// String arguments must be null or NUL-terminated; `out` must be null or
/// valid for writes.
#[no_mangle]
pub unsafe extern "C" fn property_bag_get_string(
    bag: SpxHandle,
    id: i32,
    name: *const c_char,
    default_value: *const c_char,
    out: *mut *mut c_char,
) -> SpxStatus {
    ffi_call("property_bag_get_string", || {
        let name = unsafe { opt_str_arg(name, "property name") }?;
        let default = unsafe { opt_str_arg(default_value, "default value") }?.unwrap_or_default();
        let value =
            api::property_bag_get_string(tables(), Handle::from_raw(bag), id, name, default)?;
        unsafe { write_string(out, value) }
    })
}

/// # Safety
/// `value` must be null or a string returned by [`property_bag_get_string`]
/// that has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn property_bag_free_string(value: *mut c_char) -> SpxStatus {
    unsafe { free_string(value) };
    SpxStatus::Ok
}

#[no_mangle]
pub extern "C" fn property_bag_is_valid(bag: SpxHandle) -> bool {
    tables().property_bags().is_valid(Handle::from_raw(bag))
}

/// Release the bag handle. The object the bag belongs to is unaffected.
#[no_mangle]
pub extern "C" fn property_bag_release(bag: SpxHandle) -> SpxStatus {
    ffi_call("property_bag_release", || {
        api::property_bag_release(tables(), Handle::from_raw(bag))
    })
}
