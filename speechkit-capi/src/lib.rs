//! # speechkit C API
//!
//! Flat `extern "C"` surface over `speechkit-core`. Objects never cross the
//! boundary; callers hold opaque 64-bit handles and receive a [`SpxStatus`]
//! from every call.
//!
//! ## Conventions
//!
//! - Creation calls write the new handle through an out pointer. A null out
//!   pointer fails with `InvalidArg` before any work; on any other failure
//!   the out value is [`SPXHANDLE_INVALID`].
//! - Strings handed out by the library are freed with
//!   [`speechkit_free_string`] (or `property_bag_free_string`).
//! - Errors and panics never unwind into the caller. The message of the last
//!   failure on the calling thread is available from
//!   [`speechkit_last_error_message`].

/// `*_is_handle_valid`, `*_release` and `*_get_property_bag` for a role whose
/// objects need no extra teardown.
macro_rules! handle_lifecycle {
    ($table:ident, $is_valid:ident, $release:ident, $get_bag:ident) => {
        #[no_mangle]
        pub extern "C" fn $is_valid(handle: $crate::SpxHandle) -> bool {
            $crate::guard::tables()
                .$table()
                .is_valid(speechkit_core::Handle::from_raw(handle))
        }

        #[no_mangle]
        pub extern "C" fn $release(handle: $crate::SpxHandle) -> $crate::SpxStatus {
            $crate::guard::ffi_call(stringify!($release), || {
                $crate::guard::tables()
                    .$table()
                    .release(speechkit_core::Handle::from_raw(handle))
                    .map(drop)
            })
        }

        /// # Safety
        /// `out` must be null or valid for writes.
        #[no_mangle]
        pub unsafe extern "C" fn $get_bag(
            handle: $crate::SpxHandle,
            out: *mut $crate::SpxHandle,
        ) -> $crate::SpxStatus {
            unsafe {
                $crate::guard::create_into(stringify!($get_bag), out, |tables| {
                    speechkit_core::api::get_property_bag(
                        tables,
                        &tables.$table(),
                        speechkit_core::Handle::from_raw(handle),
                    )
                })
            }
        }
    };
}

mod guard;

pub mod config;
pub mod conversation;
pub mod factory;
pub mod logging;
pub mod property_bag;
pub mod status;

use std::ffi::c_char;
use std::ptr;

use speechkit_core::{api, Handle};
use tracing::info;

pub use status::SpxStatus;

/// Opaque handle as seen from C.
pub type SpxHandle = u64;

pub const SPXHANDLE_INVALID: SpxHandle = Handle::INVALID.into_raw();

/// Free a string returned by any speechkit call. Null is ignored.
///
/// # Safety
/// `value` must be null or a string produced by this library that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn speechkit_free_string(value: *mut c_char) {
    unsafe { guard::free_string(value) }
}

/// Copy of the last failure message on this thread, or null if the last call
/// succeeded. Free the result with [`speechkit_free_string`].
#[no_mangle]
pub extern "C" fn speechkit_last_error_message() -> *mut c_char {
    guard::last_error()
        .and_then(|message| std::ffi::CString::new(message).ok())
        .map_or(ptr::null_mut(), std::ffi::CString::into_raw)
}

/// Per-table counters as a JSON array.
///
/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn speechkit_handle_tables_snapshot(out: *mut *mut c_char) -> SpxStatus {
    guard::ffi_call("speechkit_handle_tables_snapshot", || {
        let snapshot = api::handle_tables_snapshot(guard::tables());
        let json = serde_json::to_string(&snapshot)
            .map_err(|e| speechkit_core::SpeechKitError::runtime(format!("snapshot JSON: {e}")))?;
        unsafe { guard::write_string(out, json) }
    })
}

/// Release every handle of every role. Handles issued before this call no
/// longer resolve; table tags are 16 bits, so this holds until 65534 further
/// tables have been created.
#[no_mangle]
pub extern "C" fn speechkit_term() -> SpxStatus {
    guard::ffi_call("speechkit_term", || {
        let released = api::term(guard::tables());
        info!(released, "speechkit terminated");
        Ok(())
    })
}
