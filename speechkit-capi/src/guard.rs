//! Call boundary: panic containment, error translation, and the per-thread
//! last-error message.

use std::any::Any;
use std::cell::RefCell;
use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};

use speechkit_core::{Handle, HandleTableManager, Result, SpeechKitError};
use tracing::{debug_span, error, warn};

use crate::status::SpxStatus;
use crate::SpxHandle;

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

pub(crate) fn tables() -> &'static HandleTableManager {
    HandleTableManager::global()
}

pub(crate) fn set_last_error(message: impl Into<String>) {
    let message = message.into();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
}

pub(crate) fn last_error() -> Option<String> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run `body` for the entry point `function`, converting errors and panics
/// into a status.
pub(crate) fn ffi_call<F>(function: &'static str, body: F) -> SpxStatus
where
    F: FnOnce() -> Result<()>,
{
    let span = debug_span!("speechkit_call", function);
    let _enter = span.enter();

    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => {
            clear_last_error();
            SpxStatus::Ok
        }
        Ok(Err(err)) => {
            warn!(function, error = %err, "call failed");
            let status = SpxStatus::from(err.kind());
            set_last_error(err.to_string());
            status
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(function, panic = %message, "panic caught at C boundary");
            set_last_error(format!("unhandled panic: {message}"));
            SpxStatus::UnhandledPanic
        }
    }
}

/// Entry points that produce a handle.
///
/// A null `out` is rejected before anything else runs; otherwise `*out` is
/// reset to the invalid sentinel and only overwritten on success.
///
/// # Safety
/// `out` must be null or valid for writes.
pub(crate) unsafe fn create_into<F>(
    function: &'static str,
    out: *mut SpxHandle,
    body: F,
) -> SpxStatus
where
    F: FnOnce(&HandleTableManager) -> Result<Handle>,
{
    if out.is_null() {
        set_last_error(format!("{function}: output handle pointer is null"));
        return SpxStatus::InvalidArg;
    }
    unsafe { *out = Handle::INVALID.into_raw() };

    ffi_call(function, || {
        let handle = body(tables())?;
        unsafe { *out = handle.into_raw() };
        Ok(())
    })
}

/// Borrow a required C string argument.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives the
/// returned borrow.
pub(crate) unsafe fn str_arg<'a>(ptr: *const c_char, what: &str) -> Result<&'a str> {
    if ptr.is_null() {
        return Err(SpeechKitError::invalid_argument(format!("{what} is null")));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|e| SpeechKitError::invalid_argument(format!("{what} is not UTF-8: {e}")))
}

/// Like [`str_arg`], but null means "not given".
///
/// # Safety
/// Same contract as [`str_arg`].
pub(crate) unsafe fn opt_str_arg<'a>(ptr: *const c_char, what: &str) -> Result<Option<&'a str>> {
    if ptr.is_null() {
        return Ok(None);
    }
    unsafe { str_arg(ptr, what) }.map(Some)
}

/// Hand an owned string to the caller. Free it with `speechkit_free_string`.
///
/// # Safety
/// `out` must be null or valid for writes.
pub(crate) unsafe fn write_string(out: *mut *mut c_char, value: String) -> Result<()> {
    if out.is_null() {
        return Err(SpeechKitError::invalid_argument("output string pointer is null"));
    }
    let value = CString::new(value)
        .map_err(|_| SpeechKitError::runtime("string value contains an interior NUL byte"))?;
    unsafe { *out = value.into_raw() };
    Ok(())
}

/// Release a string produced by [`write_string`].
///
/// # Safety
/// `ptr` must be null or come from [`write_string`] and not be freed twice.
pub(crate) unsafe fn free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}
