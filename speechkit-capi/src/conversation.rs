//! Conversations, participants, and transcriber attachment.

use std::ffi::c_char;

use speechkit_core::{api, AttachmentState, Handle, Participant, SpeechKitError};

use crate::guard::{ffi_call, opt_str_arg, set_last_error, str_arg, tables, write_string};
use crate::{SpxHandle, SpxStatus};

fn participants_json(participants: &[Participant]) -> speechkit_core::Result<String> {
    serde_json::to_string(participants)
        .map_err(|e| SpeechKitError::runtime(format!("participant JSON: {e}")))
}

handle_lifecycle!(
    conversations,
    conversation_is_handle_valid,
    conversation_release_handle,
    conversation_get_property_bag
);

/// Copy the conversation id into `*out`. Free it with `speechkit_free_string`.
///
/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn conversation_get_id(
    conversation: SpxHandle,
    out: *mut *mut c_char,
) -> SpxStatus {
    ffi_call("conversation_get_id", || {
        let id = api::conversation_id(tables(), Handle::from_raw(conversation))?;
        unsafe { write_string(out, id) }
    })
}

/// `preferred_language` and `voice_signature` may be null or empty. A
/// non-empty signature must be JSON of the form
/// `{"Version":0,"Tag":"…","Data":"…"}`.
///
/// # Safety
/// String arguments must be null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn conversation_add_participant(
    conversation: SpxHandle,
    user_id: *const c_char,
    preferred_language: *const c_char,
    voice_signature: *const c_char,
) -> SpxStatus {
    ffi_call("conversation_add_participant", || {
        let user_id = unsafe { str_arg(user_id, "user id") }?;
        let language = unsafe { opt_str_arg(preferred_language, "preferred language") }?;
        let signature = unsafe { opt_str_arg(voice_signature, "voice signature") }?;
        api::conversation_add_participant(
            tables(),
            Handle::from_raw(conversation),
            user_id,
            language.unwrap_or_default(),
            signature.unwrap_or_default(),
        )
    })
}

/// # Safety
/// `user_id` must be null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn conversation_remove_participant(
    conversation: SpxHandle,
    user_id: *const c_char,
) -> SpxStatus {
    ffi_call("conversation_remove_participant", || {
        let user_id = unsafe { str_arg(user_id, "user id") }?;
        api::conversation_remove_participant(tables(), Handle::from_raw(conversation), user_id)
    })
}

/// Participants as a JSON array.
///
/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn conversation_get_participants_json(
    conversation: SpxHandle,
    out: *mut *mut c_char,
) -> SpxStatus {
    ffi_call("conversation_get_participants_json", || {
        let participants =
            api::conversation_participants(tables(), Handle::from_raw(conversation))?;
        unsafe { write_string(out, participants_json(&participants)?) }
    })
}

#[no_mangle]
pub extern "C" fn recognizer_join_conversation(
    conversation: SpxHandle,
    recognizer: SpxHandle,
) -> SpxStatus {
    ffi_call("recognizer_join_conversation", || {
        api::recognizer_join_conversation(
            tables(),
            Handle::from_raw(conversation),
            Handle::from_raw(recognizer),
        )
    })
}

/// Leaving when not attached succeeds and does nothing.
#[no_mangle]
pub extern "C" fn recognizer_leave_conversation(recognizer: SpxHandle) -> SpxStatus {
    ffi_call("recognizer_leave_conversation", || {
        api::recognizer_leave_conversation(tables(), Handle::from_raw(recognizer))
    })
}

/// # Safety
/// `attached` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn conversation_transcriber_is_attached(
    recognizer: SpxHandle,
    attached: *mut bool,
) -> SpxStatus {
    if attached.is_null() {
        set_last_error("conversation_transcriber_is_attached: output pointer is null");
        return SpxStatus::InvalidArg;
    }
    ffi_call("conversation_transcriber_is_attached", || {
        let state = api::transcriber_state(tables(), Handle::from_raw(recognizer))?;
        unsafe { *attached = state == AttachmentState::Attached };
        Ok(())
    })
}

/// Participants of the conversation the transcriber joined, as a JSON array.
///
/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn conversation_transcriber_get_participants_json(
    recognizer: SpxHandle,
    out: *mut *mut c_char,
) -> SpxStatus {
    ffi_call("conversation_transcriber_get_participants_json", || {
        let participants = api::transcriber_participants(tables(), Handle::from_raw(recognizer))?;
        unsafe { write_string(out, participants_json(&participants)?) }
    })
}
