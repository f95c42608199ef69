//! Creating recognizers, connectors, synthesizers, and conversations.
//!
//! Auxiliary config handles may be [`SPXHANDLE_INVALID`](crate::SPXHANDLE_INVALID);
//! they are then treated as not supplied.

use std::ffi::c_char;

use speechkit_core::{api, Handle};

use crate::guard::{create_into, ffi_call, str_arg, tables};
use crate::{SpxHandle, SpxStatus};

fn h(raw: SpxHandle) -> Handle {
    Handle::from_raw(raw)
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn recognizer_create_speech_recognizer_from_config(
    out: *mut SpxHandle,
    speech_config: SpxHandle,
    audio_config: SpxHandle,
) -> SpxStatus {
    unsafe {
        create_into("recognizer_create_speech_recognizer_from_config", out, |tables| {
            api::create_speech_recognizer_from_config(tables, h(speech_config), h(audio_config))
        })
    }
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn recognizer_create_speech_recognizer_from_auto_detect_source_lang_config(
    out: *mut SpxHandle,
    speech_config: SpxHandle,
    auto_detect_source_lang_config: SpxHandle,
    audio_config: SpxHandle,
) -> SpxStatus {
    unsafe {
        create_into(
            "recognizer_create_speech_recognizer_from_auto_detect_source_lang_config",
            out,
            |tables| {
                api::create_speech_recognizer_from_auto_detect_source_lang_config(
                    tables,
                    h(speech_config),
                    h(auto_detect_source_lang_config),
                    h(audio_config),
                )
            },
        )
    }
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn recognizer_create_speech_recognizer_from_source_lang_config(
    out: *mut SpxHandle,
    speech_config: SpxHandle,
    source_lang_config: SpxHandle,
    audio_config: SpxHandle,
) -> SpxStatus {
    unsafe {
        create_into(
            "recognizer_create_speech_recognizer_from_source_lang_config",
            out,
            |tables| {
                api::create_speech_recognizer_from_source_lang_config(
                    tables,
                    h(speech_config),
                    h(source_lang_config),
                    h(audio_config),
                )
            },
        )
    }
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn recognizer_create_translation_recognizer_from_config(
    out: *mut SpxHandle,
    speech_config: SpxHandle,
    audio_config: SpxHandle,
) -> SpxStatus {
    unsafe {
        create_into("recognizer_create_translation_recognizer_from_config", out, |tables| {
            api::create_translation_recognizer_from_config(
                tables,
                h(speech_config),
                h(audio_config),
            )
        })
    }
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn recognizer_create_intent_recognizer_from_config(
    out: *mut SpxHandle,
    speech_config: SpxHandle,
    audio_config: SpxHandle,
) -> SpxStatus {
    unsafe {
        create_into("recognizer_create_intent_recognizer_from_config", out, |tables| {
            api::create_intent_recognizer_from_config(tables, h(speech_config), h(audio_config))
        })
    }
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn recognizer_create_conversation_transcriber_from_config(
    out: *mut SpxHandle,
    audio_config: SpxHandle,
) -> SpxStatus {
    unsafe {
        create_into("recognizer_create_conversation_transcriber_from_config", out, |tables| {
            api::create_conversation_transcriber_from_config(tables, h(audio_config))
        })
    }
}

#[no_mangle]
pub extern "C" fn recognizer_handle_is_valid(recognizer: SpxHandle) -> bool {
    tables().recognizers().is_valid(h(recognizer))
}

/// Release a recognizer. A conversation transcriber still attached to a
/// conversation leaves it first.
#[no_mangle]
pub extern "C" fn recognizer_handle_release(recognizer: SpxHandle) -> SpxStatus {
    ffi_call("recognizer_handle_release", || {
        api::release_recognizer(tables(), h(recognizer))
    })
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn recognizer_get_property_bag(
    recognizer: SpxHandle,
    out: *mut SpxHandle,
) -> SpxStatus {
    unsafe {
        create_into("recognizer_get_property_bag", out, |tables| {
            api::get_property_bag(tables, &tables.recognizers(), h(recognizer))
        })
    }
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn dialog_service_connector_create_dialog_service_connector_from_config(
    out: *mut SpxHandle,
    speech_config: SpxHandle,
    audio_config: SpxHandle,
) -> SpxStatus {
    unsafe {
        create_into(
            "dialog_service_connector_create_dialog_service_connector_from_config",
            out,
            |tables| {
                api::create_dialog_service_connector_from_config(
                    tables,
                    h(speech_config),
                    h(audio_config),
                )
            },
        )
    }
}

handle_lifecycle!(
    dialog_service_connectors,
    dialog_service_connector_handle_is_valid,
    dialog_service_connector_handle_release,
    dialog_service_connector_get_property_bag
);

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn synthesizer_create_speech_synthesizer_from_config(
    out: *mut SpxHandle,
    speech_config: SpxHandle,
    audio_config: SpxHandle,
) -> SpxStatus {
    unsafe {
        create_into("synthesizer_create_speech_synthesizer_from_config", out, |tables| {
            api::create_speech_synthesizer_from_config(tables, h(speech_config), h(audio_config))
        })
    }
}

handle_lifecycle!(
    synthesizers,
    synthesizer_handle_is_valid,
    synthesizer_handle_release,
    synthesizer_get_property_bag
);

/// `id` must not be null; any UTF-8 value, including the empty string, is
/// kept verbatim.
///
/// # Safety
/// `out` must be null or valid for writes; `id` must be null or
/// NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn conversation_create_from_config(
    out: *mut SpxHandle,
    speech_config: SpxHandle,
    id: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("conversation_create_from_config", out, |tables| {
            let id = str_arg(id, "conversation id")?;
            api::create_conversation_from_config(tables, h(speech_config), id)
        })
    }
}
