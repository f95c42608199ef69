//! Speech, audio, and language config handles.

use std::ffi::c_char;
use std::slice;

use speechkit_core::{api, Handle, SpeechKitError};

use crate::guard::{create_into, opt_str_arg, str_arg};
use crate::{SpxHandle, SpxStatus};

/// # Safety
/// `out` must be null or valid for writes; string arguments must be null or
/// NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn speech_config_from_subscription(
    out: *mut SpxHandle,
    subscription_key: *const c_char,
    region: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("speech_config_from_subscription", out, |tables| {
            let key = str_arg(subscription_key, "subscription key")?;
            let region = str_arg(region, "region")?;
            api::speech_config_from_subscription(tables, key, region)
        })
    }
}

/// # Safety
/// See [`speech_config_from_subscription`].
#[no_mangle]
pub unsafe extern "C" fn speech_config_from_authorization_token(
    out: *mut SpxHandle,
    token: *const c_char,
    region: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("speech_config_from_authorization_token", out, |tables| {
            let token = str_arg(token, "authorization token")?;
            let region = str_arg(region, "region")?;
            api::speech_config_from_authorization_token(tables, token, region)
        })
    }
}

/// `subscription_key` may be null.
///
/// # Safety
/// See [`speech_config_from_subscription`].
#[no_mangle]
pub unsafe extern "C" fn speech_config_from_endpoint(
    out: *mut SpxHandle,
    endpoint: *const c_char,
    subscription_key: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("speech_config_from_endpoint", out, |tables| {
            let endpoint = str_arg(endpoint, "endpoint")?;
            let key = opt_str_arg(subscription_key, "subscription key")?;
            api::speech_config_from_endpoint(tables, endpoint, key)
        })
    }
}

/// `subscription_key` may be null.
///
/// # Safety
/// See [`speech_config_from_subscription`].
#[no_mangle]
pub unsafe extern "C" fn speech_config_from_host(
    out: *mut SpxHandle,
    host: *const c_char,
    subscription_key: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("speech_config_from_host", out, |tables| {
            let host = str_arg(host, "host")?;
            let key = opt_str_arg(subscription_key, "subscription key")?;
            api::speech_config_from_host(tables, host, key)
        })
    }
}

/// Build a speech config from a JSON object of string properties.
///
/// # Safety
/// See [`speech_config_from_subscription`].
#[no_mangle]
pub unsafe extern "C" fn speech_config_from_json(
    out: *mut SpxHandle,
    json: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("speech_config_from_json", out, |tables| {
            api::speech_config_from_json(tables, str_arg(json, "speech config JSON")?)
        })
    }
}

handle_lifecycle!(
    speech_configs,
    speech_config_is_handle_valid,
    speech_config_release,
    speech_config_get_property_bag
);

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn audio_config_create_audio_input_from_default_microphone(
    out: *mut SpxHandle,
) -> SpxStatus {
    unsafe {
        create_into(
            "audio_config_create_audio_input_from_default_microphone",
            out,
            api::audio_config_from_default_microphone,
        )
    }
}

/// # Safety
/// See [`speech_config_from_subscription`].
#[no_mangle]
pub unsafe extern "C" fn audio_config_create_audio_input_from_a_microphone(
    out: *mut SpxHandle,
    device_name: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("audio_config_create_audio_input_from_a_microphone", out, |tables| {
            api::audio_config_from_microphone(tables, str_arg(device_name, "device name")?)
        })
    }
}

/// # Safety
/// See [`speech_config_from_subscription`].
#[no_mangle]
pub unsafe extern "C" fn audio_config_create_audio_input_from_wav_file_name(
    out: *mut SpxHandle,
    file_name: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("audio_config_create_audio_input_from_wav_file_name", out, |tables| {
            api::audio_config_from_wav_file_input(tables, str_arg(file_name, "file name")?)
        })
    }
}

/// # Safety
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn audio_config_create_audio_output_from_default_speaker(
    out: *mut SpxHandle,
) -> SpxStatus {
    unsafe {
        create_into(
            "audio_config_create_audio_output_from_default_speaker",
            out,
            api::audio_config_from_default_speaker_output,
        )
    }
}

/// # Safety
/// See [`speech_config_from_subscription`].
#[no_mangle]
pub unsafe extern "C" fn audio_config_create_audio_output_from_a_speaker(
    out: *mut SpxHandle,
    device_name: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("audio_config_create_audio_output_from_a_speaker", out, |tables| {
            api::audio_config_from_speaker_output(tables, str_arg(device_name, "device name")?)
        })
    }
}

/// # Safety
/// See [`speech_config_from_subscription`].
#[no_mangle]
pub unsafe extern "C" fn audio_config_create_audio_output_from_wav_file_name(
    out: *mut SpxHandle,
    file_name: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("audio_config_create_audio_output_from_wav_file_name", out, |tables| {
            api::audio_config_from_wav_file_output(tables, str_arg(file_name, "file name")?)
        })
    }
}

handle_lifecycle!(
    audio_configs,
    audio_config_is_handle_valid,
    audio_config_release,
    audio_config_get_property_bag
);

/// # Safety
/// See [`speech_config_from_subscription`].
#[no_mangle]
pub unsafe extern "C" fn source_lang_config_from_language(
    out: *mut SpxHandle,
    language: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("source_lang_config_from_language", out, |tables| {
            api::source_lang_config_from_language(tables, str_arg(language, "language")?)
        })
    }
}

/// # Safety
/// See [`speech_config_from_subscription`].
#[no_mangle]
pub unsafe extern "C" fn source_lang_config_from_language_and_endpoint_id(
    out: *mut SpxHandle,
    language: *const c_char,
    endpoint_id: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("source_lang_config_from_language_and_endpoint_id", out, |tables| {
            api::source_lang_config_from_language_and_endpoint_id(
                tables,
                str_arg(language, "language")?,
                str_arg(endpoint_id, "endpoint id")?,
            )
        })
    }
}

handle_lifecycle!(
    source_lang_configs,
    source_lang_config_is_handle_valid,
    source_lang_config_release,
    source_lang_config_get_property_bag
);

/// `languages` is a comma-separated list, e.g. `"en-US,de-DE"`.
///
/// # Safety
/// See [`speech_config_from_subscription`].
#[no_mangle]
pub unsafe extern "C" fn create_auto_detect_source_lang_config_from_languages(
    out: *mut SpxHandle,
    languages: *const c_char,
) -> SpxStatus {
    unsafe {
        create_into("create_auto_detect_source_lang_config_from_languages", out, |tables| {
            let languages: Vec<&str> = str_arg(languages, "languages")?.split(',').collect();
            api::auto_detect_source_lang_config_from_languages(tables, &languages)
        })
    }
}

/// # Safety
/// `out` must be null or valid for writes; `configs` must be null or point to
/// `count` handles.
#[no_mangle]
pub unsafe extern "C" fn create_auto_detect_source_lang_config_from_source_lang_configs(
    out: *mut SpxHandle,
    configs: *const SpxHandle,
    count: usize,
) -> SpxStatus {
    unsafe {
        create_into(
            "create_auto_detect_source_lang_config_from_source_lang_configs",
            out,
            |tables| {
                if configs.is_null() {
                    return Err(SpeechKitError::invalid_argument(
                        "source language config list is null",
                    ));
                }
                let handles: Vec<Handle> = slice::from_raw_parts(configs, count)
                    .iter()
                    .map(|raw| Handle::from_raw(*raw))
                    .collect();
                api::auto_detect_source_lang_config_from_source_lang_configs(tables, &handles)
            },
        )
    }
}

handle_lifecycle!(
    auto_detect_source_lang_configs,
    auto_detect_source_lang_config_is_handle_valid,
    auto_detect_source_lang_config_release,
    auto_detect_source_lang_config_get_property_bag
);
