use std::ffi::{c_char, CStr, CString};
use std::ptr;

use speechkit::config::*;
use speechkit::conversation::*;
use speechkit::factory::*;
use speechkit::property_bag::*;
use speechkit::{
    speechkit_free_string, speechkit_handle_tables_snapshot, SpxHandle, SpxStatus,
    SPXHANDLE_INVALID,
};

fn cstr(s: &str) -> CString {
    CString::new(s).expect("no interior NUL")
}

fn speech_config() -> SpxHandle {
    let key = cstr("key");
    let region = cstr("westus");
    let mut handle = SPXHANDLE_INVALID;
    let status =
        unsafe { speech_config_from_subscription(&mut handle, key.as_ptr(), region.as_ptr()) };
    assert_eq!(status, SpxStatus::Ok);
    assert!(speech_config_is_handle_valid(handle));
    handle
}

unsafe fn take_string(ptr: *mut c_char) -> String {
    assert!(!ptr.is_null());
    let value = unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .expect("utf-8")
        .to_string();
    unsafe { speechkit_free_string(ptr) };
    value
}

#[test]
fn failed_creation_resets_output_to_invalid() {
    let mut handle: SpxHandle = 7;
    let status = unsafe {
        synthesizer_create_speech_synthesizer_from_config(&mut handle, 12345, SPXHANDLE_INVALID)
    };
    assert_eq!(status, SpxStatus::InvalidArg);
    assert_eq!(handle, SPXHANDLE_INVALID);
}

#[test]
fn endpoint_id_and_auto_detect_conflict() {
    let json = cstr(r#"{"SPEECH-ModelId":"custom-endpoint"}"#);
    let mut config = SPXHANDLE_INVALID;
    assert_eq!(unsafe { speech_config_from_json(&mut config, json.as_ptr()) }, SpxStatus::Ok);

    let languages = cstr("en-US,de-DE");
    let mut auto = SPXHANDLE_INVALID;
    assert_eq!(
        unsafe {
            create_auto_detect_source_lang_config_from_languages(&mut auto, languages.as_ptr())
        },
        SpxStatus::Ok
    );

    let mut reco: SpxHandle = 0;
    let status = unsafe {
        recognizer_create_speech_recognizer_from_auto_detect_source_lang_config(
            &mut reco,
            config,
            auto,
            SPXHANDLE_INVALID,
        )
    };
    assert_eq!(status, SpxStatus::InvalidArg);
    assert_eq!(reco, SPXHANDLE_INVALID);
}

#[test]
fn property_bag_round_trip_through_handles() {
    let config = speech_config();
    let mut bag = SPXHANDLE_INVALID;
    assert_eq!(unsafe { speech_config_get_property_bag(config, &mut bag) }, SpxStatus::Ok);

    let name = cstr("custom-key");
    let value = cstr("custom-value");
    assert_eq!(
        unsafe { property_bag_set_string(bag, -1, name.as_ptr(), value.as_ptr()) },
        SpxStatus::Ok
    );

    let mut reco = SPXHANDLE_INVALID;
    assert_eq!(
        unsafe {
            recognizer_create_intent_recognizer_from_config(&mut reco, config, SPXHANDLE_INVALID)
        },
        SpxStatus::Ok
    );
    let mut reco_bag = SPXHANDLE_INVALID;
    assert_eq!(unsafe { recognizer_get_property_bag(reco, &mut reco_bag) }, SpxStatus::Ok);

    let mut out: *mut c_char = ptr::null_mut();
    let status =
        unsafe { property_bag_get_string(reco_bag, -1, name.as_ptr(), ptr::null(), &mut out) };
    assert_eq!(status, SpxStatus::Ok);
    assert_eq!(unsafe { take_string(out) }, "custom-value");

    let mut region: *mut c_char = ptr::null_mut();
    let status = unsafe {
        property_bag_get_string(reco_bag, 1002, ptr::null(), ptr::null(), &mut region)
    };
    assert_eq!(status, SpxStatus::Ok);
    assert_eq!(unsafe { CStr::from_ptr(region) }.to_str().expect("utf-8"), "westus");
    assert_eq!(unsafe { property_bag_free_string(region) }, SpxStatus::Ok);

    assert_eq!(property_bag_release(bag), SpxStatus::Ok);
    assert_eq!(property_bag_release(bag), SpxStatus::InvalidHandle);
    assert!(!property_bag_is_valid(bag));
    assert!(speech_config_is_handle_valid(config));
    assert_eq!(recognizer_handle_release(reco), SpxStatus::Ok);
    assert_eq!(property_bag_release(reco_bag), SpxStatus::Ok);
}

#[test]
fn conversation_and_transcriber_lifecycle() {
    let config = speech_config();
    let id = cstr("的");
    let mut conversation = SPXHANDLE_INVALID;
    assert_eq!(
        unsafe { conversation_create_from_config(&mut conversation, config, id.as_ptr()) },
        SpxStatus::Ok
    );

    let mut conv_id: *mut c_char = ptr::null_mut();
    assert_eq!(unsafe { conversation_get_id(conversation, &mut conv_id) }, SpxStatus::Ok);
    assert_eq!(unsafe { take_string(conv_id) }, "的");

    let user = cstr("alice@example.com");
    let bad_signature = cstr("1.1, 2.2");
    assert_eq!(
        unsafe {
            conversation_add_participant(
                conversation,
                user.as_ptr(),
                ptr::null(),
                bad_signature.as_ptr(),
            )
        },
        SpxStatus::InvalidArg
    );
    assert_eq!(
        unsafe {
            conversation_add_participant(conversation, user.as_ptr(), ptr::null(), ptr::null())
        },
        SpxStatus::Ok
    );

    let mut mic = SPXHANDLE_INVALID;
    assert_eq!(
        unsafe { audio_config_create_audio_input_from_default_microphone(&mut mic) },
        SpxStatus::Ok
    );
    let mut transcriber = SPXHANDLE_INVALID;
    assert_eq!(
        unsafe { recognizer_create_conversation_transcriber_from_config(&mut transcriber, mic) },
        SpxStatus::Ok
    );

    assert_eq!(recognizer_join_conversation(conversation, transcriber), SpxStatus::Ok);
    assert_eq!(
        recognizer_join_conversation(conversation, transcriber),
        SpxStatus::InvalidState
    );

    let mut attached = false;
    assert_eq!(
        unsafe { conversation_transcriber_is_attached(transcriber, &mut attached) },
        SpxStatus::Ok
    );
    assert!(attached);

    let mut json: *mut c_char = ptr::null_mut();
    assert_eq!(
        unsafe { conversation_transcriber_get_participants_json(transcriber, &mut json) },
        SpxStatus::Ok
    );
    let participants: serde_json::Value =
        serde_json::from_str(&unsafe { take_string(json) }).expect("json");
    assert_eq!(participants[0]["userId"], "alice@example.com");

    assert_eq!(recognizer_leave_conversation(transcriber), SpxStatus::Ok);
    assert_eq!(recognizer_leave_conversation(transcriber), SpxStatus::Ok);
    assert_eq!(
        unsafe { conversation_transcriber_is_attached(transcriber, &mut attached) },
        SpxStatus::Ok
    );
    assert!(!attached);

    assert_eq!(recognizer_handle_release(transcriber), SpxStatus::Ok);
    assert_eq!(conversation_release_handle(conversation), SpxStatus::Ok);
    assert!(!conversation_is_handle_valid(conversation));
}

#[test]
fn null_conversation_id_is_invalid() {
    let config = speech_config();
    let mut conversation: SpxHandle = 0;
    let status = unsafe { conversation_create_from_config(&mut conversation, config, ptr::null()) };
    assert_eq!(status, SpxStatus::InvalidArg);
    assert_eq!(conversation, SPXHANDLE_INVALID);
}

#[test]
fn handles_are_role_specific() {
    let config = speech_config();
    let mut connector = SPXHANDLE_INVALID;
    assert_eq!(
        unsafe {
            dialog_service_connector_create_dialog_service_connector_from_config(
                &mut connector,
                config,
                SPXHANDLE_INVALID,
            )
        },
        SpxStatus::Ok
    );

    assert!(dialog_service_connector_handle_is_valid(connector));
    assert!(!recognizer_handle_is_valid(connector));
    assert!(!audio_config_is_handle_valid(config));
    assert_eq!(recognizer_handle_release(connector), SpxStatus::InvalidHandle);
    assert_eq!(dialog_service_connector_handle_release(connector), SpxStatus::Ok);
}

#[test]
fn snapshot_is_json() {
    speech_config();
    let mut out: *mut c_char = ptr::null_mut();
    assert_eq!(unsafe { speechkit_handle_tables_snapshot(&mut out) }, SpxStatus::Ok);
    let snapshot: serde_json::Value =
        serde_json::from_str(&unsafe { take_string(out) }).expect("json");
    let tables = snapshot.as_array().expect("array");
    assert!(tables.iter().any(|t| t["kind"] == "speechConfig"));
}
