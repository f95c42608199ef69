//! Joining and leaving conversations.
//!
//! ```text
//!            join_conversation                 leave_conversation
//! Detached ─────────────────────► Attached ─────────────────────► Detached
//!   site = Root                     site = Session(conv.session)    site = Root
//!                                   session.recognizers ∋ self      removed
//! ```
//!
//! The transcriber's attachment lock is held for the whole transition, so
//! two joins racing on the same transcriber never both succeed.
//!
//! A transcriber whose conversation was released without leaving is still
//! on that conversation's session. The next join or leave takes it off.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::capability::{caps, ObjectWithSite, Query};
use crate::error::{Result, SpeechKitError};
use crate::objects::{AttachmentState, Conversation, Recognizer};
use crate::site::{Session, Site};

/// Attach `recognizer` to `conversation`.
///
/// # Errors
/// - `InvalidArgument` if `recognizer` is not a conversation transcriber.
/// - `InvalidState` if it is already attached somewhere.
/// - `Runtime` if the conversation exposes no session or factory.
pub fn join_conversation(
    conversation: &Arc<Conversation>,
    recognizer: &Arc<dyn Recognizer>,
) -> Result<()> {
    let transcriber = recognizer.query::<caps::Transcriber>().ok_or_else(|| {
        SpeechKitError::invalid_argument("only conversation transcribers can join a conversation")
    })?;
    let with_site = recognizer
        .query::<caps::WithSite>()
        .ok_or_else(|| SpeechKitError::runtime("transcriber cannot be re-sited"))?;

    let mut attachment = transcriber.lock_attachment();
    if attachment.state() == AttachmentState::Attached {
        warn!(conversation = %conversation.id(), "transcriber already attached");
        return Err(SpeechKitError::InvalidState(
            "transcriber is already attached to a conversation".into(),
        ));
    }

    if attachment.is_stale() {
        attachment.unbind();
        if let Some(session) = return_to_root(recognizer, with_site) {
            debug!(session = session.id(), "dropped binding to a released conversation");
        }
    }

    let services = conversation
        .query::<caps::Services>()
        .ok_or_else(|| SpeechKitError::runtime("conversation provides no services"))?;
    let session = services
        .session()
        .ok_or_else(|| SpeechKitError::runtime("conversation has no session"))?;
    let factory = services
        .factory()
        .ok_or_else(|| SpeechKitError::runtime("conversation has no factory"))?;

    let audio = recognizer
        .query::<caps::AudioConfigAccessor>()
        .and_then(|access| access.audio_config());

    with_site.set_site(Site::Session(Arc::clone(&session)));
    factory.init_session_from_audio_config(&session, audio);
    attachment.bind(conversation);
    session.add_recognizer(Arc::clone(recognizer));

    info!(
        conversation = %conversation.id(),
        session = session.id(),
        "transcriber joined conversation"
    );
    Ok(())
}

/// Detach `recognizer` from whatever conversation it joined.
///
/// Returns `false` when it was not attached; that is not an error.
///
/// # Errors
/// `InvalidArgument` if `recognizer` is not a conversation transcriber.
pub fn leave_conversation(recognizer: &Arc<dyn Recognizer>) -> Result<bool> {
    let transcriber = recognizer.query::<caps::Transcriber>().ok_or_else(|| {
        SpeechKitError::invalid_argument("only conversation transcribers can leave a conversation")
    })?;

    let mut attachment = transcriber.lock_attachment();
    if !attachment.unbind() {
        return Ok(false);
    }

    let previous = recognizer
        .query::<caps::WithSite>()
        .and_then(|with_site| return_to_root(recognizer, with_site));
    if let Some(session) = previous {
        info!(session = session.id(), "transcriber left conversation");
    }
    Ok(true)
}

/// Move `recognizer` back to the root site and off the session it sat on.
fn return_to_root(
    recognizer: &Arc<dyn Recognizer>,
    with_site: &dyn ObjectWithSite,
) -> Option<Arc<Session>> {
    let previous = with_site.site();
    with_site.set_site(Site::Root);
    let session = previous.session().cloned()?;
    session.remove_recognizer(recognizer);
    Some(session)
}
