use speechkit_core::settings::{runtime_settings, DEFAULT_LOG_FILTER};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::status::SpxStatus;

/// Install a stderr `tracing` subscriber filtered by `SPEECHKIT_LOG`
/// (default `speechkit=info`). Later calls, or a host that already set a
/// global subscriber, leave the existing one in place.
#[no_mangle]
pub extern "C" fn speechkit_enable_logging() -> SpxStatus {
    let filter = EnvFilter::try_new(&runtime_settings().log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    if installed {
        info!(filter = %runtime_settings().log_filter, "speechkit logging enabled");
    }
    SpxStatus::Ok
}
