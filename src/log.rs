use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Global flag to control per-cycle mixing debug logging
pub static MIX_DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Set mix debug logging on/off
pub fn set_mix_debug(enabled: bool) {
    MIX_DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
    info!("🔧 Mix debug logging {}", if enabled { "ENABLED" } else { "DISABLED" });
}

/// Check if mix debug logging is enabled
pub fn is_mix_debug_enabled() -> bool {
    MIX_DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (e.g. "info" or "bridge_splitter=debug").
/// Does nothing if a global subscriber is already set.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .try_init()
        .ok();
}

/// Mix debug macro - only logs if mix debug is enabled
#[macro_export]
macro_rules! mix_debug {
    ($($arg:tt)*) => {
        if $crate::log::MIX_DEBUG_ENABLED.load(std::sync::atomic::Ordering::Relaxed) {
            tracing::debug!($($arg)*);
        }
    };
}
