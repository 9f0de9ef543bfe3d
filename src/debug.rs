use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Per-region diagnostic dumps are only computed when `PLANES_DEBUG` is set.
pub(crate) fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| std::env::var("PLANES_DEBUG").is_ok())
}
