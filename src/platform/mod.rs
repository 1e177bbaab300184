//! Platform abstraction layer
//!
//! The simulation never touches the browser. On wasm32 the `web` module
//! exposes it to the host page; native builds drive `sim` directly.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Seed for a new game when the caller does not pick one
pub fn default_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
