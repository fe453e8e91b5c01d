//! Console logging
//!
//! In the browser messages go to the devtools console through `web_sys`.
//! Native builds (tests, host tooling) route through `tracing`, so an
//! installed subscriber decides what gets printed.

#[cfg(target_arch = "wasm32")]
pub fn info(message: &str) {
    web_sys::console::log_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn info(message: &str) {
    tracing::info!("{}", message);
}

#[cfg(target_arch = "wasm32")]
pub fn warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(message: &str) {
    tracing::warn!("{}", message);
}

#[cfg(target_arch = "wasm32")]
pub fn debug(message: &str) {
    web_sys::console::debug_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn debug(message: &str) {
    tracing::debug!("{}", message);
}
