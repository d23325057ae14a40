//! Console logging. Off the browser it goes to stderr so native tests run.

#[cfg(target_arch = "wasm32")]
pub fn debug(message: &str) {
    web_sys::console::log_1(&format!("[DEBUG] {}", message).into());
}

#[cfg(target_arch = "wasm32")]
pub fn error(message: &str) {
    web_sys::console::error_1(&format!("[ERROR] {}", message).into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn debug(message: &str) {
    eprintln!("[DEBUG] {}", message);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn error(message: &str) {
    eprintln!("[ERROR] {}", message);
}
