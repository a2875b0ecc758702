use std::sync::LazyLock;

/// Session cookie name the drivers read and write unless told otherwise
///
/// Reads the same `SESSION_COOKIE_NAME` variable as the server, so both sides
/// agree without extra setup.
pub static DRIVER_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or("__Host-SessionId".to_string())
});
