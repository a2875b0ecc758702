use std::sync::LazyLock;

/// Realm announced in `WWW-Authenticate` challenges
/// Default: "Realm"
pub static BASIC_AUTH_REALM: LazyLock<String> =
    LazyLock::new(|| std::env::var("BASIC_AUTH_REALM").unwrap_or_else(|_| "Realm".to_string()));

pub(crate) fn basic_challenge() -> String {
    format!("Basic realm=\"{}\"", BASIC_AUTH_REALM.as_str())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use std::env;

    // The LazyLock may already be initialized, so test the same logic it uses
    fn realm() -> String {
        env::var("BASIC_AUTH_REALM").unwrap_or_else(|_| "Realm".to_string())
    }

    #[test]
    #[serial]
    fn test_basic_auth_realm_default_and_custom() {
        let original = env::var("BASIC_AUTH_REALM").ok();

        unsafe { env::remove_var("BASIC_AUTH_REALM") };
        assert_eq!(realm(), "Realm");

        unsafe { env::set_var("BASIC_AUTH_REALM", "Staff") };
        assert_eq!(realm(), "Staff");

        unsafe {
            match original {
                Some(value) => env::set_var("BASIC_AUTH_REALM", value),
                None => env::remove_var("BASIC_AUTH_REALM"),
            }
        }
    }

    #[test]
    fn test_basic_challenge_format() {
        let challenge = super::basic_challenge();
        assert!(challenge.starts_with("Basic realm=\""));
        assert!(challenge.ends_with('"'));
    }
}
