//! Package-level constants.

/// Current version of mpkit (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "mpkit";

/// Default `User-Agent` sent with every request.
pub fn default_user_agent() -> String {
    format!("{NAME}/{VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_semver() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3, "VERSION must be semver (MAJOR.MINOR.PATCH)");
        for part in parts {
            let _: u32 = part.parse().expect("each semver segment must be a number");
        }
    }

    #[test]
    fn user_agent_contains_name_and_version() {
        let ua = default_user_agent();
        assert!(ua.starts_with("mpkit/"));
        assert!(ua.ends_with(VERSION));
    }
}
