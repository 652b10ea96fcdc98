//! Version command for the chatstream CLI.

/// The current version of chatstream, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version line printed by `--version`.
pub fn version_string() -> String {
    format!("chatstream {}", VERSION)
}

/// Handle the --version command.
pub fn handle_version_command() {
    println!("{}", version_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_not_empty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_version_string_names_binary() {
        assert!(version_string().starts_with("chatstream "));
        assert!(version_string().ends_with(VERSION));
    }
}
