use std::path::PathBuf;

/// Environment variable that overrides the storage root.
pub const STORAGE_ROOT_ENV: &str = "PCCSERVER_STORAGE";

/// Resolves the storage root: `PCCSERVER_STORAGE`, else a per-user config
/// directory under `pccserver/storage`, else `./storage/`.
pub fn resolve_storage_root() -> PathBuf {
    if let Ok(from_env) = std::env::var(STORAGE_ROOT_ENV) {
        if !from_env.is_empty() {
            return PathBuf::from(from_env);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("pccserver").join("storage");
    }

    PathBuf::from("./storage/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins() {
        std::env::set_var(STORAGE_ROOT_ENV, "/tmp/some-store");
        assert_eq!(resolve_storage_root(), PathBuf::from("/tmp/some-store"));
        std::env::remove_var(STORAGE_ROOT_ENV);
    }
}
