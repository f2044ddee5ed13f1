use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GardenerError {
    #[error("Too many same-named files at {path}, gave up resolving the conflict")]
    ConflictResolutionExhausted { path: PathBuf },

    #[error("job is missing its destination folder, filename or metadata")]
    MissingDestination,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_exhausted_display_names_path() {
        let err = GardenerError::ConflictResolutionExhausted {
            path: PathBuf::from("03_Resources/Notes/idea.md"),
        };
        assert!(err.to_string().contains("03_Resources/Notes/idea.md"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GardenerError>();
    }
}
