#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("no audio artifacts available to merge")]
    NoArtifacts,

    #[error("failed to encode wav container: {0}")]
    Encode(#[from] hound::Error),
}
