/// Error types for the game core.
///
/// None of these reach the player: landmark errors degrade to a "no face"
/// frame and media errors degrade to fallback sprites.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A tunable is out of range or inconsistent with another one.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The detector delivered a landmark set too short to index.
    #[error("Landmark {index} missing (detector delivered {len} points)")]
    LandmarkMissing { index: usize, len: usize },

    /// Top-of-head and chin coincide, so the mouth ratio is undefined.
    #[error("Degenerate face: head height is zero")]
    DegenerateFace,

    /// IO error while reading a config or sprite file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a config or sprite file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
