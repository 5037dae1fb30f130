// One error type for the whole program.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Creating the window failed
    #[error("Window init error: {0}")]
    WindowInit(String),

    // Pushing the frame to the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    // One stamp image could not be read or decoded
    #[error("Image load error ({name}): {source}")]
    ImageLoad {
        name: String,
        #[source]
        source: image::ImageError,
    },

    // Network failure while talking to the remote listing
    #[error("Fetch error ({url}): {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // The listing came back but was not the JSON we expect
    #[error("Listing parse error: {0}")]
    Listing(#[from] serde_json::Error),

    // Strict load policy: at least one resource failed
    #[error("Incomplete load: {failed} of {total} images failed")]
    IncompleteLoad { failed: usize, total: usize },

    // The background loader died before reporting
    #[error("Image loader thread panicked")]
    LoaderPanicked,
}
