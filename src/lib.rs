pub mod clock;
pub mod morse;
pub mod playback;
pub mod sequence;
pub mod timing;

/// Message replayed when no other text is supplied.
pub const DEFAULT_MESSAGE: &str =
    "MORSE WATCHER HELPS YOU DETECT AND DECODE MORSE CODE FROM FLASHING LIGHTS USING YOUR IPHONE CAMERA.";
