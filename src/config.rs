use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Folio";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the Gemini API credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Default Gemini model used for structure extraction.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Timeout for the single extraction request. Generous on purpose;
/// a full manuscript can take minutes to process.
pub const EXTRACTION_TIMEOUT_SECS: u64 = 600;

/// Cover geometry (portrait, 2:3).
pub const COVER_WIDTH: u32 = 1600;
pub const COVER_HEIGHT: u32 = 2400;

/// Cover palette: parchment field, dark ink.
pub const COVER_BACKGROUND: [u8; 3] = [0xd9, 0xaa, 0x5a];
pub const COVER_INK: [u8; 3] = [0x33, 0x20, 0x14];

/// File name of the temporary cover image inside the output directory.
pub const COVER_FILE_NAME: &str = "cover.png";

/// The extraction prompt template, read once at startup.
pub fn prompt_path() -> PathBuf {
    PathBuf::from("prompt.txt")
}

/// Default log filter when FOLIO_LOG is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}
