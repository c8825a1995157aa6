/// Session ids minted by the controller: local time at second resolution, "20250115093000"
pub(crate) const SESSION_ID_FORMAT: &str = "%Y%m%d%H%M%S";

/// Display format for turn timestamps in tables
pub(crate) const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Extension of session files inside the session directory
pub(crate) const SESSION_FILE_EXT: &str = "json";

/// Directory used when the platform reports no data directory
pub(crate) const FALLBACK_SESSION_DIR: &str = "chat_sessions";

/// Application name used for config and data paths
pub(crate) const APP_NAME: &str = "rulebot";
