//! Serde default values for configuration fields.

pub fn directory() -> String {
    "./navdata".to_string()
}

pub fn walkable_stem() -> String {
    "walkable".to_string()
}

pub fn blacklist_stem() -> String {
    "blacklist".to_string()
}

pub fn autosave_interval_secs() -> u64 {
    60
}

pub fn lock_retry_attempts() -> u32 {
    3
}

pub fn lock_retry_delay_ms() -> u64 {
    50
}
