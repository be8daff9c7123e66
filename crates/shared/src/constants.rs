pub const APP_NAME: &str = "Archlink";

// Limits
pub const MAX_MESSAGE_LENGTH: usize = 4000;
pub const MAX_HIRE_MESSAGE_LENGTH: usize = 2000;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;
pub const MIN_DISPLAY_NAME_LENGTH: usize = 2;
pub const MAX_LOCATION_LENGTH: usize = 120;
pub const MAX_POST_TITLE_LENGTH: usize = 200;
pub const MAX_POST_DESCRIPTION_LENGTH: usize = 5000;
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const MESSAGE_PAGE_SIZE: i64 = 50;
pub const MAX_MESSAGE_PAGE_SIZE: i64 = 200;

pub const RECENT_NOTIFICATIONS_LIMIT: i64 = 10;
pub const MAX_NOTIFICATIONS_LIMIT: i64 = 100;

// WebSocket
pub const WS_HEARTBEAT_INTERVAL_MS: u64 = 30_000;
