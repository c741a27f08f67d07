/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Minimum accepted password length for the administrator account
pub const MIN_PASSWORD_LENGTH: u64 = 6;

// =============================================================================
// AUTH MESSAGES
// =============================================================================

/// Shared by unknown-username and wrong-password login failures
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub const ADMIN_ALREADY_EXISTS: &str = "Admin already exists. Use login instead.";

pub const MISSING_TOKEN: &str = "Access denied. No token provided.";

pub const INVALID_TOKEN: &str = "Invalid token.";

pub const ADMIN_NOT_FOUND: &str = "Invalid token. Admin not found.";
