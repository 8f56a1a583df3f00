/// Environment variable naming the configuration file
pub const CONFIG_PATH_VAR: &str = "PERMITS_CONFIG";

/// Configuration file used when `PERMITS_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Prefix for environment overrides (`PERMITS_SERVER__PORT=8080`)
pub const ENV_PREFIX: &str = "PERMITS_";

/// SQLite busy timeout in seconds
pub const DB_BUSY_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// Session
// =============================================================================

/// Private (encrypted) cookie carrying the logged-in user id
pub const SESSION_COOKIE: &str = "permits_session";

/// Session lifetime in hours
pub const SESSION_MAX_AGE_HOURS: i64 = 8;

// =============================================================================
// Permits
// =============================================================================

/// Format of the server-assigned permit timestamp
pub const PERMIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// =============================================================================
// Chart
// =============================================================================

pub const CHART_WIDTH: u32 = 960;
pub const CHART_HEIGHT: u32 = 540;

/// Title drawn on top of the risk chart
pub const CHART_TITLE: &str = "CANTIDAD DE PERSONAS POR RIESGO";

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_INVALID_PERMIT: &str = "Datos ingresados incorrectos";

pub const ERR_INVALID_USER: &str = "Nombre, clave o correo incorrectos";

pub const ERR_DUPLICATE_CODE: &str = "El código de circulación ya se encuentra registrado";

pub const ERR_DUPLICATE_USER: &str = "El correo ya se encuentra registrado";

pub const ERR_ENTRY_NOT_FOUND: &str = "Entry not found";
