//! Default configuration values - single source of truth

/// Default server host
pub const HOST: &str = "localhost";

/// Default MySQL port
pub const PORT: u16 = 3306;

/// Whether connections run in autocommit mode by default.
///
/// Off, so that `commit()` on the session marks transaction boundaries.
pub const AUTOCOMMIT: bool = false;

/// Whether TCP_NODELAY is set by default
pub const TCP_NODELAY: bool = true;

/// Whether TLS is requested by default
pub const SSL: bool = false;
