//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// Uses `try_init`, so calling this more than once (several binaries
/// sharing setup code, or doctests in one process) keeps the first logger
/// instead of panicking.
///
/// # Example
/// ```
/// terrain_tiles::logging::init();
/// log::info!("Generator started");
/// ```
pub fn init() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}
