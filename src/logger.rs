/// Initializes `env_logger` for the binary.
///
/// Generated files are reported at info level, so `Info` is the floor;
/// `verbose` adds hook discovery and resolution details.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .format_target(false)
        .format_timestamp(None)
        .init();
}
