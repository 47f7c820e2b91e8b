//! Logger setup.
//!
//! Diagnostics go to stderr so the transcript on stdout stays parseable by
//! provisioning scripts. `RUST_LOG` overrides the default filter.

pub fn init() {
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
