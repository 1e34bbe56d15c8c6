use std::io::Write;

// HTTP stack internals are noisy below warn.
const QUIET_MODULES: [&str; 3] = ["reqwest", "hyper_util", "rustls"];

/// Installs the global logger. `RUST_LOG` still overrides per-module levels.
pub fn setup_logging(level: log::LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    for module in QUIET_MODULES {
        builder.filter_module(module, level.min(log::LevelFilter::Warn));
    }
    builder
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{0} {1} {2}] {3}",
                record.level(),
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .target(env_logger::Target::Stdout)
        .init();
}
