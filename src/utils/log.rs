use log::LevelFilter;

pub struct Logger;

impl Logger {
    /// Installs the colored console logger. Noisy HTTP internals are capped at
    /// `warn` unless trace output was asked for.
    pub fn init(level: LevelFilter) {
        let mut builder = colog::default_builder();
        builder.filter_level(level);

        if level < LevelFilter::Trace {
            builder
                .filter_module("reqwest", LevelFilter::Warn)
                .filter_module("hyper_util", LevelFilter::Warn)
                .filter_module("tectonic", LevelFilter::Warn);
        }

        builder.init();
    }
}
