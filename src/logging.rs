//! Logger bootstrap for the `hover-sim` binary and tests.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects between debug output
/// for this crate and info level everywhere.
pub fn init(verbose: bool) {
    let filter = if verbose {
        format!("{},heli_hover={}", LevelFilter::Info, LevelFilter::Debug)
    } else {
        LevelFilter::Info.to_string()
    };

    let mut builder = Builder::from_env(Env::default().default_filter_or(filter));
    builder.format_timestamp_millis();

    // A logger may already be installed by an earlier test in the same binary.
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn init_tolerates_repeated_calls(#[case] verbose: bool) {
        init(verbose);
        init(verbose);
        assert!(log::max_level() >= LevelFilter::Error);
    }
}
