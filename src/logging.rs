use tracing::Level;

pub fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Installs the global fmt subscriber. Calling it twice keeps the first subscriber.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod logging_test {
    use super::*;

    #[test]
    fn should_parse_levels() {
        assert_eq!(Level::DEBUG, parse_level("debug"));
        assert_eq!(Level::WARN, parse_level(" WARN "));
        assert_eq!(Level::INFO, parse_level(""));
        assert_eq!(Level::INFO, parse_level("verbose"));
    }

    #[test]
    fn should_tolerate_repeated_init() {
        init("info");
        init("debug");
    }
}
