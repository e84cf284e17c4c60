use {
    std::{io::IsTerminal as _, panic::PanicHookInfo},
    time::macros::format_description,
    tracing::{Level, Subscriber},
    tracing_subscriber::{
        fmt::{time::UtcTime, writer::MakeWriterExt as _},
        util::SubscriberInitExt as _,
    },
};

/// Installs the global tracing subscriber and a panic hook that reports panics
/// as `error` events.
///
/// `env_filter` uses the `EnvFilter` directive syntax, for example
/// `warn,deployer=debug`. Errors are written to stderr and everything else to
/// stdout, so a failed run stays visible when stdout is redirected.
pub fn initialize(env_filter: &str) {
    if let Err(err) = subscriber(env_filter).try_init() {
        eprintln!("tracing subscriber already installed: {err}");
        return;
    }
    std::panic::set_hook(Box::new(log_panic));
}

/// Like [`initialize`] without the panic hook. Calls after the first one are
/// no-ops, so every test can call it.
pub fn initialize_reentrant(env_filter: &str) {
    let _ = subscriber(env_filter).try_init();
}

fn subscriber(env_filter: &str) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt::fmt()
        .with_timer(UtcTime::new(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        )))
        .with_env_filter(env_filter)
        .with_ansi(std::io::stdout().is_terminal())
        .with_writer(
            std::io::stderr
                .with_max_level(Level::ERROR)
                .or_else(std::io::stdout),
        )
        .finish()
}

fn log_panic(info: &PanicHookInfo) {
    let thread = std::thread::current();
    let backtrace = std::backtrace::Backtrace::capture();
    tracing::error!(
        thread = thread.name().unwrap_or("<unnamed>"),
        "{info}\nstack backtrace:\n{backtrace}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_applies_per_target() {
        tracing::subscriber::with_default(subscriber("warn,deployer=debug"), || {
            assert!(tracing::enabled!(target: "deployer", Level::DEBUG));
            assert!(!tracing::enabled!(target: "deployer", Level::TRACE));
            assert!(!tracing::enabled!(target: "alloy_provider", Level::INFO));
            assert!(tracing::enabled!(target: "alloy_provider", Level::WARN));
        });
    }

    #[test]
    fn reentrant_initialization_is_idempotent() {
        initialize_reentrant("debug");
        initialize_reentrant("trace");
        tracing::debug!("subscriber installed once");
    }
}
