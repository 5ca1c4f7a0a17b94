use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a stderr subscriber; `RUST_LOG` overrides the default `warn` level.
///
/// Stdout carries the assembly listing, so diagnostics must never go there.
pub fn init_tracing() {
  let env_filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::WARN.into())
    .from_env_lossy();

  // A second call (e.g. from tests) keeps the first subscriber.
  let _ = Registry::default()
    .with(env_filter)
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .try_init();
}
