//! Tracing setup for binaries and long-lived harnesses.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber: `RUST_LOG` when set, otherwise info
/// with debug detail for this workspace. Calling twice is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info")
            .add_directive("glint_runtime=debug".parse().expect("valid directive"))
            .add_directive("glint_palette=debug".parse().expect("valid directive"))
            .add_directive("glint_store=debug".parse().expect("valid directive"))
            .add_directive("glint_core=debug".parse().expect("valid directive"))
    });

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();
}
