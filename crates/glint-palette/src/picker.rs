//! Color picking flow.
//!
//! Wraps a host-provided picker behind a capability check and records
//! every confirmed color into the recent list. Hosts without a native
//! picker degrade to `Unsupported` rather than erroring.

use std::sync::Arc;

use futures::future::BoxFuture;
use glint_core::{PickerError, StoreError};
use glint_store::Store;

/// Host access to a native color picker.
pub trait PickerHost: Send + Sync {
    /// Whether this host can show a picker at all.
    fn supported(&self) -> bool;

    /// Show the picker and resolve with the raw chosen value.
    fn pick(&self) -> BoxFuture<'static, Result<String, PickerError>>;
}

/// What a pick attempt came to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    /// A color was confirmed; carries the normalized hex value.
    Picked(String),

    /// The user dismissed the picker. Nothing was recorded.
    Cancelled,

    /// The host has no picker. Nothing was recorded.
    Unsupported,
}

/// Drives pick attempts and keeps the recent-color history current.
pub struct ColorFlow {
    host: Arc<dyn PickerHost>,
}

impl ColorFlow {
    pub fn new(host: Arc<dyn PickerHost>) -> Self {
        Self { host }
    }

    /// Run one pick attempt. A confirmed color is normalized and moved to
    /// the front of the recent list; cancellation records nothing.
    pub async fn pick(&self, store: &mut Store) -> Result<PickerOutcome, StoreError> {
        if !self.host.supported() {
            return Ok(PickerOutcome::Unsupported);
        }

        match self.host.pick().await {
            Ok(raw) => {
                let value = store.touch_color(&raw)?;
                tracing::debug!("Picked color {value}");
                Ok(PickerOutcome::Picked(value))
            }
            Err(PickerError::Cancelled) => Ok(PickerOutcome::Cancelled),
            Err(err) => {
                // Host failures read as a cancel to the caller.
                tracing::warn!("Color picker failed: {err}");
                Ok(PickerOutcome::Cancelled)
            }
        }
    }

    /// Re-select a color from the recent list, moving it to the front.
    pub fn reuse(&self, store: &mut Store, value: &str) -> Result<String, StoreError> {
        store.touch_color(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPicker {
        value: Option<String>,
    }

    impl FixedPicker {
        fn picking(value: &str) -> Self {
            Self {
                value: Some(value.to_string()),
            }
        }

        fn cancelling() -> Self {
            Self { value: None }
        }
    }

    impl PickerHost for FixedPicker {
        fn supported(&self) -> bool {
            true
        }

        fn pick(&self) -> BoxFuture<'static, Result<String, PickerError>> {
            let value = self.value.clone();
            Box::pin(async move { value.ok_or(PickerError::Cancelled) })
        }
    }

    struct NoPicker;

    impl PickerHost for NoPicker {
        fn supported(&self) -> bool {
            false
        }

        fn pick(&self) -> BoxFuture<'static, Result<String, PickerError>> {
            Box::pin(async { Err(PickerError::Unsupported) })
        }
    }

    #[tokio::test]
    async fn test_unsupported_host_degrades() {
        let flow = ColorFlow::new(Arc::new(NoPicker));
        let mut store = Store::new();

        let outcome = flow.pick(&mut store).await.unwrap();
        assert_eq!(outcome, PickerOutcome::Unsupported);
        assert!(store.recent_colors().is_empty());
    }

    #[tokio::test]
    async fn test_pick_normalizes_and_records() {
        let flow = ColorFlow::new(Arc::new(FixedPicker::picking("#ABC")));
        let mut store = Store::new();

        let outcome = flow.pick(&mut store).await.unwrap();
        assert_eq!(outcome, PickerOutcome::Picked("#aabbcc".to_string()));
        assert_eq!(store.recent_colors()[0].value, "#aabbcc");
    }

    #[tokio::test]
    async fn test_cancel_records_nothing() {
        let flow = ColorFlow::new(Arc::new(FixedPicker::cancelling()));
        let mut store = Store::new();

        let outcome = flow.pick(&mut store).await.unwrap();
        assert_eq!(outcome, PickerOutcome::Cancelled);
        assert!(store.recent_colors().is_empty());
    }

    #[tokio::test]
    async fn test_reuse_moves_to_front() {
        let flow = ColorFlow::new(Arc::new(FixedPicker::picking("#111111")));
        let mut store = Store::new();
        store.touch_color("#aaaaaa").unwrap();
        store.touch_color("#bbbbbb").unwrap();

        flow.reuse(&mut store, "#aaaaaa").unwrap();
        let values: Vec<_> = store.recent_colors().iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["#aaaaaa", "#bbbbbb"]);
    }

    #[tokio::test]
    async fn test_invalid_pick_value_errors() {
        let flow = ColorFlow::new(Arc::new(FixedPicker::picking("chartreuse")));
        let mut store = Store::new();

        assert!(flow.pick(&mut store).await.is_err());
        assert!(store.recent_colors().is_empty());
    }
}
