use std::fmt::Display;
use std::future::Future;

use log::warn;

/// A boolean switch that flips locally before the write is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimisticToggle {
    value: bool,
}

impl OptimisticToggle {
    pub fn new(value: bool) -> Self {
        Self { value }
    }

    pub fn value(&self) -> bool {
        self.value
    }

    /// Settle on the value the server reported.
    pub fn confirm(&mut self, value: bool) {
        self.value = value;
    }

    /// Flip now, run `write` with the new value, and flip back if it fails.
    pub async fn flip_with<F, Fut, T, E>(&mut self, write: F) -> Result<T, E>
    where
        F: FnOnce(bool) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let previous = self.value;
        self.value = !previous;

        match write(self.value).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("Toggle write failed, restoring previous value: {}", e);
                self.value = previous;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_write_restores_previous_value() {
        let mut toggle = OptimisticToggle::new(true);
        let mut seen = None;

        let result: Result<(), String> = toggle
            .flip_with(|next| {
                seen = Some(next);
                async { Err("PATCH failed".to_string()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(seen, Some(false));
        assert!(toggle.value());
    }

    #[tokio::test]
    async fn successful_write_keeps_new_value() {
        let mut toggle = OptimisticToggle::new(false);
        let result: Result<bool, String> = toggle.flip_with(|next| async move { Ok(next) }).await;
        assert_eq!(result, Ok(true));
        assert!(toggle.value());
    }
}
