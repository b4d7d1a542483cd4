use serde::{Deserialize, Serialize};

/// Latest aggregated view of installation progress.
///
/// A single mutable cell owned by the progress aggregator: overwritten in
/// place on every backend event, published to observers at a throttled
/// cadence. Cloned on publication, never shared by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProgressSnapshot {
    /// Overall completion, clamped to 0..=100.
    pub percentage: u8,
    /// Short activity line ("Downloading submodules...").
    pub activity: String,
    /// Secondary detail line, empty when the backend sent none.
    pub detail: String,
    /// Milliseconds since the Unix epoch at the last overwrite.
    pub last_update: i64,
}

impl ProgressSnapshot {
    /// Overwrite every field from an incoming event. The wire carries the
    /// percentage as an unclamped number; anything above 100 renders as 100.
    pub fn overwrite(
        &mut self,
        percentage: u32,
        activity: impl Into<String>,
        detail: impl Into<String>,
        timestamp_ms: i64,
    ) {
        self.percentage = clamp_percent(percentage);
        self.activity = activity.into();
        self.detail = detail.into();
        self.last_update = timestamp_ms;
    }

    /// Reset to the pristine pre-run state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Clamp a wire percentage into the displayable 0..=100 range.
#[must_use]
pub fn clamp_percent(percentage: u32) -> u8 {
    u8::try_from(percentage.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_replaces_all_fields() {
        let mut snapshot = ProgressSnapshot::default();
        snapshot.overwrite(42, "Downloading", "esp-idf v5.1", 1_700_000_000_000);
        assert_eq!(snapshot.percentage, 42);
        assert_eq!(snapshot.activity, "Downloading");
        assert_eq!(snapshot.detail, "esp-idf v5.1");
        assert_eq!(snapshot.last_update, 1_700_000_000_000);
    }

    #[test]
    fn percentage_is_clamped() {
        let mut snapshot = ProgressSnapshot::default();
        snapshot.overwrite(130, "x", "", 0);
        assert_eq!(snapshot.percentage, 100);
    }

    #[test]
    fn reset_restores_default() {
        let mut snapshot = ProgressSnapshot::default();
        snapshot.overwrite(99, "almost", "", 5);
        snapshot.reset();
        assert_eq!(snapshot, ProgressSnapshot::default());
    }
}
