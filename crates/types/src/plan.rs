use serde::{Deserialize, Serialize};

/// Multi-version installation plan announced by the backend.
///
/// Set once per install run; only `current_version_index` moves afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationPlan {
    pub total_versions: usize,
    pub versions: Vec<String>,
    pub current_version_index: Option<usize>,
}

impl InstallationPlan {
    /// Plan for a fixed version list, no version active yet.
    #[must_use]
    pub fn new(versions: Vec<String>) -> Self {
        Self {
            total_versions: versions.len(),
            versions,
            current_version_index: None,
        }
    }

    /// The version currently being installed, if the backend announced one.
    #[must_use]
    pub fn current_version(&self) -> Option<&str> {
        self.current_version_index
            .and_then(|idx| self.versions.get(idx))
            .map(String::as_str)
    }
}

/// Derived per-version display state (the "chips" row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionState {
    Pending,
    Active,
    Completed,
    Failed,
}

/// Map one version's slot within a multi-version run onto a sub-range of the
/// overall percentage band. `range` is the (start, end) band for the whole
/// run; the result is the band for version `idx` of `total`.
#[must_use]
pub fn segment_progress(idx: usize, total: usize, range: (u32, u32)) -> (u32, u32) {
    let total = total.max(1) as u32;
    let idx = idx as u32;
    let span = range.1 - range.0;
    let start = range.0 + (idx * span / total);
    let end = range.0 + ((idx + 1) * span / total);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_version_follows_index() {
        let mut plan = InstallationPlan::new(vec!["v5.0".into(), "v5.1".into()]);
        assert_eq!(plan.current_version(), None);
        plan.current_version_index = Some(1);
        assert_eq!(plan.current_version(), Some("v5.1"));
        plan.current_version_index = Some(9);
        assert_eq!(plan.current_version(), None);
    }

    #[test]
    fn segments_partition_the_band() {
        let band = (35, 95);
        let (s0, e0) = segment_progress(0, 3, band);
        let (s1, e1) = segment_progress(1, 3, band);
        let (s2, e2) = segment_progress(2, 3, band);
        assert_eq!(s0, 35);
        assert_eq!(e0, s1);
        assert_eq!(e1, s2);
        assert_eq!(e2, 95);
    }

    #[test]
    fn zero_total_does_not_divide_by_zero() {
        assert_eq!(segment_progress(0, 0, (0, 100)), (0, 100));
    }
}
