//! Viewport observer: section visibility as a stream of change batches

use tracing::{debug, trace};

use crate::page::SectionRect;

/// The visible vertical band of the scroll container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Band {
    pub top: f64,
    pub height: f64,
}

impl Band {
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Visibility of one observed section at the time of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEntry {
    pub id: String,
    /// Visible fraction of the section, 0.0..=1.0
    pub ratio: f64,
    /// Ratio has reached the observer's threshold
    pub is_intersecting: bool,
}

impl VisibilityEntry {
    pub fn new(id: impl Into<String>, ratio: f64, threshold: f64) -> Self {
        Self {
            id: id.into(),
            ratio,
            is_intersecting: ratio >= threshold,
        }
    }
}

/// Entries delivered together
pub type VisibilityBatch = Vec<VisibilityEntry>;

/// Fraction of `section` inside `viewport`
pub fn intersection_ratio(section: &SectionRect, viewport: Band) -> f64 {
    if !(section.height > 0.0) || !section.top.is_finite() || !viewport.top.is_finite() {
        return 0.0;
    }
    let visible = section.bottom().min(viewport.bottom()) - section.top.max(viewport.top);
    (visible.max(0.0) / section.height).clamp(0.0, 1.0)
}

/// Reports sections whose threshold state changed since the last update
///
/// The first update after `observe` reports every section.
#[derive(Debug, Clone, Default)]
pub struct ViewportObserver {
    targets: Vec<SectionRect>,
    threshold: f64,
    reported: Vec<Option<bool>>,
}

impl ViewportObserver {
    /// Start observing `targets`, in registration order
    pub fn observe(targets: impl IntoIterator<Item = SectionRect>, threshold: f64) -> Self {
        let targets: Vec<SectionRect> = targets.into_iter().collect();
        debug!(count = targets.len(), threshold, "ViewportObserver::observe: called");
        let reported = vec![None; targets.len()];
        Self {
            targets,
            threshold,
            reported,
        }
    }

    pub fn targets(&self) -> &[SectionRect] {
        &self.targets
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Measure against `viewport`, returning a batch if anything crossed the threshold
    pub fn update(&mut self, viewport: Band) -> Option<VisibilityBatch> {
        let mut batch = VisibilityBatch::new();
        for (target, reported) in self.targets.iter().zip(self.reported.iter_mut()) {
            let entry = VisibilityEntry::new(&target.id, intersection_ratio(target, viewport), self.threshold);
            if *reported != Some(entry.is_intersecting) {
                *reported = Some(entry.is_intersecting);
                batch.push(entry);
            }
        }

        if batch.is_empty() {
            None
        } else {
            trace!(?viewport, ?batch, "ViewportObserver::update: batch");
            Some(batch)
        }
    }

    /// Lazily turn a sequence of viewport positions into change batches
    pub fn batches<'a, I>(&'a mut self, viewports: I) -> impl Iterator<Item = VisibilityBatch> + 'a
    where
        I: IntoIterator<Item = Band>,
        I::IntoIter: 'a,
    {
        viewports.into_iter().filter_map(move |band| self.update(band))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageLayout;

    fn layout() -> PageLayout {
        PageLayout::full_height(&["a", "b", "c"], 10)
    }

    #[test]
    fn test_intersection_ratio() {
        let layout = layout();
        let b = layout.section("b").unwrap();
        assert_eq!(intersection_ratio(b, Band::new(10.0, 10.0)), 1.0);
        assert_eq!(intersection_ratio(b, Band::new(4.0, 10.0)), 0.4);
        assert_eq!(intersection_ratio(b, Band::new(16.0, 10.0)), 0.4);
        assert_eq!(intersection_ratio(b, Band::new(30.0, 10.0)), 0.0);
    }

    #[test]
    fn test_zero_height_section_never_visible() {
        let rect = SectionRect {
            id: "x".into(),
            top: 0.0,
            height: 0.0,
        };
        assert_eq!(intersection_ratio(&rect, Band::new(0.0, 10.0)), 0.0);
    }

    #[test]
    fn test_first_update_reports_everything() {
        let mut observer = ViewportObserver::observe(layout().sections().to_vec(), 0.6);
        let batch = observer.update(Band::new(0.0, 10.0)).unwrap();
        assert_eq!(batch.len(), 3);
        assert!(batch[0].is_intersecting);
        assert!(!batch[1].is_intersecting);

        // Nothing crossed the threshold
        assert!(observer.update(Band::new(2.0, 10.0)).is_none());
    }

    #[test]
    fn test_reports_threshold_crossings_only() {
        let mut observer = ViewportObserver::observe(layout().sections().to_vec(), 0.6);
        observer.update(Band::new(0.0, 10.0));

        // a at 0.4, b at 0.6
        let batch = observer.update(Band::new(6.0, 10.0)).unwrap();
        let ids: Vec<&str> = batch.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(!batch[0].is_intersecting);
        assert!(batch[1].is_intersecting);
    }

    #[test]
    fn test_batches_is_lazy_sequence() {
        let mut observer = ViewportObserver::observe(layout().sections().to_vec(), 0.6);
        let bands = [0.0, 1.0, 2.0, 7.0, 8.0, 20.0].map(|top| Band::new(top, 10.0));
        let batches: Vec<VisibilityBatch> = observer.batches(bands).collect();
        // initial, a->b handoff at 7, b->c handoff at 20
        assert_eq!(batches.len(), 3);
    }
}
