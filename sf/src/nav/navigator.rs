//! Section navigator: one active indicator, click-to-scroll

use tracing::{debug, info};

use super::observer::VisibilityEntry;
use crate::page::{self, PageLayout, SectionRect};

/// An indicator control and the section it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub control: String,
    pub target: Option<String>,
}

impl Indicator {
    pub fn new(control: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            control: control.into(),
            target: Some(target.into()),
        }
    }

    /// A control without a target reference
    pub fn untargeted(control: impl Into<String>) -> Self {
        Self {
            control: control.into(),
            target: None,
        }
    }
}

/// Visual flags for one indicator control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorMarker {
    pub control: String,
    /// Highlighted as the active dot
    pub active: bool,
    /// Announced as the current location
    pub current: bool,
    /// Target could not be resolved
    pub inert: bool,
}

/// Emitted when the active section switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveChange {
    pub previous: Option<String>,
    pub section: String,
    pub control: String,
}

/// Bring `section` to the top of the viewport, smoothly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub section: String,
}

#[derive(Debug, Clone)]
struct Registration {
    section: String,
    indicator: usize,
}

/// Tracks which registered section is active
#[derive(Debug, Clone)]
pub struct SectionNavigator {
    indicators: Vec<Indicator>,
    registrations: Vec<Registration>,
    active: Option<usize>,
    cta_target: String,
}

impl SectionNavigator {
    /// Resolve each indicator's target against `layout`
    ///
    /// Indicators whose target is missing, unknown, or already claimed are
    /// inert. The first registered section starts active.
    pub fn new(indicators: Vec<Indicator>, layout: &PageLayout) -> Self {
        debug!(count = indicators.len(), "SectionNavigator::new: called");
        let mut registrations: Vec<Registration> = Vec::new();
        for (i, indicator) in indicators.iter().enumerate() {
            match &indicator.target {
                Some(target)
                    if layout.section(target).is_some() && !registrations.iter().any(|r| &r.section == target) =>
                {
                    registrations.push(Registration {
                        section: target.clone(),
                        indicator: i,
                    });
                }
                _ => {
                    debug!(control = %indicator.control, target = ?indicator.target, "SectionNavigator::new: inert indicator");
                }
            }
        }

        let active = (!registrations.is_empty()).then_some(0);
        Self {
            indicators,
            registrations,
            active,
            cta_target: page::SKILLS.to_string(),
        }
    }

    /// One indicator per section of `layout`, in document order
    pub fn for_layout(layout: &PageLayout) -> Self {
        let indicators = layout
            .sections()
            .iter()
            .map(|s| Indicator::new(format!("dot-{}", s.id), s.id.clone()))
            .collect();
        Self::new(indicators, layout)
    }

    /// Section targeted by the hero call-to-action
    pub fn with_cta_target(mut self, section: impl Into<String>) -> Self {
        self.cta_target = section.into();
        self
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    /// Sections to hand to the observer, in registration order
    pub fn observed_sections(&self, layout: &PageLayout) -> Vec<SectionRect> {
        self.registrations
            .iter()
            .filter_map(|r| layout.section(&r.section).cloned())
            .collect()
    }

    /// Apply one batch of visibility entries
    ///
    /// Among intersecting entries for registered sections, the highest ratio
    /// wins; equal ratios go to the earliest registration.
    pub fn on_visibility(&mut self, batch: &[VisibilityEntry]) -> Option<ActiveChange> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, registration) in self.registrations.iter().enumerate() {
            let Some(entry) = batch
                .iter()
                .find(|e| e.is_intersecting && e.id == registration.section)
            else {
                continue;
            };
            if best.is_none_or(|(_, ratio)| entry.ratio > ratio) {
                best = Some((idx, entry.ratio));
            }
        }

        let (idx, ratio) = best?;
        if self.active == Some(idx) {
            return None;
        }

        let previous = self.active_section().map(str::to_string);
        self.active = Some(idx);
        let registration = &self.registrations[idx];
        let change = ActiveChange {
            previous,
            section: registration.section.clone(),
            control: self.indicators[registration.indicator].control.clone(),
        };
        info!(section = %change.section, ratio, "Active section changed");
        Some(change)
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active.map(|idx| self.registrations[idx].section.as_str())
    }

    /// Index of the active indicator control
    pub fn active_indicator(&self) -> Option<usize> {
        self.active.map(|idx| self.registrations[idx].indicator)
    }

    /// Flags for every indicator, in indicator order
    pub fn markers(&self) -> Vec<IndicatorMarker> {
        let active = self.active_indicator();
        self.indicators
            .iter()
            .enumerate()
            .map(|(i, indicator)| {
                let is_active = active == Some(i);
                IndicatorMarker {
                    control: indicator.control.clone(),
                    active: is_active,
                    current: is_active,
                    inert: !self.registrations.iter().any(|r| r.indicator == i),
                }
            })
            .collect()
    }

    /// Indicator `index` was clicked
    pub fn click(&self, index: usize) -> Option<ScrollRequest> {
        let registration = self.registrations.iter().find(|r| r.indicator == index)?;
        debug!(index, section = %registration.section, "SectionNavigator::click: scrolling");
        Some(ScrollRequest {
            section: registration.section.clone(),
        })
    }

    /// The hero call-to-action was clicked
    pub fn hero_cta(&self) -> ScrollRequest {
        debug!(section = %self.cta_target, "SectionNavigator::hero_cta: called");
        ScrollRequest {
            section: self.cta_target.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::observer::{Band, ViewportObserver};

    const T: f64 = 0.6;

    fn layout() -> PageLayout {
        PageLayout::full_height(&["one", "two", "three"], 10)
    }

    fn navigator() -> SectionNavigator {
        SectionNavigator::for_layout(&layout())
    }

    fn active_count(nav: &SectionNavigator) -> usize {
        nav.markers().iter().filter(|m| m.active).count()
    }

    #[test]
    fn test_first_section_active_initially() {
        let nav = navigator();
        assert_eq!(nav.active_section(), Some("one"));
        assert_eq!(active_count(&nav), 1);
        let markers = nav.markers();
        assert!(markers[0].active && markers[0].current);
        assert!(!markers[1].current);
    }

    #[test]
    fn test_sole_section_over_threshold_wins() {
        let mut nav = navigator();
        let batch = vec![
            VisibilityEntry::new("one", 0.3, T),
            VisibilityEntry::new("two", 0.6, T),
            VisibilityEntry::new("three", 0.1, T),
        ];
        let change = nav.on_visibility(&batch).unwrap();
        assert_eq!(change.section, "two");
        assert_eq!(change.previous.as_deref(), Some("one"));
        assert_eq!(change.control, "dot-two");
        assert_eq!(active_count(&nav), 1);
        assert_eq!(nav.active_indicator(), Some(1));
    }

    #[test]
    fn test_equal_ratios_go_to_first_registered() {
        let mut nav = navigator();
        nav.on_visibility(&[VisibilityEntry::new("one", 0.2, T)]);

        // Batch order must not matter
        let batch = vec![VisibilityEntry::new("three", 0.75, T), VisibilityEntry::new("two", 0.75, T)];
        let change = nav.on_visibility(&batch).unwrap();
        assert_eq!(change.section, "two");
    }

    #[test]
    fn test_higher_ratio_wins() {
        let mut nav = navigator();
        let batch = vec![VisibilityEntry::new("two", 0.7, T), VisibilityEntry::new("three", 0.9, T)];
        assert_eq!(nav.on_visibility(&batch).unwrap().section, "three");
    }

    #[test]
    fn test_below_threshold_changes_nothing() {
        let mut nav = navigator();
        let batch = vec![VisibilityEntry::new("two", 0.59, T)];
        assert!(nav.on_visibility(&batch).is_none());
        assert_eq!(nav.active_section(), Some("one"));
    }

    #[test]
    fn test_same_section_is_not_a_change() {
        let mut nav = navigator();
        assert!(nav.on_visibility(&[VisibilityEntry::new("one", 1.0, T)]).is_none());
    }

    #[test]
    fn test_unresolved_indicators_are_inert() {
        let indicators = vec![
            Indicator::untargeted("dot-none"),
            Indicator::new("dot-missing", "nowhere"),
            Indicator::new("dot-two", "two"),
            Indicator::new("dot-two-again", "two"),
        ];
        let mut nav = SectionNavigator::new(indicators, &layout());
        assert_eq!(nav.active_section(), Some("two"));
        assert_eq!(nav.active_indicator(), Some(2));

        let markers = nav.markers();
        assert!(markers[0].inert && markers[1].inert && markers[3].inert);
        assert!(!markers[2].inert);
        assert!(nav.click(0).is_none());
        assert!(nav.click(1).is_none());

        // Entries for unregistered sections are ignored
        assert!(nav.on_visibility(&[VisibilityEntry::new("one", 1.0, T)]).is_none());
        assert_eq!(nav.observed_sections(&layout()).len(), 1);
    }

    #[test]
    fn test_no_sections_no_active() {
        let nav = SectionNavigator::for_layout(&PageLayout::default());
        assert_eq!(nav.active_section(), None);
        assert!(nav.markers().is_empty());
    }

    #[test]
    fn test_click_and_cta() {
        let nav = navigator().with_cta_target("three");
        assert_eq!(nav.click(1).unwrap().section, "two");
        assert_eq!(nav.hero_cta().section, "three");
        assert!(nav.click(9).is_none());
    }

    #[test]
    fn test_driven_by_observer() {
        let layout = layout();
        let mut nav = SectionNavigator::for_layout(&layout);
        let mut observer = ViewportObserver::observe(nav.observed_sections(&layout), T);

        for top in [0.0, 3.0, 5.0, 8.0, 14.0, 20.0] {
            if let Some(batch) = observer.update(Band::new(top, 10.0)) {
                nav.on_visibility(&batch);
            }
            assert_eq!(active_count(&nav), 1);
        }
        assert_eq!(nav.active_section(), Some("three"));
    }
}
