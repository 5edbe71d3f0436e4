//! Page geometry: a vertical stack of full-height screens

use tracing::debug;

/// Hero screen with the call-to-action
pub const HERO: &str = "hero";
/// Free-form profile text
pub const ABOUT: &str = "about";
/// Skill cards
pub const SKILLS: &str = "skills";
/// Slider index and gauge
pub const INDEX: &str = "index";

/// Screens in document order
pub const SECTIONS: &[&str] = &[HERO, ABOUT, SKILLS, INDEX];

/// Human-readable title for a section id
pub fn section_title(id: &str) -> &str {
    match id {
        HERO => "Home",
        ABOUT => "About",
        SKILLS => "Skills",
        INDEX => "Skill Index",
        other => other,
    }
}

/// Vertical placement of one section, in rows
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRect {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionRect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Layout of every section for a given viewport height
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    sections: Vec<SectionRect>,
    viewport_height: f64,
}

impl PageLayout {
    /// Stack `ids` as screens exactly one viewport tall
    pub fn full_height<S: AsRef<str>>(ids: &[S], viewport_height: u16) -> Self {
        debug!(count = ids.len(), viewport_height, "PageLayout::full_height: called");
        let height = f64::from(viewport_height);
        let sections = ids
            .iter()
            .enumerate()
            .map(|(i, id)| SectionRect {
                id: id.as_ref().to_string(),
                top: i as f64 * height,
                height,
            })
            .collect();
        Self {
            sections,
            viewport_height: height,
        }
    }

    pub fn sections(&self) -> &[SectionRect] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&SectionRect> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Height of the whole document
    pub fn total_height(&self) -> f64 {
        self.sections.last().map(SectionRect::bottom).unwrap_or(0.0)
    }

    /// Largest valid scroll offset
    pub fn max_scroll(&self) -> f64 {
        (self.total_height() - self.viewport_height).max(0.0)
    }
}
