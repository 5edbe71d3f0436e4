//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here.
//! The page is a vertical stack of full-height screens; the engines in
//! `fx` and `nav` own their own state and are driven from here.

use ratatui::layout::Rect;
use tracing::{debug, trace};

use crate::cards::CardDeck;
use crate::config::{Config, ProfileConfig};
use crate::fx::{CursorGlow, Extent, GlowStyle, Parallax, Point, Shift};
use crate::gauge::Gauge;
use crate::nav::{Band, SectionNavigator, SmoothScroll, ViewportObserver};
use crate::page::{self, PageLayout};
use crate::skills::SkillsStore;

/// Rows reserved for the footer
pub const FOOTER_HEIGHT: u16 = 3;

/// Columns reserved for the indicator dots on the right
pub const INDICATOR_WIDTH: u16 = 4;

/// Rows scrolled per mouse wheel notch
pub const WHEEL_ROWS: f64 = 3.0;

/// Area of the scrolling page within the terminal
pub fn page_area(terminal: Rect) -> Rect {
    Rect::new(
        terminal.x,
        terminal.y,
        terminal.width.saturating_sub(INDICATOR_WIDTH),
        terminal.height.saturating_sub(FOOTER_HEIGHT),
    )
}

/// Column of indicator dots to the right of the page
pub fn indicator_area(terminal: Rect) -> Rect {
    let page = page_area(terminal);
    Rect::new(
        page.right(),
        terminal.y,
        terminal.width.saturating_sub(page.width),
        page.height,
    )
}

/// Two-stage prompt for a new skill
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillPrompt {
    /// Asking for the title
    Title(String),
    /// Title captured, asking for the description
    Description { title: String, input: String },
}

impl SkillPrompt {
    pub fn new() -> Self {
        Self::Title(String::new())
    }

    /// Prompt text for the current stage
    pub fn label(&self) -> &'static str {
        match self {
            Self::Title(_) => "Skill title: ",
            Self::Description { .. } => "Description: ",
        }
    }

    pub fn input(&self) -> &str {
        match self {
            Self::Title(input) | Self::Description { input, .. } => input,
        }
    }

    pub fn input_mut(&mut self) -> &mut String {
        match self {
            Self::Title(input) | Self::Description { input, .. } => input,
        }
    }
}

impl Default for SkillPrompt {
    fn default() -> Self {
        Self::new()
    }
}

/// Interaction mode (modal)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InteractionMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Adding a skill (a key)
    Prompt(SkillPrompt),
    /// Help overlay
    Help,
}

/// Something on screen that reacts to a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Indicator dot by index
    Indicator(usize),
    /// Hero call-to-action button
    HeroCta,
    /// Skill card by index
    Card(usize),
    /// The add-skill button
    AddSkill,
    /// Track of the slider at this index
    SliderTrack(usize),
}

/// Clickable area recorded during rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRegion {
    pub area: Rect,
    pub target: HitTarget,
}

/// Main application state
#[derive(Debug)]
pub struct AppState {
    /// Should the application quit
    pub should_quit: bool,
    /// Current interaction mode
    pub interaction_mode: InteractionMode,
    /// Hero and about text
    pub profile: ProfileConfig,
    /// Full terminal area
    pub terminal: Rect,
    /// Section geometry for the current terminal size
    pub layout: PageLayout,
    /// Section visibility source
    pub observer: ViewportObserver,
    /// Active indicator tracking
    pub nav: SectionNavigator,
    /// Page scroll position
    pub scroll: SmoothScroll,
    /// Skill list
    pub skills: SkillsStore,
    /// Rendered skill cards
    pub deck: CardDeck,
    /// Sliders and aggregate
    pub gauge: Gauge,
    /// Cursor glow effect
    pub glow: CursorGlow,
    /// Last published glow parameters
    pub glow_style: GlowStyle,
    /// Parallax effect, absent under reduced motion
    pub parallax: Option<Parallax>,
    /// Device units per terminal cell
    pub cell: Extent,
    /// Visibility threshold for the observer
    pub threshold: f64,
    /// Clickable regions from the last render
    pub hit_regions: Vec<HitRegion>,
}

impl AppState {
    /// Create state for a terminal of the given size
    pub fn new(config: &Config, skills: SkillsStore, gauge: Gauge, terminal: Rect) -> Self {
        debug!(?terminal, "AppState::new: called");
        let cell = Extent::new(config.effects.cell_width, config.effects.cell_height);
        let window = window_extent(terminal, cell);
        let glow = CursorGlow::with_tuning(window, config.effects.glow);
        let glow_style = glow.style();
        let parallax = (!config.effects.reduced_motion).then(|| Parallax::new(config.effects.max_shift));
        let deck = CardDeck::new(skills.skills());

        let mut state = Self {
            should_quit: false,
            interaction_mode: InteractionMode::Normal,
            profile: config.profile.clone(),
            terminal,
            layout: PageLayout::default(),
            observer: ViewportObserver::default(),
            nav: SectionNavigator::for_layout(&PageLayout::default()),
            scroll: SmoothScroll::new(0.0),
            skills,
            deck,
            gauge,
            glow,
            glow_style,
            parallax,
            cell,
            threshold: config.navigation.threshold,
            hit_regions: Vec::new(),
        };
        state.relayout(terminal);
        state
    }

    /// Recompute page geometry for a new terminal size
    ///
    /// The active section stays at the top of the viewport.
    pub fn relayout(&mut self, terminal: Rect) {
        debug!(?terminal, "AppState::relayout: called");
        let keep = self.nav.active_section().map(str::to_string);

        self.terminal = terminal;
        let page = page_area(terminal);
        self.layout = PageLayout::full_height(page::SECTIONS, page.height);
        self.nav = SectionNavigator::for_layout(&self.layout);
        self.observer = ViewportObserver::observe(self.nav.observed_sections(&self.layout), self.threshold);
        self.scroll = SmoothScroll::new(self.layout.max_scroll());

        if let Some(top) = keep.and_then(|id| self.layout.section(&id).map(|s| s.top)) {
            self.scroll.jump_to(top);
        }
        self.sync_navigation();
    }

    /// Visible band of the page
    pub fn viewport(&self) -> Band {
        Band::new(self.scroll.offset(), self.layout.viewport_height())
    }

    /// Feed the current viewport to the observer and the navigator
    ///
    /// Returns true if the active section changed.
    pub fn sync_navigation(&mut self) -> bool {
        let Some(batch) = self.observer.update(self.viewport()) else {
            return false;
        };
        self.nav.on_visibility(&batch).is_some()
    }

    /// Start a smooth scroll bringing `section` to the top
    pub fn scroll_to_section(&mut self, section: &str) {
        if let Some(top) = self.layout.section(section).map(|s| s.top) {
            self.scroll.scroll_to(top);
        }
    }

    /// Id of the active section, if any
    pub fn active_section(&self) -> Option<&str> {
        self.nav.active_section()
    }

    /// Is `section` the active one
    pub fn is_active(&self, section: &str) -> bool {
        self.active_section() == Some(section)
    }

    /// Terminal size in device units
    pub fn window(&self) -> Extent {
        window_extent(self.terminal, self.cell)
    }

    /// Center of a terminal cell in device units
    pub fn cell_center(&self, column: u16, row: u16) -> Point {
        Point::new(
            (f64::from(column) + 0.5) * self.cell.width,
            (f64::from(row) + 0.5) * self.cell.height,
        )
    }

    /// Parallax offsets in whole cells
    pub fn shift_cells(&self) -> (i32, i32) {
        let shift = self.parallax.as_ref().map(Parallax::shift).unwrap_or(Shift::ZERO);
        if !(self.cell.width > 0.0 && self.cell.height > 0.0) {
            return (0, 0);
        }
        (
            (shift.x / self.cell.width).round() as i32,
            (shift.y / self.cell.height).round() as i32,
        )
    }

    /// Topmost clickable region under a cell
    pub fn hit_test(&self, column: u16, row: u16) -> Option<HitTarget> {
        let hit = self
            .hit_regions
            .iter()
            .rev()
            .find(|region| contains(region.area, column, row))
            .map(|region| region.target);
        trace!(column, row, ?hit, "AppState::hit_test");
        hit
    }

    /// Region recorded for a target, if it was drawn
    pub fn region_of(&self, target: HitTarget) -> Option<Rect> {
        self.hit_regions.iter().find(|r| r.target == target).map(|r| r.area)
    }
}

fn window_extent(terminal: Rect, cell: Extent) -> Extent {
    Extent::new(
        f64::from(terminal.width) * cell.width,
        f64::from(terminal.height) * cell.height,
    )
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::Gauge;
    use keystore::MemoryStore;

    fn state(width: u16, height: u16) -> AppState {
        let config = Config::default();
        let mut storage = MemoryStore::new();
        let skills = SkillsStore::load(&mut storage).unwrap();
        let gauge = Gauge::new(&config.sliders);
        AppState::new(&config, skills, gauge, Rect::new(0, 0, width, height))
    }

    #[test]
    fn test_page_and_indicator_areas() {
        let terminal = Rect::new(0, 0, 100, 40);
        assert_eq!(page_area(terminal), Rect::new(0, 0, 96, 37));
        assert_eq!(indicator_area(terminal), Rect::new(96, 0, 4, 37));
    }

    #[test]
    fn test_new_state_starts_on_hero() {
        let state = state(100, 40);
        assert_eq!(state.active_section(), Some(page::HERO));
        assert_eq!(state.layout.sections().len(), page::SECTIONS.len());
        assert_eq!(state.scroll.max(), 37.0 * 3.0);
        assert!(state.parallax.is_some());
    }

    #[test]
    fn test_sync_navigation_follows_scroll() {
        let mut state = state(100, 40);
        state.scroll.jump_to(37.0 * 2.0);
        assert!(state.sync_navigation());
        assert_eq!(state.active_section(), Some(page::SKILLS));
        assert!(!state.sync_navigation());
    }

    #[test]
    fn test_relayout_keeps_active_section() {
        let mut state = state(100, 40);
        state.scroll.jump_to(37.0 * 3.0);
        state.sync_navigation();
        assert_eq!(state.active_section(), Some(page::INDEX));

        state.relayout(Rect::new(0, 0, 80, 23));
        assert_eq!(state.active_section(), Some(page::INDEX));
        assert_eq!(state.scroll.offset(), 20.0 * 3.0);
    }

    #[test]
    fn test_reduced_motion_disables_parallax() {
        let mut config = Config::default();
        config.effects.reduced_motion = true;
        let mut storage = MemoryStore::new();
        let skills = SkillsStore::load(&mut storage).unwrap();
        let state = AppState::new(&config, skills, Gauge::new(&[]), Rect::new(0, 0, 80, 24));
        assert!(state.parallax.is_none());
        assert_eq!(state.shift_cells(), (0, 0));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut state = state(100, 40);
        state.hit_regions = vec![
            HitRegion {
                area: Rect::new(0, 0, 10, 10),
                target: HitTarget::Card(0),
            },
            HitRegion {
                area: Rect::new(2, 2, 3, 1),
                target: HitTarget::AddSkill,
            },
        ];
        assert_eq!(state.hit_test(3, 2), Some(HitTarget::AddSkill));
        assert_eq!(state.hit_test(3, 3), Some(HitTarget::Card(0)));
        assert_eq!(state.hit_test(10, 3), None);
    }

    #[test]
    fn test_cell_center() {
        let state = state(100, 40);
        assert_eq!(state.cell_center(0, 0), Point::new(4.0, 8.0));
        assert_eq!(state.window(), Extent::new(800.0, 640.0));
    }

    #[test]
    fn test_prompt_stages() {
        let mut prompt = SkillPrompt::new();
        prompt.input_mut().push_str("Go");
        assert_eq!(prompt.label(), "Skill title: ");
        assert_eq!(prompt.input(), "Go");
    }
}
