//! TUI application - event handling and state management
//!
//! The App struct owns the AppState plus the storage it writes through to,
//! and handles keyboard, mouse and frame events. It does not do any
//! rendering - that's delegated to the views module.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use eyre::Result;
use keystore::Storage;
use ratatui::layout::Rect;
use tracing::{debug, info, trace, warn};

use super::state::{AppState, HitTarget, InteractionMode, SkillPrompt, WHEEL_ROWS};
use crate::config::Config;
use crate::gauge::{Gauge, GaugeReadout, MAX_VALUE};
use crate::page;
use crate::skills::{AddOutcome, SkillsStore};

/// Slider step for keyboard adjustment
const SLIDER_STEP: i16 = 5;

/// TUI application
pub struct App {
    /// Application state
    state: AppState,
    /// Persistence for skills and slider values
    storage: Box<dyn Storage>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App").field("state", &self.state).finish_non_exhaustive()
    }
}

impl App {
    /// Load persisted data and build the initial state for a terminal of `width` x `height`
    pub fn new(config: &Config, mut storage: Box<dyn Storage>, width: u16, height: u16) -> Result<Self> {
        debug!(width, height, "App::new: called");
        let skills = SkillsStore::load(storage.as_mut())?;
        let gauge = Gauge::load(&config.sliders, storage.as_ref())?;
        let state = AppState::new(config, skills, gauge, Rect::new(0, 0, width, height));
        Ok(Self { state, storage })
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get mutable reference to state
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Get reference to storage
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_key: called");
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            debug!("App::handle_key: Ctrl+C force quit");
            return true;
        }

        match self.state.interaction_mode {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::Prompt(_) => self.handle_prompt_key(key),
            InteractionMode::Help => {
                debug!("App::handle_key: closing help");
                self.state.interaction_mode = InteractionMode::Normal;
            }
        }
        self.state.should_quit
    }

    /// Handle key in normal mode
    fn handle_normal_key(&mut self, key: KeyEvent) {
        let section = self.state.active_section().unwrap_or(page::HERO).to_string();
        match key.code {
            // === Quit / help ===
            KeyCode::Char('q') => {
                debug!("App::handle_normal_key: quit requested");
                self.state.should_quit = true;
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.state.interaction_mode = InteractionMode::Help;
            }

            // === Scrolling ===
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1.0),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1.0),
            KeyCode::PageDown | KeyCode::Char(' ') => {
                let target = self.state.scroll.offset() + self.state.layout.viewport_height();
                self.state.scroll.scroll_to(target);
            }
            KeyCode::PageUp => {
                let target = self.state.scroll.offset() - self.state.layout.viewport_height();
                self.state.scroll.scroll_to(target);
            }
            KeyCode::Home | KeyCode::Char('g') => self.state.scroll.scroll_to(0.0),
            KeyCode::End | KeyCode::Char('G') => {
                let max = self.state.scroll.max();
                self.state.scroll.scroll_to(max);
            }

            // === Indicator jumps ===
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.activate(HitTarget::Indicator(index));
            }

            // === Section-specific ===
            KeyCode::Enter if section == page::HERO => self.activate(HitTarget::HeroCta),
            KeyCode::Enter if section == page::SKILLS => {
                self.state.deck.toggle_selected();
            }
            KeyCode::Char('a') => self.activate(HitTarget::AddSkill),
            KeyCode::Left if section == page::SKILLS => self.state.deck.select_prev(),
            KeyCode::Right if section == page::SKILLS => self.state.deck.select_next(),
            KeyCode::Tab if section == page::INDEX => self.state.gauge.select_next(),
            KeyCode::BackTab if section == page::INDEX => self.state.gauge.select_prev(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') if section == page::INDEX => {
                self.adjust_slider(-SLIDER_STEP);
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') | KeyCode::Char('=')
                if section == page::INDEX =>
            {
                self.adjust_slider(SLIDER_STEP);
            }
            _ => {
                trace!(?key, "App::handle_normal_key: unbound");
            }
        }
    }

    /// Handle key while prompting for a new skill
    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let InteractionMode::Prompt(prompt) = &mut self.state.interaction_mode else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                debug!("App::handle_prompt_key: cancelled");
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Backspace => {
                prompt.input_mut().pop();
            }
            KeyCode::Char(c) => prompt.input_mut().push(c),
            KeyCode::Enter => match prompt.clone() {
                SkillPrompt::Title(title) => {
                    if title.trim().is_empty() {
                        debug!("App::handle_prompt_key: blank title, aborting");
                        self.state.interaction_mode = InteractionMode::Normal;
                    } else {
                        *prompt = SkillPrompt::Description {
                            title,
                            input: String::new(),
                        };
                    }
                }
                SkillPrompt::Description { title, input } => {
                    self.state.interaction_mode = InteractionMode::Normal;
                    if let Err(e) = self.add_skill(&title, &input) {
                        warn!(error = %e, "Failed to add skill");
                    }
                }
            },
            _ => {}
        }
    }

    /// Add a skill from raw input, re-rendering the cards once on success
    pub fn add_skill(&mut self, title: &str, description: &str) -> Result<AddOutcome> {
        let outcome = self.state.skills.add(self.storage.as_mut(), title, description)?;
        if let AddOutcome::Added(_) = outcome {
            self.state.deck.render(self.state.skills.skills());
            self.state.deck.select_last();
        }
        Ok(outcome)
    }

    /// Handle a mouse event observed at `now_ms`
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now_ms: f64) {
        trace!(?mouse, "App::handle_mouse: called");
        let pointer = self.state.cell_center(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Moved => self.pointer_moved(pointer, now_ms),
            MouseEventKind::Drag(MouseButton::Left) => {
                self.pointer_moved(pointer, now_ms);
                if let Some(target @ HitTarget::SliderTrack(_)) = self.state.hit_test(mouse.column, mouse.row) {
                    self.set_slider_from_column(target, mouse.column);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer_moved(pointer, now_ms);
                match self.state.hit_test(mouse.column, mouse.row) {
                    Some(target @ HitTarget::SliderTrack(_)) => self.set_slider_from_column(target, mouse.column),
                    Some(target) => self.activate(target),
                    None => {}
                }
            }
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_ROWS),
            MouseEventKind::ScrollUp => self.scroll_by(-WHEEL_ROWS),
            _ => {}
        }
    }

    fn pointer_moved(&mut self, pointer: crate::fx::Point, now_ms: f64) {
        self.state.glow.on_pointer_move(pointer, now_ms);
        if let Some(parallax) = self.state.parallax.as_mut() {
            parallax.on_pointer_move(pointer);
        }
    }

    /// The pointer left the window
    pub fn handle_pointer_leave(&mut self) {
        debug!("App::handle_pointer_leave: called");
        self.state.glow.on_pointer_leave();
        if let Some(parallax) = self.state.parallax.as_mut() {
            parallax.on_pointer_leave();
        }
    }

    /// Handle terminal resize
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "App::handle_resize: called");
        self.state.relayout(Rect::new(0, 0, width, height));
    }

    /// Run one animation frame
    ///
    /// Returns true if anything visible changed.
    pub fn on_frame(&mut self) -> bool {
        let mut changed = false;

        if let Some(style) = self.state.glow.on_frame() {
            self.state.glow_style = style;
            changed = true;
        }

        let window = self.state.window();
        if let Some(parallax) = self.state.parallax.as_mut() {
            changed |= parallax.on_frame(window).is_some();
        }

        changed |= self.state.scroll.on_frame();
        changed |= self.state.sync_navigation();
        changed
    }

    /// Perform the action behind a clickable target
    pub fn activate(&mut self, target: HitTarget) {
        debug!(?target, "App::activate: called");
        match target {
            HitTarget::Indicator(index) => {
                if let Some(request) = self.state.nav.click(index) {
                    self.state.scroll_to_section(&request.section);
                }
            }
            HitTarget::HeroCta => {
                let request = self.state.nav.hero_cta();
                self.state.scroll_to_section(&request.section);
            }
            HitTarget::Card(index) => {
                self.state.deck.toggle(index);
            }
            HitTarget::AddSkill => {
                self.state.interaction_mode = InteractionMode::Prompt(SkillPrompt::new());
            }
            HitTarget::SliderTrack(index) => {
                self.state.gauge.select(index);
            }
        }
    }

    fn scroll_by(&mut self, rows: f64) {
        self.state.scroll.scroll_by(rows);
        self.state.sync_navigation();
    }

    fn adjust_slider(&mut self, delta: i16) {
        match self.state.gauge.adjust_selected(self.storage.as_mut(), delta) {
            Ok(Some(readout)) => log_readout(&readout),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to save slider values"),
        }
    }

    /// Set a slider from a click on its track
    fn set_slider_from_column(&mut self, target: HitTarget, column: u16) {
        let HitTarget::SliderTrack(index) = target else {
            return;
        };
        let Some(track) = self.state.region_of(target) else {
            return;
        };
        let value = track_value(track, column);
        self.state.gauge.select(index);
        match self.state.gauge.set_index(self.storage.as_mut(), index, value) {
            Ok(Some(readout)) => log_readout(&readout),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to save slider values"),
        }
    }
}

fn log_readout(readout: &GaugeReadout) {
    info!(average = readout.average, level = readout.level, "Gauge updated");
}

/// Slider value for a click at `column` on `track`
fn track_value(track: Rect, column: u16) -> u8 {
    let span = track.width.saturating_sub(1);
    if span == 0 {
        return 0;
    }
    let offset = column.saturating_sub(track.x).min(span);
    let value = (f64::from(offset) * f64::from(MAX_VALUE) / f64::from(span)).round();
    value.clamp(0.0, f64::from(MAX_VALUE)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SKILLS_KEY;
    use crate::tui::state::HitRegion;
    use crossterm::event::KeyEventState;
    use keystore::MemoryStore;

    fn app() -> App {
        App::new(&Config::default(), Box::new(MemoryStore::new()), 100, 40).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn run_frames(app: &mut App, frames: usize) {
        for _ in 0..frames {
            app.on_frame();
        }
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        let mut app = self::app();
        assert!(app.handle_key(key(KeyCode::Char('q'))));
    }

    #[test]
    fn test_help_toggles() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('?')));
        assert_eq!(app.state().interaction_mode, InteractionMode::Help);
        app.handle_key(key(KeyCode::Char('q')));
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
        assert!(!app.state().should_quit);
    }

    #[test]
    fn test_add_skill_via_prompt() {
        let mut app = app();
        let renders = app.state().deck.render_count();

        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "  A  ");
        app.handle_key(key(KeyCode::Enter));
        type_text(&mut app, "  B  ");
        app.handle_key(key(KeyCode::Enter));

        let state = app.state();
        assert_eq!(state.interaction_mode, InteractionMode::Normal);
        assert_eq!(state.deck.render_count(), renders + 1);
        assert_eq!(state.deck.len(), 4);
        assert_eq!(state.deck.cards()[3].title, "A");
        assert_eq!(state.deck.cards()[3].description, "B");

        let raw = app.storage().get(SKILLS_KEY).unwrap().unwrap();
        assert!(raw.contains(r#"{"title":"A","description":"B"}"#));
    }

    #[test]
    fn test_blank_title_aborts_prompt() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "   ");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
        assert_eq!(app.state().skills.len(), 3);
    }

    #[test]
    fn test_blank_description_adds_nothing() {
        let mut app = app();
        let renders = app.state().deck.render_count();
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "Title");
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state().skills.len(), 3);
        assert_eq!(app.state().deck.render_count(), renders);
    }

    #[test]
    fn test_escape_cancels_prompt() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "quit");
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(
            app.state().interaction_mode,
            InteractionMode::Prompt(SkillPrompt::Title("qui".into()))
        );
        assert!(!app.state().should_quit);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
    }

    #[test]
    fn test_hero_enter_glides_to_skills() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        assert!(app.state().scroll.is_gliding());
        run_frames(&mut app, 60);

        let skills_top = app.state().layout.section(page::SKILLS).unwrap().top;
        assert_eq!(app.state().scroll.offset(), skills_top);
        assert_eq!(app.state().active_section(), Some(page::SKILLS));
    }

    #[test]
    fn test_number_key_clicks_indicator() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('4')));
        run_frames(&mut app, 60);
        assert_eq!(app.state().active_section(), Some(page::INDEX));

        // Out of range is ignored
        app.handle_key(key(KeyCode::Char('9')));
        assert!(!app.state().scroll.is_gliding());
    }

    #[test]
    fn test_slider_keys_on_index_screen() {
        let mut app = app();
        app.handle_key(key(KeyCode::End));
        run_frames(&mut app, 60);
        assert_eq!(app.state().active_section(), Some(page::INDEX));

        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.state().gauge.sliders()[1].value, 55);
        app.handle_key(key(KeyCode::Char('-')));
        app.handle_key(key(KeyCode::Char('-')));
        assert_eq!(app.state().gauge.sliders()[1].value, 45);
        assert!(app.storage().get(crate::gauge::INDEX_KEY).unwrap().is_some());
    }

    #[test]
    fn test_card_keys_on_skills_screen() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('3')));
        run_frames(&mut app, 60);

        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.state().deck.cards()[1].expanded);
    }

    #[test]
    fn test_wheel_scrolls_and_syncs() {
        let mut app = app();
        for _ in 0..10 {
            app.handle_mouse(mouse(MouseEventKind::ScrollDown, 5, 5), 0.0);
        }
        assert_eq!(app.state().scroll.offset(), 30.0);
        assert_eq!(app.state().active_section(), Some(page::ABOUT));
    }

    #[test]
    fn test_pointer_drives_effects() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Moved, 0, 0), 16.0);
        assert!(app.state().glow.is_scheduled());
        assert!(app.on_frame());

        let parallax = app.state().parallax.as_ref().unwrap();
        // Cell (0,0) center is (4,8) in an 800x640 window
        assert!((parallax.shift().x - (4.0 / 800.0 - 0.5) * 16.0).abs() < 1e-9);

        app.handle_pointer_leave();
        assert_eq!(app.state().parallax.as_ref().unwrap().shift(), crate::fx::Shift::ZERO);
        assert_eq!(app.state().glow.target_intensity(), 0.0);
    }

    #[test]
    fn test_pointer_leave_fades_on_later_frames() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Moved, 0, 0), 16.0);
        app.handle_mouse(mouse(MouseEventKind::Moved, 40, 20), 32.0);
        run_frames(&mut app, 5);
        let lit = app.state().glow.intensity();
        assert!(lit > 0.0);

        app.handle_pointer_leave();
        assert_eq!(app.state().glow.intensity(), lit);

        run_frames(&mut app, 200);
        assert!(app.state().glow.intensity() < lit);
        assert!(!app.state().glow.is_scheduled());
    }

    #[test]
    fn test_click_hit_regions() {
        let mut app = app();
        app.state_mut().hit_regions = vec![
            HitRegion {
                area: Rect::new(10, 5, 20, 4),
                target: HitTarget::Card(2),
            },
            HitRegion {
                area: Rect::new(10, 20, 21, 1),
                target: HitTarget::SliderTrack(0),
            },
        ];

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 12, 6), 0.0);
        assert!(app.state().deck.cards()[2].expanded);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 30, 20), 0.0);
        assert_eq!(app.state().gauge.sliders()[0].value, 100);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 20), 0.0);
        assert_eq!(app.state().gauge.sliders()[0].value, 50);
    }

    #[test]
    fn test_track_value() {
        let track = Rect::new(10, 0, 21, 1);
        assert_eq!(track_value(track, 10), 0);
        assert_eq!(track_value(track, 20), 50);
        assert_eq!(track_value(track, 30), 100);
        assert_eq!(track_value(track, 99), 100);
        assert_eq!(track_value(Rect::new(0, 0, 1, 1), 0), 0);
    }

    #[test]
    fn test_resize_relayouts() {
        let mut app = app();
        app.handle_resize(60, 20);
        assert_eq!(app.state().layout.viewport_height(), 17.0);
        assert_eq!(app.state().active_section(), Some(page::HERO));
    }
}
