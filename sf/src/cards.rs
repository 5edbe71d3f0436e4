//! Card renderer: projects the skill list into expandable cards

use tracing::{debug, trace};

use crate::skills::Skill;

/// A rendered skill card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub description: String,
    pub expanded: bool,
}

/// All cards plus keyboard selection
#[derive(Debug, Clone, Default)]
pub struct CardDeck {
    cards: Vec<Card>,
    selected: usize,
    renders: u64,
}

impl CardDeck {
    pub fn new(skills: &[Skill]) -> Self {
        let mut deck = Self::default();
        deck.render(skills);
        deck
    }

    /// Rebuild every card from `skills`; all cards start collapsed
    pub fn render(&mut self, skills: &[Skill]) {
        self.cards = skills
            .iter()
            .map(|skill| Card {
                title: skill.title.clone(),
                description: skill.description.clone(),
                expanded: false,
            })
            .collect();
        self.selected = self.selected.min(self.cards.len().saturating_sub(1));
        self.renders += 1;
        debug!(count = self.cards.len(), renders = self.renders, "CardDeck::render: rebuilt");
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// How many times the deck has been rebuilt
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Flip a card between expanded and collapsed, returning its new state
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let card = self.cards.get_mut(index)?;
        card.expanded = !card.expanded;
        trace!(index, expanded = card.expanded, "CardDeck::toggle");
        self.selected = index;
        Some(card.expanded)
    }

    /// Toggle the selected card
    pub fn toggle_selected(&mut self) -> Option<bool> {
        self.toggle(self.selected)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.cards.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Select the last card, e.g. right after adding one
    pub fn select_last(&mut self) {
        self.selected = self.cards.len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::default_skills;

    #[test]
    fn test_render_projects_skills() {
        let deck = CardDeck::new(&default_skills());
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.render_count(), 1);
        assert_eq!(deck.cards()[0].title, "Rust");
        assert!(deck.cards().iter().all(|c| !c.expanded));
    }

    #[test]
    fn test_toggle() {
        let mut deck = CardDeck::new(&default_skills());
        assert_eq!(deck.toggle(1), Some(true));
        assert_eq!(deck.selected(), 1);
        assert!(deck.cards()[1].expanded);
        assert_eq!(deck.toggle(1), Some(false));
        assert_eq!(deck.toggle(7), None);
    }

    #[test]
    fn test_rerender_collapses_and_clamps_selection() {
        let mut deck = CardDeck::new(&default_skills());
        deck.select_last();
        deck.toggle_selected();

        deck.render(&default_skills()[..1]);
        assert_eq!(deck.render_count(), 2);
        assert_eq!(deck.selected(), 0);
        assert!(!deck.cards()[0].expanded);
    }

    #[test]
    fn test_selection_bounds() {
        let mut deck = CardDeck::new(&default_skills());
        deck.select_prev();
        assert_eq!(deck.selected(), 0);
        for _ in 0..5 {
            deck.select_next();
        }
        assert_eq!(deck.selected(), 2);
    }

    #[test]
    fn test_empty_deck() {
        let mut deck = CardDeck::new(&[]);
        assert!(deck.is_empty());
        assert_eq!(deck.toggle_selected(), None);
        deck.select_next();
        assert_eq!(deck.selected(), 0);
    }
}
