/// One-card-at-a-time navigation over the daily schedule.
///
/// Navigation wraps around in both directions. An empty carousel has no
/// current card and ignores navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel<T> {
    cards: Vec<T>,
    index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Prev,
    Next,
}

impl<T> Carousel<T> {
    pub fn new(cards: Vec<T>) -> Self {
        Self { cards, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        (!self.cards.is_empty()).then_some(self.index)
    }

    pub fn current(&self) -> Option<&T> {
        self.cards.get(self.index)
    }

    /// Jump to `index`, wrapped into range
    pub fn seek(&mut self, index: usize) {
        if !self.cards.is_empty() {
            self.index = index % self.cards.len();
        }
    }

    pub fn next(&mut self) {
        if !self.cards.is_empty() {
            self.index = (self.index + 1) % self.cards.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.cards.is_empty() {
            let len = self.cards.len();
            self.index = (self.index + len - 1) % len;
        }
    }

    pub fn step(&mut self, step: Step) {
        match step {
            Step::Prev => self.prev(),
            Step::Next => self.next(),
        }
    }

    pub fn into_cards(self) -> Vec<T> {
        self.cards
    }
}
