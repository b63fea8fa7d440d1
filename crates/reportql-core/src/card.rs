use serde::Serialize;

/// Default number of rows a card shows.
pub const DEFAULT_CARD_RESULTS: usize = 5;

///
/// Card
///
/// A small dashboard tile: a query reference plus a row budget.
///

#[derive(Clone, Debug, Serialize)]
pub struct Card {
    pub title: String,
    pub query_name: String,
    pub number_of_results: usize,
    pub display_changelist_link: bool,
}

impl Card {
    #[must_use]
    pub fn new(title: impl Into<String>, query_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            query_name: query_name.into(),
            number_of_results: DEFAULT_CARD_RESULTS,
            display_changelist_link: false,
        }
    }

    #[must_use]
    pub const fn with_results(mut self, number_of_results: usize) -> Self {
        self.number_of_results = number_of_results;
        self
    }

    #[must_use]
    pub const fn with_changelist_link(mut self) -> Self {
        self.display_changelist_link = true;
        self
    }
}

///
/// CardLayout
///
/// An ordered arrangement of cards; `seq` fixes the display order.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct CardLayout {
    pub name: String,
    pub cards: Vec<(u32, String)>,
}

impl CardLayout {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cards: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_card(mut self, seq: u32, card_title: impl Into<String>) -> Self {
        self.cards.push((seq, card_title.into()));
        self
    }

    /// Card titles in `seq` order.
    #[must_use]
    pub fn ordered_titles(&self) -> Vec<&str> {
        let mut cards: Vec<&(u32, String)> = self.cards.iter().collect();
        cards.sort_by_key(|(seq, _)| *seq);

        cards.into_iter().map(|(_, title)| title.as_str()).collect()
    }
}
