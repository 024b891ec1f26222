//! Domain records for BGG catalog items.

/// Catalog item subtype used to scope collection and thing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    BoardGame,
    Expansion,
}

impl ItemType {
    /// The value BGG expects in `subtype=` / `type=` query parameters.
    ///
    /// The same string marks expansion links on a thing record, so it also
    /// serves as the expansion-link discriminator.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            ItemType::BoardGame => "boardgame",
            ItemType::Expansion => "boardgameexpansion",
        }
    }
}

/// One entry in a user's collection, with its ownership flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionGame {
    pub id: u64,
    pub name: String,
    pub year: i32,
    pub owned: bool,
}

/// A full catalog item with its cross-reference links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardGame {
    pub id: u64,
    pub name: String,
    pub year: i32,
    /// Empty when the item has no relations.
    pub links: Vec<Link>,
}

/// A typed relation from one catalog item to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: u64,
    pub link_type: String,
    /// Display name of the linked item.
    pub value: String,
}

/// A base game together with its unowned expansions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameWithExpansions {
    pub game: BoardGame,
    pub expansions: Vec<BoardGame>,
}
