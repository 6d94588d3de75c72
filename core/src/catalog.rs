//! Piece catalog: the shapes and colours a player assigns to the piece slots.
//!
//! Two pieces match iff both their shape and colour are equal. The slot order
//! matters: spawns draw a slot index in `0..=difficulty`, so the earlier slots
//! appear from the first level while later ones unlock as the game advances.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of piece slots a game is configured with.
pub const PIECE_SLOTS: usize = 7;

/// Artwork shapes available for piece slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PieceShape {
    /// Watermelon slice.
    Watermelon,
    /// Strawberry.
    Strawberry,
    /// Orange.
    Orange,
    /// Lemon.
    Lemon,
    /// Jawbreaker candy.
    Jawbreaker,
    /// Heart.
    Heart,
    /// Gummy bear.
    GummyBear,
    /// Bunch of grapes.
    Grapes,
    /// Diamond.
    Diamond,
    /// Cog wheel.
    Cog,
    /// Poker chip.
    Chip,
    /// Pair of cherries.
    Cherries,
    /// Candy corn.
    CandyCorn,
    /// Wrapped candy, second variant.
    #[serde(rename = "candy-2")]
    Candy2,
    /// Wrapped candy, first variant.
    #[serde(rename = "candy-1")]
    Candy1,
    /// Banana.
    Banana,
    /// Apple.
    Apple,
}

impl PieceShape {
    /// Every shape in catalog order.
    pub const ALL: [Self; 17] = [
        Self::Watermelon,
        Self::Strawberry,
        Self::Orange,
        Self::Lemon,
        Self::Jawbreaker,
        Self::Heart,
        Self::GummyBear,
        Self::Grapes,
        Self::Diamond,
        Self::Cog,
        Self::Chip,
        Self::Cherries,
        Self::CandyCorn,
        Self::Candy2,
        Self::Candy1,
        Self::Banana,
        Self::Apple,
    ];

    /// Asset name of the shape.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Watermelon => "watermelon",
            Self::Strawberry => "strawberry",
            Self::Orange => "orange",
            Self::Lemon => "lemon",
            Self::Jawbreaker => "jawbreaker",
            Self::Heart => "heart",
            Self::GummyBear => "gummy-bear",
            Self::Grapes => "grapes",
            Self::Diamond => "diamond",
            Self::Cog => "cog",
            Self::Chip => "chip",
            Self::Cherries => "cherries",
            Self::CandyCorn => "candy-corn",
            Self::Candy2 => "candy-2",
            Self::Candy1 => "candy-1",
            Self::Banana => "banana",
            Self::Apple => "apple",
        }
    }
}

/// Colour skins available for piece slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PieceColor {
    /// Blue.
    Blue,
    /// Brown.
    Brown,
    /// Cyan.
    Cyan,
    /// Dark gray.
    DarkGray,
    /// Gold.
    Gold,
    /// Gray.
    Gray,
    /// Green.
    Green,
    /// Magenta.
    Magenta,
    /// Orange.
    Orange,
    /// Pink.
    Pink,
    /// Purple.
    Purple,
    /// Red.
    Red,
    /// White.
    White,
    /// Yellow.
    Yellow,
}

impl PieceColor {
    /// Every colour in catalog order.
    pub const ALL: [Self; 14] = [
        Self::Blue,
        Self::Brown,
        Self::Cyan,
        Self::DarkGray,
        Self::Gold,
        Self::Gray,
        Self::Green,
        Self::Magenta,
        Self::Orange,
        Self::Pink,
        Self::Purple,
        Self::Red,
        Self::White,
        Self::Yellow,
    ];

    /// Skin name of the colour.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Brown => "brown",
            Self::Cyan => "cyan",
            Self::DarkGray => "dark-gray",
            Self::Gold => "gold",
            Self::Gray => "gray",
            Self::Green => "green",
            Self::Magenta => "magenta",
            Self::Orange => "orange",
            Self::Pink => "pink",
            Self::Purple => "purple",
            Self::Red => "red",
            Self::White => "white",
            Self::Yellow => "yellow",
        }
    }
}

/// Type identifier of a piece; equality decides matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceType {
    shape: PieceShape,
    color: PieceColor,
}

impl PieceType {
    /// Creates a piece type from a shape and colour.
    #[must_use]
    pub const fn new(shape: PieceShape, color: PieceColor) -> Self {
        Self { shape, color }
    }

    /// Shape of the piece.
    #[must_use]
    pub const fn shape(&self) -> PieceShape {
        self.shape
    }

    /// Colour of the piece.
    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.color.name(), self.shape.name())
    }
}

/// Fully configured set of piece slots.
///
/// Completeness and uniqueness of the slots are checked by the configuration
/// collaborator before a catalog is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PieceCatalog {
    slots: [PieceType; PIECE_SLOTS],
}

impl PieceCatalog {
    /// Creates a catalog from the configured slots.
    #[must_use]
    pub const fn new(slots: [PieceType; PIECE_SLOTS]) -> Self {
        Self { slots }
    }

    /// Piece type assigned to the slot, if the index is in range.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<PieceType> {
        self.slots.get(index).copied()
    }

    /// All configured slots in draw order.
    #[must_use]
    pub const fn slots(&self) -> &[PieceType; PIECE_SLOTS] {
        &self.slots
    }
}

impl Default for PieceCatalog {
    fn default() -> Self {
        Self::new([
            PieceType::new(PieceShape::Apple, PieceColor::Red),
            PieceType::new(PieceShape::Banana, PieceColor::Yellow),
            PieceType::new(PieceShape::Grapes, PieceColor::Purple),
            PieceType::new(PieceShape::Watermelon, PieceColor::Green),
            PieceType::new(PieceShape::Diamond, PieceColor::Cyan),
            PieceType::new(PieceShape::Heart, PieceColor::Pink),
            PieceType::new(PieceShape::Cog, PieceColor::Gray),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_slots_are_distinct() {
        let catalog = PieceCatalog::default();
        for (index, piece) in catalog.slots().iter().enumerate() {
            for other in &catalog.slots()[index + 1..] {
                assert_ne!(piece, other);
            }
        }
    }

    #[test]
    fn slot_lookup_is_bounded() {
        let catalog = PieceCatalog::default();
        assert!(catalog.slot(PIECE_SLOTS - 1).is_some());
        assert!(catalog.slot(PIECE_SLOTS).is_none());
    }

    #[test]
    fn same_shape_different_colour_does_not_match() {
        let red = PieceType::new(PieceShape::Apple, PieceColor::Red);
        let green = PieceType::new(PieceShape::Apple, PieceColor::Green);
        assert_ne!(red, green);
        assert_eq!(red, PieceType::new(PieceShape::Apple, PieceColor::Red));
    }

    #[test]
    fn display_names_follow_asset_naming() {
        let piece = PieceType::new(PieceShape::GummyBear, PieceColor::DarkGray);
        assert_eq!(piece.to_string(), "dark-gray/gummy-bear");
        assert_eq!(PieceShape::Candy2.name(), "candy-2");
    }
}
