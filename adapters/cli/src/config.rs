use std::{collections::HashSet, fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use theme_match_core::{PieceCatalog, PieceColor, PieceShape, PieceType, PIECE_SLOTS};
use thiserror::Error;

/// Piece manifest format understood by [`load_catalog`].
pub(crate) const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Reasons a piece manifest is rejected before a game can start.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The manifest is not valid TOML or has unexpected fields.
    #[error("failed to parse piece manifest")]
    Parse(#[from] toml::de::Error),
    /// The manifest declares a version this build does not understand.
    #[error("unsupported piece manifest version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Version declared by the manifest.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
    /// The manifest does not configure every slot.
    #[error("piece manifest configures {found} slots; all {expected} are required")]
    IncompleteSlots {
        /// Slots present in the manifest.
        found: usize,
        /// Slots a game needs.
        expected: usize,
    },
    /// The manifest lists more slots than a game uses.
    #[error("piece manifest configures {found} slots; at most {expected} are allowed")]
    TooManySlots {
        /// Slots present in the manifest.
        found: usize,
        /// Slots a game needs.
        expected: usize,
    },
    /// Two slots use the same shape and colour, so they could never be told apart.
    #[error("piece {piece} is assigned to more than one slot")]
    DuplicateSlot {
        /// Repeated piece type.
        piece: PieceType,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    #[serde(rename = "slot", default)]
    slots: Vec<SlotEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SlotEntry {
    shape: PieceShape,
    color: PieceColor,
}

/// Reads and validates the piece manifest at `path`.
pub(crate) fn load_catalog(path: &Path) -> Result<PieceCatalog> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read piece manifest at {}", path.display()))?;
    parse_catalog(&contents)
        .with_context(|| format!("invalid piece manifest at {}", path.display()))
}

/// Parses a piece manifest, requiring exactly one distinct piece per slot.
pub(crate) fn parse_catalog(contents: &str) -> Result<PieceCatalog, ConfigError> {
    let manifest: Manifest = toml::from_str(contents)?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            found: manifest.version,
            expected: SUPPORTED_MANIFEST_VERSION,
        });
    }

    let found = manifest.slots.len();
    if found < PIECE_SLOTS {
        return Err(ConfigError::IncompleteSlots {
            found,
            expected: PIECE_SLOTS,
        });
    }
    if found > PIECE_SLOTS {
        return Err(ConfigError::TooManySlots {
            found,
            expected: PIECE_SLOTS,
        });
    }

    let mut seen = HashSet::with_capacity(PIECE_SLOTS);
    let mut slots = *PieceCatalog::default().slots();
    for (slot, entry) in slots.iter_mut().zip(&manifest.slots) {
        let piece = PieceType::new(entry.shape, entry.color);
        if !seen.insert(piece) {
            return Err(ConfigError::DuplicateSlot { piece });
        }
        *slot = piece;
    }

    Ok(PieceCatalog::new(slots))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED: &str = include_str!("../assets/pieces.toml");

    fn manifest_with(slots: &[(&str, &str)]) -> String {
        let mut manifest = String::from("version = 1\n");
        for (shape, color) in slots {
            manifest.push_str(&format!(
                "\n[[slot]]\nshape = \"{shape}\"\ncolor = \"{color}\"\n"
            ));
        }
        manifest
    }

    const SEVEN: [(&str, &str); 7] = [
        ("apple", "red"),
        ("apple", "green"),
        ("banana", "yellow"),
        ("cog", "dark-gray"),
        ("candy-2", "pink"),
        ("gummy-bear", "gold"),
        ("cherries", "magenta"),
    ];

    #[test]
    fn bundled_manifest_is_valid() {
        let catalog = parse_catalog(BUNDLED).expect("bundled manifest parses");
        assert_eq!(
            catalog.slot(0),
            Some(PieceType::new(PieceShape::Strawberry, PieceColor::Red))
        );
    }

    #[test]
    fn slots_keep_manifest_order() {
        let catalog = parse_catalog(&manifest_with(&SEVEN)).expect("valid manifest");
        assert_eq!(
            catalog.slot(1),
            Some(PieceType::new(PieceShape::Apple, PieceColor::Green))
        );
        assert_eq!(
            catalog.slot(4),
            Some(PieceType::new(PieceShape::Candy2, PieceColor::Pink))
        );
    }

    #[test]
    fn incomplete_manifest_blocks_the_game() {
        let error = parse_catalog(&manifest_with(&SEVEN[..6])).expect_err("six slots");
        assert!(matches!(
            error,
            ConfigError::IncompleteSlots {
                found: 6,
                expected: 7
            }
        ));
    }

    #[test]
    fn extra_slots_are_rejected() {
        let mut slots = SEVEN.to_vec();
        slots.push(("heart", "white"));
        let error = parse_catalog(&manifest_with(&slots)).expect_err("eight slots");
        assert!(matches!(error, ConfigError::TooManySlots { found: 8, .. }));
    }

    #[test]
    fn duplicate_pieces_are_rejected() {
        let mut slots = SEVEN;
        slots[6] = ("apple", "red");
        let error = parse_catalog(&manifest_with(&slots)).expect_err("duplicate slot");
        assert_eq!(error.to_string(), "piece red/apple is assigned to more than one slot");
    }

    #[test]
    fn unknown_shapes_and_versions_are_rejected() {
        let mut slots = SEVEN;
        slots[0] = ("pineapple", "red");
        assert!(matches!(
            parse_catalog(&manifest_with(&slots)),
            Err(ConfigError::Parse(_))
        ));

        let future = manifest_with(&SEVEN).replace("version = 1", "version = 2");
        assert!(matches!(
            parse_catalog(&future),
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }
}
