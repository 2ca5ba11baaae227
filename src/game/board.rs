use rand::Rng;
use rand::seq::SliceRandom;

use super::catalog::Catalog;
use super::config::GridSize;
use super::error::GameError;
use super::state::Card;

/// Takes the first `rows * columns / 2` catalog entries, duplicates them and
/// shuffles the result into a fresh, face-down deck.
pub fn build_deck<R: Rng + ?Sized>(
    catalog: &Catalog,
    grid: GridSize,
    rng: &mut R,
) -> Result<Vec<Card>, GameError> {
    let pair_count = grid.pair_count()?;
    if pair_count > catalog.len() {
        return Err(GameError::InsufficientCatalog {
            needed: pair_count,
            available: catalog.len(),
        });
    }

    let selected = &catalog.entries()[..pair_count];
    let mut cards: Vec<Card> = selected
        .iter()
        .chain(selected.iter())
        .cloned()
        .map(Card::new)
        .collect();
    cards.shuffle(rng);
    Ok(cards)
}
