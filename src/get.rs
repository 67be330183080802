//! Comic retrieval by number, or at random.
//!
//! Used by the `xkcd show` and `xkcd random` commands.

use anyhow::Result;
use rand::Rng;

use crate::config::Config;
use crate::display::render_comic;
use crate::error::LookupError;
use crate::models::Comic;
use crate::store::{Index, IndexStore};

/// Look up a comic by number, returning the stored record as-is.
pub fn get_comic(index: &Index, num: u32) -> Result<&Comic, LookupError> {
    index.get(num).ok_or(LookupError::NotFound(num))
}

/// Pick a comic uniformly at random.
///
/// Draws an index into the sorted list of comic numbers, so a seeded `rng`
/// always selects the same comic from the same index.
pub fn random_comic<'a, R: Rng>(
    index: &'a Index,
    rng: &mut R,
) -> Result<&'a Comic, LookupError> {
    let nums = index.sorted_numbers();
    if nums.is_empty() {
        return Err(LookupError::EmptyIndex);
    }
    let pick = nums[rng.random_range(0..nums.len())];
    get_comic(index, pick)
}

/// CLI entry point: prints one comic by number.
pub fn run_show(config: &Config, num: u32) -> Result<()> {
    let index = IndexStore::new(&config.index.path).load()?;
    let comic = get_comic(&index, num)?;
    print!(
        "{}",
        render_comic(comic, &config.remote.base_url, config.display.wrap_width)
    );
    Ok(())
}

/// CLI entry point: prints a random comic.
pub fn run_random(config: &Config) -> Result<()> {
    let index = IndexStore::new(&config.index.path).load()?;
    let comic = random_comic(&index, &mut rand::rng())?;
    println!("Random XKCD Comic:");
    print!(
        "{}",
        render_comic(comic, &config.remote.base_url, config.display.wrap_width)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn index_with(nums: &[u32]) -> Index {
        let mut index = Index::new();
        for &num in nums {
            index.insert(Comic {
                num,
                title: format!("Comic {}", num),
                alt: format!("alt {}", num),
                ..Comic::default()
            });
        }
        index
    }

    #[test]
    fn show_returns_exact_record() {
        let index = index_with(&[1, 2, 3]);
        let comic = get_comic(&index, 2).unwrap();
        assert_eq!(comic, index.get(2).unwrap());
        assert_eq!(comic.title, "Comic 2");
    }

    #[test]
    fn show_missing_number_is_not_found() {
        let index = index_with(&[1, 2, 3]);
        assert_eq!(get_comic(&index, 404), Err(LookupError::NotFound(404)));
    }

    #[test]
    fn random_on_empty_index_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            random_comic(&Index::new(), &mut rng),
            Err(LookupError::EmptyIndex)
        );
    }

    #[test]
    fn random_is_reproducible_with_a_seed() {
        let index = index_with(&[5, 1, 9, 3]);
        let a = random_comic(&index, &mut StdRng::seed_from_u64(42)).unwrap().num;
        let b = random_comic(&index, &mut StdRng::seed_from_u64(42)).unwrap().num;
        assert_eq!(a, b);
    }

    #[test]
    fn random_reaches_every_comic() {
        let index = index_with(&[1, 2, 3, 4]);
        let mut rng = StdRng::seed_from_u64(7);
        let seen: BTreeSet<u32> = (0..200)
            .map(|_| random_comic(&index, &mut rng).unwrap().num)
            .collect();
        assert_eq!(seen, BTreeSet::from([1, 2, 3, 4]));
    }
}
