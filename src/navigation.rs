use crate::page::Slugged;

#[derive(Debug, PartialEq, Eq)]
pub struct Neighbors<'a, T> {
    pub previous: Option<&'a T>,
    pub next: Option<&'a T>,
}

/// Finds the entries around `current` in an oldest-first collection.
///
/// An unknown slug yields no neighbours. There is no wraparound at either end.
pub fn locate<'a, T: Slugged>(ordered: &'a [T], current: &str) -> Neighbors<'a, T> {
    let Some(index) = ordered.iter().position(|item| item.slug() == current) else {
        return Neighbors {
            previous: None,
            next: None,
        };
    };

    Neighbors {
        previous: index.checked_sub(1).and_then(|i| ordered.get(i)),
        next: ordered.get(index + 1),
    }
}
