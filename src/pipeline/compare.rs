use crate::types::{Book, PriceChange, PriceComparison};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Diffs the current scrape against the previous snapshot, matching by exact
/// title. Titles only in the previous snapshot are ignored.
pub fn compare_prices(current: &[Book], previous: &HashMap<String, Book>) -> PriceComparison {
    let mut comparison = PriceComparison::default();

    for book in current {
        match previous.get(&book.title) {
            Some(old) if old.price != book.price => {
                let change = book.price - old.price;
                let change_pct = if old.price == 0.0 {
                    0.0
                } else {
                    change / old.price * 100.0
                };
                comparison.changes.push(PriceChange {
                    title: book.title.clone(),
                    old_price: old.price,
                    new_price: book.price,
                    change,
                    change_pct,
                });
            }
            Some(_) => {}
            None => comparison.new_books.push(book.clone()),
        }
    }

    comparison.changes.sort_by(|a, b| {
        a.change_pct
            .partial_cmp(&b.change_pct)
            .unwrap_or(Ordering::Equal)
    });
    comparison
}

/// Keys a snapshot by title. A repeated title keeps the later book.
pub fn index_by_title(books: Vec<Book>) -> HashMap<String, Book> {
    books.into_iter().map(|b| (b.title.clone(), b)).collect()
}
