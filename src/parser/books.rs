use super::selectors::{first_attr, first_text, selector};
use crate::error::Result;
use crate::types::Book;
use chrono::{DateTime, Utc};
use scraper::Html;

/// Extracts every `article.product_pod` listing on a catalogue page.
pub fn parse_books(html: &str, scraped_at: DateTime<Utc>) -> Result<Vec<Book>> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let product = selector("article.product_pod")?;
    let title_link = selector("h3 a")?;
    let price = selector("p.price_color")?;
    let availability = selector("p.availability")?;
    let rating = selector("p.star-rating")?;

    let books = root
        .select(&product)
        .map(|el| {
            let title = first_attr(el, &title_link, "title");
            let availability = first_text(el, &availability);
            Book {
                title: or_unknown(title),
                price: parse_price(&first_text(el, &price)),
                availability: or_unknown(availability),
                rating: rating_label(&first_attr(el, &rating, "class")),
                url: first_attr(el, &title_link, "href"),
                scraped_at,
            }
        })
        .collect();
    Ok(books)
}

fn or_unknown(value: String) -> String {
    if value.is_empty() {
        "Unknown".to_string()
    } else {
        value
    }
}

/// Strips currency glyphs (including the `Â£` mojibake the site sometimes
/// serves). Unparseable text becomes 0.0.
pub fn parse_price(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

/// `"star-rating Three"` -> `"Three"`
fn rating_label(class: &str) -> String {
    class
        .split_whitespace()
        .filter(|part| *part != "star-rating")
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOGUE: &str = r#"
        <ol class="row">
          <li><article class="product_pod">
            <p class="star-rating Three"></p>
            <h3><a href="catalogue/a-light-in-the-attic_1000/index.html" title="A Light in the Attic">A Light in the ...</a></h3>
            <div class="product_price">
              <p class="price_color">£51.77</p>
              <p class="instock availability">
                <i class="icon-ok"></i>
                  In stock
              </p>
            </div>
          </article></li>
          <li><article class="product_pod">
            <p class="star-rating One"></p>
            <h3><a href="catalogue/tipping-the-velvet_999/index.html" title="Tipping the Velvet">Tipping</a></h3>
            <p class="price_color">Â£53.74</p>
          </article></li>
          <li><article class="product_pod">
            <h3><a href="catalogue/broken/index.html">Broken</a></h3>
            <p class="price_color">call us</p>
          </article></li>
        </ol>
    "#;

    #[test]
    fn test_parse_books_fields() {
        let now = Utc::now();
        let books = parse_books(CATALOGUE, now).unwrap();
        assert_eq!(books.len(), 3);

        assert_eq!(books[0].title, "A Light in the Attic");
        assert_eq!(books[0].price, 51.77);
        assert_eq!(books[0].availability, "In stock");
        assert_eq!(books[0].rating, "Three");
        assert_eq!(books[0].url, "catalogue/a-light-in-the-attic_1000/index.html");
        assert_eq!(books[0].scraped_at, now);

        assert_eq!(books[1].price, 53.74);
        assert_eq!(books[1].availability, "Unknown");
        assert_eq!(books[1].rating, "One");
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let books = parse_books(CATALOGUE, Utc::now()).unwrap();
        assert_eq!(books[2].title, "Unknown");
        assert_eq!(books[2].price, 0.0);
        assert_eq!(books[2].rating, "");
    }

    #[test]
    fn test_empty_page_yields_no_books() {
        assert!(parse_books("", Utc::now()).unwrap().is_empty());
    }
}
