#![allow(dead_code)]

use animal_scout::models::ListingRecord;

/// One CoinAfrique-style ad card
pub fn card(name: &str, price: &str, location: &str, image: &str) -> String {
    format!(
        r#"<div class="col s6 m4 l3">
  <div class="card ad__card">
    <a class="card-image ad__card-image waves-block waves-light" href="/annonce/1">
      <img class="ad__card-img" src="{image}" alt="{name}">
    </a>
    <div class="card-content">
      <p class="ad__card-description"><a href="/annonce/1">{name}</a></p>
      <p class="ad__card-price"><a href="/annonce/1">{price}</a></p>
      <p class="ad__card-location"><span class="valign-wrapper">{location}</span></p>
    </div>
  </div>
</div>"#
    )
}

/// A card with no price paragraph
pub fn card_without_price(name: &str) -> String {
    format!(
        r#"<div class="col s6 m4 l3">
  <img class="ad__card-img" src="x.jpg">
  <p class="ad__card-description"><a>{name}</a></p>
  <p class="ad__card-location"><span>Dakar</span></p>
</div>"#
    )
}

pub fn listing_page(cards: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>CoinAfrique</title></head>\
         <body><div class=\"row adcard__listing\">{}</div></body></html>",
        cards.join("\n")
    )
}

pub fn record(category: &str, page: u32, name: &str, price: &str) -> ListingRecord {
    ListingRecord {
        category: category.to_string(),
        page,
        name: name.to_string(),
        price: price.to_string(),
        address: "Dakar, Sénégal".to_string(),
        image_url: format!("https://images.coinafrique.com/{}.jpg", name.to_lowercase()),
    }
}
