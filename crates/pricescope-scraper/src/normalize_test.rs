use super::*;

fn profile() -> SiteProfile {
    SiteProfile {
        name: "MockMart".to_string(),
        url_template: "https://mockmart.example/search?q=".to_string(),
        title_selector: ".name a".to_string(),
        price_selector: ".price".to_string(),
        image_selector: "img".to_string(),
        logo_url: "https://mockmart.example/logo.png".to_string(),
    }
}

fn candidate(title: &str, raw_price_text: &str) -> RawCandidate {
    RawCandidate {
        title: title.to_string(),
        link: "https://mockmart.example/p/1".to_string(),
        raw_price_text: raw_price_text.to_string(),
        image_url: Some("https://cdn.mockmart.example/1.jpg".to_string()),
    }
}

// -----------------------------------------------------------------------
// parse_price
// -----------------------------------------------------------------------

#[test]
fn parse_price_currency_and_thousands_separator() {
    assert_eq!(parse_price("৳ 1,234.50"), Some(1234.50));
}

#[test]
fn parse_price_bare_dollar_amount() {
    assert_eq!(parse_price("$99"), Some(99.0));
}

#[test]
fn parse_price_embedded_in_words() {
    assert_eq!(parse_price("Now only 2,499 Tk"), Some(2499.0));
}

#[test]
fn parse_price_rejects_out_of_stock() {
    assert_eq!(parse_price("Out of stock"), None);
}

#[test]
fn parse_price_rejects_na_placeholder() {
    assert_eq!(parse_price("N/A"), None);
}

#[test]
fn parse_price_rejects_empty() {
    assert_eq!(parse_price(""), None);
}

#[test]
fn parse_price_rejects_multiple_decimal_points() {
    assert_eq!(parse_price("1.234.50"), None);
}

#[test]
fn parse_price_rejects_lone_dot() {
    assert_eq!(parse_price("..."), None);
}

// -----------------------------------------------------------------------
// normalize
// -----------------------------------------------------------------------

#[test]
fn normalize_accepts_matching_candidate() {
    let result = normalize(candidate("Apple iPhone 13 Pro", "৳ 1,234.50"), &profile(), "iphone")
        .expect("candidate should pass both filters");
    assert_eq!(result.site, "MockMart");
    assert_eq!(result.product_title, "Apple iPhone 13 Pro");
    assert_eq!(result.price, "৳ 1,234.50");
    assert_eq!(result.numeric_price, 1234.50);
    assert_eq!(result.url, "https://mockmart.example/p/1");
    assert_eq!(result.logo_url, "https://mockmart.example/logo.png");
}

#[test]
fn normalize_relevance_match_is_case_insensitive() {
    assert!(normalize(candidate("APPLE IPHONE 13", "$999"), &profile(), "iPhone").is_some());
}

#[test]
fn normalize_matches_query_as_loose_substring() {
    // "phone" is a substring of "Smartphone", so accessories and variants
    // ride along with the loose match.
    assert!(normalize(candidate("Smartphone Case", "$10"), &profile(), "phone").is_some());
}

#[test]
fn normalize_rejects_unrelated_title() {
    assert!(normalize(candidate("Samsung Galaxy S21", "$799"), &profile(), "iphone").is_none());
}

#[test]
fn normalize_rejects_unparseable_price() {
    assert!(normalize(candidate("Apple iPhone 13", "Out of stock"), &profile(), "iphone").is_none());
}

#[test]
fn normalize_keeps_raw_price_text_verbatim() {
    let result = normalize(candidate("Phone Stand", "Tk 350 (incl. VAT)"), &profile(), "phone")
        .expect("numeric text should parse");
    assert_eq!(result.price, "Tk 350 (incl. VAT)");
    assert_eq!(result.numeric_price, 350.0);
}

#[test]
fn normalize_preserves_absent_image() {
    let mut c = candidate("Phone Case", "$10");
    c.image_url = None;
    let result = normalize(c, &profile(), "phone").expect("should pass filters");
    assert_eq!(result.image_url, None);
}
