//! Configuration loading, validation and target resolution

use catalog_harvest::config::{load_config, load_config_with_hash, resolve_targets, validate, Config};
use catalog_harvest::ConfigError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_builtin_table_matches_reference_site() {
    let config = Config::default();
    assert!(validate(&config).is_ok());

    let targets = resolve_targets(&config).unwrap();
    let pairs: Vec<(&str, &str)> = targets
        .iter()
        .map(|t| (t.destination.as_str(), t.url.as_str()))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("home.csv", "https://webscraper.io/test-sites/e-commerce/more/"),
            ("computers.csv", "https://webscraper.io/test-sites/e-commerce/more/computers"),
            ("phones.csv", "https://webscraper.io/test-sites/e-commerce/more/phones"),
            ("touch.csv", "https://webscraper.io/test-sites/e-commerce/more/phones/touch"),
            ("laptops.csv", "https://webscraper.io/test-sites/e-commerce/more/computers/laptops"),
            ("tablets.csv", "https://webscraper.io/test-sites/e-commerce/more/computers/tablets"),
        ]
    );
}

#[test]
fn test_custom_selectors_and_absolute_targets() {
    let file = write_config(
        r#"
[selectors]
product-block = "li.product"
price = "span.amount"
currency-symbol = "€"

[[target]]
destination = "shoes.csv"
url = "https://shop.example.org/shoes"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.selectors.product_block, "li.product");
    assert_eq!(config.selectors.currency_symbol, "€");
    // untouched selectors keep their defaults
    assert_eq!(config.selectors.title, "a.title");

    let targets = resolve_targets(&config).unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].url.as_str(), "https://shop.example.org/shoes");
}

#[test]
fn test_invalid_selector_is_rejected() {
    let file = write_config(
        r#"
[selectors]
price = "h4[[price"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSelector { field: "price", .. }));
}

#[test]
fn test_duplicate_destinations_are_rejected() {
    let file = write_config(
        r#"
[[target]]
destination = "a.csv"
url = "one"

[[target]]
destination = "a.csv"
url = "two"
"#,
    );

    assert!(matches!(
        load_config(file.path()),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn test_unknown_field_type_is_parse_error() {
    let file = write_config(
        r#"
[crawler]
consent-timeout-ms = "soon"
"#,
    );

    assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_hash_is_stable() {
    let file = write_config("[output]\ndirectory = \"exports\"\n");

    let (_, first) = load_config_with_hash(file.path()).unwrap();
    let (config, second) = load_config_with_hash(file.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 64);
    assert_eq!(config.output.directory, "exports");
}
