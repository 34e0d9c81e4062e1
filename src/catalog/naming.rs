//! Identifier and artwork helpers for catalog records.

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

static POKEMON_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/pokemon/(\d+)/?$").expect("valid regex"));

/// Bytes left unescaped in a path component: alphanumerics plus `-_.!~*'()`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Extracts the numeric id from a resource URL such as
/// `https://pokeapi.co/api/v2/pokemon/25/`. Returns `0` when there is none.
pub fn extract_pokemon_id(url: &str) -> u32 {
    POKEMON_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Zero-pads a number to three digits (`7` -> `"007"`).
pub fn pad3(n: u32) -> String {
    format!("{:03}", n)
}

/// Official artwork image for a species id.
pub fn official_artwork_url(id: u32) -> String {
    format!(
        "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/{}.png",
        id
    )
}

/// Lowercases and percent-encodes a species name for use in paths and keys.
///
/// Whitespace is kept and escaped like any other reserved byte.
pub fn normalize_name(name: &str) -> String {
    utf8_percent_encode(&name.to_lowercase(), COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_pokemon_id() {
        assert_eq!(extract_pokemon_id("https://pokeapi.co/api/v2/pokemon/25/"), 25);
        assert_eq!(extract_pokemon_id("https://pokeapi.co/api/v2/pokemon/151"), 151);
        assert_eq!(extract_pokemon_id("https://pokeapi.co/api/v2/type/13/"), 0);
        assert_eq!(extract_pokemon_id("not a url"), 0);
    }

    #[test]
    fn test_pad3() {
        assert_eq!(pad3(7), "007");
        assert_eq!(pad3(25), "025");
        assert_eq!(pad3(1010), "1010");
    }

    #[test]
    fn test_official_artwork_url() {
        assert!(official_artwork_url(25).ends_with("/official-artwork/25.png"));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Pikachu"), "pikachu");
        assert_eq!(normalize_name("Mr. Mime"), "mr.%20mime");
        assert_eq!(normalize_name("nidoran♀"), "nidoran%E2%99%80");
    }

    #[test]
    fn test_normalize_name_escapes_like_a_uri_component() {
        assert_eq!(normalize_name("Farfetch'd"), "farfetch'd");
        assert_eq!(normalize_name("mime (jr)!~*"), "mime%20(jr)!~*");
        assert_eq!(normalize_name(" type: null "), "%20type%3A%20null%20");
        assert_eq!(normalize_name("a+b&c=d/e?f#g"), "a%2Bb%26c%3Dd%2Fe%3Ff%23g");
    }
}
