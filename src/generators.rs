use crate::config::{GeneratorConfig, ImageConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Generates a random password of the configured length.
///
/// Lower and upper case letters are always included; digits and symbols
/// join the pool per the config flags. In `strict` mode every enabled
/// class is guaranteed at least one character, provided the length allows
/// for it.
pub fn generate_password(config: &GeneratorConfig) -> String {
    let mut rng = rand::thread_rng();

    let mut classes: Vec<&[u8]> = vec![LOWERCASE, UPPERCASE];
    if config.numbers {
        classes.push(DIGITS);
    }
    if config.symbols {
        classes.push(SYMBOLS);
    }

    let pool: Vec<u8> = classes.concat();
    let mut chars: Vec<u8> = Vec::with_capacity(config.length);

    if config.strict {
        for class in &classes {
            chars.push(class[rng.gen_range(0..class.len())]);
        }
    }

    while chars.len() < config.length {
        chars.push(pool[rng.gen_range(0..pool.len())]);
    }

    chars.shuffle(&mut rng);
    chars.truncate(config.length);

    String::from_utf8(chars).unwrap_or_default()
}

/// Strips diacritics, replaces spaces with hyphens and lowercases.
///
/// Idempotent: re-applying to its own output is a no-op.
pub fn slugify(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c == ' ' { '-' } else { c })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Derives the stored name of a poster image from a display name.
pub fn poster_name(name: &str, config: &ImageConfig) -> String {
    format!("{}-01.{}", slugify(name), config.output_format)
}

/// Appends the current unix-millis timestamp to a slug. Unique only down
/// to clock resolution; concurrent calls in the same tick can collide.
pub fn unique_name(name: &str) -> String {
    format!("{}-{}", slugify(name), chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict_config() -> GeneratorConfig {
        GeneratorConfig {
            length: 12,
            numbers: true,
            symbols: true,
            strict: true,
        }
    }

    #[test]
    fn test_password_has_configured_length() {
        let pass = generate_password(&strict_config());
        assert_eq!(pass.len(), 12);
    }

    #[test]
    fn test_strict_password_covers_all_classes() {
        for _ in 0..50 {
            let pass = generate_password(&strict_config());
            assert!(pass.bytes().any(|b| LOWERCASE.contains(&b)));
            assert!(pass.bytes().any(|b| UPPERCASE.contains(&b)));
            assert!(pass.bytes().any(|b| DIGITS.contains(&b)));
            assert!(pass.bytes().any(|b| SYMBOLS.contains(&b)));
        }
    }

    #[test]
    fn test_password_without_symbols() {
        let config = GeneratorConfig {
            length: 16,
            numbers: true,
            symbols: false,
            strict: true,
        };

        for _ in 0..50 {
            let pass = generate_password(&config);
            assert!(!pass.bytes().any(|b| SYMBOLS.contains(&b)));
        }
    }

    #[test]
    fn test_passwords_differ() {
        let config = strict_config();
        assert_ne!(generate_password(&config), generate_password(&config));
    }

    #[test]
    fn test_slugify_accents_and_spaces() {
        assert_eq!(slugify("Rénée Joséphine ñoño"), "renee-josephine-nono");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_plain_input() {
        assert_eq!(slugify("foobar"), "foobar");
    }

    #[test]
    fn test_slugify_idempotent() {
        let once = slugify("Crème Brûlée");
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn test_poster_name() {
        let config = ImageConfig {
            source_dir: "img/".to_string(),
            output_format: "webp".to_string(),
            width: 1920,
            height: 1080,
            fit: "cover".to_string(),
            position: "center".to_string(),
            thumb_width: 200,
            thumb_height: 200,
            thumb_format: "webp".to_string(),
            thumb_fit: "cover".to_string(),
            thumb_position: "center".to_string(),
        };

        assert_eq!(poster_name("Nuit Étoilée", &config), "nuit-etoilee-01.webp");
    }

    #[test]
    fn test_unique_name_has_timestamp_suffix() {
        let name = unique_name("Nuit Étoilée");
        let suffix = name.rsplit('-').next().unwrap();

        assert!(name.starts_with("nuit-etoilee-"));
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
        assert!(suffix.len() >= 13);
    }
}
