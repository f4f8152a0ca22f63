/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Build a URL slug from a display name.
///
/// Lowercases, folds Spanish accents to ASCII and collapses every run of
/// non-alphanumeric characters into a single `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        let folded = match ch {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        };

        if folded.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(folded);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// [`slugify`], falling back to the record id when the name has no
/// letters or digits, so stored slugs are never empty.
pub fn slug_or_id(name: &str, id: i64) -> String {
    let slug = slugify(name);
    if slug.is_empty() { id.to_string() } else { slug }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_id_is_positive_and_varies() {
        let a = snowflake_id();
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b > 0);
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Café de Olla 500g"), "cafe-de-olla-500g");
        assert_eq!(slugify("  Piñata   Grande!! "), "pinata-grande");
        assert_eq!(slugify("ÚLTIMA pieza"), "ultima-pieza");
    }

    #[test]
    fn test_slugify_only_symbols() {
        assert_eq!(slugify("***"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slug_or_id_never_empty() {
        assert_eq!(slug_or_id("***", 42), "42");
        assert_eq!(slug_or_id("¡¿!?", 7), "7");
        assert_eq!(slug_or_id("Café", 42), "cafe");
        assert_ne!(slug_or_id("***", 1), slug_or_id("###", 2));
    }
}
