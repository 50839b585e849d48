//! Prompt normalization.

/// Canonicalizes a raw prompt for hashing and embedding.
///
/// Unicode-lowercases, trims, collapses whitespace runs (including
/// newlines) to single spaces, and drops punctuation. Apostrophes and
/// hyphens survive only between alphanumerics ("don't", "lo-fi"), so
/// surface variations like trailing commas or line wrapping never change
/// the canonical form.
pub fn normalize_prompt(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let chars: Vec<char> = lowered.chars().collect();
    let mut out = String::with_capacity(lowered.len());
    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            out.push(c);
        } else if c == '\'' || c == '-' {
            let prev_alnum = i > 0 && chars[i - 1].is_alphanumeric();
            let next_alnum = chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
            if prev_alnum && next_alnum {
                out.push(c);
            } else {
                out.push(' ');
            }
        } else {
            out.push(' ');
        }
    }
    let mut collapsed = String::with_capacity(out.len());
    for word in out.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(word);
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(normalize_prompt("  Calm Ocean Waves  "), "calm ocean waves");
    }

    #[test]
    fn test_collapses_newlines_and_runs() {
        assert_eq!(
            normalize_prompt("calm\nocean\r\n  waves\t\tsoft piano"),
            "calm ocean waves soft piano"
        );
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(
            normalize_prompt("Calm ocean waves, soft piano!"),
            "calm ocean waves soft piano"
        );
    }

    #[test]
    fn test_keeps_inner_apostrophe_and_hyphen() {
        assert_eq!(normalize_prompt("don't stop lo-fi beats"), "don't stop lo-fi beats");
        // Leading/trailing marks are punctuation, not word glue
        assert_eq!(normalize_prompt("-dash 'quote'"), "dash quote");
    }

    #[test]
    fn test_unicode_lowercase() {
        assert_eq!(normalize_prompt("ÉTUDE für Élise"), "étude für élise");
    }

    #[test]
    fn test_empty_and_symbol_only_become_empty() {
        assert_eq!(normalize_prompt(""), "");
        assert_eq!(normalize_prompt("   \n\t "), "");
        assert_eq!(normalize_prompt("!!! --- ..."), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_prompt("  Calm\nOcean, WAVES!  ");
        assert_eq!(normalize_prompt(&once), once);
    }
}
