// src/common/listing.rs

use std::cmp::Ordering;

use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Busca por substring sem diferenciar maiúsculas. Termo vazio casa com tudo.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Verdadeiro se algum dos campos contém o termo.
pub fn any_contains_ci(fields: &[Option<&str>], needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    fields.iter().flatten().any(|f| contains_ci(f, needle))
}

/// Compara textos ignorando maiúsculas.
pub fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_ignores_case() {
        assert!(contains_ci("Website Redesign", "redesign"));
        assert!(!contains_ci("Website Redesign", "logo"));
    }

    #[test]
    fn blank_term_matches_everything() {
        assert!(any_contains_ci(&[None], "  "));
    }

    #[test]
    fn missing_fields_are_skipped() {
        assert!(any_contains_ci(&[Some("Acme"), None, Some("mail@acme.io")], "ACME.IO"));
        assert!(!any_contains_ci(&[None, Some("Acme")], "globex"));
    }

    #[test]
    fn desc_reverses() {
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Asc.apply(cmp_ci("b", "A")), Ordering::Greater);
    }
}
