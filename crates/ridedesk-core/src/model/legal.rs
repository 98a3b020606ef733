// ── Legal content pages ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::entity_id::{EntityId, Keyed};

/// Page-type discriminator carried in `pageTitle`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LegalPageKind {
    Privacy,
    Terms,
    About,
    Faq,
    Other,
}

impl LegalPageKind {
    /// Classify a free-form `pageTitle`; unknown values are `Other`.
    pub fn classify(page_title: &str) -> Self {
        page_title.trim().parse().unwrap_or(Self::Other)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Privacy => "Privacy Policy",
            Self::Terms => "Terms of Use",
            Self::About => "About Us",
            Self::Faq => "FAQ",
            Self::Other => "Legal Document",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalPage {
    pub id: EntityId,
    pub title: String,
    pub page_title: String,
    pub kind: LegalPageKind,
    pub content: String,
    pub language: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LegalPage {
    /// First `max_chars` characters of the content, with `...` when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        let flat = self.content.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= max_chars {
            flat
        } else {
            let mut cut: String = flat.chars().take(max_chars).collect();
            cut.push_str("...");
            cut
        }
    }
}

impl Keyed for LegalPage {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content: &str) -> LegalPage {
        LegalPage {
            id: EntityId::from("p1"),
            title: "Privacy".into(),
            page_title: "privacy".into(),
            kind: LegalPageKind::Privacy,
            content: content.into(),
            language: "en".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(LegalPageKind::classify("FAQ"), LegalPageKind::Faq);
        assert_eq!(LegalPageKind::classify(" Terms "), LegalPageKind::Terms);
        assert_eq!(LegalPageKind::classify("cookies"), LegalPageKind::Other);
        assert_eq!(LegalPageKind::Other.label(), "Legal Document");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let short = page("Nous   respectons\nvotre vie privée.");
        assert_eq!(short.preview(150), "Nous respectons votre vie privée.");

        let long = page(&"é".repeat(200));
        let cut = long.preview(150);
        assert_eq!(cut.chars().count(), 153);
        assert!(cut.ends_with("..."));
    }
}
