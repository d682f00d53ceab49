//! Card Encoder - vCard 3.0 Line Assembly
//!
//! Line order is fixed and never follows the order of fields in the source
//! record. BEGIN, VERSION, FN, N, URL, REV and END are always emitted.
//!
//! Values are passed through verbatim unless `EscapeMode::Text` is selected.
//! A value containing `;`, `:` or a newline will otherwise produce a card
//! that readers split in the wrong places.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::assets::InlineAsset;
use crate::contact::{present, ContactRecord, OrganizationInfo};

pub const BEGIN: &str = "BEGIN:VCARD";
pub const VERSION: &str = "VERSION:3.0";
pub const END: &str = "END:VCARD";
pub const REV_PREFIX: &str = "REV:";
pub const LINE_SEPARATOR: &str = "\r\n";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeMode {
    /// Values written as given
    #[default]
    None,
    /// RFC 6350 text escaping on FN, N, ROLE and ORG
    Text,
}

/// An encoded card body, one entry per property line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedCard {
    lines: Vec<String>,
}

impl EncodedCard {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// CRLF-joined body, without a trailing line break.
    pub fn to_vcf(&self) -> String {
        self.lines.join(LINE_SEPARATOR)
    }

    /// The REV timestamp as written.
    pub fn revision(&self) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .find_map(|l| l.strip_prefix(REV_PREFIX))
    }

    /// Every line except REV.
    pub fn lines_without_revision(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|l| !l.starts_with(REV_PREFIX))
    }
}

impl fmt::Display for EncodedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_vcf())
    }
}

/// Builds cards for one run. Holds only the escaping choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardEncoder {
    escape: EscapeMode,
}

impl CardEncoder {
    pub fn new(escape: EscapeMode) -> Self {
        Self { escape }
    }

    pub fn escape_mode(&self) -> EscapeMode {
        self.escape
    }

    /// Encode a card stamped with the current time.
    pub fn encode(
        &self,
        contact: &ContactRecord,
        org: Option<&OrganizationInfo>,
        org_logo: Option<&InlineAsset>,
        photo: Option<&InlineAsset>,
    ) -> EncodedCard {
        self.encode_at(contact, org, org_logo, photo, Utc::now())
    }

    pub fn encode_at(
        &self,
        contact: &ContactRecord,
        org: Option<&OrganizationInfo>,
        org_logo: Option<&InlineAsset>,
        photo: Option<&InlineAsset>,
        rev: DateTime<Utc>,
    ) -> EncodedCard {
        let first = self.text(&contact.first_name);
        let last = self.text(&contact.last_name);

        let mut lines = vec![
            BEGIN.to_string(),
            VERSION.to_string(),
            format!("FN;CHARSET=UTF-8:{} {}", first, last),
            format!("N;CHARSET=UTF-8:{};{};;;", last, first),
        ];

        if let Some(email) = present(&contact.email) {
            lines.push(format!("EMAIL;CHARSET=UTF-8;type=WORK,INTERNET:{}", email));
        }

        if let Some(logo) = org_logo {
            lines.push(format!("LOGO;ENCODING=b;{}", logo.property_value()));
        }

        if let Some(photo) = photo {
            lines.push(format!("PHOTO;ENCODING=b;{}", photo.property_value()));
        }

        if let Some(phone) = present(&contact.phone) {
            lines.push(format!("TEL;TYPE=CELL:{}", phone));
        }

        if let Some(role) = present(&contact.role) {
            lines.push(format!("ROLE;CHARSET=UTF-8:{}", self.text(role)));
        }

        if let Some(name) = org.and_then(|o| present(&o.name)) {
            lines.push(format!("ORG;CHARSET=UTF-8:{}", self.text(name)));
        }

        // Emitted even without a URL; the value is then empty.
        let url = org.and_then(|o| o.url.as_deref()).unwrap_or_default();
        lines.push(format!("URL;type=WORK;CHARSET=UTF-8:{}", url));

        if let Some(handle) = present(&contact.linked_in_handle) {
            lines.push(format!("X-SOCIALPROFILE;TYPE=linkedin:{}", handle));
        }

        lines.push(format!(
            "{}{}",
            REV_PREFIX,
            rev.to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
        lines.push(END.to_string());

        EncodedCard { lines }
    }

    fn text(&self, value: &str) -> String {
        match self.escape {
            EscapeMode::None => value.to_string(),
            EscapeMode::Text => escape_text(value),
        }
    }
}

/// RFC 6350 §3.4 escaping for TEXT values.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_rev() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_minimal_card_has_seven_lines() {
        let contact = ContactRecord::new("Ada", "Lovelace");
        let card = CardEncoder::default().encode_at(&contact, None, None, None, fixed_rev());

        assert_eq!(
            card.lines(),
            &[
                "BEGIN:VCARD",
                "VERSION:3.0",
                "FN;CHARSET=UTF-8:Ada Lovelace",
                "N;CHARSET=UTF-8:Lovelace;Ada;;;",
                "URL;type=WORK;CHARSET=UTF-8:",
                "REV:2024-03-09T14:05:00.000Z",
                "END:VCARD",
            ]
        );
    }

    #[test]
    fn test_full_card_order() {
        let contact = ContactRecord::new("Grace", "Hopper")
            .with_linked_in("gracehopper")
            .with_role("Rear Admiral")
            .with_phone("555-0100")
            .with_email("grace@navy.mil");
        let org = OrganizationInfo {
            name: Some("US Navy".into()),
            logo_path: None,
            url: Some("https://navy.mil".into()),
        };
        let logo = InlineAsset::new("PNG", "bG9nbw==");
        let photo = InlineAsset::new("JPEG", "cGhvdG8=");

        let card = CardEncoder::default().encode_at(
            &contact,
            Some(&org),
            Some(&logo),
            Some(&photo),
            fixed_rev(),
        );

        let prefixes: Vec<&str> = card
            .lines()
            .iter()
            .map(|l| l.split([';', ':']).next().unwrap())
            .collect();
        assert_eq!(
            prefixes,
            [
                "BEGIN", "VERSION", "FN", "N", "EMAIL", "LOGO", "PHOTO", "TEL", "ROLE", "ORG",
                "URL", "X-SOCIALPROFILE", "REV", "END"
            ]
        );
        assert!(card.lines().contains(&"LOGO;ENCODING=b;TYPE=PNG:bG9nbw==".to_string()));
        assert!(card.lines().contains(&"PHOTO;ENCODING=b;TYPE=JPEG:cGhvdG8=".to_string()));
        assert!(card
            .lines()
            .contains(&"X-SOCIALPROFILE;TYPE=linkedin:gracehopper".to_string()));
    }

    #[test]
    fn test_rev_precedes_end() {
        let contact = ContactRecord::new("Ada", "Lovelace").with_email("ada@example.org");
        let card = CardEncoder::default().encode(&contact, None, None, None);
        let lines = card.lines();

        assert_eq!(lines.first().map(String::as_str), Some(BEGIN));
        assert_eq!(lines.last().map(String::as_str), Some(END));
        assert!(lines[lines.len() - 2].starts_with(REV_PREFIX));
        assert!(card.revision().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_empty_strings_are_skipped() {
        let contact = ContactRecord::new("Ada", "Lovelace").with_email("").with_phone("");
        let org = OrganizationInfo {
            name: Some(String::new()),
            ..Default::default()
        };
        let card = CardEncoder::default().encode_at(&contact, Some(&org), None, None, fixed_rev());
        assert_eq!(card.lines().len(), 7);
    }

    #[test]
    fn test_values_unescaped_by_default() {
        let contact = ContactRecord::new("Ada", "Love;lace").with_role("R&D, Math");
        let card = CardEncoder::default().encode_at(&contact, None, None, None, fixed_rev());

        assert_eq!(card.lines()[3], "N;CHARSET=UTF-8:Love;lace;Ada;;;");
        assert!(card.lines().contains(&"ROLE;CHARSET=UTF-8:R&D, Math".to_string()));
    }

    #[test]
    fn test_text_escaping_opt_in() {
        let contact = ContactRecord::new("Ada", "Love;lace").with_role("R&D, Math\nDept");
        let org = OrganizationInfo {
            name: Some("A\\B".into()),
            ..Default::default()
        };
        let card = CardEncoder::new(EscapeMode::Text).encode_at(
            &contact,
            Some(&org),
            None,
            None,
            fixed_rev(),
        );

        assert_eq!(card.lines()[2], "FN;CHARSET=UTF-8:Ada Love\\;lace");
        assert_eq!(card.lines()[3], "N;CHARSET=UTF-8:Love\\;lace;Ada;;;");
        assert!(card.lines().contains(&"ROLE;CHARSET=UTF-8:R&D\\, Math\\nDept".to_string()));
        assert!(card.lines().contains(&"ORG;CHARSET=UTF-8:A\\\\B".to_string()));
    }

    #[test]
    fn test_escape_text_crlf() {
        assert_eq!(escape_text("a\r\nb\rc"), "a\\nb\\nc");
    }

    #[test]
    fn test_to_vcf_crlf_joined() {
        let contact = ContactRecord::new("Ada", "Lovelace");
        let card = CardEncoder::default().encode_at(&contact, None, None, None, fixed_rev());
        let body = card.to_vcf();

        assert!(body.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
        assert!(body.ends_with("\r\nEND:VCARD"));
        assert_eq!(body.matches("\r\n").count(), 6);
        assert_eq!(card.to_string(), body);
    }

    #[test]
    fn test_encode_idempotent_except_rev() {
        let contact = ContactRecord::new("Ada", "Lovelace").with_phone("1");
        let encoder = CardEncoder::default();
        let a = encoder.encode(&contact, None, None, None);
        let b = encoder.encode(&contact, None, None, None);

        let a: Vec<_> = a.lines_without_revision().collect();
        let b: Vec<_> = b.lines_without_revision().collect();
        assert_eq!(a, b);
    }
}
