use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating and normalizing
/// ISO 639-1 (2-letter) and ISO 639-2 (3-letter) language codes down to
/// the 2-letter form the transcription backend expects.
/// Convert an ISO 639-2/B code to its ISO 639-2/T equivalent where they differ
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"), // French
        "ger" => Some("deu"), // German
        "dut" => Some("nld"), // Dutch
        "gre" => Some("ell"), // Greek
        "chi" => Some("zho"), // Chinese
        "cze" => Some("ces"), // Czech
        "ice" => Some("isl"), // Icelandic
        "alb" => Some("sqi"), // Albanian
        "arm" => Some("hye"), // Armenian
        "baq" => Some("eus"), // Basque
        "bur" => Some("mya"), // Burmese
        "per" => Some("fas"), // Persian
        "geo" => Some("kat"), // Georgian
        "may" => Some("msa"), // Malay
        "mac" => Some("mkd"), // Macedonian
        "rum" => Some("ron"), // Romanian
        "slo" => Some("slk"), // Slovak
        "wel" => Some("cym"), // Welsh
        _ => None,
    }
}

/// Validate that a language code is a known ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<()> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 && Language::from_639_1(&normalized_code).is_some() {
        return Ok(());
    }

    if normalized_code.len() == 3
        && (Language::from_639_3(&normalized_code).is_some()
            || part2b_to_part2t(&normalized_code).is_some())
    {
        return Ok(());
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format
///
/// The transcription backend only accepts 2-letter codes, so 3-letter codes
/// without a 639-1 equivalent are rejected.
pub fn normalize_to_part1(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    // If it's already a 2-letter code, validate it
    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
    }
    // If it's a 3-letter code, map through ISO 639-2/T to the 2-letter code
    else if normalized_code.len() == 3 {
        let part2t = part2b_to_part2t(&normalized_code)
            .map(|s| s.to_string())
            .unwrap_or(normalized_code.clone());

        if let Some(lang) = Language::from_639_3(&part2t) {
            if let Some(part1) = lang.to_639_1() {
                return Ok(part1.to_string());
            }
            return Err(anyhow!(
                "Language code '{}' has no 2-letter equivalent",
                code
            ));
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the English name of a language from its ISO code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    let language = if normalized_code.len() == 2 {
        Language::from_639_1(&normalized_code)
    } else if normalized_code.len() == 3 {
        let part2t = part2b_to_part2t(&normalized_code)
            .map(|s| s.to_string())
            .unwrap_or(normalized_code.clone());
        Language::from_639_3(&part2t)
    } else {
        None
    };

    language
        .map(|l| l.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", code))
}
