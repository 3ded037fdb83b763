/*!
 * Tests for language code utilities
 */

use anyhow::Result;
use subburn::language_utils::{get_language_name, normalize_to_part1, validate_language_code};

/// Test that valid 2-letter codes pass validation
#[test]
fn test_validate_language_code_withPart1Code_shouldSucceed() -> Result<()> {
    validate_language_code("en")?;
    validate_language_code("ES")?;
    validate_language_code(" fr ")?;
    Ok(())
}

/// Test that valid 3-letter codes pass validation
#[test]
fn test_validate_language_code_withPart2Code_shouldSucceed() -> Result<()> {
    validate_language_code("eng")?;
    validate_language_code("spa")?;
    // ISO 639-2/B variant
    validate_language_code("ger")?;
    Ok(())
}

/// Test that invalid codes are rejected
#[test]
fn test_validate_language_code_withInvalidCode_shouldFail() {
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("x").is_err());
    assert!(validate_language_code("zz").is_err());
    assert!(validate_language_code("english").is_err());
}

/// Test that 2-letter codes normalize to themselves
#[test]
fn test_normalize_to_part1_withPart1Code_shouldReturnSame() -> Result<()> {
    assert_eq!(normalize_to_part1("en")?, "en");
    assert_eq!(normalize_to_part1("ES")?, "es");
    Ok(())
}

/// Test that 3-letter codes normalize down to 2 letters
#[test]
fn test_normalize_to_part1_withPart2Code_shouldReturnPart1() -> Result<()> {
    assert_eq!(normalize_to_part1("eng")?, "en");
    assert_eq!(normalize_to_part1("spa")?, "es");
    // ISO 639-2/B variants map through their T equivalents
    assert_eq!(normalize_to_part1("ger")?, "de");
    assert_eq!(normalize_to_part1("fre")?, "fr");
    Ok(())
}

/// Test that codes without a 2-letter form are rejected
#[test]
fn test_normalize_to_part1_withNoPart1Equivalent_shouldFail() {
    // Filipino has no ISO 639-1 code
    assert!(normalize_to_part1("fil").is_err());
}

/// Test English names for common codes
#[test]
fn test_get_language_name_withValidCodes_shouldReturnName() -> Result<()> {
    assert_eq!(get_language_name("es")?, "Spanish");
    assert_eq!(get_language_name("eng")?, "English");
    assert_eq!(get_language_name("ger")?, "German");
    Ok(())
}

/// Test that unknown codes have no name
#[test]
fn test_get_language_name_withInvalidCode_shouldFail() {
    assert!(get_language_name("zz").is_err());
    assert!(get_language_name("").is_err());
}
