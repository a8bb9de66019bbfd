use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const SUGAR_THRESHOLD: u64 = 10;
pub const SODIUM_THRESHOLD: u64 = 400;
pub const SATURATED_FAT_THRESHOLD: u64 = 5;

static SUGAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)sugar\s*:\s*([0-9]+)").expect("sugar pattern compiles"));
static SODIUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)sodium\s*:\s*([0-9]+)").expect("sodium pattern compiles"));
static SATURATED_FAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)saturated\s*fat\s*:\s*([0-9]+)").expect("saturated fat pattern compiles")
});
static TRANS_FAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)trans\s*fat|hydrogenated").expect("trans fat pattern compiles")
});

/// Threshold flags derived from `label: number` declarations on the label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionFlags {
    pub high_sugar: bool,
    pub high_sodium: bool,
    pub high_saturated_fat: bool,
    pub trans_fat_present: bool,
}

/// Raw integers captured from the first matching declaration of each label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionReadings {
    pub sugar: Option<u64>,
    pub sodium: Option<u64>,
    pub saturated_fat: Option<u64>,
}

impl NutritionReadings {
    pub fn read(text: &str) -> Self {
        Self {
            sugar: capture_integer(&SUGAR, text),
            sodium: capture_integer(&SODIUM, text),
            saturated_fat: capture_integer(&SATURATED_FAT, text),
        }
    }
}

pub fn extract_flags(text: &str) -> NutritionFlags {
    flags_from_readings(&NutritionReadings::read(text), text)
}

pub(crate) fn flags_from_readings(readings: &NutritionReadings, text: &str) -> NutritionFlags {
    NutritionFlags {
        high_sugar: exceeds(readings.sugar, SUGAR_THRESHOLD),
        high_sodium: exceeds(readings.sodium, SODIUM_THRESHOLD),
        high_saturated_fat: exceeds(readings.saturated_fat, SATURATED_FAT_THRESHOLD),
        trans_fat_present: TRANS_FAT.is_match(text),
    }
}

fn exceeds(value: Option<u64>, threshold: u64) -> bool {
    value.map(|value| value > threshold).unwrap_or(false)
}

fn capture_integer(pattern: &Regex, text: &str) -> Option<u64> {
    let digits = pattern.captures(text)?.get(1)?.as_str();
    // ASCII digits only, so the parse can fail solely on overflow.
    Some(digits.parse().unwrap_or(u64::MAX))
}
