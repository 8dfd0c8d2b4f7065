//! BMI Category Module
//!
//! Maps a BMI value onto the labelled bands returned to clients.

use std::fmt;

use serde::Serialize;

// == Category ==
/// Health category for a BMI value.
///
/// The bands are half-open and leave small gaps below 25, 30, 35 and 40.
/// Values falling into a gap, and NaN, map to [`Category::Invalid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "&'static str")]
pub enum Category {
    Underweight,
    NormalWeight,
    Overweight,
    ObesityClassI,
    ObesityClassII,
    ObesityClassIII,
    Invalid,
}

impl Category {
    /// Human readable label sent in the `message` field.
    pub fn label(self) -> &'static str {
        match self {
            Category::Underweight => "Underweight",
            Category::NormalWeight => "Normal weight",
            Category::Overweight => "Overweight",
            Category::ObesityClassI => "Obesity class I",
            Category::ObesityClassII => "Obesity class II",
            Category::ObesityClassIII => "Obesity class III",
            Category::Invalid => "Invalid BMI",
        }
    }
}

impl From<Category> for &'static str {
    fn from(category: Category) -> Self {
        category.label()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// == Categorize ==
/// Classifies a BMI value. Total over every `f64`.
pub fn categorize(bmi: f64) -> Category {
    if bmi < 18.5 {
        Category::Underweight
    } else if (18.5..24.9).contains(&bmi) {
        Category::NormalWeight
    } else if (25.0..29.9).contains(&bmi) {
        Category::Overweight
    } else if (30.0..34.9).contains(&bmi) {
        Category::ObesityClassI
    } else if (35.0..39.9).contains(&bmi) {
        Category::ObesityClassII
    } else if bmi >= 40.0 {
        Category::ObesityClassIII
    } else {
        Category::Invalid
    }
}
