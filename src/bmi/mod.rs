//! BMI Module
//!
//! Pure Body Mass Index arithmetic and the category bands used in responses.

mod category;


pub use category::{categorize, Category};

// == Compute ==
/// Computes BMI from weight in kilograms and height in centimeters.
///
/// The caller is responsible for rejecting a zero height; this function
/// performs no validation.
pub fn compute(weight: f64, height: f64) -> f64 {
    let height_m = height / 100.0;
    weight / (height_m * height_m)
}
