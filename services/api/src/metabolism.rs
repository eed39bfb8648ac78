//! Daily energy needs and per-meal macronutrient targets

use serde::{Deserialize, Serialize};

use crate::{
    error::ApiResult,
    models::{ActivityLevel, Gender},
    validation::non_negative,
};

/// Share of the daily energy a single meal covers
pub const MEAL_SHARE: f64 = 0.3;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBOHYDRATE: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetabolismRequest {
    pub gender: Gender,
    /// Kilograms
    pub weight: f64,
    /// Centimetres
    pub height: f64,
    /// Years
    pub age: f64,
    pub activity_level: ActivityLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroTarget {
    /// Grams
    pub amount: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroTargets {
    pub protein_min: MacroTarget,
    pub protein_max: MacroTarget,
    pub carbohydrate_min: MacroTarget,
    pub carbohydrate_max: MacroTarget,
    pub fat_min: MacroTarget,
    pub fat_max: MacroTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetabolismReport {
    pub basal_metabolism: f64,
    pub total_kcal: f64,
    pub kcal_per_meal: f64,
    pub macros: MacroTargets,
}

/// Mifflin-St Jeor basal metabolic rate in kcal per day
pub fn basal_metabolism(gender: Gender, weight: f64, height: f64, age: f64) -> f64 {
    let base = 10.0 * weight + 6.25 * height - 5.0 * age;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

fn target(kcal: f64, percentage: f64, kcal_per_gram: f64) -> MacroTarget {
    MacroTarget {
        amount: kcal * percentage / kcal_per_gram,
        percentage,
    }
}

pub fn calculate(request: &MetabolismRequest) -> ApiResult<MetabolismReport> {
    non_negative("weight", request.weight)?;
    non_negative("height", request.height)?;
    non_negative("age", request.age)?;

    let basal = basal_metabolism(request.gender, request.weight, request.height, request.age);
    let total_kcal = basal * request.activity_level.factor();
    let kcal_per_meal = total_kcal * MEAL_SHARE;

    Ok(MetabolismReport {
        basal_metabolism: basal,
        total_kcal,
        kcal_per_meal,
        macros: MacroTargets {
            protein_min: target(kcal_per_meal, 0.10, KCAL_PER_GRAM_PROTEIN),
            protein_max: target(kcal_per_meal, 0.35, KCAL_PER_GRAM_PROTEIN),
            carbohydrate_min: target(kcal_per_meal, 0.45, KCAL_PER_GRAM_CARBOHYDRATE),
            carbohydrate_max: target(kcal_per_meal, 0.65, KCAL_PER_GRAM_CARBOHYDRATE),
            fat_min: target(kcal_per_meal, 0.20, KCAL_PER_GRAM_FAT),
            fat_max: target(kcal_per_meal, 0.35, KCAL_PER_GRAM_FAT),
        },
    })
}
