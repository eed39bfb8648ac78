//! Nutrient kinds, their units and the mandatory label subset

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientKind {
    Energy,
    // Macronutrients
    Protein,
    Carbohydrate,
    TotalFat,
    SaturatedFat,
    Salt,
    Sugar,
    Fiber,
    Cholesterol,
    // Minerals
    Calcium,
    Iron,
    Potassium,
    Magnesium,
    Sodium,
    Phosphorus,
    Iodine,
    Selenium,
    Zinc,
    // Vitamins
    VitaminA,
    VitaminB6,
    VitaminB12,
    VitaminC,
    VitaminD,
    VitaminE,
}

/// Nutrients every ingredient label must declare
pub const MANDATORY_NUTRIENTS: [NutrientKind; 7] = [
    NutrientKind::Energy,
    NutrientKind::Protein,
    NutrientKind::Carbohydrate,
    NutrientKind::TotalFat,
    NutrientKind::SaturatedFat,
    NutrientKind::Salt,
    NutrientKind::Sugar,
];

impl NutrientKind {
    /// Unit the amount of this nutrient is expressed in
    pub fn unit(&self) -> &'static str {
        use NutrientKind::*;

        match self {
            Energy => "kcal",
            Protein | Carbohydrate | TotalFat | SaturatedFat | Salt | Sugar | Fiber => "g",
            VitaminA | VitaminD | VitaminB12 | Iodine | Selenium => "ug",
            VitaminB6 | VitaminC | VitaminE | Calcium | Iron | Potassium | Magnesium | Sodium
            | Phosphorus | Zinc | Cholesterol => "mg",
        }
    }
}

/// A nutrient amount with its derived unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrient {
    pub name: NutrientKind,
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

impl Nutrient {
    pub fn new(name: NutrientKind, amount: f64) -> Self {
        Self {
            name,
            amount,
            unit: name.unit().to_string(),
        }
    }
}

/// Nutrient as supplied by clients; the unit is always derived
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NutrientInput {
    pub name: NutrientKind,
    pub amount: f64,
}

impl From<NutrientInput> for Nutrient {
    fn from(input: NutrientInput) -> Self {
        Nutrient::new(input.name, input.amount)
    }
}

/// First mandatory nutrient missing from `nutrients`, if any
pub fn missing_mandatory(nutrients: &[Nutrient]) -> Option<NutrientKind> {
    MANDATORY_NUTRIENTS
        .iter()
        .copied()
        .find(|required| !nutrients.iter().any(|n| n.name == *required))
}
