/// Category used when no keyword rule matches
pub const DEFAULT_CATEGORY: &str = "workout";

/// Ordered keyword rules; the first rule with a keyword in the filename wins
const CATEGORY_RULES: &[(&str, &[&str])] = &[
    ("nutrition", &["nutrition", "diet", "food", "meal"]),
    ("anatomy", &["anatomy", "muscle", "body"]),
];

/// Guess a knowledge category from a PDF filename
pub fn detect_category(filename: &str) -> &'static str {
    let name = filename.to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| name.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_nutrition() {
        assert_eq!(detect_category("Sports_Nutrition_Guide.pdf"), "nutrition");
        assert_eq!(detect_category("keto-diet.pdf"), "nutrition");
        assert_eq!(detect_category("MEAL_PREP.PDF"), "nutrition");
    }

    #[test]
    fn test_detect_anatomy() {
        assert_eq!(detect_category("muscle_groups.pdf"), "anatomy");
        assert_eq!(detect_category("Human Anatomy.pdf"), "anatomy");
    }

    #[test]
    fn test_first_rule_wins() {
        assert_eq!(detect_category("food_for_muscle.pdf"), "nutrition");
    }

    #[test]
    fn test_defaults_to_workout() {
        assert_eq!(detect_category("5x5_program.pdf"), DEFAULT_CATEGORY);
        assert_eq!(detect_category(""), "workout");
    }
}
