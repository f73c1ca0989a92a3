use super::types::Category;
use once_cell::sync::Lazy;

const MAX_SUGGESTIONS: usize = 5;

const COMMON_ITEMS: [(Category, &[&str]); 9] = [
    (
        Category::Fruits,
        &[
            "Apples", "Bananas", "Oranges", "Strawberries", "Grapes", "Tomatoes", "Carrots",
            "Onions", "Potatoes", "Lettuce",
        ],
    ),
    (
        Category::Meat,
        &[
            "Chicken Breast", "Ground Beef", "Salmon", "Bacon", "Turkey", "Pork Chops", "Shrimp",
            "Ham",
        ],
    ),
    (
        Category::Dairy,
        &["Milk", "Eggs", "Cheese", "Yogurt", "Butter", "Cream", "Sour Cream"],
    ),
    (
        Category::Bakery,
        &["Bread", "Bagels", "Croissants", "Muffins", "Rolls", "Cake"],
    ),
    (
        Category::Pantry,
        &[
            "Rice", "Pasta", "Flour", "Sugar", "Salt", "Oil", "Vinegar", "Canned Tomatoes", "Beans",
        ],
    ),
    (
        Category::Frozen,
        &["Ice Cream", "Frozen Pizza", "Frozen Vegetables", "Frozen Berries"],
    ),
    (
        Category::Household,
        &["Paper Towels", "Toilet Paper", "Dish Soap", "Laundry Detergent", "Trash Bags"],
    ),
    (
        Category::Personal,
        &["Shampoo", "Toothpaste", "Soap", "Deodorant", "Lotion"],
    ),
    (
        Category::Other,
        &["Batteries", "Light Bulbs", "Phone Charger"],
    ),
];

/// Catalog flattened in category order, paired with lowercase names for matching.
static CATALOG: Lazy<Vec<(Category, &'static str, String)>> = Lazy::new(|| {
    COMMON_ITEMS
        .iter()
        .flat_map(|(category, names)| {
            names
                .iter()
                .map(move |name| (*category, *name, name.to_lowercase()))
        })
        .collect()
});

/// Up to five catalog items containing `input`, ignoring case.
/// Inputs shorter than two characters yield nothing.
pub fn suggestions(input: &str) -> Vec<&'static str> {
    if input.chars().count() <= 1 {
        return Vec::new();
    }

    let needle = input.to_lowercase();
    CATALOG
        .iter()
        .filter(|(_, _, lower)| lower.contains(&needle))
        .map(|(_, name, _)| *name)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Category of a catalog item, matched by exact name ignoring case.
pub fn suggested_category(name: &str) -> Option<Category> {
    let needle = name.trim().to_lowercase();
    CATALOG
        .iter()
        .find(|(_, _, lower)| *lower == needle)
        .map(|(category, _, _)| *category)
}
