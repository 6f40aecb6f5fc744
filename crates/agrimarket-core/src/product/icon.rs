//! Emoji icons for product listings.

/// Keyword table, checked in order. The first keyword contained in the
/// lowercased product name wins.
const PRODUCT_ICONS: &[(&str, &str)] = &[
    ("rice", "🌾"),
    ("wheat", "🌾"),
    ("corn", "🌽"),
    ("barley", "🌾"),
    ("oats", "🌾"),
    ("tomato", "🍅"),
    ("potato", "🥔"),
    ("onion", "🧅"),
    ("carrot", "🥕"),
    ("cabbage", "🥬"),
    ("spinach", "🥬"),
    ("cauliflower", "🥦"),
    ("broccoli", "🥦"),
    ("lettuce", "🥬"),
    ("apple", "🍎"),
    ("banana", "🍌"),
    ("orange", "🍊"),
    ("mango", "🥭"),
    ("grapes", "🍇"),
    ("watermelon", "🍉"),
    ("strawberry", "🍓"),
    ("pineapple", "🍍"),
    ("coconut", "🥥"),
    ("lentil", "🫘"),
    ("chickpea", "🫘"),
    ("bean", "🫘"),
    ("pea", "🫛"),
    ("milk", "🥛"),
    ("cheese", "🧀"),
    ("butter", "🧈"),
    ("yogurt", "🥛"),
    ("turmeric", "🌿"),
    ("chili", "🌶️"),
    ("pepper", "🌶️"),
    ("cumin", "🌿"),
    ("coriander", "🌿"),
    ("organic", "🌱"),
    ("seed", "🌱"),
    ("sapling", "🌱"),
];

pub const DEFAULT_PRODUCT_ICON: &str = "🌾";

/// Picks the icon for a product name.
pub fn product_icon(name: &str) -> &'static str {
    let name = name.to_lowercase();
    PRODUCT_ICONS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_PRODUCT_ICON)
}
