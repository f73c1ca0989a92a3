use super::errors::StoreError;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fixed set of item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Category {
    Fruits,
    Meat,
    Dairy,
    Bakery,
    Pantry,
    Frozen,
    Household,
    Personal,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Fruits,
        Category::Meat,
        Category::Dairy,
        Category::Bakery,
        Category::Pantry,
        Category::Frozen,
        Category::Household,
        Category::Personal,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fruits => "fruits",
            Category::Meat => "meat",
            Category::Dairy => "dairy",
            Category::Bakery => "bakery",
            Category::Pantry => "pantry",
            Category::Frozen => "frozen",
            Category::Household => "household",
            Category::Personal => "personal",
            Category::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Fruits => "Fruits & Vegetables",
            Category::Meat => "Meat & Seafood",
            Category::Dairy => "Dairy & Eggs",
            Category::Bakery => "Bakery",
            Category::Pantry => "Pantry & Canned",
            Category::Frozen => "Frozen Foods",
            Category::Household => "Household",
            Category::Personal => "Personal Care",
            Category::Other => "Other",
        }
    }

    /// Strict parse for user input. Unknown names are rejected.
    pub fn parse(text: &str) -> Result<Category, StoreError> {
        let normalized = text.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| StoreError::InvalidCategory(text.to_string()))
    }
}

impl FromStr for Category {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Stored and imported data is read leniently: unknown or missing names
// become `Other`.
impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::parse(&value).unwrap_or_default()
    }
}

impl From<Option<String>> for Category {
    fn from(value: Option<String>) -> Self {
        value.map(Category::from).unwrap_or_default()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

/// Category filter of the item view: everything, or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        Category::parse(s).map(CategoryFilter::Only)
    }
}

impl From<Category> for CategoryFilter {
    fn from(value: Category) -> Self {
        CategoryFilter::Only(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(deserialize_with = "lenient::name")]
    pub item_name: String,
    #[serde(default = "default_quantity", deserialize_with = "lenient::quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient::price")]
    pub price: f64,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub added_at: i64,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    #[serde(default)]
    pub id: String,
    #[serde(deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub created_at: i64,
}

/// Lists keyed by id, kept in insertion order.
///
/// Serializes as a JSON object `{ id: List }`. On deserialization the map key
/// is authoritative for `List::id`, and document order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListMap(Vec<List>);

impl ListMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, List> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, List> {
        self.0.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|list| list.id.as_str())
    }

    /// The first list in insertion order.
    pub fn first(&self) -> Option<&List> {
        self.0.first()
    }

    /// Insert a list, replacing (in place) any list with the same id.
    pub fn insert(&mut self, list: List) {
        match self.0.iter_mut().find(|l| l.id == list.id) {
            Some(existing) => *existing = list,
            None => self.0.push(list),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<List> {
        let index = self.0.iter().position(|l| l.id == id)?;
        Some(self.0.remove(index))
    }
}

impl FromIterator<List> for ListMap {
    fn from_iter<T: IntoIterator<Item = List>>(iter: T) -> Self {
        let mut map = ListMap::new();
        for list in iter {
            map.insert(list);
        }
        map
    }
}

impl<'a> IntoIterator for &'a ListMap {
    type Item = &'a List;
    type IntoIter = std::slice::Iter<'a, List>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for ListMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|list| (&list.id, list)))
    }
}

struct ListMapVisitor;

impl<'de> Visitor<'de> for ListMapVisitor {
    type Value = ListMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of list id to list")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ListMap, A::Error> {
        let mut lists = ListMap::new();
        while let Some((key, mut list)) = access.next_entry::<String, List>()? {
            list.id = key;
            lists.insert(list);
        }
        Ok(lists)
    }
}

impl<'de> Deserialize<'de> for ListMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ListMapVisitor)
    }
}

/// Partial update of an item. `None` fields are left untouched.
///
/// `quantity` is signed so a decrement request below zero can be expressed;
/// it is floored at 0 when applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_selected: Option<bool>,
}

impl ItemPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_name(mut self, name: impl Into<String>) -> Self {
        self.item_name = Some(name.into());
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.is_selected = Some(selected);
        self
    }
}

/// Aggregates over every item of a list, independent of any view filter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStats {
    pub total_quantity: u64,
    pub total_cost: f64,
    pub completed_count: usize,
    pub remaining_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    pub id: String,
    pub name: String,
    pub item_count: usize,
    pub is_active: bool,
}

/// Floor a requested quantity at 0 and cap it at `u32::MAX`.
pub fn clamp_quantity(quantity: i64) -> u32 {
    quantity.clamp(0, u32::MAX as i64) as u32
}

/// NaN, infinite and negative prices all become 0.
pub fn sanitize_price(price: f64) -> f64 {
    if price.is_finite() && price > 0.0 {
        price
    } else {
        0.0
    }
}

/// Parse a price typed by the user. Unparsable input yields 0.
pub fn parse_price(text: &str) -> f64 {
    text.trim().parse::<f64>().map(sanitize_price).unwrap_or(0.0)
}

mod lenient {
    use super::{clamp_quantity, parse_price, sanitize_price};
    use serde::de::{self, Deserialize, Deserializer};
    use serde_json::Value;

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(de::Error::custom(format!("invalid item id: {}", other))),
        }
    }

    /// Names are trimmed; blank ones reject the whole record.
    pub fn name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let name = String::deserialize(deserializer)?;
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(de::Error::custom("name must not be blank"));
        }
        Ok(trimmed.to_string())
    }

    pub fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let quantity = match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64))
                .unwrap_or(0),
            Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
            _ => 0,
        };
        Ok(clamp_quantity(quantity))
    }

    pub fn price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64().map(sanitize_price).unwrap_or(0.0),
            Value::String(s) => parse_price(&s),
            _ => 0.0,
        })
    }
}
