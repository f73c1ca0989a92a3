//! Derivation Layer: pure views over list state, recomputed on every read.

use super::types::{CategoryFilter, Item, List, ListStats, ListSummary};
use super::ListStore;

/// Items of `list` matching all three conditions, in list order.
///
/// - the name contains `search_term`, ignoring case
/// - the category passes `category_filter`
/// - the item is not completed, unless `show_completed`
pub fn filtered_items<'a>(
    list: &'a List,
    search_term: &str,
    category_filter: CategoryFilter,
    show_completed: bool,
) -> Vec<&'a Item> {
    let needle = search_term.to_lowercase();

    list.items
        .iter()
        .filter(|item| item.item_name.to_lowercase().contains(&needle))
        .filter(|item| category_filter.matches(item.category))
        .filter(|item| show_completed || !item.is_selected)
        .collect()
}

/// Totals over every item in the list, regardless of any active filter.
pub fn aggregate_stats(list: &List) -> ListStats {
    let total_quantity = list.items.iter().map(|item| u64::from(item.quantity)).sum();
    let total_cost = list
        .items
        .iter()
        .map(|item| item.price * f64::from(item.quantity))
        .sum();
    let completed_count = list.items.iter().filter(|item| item.is_selected).count();

    ListStats {
        total_quantity,
        total_cost,
        completed_count,
        remaining_count: list.items.len() - completed_count,
    }
}

/// One entry per list, in insertion order, for a list picker.
pub fn list_summaries(store: &ListStore) -> Vec<ListSummary> {
    store
        .lists()
        .iter()
        .map(|list| ListSummary {
            id: list.id.clone(),
            name: list.name.clone(),
            item_count: list.items.len(),
            is_active: list.id == store.active_list_id(),
        })
        .collect()
}

/// Lists can be deleted only while more than one exists.
pub fn can_delete_lists(store: &ListStore) -> bool {
    store.lists().len() > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::types::Category;

    fn item(
        id: &str,
        name: &str,
        category: Category,
        quantity: u32,
        price: f64,
        selected: bool,
    ) -> Item {
        Item {
            id: id.to_string(),
            item_name: name.to_string(),
            quantity,
            price,
            category,
            is_selected: selected,
            added_at: 0,
        }
    }

    fn sample_list() -> List {
        List {
            id: "default".to_string(),
            name: "My Shopping List".to_string(),
            items: vec![
                item("1", "Milk", Category::Dairy, 2, 1.25, false),
                item("2", "Oat Milk", Category::Dairy, 1, 3.0, true),
                item("3", "Bread", Category::Bakery, 1, 2.5, false),
                item("4", "Apples", Category::Fruits, 6, 0.5, true),
            ],
            created_at: 0,
        }
    }

    fn ids(items: &[&Item]) -> Vec<String> {
        items.iter().map(|item| item.id.clone()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_and_stable() {
        let list = sample_list();
        let result = filtered_items(&list, "MILK", CategoryFilter::All, true);
        assert_eq!(ids(&result), vec!["1", "2"]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let list = sample_list();
        let result = filtered_items(&list, "milk", Category::Dairy.into(), false);
        assert_eq!(ids(&result), vec!["1"]);

        let result = filtered_items(&list, "", Category::Fruits.into(), false);
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let list = sample_list();
        let result = filtered_items(&list, "", CategoryFilter::All, true);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_filter_is_repeatable() {
        let list = sample_list();
        let first = ids(&filtered_items(&list, "a", CategoryFilter::All, false));
        let second = ids(&filtered_items(&list, "a", CategoryFilter::All, false));
        assert_eq!(first, second);
        assert_eq!(list, sample_list());
    }

    #[test]
    fn test_stats_cover_all_items() {
        let stats = aggregate_stats(&sample_list());
        assert_eq!(stats.total_quantity, 10);
        assert!((stats.total_cost - 11.0).abs() < 1e-9);
        assert_eq!(stats.completed_count, 2);
        assert_eq!(stats.remaining_count, 2);
    }

    #[test]
    fn test_stats_of_empty_list() {
        let mut list = sample_list();
        list.items.clear();
        assert_eq!(aggregate_stats(&list), ListStats::default());
    }

    #[test]
    fn test_list_summaries_mark_active() {
        let mut store = ListStore::in_memory();
        let party = store.create_list("Party").unwrap();

        let summaries = list_summaries(&store);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, "default");
        assert!(!summaries[0].is_active);
        assert_eq!(summaries[1].id, party.id);
        assert!(summaries[1].is_active);
        assert!(can_delete_lists(&store));
    }
}
