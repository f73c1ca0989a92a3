use super::types::{Item, List, ListMap};
use uuid::Uuid;

pub const DEFAULT_LIST_ID: &str = "default";
pub const DEFAULT_LIST_NAME: &str = "My Shopping List";

pub fn find_list<'a>(lists: &'a ListMap, id: &str) -> Option<&'a List> {
    lists.iter().find(|list| list.id == id)
}

pub fn find_list_mut<'a>(lists: &'a mut ListMap, id: &str) -> Option<&'a mut List> {
    lists.iter_mut().find(|list| list.id == id)
}

pub fn find_item<'a>(list: &'a List, id: &str) -> Option<&'a Item> {
    list.items.iter().find(|item| item.id == id)
}

/// Every item carrying `id`. Legacy data can hold duplicate ids.
pub fn items_with_id_mut<'a>(
    list: &'a mut List,
    id: &'a str,
) -> impl Iterator<Item = &'a mut Item> + 'a {
    list.items.iter_mut().filter(move |item| item.id == id)
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// The list every fresh or reset store starts with.
pub fn default_list() -> List {
    List {
        id: DEFAULT_LIST_ID.to_string(),
        name: DEFAULT_LIST_NAME.to_string(),
        items: Vec::new(),
        created_at: now_ms(),
    }
}

pub fn default_lists() -> ListMap {
    std::iter::once(default_list()).collect()
}
