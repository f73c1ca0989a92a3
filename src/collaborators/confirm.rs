use crate::lists::errors::StoreError;
use crate::lists::helpers::find_list;
use crate::lists::ListStore;

pub const RESET_CONFIRMATION: &str =
    "Are you sure you want to clear all data? This action cannot be undone.";

/// Yes/no prompt shown before destructive operations.
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl ConfirmPrompt for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NeverConfirm;

impl ConfirmPrompt for NeverConfirm {
    fn confirm(&self, _message: &str) -> bool {
        false
    }
}

/// Reset everything if the user agrees. Returns whether the reset happened.
pub fn confirm_and_reset(store: &mut ListStore, prompt: &dyn ConfirmPrompt) -> bool {
    if !prompt.confirm(RESET_CONFIRMATION) {
        return false;
    }
    store.reset_all();
    true
}

/// Delete a list if the user agrees. Returns `Ok(false)` when declined.
///
/// Lists that cannot be deleted are rejected before the user is asked.
pub fn confirm_and_delete_list(
    store: &mut ListStore,
    list_id: &str,
    prompt: &dyn ConfirmPrompt,
) -> Result<bool, StoreError> {
    let name = find_list(store.lists(), list_id)
        .map(|list| list.name.clone())
        .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;

    if store.lists().len() <= 1 {
        return Err(StoreError::LastList);
    }

    if !prompt.confirm(&format!("Delete the list \"{}\"?", name)) {
        return Ok(false);
    }

    store.delete_list(list_id)?;
    Ok(true)
}
