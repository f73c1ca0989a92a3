use crate::lists::errors::StoreError;
use crate::lists::types::{Category, Item};
use crate::lists::ListStore;

/// Speech-to-text source. `transcribe` yields one utterance, or `None` when
/// nothing was recognised or listening was cancelled.
pub trait Dictation {
    fn is_supported(&self) -> bool;
    fn transcribe(&mut self) -> Option<String>;
}

/// Platform without speech recognition.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDictation;

impl Dictation for NoDictation {
    fn is_supported(&self) -> bool {
        false
    }

    fn transcribe(&mut self) -> Option<String> {
        None
    }
}

/// Add the dictated text as a new item under `other`.
/// Returns `Ok(None)` when dictation is unavailable or produced nothing.
pub fn add_dictated_item(
    store: &mut ListStore,
    list_id: &str,
    dictation: &mut dyn Dictation,
) -> Result<Option<Item>, StoreError> {
    if !dictation.is_supported() {
        tracing::debug!(target: "lists", "Dictation not supported");
        return Ok(None);
    }

    let Some(transcript) = dictation.transcribe() else {
        return Ok(None);
    };

    store
        .add_item(list_id, &transcript, Category::Other)
        .map(Some)
}
