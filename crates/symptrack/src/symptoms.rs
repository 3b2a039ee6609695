//! Symptom category selection and the custom symptom list.
//!
//! A [`SymptomSelection`] maps category ids to a "tracked" flag and keeps
//! insertion order, which is also display order. [`SymptomModel`] holds the
//! operations that touch storage or analytics.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info};

use crate::analytics::{Analytics, AnalyticsEvent};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::persistence::LocalStorage;
use crate::storage::KeyValueStore;
use crate::survey::{build_active_questions, ActiveSurvey};

/// Ordered mapping from category id to tracked flag.
///
/// Persisted as a JSON object whose key order follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomSelection {
    entries: Vec<(String, bool)>,
}

impl SymptomSelection {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in category of `catalog`, tracked.
    #[must_use]
    pub fn all_tracked(catalog: &Catalog) -> Self {
        Self {
            entries: catalog.category_ids().map(|id| (id.to_string(), true)).collect(),
        }
    }

    /// Copy of this selection with `category` set to `tracked`.
    ///
    /// Existing keys keep their position; new keys go last.
    #[must_use]
    pub fn with(mut self, category: &str, tracked: bool) -> Self {
        self.set(category, tracked);
        self
    }

    fn set(&mut self, category: &str, tracked: bool) {
        match self.entries.iter_mut().find(|(id, _)| id == category) {
            Some(entry) => entry.1 = tracked,
            None => self.entries.push((category.to_string(), tracked)),
        }
    }

    /// The flag for `category`, if present.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(id, _)| id == category)
            .map(|(_, tracked)| *tracked)
    }

    /// Whether `category` is present and tracked.
    #[must_use]
    pub fn is_tracked(&self, category: &str) -> bool {
        self.get(category).unwrap_or(false)
    }

    /// Whether `category` has an entry, tracked or not.
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.get(category).is_some()
    }

    /// True iff no category is tracked. A selection with keys that are all
    /// `false` is empty in this sense.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.entries.iter().any(|(_, tracked)| *tracked)
    }

    /// Number of entries, tracked or not.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.entries.len()
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(id, tracked)| (id.as_str(), *tracked))
    }

    /// Tracked category ids in order.
    pub fn tracked(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, tracked)| *tracked).map(|(id, _)| id)
    }
}

impl Serialize for SymptomSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, tracked) in &self.entries {
            map.serialize_entry(id, tracked)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SymptomSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SelectionVisitor;

        impl<'de> Visitor<'de> for SelectionVisitor {
            type Value = SymptomSelection;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category id to boolean")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut selection = SymptomSelection::new();
                while let Some((id, tracked)) = access.next_entry::<String, bool>()? {
                    selection.set(&id, tracked);
                }
                Ok(selection)
            }
        }

        deserializer.deserialize_map(SelectionVisitor)
    }
}

/// Append-only list of user-authored category ids, unique, in creation order.
///
/// Decoding goes through [`FromIterator`], so a stored list with repeats
/// reads back with each name once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CustomSymptoms(Vec<String>);

impl CustomSymptoms {
    /// Append `name` unless already present. Returns whether it was added.
    pub fn push(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.0.push(name.to_string());
        true
    }

    /// Whether `name` is in the list.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// The most recently added name.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Number of custom symptoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in creation order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for CustomSymptoms {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::default();
        for name in iter {
            list.push(&name.into());
        }
        list
    }
}

impl From<Vec<String>> for CustomSymptoms {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<CustomSymptoms> for Vec<String> {
    fn from(list: CustomSymptoms) -> Self {
        list.0
    }
}

/// Normalize a user-entered custom symptom name.
///
/// # Errors
///
/// Returns [`Error::InvalidCustomSymptom`] for blank names.
pub fn normalize_custom_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_custom_symptom(name, "name is blank"));
    }
    Ok(trimmed.to_string())
}

/// Result of [`SymptomModel::submit`].
#[derive(Debug)]
pub enum SubmitOutcome<'a> {
    /// Nothing was tracked; nothing was written.
    Rejected,
    /// The selection was persisted; this is the new active survey.
    Saved(ActiveSurvey<'a>),
}

impl SubmitOutcome<'_> {
    /// Whether the submission was rejected.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// Symptom operations bound to a catalog, a storage adapter and an analytics sink.
pub struct SymptomModel<'a, S> {
    storage: &'a LocalStorage<S>,
    catalog: &'a Catalog,
    analytics: &'a dyn Analytics,
}

impl<S> fmt::Debug for SymptomModel<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymptomModel")
            .field("categories", &self.catalog.categories().len())
            .finish_non_exhaustive()
    }
}

impl<'a, S: KeyValueStore> SymptomModel<'a, S> {
    /// Bind the model to its collaborators.
    pub fn new(
        storage: &'a LocalStorage<S>,
        catalog: &'a Catalog,
        analytics: &'a dyn Analytics,
    ) -> Self {
        Self {
            storage,
            catalog,
            analytics,
        }
    }

    /// The catalog this model filters against.
    #[must_use]
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// The storage adapter.
    #[must_use]
    pub fn storage(&self) -> &'a LocalStorage<S> {
        self.storage
    }

    /// The persisted selection, or every built-in category tracked.
    ///
    /// The default is not written back.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the stored selection is corrupt.
    pub async fn load_or_default(&self) -> Result<SymptomSelection> {
        if let Some(selection) = self.storage.symptoms().await? {
            debug!(
                "Loaded selection with {} categories",
                selection.category_count()
            );
            return Ok(selection);
        }
        debug!("No stored selection, tracking every built-in category");
        Ok(SymptomSelection::all_tracked(self.catalog))
    }

    /// The persisted custom symptom list (empty when absent).
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn load_custom(&self) -> Result<CustomSymptoms> {
        self.storage.custom_symptoms().await
    }

    /// Return `selection` with `category` set to `tracked`, reporting the
    /// change to analytics.
    #[must_use]
    pub fn toggle(
        &self,
        selection: &SymptomSelection,
        category: &str,
        tracked: bool,
    ) -> SymptomSelection {
        self.analytics
            .record(AnalyticsEvent::for_toggle(category, tracked));
        selection.clone().with(category, tracked)
    }

    /// Track a new custom category.
    ///
    /// The normalized name is set to tracked in the returned selection and,
    /// unless it names a built-in category, appended to the persisted custom
    /// list. The returned list is the stored one after the append; for
    /// built-in names `custom` is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error for blank names or if persisting the custom list fails.
    pub async fn append_custom_category(
        &self,
        selection: &SymptomSelection,
        custom: &CustomSymptoms,
        name: &str,
    ) -> Result<(SymptomSelection, CustomSymptoms)> {
        let name = normalize_custom_name(name)?;
        let selection = selection.clone().with(&name, true);

        if self.catalog.is_builtin(&name) {
            return Ok((selection, custom.clone()));
        }
        let custom = self.storage.add_custom_symptom(&name).await?;
        info!("Added custom symptom '{}'", name);
        Ok((selection, custom))
    }

    /// Persist `selection` and compute the new active survey.
    ///
    /// An empty selection is rejected without touching storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn submit(&self, selection: &SymptomSelection) -> Result<SubmitOutcome<'a>> {
        if selection.is_empty() {
            debug!("Rejecting submit: no category tracked");
            return Ok(SubmitOutcome::Rejected);
        }
        self.storage.set_symptoms(selection).await?;
        let survey = build_active_questions(self.catalog, selection);
        info!(
            "Saved selection; {} of {} questions active",
            survey.len(),
            self.catalog.questions().len()
        );
        Ok(SubmitOutcome::Saved(survey))
    }
}
