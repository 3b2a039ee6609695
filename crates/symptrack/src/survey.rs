//! The active survey: catalog questions whose category is tracked.
//!
//! Questions of the active survey are addressed by their position in the
//! active subset, not in the catalog. The same catalog entry can therefore
//! sit at different indices for users with different selections.

use serde::Serialize;

use crate::catalog::{Catalog, SurveyQuestion};
use crate::error::{Error, Result};
use crate::symptoms::SymptomSelection;

/// A catalog question placed in the active survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveQuestion<'a> {
    /// Position in the active survey; this is the navigation address.
    pub index: usize,
    /// Position in the full catalog.
    pub catalog_index: usize,
    /// The catalog entry.
    #[serde(flatten)]
    pub question: &'a SurveyQuestion,
}

/// Ordered subset of the catalog for one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActiveSurvey<'a> {
    questions: Vec<ActiveQuestion<'a>>,
}

impl<'a> ActiveSurvey<'a> {
    /// Number of active questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether no question is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question at active position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QuestionOutOfRange`] past the end of the survey.
    pub fn get(&self, index: usize) -> Result<&ActiveQuestion<'a>> {
        self.questions.get(index).ok_or(Error::QuestionOutOfRange {
            index,
            len: self.questions.len(),
        })
    }

    /// Index of the question after `index`, if any.
    #[must_use]
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.questions.len()).then_some(next)
    }

    /// Questions in survey order.
    pub fn iter(&self) -> impl Iterator<Item = &ActiveQuestion<'a>> {
        self.questions.iter()
    }

    /// The underlying catalog entries, in survey order.
    pub fn questions(&self) -> impl Iterator<Item = &'a SurveyQuestion> + '_ {
        self.questions.iter().map(|q| q.question)
    }
}

/// Filter the catalog down to the questions whose category is tracked in
/// `selection`, keeping catalog order.
///
/// Always recomputed; callers must rebuild after any selection change.
#[must_use]
pub fn build_active_questions<'a>(
    catalog: &'a Catalog,
    selection: &SymptomSelection,
) -> ActiveSurvey<'a> {
    let questions = catalog
        .questions()
        .iter()
        .enumerate()
        .filter(|(_, q)| selection.is_tracked(&q.category))
        .enumerate()
        .map(|(index, (catalog_index, question))| ActiveQuestion {
            index,
            catalog_index,
            question,
        })
        .collect();
    ActiveSurvey { questions }
}
