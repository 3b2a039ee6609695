//! The static symptom and survey catalog.
//!
//! A [`Catalog`] lists the built-in symptom categories (with their display
//! labels) and the full, ordered survey question list. It is immutable once
//! built. The default content ships with the crate; a JSON file with the same
//! shape can replace it (see [`Catalog::load`]).

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Answer scale shared by the built-in questions.
const INTENSITY_ANSWERS: &[&str] = &[
    "Pas du tout",
    "Un peu",
    "Moyennement",
    "Beaucoup",
    "Énormément",
];

/// A built-in symptom category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier, used as the storage key in selections.
    pub id: String,
    /// Human-readable label.
    pub label: String,
}

/// One question of the survey catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    /// Category this question belongs to.
    pub category: String,
    /// The question text.
    pub question: String,
    /// Answer options, in display order.
    pub answers: Vec<String>,
    /// Optional longer explanation shown under the question.
    #[serde(default)]
    pub explanation: Option<String>,
}

impl SurveyQuestion {
    /// Create a question without an explanation.
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        question: impl Into<String>,
        answers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            category: category.into(),
            question: question.into(),
            answers: answers.into_iter().map(Into::into).collect(),
            explanation: None,
        }
    }

    /// Attach an explanation.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

/// Built-in categories plus the ordered question list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
    questions: Vec<SurveyQuestion>,
}

impl Catalog {
    /// Build and validate a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCatalog`] if category ids repeat, a question
    /// refers to an unknown category, or a question has no answers.
    pub fn new(categories: Vec<Category>, questions: Vec<SurveyQuestion>) -> Result<Self> {
        let catalog = Self {
            categories,
            questions,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        let category = |id: &str, label: &str| Category {
            id: id.to_string(),
            label: label.to_string(),
        };
        let categories = vec![
            category("pain", "Douleurs"),
            category("fatigue", "Fatigue"),
            category("sleep", "Sommeil"),
            category("digestion", "Troubles digestifs"),
            category("urinary", "Troubles urinaires"),
            category("mood", "Humeur"),
        ];

        let questions = vec![
            SurveyQuestion::new(
                "pain",
                "Quelle a été l'intensité de vos douleurs aujourd'hui ?",
                INTENSITY_ANSWERS.iter().copied(),
            )
            .with_explanation(
                "Les douleurs pelviennes sont le symptôme le plus fréquent. \
                 Noter leur intensité chaque jour permet de repérer les périodes \
                 difficiles et d'en parler plus facilement avec votre médecin.",
            ),
            SurveyQuestion::new(
                "pain",
                "Avez-vous pris un traitement contre la douleur ?",
                ["Non", "Oui, une fois", "Oui, plusieurs fois"],
            ),
            SurveyQuestion::new(
                "fatigue",
                "À quel point vous êtes-vous sentie fatiguée ?",
                INTENSITY_ANSWERS.iter().copied(),
            )
            .with_explanation(
                "La fatigue chronique accompagne souvent les douleurs. \
                 Elle peut avoir un impact important sur la vie quotidienne.",
            ),
            SurveyQuestion::new(
                "sleep",
                "Comment avez-vous dormi la nuit dernière ?",
                ["Très bien", "Bien", "Moyennement", "Mal", "Très mal"],
            ),
            SurveyQuestion::new(
                "digestion",
                "Avez-vous eu des troubles digestifs (ballonnements, transit) ?",
                INTENSITY_ANSWERS.iter().copied(),
            ),
            SurveyQuestion::new(
                "urinary",
                "Avez-vous ressenti des douleurs en urinant ?",
                INTENSITY_ANSWERS.iter().copied(),
            ),
            SurveyQuestion::new(
                "mood",
                "Comment décririez-vous votre humeur aujourd'hui ?",
                ["Très bonne", "Bonne", "Neutre", "Mauvaise", "Très mauvaise"],
            )
            .with_explanation(
                "Le moral fait partie des symptômes à suivre : il est lié \
                 à la douleur comme à la fatigue.",
            ),
        ];

        Self {
            categories,
            questions,
        }
    }

    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the catalog is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not hold a valid catalog.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading catalog from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.id.trim().is_empty() {
                return Err(Error::invalid_catalog("category id is blank"));
            }
            if !seen.insert(category.id.as_str()) {
                return Err(Error::invalid_catalog(format!(
                    "duplicate category id '{}'",
                    category.id
                )));
            }
        }

        for (index, question) in self.questions.iter().enumerate() {
            if !seen.contains(question.category.as_str()) {
                return Err(Error::invalid_catalog(format!(
                    "question {index} refers to unknown category '{}'",
                    question.category
                )));
            }
            if question.answers.is_empty() {
                return Err(Error::invalid_catalog(format!(
                    "question {index} has no answers"
                )));
            }
        }
        Ok(())
    }

    /// Built-in categories in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Built-in category ids in display order.
    pub fn category_ids(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.id.as_str())
    }

    /// Whether `id` is a built-in category.
    #[must_use]
    pub fn is_builtin(&self, id: &str) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }

    /// Display label for a category id; custom ids display as themselves.
    #[must_use]
    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map_or(id, |c| c.label.as_str())
    }

    /// The full question list, in catalog order.
    #[must_use]
    pub fn questions(&self) -> &[SurveyQuestion] {
        &self.questions
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
