//! View models for the presentational pieces: explanation panels, the
//! symptom list rows and the generic button.
//!
//! These hold only what a renderer needs to decide; they draw nothing.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::symptoms::SymptomSelection;

/// Default button background.
pub const DEFAULT_BUTTON_COLOR: &str = "#1FC6D5";
/// Default button text color.
pub const DEFAULT_BUTTON_TEXT_COLOR: &str = "white";
/// Background of a disabled button.
pub const DISABLED_BUTTON_COLOR: &str = "lightgrey";

/// Lines of explanation shown while a panel is collapsed.
pub const COLLAPSED_LINES: usize = 5;

/// Hint shown on the symptom screen during onboarding.
pub const SYMPTOMS_SETTINGS_HINT: &str = "A tout moment, vous pourrez modifier la liste des symptômes \
que vous souhaitez suivre via l’onglet “Réglages” situé en haut à droite du journal";

/// Title of the onboarding hint panel.
pub const SYMPTOMS_HINT_TITLE: &str = "Informations";

/// A question's explanation panel, collapsible to full screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyExplanation {
    category: String,
    explanation: String,
    full_screen: bool,
}

impl SurveyExplanation {
    /// A collapsed panel, or `None` when there is nothing to explain.
    #[must_use]
    pub fn new(category: impl Into<String>, explanation: Option<&str>) -> Option<Self> {
        explanation.map(|text| Self {
            category: category.into(),
            explanation: text.to_string(),
            full_screen: false,
        })
    }

    /// Switch between collapsed and full screen.
    pub fn toggle_full_screen(&mut self) {
        self.full_screen = !self.full_screen;
    }

    /// Whether the panel covers the screen.
    #[must_use]
    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    /// Panel title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.category
    }

    /// Explanation text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.explanation
    }

    /// Maximum number of lines to render; `None` means all of them.
    #[must_use]
    pub fn visible_lines(&self) -> Option<usize> {
        (!self.full_screen).then_some(COLLAPSED_LINES)
    }

    /// Label of the expand/collapse link.
    #[must_use]
    pub fn toggle_label(&self) -> &'static str {
        if self.full_screen {
            "Réduire"
        } else {
            "Afficher la suite"
        }
    }
}

/// Static information panel of the symptom screen. Never expands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomsExplanation {
    /// Panel title.
    pub title: String,
    /// Panel text, shown on at most [`COLLAPSED_LINES`] lines.
    pub text: String,
}

impl SymptomsExplanation {
    /// A panel, or `None` when there is nothing to explain.
    #[must_use]
    pub fn new(title: impl Into<String>, text: Option<&str>) -> Option<Self> {
        text.map(|text| Self {
            title: title.into(),
            text: text.to_string(),
        })
    }

    /// The onboarding hint about where to change tracked symptoms later.
    #[must_use]
    pub fn settings_hint() -> Self {
        Self {
            title: SYMPTOMS_HINT_TITLE.to_string(),
            text: SYMPTOMS_SETTINGS_HINT.to_string(),
        }
    }
}

/// Title of the symptom screen.
#[must_use]
pub fn symptoms_title(show_explanation: bool) -> String {
    let mut title = String::from("Sélectionner les symptômes");
    if show_explanation {
        title.push_str(" que vous souhaitez suivre");
    }
    title
}

/// One checkbox row of the symptom list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymptomRow {
    /// Category id.
    pub id: String,
    /// Display label (built-in label or the id itself).
    pub label: String,
    /// Checkbox state.
    pub tracked: bool,
}

/// Rows for every entry of `selection`, in selection order.
#[must_use]
pub fn symptom_rows(catalog: &Catalog, selection: &SymptomSelection) -> Vec<SymptomRow> {
    selection
        .iter()
        .map(|(id, tracked)| SymptomRow {
            id: id.to_string(),
            label: catalog.label(id).to_string(),
            tracked,
        })
        .collect()
}

/// Resolved look of a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    /// Button text.
    pub title: String,
    /// Requested background color.
    pub color: Option<String>,
    /// Requested text color.
    pub text_color: Option<String>,
    /// Whether presses are ignored.
    pub disabled: bool,
}

impl Button {
    /// An enabled button with default colors.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            color: None,
            text_color: None,
            disabled: false,
        }
    }

    /// Background to paint. Disabled buttons are always grey.
    #[must_use]
    pub fn background(&self) -> &str {
        if self.disabled {
            return DISABLED_BUTTON_COLOR;
        }
        self.color.as_deref().unwrap_or(DEFAULT_BUTTON_COLOR)
    }

    /// Text color to paint.
    #[must_use]
    pub fn foreground(&self) -> &str {
        self.text_color
            .as_deref()
            .unwrap_or(DEFAULT_BUTTON_TEXT_COLOR)
    }
}
