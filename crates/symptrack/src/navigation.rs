//! Navigation surface: named routes, their parameters, and where the symptom
//! screen goes after a successful submit.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::SurveyQuestion;
use crate::error::{Error, Result};
use crate::survey::ActiveSurvey;

/// Name of the tab container route.
pub const TABS_ROUTE: &str = "tabs";
/// Name of the symptom selection route.
pub const SYMPTOMS_ROUTE: &str = "symptoms";
/// Name of the custom symptom creation route.
pub const ADD_SYMPTOM_ROUTE: &str = "add-symptom";
/// Prefix of the per-question routes.
pub const QUESTION_ROUTE_PREFIX: &str = "question-";

/// A named route of the navigation stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The tab container (initial route).
    Tabs,
    /// The symptom selection screen.
    Symptoms,
    /// The custom symptom creation screen.
    AddSymptom,
    /// The survey question at this active position.
    Question(usize),
}

impl Route {
    /// Parse a route name such as `tabs` or `question-3`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            TABS_ROUTE => Some(Self::Tabs),
            SYMPTOMS_ROUTE => Some(Self::Symptoms),
            ADD_SYMPTOM_ROUTE => Some(Self::AddSymptom),
            other => other
                .strip_prefix(QUESTION_ROUTE_PREFIX)
                .and_then(|n| n.parse().ok())
                .map(Self::Question),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tabs => f.write_str(TABS_ROUTE),
            Self::Symptoms => f.write_str(SYMPTOMS_ROUTE),
            Self::AddSymptom => f.write_str(ADD_SYMPTOM_ROUTE),
            Self::Question(index) => write!(f, "{QUESTION_ROUTE_PREFIX}{index}"),
        }
    }
}

/// Parameters handed to a question route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionParams<'a> {
    /// Question text.
    pub question: &'a str,
    /// Answer options.
    pub answers: &'a [String],
    /// Optional explanation.
    pub explanation: Option<&'a str>,
    /// Position of this question in the survey being walked.
    pub current_survey_item: usize,
}

/// Route table: the tab container plus one route per survey question.
#[derive(Debug, Clone)]
pub struct Router<'a> {
    questions: Vec<&'a SurveyQuestion>,
}

impl<'a> Router<'a> {
    /// One question route per entry of `questions`, in order.
    #[must_use]
    pub fn new(questions: impl IntoIterator<Item = &'a SurveyQuestion>) -> Self {
        Self {
            questions: questions.into_iter().collect(),
        }
    }

    /// Routes for the questions of an active survey.
    #[must_use]
    pub fn for_survey(survey: &ActiveSurvey<'a>) -> Self {
        Self::new(survey.questions())
    }

    /// The route shown first.
    #[must_use]
    pub fn initial_route(&self) -> Route {
        Route::Tabs
    }

    /// Every registered route: static ones first, then questions in order.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        [Route::Tabs, Route::Symptoms, Route::AddSymptom]
            .into_iter()
            .chain((0..self.questions.len()).map(Route::Question))
            .collect()
    }

    /// Number of question routes.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Parameters for `question-{index}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QuestionOutOfRange`] for an unregistered index.
    pub fn question_params(&self, index: usize) -> Result<QuestionParams<'a>> {
        let question = self
            .questions
            .get(index)
            .ok_or(Error::QuestionOutOfRange {
                index,
                len: self.questions.len(),
            })?;
        Ok(QuestionParams {
            question: &question.question,
            answers: &question.answers,
            explanation: question.explanation.as_deref(),
            current_survey_item: index,
        })
    }
}

/// Optional parameters of the symptom selection route.
///
/// Every field defaults to "off": no explanation, no redirect, no date,
/// no newly created symptom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymptomScreenParams {
    /// Show the onboarding explanation panel.
    pub show_explanation: bool,
    /// Where to go after submitting. `None` (or empty) returns to the tabs;
    /// `"0"` opens the first question; anything else opens the first
    /// question with a fresh survey for `date`.
    pub redirect: Option<String>,
    /// Day the survey started from this screen is for.
    pub date: Option<NaiveDate>,
    /// A custom symptom just created on the add-symptom screen.
    pub new_symptom: Option<String>,
}

impl SymptomScreenParams {
    /// Where a successful submit leads, given the freshly built survey.
    ///
    /// A redirect into an empty survey falls back to the tabs.
    #[must_use]
    pub fn submit_target(&self, survey: &ActiveSurvey<'_>) -> Navigation {
        let redirect = self.redirect.as_deref().filter(|r| !r.is_empty());
        match redirect {
            None => Navigation::Tabs,
            Some(_) if survey.is_empty() => Navigation::Tabs,
            Some("0") => Navigation::Question {
                index: 0,
                survey: None,
            },
            Some(_) => Navigation::Question {
                index: 0,
                survey: Some(CurrentSurvey::new(self.date)),
            },
        }
    }
}

/// Survey in progress, carried between question routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSurvey {
    /// Day being recorded.
    pub date: Option<NaiveDate>,
    /// Answers given so far, keyed by active question index.
    pub answers: BTreeMap<usize, String>,
}

impl CurrentSurvey {
    /// A survey with no answers yet.
    #[must_use]
    pub fn new(date: Option<NaiveDate>) -> Self {
        Self {
            date,
            answers: BTreeMap::new(),
        }
    }
}

/// A navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Navigation {
    /// Go to the tab container.
    Tabs,
    /// Open a survey question.
    Question {
        /// Active question index.
        index: usize,
        /// Survey context, when starting a dated survey.
        survey: Option<CurrentSurvey>,
    },
}

impl Navigation {
    /// The route this navigation targets.
    #[must_use]
    pub fn route(&self) -> Route {
        match self {
            Self::Tabs => Route::Tabs,
            Self::Question { index, .. } => Route::Question(*index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::survey::build_active_questions;
    use crate::symptoms::SymptomSelection;

    fn builtin_survey(catalog: &Catalog) -> ActiveSurvey<'_> {
        build_active_questions(catalog, &SymptomSelection::all_tracked(catalog))
    }

    #[test]
    fn test_route_names_roundtrip() {
        for route in [
            Route::Tabs,
            Route::Symptoms,
            Route::AddSymptom,
            Route::Question(0),
            Route::Question(12),
        ] {
            assert_eq!(Route::parse(&route.to_string()), Some(route));
        }
        assert_eq!(Route::Question(3).to_string(), "question-3");
        assert_eq!(Route::parse("question-x"), None);
        assert_eq!(Route::parse("settings"), None);
    }

    #[test]
    fn test_router_builds_one_route_per_question() {
        let catalog = Catalog::builtin();
        let router = Router::new(catalog.questions());
        let routes = router.routes();

        assert_eq!(router.initial_route(), Route::Tabs);
        assert_eq!(routes.len(), 3 + catalog.questions().len());
        assert_eq!(
            routes.last(),
            Some(&Route::Question(catalog.questions().len() - 1))
        );
    }

    #[test]
    fn test_question_params() {
        let catalog = Catalog::builtin();
        let router = Router::new(catalog.questions());
        let params = router.question_params(0).unwrap();
        let first = &catalog.questions()[0];

        assert_eq!(params.question, first.question);
        assert_eq!(params.answers, first.answers.as_slice());
        assert_eq!(params.explanation, first.explanation.as_deref());
        assert_eq!(params.current_survey_item, 0);

        assert!(router.question_params(catalog.questions().len()).is_err());
    }

    #[test]
    fn test_router_for_survey_uses_active_positions() {
        let catalog = Catalog::builtin();
        let selection = SymptomSelection::new().with("sleep", true);
        let survey = build_active_questions(&catalog, &selection);
        let router = Router::for_survey(&survey);

        assert_eq!(router.question_count(), survey.len());
        let params = router.question_params(0).unwrap();
        assert_eq!(params.question, survey.get(0).unwrap().question.question);
    }

    #[test]
    fn test_params_defaults() {
        let params = SymptomScreenParams::default();
        assert!(!params.show_explanation);
        assert!(params.redirect.is_none());
        assert!(params.date.is_none());
        assert!(params.new_symptom.is_none());

        let parsed: SymptomScreenParams =
            serde_json::from_str(r#"{"redirect":"1","date":"2024-03-01"}"#).unwrap();
        assert_eq!(parsed.redirect.as_deref(), Some("1"));
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(!parsed.show_explanation);
    }

    #[test]
    fn test_submit_target_without_redirect() {
        let catalog = Catalog::builtin();
        let survey = builtin_survey(&catalog);
        assert_eq!(
            SymptomScreenParams::default().submit_target(&survey),
            Navigation::Tabs
        );

        let empty_redirect = SymptomScreenParams {
            redirect: Some(String::new()),
            ..SymptomScreenParams::default()
        };
        assert_eq!(empty_redirect.submit_target(&survey), Navigation::Tabs);
    }

    #[test]
    fn test_submit_target_redirect_zero() {
        let catalog = Catalog::builtin();
        let survey = builtin_survey(&catalog);
        let params = SymptomScreenParams {
            redirect: Some("0".to_string()),
            ..SymptomScreenParams::default()
        };
        assert_eq!(
            params.submit_target(&survey),
            Navigation::Question {
                index: 0,
                survey: None
            }
        );
    }

    #[test]
    fn test_submit_target_dated_survey() {
        let catalog = Catalog::builtin();
        let survey = builtin_survey(&catalog);
        let date = NaiveDate::from_ymd_opt(2024, 5, 17);
        let params = SymptomScreenParams {
            redirect: Some("survey".to_string()),
            date,
            ..SymptomScreenParams::default()
        };

        let target = params.submit_target(&survey);
        assert_eq!(target.route(), Route::Question(0));
        assert_eq!(
            target,
            Navigation::Question {
                index: 0,
                survey: Some(CurrentSurvey::new(date)),
            }
        );
    }

    #[test]
    fn test_submit_target_empty_survey_falls_back_to_tabs() {
        let params = SymptomScreenParams {
            redirect: Some("0".to_string()),
            ..SymptomScreenParams::default()
        };
        assert_eq!(
            params.submit_target(&ActiveSurvey::default()),
            Navigation::Tabs
        );
    }

    #[test]
    fn test_navigation_serializes_with_route_tag() {
        let json = serde_json::to_value(Navigation::Tabs).unwrap();
        assert_eq!(json["route"], "tabs");
    }
}
