//! The symptom selection screen as an explicit state machine.
//!
//! ```text
//! Loading --(both loads)--> Ready --edited--> Ready
//!                             |
//!                           submit --(empty)--> Ready
//!                             |
//!                         Submitting --ok--> NavigatedToSurvey | NavigatedToTabs
//!                             |
//!                           failed --> Ready
//! ```
//!
//! [`transition`] is pure. [`SymptomScreen`] drives it and performs the side
//! effects (storage, analytics) around each event.

use tracing::{debug, warn};

use crate::components::{self, Button, SymptomRow, SymptomsExplanation};
use crate::error::{Error, Result};
use crate::navigation::{CurrentSurvey, Navigation, SymptomScreenParams};
use crate::storage::KeyValueStore;
use crate::symptoms::{CustomSymptoms, SubmitOutcome, SymptomModel, SymptomSelection};

/// Data held once the screen is interactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadyState {
    /// Current, unsaved selection.
    pub selection: SymptomSelection,
    /// Custom symptoms known to this screen.
    pub custom: CustomSymptoms,
}

/// State of the symptom screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenState {
    /// Waiting for the initial loads; each resolves independently.
    Loading {
        /// Resolved selection, if that load finished.
        selection: Option<SymptomSelection>,
        /// Resolved custom list, if that load finished.
        custom: Option<CustomSymptoms>,
    },
    /// Interactive.
    Ready(ReadyState),
    /// Saving the selection.
    Submitting(ReadyState),
    /// Left for a survey question.
    NavigatedToSurvey {
        /// Active question index opened.
        index: usize,
        /// Survey context, if a dated survey was started.
        survey: Option<CurrentSurvey>,
    },
    /// Left for the tab container.
    NavigatedToTabs,
}

impl ScreenState {
    /// Fresh state for a mounting screen.
    #[must_use]
    pub fn loading() -> Self {
        Self::Loading {
            selection: None,
            custom: None,
        }
    }

    /// Short state name, for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading { .. } => "loading",
            Self::Ready(_) => "ready",
            Self::Submitting(_) => "submitting",
            Self::NavigatedToSurvey { .. } => "navigated_to_survey",
            Self::NavigatedToTabs => "navigated_to_tabs",
        }
    }

    /// Whether the screen has been left.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::NavigatedToSurvey { .. } | Self::NavigatedToTabs)
    }

    /// Interactive data, while ready or submitting.
    #[must_use]
    pub fn data(&self) -> Option<&ReadyState> {
        match self {
            Self::Ready(data) | Self::Submitting(data) => Some(data),
            _ => None,
        }
    }
}

/// Inputs to [`transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    /// The selection load resolved (already defaulted).
    SelectionLoaded(SymptomSelection),
    /// The custom list load resolved.
    CustomLoaded(CustomSymptoms),
    /// The selection was edited: a checkbox changed or a custom symptom
    /// was added.
    Edited {
        /// The new selection.
        selection: SymptomSelection,
        /// The new custom list.
        custom: CustomSymptoms,
    },
    /// The user pressed the submit button.
    SubmitRequested,
    /// The selection was saved; go where indicated.
    SubmitSucceeded(Navigation),
    /// Saving the selection failed.
    SubmitFailed,
    /// The user pressed "back"; nothing is saved.
    BackRequested,
}

impl ScreenEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::SelectionLoaded(_) => "selection_loaded",
            Self::CustomLoaded(_) => "custom_loaded",
            Self::Edited { .. } => "edited",
            Self::SubmitRequested => "submit_requested",
            Self::SubmitSucceeded(_) => "submit_succeeded",
            Self::SubmitFailed => "submit_failed",
            Self::BackRequested => "back_requested",
        }
    }
}

/// Merge the two initial loads.
///
/// Custom symptoms missing from the selection are listed untracked so the
/// user can see and enable them.
fn ready_from(selection: SymptomSelection, custom: CustomSymptoms) -> ReadyState {
    let selection = custom
        .as_slice()
        .iter()
        .fold(selection, |selection, name| {
            if selection.contains(name) {
                selection
            } else {
                selection.with(name, false)
            }
        });
    ReadyState { selection, custom }
}

/// Compute the next state.
///
/// # Errors
///
/// Returns [`Error::InvalidTransition`] for events that make no sense in the
/// current state (e.g. toggling while loading, anything after navigating).
pub fn transition(state: &ScreenState, event: ScreenEvent) -> Result<ScreenState> {
    let invalid = |event: &ScreenEvent| Error::InvalidTransition {
        state: state.name(),
        event: event.name(),
    };

    let next = match (state, event) {
        (
            ScreenState::Loading {
                selection: None,
                custom,
            },
            ScreenEvent::SelectionLoaded(loaded),
        ) => match custom {
            Some(custom) => ScreenState::Ready(ready_from(loaded, custom.clone())),
            None => ScreenState::Loading {
                selection: Some(loaded),
                custom: None,
            },
        },
        (
            ScreenState::Loading {
                selection,
                custom: None,
            },
            ScreenEvent::CustomLoaded(loaded),
        ) => match selection {
            Some(selection) => ScreenState::Ready(ready_from(selection.clone(), loaded)),
            None => ScreenState::Loading {
                selection: None,
                custom: Some(loaded),
            },
        },
        (ScreenState::Ready(_), ScreenEvent::Edited { selection, custom }) => {
            ScreenState::Ready(ReadyState { selection, custom })
        }
        (ScreenState::Ready(data), ScreenEvent::SubmitRequested) => {
            if data.selection.is_empty() {
                ScreenState::Ready(data.clone())
            } else {
                ScreenState::Submitting(data.clone())
            }
        }
        (ScreenState::Ready(_), ScreenEvent::BackRequested) => ScreenState::NavigatedToTabs,
        (ScreenState::Submitting(_), ScreenEvent::SubmitSucceeded(navigation)) => {
            match navigation {
                Navigation::Tabs => ScreenState::NavigatedToTabs,
                Navigation::Question { index, survey } => {
                    ScreenState::NavigatedToSurvey { index, survey }
                }
            }
        }
        (ScreenState::Submitting(data), ScreenEvent::SubmitFailed) => {
            ScreenState::Ready(data.clone())
        }
        (_, event) => return Err(invalid(&event)),
    };
    Ok(next)
}

/// A mounted symptom selection screen.
#[derive(Debug)]
pub struct SymptomScreen<'a, S> {
    model: SymptomModel<'a, S>,
    params: SymptomScreenParams,
    state: ScreenState,
}

impl<'a, S: KeyValueStore> SymptomScreen<'a, S> {
    /// A screen still in [`ScreenState::Loading`]; feed it with [`Self::apply`].
    #[must_use]
    pub fn new(model: SymptomModel<'a, S>, params: SymptomScreenParams) -> Self {
        Self {
            model,
            params,
            state: ScreenState::loading(),
        }
    }

    /// Mount: run both initial loads concurrently, then handle a
    /// `new_symptom` route parameter if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a load fails or the new symptom cannot be persisted.
    pub async fn mount(model: SymptomModel<'a, S>, params: SymptomScreenParams) -> Result<Self> {
        let mut screen = Self::new(model, params);

        let (selection, custom) =
            tokio::join!(screen.model.load_or_default(), screen.model.load_custom());
        screen.apply(ScreenEvent::SelectionLoaded(selection?))?;
        screen.apply(ScreenEvent::CustomLoaded(custom?))?;

        if let Some(name) = screen.params.new_symptom.clone() {
            screen.add_custom_symptom(&name).await?;
        }
        Ok(screen)
    }

    /// Feed one event through [`transition`].
    ///
    /// # Errors
    ///
    /// Returns an error if the event is invalid in the current state; the
    /// state is left unchanged.
    pub fn apply(&mut self, event: ScreenEvent) -> Result<&ScreenState> {
        let next = transition(&self.state, event)?;
        if next.name() != self.state.name() {
            debug!("Symptom screen: {} -> {}", self.state.name(), next.name());
        }
        self.state = next;
        Ok(&self.state)
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Route parameters the screen was opened with.
    #[must_use]
    pub fn params(&self) -> &SymptomScreenParams {
        &self.params
    }

    /// The in-memory selection, once loaded.
    #[must_use]
    pub fn selection(&self) -> Option<&SymptomSelection> {
        self.state.data().map(|d| &d.selection)
    }

    /// The custom list, once loaded.
    #[must_use]
    pub fn custom_symptoms(&self) -> Option<&CustomSymptoms> {
        self.state.data().map(|d| &d.custom)
    }

    fn ready_data(&self, event: &'static str) -> Result<&ReadyState> {
        match &self.state {
            ScreenState::Ready(data) => Ok(data),
            other => Err(Error::InvalidTransition {
                state: other.name(),
                event,
            }),
        }
    }

    /// Change one checkbox.
    ///
    /// # Errors
    ///
    /// Returns an error unless the screen is ready.
    pub fn toggle(&mut self, category: &str, tracked: bool) -> Result<()> {
        let data = self.ready_data("edited")?;
        let selection = self.model.toggle(&data.selection, category, tracked);
        let custom = data.custom.clone();
        self.apply(ScreenEvent::Edited { selection, custom })?;
        Ok(())
    }

    /// Create, persist and track a custom symptom.
    ///
    /// # Errors
    ///
    /// Returns an error unless the screen is ready, for blank names, or if
    /// persisting fails.
    pub async fn add_custom_symptom(&mut self, name: &str) -> Result<()> {
        let data = self.ready_data("edited")?;
        let (selection, custom) = self
            .model
            .append_custom_category(&data.selection, &data.custom, name)
            .await?;
        self.apply(ScreenEvent::Edited { selection, custom })?;
        Ok(())
    }

    /// Submit the selection.
    ///
    /// Returns `Ok(None)` when nothing is tracked (nothing saved, screen stays
    /// ready), otherwise the navigation that was performed.
    ///
    /// # Errors
    ///
    /// Returns an error unless the screen is ready, or if saving fails; after
    /// a failed save the screen is ready again with the selection intact.
    pub async fn submit(&mut self) -> Result<Option<Navigation>> {
        self.ready_data("submit_requested")?;
        if !matches!(
            self.apply(ScreenEvent::SubmitRequested)?,
            ScreenState::Submitting(_)
        ) {
            debug!("Nothing tracked, submit ignored");
            return Ok(None);
        }

        let selection = self
            .selection()
            .cloned()
            .ok_or_else(|| Error::internal("submitting without a selection"))?;

        let outcome = match self.model.submit(&selection).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Symptom selection not saved: {}", e);
                self.apply(ScreenEvent::SubmitFailed)?;
                return Err(e);
            }
        };

        let navigation = match outcome {
            SubmitOutcome::Saved(survey) => self.params.submit_target(&survey),
            SubmitOutcome::Rejected => {
                return Err(Error::internal("non-empty selection rejected"));
            }
        };
        self.apply(ScreenEvent::SubmitSucceeded(navigation.clone()))?;
        Ok(Some(navigation))
    }

    /// Leave for the tabs without saving.
    ///
    /// # Errors
    ///
    /// Returns an error unless the screen is ready.
    pub fn back(&mut self) -> Result<()> {
        self.apply(ScreenEvent::BackRequested)?;
        Ok(())
    }

    /// Screen title.
    #[must_use]
    pub fn title(&self) -> String {
        components::symptoms_title(self.params.show_explanation)
    }

    /// The onboarding hint panel, when requested by the route.
    #[must_use]
    pub fn explanation(&self) -> Option<SymptomsExplanation> {
        self.params
            .show_explanation
            .then(SymptomsExplanation::settings_hint)
    }

    /// Checkbox rows; empty while loading.
    #[must_use]
    pub fn rows(&self) -> Vec<SymptomRow> {
        self.selection()
            .map(|selection| components::symptom_rows(self.model.catalog(), selection))
            .unwrap_or_default()
    }

    /// The submit button; disabled until loaded and while nothing is tracked.
    #[must_use]
    pub fn submit_button(&self) -> Button {
        let mut button = Button::new("Valider");
        button.disabled = match &self.state {
            ScreenState::Ready(data) => data.selection.is_empty(),
            _ => true,
        };
        button
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AnalyticsEvent, RecordingAnalytics};
    use crate::catalog::Catalog;
    use crate::persistence::LocalStorage;
    use crate::storage::MemoryStore;

    fn ready(selection: SymptomSelection) -> ScreenState {
        ScreenState::Ready(ReadyState {
            selection,
            custom: CustomSymptoms::default(),
        })
    }

    #[test]
    fn test_loads_resolve_in_either_order() {
        let selection = SymptomSelection::new().with("pain", true);
        let custom: CustomSymptoms = ["migraine"].into_iter().collect();

        let a = transition(
            &ScreenState::loading(),
            ScreenEvent::SelectionLoaded(selection.clone()),
        )
        .unwrap();
        assert_eq!(a.name(), "loading");
        let a = transition(&a, ScreenEvent::CustomLoaded(custom.clone())).unwrap();

        let b = transition(
            &ScreenState::loading(),
            ScreenEvent::CustomLoaded(custom.clone()),
        )
        .unwrap();
        assert_eq!(b.name(), "loading");
        let b = transition(&b, ScreenEvent::SelectionLoaded(selection)).unwrap();

        assert_eq!(a, b);
        let data = a.data().unwrap();
        assert_eq!(data.selection.get("migraine"), Some(false));
        assert_eq!(data.selection.get("pain"), Some(true));
    }

    #[test]
    fn test_same_load_twice_is_rejected() {
        let state = transition(
            &ScreenState::loading(),
            ScreenEvent::CustomLoaded(CustomSymptoms::default()),
        )
        .unwrap();
        assert!(transition(&state, ScreenEvent::CustomLoaded(CustomSymptoms::default())).is_err());
    }

    #[test]
    fn test_interaction_gated_while_loading() {
        let err = transition(
            &ScreenState::loading(),
            ScreenEvent::Edited {
                selection: SymptomSelection::new().with("pain", false),
                custom: CustomSymptoms::default(),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                state: "loading",
                event: "edited"
            }
        ));
        assert!(transition(&ScreenState::loading(), ScreenEvent::SubmitRequested).is_err());
    }

    #[test]
    fn test_empty_submit_stays_ready() {
        let state = ready(SymptomSelection::new().with("pain", false));
        let next = transition(&state, ScreenEvent::SubmitRequested).unwrap();
        assert_eq!(next, state);
    }

    #[test]
    fn test_submit_paths() {
        let state = ready(SymptomSelection::new().with("pain", true));
        let submitting = transition(&state, ScreenEvent::SubmitRequested).unwrap();
        assert_eq!(submitting.name(), "submitting");

        let failed = transition(&submitting, ScreenEvent::SubmitFailed).unwrap();
        assert_eq!(failed, state);

        let tabs = transition(&submitting, ScreenEvent::SubmitSucceeded(Navigation::Tabs)).unwrap();
        assert_eq!(tabs, ScreenState::NavigatedToTabs);

        let survey = transition(
            &submitting,
            ScreenEvent::SubmitSucceeded(Navigation::Question {
                index: 0,
                survey: None,
            }),
        )
        .unwrap();
        assert!(survey.is_terminal());
        assert_eq!(survey.name(), "navigated_to_survey");
    }

    #[test]
    fn test_terminal_states_reject_events() {
        let err = transition(&ScreenState::NavigatedToTabs, ScreenEvent::BackRequested).unwrap_err();
        assert!(err.to_string().contains("navigated_to_tabs"));
    }

    #[tokio::test]
    async fn test_mount_defaults_and_gating() {
        let storage = LocalStorage::new(MemoryStore::new());
        let catalog = Catalog::builtin();
        let analytics = RecordingAnalytics::new();
        let model = SymptomModel::new(&storage, &catalog, &analytics);

        let screen = SymptomScreen::mount(model, SymptomScreenParams::default())
            .await
            .unwrap();
        assert_eq!(screen.state().name(), "ready");
        assert_eq!(
            screen.selection(),
            Some(&SymptomSelection::all_tracked(&catalog))
        );
        assert_eq!(screen.rows().len(), catalog.categories().len());
        assert!(!screen.submit_button().disabled);
        assert!(screen.explanation().is_none());
    }

    #[tokio::test]
    async fn test_toggle_records_analytics() {
        let storage = LocalStorage::new(MemoryStore::new());
        let catalog = Catalog::builtin();
        let analytics = RecordingAnalytics::new();
        let model = SymptomModel::new(&storage, &catalog, &analytics);
        let mut screen = SymptomScreen::mount(model, SymptomScreenParams::default())
            .await
            .unwrap();

        screen.toggle("pain", false).unwrap();
        assert_eq!(screen.selection().unwrap().get("pain"), Some(false));
        assert_eq!(
            analytics.events(),
            vec![AnalyticsEvent::SymptomCancelled("pain".to_string())]
        );
    }

    #[tokio::test]
    async fn test_unchecking_everything_blocks_submit() {
        let storage = LocalStorage::new(MemoryStore::new());
        let catalog = Catalog::builtin();
        let analytics = RecordingAnalytics::new();
        let model = SymptomModel::new(&storage, &catalog, &analytics);
        let mut screen = SymptomScreen::mount(model, SymptomScreenParams::default())
            .await
            .unwrap();

        for id in catalog.category_ids() {
            screen.toggle(id, false).unwrap();
        }
        assert!(screen.submit_button().disabled);
        assert_eq!(screen.submit().await.unwrap(), None);
        assert_eq!(screen.state().name(), "ready");
        assert_eq!(storage.store().write_count(), 0);
    }

    #[tokio::test]
    async fn test_new_symptom_param_is_added_on_mount() {
        let storage = LocalStorage::new(MemoryStore::new());
        let catalog = Catalog::builtin();
        let analytics = RecordingAnalytics::new();
        let model = SymptomModel::new(&storage, &catalog, &analytics);
        let params = SymptomScreenParams {
            new_symptom: Some("migraine".to_string()),
            ..SymptomScreenParams::default()
        };

        let screen = SymptomScreen::mount(model, params).await.unwrap();
        assert_eq!(screen.selection().unwrap().get("migraine"), Some(true));
        assert_eq!(screen.custom_symptoms().unwrap().last(), Some("migraine"));
        assert!(storage.custom_symptoms().await.unwrap().contains("migraine"));
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_selection() {
        let storage = LocalStorage::new(MemoryStore::new());
        let catalog = Catalog::builtin();
        let analytics = RecordingAnalytics::new();
        let model = SymptomModel::new(&storage, &catalog, &analytics);
        let mut screen = SymptomScreen::mount(model, SymptomScreenParams::default())
            .await
            .unwrap();
        screen.toggle("sleep", false).unwrap();

        storage.store().fail_writes(true);
        let err = screen.submit().await.unwrap_err();
        assert!(err.is_write_failure());
        assert_eq!(screen.state().name(), "ready");
        assert_eq!(screen.selection().unwrap().get("sleep"), Some(false));

        storage.store().fail_writes(false);
        assert_eq!(screen.submit().await.unwrap(), Some(Navigation::Tabs));
        assert_eq!(*screen.state(), ScreenState::NavigatedToTabs);
    }

    #[tokio::test]
    async fn test_back_leaves_without_saving() {
        let storage = LocalStorage::new(MemoryStore::new());
        let catalog = Catalog::builtin();
        let analytics = RecordingAnalytics::new();
        let model = SymptomModel::new(&storage, &catalog, &analytics);
        let mut screen = SymptomScreen::mount(model, SymptomScreenParams::default())
            .await
            .unwrap();

        screen.back().unwrap();
        assert_eq!(*screen.state(), ScreenState::NavigatedToTabs);
        assert!(screen.toggle("pain", true).is_err());
        assert_eq!(storage.store().write_count(), 0);
    }
}
