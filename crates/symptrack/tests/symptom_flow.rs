//! End-to-end flows over the `SQLite` store.

use chrono::NaiveDate;
use symptrack::analytics::{AnalyticsEvent, NoopAnalytics, RecordingAnalytics};
use symptrack::navigation::CurrentSurvey;
use symptrack::{
    build_active_questions, Catalog, LocalStorage, Navigation, Route, Router, ScreenState,
    SqliteStore, SymptomModel, SymptomScreen, SymptomScreenParams, SymptomSelection,
};

#[tokio::test]
async fn first_run_tracks_everything_and_saves_on_submit() {
    let storage = LocalStorage::new(SqliteStore::open_in_memory().unwrap());
    let catalog = Catalog::builtin();
    let analytics = NoopAnalytics;
    let model = SymptomModel::new(&storage, &catalog, &analytics);

    assert!(storage.symptoms().await.unwrap().is_none());

    let mut screen = SymptomScreen::mount(model, SymptomScreenParams::default())
        .await
        .unwrap();
    assert_eq!(screen.state().name(), "ready");
    assert!(storage.symptoms().await.unwrap().is_none());

    let navigation = screen.submit().await.unwrap();
    assert_eq!(navigation, Some(Navigation::Tabs));
    assert_eq!(
        storage.symptoms().await.unwrap(),
        Some(SymptomSelection::all_tracked(&catalog))
    );
}

#[tokio::test]
async fn narrowing_the_selection_narrows_the_survey() {
    let storage = LocalStorage::new(SqliteStore::open_in_memory().unwrap());
    let catalog = Catalog::builtin();
    let analytics = RecordingAnalytics::new();
    let model = SymptomModel::new(&storage, &catalog, &analytics);
    let params = SymptomScreenParams {
        redirect: Some("survey".to_string()),
        date: NaiveDate::from_ymd_opt(2024, 5, 17),
        ..SymptomScreenParams::default()
    };

    let mut screen = SymptomScreen::mount(model, params).await.unwrap();
    for id in catalog.category_ids() {
        if id != "sleep" {
            screen.toggle(id, false).unwrap();
        }
    }

    let navigation = screen.submit().await.unwrap().unwrap();
    assert_eq!(
        navigation,
        Navigation::Question {
            index: 0,
            survey: Some(CurrentSurvey::new(NaiveDate::from_ymd_opt(2024, 5, 17))),
        }
    );
    assert!(matches!(
        screen.state(),
        ScreenState::NavigatedToSurvey { index: 0, .. }
    ));
    let events = analytics.events();
    assert_eq!(events.len(), catalog.categories().len() - 1);
    assert!(events
        .iter()
        .all(|e| matches!(e, AnalyticsEvent::SymptomCancelled(_))));

    let saved = storage.symptoms().await.unwrap().unwrap();
    let survey = build_active_questions(&catalog, &saved);
    assert!(!survey.is_empty());
    assert!(survey.iter().all(|q| q.question.category == "sleep"));

    let router = Router::for_survey(&survey);
    assert_eq!(router.question_count(), survey.len());
    let first = router.question_params(0).unwrap();
    assert_eq!(first.question, survey.get(0).unwrap().question.question);
    assert_eq!(router.routes().last(), Some(&Route::Question(survey.len() - 1)));
}

#[tokio::test]
async fn custom_symptom_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("symptrack.db");
    let catalog = Catalog::builtin();
    let analytics = RecordingAnalytics::new();

    {
        let storage = LocalStorage::new(SqliteStore::open(&path).unwrap());
        let model = SymptomModel::new(&storage, &catalog, &analytics);
        let params = SymptomScreenParams {
            new_symptom: Some("  migraine ".to_string()),
            ..SymptomScreenParams::default()
        };
        let mut screen = SymptomScreen::mount(model, params).await.unwrap();
        assert_eq!(screen.submit().await.unwrap(), Some(Navigation::Tabs));
    }

    let storage = LocalStorage::new(SqliteStore::open(&path).unwrap());
    let custom = storage.custom_symptoms().await.unwrap();
    assert_eq!(custom.as_slice(), ["migraine".to_string()]);

    let selection = storage.symptoms().await.unwrap().unwrap();
    assert!(selection.is_tracked("migraine"));
    assert!(selection.is_tracked("pain"));

    let survey = build_active_questions(&catalog, &selection);
    assert_eq!(
        survey.len(),
        catalog.questions().len(),
        "custom categories add no questions"
    );
    assert!(
        analytics.events().is_empty(),
        "adding a custom symptom is not a checkbox toggle"
    );
}

#[tokio::test]
async fn empty_selection_is_never_saved() {
    let storage = LocalStorage::new(SqliteStore::open_in_memory().unwrap());
    let catalog = Catalog::builtin();
    let analytics = NoopAnalytics;
    let model = SymptomModel::new(&storage, &catalog, &analytics);

    let mut screen = SymptomScreen::mount(model, SymptomScreenParams::default())
        .await
        .unwrap();
    for id in catalog.category_ids() {
        screen.toggle(id, false).unwrap();
    }

    assert_eq!(screen.submit().await.unwrap(), None);
    assert_eq!(screen.state().name(), "ready");
    assert!(storage.symptoms().await.unwrap().is_none());
    assert_eq!(storage.store().stats().unwrap().total_items, 0);
}

#[tokio::test]
async fn device_flags_roundtrip_through_sqlite() {
    let storage = LocalStorage::new(SqliteStore::open_in_memory().unwrap());

    assert_eq!(storage.is_first_launch().await.unwrap(), None);
    assert_eq!(storage.supported().await.unwrap(), None);

    storage.set_first_launch(false).await.unwrap();
    storage.set_supported(true).await.unwrap();

    assert_eq!(storage.is_first_launch().await.unwrap(), Some(false));
    assert_eq!(storage.supported().await.unwrap(), Some(true));
    assert_eq!(storage.store().stats().unwrap().total_items, 2);
}
