//! `symptrack` - CLI for the symptom tracking core
//!
//! This binary drives the symptom selection screen, the active survey and the
//! navigation surface against the on-disk store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use symptrack::analytics::Analytics;
use symptrack::cli::{
    Cli, Command, ConfigCommand, FlagsCommand, OutputFormat, SurveyCommand, SymptomsCommand,
};
use symptrack::components::SurveyExplanation;
use symptrack::navigation::{Navigation, Route, Router, SymptomScreenParams};
use symptrack::{
    build_active_questions, init_logging, Catalog, Config, LocalStorage, SqliteStore,
    SymptomModel, SymptomScreen,
};

/// Everything a command needs, opened once per invocation.
struct App {
    storage: LocalStorage<SqliteStore>,
    catalog: Catalog,
    analytics: Box<dyn Analytics>,
}

impl App {
    fn open(config: &Config) -> anyhow::Result<Self> {
        let path = config.database_path();
        let store = SqliteStore::open(&path)
            .with_context(|| format!("opening store at {}", path.display()))?;
        let catalog = config.load_catalog().context("loading survey catalog")?;
        Ok(Self {
            storage: LocalStorage::new(store),
            catalog,
            analytics: config.analytics_sink(),
        })
    }

    fn model(&self) -> SymptomModel<'_, SqliteStore> {
        SymptomModel::new(&self.storage, &self.catalog, self.analytics.as_ref())
    }

    async fn screen(
        &self,
        params: SymptomScreenParams,
    ) -> anyhow::Result<SymptomScreen<'_, SqliteStore>> {
        Ok(SymptomScreen::mount(self.model(), params).await?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config_path = cli.config;
    let load_config = || Config::load_from(config_path.clone());

    match cli.command {
        Command::Status(status_cmd) => {
            let config = load_config()?;
            handle_status(&App::open(&config)?, &config, status_cmd.json).await
        }
        Command::Symptoms(symptoms_cmd) => {
            handle_symptoms(&App::open(&load_config()?)?, symptoms_cmd).await
        }
        Command::Survey(survey_cmd) => {
            handle_survey(&App::open(&load_config()?)?, survey_cmd).await
        }
        Command::Routes => handle_routes(&App::open(&load_config()?)?).await,
        Command::Flags(flags_cmd) => handle_flags(&App::open(&load_config()?)?, flags_cmd).await,
        Command::Reset { yes } => handle_reset(&App::open(&load_config()?)?, yes).await,
        // Loads its own file so a broken config can still be inspected.
        Command::Config(config_cmd) => handle_config(config_path.clone(), config_cmd),
    }
}

async fn handle_status(app: &App, config: &Config, json: bool) -> anyhow::Result<()> {
    let stats = app.storage.store().stats()?;
    let model = app.model();
    let selection = model.load_or_default().await?;
    let custom = model.load_custom().await?;
    let survey = build_active_questions(&app.catalog, &selection);
    let first_launch = app.storage.is_first_launch().await?;
    let supported = app.storage.supported().await?;
    let tracked = selection.tracked().count();
    let stored_keys = app.storage.stored_keys().await?;

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "stored_items": stats.total_items,
            "stored_keys": stored_keys,
            "last_updated": stats.last_updated,
            "db_size_bytes": stats.db_size_bytes,
            "tracked_categories": tracked,
            "custom_symptoms": custom,
            "active_questions": survey.len(),
            "is_first_launch": first_launch,
            "supported": supported,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("symptrack status");
        println!("----------------");
        println!("Database:          {}", config.database_path().display());
        println!("Stored items:      {}", stats.total_items);
        if !stored_keys.is_empty() {
            println!("Records:           {}", stored_keys.join(", "));
        }
        if let Some(updated) = stats.last_updated {
            println!("Last updated:      {}", updated.to_rfc3339());
        }
        println!("Tracked:           {tracked}/{}", selection.category_count());
        println!("Custom symptoms:   {}", custom.len());
        println!("Active questions:  {}", survey.len());
        println!("First launch:      {}", flag_label(first_launch));
        println!("Supported device:  {}", flag_label(supported));
    }
    Ok(())
}

fn flag_label(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unset",
    }
}

async fn handle_symptoms(app: &App, cmd: SymptomsCommand) -> anyhow::Result<()> {
    match cmd {
        SymptomsCommand::Show { explain, json } => {
            let params = SymptomScreenParams {
                show_explanation: explain,
                ..SymptomScreenParams::default()
            };
            let screen = app.screen(params).await?;
            let button = screen.submit_button();

            if json {
                let view = serde_json::json!({
                    "title": screen.title(),
                    "explanation": screen.explanation(),
                    "rows": screen.rows(),
                    "custom_symptoms": screen.custom_symptoms(),
                    "submit": {
                        "title": button.title,
                        "disabled": button.disabled,
                        "background": button.background(),
                        "foreground": button.foreground(),
                    },
                });
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("{}", screen.title());
                if let Some(panel) = screen.explanation() {
                    println!();
                    println!("{}: {}", panel.title, panel.text);
                }
                println!();
                for row in screen.rows() {
                    let mark = if row.tracked { 'x' } else { ' ' };
                    println!("  [{mark}] {} ({})", row.label, row.id);
                }
                println!();
                let state = if button.disabled { "disabled" } else { "enabled" };
                println!("[{}] {state}", button.title);
            }
        }
        SymptomsCommand::Toggle { category, state } => {
            let mut screen = app.screen(SymptomScreenParams::default()).await?;
            if !screen
                .selection()
                .is_some_and(|selection| selection.contains(&category))
            {
                bail!("unknown symptom category: {category}");
            }
            screen.toggle(&category, state.into())?;
            report_submit(screen.submit().await?);
        }
        SymptomsCommand::Add { name } => {
            let params = SymptomScreenParams {
                new_symptom: Some(name),
                ..SymptomScreenParams::default()
            };
            let mut screen = app.screen(params).await?;
            report_submit(screen.submit().await?);
        }
        SymptomsCommand::Submit(args) => {
            let mut screen = app.screen(args.params()).await?;
            report_submit(screen.submit().await?);
        }
    }
    Ok(())
}

fn report_submit(navigation: Option<Navigation>) {
    let Some(navigation) = navigation else {
        println!("Nothing tracked; selection not saved.");
        return;
    };
    println!("Selection saved. Navigating to {}", navigation.route());
    if let Navigation::Question {
        survey: Some(survey),
        ..
    } = &navigation
    {
        match survey.date {
            Some(date) => println!("Started survey for {date}"),
            None => println!("Started survey"),
        }
    }
}

async fn handle_survey(app: &App, cmd: SurveyCommand) -> anyhow::Result<()> {
    let selection = app.model().load_or_default().await?;
    let survey = build_active_questions(&app.catalog, &selection);

    match cmd {
        SurveyCommand::List { format } => match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&survey)?),
            OutputFormat::Plain => {
                if survey.is_empty() {
                    println!("No active questions.");
                }
                for question in survey.iter() {
                    println!(
                        "{:>3}. [{}] {}",
                        question.index,
                        app.catalog.label(&question.question.category),
                        question.question.question
                    );
                }
            }
        },
        SurveyCommand::Question { index, full, json } => {
            let router = Router::for_survey(&survey);
            let params = router.question_params(index)?;
            let category = &survey.get(index)?.question.category;

            if json {
                println!("{}", serde_json::to_string_pretty(&params)?);
                return Ok(());
            }

            println!("{}", params.question);
            for (n, answer) in params.answers.iter().enumerate() {
                println!("  {}) {answer}", n + 1);
            }

            if let Some(mut panel) =
                SurveyExplanation::new(app.catalog.label(category), params.explanation)
            {
                if full {
                    panel.toggle_full_screen();
                }
                println!();
                println!("{}", panel.title());
                let lines = panel.text().lines();
                match panel.visible_lines() {
                    Some(limit) => lines.take(limit).for_each(|line| println!("  {line}")),
                    None => lines.for_each(|line| println!("  {line}")),
                }
                println!("({})", panel.toggle_label());
            }

            println!();
            match survey.next_index(index) {
                Some(next) => println!("Next: {}", Route::Question(next)),
                None => println!("Last question."),
            }
        }
    }
    Ok(())
}

async fn handle_routes(app: &App) -> anyhow::Result<()> {
    let selection = app.model().load_or_default().await?;
    let survey = build_active_questions(&app.catalog, &selection);
    let router = Router::for_survey(&survey);
    let initial = router.initial_route();

    for route in router.routes() {
        if route == initial {
            println!("{route} (initial)");
        } else {
            println!("{route}");
        }
    }
    Ok(())
}

async fn handle_flags(app: &App, cmd: FlagsCommand) -> anyhow::Result<()> {
    match cmd {
        FlagsCommand::Show => {
            println!(
                "First launch:      {}",
                flag_label(app.storage.is_first_launch().await?)
            );
            println!(
                "Supported device:  {}",
                flag_label(app.storage.supported().await?)
            );
        }
        FlagsCommand::FirstLaunch { value } => {
            app.storage.set_first_launch(value).await?;
            println!("First launch set to {value}");
        }
        FlagsCommand::Supported { value } => {
            app.storage.set_supported(value).await?;
            println!("Supported device set to {value}");
        }
    }
    Ok(())
}

async fn handle_reset(app: &App, yes: bool) -> anyhow::Result<()> {
    if !yes {
        println!("This will delete the stored selection, custom symptoms and flags.");
        println!("Use --yes to confirm.");
        return Ok(());
    }
    let removed = app.storage.clear().await?;
    println!("Removed {removed} stored records.");
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Catalog]");
                match &config.catalog.path {
                    Some(path) => println!("  Catalog file:       {}", path.display()),
                    None => println!("  Catalog file:       (built-in)"),
                }
                println!();
                println!("[Analytics]");
                println!("  Enabled:            {}", config.analytics.enabled);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_checked(path.clone())
                .with_context(|| format!("invalid configuration at {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
