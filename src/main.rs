//! NFL Game Outcome Predictor
//!
//! Command line front end: one-off predictions, prompt generation and the
//! weekly scheduler.

use clap::{Parser, Subcommand};
use nfl_predictor::{
    client::{sample_live_scores, EspnClient},
    config::Config,
    data::{
        display_name, normalize_code, teams_by_division, Conference, Division, HistoryProvider,
        LiveStats, StaticHistory, StatsProvider,
    },
    model::{Analyst, AnalystOutcome},
    monitor::AccuracyTracker,
    predict::PredictionEngine,
    prompts::PromptKind,
    scheduler::{NoSchedule, ScheduleSource, Scheduler, WeekCursor, WeekReport, WeeklyRunner},
    storage::PromptStore,
    types::{Game, GamePrediction, WeatherConditions},
};
use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "nfl-predictor")]
#[command(about = "NFL game outcome predictor with prompt generation and weekly scheduling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the weekly and daily jobs forever
    Auto,
    /// Predict every game of the current week
    PredictWeek,
    /// Predict every game of a specific week
    Week {
        week: u32,
    },
    /// Generate an analysis prompt for one matchup
    Prompt {
        home: String,
        away: String,
        week: Option<u32>,
        /// Short prompt instead of the full analysis
        #[arg(long)]
        quick: bool,
    },
    /// Predict a single game
    Predict {
        home: String,
        away: String,
        #[arg(short, long)]
        week: Option<u32>,
        #[arg(long)]
        playoffs: bool,
        /// Degrees Fahrenheit
        #[arg(long)]
        temperature: Option<f64>,
        /// Miles per hour
        #[arg(long)]
        wind: Option<f64>,
        /// Percent chance
        #[arg(long)]
        precipitation: Option<f64>,
        #[arg(long)]
        conditions: Option<String>,
        /// Ask the configured LLM for an analysis too
        #[arg(long)]
        ai: bool,
        /// Show the factor breakdown
        #[arg(long)]
        factors: bool,
    },
    /// Show prediction accuracy
    Accuracy,
    /// Set the scheduler's current week
    SetWeek {
        week: u32,
    },
    /// Show live scores
    LiveScores {
        /// Use sample data instead of ESPN
        #[arg(long)]
        demo: bool,
    },
    /// Check ESPN and LLM connectivity
    ApiStatus,
    /// List teams by division
    Teams,
}

/// Everything the commands share
struct App {
    config: Config,
    espn: Option<EspnClient>,
    live: Arc<LiveStats>,
    engine: PredictionEngine,
    analyst: Analyst,
    store: PromptStore,
    tracker: Arc<AccuracyTracker>,
    offset: FixedOffset,
}

impl App {
    async fn new(config: Config) -> anyhow::Result<Self> {
        let espn = if config.espn.enabled {
            Some(EspnClient::new(&config.espn)?.with_utc_offset(config.scheduler.utc_offset_hours))
        } else {
            None
        };

        let live = Arc::new(match &espn {
            Some(client) => LiveStats::new(client.clone(), config.espn.cache_ttl_mins),
            None => LiveStats::offline(config.espn.cache_ttl_mins),
        });
        let stats: Arc<dyn StatsProvider> = live.clone();
        let history: Arc<dyn HistoryProvider> = Arc::new(StaticHistory::new());
        let engine = PredictionEngine::new(stats, history);
        let analyst = Analyst::from_config(config.llm.as_ref(), engine.clone());

        let store = PromptStore::from_config(&config.output);
        let tracker = Arc::new(AccuracyTracker::open(config.output.ledger_file_path()).await?);
        let offset = FixedOffset::east_opt(config.scheduler.utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix());

        Ok(Self {
            config,
            espn,
            live,
            engine,
            analyst,
            store,
            tracker,
            offset,
        })
    }

    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }

    fn default_cursor(&self) -> WeekCursor {
        WeekCursor::for_date(
            self.now().date(),
            self.config.season.current_season,
            self.config.season.season_start,
        )
    }

    fn runner(&self) -> WeeklyRunner {
        let schedule: Arc<dyn ScheduleSource> = match &self.espn {
            Some(client) => Arc::new(client.clone()),
            None => Arc::new(NoSchedule),
        };
        WeeklyRunner::new(
            self.engine.clone(),
            self.analyst.clone(),
            schedule,
            self.store.clone(),
            self.tracker.clone(),
            self.config.season.season_start,
        )
        .with_ai_analysis(self.config.scheduler.ai_analysis)
        .with_live_stats(self.live.clone())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let Some(command) = cli.command else {
        print_menu();
        return Ok(());
    };

    let app = App::new(config).await?;

    match command {
        Commands::Auto => run_auto(&app).await,
        Commands::PredictWeek => {
            let cursor = app.store.load_cursor(app.default_cursor()).await;
            predict_week(&app, cursor.week, cursor.season).await
        }
        Commands::Week { week } => {
            let cursor = WeekCursor::new(week, app.config.season.current_season)?;
            predict_week(&app, cursor.week, cursor.season).await
        }
        Commands::Prompt { home, away, week, quick } => {
            let kind = if quick { PromptKind::Quick } else { PromptKind::Comprehensive };
            show_prompt(&app, &home, &away, week, kind).await
        }
        Commands::Predict {
            home,
            away,
            week,
            playoffs,
            temperature,
            wind,
            precipitation,
            conditions,
            ai,
            factors,
        } => {
            let mut game = Game::new(normalize_code(&home), normalize_code(&away), app.now())
                .with_season(app.config.season.current_season)
                .with_playoffs(playoffs);
            if let Some(week) = week {
                game = game.with_week(week);
            }
            if temperature.is_some() || wind.is_some() || precipitation.is_some() || conditions.is_some() {
                game = game.with_weather(WeatherConditions {
                    temperature: temperature.unwrap_or(70.0),
                    wind_speed: wind.unwrap_or(0.0),
                    precipitation: precipitation.unwrap_or(0.0),
                    conditions: conditions.unwrap_or_else(|| "Clear".to_string()),
                });
            }
            predict_game(&app, &game, factors, ai).await
        }
        Commands::Accuracy => {
            println!("\n📈 Prediction Accuracy\n");
            println!("{}", app.tracker.report().await);
            Ok(())
        }
        Commands::SetWeek { week } => {
            let mut cursor = app.store.load_cursor(app.default_cursor()).await;
            cursor.set_week(week)?;
            app.store.save_cursor(&cursor).await?;
            println!("✅ Current week set to {} ({} season)", cursor.week, cursor.season);
            Ok(())
        }
        Commands::LiveScores { demo } => live_scores(&app, demo).await,
        Commands::ApiStatus => api_status(&app).await,
        Commands::Teams => {
            show_teams();
            Ok(())
        }
    }
}

fn print_menu() {
    println!("\n🏈 NFL Game Predictor\n");
    println!("  auto                         Run the weekly scheduler");
    println!("  predict-week                 Predict the current week");
    println!("  week <N>                     Predict week N");
    println!("  prompt <HOME> <AWAY> [WEEK]  Generate an analysis prompt (--quick for short)");
    println!("  predict <HOME> <AWAY>        Predict one game (--factors, --ai, weather flags)");
    println!("  accuracy                     Show prediction accuracy");
    println!("  set-week <N>                 Set the current week");
    println!("  live-scores                  Show live scores (--demo for sample data)");
    println!("  api-status                   Check ESPN and LLM connectivity");
    println!("  teams                        List all teams");
    println!("\nRun with --help for details.");
}

async fn run_auto(app: &App) -> anyhow::Result<()> {
    let cursor = app.store.load_cursor(app.default_cursor()).await;
    tracing::info!("Starting scheduler at week {} of {}", cursor.week, cursor.season);

    let scheduler = Scheduler::new(app.runner(), &app.config.scheduler)?;
    scheduler.run(cursor).await?;
    Ok(())
}

async fn predict_week(app: &App, week: u32, season: i32) -> anyhow::Result<()> {
    let report = app.runner().run_week(week, season).await;
    print_week(&report);
    Ok(())
}

fn print_week(report: &WeekReport) {
    println!("\n🏈 Week {} Predictions ({})\n", report.week, report.season);
    if report.used_fallback {
        println!("(live schedule unavailable, using fallback matchups)\n");
    }
    println!("{:<32} {:<6} {:>10} {:>8}", "Matchup", "Pick", "Score", "Conf");
    println!("{}", "-".repeat(60));
    for run in &report.games {
        let score = format!(
            "{}-{}",
            run.prediction.predicted_score.away, run.prediction.predicted_score.home
        );
        println!(
            "{:<32} {:<6} {:>10} {:>7.0}%",
            run.game.matchup(),
            run.prediction.predicted_winner,
            score,
            run.prediction.confidence
        );
    }

    println!(
        "\n{} prompts written, {} games graded",
        report.prompts_written(),
        report.graded
    );
    for (what, error) in &report.failures {
        println!("⚠️  {}: {}", what, error);
    }
}

async fn show_prompt(
    app: &App,
    home: &str,
    away: &str,
    week: Option<u32>,
    kind: PromptKind,
) -> anyhow::Result<()> {
    app.live.refresh_if_stale().await;
    let game = Game::new(normalize_code(home), normalize_code(away), app.now())
        .with_week(week.unwrap_or_else(|| app.default_cursor().week))
        .with_season(app.config.season.current_season);

    let prompt = app.analyst.prompt(&game, kind);
    let path = app.store.save_prompt(&game, &prompt).await?;
    println!("{}", prompt);
    println!("\n✅ Saved to {}", path.display());
    Ok(())
}

async fn predict_game(app: &App, game: &Game, show_factors: bool, ai: bool) -> anyhow::Result<()> {
    app.live.refresh_if_stale().await;
    let prediction = app.engine.predict_game(game);
    print_prediction(game, &prediction);

    if show_factors {
        println!("\nFactor breakdown (positive favors {}):", game.home_team);
        for (name, value) in app.engine.factors(game).breakdown() {
            println!("  {:<20} {:>+6.2}", name, value);
        }
    }

    app.tracker.record(game, &prediction).await;
    app.tracker.save().await?;

    if ai {
        println!("\n🤖 Running AI analysis...\n");
        match app.analyst.analyze(game, PromptKind::Comprehensive).await {
            AnalystOutcome::Text(text) => println!("{}", text),
            AnalystOutcome::NotConfigured => {
                println!("AI analysis not configured. Add an [llm] section or set OPENAI_API_KEY.")
            }
            AnalystOutcome::Unavailable(reason) => println!("AI analysis unavailable: {}", reason),
        }
    }
    Ok(())
}

fn print_prediction(game: &Game, prediction: &GamePrediction) {
    println!("\n🏈 {} @ {}\n", display_name(&game.away_team), display_name(&game.home_team));
    println!(
        "Predicted winner: {} ({:.0}% confidence)",
        display_name(&prediction.predicted_winner),
        prediction.confidence
    );
    println!(
        "Projected score:  {} {} - {} {}",
        game.away_team,
        prediction.predicted_score.away,
        prediction.predicted_score.home,
        game.home_team
    );
    if !prediction.key_factors.is_empty() {
        println!("\nKey factors:");
        for factor in &prediction.key_factors {
            println!("  • {}", factor);
        }
    }
    println!("\n{}", prediction.reasoning);
}

async fn live_scores(app: &App, demo: bool) -> anyhow::Result<()> {
    let scores = match (&app.espn, demo) {
        (Some(client), false) => match client.live_scores().await {
            Ok(scores) if !scores.is_empty() => scores,
            Ok(_) => {
                println!("No games on the scoreboard, showing sample data");
                sample_live_scores()
            }
            Err(e) => {
                tracing::warn!("Live scores unavailable: {}", e);
                println!("ESPN unavailable, showing sample data");
                sample_live_scores()
            }
        },
        _ => sample_live_scores(),
    };

    println!("\n📺 Live Scores\n");
    for score in scores {
        println!(
            "{:>4} {:>3}  @  {:<4} {:>3}   {} ({})",
            score.away_team, score.away_score, score.home_team, score.home_score, score.status, score.quarter
        );
    }
    Ok(())
}

async fn api_status(app: &App) -> anyhow::Result<()> {
    println!("\n🔌 API Status\n");

    match &app.espn {
        Some(client) => match client.standings().await {
            Ok(standings) => println!("ESPN:  ✅ {} ({} teams in standings)", client.base_url(), standings.len()),
            Err(e) => println!("ESPN:  ❌ {} ({})", client.base_url(), e),
        },
        None => println!("ESPN:  disabled, using static stats"),
    }

    if app.analyst.is_configured() {
        println!("LLM:   ✅ configured");
    } else {
        println!("LLM:   not configured");
    }
    println!("Stats: {}", app.engine.stats().name());
    println!("Output: {}", app.store.prompt_dir().display());
    Ok(())
}

fn show_teams() {
    println!("\n🏈 NFL Teams\n");
    for conference in [Conference::AFC, Conference::NFC] {
        for division in [Division::East, Division::North, Division::South, Division::West] {
            println!("{} {}", conference, division);
            for team in teams_by_division(conference, division) {
                println!("  {:<4} {:<24} {}", team.code, team.name, team.stadium);
            }
        }
    }
}
