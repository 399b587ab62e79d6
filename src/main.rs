//! gitfit CLI
//!
//! Command-line front end over the issue-backed records:
//! - Connect a repository and clear the stored credentials
//! - Dashboard, calendar and weekly stats
//! - Log, edit and delete workouts
//! - Manage profiles and daily stats
//! - Export everything as JSON

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use gitfit::activity::{activity_icon, activity_unit};
use gitfit::calendar::CalendarMonth;
use gitfit::config::{generate_default_config, Config};
use gitfit::forms::{FormError, ProfileForm, WorkoutForm};
use gitfit::render::{self, OutputFormat};
use gitfit::summary::{activity_choices, weekly_series, workouts_on, Dashboard};
use gitfit::{
    validate_credentials, DailyStat, Document, GitHubClient, GithubCredentials, IssueStore,
    RecordRepository, UserProfile, Workout,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitfit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fitness log stored in GitHub Issues")]
#[command(long_about = "gitfit keeps workouts, profiles and daily stats as JSON issue bodies\nin a GitHub repository you own. Run `gitfit setup` first.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Config file (default: search the usual locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect a repository with a personal access token
    Setup {
        #[arg(long)]
        token: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        repo: String,
    },

    /// Forget the stored credentials
    Disconnect,

    /// Greeting, weekly workout time and the day's activities
    Dashboard {
        /// Day to show (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Month grid with workout days marked
    Calendar {
        /// Month as YYYY-MM (default: month of --date)
        #[arg(short, long)]
        month: Option<String>,
        /// Selected day (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Log a workout, or edit one with --edit
    Log {
        /// Activity type, e.g. Running or Push-ups
        #[arg(short = 't', long = "type")]
        activity: Option<String>,
        #[arg(short, long)]
        amount: Option<f64>,
        /// Unit (default: derived from the activity type)
        #[arg(short, long)]
        unit: Option<String>,
        #[arg(short, long)]
        calories: Option<f64>,
        /// Date (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Profile id (default: first profile)
        #[arg(long)]
        user: Option<u64>,
        #[arg(short, long)]
        notes: Option<String>,
        /// Workout id to replace
        #[arg(long)]
        edit: Option<u64>,
    },

    /// Show any record by id
    Show { id: u64 },

    /// Delete a workout (closes its issue)
    Delete { id: u64 },

    /// List workouts
    Workouts {
        /// Only this day
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Activity types offered when logging
    Activities,

    /// Manage profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Steps and sleep
    Daily {
        #[command(subcommand)]
        action: DailyAction,
    },

    /// Steps and sleep over the last 7 days
    Stats,

    /// All records as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    List,
    /// Create a profile, or replace one with --edit
    Save {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<f64>,
        /// Kilograms
        #[arg(long)]
        weight: Option<f64>,
        /// Centimetres
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        edit: Option<u64>,
    },
    Delete { id: u64 },
}

#[derive(Subcommand)]
pub enum DailyAction {
    List,
    /// Record steps and/or sleep for a day
    Log {
        #[arg(long)]
        steps: Option<f64>,
        /// Hours slept
        #[arg(long)]
        sleep: Option<f64>,
        /// Date (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        user: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    gitfit::logging::init(&config.logging).context("Failed to open log file")?;

    let today = Local::now().date_naive();
    let format = cli.format;

    match cli.command {
        Commands::Setup { token, owner, repo } => {
            let credentials = GithubCredentials::new(token.trim(), owner.trim(), repo.trim());
            if !validate_credentials(&config.github, &credentials).await {
                bail!(
                    "Could not access {} with that token. Check the token scope and repository name.",
                    credentials.slug()
                );
            }
            config.credentials.store().save(&credentials)?;
            println!("Connected to {}", credentials.slug());
        }

        Commands::Disconnect => {
            config.credentials.store().clear()?;
            println!("Disconnected");
        }

        Commands::Dashboard { date } => {
            let repo = connect(&config)?;
            let ((workouts, profiles), stats) =
                tokio::join!(repo.overview(), repo.list::<DailyStat>());

            let dashboard = Dashboard::build(
                &workouts,
                &profiles,
                &stats,
                date.unwrap_or(today),
                today,
            );
            match format {
                OutputFormat::Table => emit(render::dashboard_text(&dashboard)),
                _ => emit(render::to_json(&dashboard)?),
            }
        }

        Commands::Calendar { month, date } => {
            let selected = date.unwrap_or(today);
            let month = match month {
                Some(m) => NaiveDate::parse_from_str(&format!("{}-01", m), "%Y-%m-%d")
                    .with_context(|| format!("Invalid month {:?}, expected YYYY-MM", m))?,
                None => selected,
            };

            let repo = connect(&config)?;
            let workouts = repo.list::<Workout>().await;
            let grid = CalendarMonth::build(month, &workouts, selected, today);
            match format {
                OutputFormat::Table => emit(render::calendar_text(&grid)),
                _ => emit(render::to_json(&grid)?),
            }
        }

        Commands::Log {
            activity,
            amount,
            unit,
            calories,
            date,
            user,
            notes,
            edit,
        } => {
            let repo = connect(&config)?;
            let (workouts, profiles) = repo.overview().await;

            let base = match edit {
                Some(id) => Some(
                    repo.get::<Workout>(id)
                        .await
                        .ok_or_else(|| anyhow!("Workout #{} not found", id))?,
                ),
                None => None,
            };

            let form = WorkoutForm {
                activity,
                amount,
                unit,
                calories,
                date,
                user,
                notes,
            };
            let workout = match form.build(base.as_ref(), profiles.first().map(|p| p.id), today) {
                Ok(workout) => workout,
                Err(FormError::MissingActivity) => bail!(
                    "{} (e.g. {})",
                    FormError::MissingActivity,
                    activity_choices(&workouts).join(", ")
                ),
                Err(e) => return Err(e.into()),
            };

            repo.save(&workout, edit).await?;
            match edit {
                Some(id) => println!("Updated workout #{}", id),
                None => println!(
                    "Logged {} {} {} {}",
                    activity_icon(&workout.activity).glyph(),
                    workout.activity,
                    workout.amount.unwrap_or_default(),
                    workout.display_unit()
                ),
            }
        }

        Commands::Show { id } => {
            let repo = connect(&config)?;
            let issue = repo.store().get_issue(id).await?;
            let document =
                Document::from_issue(&issue).map_err(|e| anyhow!("Issue #{} is not a record: {}", id, e))?;
            emit(render::to_json(&document)?);
        }

        Commands::Delete { id } => {
            let repo = connect(&config)?;
            repo.delete(id).await?;
            println!("Deleted #{}", id);
        }

        Commands::Workouts { date } => {
            let repo = connect(&config)?;
            let (workouts, profiles) = repo.overview().await;
            let workouts: Vec<Workout> = match date {
                Some(day) => workouts_on(&workouts, day).into_iter().cloned().collect(),
                None => workouts,
            };
            emit(match format {
                OutputFormat::Table => render::workout_table(&workouts, &profiles),
                OutputFormat::Json => render::records_json(&workouts)?,
                OutputFormat::Csv => render::workouts_csv(&workouts)?,
            });
        }

        Commands::Activities => {
            let repo = connect(&config)?;
            let workouts = repo.list::<Workout>().await;
            for choice in activity_choices(&workouts) {
                println!(
                    "{} {:<20} {}",
                    activity_icon(&choice).glyph(),
                    choice,
                    activity_unit(&choice)
                );
            }
        }

        Commands::Profile { action } => {
            let repo = connect(&config)?;
            match action {
                ProfileAction::List => {
                    let profiles = repo.list::<UserProfile>().await;
                    emit(match format {
                        OutputFormat::Table => render::profile_table(&profiles),
                        OutputFormat::Json => render::records_json(&profiles)?,
                        OutputFormat::Csv => render::profiles_csv(&profiles)?,
                    });
                }
                ProfileAction::Save {
                    name,
                    age,
                    weight,
                    height,
                    edit,
                } => {
                    let base = match edit {
                        Some(id) => Some(
                            repo.get::<UserProfile>(id)
                                .await
                                .ok_or_else(|| anyhow!("Profile #{} not found", id))?,
                        ),
                        None => None,
                    };
                    let form = ProfileForm {
                        name,
                        age,
                        weight,
                        height,
                    };
                    let profile = form.build(base.as_ref());

                    repo.save(&profile, edit).await?;
                    println!("Saved profile {}", profile.name);
                }
                ProfileAction::Delete { id } => {
                    repo.delete(id).await?;
                    println!("Deleted profile #{}", id);
                }
            }
        }

        Commands::Daily { action } => {
            let repo = connect(&config)?;
            match action {
                DailyAction::List => {
                    let stats = repo.list::<DailyStat>().await;
                    emit(match format {
                        OutputFormat::Table => render::daily_table(&stats),
                        OutputFormat::Json => render::records_json(&stats)?,
                        OutputFormat::Csv => render::daily_csv(&stats)?,
                    });
                }
                DailyAction::Log {
                    steps,
                    sleep,
                    date,
                    user,
                } => {
                    if steps.is_none() && sleep.is_none() {
                        bail!("Give --steps, --sleep or both");
                    }
                    let day = date.unwrap_or(today);
                    let mut stat = DailyStat::new(day.format("%Y-%m-%d").to_string());
                    if let Some(steps) = steps {
                        stat = stat.steps(steps);
                    }
                    if let Some(hours) = sleep {
                        stat = stat.sleep_hours(hours);
                    }
                    if let Some(user) = user {
                        stat = stat.user(user);
                    }

                    repo.save(&stat, None).await?;
                    println!("Recorded daily stats for {}", day);
                }
            }
        }

        Commands::Stats => {
            let repo = connect(&config)?;
            let stats = repo.list::<DailyStat>().await;
            let series = weekly_series(&stats, today);
            emit(match format {
                OutputFormat::Table => render::stats_text(&series),
                OutputFormat::Json => render::to_json(&series)?,
                OutputFormat::Csv => render::to_csv(&series)?,
            });
        }

        Commands::Export { output } => {
            let repo = connect(&config)?;
            let documents = repo.list_documents().await?;
            let data = render::to_json(&documents)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &data)?;
                    println!("Exported {} records to {:?}", documents.len(), path);
                }
                None => emit(data),
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Repository over the connected GitHub repo
fn connect(config: &Config) -> anyhow::Result<RecordRepository<GitHubClient>> {
    let credentials = config
        .credentials
        .store()
        .require()
        .context("Run `gitfit setup` to connect a repository")?;
    Ok(RecordRepository::new(GitHubClient::new(
        &config.github,
        credentials,
    )?))
}

fn emit(text: String) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}
