//! JobBot CLI
//!
//! Command-line front end for the job-application assistant:
//! - Browse, add and scrape jobs
//! - Upload resumes and generate tailored applications
//! - Move applications through the pipeline
//! - Draft and send outreach emails
//! - Practise interviews
//! - Configure and run daily automation

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use jobbot::analytics::{recent, FunnelStats, DEFAULT_RECENT};
use jobbot::api::{ApiClient, ApplyAllRequest, Backend};
use jobbot::automation::{AutomationScheduler, SettingsStore};
use jobbot::config::{generate_default_config, Config};
use jobbot::controller::{Dashboard, Level, Tab};
use jobbot::diagnostics::RemoteLogger;
use jobbot::forms::{ManualJobForm, ResumeForm};
use jobbot::generator::PromptPreset;
use jobbot::models::{Application, ApplicationStatus, Job, JobId, Resume, ResumeFile, Role, TrackingId};
use jobbot::pipeline::Board;
use jobbot::routes::{resolve, Resolution};
use jobbot::store::StoreName;

#[derive(Parser)]
#[command(name = "jobbot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Job-application assistant client")]
#[command(long_about = "JobBot scrapes postings, tailors resumes, tracks applications\nand coaches interviews through the JobBot backend.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Job postings
    Jobs {
        #[command(subcommand)]
        action: JobsAction,
    },

    /// Draft (or apply) to many jobs at once
    ApplyAll {
        /// Maximum number of jobs to process
        #[arg(short, long)]
        limit: Option<u32>,
        /// Send without manual review
        #[arg(long)]
        auto_approve: bool,
        /// Resume to use (default: backend's choice)
        #[arg(short, long)]
        resume: Option<i64>,
    },

    /// Base resumes
    Resumes {
        #[command(subcommand)]
        action: ResumesAction,
    },

    /// Tracked applications
    Apps {
        #[command(subcommand)]
        action: AppsAction,
    },

    /// Generate a tailored resume for a job
    Generate {
        job_id: JobId,
        /// Resume to tailor (default: first uploaded)
        #[arg(short, long)]
        resume: Option<i64>,
        /// Custom generation prompt
        #[arg(short, long, conflicts_with = "preset")]
        prompt: Option<String>,
        /// Prompt preset (safe, impact)
        #[arg(long)]
        preset: Option<PromptPreset>,
        /// Also score the match
        #[arg(long)]
        analyze: bool,
    },

    /// Review and send the outreach email for an application
    Email {
        tracking_id: TrackingId,
        /// Override the recipient
        #[arg(long)]
        to: Option<String>,
        /// Send after review
        #[arg(long)]
        send: bool,
    },

    /// Mock interview for a job (reads answers from stdin)
    Interview { job_id: JobId },

    /// Daily automation
    Automation {
        #[command(subcommand)]
        action: AutomationAction,
    },

    /// Resolve a front-end path to its page
    Routes { path: String },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum JobsAction {
    /// List stored jobs
    List,
    /// Add a job manually
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        link: String,
        #[arg(long)]
        description: String,
    },
    /// Delete a job
    Delete { id: JobId },
    /// Scrape for new postings
    Search { keywords: Vec<String> },
}

#[derive(Subcommand)]
pub enum ResumesAction {
    /// List uploaded resumes
    List,
    /// Upload a resume
    Upload {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Resume file (PDF or DOCX)
        #[arg(long, conflicts_with = "latex")]
        file: Option<PathBuf>,
        /// File holding LaTeX source
        #[arg(long)]
        latex: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AppsAction {
    /// List applications with funnel counts
    List,
    /// Show the kanban board
    Board,
    /// Move an application to another column
    Move {
        id: TrackingId,
        status: ApplicationStatus,
    },
}

#[derive(Subcommand)]
pub enum AutomationAction {
    /// Show saved settings
    Show,
    /// Change and save settings
    Set {
        #[arg(long)]
        active: Option<bool>,
        /// Daily run time, HH:MM
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        max_apps: Option<u32>,
        #[arg(long)]
        auto_approve: Option<bool>,
    },
    /// Run once now with the saved settings
    Run,
    /// Run daily until interrupted
    Schedule,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    // Commands that never touch the backend
    match &cli.command {
        Commands::Config { output } => return write_config(output.as_deref()),
        Commands::Routes { path } => {
            print_resolution(path, resolve(path), cli.format);
            return Ok(());
        }
        _ => {}
    }

    jobbot::logging::init_logging(&config.logging)?;

    let client = Arc::new(ApiClient::new(config.api.to_client_config())?);
    let backend: Arc<dyn Backend> = client;
    if let Some((username, password)) = config.api.credentials() {
        let user = backend.login(username, password).await.context("Login failed")?;
        tracing::info!(%user, "Logged in");
    }

    let logger = RemoteLogger::new(backend.clone())
        .enabled(config.remote_log.enabled)
        .context(config.remote_log.context.clone());
    let dashboard = Dashboard::new(backend.clone())
        .with_sink(Arc::new(logger))
        .with_failed_turn_policy(config.interview.failed_turn);

    let result = run(cli, &config, &dashboard).await;
    flush_notifications(&dashboard);
    result
}

async fn run(cli: Cli, config: &Config, dashboard: &Dashboard) -> anyhow::Result<()> {
    let format = cli.format;

    match cli.command {
        Commands::Jobs { action } => match action {
            JobsAction::List => {
                dashboard.select_tab(Tab::Jobs).await?;
                print_jobs(&dashboard.jobs().snapshot().await, format);
            }
            JobsAction::Add {
                title,
                company,
                link,
                description,
            } => {
                dashboard.begin_manual_job().await?;
                let mut form = ManualJobForm::new();
                form.title = title;
                form.company = company;
                form.link = link;
                form.description = description;
                let job = dashboard.submit_manual_job(&mut form).await?;
                println!("Added job {}: {}", job.id, job.label());
            }
            JobsAction::Delete { id } => {
                dashboard.delete_job(id).await?;
                println!("Deleted job {}", id);
            }
            JobsAction::Search { keywords } => {
                let message = dashboard.search_jobs(&keywords.join(" ")).await?;
                println!("{}", message);
                print_jobs(&dashboard.jobs().snapshot().await, format);
            }
        },

        Commands::ApplyAll {
            limit,
            auto_approve,
            resume,
        } => {
            let request = ApplyAllRequest {
                limit,
                auto_approve: Some(auto_approve),
                resume_id: resume,
            };
            let message = dashboard.apply_all(request).await?;
            println!("{}", message);
        }

        Commands::Resumes { action } => match action {
            ResumesAction::List => {
                dashboard.select_tab(Tab::Resumes).await?;
                print_resumes(&dashboard.resumes().snapshot().await, format);
            }
            ResumesAction::Upload {
                name,
                description,
                file,
                latex,
            } => {
                let latex_code = match latex {
                    Some(path) => std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?,
                    None => String::new(),
                };
                let mut form = ResumeForm::new();
                form.name = name;
                form.description = description;
                form.latex_code = latex_code;
                form.file = file.map(ResumeFile::Path);
                let resume = dashboard.submit_resume(&mut form).await?;
                println!("Uploaded resume {}: {}", resume.id, resume.name);
            }
        },

        Commands::Apps { action } => match action {
            AppsAction::List => {
                dashboard.select_tab(Tab::Apps).await?;
                let apps = dashboard.applications().snapshot().await;
                print_applications(&apps, format);
                if format == OutputFormat::Table {
                    print_funnel(&apps);
                }
            }
            AppsAction::Board => {
                dashboard.select_tab(Tab::Apps).await?;
                print_board(&dashboard.board().await, format);
            }
            AppsAction::Move { id, status } => {
                dashboard.select_tab(Tab::Apps).await?;
                let event = dashboard
                    .board()
                    .await
                    .drop_into(id, status)
                    .ok_or_else(|| anyhow!("No application with tracking id {}", id))?;
                if dashboard.move_application(event).await? {
                    println!("Moved application {} to {}", id, status);
                } else {
                    println!("Application {} is already in {}", id, status);
                }
            }
        },

        Commands::Generate {
            job_id,
            resume,
            prompt,
            preset,
            analyze,
        } => {
            let job = find_job(dashboard, job_id).await?;
            dashboard.begin_application_draft(job).await?;
            let mut generator = dashboard
                .generator()
                .await
                .ok_or_else(|| anyhow!("Generator is not open"))?;

            if let Some(id) = resume {
                generator.select_resume(id)?;
            }
            if let Some(preset) = preset {
                generator.apply_preset(preset);
            }
            if let Some(prompt) = prompt {
                generator.set_prompt(prompt);
            }

            let pdf = generator.generate().await?;
            println!("Tailored resume: {}", pdf);
            if let Some(id) = generator.tracking_id() {
                println!("Tracking id: {}", id);
            }

            if analyze {
                let analysis = generator.analyze_match().await?;
                println!("Match score: {:.0}%", analysis.score);
                println!("Tip: {}", analysis.tip);
            }
            dashboard.return_to_list().await;
        }

        Commands::Email {
            tracking_id,
            to,
            send,
        } => {
            let mut outreach = dashboard.outreach();
            outreach.load().await?;
            outreach.select(tracking_id);
            outreach.review().await?;
            if let Some(to) = to {
                outreach.draft_mut().hr_email = to;
            }

            let draft = outreach.draft();
            println!("To: {}", draft.hr_email);
            println!("{}", "-".repeat(40));
            println!("{}", draft.email_body);

            if send {
                outreach.send().await?;
                println!("Email sent");
            }
        }

        Commands::Interview { job_id } => {
            let job = find_job(dashboard, job_id).await?;
            dashboard.begin_interview(job).await?;
            let result = interview(dashboard).await;
            dashboard.return_to_list().await;
            result?;
        }

        Commands::Automation { action } => {
            let store = SettingsStore::new(&config.automation.settings_path);
            match action {
                AutomationAction::Show => {
                    let settings = store.load();
                    match format {
                        OutputFormat::Json => print_json(&settings)?,
                        OutputFormat::Table => {
                            println!("Active:       {}", settings.is_active);
                            println!("Daily time:   {}", settings.daily_time);
                            println!("Max apps:     {}", settings.max_apps);
                            println!("Auto approve: {}", settings.auto_approve);
                            println!("File:         {}", store.path().display());
                        }
                    }
                }
                AutomationAction::Set {
                    active,
                    time,
                    max_apps,
                    auto_approve,
                } => {
                    let mut settings = store.load();
                    if let Some(active) = active {
                        settings.is_active = active;
                    }
                    if let Some(time) = time {
                        settings.daily_time = time;
                    }
                    if let Some(max_apps) = max_apps {
                        settings.max_apps = max_apps;
                    }
                    if let Some(auto_approve) = auto_approve {
                        settings.auto_approve = auto_approve;
                    }
                    store.save(&settings)?;
                    println!("Settings saved to {}", store.path().display());
                }
                AutomationAction::Run => {
                    let scheduler = AutomationScheduler::new(dashboard.backend().clone(), store.load());
                    let message = scheduler.run_now().await?;
                    println!("{}", message);
                }
                AutomationAction::Schedule => {
                    let settings = store.load();
                    if !settings.is_active {
                        bail!("Automation is inactive; enable it with `jobbot automation set --active true`");
                    }
                    settings.validate()?;
                    println!("Running daily at {}, Ctrl-C to stop", settings.daily_time);

                    let scheduler = Arc::new(
                        AutomationScheduler::new(dashboard.backend().clone(), settings)
                            .with_tick(Duration::from_secs(config.automation.tick_interval_secs)),
                    );
                    let handle = scheduler.clone().start();
                    tokio::signal::ctrl_c().await?;
                    scheduler.stop().await;
                    handle.abort();
                    if let Some(message) = scheduler.last_message().await {
                        println!("Last run ({:?}): {}", scheduler.status().await, message);
                    }
                }
            }
        }

        // Handled before the backend is set up
        Commands::Routes { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

async fn find_job(dashboard: &Dashboard, id: JobId) -> anyhow::Result<Job> {
    dashboard.refresh(StoreName::Jobs).await?;
    dashboard
        .jobs()
        .find(|job| job.id == id)
        .await
        .ok_or_else(|| anyhow!("No job with id {}", id))
}

/// Line-oriented chat. `:analyze N` critiques turn N, `:quit` ends the session.
async fn interview(dashboard: &Dashboard) -> anyhow::Result<()> {
    let mut coach = dashboard
        .interview_coach()
        .await
        .ok_or_else(|| anyhow!("Interview is not open"))?;

    let opening = coach.start().await?;
    for (index, turn) in opening.turns().iter().enumerate() {
        print_turn(index, turn.role, &turn.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == ":quit" {
            break;
        }
        if let Some(index) = line.strip_prefix(":analyze") {
            let index: usize = index.trim().parse().context("Usage: :analyze <turn>")?;
            match coach.analyze(index).await {
                Ok(analysis) => {
                    println!("Rating: {}", analysis.rating);
                    println!("Tone: {}", analysis.communication.tone);
                    println!("Feedback: {}", analysis.feedback_summary);
                    println!("Improved: {}", analysis.improved_version);
                }
                Err(e) => eprintln!("{}", e.user_message()),
            }
            continue;
        }

        let before = coach.transcript().len();
        match coach.send(line).await {
            Ok(transcript) => {
                for (index, turn) in transcript.turns().iter().enumerate().skip(before + 1) {
                    print_turn(index, turn.role, &turn.content);
                }
            }
            Err(e) => eprintln!("{}", e.user_message()),
        }
    }
    Ok(())
}

fn flush_notifications(dashboard: &Dashboard) {
    for notification in dashboard.notifier().drain() {
        match notification.level {
            Level::Error => eprintln!("error: {}", notification.message),
            Level::Success | Level::Info => eprintln!("{}", notification.message),
        }
    }
}

fn write_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn print_turn(index: usize, role: Role, content: &str) {
    let who = match role {
        Role::Assistant => "interviewer",
        Role::User => "you",
    };
    println!("[{}] {}: {}", index, who, content);
}

fn print_jobs(jobs: &[Job], format: OutputFormat) {
    if format == OutputFormat::Json {
        if let Err(e) = print_json(jobs) {
            eprintln!("{}", e);
        }
        return;
    }
    if jobs.is_empty() {
        println!("No jobs");
        return;
    }

    println!("{:<6} | {:<32} | {:<20} | {:<14}", "ID", "Title", "Company", "Source");
    println!("{}", "-".repeat(82));
    for job in jobs {
        println!(
            "{:<6} | {:<32} | {:<20} | {:<14}",
            job.id,
            truncate(&job.title, 32),
            truncate(&job.company, 20),
            truncate(&job.source, 14)
        );
    }
}

fn print_resumes(resumes: &[Resume], format: OutputFormat) {
    if format == OutputFormat::Json {
        if let Err(e) = print_json(resumes) {
            eprintln!("{}", e);
        }
        return;
    }
    if resumes.is_empty() {
        println!("No resumes");
        return;
    }

    println!("{:<6} | {:<24} | {:<40}", "ID", "Name", "Description");
    println!("{}", "-".repeat(76));
    for resume in resumes {
        println!(
            "{:<6} | {:<24} | {:<40}",
            resume.id,
            truncate(&resume.name, 24),
            truncate(resume.description.as_deref().unwrap_or("-"), 40)
        );
    }
}

fn print_applications(apps: &[Application], format: OutputFormat) {
    if format == OutputFormat::Json {
        if let Err(e) = print_json(apps) {
            eprintln!("{}", e);
        }
        return;
    }
    if apps.is_empty() {
        println!("No applications");
        return;
    }

    println!("{:<6} | {:<30} | {:<20} | {:<10}", "ID", "Job", "Company", "Status");
    println!("{}", "-".repeat(74));
    for app in apps {
        println!(
            "{:<6} | {:<30} | {:<20} | {:<10}",
            app.tracking_id,
            truncate(app.job_title(), 30),
            truncate(app.company(), 20),
            app.status
        );
    }
}

fn print_funnel(apps: &[Application]) {
    let stats = FunnelStats::from_applications(apps);
    println!();
    for point in stats.funnel() {
        println!("{:<10} {}", point.name, point.value);
    }

    let latest = recent(apps, DEFAULT_RECENT);
    if !latest.is_empty() {
        println!();
        println!("Recent:");
        for app in latest {
            println!("  {} @ {} ({})", app.job_title(), app.company(), app.status);
        }
    }
}

fn print_board(board: &Board, format: OutputFormat) {
    if format == OutputFormat::Json {
        let columns: Vec<_> = board
            .columns
            .iter()
            .map(|c| serde_json::json!({ "status": c.status, "title": c.title, "cards": c.cards }))
            .collect();
        if let Err(e) = print_json(&columns) {
            eprintln!("{}", e);
        }
        return;
    }

    for column in &board.columns {
        println!("{} ({})", column.title, column.len());
        for card in &column.cards {
            println!("  #{:<5} {} @ {}", card.tracking_id, card.job_title(), card.company());
        }
    }
}

fn print_resolution(path: &str, resolution: Resolution, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Err(e) = print_json(&resolution) {
                eprintln!("{}", e);
            }
        }
        OutputFormat::Table => match resolution {
            Resolution::Page(route) => println!("{} -> {:?}", path, route),
            Resolution::Redirect(route) => println!("{} -> redirect to {}", path, route.path()),
        },
    }
}
