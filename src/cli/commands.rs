use clap::{Args, Parser, Subcommand};
use chrono::NaiveDate;
use anyhow::Result;
use crate::api::{ApiConfig, HttpClient};
use crate::models::{Priority, ReferenceItem, Stage};
use crate::repo::ReferenceRepository;
use crate::stages::{Dialog, Direction, Notice, Notifier, Operation, Outcome, ReferenceData, StageList};
use crate::cli::error::{exit_on_failure, parse_priority, user_error, validate_non_empty, validate_order, validate_progress};
use crate::cli::output::{
    filter_stages, format_reference_table, format_stage_summary, format_stage_table, get_terminal_width, is_tty,
    ConsoleNotifier,
};
use crate::utils::parse_date_expr;

#[derive(Parser)]
#[command(name = "stagectl")]
#[command(about = "Project stage administration console")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Backend base URL (overrides rc file and STAGECTL_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// Bearer token (overrides rc file and STAGECTL_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the stages of a project
    Stages {
        /// Project identifier
        project: String,
        #[command(subcommand)]
        subcommand: StageCommands,
    },
    /// List stage statuses
    Statuses {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// List stage types
    Types {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum StageCommands {
    /// List stages in order
    List {
        /// Only show stages with this priority
        #[arg(long)]
        priority: Option<String>,
        /// Only show stages with this status id
        #[arg(long)]
        status: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show one stage
    Show {
        stage_id: String,
    },
    /// Create a stage (placed last unless --order is given)
    Add {
        /// Stage title
        title: Vec<String>,
        #[command(flatten)]
        fields: StageFields,
    },
    /// Change fields of a stage
    Modify {
        stage_id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: StageFields,
    },
    /// Delete a stage
    Delete {
        stage_id: String,
    },
    /// Move a stage one position earlier
    Up {
        stage_id: String,
    },
    /// Move a stage one position later
    Down {
        stage_id: String,
    },
}

/// Optional stage fields shared by `add` and `modify`
#[derive(Args, Default)]
pub struct StageFields {
    /// Free-text description
    #[arg(long)]
    pub description: Option<String>,
    /// Progress percentage (0-100)
    #[arg(long)]
    pub progress: Option<u8>,
    /// Priority: high, medium or low
    #[arg(long)]
    pub priority: Option<String>,
    /// Position in the stage sequence (1 = first)
    #[arg(long)]
    pub order: Option<u32>,
    /// Start date (YYYY-MM-DD, today, tomorrow)
    #[arg(long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD, today, tomorrow)
    #[arg(long)]
    pub end: Option<String>,
    /// Status id
    #[arg(long)]
    pub status: Option<String>,
    /// Stage type id
    #[arg(long = "type")]
    pub stage_type: Option<String>,
}

/// `StageFields` with every value parsed
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedFields {
    pub description: Option<String>,
    pub progress: Option<u8>,
    pub priority: Option<Priority>,
    pub order: Option<u32>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub status: Option<String>,
    pub stage_type: Option<String>,
}

impl StageFields {
    /// Parse the raw arguments. Runs before anything is fetched.
    pub fn parse(&self) -> Result<ParsedFields, String> {
        Ok(ParsedFields {
            description: self.description.clone(),
            progress: self.progress.map(validate_progress).transpose()?,
            priority: self.priority.as_deref().map(parse_priority).transpose()?,
            order: self.order.map(validate_order).transpose()?,
            start: self.start.as_deref().map(parse_date).transpose()?,
            end: self.end.as_deref().map(parse_date).transpose()?,
            status: self.status.clone(),
            stage_type: self.stage_type.clone(),
        })
    }
}

fn parse_date(expr: &str) -> Result<NaiveDate, String> {
    parse_date_expr(expr).map_err(|e| e.to_string())
}

type Screen<'a> = StageList<&'a HttpClient, &'a ConsoleNotifier>;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = ApiConfig::resolve()?.with_overrides(cli.api_url, cli.token);
    let notifier = ConsoleNotifier::new(is_tty());

    match cli.command {
        Commands::Stages { project, subcommand } => handle_stages(&config, &notifier, &project, subcommand),
        Commands::Statuses { json } => {
            let client = HttpClient::new(&config)?;
            handle_reference(client.stage_statuses(), "stage statuses", json, &notifier)
        }
        Commands::Types { json } => {
            let client = HttpClient::new(&config)?;
            handle_reference(client.stage_types(), "stage types", json, &notifier)
        }
    }
}

fn handle_reference(
    result: Result<Vec<ReferenceItem>, crate::api::ApiError>,
    subject: &str,
    json: bool,
    notifier: &ConsoleNotifier,
) -> Result<()> {
    match result {
        Ok(items) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                print!("{}", format_reference_table(&items));
            }
            Ok(())
        }
        Err(err) if err.is_unavailable() => {
            log::info!("{} unavailable: {}", subject, err);
            notifier.notify(Notice::unavailable(subject));
            Ok(())
        }
        Err(err) => {
            log::warn!("Loading {} failed: {}", subject, err);
            notifier.notify(Notice::failed(Operation::Loading, subject));
            std::process::exit(1);
        }
    }
}

fn handle_stages(
    config: &ApiConfig,
    notifier: &ConsoleNotifier,
    project: &str,
    command: StageCommands,
) -> Result<()> {
    if let Err(e) = validate_non_empty(project, "Project identifier") {
        user_error(&e);
    }

    // Argument errors are reported before anything is fetched
    let (title, fields) = match &command {
        StageCommands::Add { title, fields } => (Some(title.join(" ")), Some(fields)),
        StageCommands::Modify { title, fields, .. } => (title.clone(), Some(fields)),
        _ => (None, None),
    };
    let parsed = match fields.map(StageFields::parse).transpose() {
        Ok(parsed) => parsed.unwrap_or_default(),
        Err(e) => user_error(&e),
    };

    let client = HttpClient::new(config)?;
    let refs = ReferenceData::load(&client, notifier);
    let mut list = match StageList::new(&client, notifier, project) {
        Ok(list) => list.with_rules(config.rules),
        Err(e) => user_error(&e.to_string()),
    };

    match list.load() {
        Outcome::Failed => std::process::exit(1),
        Outcome::Unavailable if !matches!(command, StageCommands::List { .. }) => return Ok(()),
        _ => {}
    }

    let mut dialog = Dialog::default();
    match command {
        StageCommands::List { priority, status, json } => {
            let priority = match priority.as_deref().map(parse_priority).transpose() {
                Ok(p) => p,
                Err(e) => user_error(&e),
            };
            let view = filter_stages(list.stages(), priority, status.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("{}", format_stage_table(&view, &refs, get_terminal_width(), is_tty()).trim_end());
            }
        }
        StageCommands::Show { stage_id } => {
            let stage = find_stage(&list, &stage_id);
            dialog.open_view(stage.clone());
            print!("{}", format_stage_summary(&stage, &refs));
            dialog.submit(&mut list);
        }
        StageCommands::Add { .. } => {
            dialog.open_create(&list);
            if let Some(draft) = dialog.draft_mut() {
                draft.title = title.unwrap_or_default();
                draft.description = parsed.description.unwrap_or_default();
                draft.progress_percent = parsed.progress.unwrap_or(0);
                if let Some(priority) = parsed.priority {
                    draft.priority = priority;
                }
                if let Some(order) = parsed.order {
                    draft.order = order;
                }
                draft.start_date = parsed.start;
                draft.end_date = parsed.end;
                draft.status_id = parsed.status.unwrap_or_default();
                draft.stage_type_id = parsed.stage_type.unwrap_or_default();
            }
            submit_and_render(&mut dialog, &mut list, &refs);
        }
        StageCommands::Modify { stage_id, .. } => {
            let stage = find_stage(&list, &stage_id);
            dialog.open_edit(stage);
            if let Some(patch) = dialog.patch_mut() {
                patch.title = title;
                patch.description = parsed.description;
                patch.progress_percent = parsed.progress;
                patch.priority = parsed.priority;
                patch.order = parsed.order;
                patch.start_date = parsed.start;
                patch.end_date = parsed.end;
                patch.status_id = parsed.status;
                patch.stage_type_id = parsed.stage_type;
                if patch.is_empty() {
                    user_error("Nothing to modify. Give at least one field to change.");
                }
            }
            submit_and_render(&mut dialog, &mut list, &refs);
        }
        StageCommands::Delete { stage_id } => {
            let stage = find_stage(&list, &stage_id);
            dialog.open_delete(stage);
            submit_and_render(&mut dialog, &mut list, &refs);
        }
        StageCommands::Up { stage_id } => move_and_render(&mut list, &refs, &stage_id, Direction::Earlier),
        StageCommands::Down { stage_id } => move_and_render(&mut list, &refs, &stage_id, Direction::Later),
    }

    Ok(())
}

fn find_stage(list: &Screen<'_>, stage_id: &str) -> Stage {
    match list.get(stage_id) {
        Some(stage) => stage.clone(),
        None => user_error(&format!("Stage '{}' not found in project '{}'", stage_id, list.project_id())),
    }
}

fn render(list: &Screen<'_>, refs: &ReferenceData) {
    let view: Vec<&Stage> = list.stages().iter().collect();
    println!("{}", format_stage_table(&view, refs, get_terminal_width(), is_tty()).trim_end());
}

fn submit_and_render(dialog: &mut Dialog, list: &mut Screen<'_>, refs: &ReferenceData) {
    let outcome = dialog.submit(list);
    exit_on_failure(&outcome);
    if outcome == Outcome::Applied {
        render(list, refs);
    }
}

fn move_and_render(list: &mut Screen<'_>, refs: &ReferenceData, stage_id: &str, direction: Direction) {
    let stage = find_stage(list, stage_id);
    let outcome = list.move_stage(stage_id, direction);
    match outcome {
        Outcome::NoOp => {
            let edge = match direction {
                Direction::Earlier => "first",
                Direction::Later => "last",
            };
            println!("Stage '{}' is already {}.", stage.title, edge);
        }
        Outcome::Applied => render(list, refs),
        _ => {
            render(list, refs);
            exit_on_failure(&outcome);
        }
    }
}
