use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fourpaws::app::feed::{group_by_type, FIRST_PAGE_CURSOR};
use fourpaws::app::form::FormController;
use fourpaws::app::preview::{kind_of, load_attachment, to_data_url};
use fourpaws::app::registry::{fields_for, is_listed_breed, media_allowance, OTHER_CUSTOM_BREED};
use fourpaws::config::AppConfig;
use fourpaws::domain::draft::PostDraft;
use fourpaws::domain::media::MediaKind;
use fourpaws::domain::post::{EmergencyType, PostType};
use fourpaws::http::AppError;
use fourpaws::ClientState;

#[derive(Debug, Parser)]
#[command(name = "fourpaws", about = "Compose and browse FourPaws community posts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Email a one-time password.
    Login {
        #[arg(long)]
        email: String,
    },
    /// Exchange the emailed OTP for an access token.
    Verify {
        #[arg(long)]
        otp: String,
    },
    Logout,
    /// Show the post types and the fields each one asks for.
    Types,
    /// List pet registration forms, newest first.
    Pets,
    /// List feed posts grouped by type.
    Posts {
        #[arg(long, default_value = FIRST_PAGE_CURSOR)]
        cursor: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    CreatePost(CreatePostArgs),
}

#[derive(Debug, clap::Args)]
struct CreatePostArgs {
    #[arg(long = "type", value_parser = parse_post_type, default_value = "standard")]
    post_type: PostType,
    #[arg(long, default_value = "")]
    content: String,
    #[arg(long)]
    image: Option<PathBuf>,
    #[arg(long)]
    video: Option<PathBuf>,

    #[arg(long = "poll-option")]
    poll_options: Vec<String>,
    #[arg(long)]
    poll_duration: Option<u32>,

    #[arg(long)]
    link_url: Option<String>,

    #[arg(long)]
    campaign_title: Option<String>,
    #[arg(long)]
    campaign_goal: Option<f64>,
    /// RFC 3339 timestamp or YYYY-MM-DD.
    #[arg(long, value_parser = parse_date)]
    deadline: Option<OffsetDateTime>,

    #[arg(long)]
    volunteer_role: Option<String>,
    #[arg(long, value_parser = parse_date)]
    event_date: Option<OffsetDateTime>,
    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    pet_profile_id: Option<String>,
    #[arg(long)]
    pet_name: Option<String>,
    #[arg(long)]
    pet_breed: Option<String>,
    #[arg(long)]
    custom_breed: Option<String>,
    #[arg(long)]
    pet_age: Option<f64>,

    #[arg(long)]
    sponsor_name: Option<String>,
    #[arg(long)]
    ad_link: Option<String>,
    #[arg(long)]
    ad_description: Option<String>,

    #[arg(long, value_parser = parse_emergency_type)]
    emergency_type: Option<EmergencyType>,
    #[arg(long)]
    last_seen: Option<String>,
    #[arg(long)]
    symptoms: Option<String>,
    #[arg(long)]
    contact_phone: Option<String>,
    #[arg(long)]
    critical: bool,
}

fn parse_post_type(value: &str) -> Result<PostType, String> {
    PostType::from_wire(value).ok_or_else(|| {
        let known: Vec<&str> = PostType::ALL.iter().map(|t| t.as_wire()).collect();
        format!("unknown post type {:?} (expected one of {})", value, known.join(", "))
    })
}

fn parse_emergency_type(value: &str) -> Result<EmergencyType, String> {
    EmergencyType::from_wire(value)
        .ok_or_else(|| format!("unknown emergency type {:?}", value))
}

fn parse_date(value: &str) -> Result<OffsetDateTime, String> {
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(parsed);
    }
    let date = Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|err| format!("invalid date {:?}: {}", value, err))?;
    Ok(date.with_time(Time::MIDNIGHT).assume_utc())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    // Needs no API access, so it works before any configuration exists.
    if let Command::Types = cli.command {
        print_types();
        return Ok(());
    }

    let config = AppConfig::from_env()?;
    let state = ClientState::from_config(&config)?;

    match cli.command {
        Command::Login { email } => {
            state.auth.request_otp(&email).await.map_err(report)?;
            println!("OTP sent to {}", email.trim());
        }
        Command::Verify { otp } => {
            state.auth.verify_otp(&otp).await.map_err(report)?;
            println!("Logged in");
        }
        Command::Logout => {
            state.auth.logout().map_err(report)?;
            println!("Logged out");
        }
        Command::Types => print_types(),
        Command::Pets => {
            let pets = state.pets.list_pet_forms().await.map_err(report)?;
            for pet in pets {
                let created = pet
                    .created_at
                    .format(&Rfc3339)
                    .unwrap_or_else(|_| pet.created_at.to_string());
                println!(
                    "{}\t{}\t{} {}\t{}",
                    pet.id, pet.name, pet.species, pet.breed, created
                );
            }
        }
        Command::Posts { cursor, limit } => {
            let limit = limit.unwrap_or(config.feed_page_limit);
            let posts = state.feed.list_posts(&cursor, limit).await.map_err(report)?;
            for group in group_by_type(posts) {
                println!("== {} ({}) ==", group.title, group.posts.len());
                for post in group.posts {
                    println!(
                        "{}\t{}\t{} likes\t{} comments\t{}",
                        post.id,
                        post.author_name,
                        post.likes_count,
                        post.comments_count,
                        post.content
                    );
                }
            }
        }
        Command::CreatePost(args) => create_post(&state, args).await?,
    }

    Ok(())
}

async fn create_post(state: &ClientState, args: CreatePostArgs) -> anyhow::Result<()> {
    let mut form = FormController::new();
    form.set_post_type(args.post_type).map_err(report)?;

    for (kind, path) in [(MediaKind::Image, &args.image), (MediaKind::Video, &args.video)] {
        let Some(path) = path else {
            continue;
        };
        let attachment = load_attachment(path).await?;
        if kind_of(&attachment.content_type).is_some_and(|detected| detected != kind) {
            tracing::warn!(
                path = %path.display(),
                content_type = %attachment.content_type,
                "attachment does not look like a {}",
                kind.label().to_lowercase()
            );
        }
        let ticket = form.attach(kind, attachment.clone()).map_err(report)?;
        let preview = to_data_url(&attachment)
            .await
            .with_context(|| format!("failed to preview {}", path.display()))?;
        form.apply_preview(ticket, preview);
    }

    form.edit(|draft| fill_draft(draft, args)).map_err(report)?;

    let prepared = match form.prepare_submit() {
        Ok(prepared) => prepared,
        Err(err) => {
            for field_error in err.field_errors() {
                eprintln!("{}", field_error);
            }
            return Err(report(err));
        }
    };

    let submission = state
        .posts
        .submit_abortable(prepared.payload, prepared.abort_registration);
    tokio::pin!(submission);
    let result = tokio::select! {
        result = &mut submission => result,
        _ = tokio::signal::ctrl_c() => {
            form.cancel_submit();
            submission.await
        }
    };

    let post = form.finish_submit(result).map_err(report)?;
    println!("{}", serde_json::to_string_pretty(&post)?);
    Ok(())
}

fn fill_draft(draft: &mut PostDraft, args: CreatePostArgs) {
    draft.content = args.content;
    if !args.poll_options.is_empty() {
        draft.poll_options = args.poll_options;
    }
    if args.poll_duration.is_some() {
        draft.poll_duration_hours = args.poll_duration;
    }
    draft.link_url = args.link_url;
    draft.campaign_title = args.campaign_title;
    draft.campaign_goal = args.campaign_goal;
    draft.deadline = args.deadline;
    draft.volunteer_role = args.volunteer_role;
    draft.event_date = args.event_date;
    draft.location = args.location;
    draft.pet_profile_id = args.pet_profile_id;
    draft.pet_name = args.pet_name;
    draft.custom_breed = args.custom_breed;
    draft.pet_breed = match args.pet_breed {
        // Free-text breeds go through the custom slot.
        Some(breed) if breed != OTHER_CUSTOM_BREED && !is_listed_breed(&breed) => {
            draft.custom_breed.get_or_insert(breed);
            Some(OTHER_CUSTOM_BREED.to_string())
        }
        other => other,
    };
    draft.pet_age = args.pet_age;
    draft.sponsor_name = args.sponsor_name;
    draft.ad_link = args.ad_link;
    draft.ad_description = args.ad_description;
    draft.emergency_type = args.emergency_type;
    draft.last_seen = args.last_seen;
    draft.symptoms = args.symptoms;
    draft.contact_phone = args.contact_phone;
    if args.post_type == PostType::Emergency {
        draft.is_critical = Some(args.critical);
    }
}

fn print_types() {
    for post_type in PostType::ALL {
        let allowance = media_allowance(post_type);
        let media = match (allowance.image, allowance.video) {
            (true, true) => "image, video",
            (true, false) => "image",
            (false, true) => "video",
            (false, false) => "none",
        };
        println!("{} ({})", post_type.label(), post_type.as_wire());
        println!("  {}", post_type.description());
        for spec in fields_for(post_type) {
            println!("  {:<16} {}", spec.field, spec.label);
        }
        println!("  media: {}", media);
    }
}

fn report(err: AppError) -> anyhow::Error {
    if err.requires_login() {
        return anyhow!("{} (run `fourpaws login --email <address>`)", err.user_message());
    }
    tracing::debug!(error = ?err, "command failed");
    anyhow!(err.user_message())
}
