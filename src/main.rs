mod api;
mod auth;
mod config;
mod context;
mod editor;
mod error;
mod models;

use anyhow::{Context, Result};
use api::{HttpClient, LocalFile};
use auth::otp::OtpStatus;
use auth::{OtpVerifier, SignupFlow, SignupForm, SignupOutcome};
use clap::{Args, Parser, Subcommand};
use crate::config::Settings;
use context::{LogNavigator, LogNotifier, Session, StaticSession};
use editor::{EditorServices, ListingEditor, PrimaryAction, UploadMode, WizardStep};
use models::{DetailField, DraftField, MetricField, User, CATEGORIES};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "assethub", version, about = "AssetHub marketplace client")]
struct Cli {
    /// Settings file (defaults to ./assethub.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the selectable listing categories
    Categories,
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Phone number with country code
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Verify an email address with the 6-digit code sent to it
    VerifyOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    /// Walk a listing through the editor and save it
    EditListing(EditArgs),
}

#[derive(Args)]
struct EditArgs {
    /// Listing id
    id: String,
    /// Id of the signed-in user saving the listing
    #[arg(long)]
    user_id: String,
    /// Category id, see `assethub categories`
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<String>,
    /// Image file to use as the thumbnail
    #[arg(long)]
    thumbnail: Option<PathBuf>,
    /// Drop the current thumbnail before uploading
    #[arg(long)]
    clear_thumbnail: bool,
    /// Remove the gallery image at this position (0-based), repeatable
    #[arg(long = "remove-image")]
    remove_images: Vec<usize>,
    /// Gallery image file, repeatable
    #[arg(long = "image")]
    images: Vec<PathBuf>,
    /// Metric as key=value, e.g. monthlyRevenue=1200
    #[arg(long = "metric", value_parser = parse_assignment::<MetricField>)]
    metrics: Vec<(MetricField, String)>,
    /// Detail as key=value, e.g. niche=cooking
    #[arg(long = "detail", value_parser = parse_assignment::<DetailField>)]
    details: Vec<(DetailField, String)>,
}

fn parse_assignment<F>(raw: &str) -> Result<(F, String), String>
where
    F: std::str::FromStr,
    F::Err: std::fmt::Display,
{
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let field = key.parse::<F>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    // Initialize logging
    let level = if cli.verbose { "debug" } else { settings.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🏪 AssetHub client ({})", settings.api_base_url);

    let client = Arc::new(HttpClient::new(&settings)?);

    match cli.command {
        Command::Categories => {
            for category in CATEGORIES.iter() {
                println!("{:<14} {}", category.id, category.label);
            }
        }
        Command::Signup { name, email, phone, password, confirm_password } => {
            let form = SignupForm { name, email, phone, password, confirm_password };
            let flow = SignupFlow::new(client, Arc::new(LogNavigator), Arc::new(LogNotifier));
            match flow.submit(&form).await? {
                SignupOutcome::AwaitingOtp => {
                    println!("Run `assethub verify-otp --email {} --code <code>` next", form.email);
                }
                SignupOutcome::Registered { redirect } => redirect.await?,
            }
        }
        Command::VerifyOtp { email, code } => {
            let mut verifier = OtpVerifier::new(client, Arc::new(LogNavigator));
            if !verifier.is_submit_enabled(&code) {
                anyhow::bail!("The code must be exactly 6 digits");
            }
            let result = verifier.submit_code(&email, &code).await;
            if let Some(message) = verifier.message() {
                println!("{}", message);
            }
            result?;
            if *verifier.status() == OtpStatus::Verified {
                verifier.wait_for_redirect().await;
            }
        }
        Command::EditListing(args) => edit_listing(client, args).await?,
    }

    Ok(())
}

/// Drive the editor step by step with the values given on the command line
async fn edit_listing(client: Arc<HttpClient>, args: EditArgs) -> Result<()> {
    let services = EditorServices {
        listings: client.clone(),
        credentials: client.clone(),
        store: client,
        navigator: Arc::new(LogNavigator),
        notifier: Arc::new(LogNotifier),
    };
    let session = StaticSession::new(Some(User {
        id: args.user_id.clone(),
        name: String::new(),
        email: String::new(),
    }));

    let mut editor = ListingEditor::load(&args.id, services).await?;
    info!("Editing '{}' at step {}", editor.draft().title, editor.step());

    if let Err(e) = walk_steps(&mut editor, args, &session).await {
        // Leave the way the Back control would, one step at a time
        while let Some(step) = editor.retreat() {
            debug!("Back to step {}", step);
        }
        return Err(e);
    }

    let draft = editor.draft();
    println!("Saved listing {}", editor.listing_id());
    println!("   {} ({})", draft.title, draft.category);
    println!("   Price: {}", draft.price);
    println!("   Images: {}", draft.images.len());
    if !draft.thumbnail.is_empty() {
        println!("   Thumbnail: {}", draft.thumbnail);
    }

    session.sign_out().await?;
    Ok(())
}

/// Fill in each step from the command line and submit from the last one
async fn walk_steps(editor: &mut ListingEditor, args: EditArgs, session: &dyn Session) -> Result<()> {
    // Step 1: choosing a category moves on by itself
    match args.category.as_deref() {
        Some(id) => {
            if !editor.select_category(id)? {
                anyhow::bail!("Unknown category '{}', see `assethub categories`", id);
            }
        }
        None => {
            step_forward(editor, session).await?;
        }
    }

    // Step 2
    if let Some(title) = args.title {
        editor.set_field(DraftField::Title, title);
    }
    if let Some(description) = args.description {
        editor.set_field(DraftField::Description, description);
    }
    step_forward(editor, session).await?;

    // Step 3: removals go highest index first so earlier positions hold
    if args.clear_thumbnail {
        editor.remove_thumbnail();
    }
    let mut removals = args.remove_images;
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for index in removals {
        editor.remove_image(index);
    }
    if let Some(path) = &args.thumbnail {
        let file = LocalFile::read(path).await?;
        editor.upload_images(vec![file], UploadMode::Thumbnail).await?;
    }
    if !args.images.is_empty() {
        let mut files = Vec::with_capacity(args.images.len());
        for path in &args.images {
            files.push(LocalFile::read(path).await?);
        }
        editor.upload_images(files, UploadMode::Gallery).await?;
    }
    step_forward(editor, session).await?;

    // Step 4
    for (field, value) in args.metrics {
        editor.set_metric(field, value);
    }
    for (field, value) in args.details {
        editor.set_detail(field, value);
    }
    step_forward(editor, session).await?;

    // Step 5
    if let Some(price) = args.price {
        editor.set_field(DraftField::Price, price);
    }
    let action = editor
        .handle_primary_action(session)
        .await
        .context("Listing was not saved")?;
    debug_assert_eq!(action, PrimaryAction::Submitted);
    Ok(())
}

async fn step_forward(editor: &mut ListingEditor, session: &dyn Session) -> Result<WizardStep> {
    match editor.handle_primary_action(session).await? {
        PrimaryAction::Advanced(step) => {
            info!("Step {}", step);
            Ok(step)
        }
        PrimaryAction::Submitted => anyhow::bail!("Listing submitted before the pricing step"),
    }
}
