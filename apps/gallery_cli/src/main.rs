use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use gallery_core::{
    ConfirmationPrompt, DeleteOutcome, DirectoryTemplateSource, DurableSnippetStore,
    FixedHostEnvironment, GalleryController, GalleryOptions, GalleryServices, ImportOutcome,
    StorageFlagStore, TemplateFetchOutcome, TemplateImport, TracingUsageSignal,
};
use shared::domain::{SnippetId, SnippetMeta, TemplateId};
use storage::Storage;
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::{load_settings, normalize_database_url};
use console::{AssumeYes, ConsoleNavigator, ConsoleNotifier, StdinConfirmation};

#[derive(Parser, Debug)]
#[command(name = "snippet-gallery", about = "Browse, create and import code snippets")]
struct Cli {
    #[arg(long, default_value = "gallery.toml")]
    config: PathBuf,
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long)]
    template_dir: Option<PathBuf>,
    /// Answer yes to every confirmation prompt.
    #[arg(long, short = 'y')]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Templates,
    New,
    Open { id: String },
    Run { id: String },
    Delete { id: String },
    DeleteAll,
    Import { name: String, external_id: String },
    DismissOnboarding,
    Title,
    ImportScreen,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config)?;
    if let Some(database_url) = cli.database_url {
        settings.database_url = database_url;
    }
    if let Some(template_dir) = cli.template_dir {
        settings.template_dir = template_dir;
    }

    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url)
        .await
        .with_context(|| format!("failed to open snippet database '{database_url}'"))?;

    let templates = Arc::new(DirectoryTemplateSource::new(&settings.template_dir));
    let confirmer: Arc<dyn ConfirmationPrompt> = if cli.yes {
        Arc::new(AssumeYes)
    } else {
        Arc::new(StdinConfirmation)
    };
    let store = Arc::new(
        DurableSnippetStore::open(storage.clone(), templates.clone(), confirmer).await?,
    );
    let notifier = Arc::new(ConsoleNotifier::default());

    let controller = GalleryController::new(
        GalleryServices {
            store,
            templates,
            navigator: Arc::new(ConsoleNavigator),
            notifier: notifier.clone(),
            usage: Arc::new(TracingUsageSignal),
            flags: Arc::new(StorageFlagStore::new(storage)),
            host: Arc::new(FixedHostEnvironment::new(settings.host_context())),
        },
        GalleryOptions {
            link: settings.import_link.clone(),
        },
    );

    let Some(template_fetch) = controller.activate().await else {
        bail!("host context is not available");
    };

    match cli.command {
        Command::List => print_local_gallery(&controller),
        Command::Templates => match template_fetch.await? {
            TemplateFetchOutcome::Loaded => print_template_gallery(&controller),
            TemplateFetchOutcome::Failed(message) => {
                eprintln!("template gallery unavailable: {message}");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::New => {
            controller.select(None).await?;
        }
        Command::Open { id } => {
            let snippet = find_local(&controller, &id)?;
            controller.select(Some(&snippet)).await?;
        }
        Command::Run { id } => {
            let snippet = find_local(&controller, &id)?;
            controller.run(&snippet);
        }
        Command::Delete { id } => {
            let snippet = find_local(&controller, &id)?;
            if controller.delete_one(&snippet).await == DeleteOutcome::Failed {
                return Ok(ExitCode::FAILURE);
            }
            print_local_gallery(&controller);
        }
        Command::DeleteAll => {
            if controller.delete_all().await == DeleteOutcome::Failed {
                return Ok(ExitCode::FAILURE);
            }
            print_local_gallery(&controller);
        }
        Command::Import { name, external_id } => {
            let request = TemplateImport {
                name,
                external_id: TemplateId::from(external_id),
            };
            if controller.import_from_template(request).await == ImportOutcome::Failed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::DismissOnboarding => controller.dismiss_onboarding().await,
        Command::Title => println!("{}", controller.title()),
        Command::ImportScreen => controller.navigate_to_import(),
    }

    if notifier.shown() > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn find_local(controller: &GalleryController, id: &str) -> Result<SnippetMeta> {
    controller
        .view()
        .local_gallery
        .find(&SnippetId::from(id))
        .cloned()
        .ok_or_else(|| anyhow!("no local snippet with id {id}"))
}

fn print_local_gallery(controller: &GalleryController) {
    let view = controller.view();
    let title = controller.title();
    if !title.is_empty() {
        println!("{title}");
    }
    if view.show_onboarding {
        println!("Your snippets are stored on this device. Run `dismiss-onboarding` to hide this notice.");
    }
    if view.local_gallery.is_empty() {
        println!("No local snippets.");
    }
    for meta in view.local_gallery.entries() {
        println!(
            "{}  {}  {}",
            meta.id,
            meta.name,
            meta.modified_at.format("%Y-%m-%d %H:%M")
        );
    }
    if let Some(link) = &view.link {
        println!("Import: {link}");
    }
}

fn print_template_gallery(controller: &GalleryController) {
    let view = controller.view();
    let Some(gallery) = view.template_gallery else {
        return;
    };
    for category in &gallery.categories {
        println!("{}", category.name);
        for entry in &category.items {
            match &entry.description {
                Some(description) => {
                    println!("  {}  {}  {}", entry.external_id, entry.name, description)
                }
                None => println!("  {}  {}", entry.external_id, entry.name),
            }
        }
    }
}
