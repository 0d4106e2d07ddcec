//! Fire-and-forget dispatch from view actions to controller pipelines.

use anyhow::Result;
use tokio::task::JoinHandle;

use super::{commands::GalleryCommand, GalleryController};

/// Spawns the pipeline for `cmd` and returns without waiting for it.
///
/// Only a failed blank-snippet creation surfaces as `Err` on the handle;
/// every other pipeline reports its own failures to the user.
pub fn dispatch(controller: &GalleryController, cmd: GalleryCommand) -> JoinHandle<Result<()>> {
    tracing::debug!(command = cmd.name(), "queued gallery command");

    let controller = controller.clone();
    tokio::spawn(async move {
        match cmd {
            GalleryCommand::DismissOnboarding => controller.dismiss_onboarding().await,
            GalleryCommand::DeleteOne { snippet } => {
                controller.delete_one(&snippet).await;
            }
            GalleryCommand::DeleteAll => {
                controller.delete_all().await;
            }
            GalleryCommand::Run { snippet } => controller.run(&snippet),
            GalleryCommand::Select { snippet } => {
                controller.select(snippet.as_ref()).await?;
            }
            GalleryCommand::ImportFromTemplate(request) => {
                controller.import_from_template(request).await;
            }
            GalleryCommand::NavigateToImport => controller.navigate_to_import(),
            GalleryCommand::ReloadTemplateGallery => {
                controller.load_template_gallery().await;
            }
        }
        Ok(())
    })
}
