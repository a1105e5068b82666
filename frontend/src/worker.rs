use std::{
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread,
};

use anyhow::Context;
use egui::ColorImage;
use log::debug;
use maze::{Effect, Event, Generation};

use crate::backend::Backend;

/// What the workers send back to the UI thread
pub enum Message {
    Event(Event),
    /// Decoded off the UI thread, uploaded as a texture by the app
    Image {
        generation: Generation,
        result: Result<ColorImage, String>,
    },
}

/// Runs effects on short lived threads, one thread per effect
pub struct Worker {
    backend: Arc<dyn Backend>,
    tx: Sender<Message>,
    ctx: egui::Context,
}

impl Worker {
    pub fn new(backend: Arc<dyn Backend>, ctx: egui::Context) -> (Self, Receiver<Message>) {
        let (tx, rx) = mpsc::channel();
        (Self { backend, tx, ctx }, rx)
    }

    pub fn run(&self, effect: Effect) {
        match effect {
            Effect::LoadCatalog => self.spawn("catalog", |backend| {
                Message::Event(Event::CatalogLoaded(
                    backend.list_images().map_err(describe),
                ))
            }),
            Effect::FetchGrid {
                generation,
                image,
                threshold,
            } => self.spawn("grid", move |backend| {
                Message::Event(Event::GridLoaded {
                    generation,
                    result: backend.fetch_grid(&image, threshold).map_err(describe),
                })
            }),
            Effect::FetchImage { generation, image } => self.spawn("image", move |backend| {
                let result = backend
                    .fetch_image(&image)
                    .and_then(|bytes| load_image_from_memory(&bytes).context("failed to decode image"))
                    .map_err(describe);
                Message::Image { generation, result }
            }),
            Effect::Solve { ticket, request } => self.spawn("solve", move |backend| {
                Message::Event(Event::SolveFinished {
                    ticket,
                    result: backend.solve(&request).map_err(describe),
                })
            }),
        }
    }

    fn spawn(&self, name: &str, job: impl FnOnce(&dyn Backend) -> Message + Send + 'static) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();
        let label = name.to_owned();

        thread::Builder::new()
            .name(format!("maze-{name}"))
            .spawn(move || {
                let message = job(backend.as_ref());
                if tx.send(message).is_err() {
                    debug!("dropping {} result, the ui is gone", label);
                    return;
                }
                ctx.request_repaint();
            })
            .expect("failed to spawn worker thread");
    }
}

/// The whole error chain on one line
fn describe(e: anyhow::Error) -> String {
    format!("{e:#}")
}

pub fn load_image_from_memory(image_data: &[u8]) -> Result<ColorImage, image::ImageError> {
    let image = image::load_from_memory(image_data)?;
    let size = [image.width() as _, image.height() as _];
    let image_buffer = image.to_rgba8();
    let pixels = image_buffer.as_flat_samples();
    Ok(ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()))
}
