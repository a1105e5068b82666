use std::{
    sync::{mpsc::Receiver, Arc},
    time::Instant,
};

use egui::{Color32, Pos2, Rect, Sense, TextureHandle, TextureOptions, Vec2};
use log::debug;
use maze::{
    render::{render, Palette, RenderOptions, Substrate},
    Catalog, Event, ImageState, Point, PointerAction, Session, ViewportMapping,
};
use nalgebra::{Point2, Vector2};

use crate::{
    backend::Backend,
    config::Config,
    painter::{self, color32},
    worker::{Message, Worker},
};

pub struct App {
    session: Session,
    worker: Worker,
    rx: Receiver<Message>,

    /// The photo of the selected image, once decoded
    texture: Option<TextureHandle>,
    options: RenderOptions,
    show_photo: bool,
    /// Slider value, only sent to the session once the slider is let go
    threshold: u8,
    hover: Option<Point>,
}

impl App {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, backend: Arc<dyn Backend>) -> Self {
        let (worker, rx) = Worker::new(backend, cc.egui_ctx.clone());

        let mut app = App {
            session: Session::new(config.session()),
            worker,
            rx,
            texture: None,
            options: RenderOptions::default(),
            show_photo: true,
            threshold: config.threshold,
            hover: None,
        };
        for effect in app.session.start() {
            app.worker.run(effect);
        }
        app
    }

    fn dispatch(&mut self, event: Event) {
        for effect in self.session.update(event, Instant::now()) {
            self.worker.run(effect);
        }
    }

    /// Hands everything the workers sent since the last frame to the session
    fn drain(&mut self, ctx: &egui::Context) {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                Message::Event(event) => self.dispatch(event),
                Message::Image { generation, result } => {
                    if generation != self.session.image_generation() {
                        debug!("dropping stale photo for {:?}", generation);
                        continue;
                    }
                    let result = result.map(|image| {
                        let size = (image.size[0] as u32, image.size[1] as u32);
                        self.texture =
                            Some(ctx.load_texture("maze-photo", image, TextureOptions::LINEAR));
                        size
                    });
                    self.dispatch(Event::ImageLoaded { generation, result });
                }
            }
        }
    }

    fn select(&mut self, image: Option<String>) {
        self.texture = None;
        self.hover = None;
        self.dispatch(Event::ImageSelected(image));
    }

    fn image_picker(&mut self, ui: &mut egui::Ui) {
        let mut choice = self.session.selected().map(str::to_owned);
        let mut reload = false;

        match self.session.catalog() {
            Catalog::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading images...");
                });
            }
            Catalog::Failed(_) => {
                ui.label("Failed to load images");
                reload = ui.button("Retry").clicked();
            }
            Catalog::Ready(images) => {
                egui::ComboBox::from_label("Image")
                    .selected_text(choice.clone().unwrap_or_else(|| "Select an image".into()))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut choice, None, "None");
                        for image in images {
                            ui.selectable_value(&mut choice, Some(image.clone()), image.as_str());
                        }
                    });
            }
        }

        if reload {
            for effect in self.session.start() {
                self.worker.run(effect);
            }
        }
        if choice.as_deref() != self.session.selected() {
            self.select(choice);
        }
    }

    fn side_panel(&mut self, ui: &mut egui::Ui, now: Instant) {
        self.image_picker(ui);

        let slider = ui.add(egui::Slider::new(&mut self.threshold, 0..=255).text("Threshold"));
        if !slider.dragged() && self.threshold != self.session.threshold() {
            self.dispatch(Event::ThresholdChanged(self.threshold));
        }

        let has_photo = matches!(self.session.image(), ImageState::Loaded { .. });
        ui.add_enabled(has_photo, egui::Checkbox::new(&mut self.show_photo, "Show photo"));
        ui.checkbox(&mut self.options.grid_lines, "Draw grid lines");

        if self.session.is_grid_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Extracting grid...");
            });
        } else if let Some(grid) = self.session.grid() {
            ui.label(format!(
                "Grid: {} x {}, {} open cells",
                grid.rows(),
                grid.columns(),
                grid.open_cells()
            ));
        }

        ui.separator();

        let solving = self.session.is_solving();
        let label = if solving {
            "Finding Path..."
        } else {
            "Find Shortest Path"
        };
        if ui
            .add_enabled(!solving, egui::Button::new(label))
            .clicked()
        {
            self.dispatch(Event::SolveRequested);
        }

        ui.horizontal_wrapped(|ui| {
            let clears = [
                ("Reset Path", Event::ClearPath),
                ("Clear Starts", Event::ClearStarts),
                ("Clear Ends", Event::ClearEnds),
                ("Clear All", Event::ClearAll),
            ];
            for (label, event) in clears {
                if ui.button(label).clicked() {
                    self.dispatch(event);
                }
            }
        });

        ui.separator();
        legend(ui, &self.options.palette);

        if let Some(point) = self.hover {
            let kind = match self.session.grid().map(|grid| grid.is_open(point)) {
                Some(true) => "open",
                _ => "wall",
            };
            ui.label(format!("Cell {} ({})", point, kind));
        }

        if let Some(notice) = self.session.notice(now) {
            ui.colored_label(
                color32(self.options.palette.end),
                notice.advisory.to_string(),
            );
        }
    }

    fn maze_view(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());

        let preferred = if self.show_photo && self.texture.is_some() {
            Substrate::Image
        } else {
            Substrate::Grid
        };
        let substrate = self.session.substrate(preferred);

        let viewport = self
            .session
            .content_size(substrate)
            .and_then(|native| ViewportMapping::fit(native, Vector2::new(rect.width(), rect.height())));
        let mapper = viewport.zip(self.session.grid()).and_then(|(viewport, grid)| {
            viewport.mapper(grid.rows(), grid.columns())
        });
        let (Some(viewport), Some(mapper)) = (viewport, mapper) else {
            self.hover = None;
            let hint = if self.session.selected().is_none() {
                "Select an image to start"
            } else {
                "Waiting for the grid..."
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                hint,
                egui::FontId::proportional(16.0),
                ui.visuals().weak_text_color(),
            );
            return;
        };

        let origin = rect.min + Vec2::new(viewport.origin.x, viewport.origin.y);
        let content = Rect::from_min_size(origin, Vec2::new(viewport.display.x, viewport.display.y));

        let local = response
            .hover_pos()
            .and_then(|pos| viewport.to_local(Point2::new(pos.x - rect.min.x, pos.y - rect.min.y)));
        self.hover = local.map(|pos| mapper.to_grid(pos));

        if substrate == Substrate::Image {
            if let Some(texture) = &self.texture {
                ui.painter().image(
                    texture.id(),
                    content,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
        }

        let options = RenderOptions {
            substrate,
            ..self.options
        };
        if let Some(overlay) = self.session.overlay(self.hover) {
            let shapes = render(&overlay, &mapper, &options);
            painter::paint(ui.painter(), origin, &shapes);
        }

        let action = if response.clicked() {
            Some(PointerAction::Primary)
        } else if response.secondary_clicked() {
            Some(PointerAction::Secondary)
        } else {
            None
        };
        if let (Some(action), Some(position)) = (action, local) {
            self.dispatch(Event::Pointer {
                action,
                position,
                display: viewport.display,
            });
        }

        if local.is_some() {
            response.on_hover_cursor(egui::CursorIcon::Crosshair);
        }
    }
}

fn legend(ui: &mut egui::Ui, palette: &Palette) {
    let entries = [
        (palette.start, "Start (left click)"),
        (palette.end, "End (right click)"),
        (palette.path, "Path"),
    ];
    for (color, label) in entries {
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
            ui.painter()
                .circle_filled(rect.center(), 5.0, color32(color));
            ui.label(label);
        });
    }
}

impl eframe::App for App {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain(ctx);

        let now = Instant::now();
        self.dispatch(Event::Tick);
        if let Some(deadline) = self.session.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.add_space(16.0);

                egui::widgets::global_dark_light_mode_buttons(ui);
            });
        });

        egui::SidePanel::left("side_panel").show(ctx, |ui| {
            self.side_panel(ui, now);

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                powered_by_egui_and_eframe(ui);
                egui::warn_if_debug_build(ui);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| self.maze_view(ui));
    }
}

fn powered_by_egui_and_eframe(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        ui.label("Powered by ");
        ui.hyperlink_to("egui", "https://github.com/emilk/egui");
        ui.label(" and ");
        ui.hyperlink_to(
            "eframe",
            "https://github.com/emilk/egui/tree/master/crates/eframe",
        );
        ui.label(".");
    });
}
