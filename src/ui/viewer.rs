//! Main window: translates keystrokes, toolbar clicks, and image-load
//! completions into navigator calls and layout updates.

use crate::core::image_format;
use crate::core::loader::{self, LoadedImage};
use crate::core::navigator::DirectoryNavigator;
use crate::error::Result;
use crate::registrar;
use crate::settings::{self, Settings, WindowPlacement};
use crate::ui::properties::ImageProperties;
use eframe::egui;
use log::{debug, warn};
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};

pub const APP_TITLE: &str = "Quickview";

/// How the image is laid out in the client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Natural pixel size, centered where it fits, scrolled where it doesn't.
    AutoSize,
    /// Scaled to fill the client area, no scrolling.
    Zoom,
}

pub struct ViewerApp {
    navigator: DirectoryNavigator,
    view_mode: ViewMode,
    texture: Option<egui::TextureHandle>,
    load_rx: Option<Receiver<Result<LoadedImage>>>,
    loading: bool,
    error: Option<String>,
    properties: Option<ImageProperties>,
    show_settings: bool,
    register_status: Option<String>,
    settings: Settings,
    last_normal_bounds: Option<egui::Rect>,
    last_maximized: bool,
    last_minimized: bool,
    pending_minimize: bool,
    placement_saved: bool,
}

impl ViewerApp {
    pub fn new(ctx: &egui::Context, initial: Option<PathBuf>, settings: Settings) -> Self {
        // A minimized start state cannot be expressed on the viewport
        // builder, so it is applied as a command on the first frame.
        let pending_minimize = settings.window.minimized;
        let mut app = Self {
            navigator: DirectoryNavigator::new(),
            view_mode: ViewMode::AutoSize,
            texture: None,
            load_rx: None,
            loading: false,
            error: None,
            properties: None,
            show_settings: false,
            register_status: None,
            settings,
            last_normal_bounds: None,
            last_maximized: false,
            last_minimized: false,
            pending_minimize,
            placement_saved: false,
        };
        if let Some(path) = initial {
            app.open_image(ctx, &path);
        }
        app
    }

    /// Rebuilds the sibling list around `path` and starts loading it.
    fn open_image(&mut self, ctx: &egui::Context, path: &Path) {
        match self.navigator.open(path) {
            Ok(display) => self.request_load(ctx, display),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn step(&mut self, ctx: &egui::Context, delta: isize) {
        match self.navigator.step(delta) {
            Ok(path) => {
                let path = path.to_path_buf();
                self.request_load(ctx, path);
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn request_load(&mut self, ctx: &egui::Context, path: PathBuf) {
        debug!("loading {}", path.display());
        self.loading = true;
        // Replacing the receiver drops the previous channel, so a
        // superseded load can never deliver a stale texture.
        self.load_rx = Some(loader::spawn_load(ctx, path));
    }

    fn poll_load(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.load_rx else { return };
        match rx.try_recv() {
            Ok(Ok(loaded)) => {
                if let Some(name) = loaded.path.file_name() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
                        "{} - {APP_TITLE}",
                        name.to_string_lossy()
                    )));
                }
                self.texture = Some(loaded.texture);
                self.loading = false;
                self.load_rx = None;
            }
            Ok(Err(e)) => {
                self.error = Some(e.to_string());
                self.loading = false;
                self.load_rx = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.loading = false;
                self.load_rx = None;
            }
        }
    }

    fn show_open_dialog(&mut self, ctx: &egui::Context) {
        let (filter_name, extensions) = image_format::dialog_filter();
        if let Some(path) = FileDialog::new()
            .add_filter(filter_name, extensions)
            .pick_file()
        {
            self.open_image(ctx, &path);
        }
    }

    fn show_image_properties(&mut self) {
        match (self.navigator.current_path(), &self.texture) {
            (Some(path), Some(texture)) => {
                let size = texture.size();
                match ImageProperties::from_file(path, (size[0], size[1])) {
                    Ok(props) => self.properties = Some(props),
                    Err(e) => self.error = Some(e.to_string()),
                }
            }
            _ => self.error = Some("No image loaded.".to_string()),
        }
    }

    fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        use egui::{Key, Modifiers};

        if ctx.input_mut(|i| i.consume_key(Modifiers::COMMAND, Key::O)) {
            self.show_open_dialog(ctx);
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::ArrowLeft)) {
            self.step(ctx, -1);
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::ArrowRight)) {
            self.step(ctx, 1);
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Num0)) {
            self.view_mode = ViewMode::Zoom;
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Plus))
            || ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Period))
        {
            self.view_mode = ViewMode::AutoSize;
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::ALT, Key::Enter)) {
            self.show_image_properties();
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::COMMAND, Key::Comma))
            || ctx.input_mut(|i| i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::P))
        {
            self.show_settings = true;
        }
        if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// Remembers the latest normal (non-maximized, non-minimized) bounds and
    /// persists the placement once on the closing transition.
    fn track_window_placement(&mut self, ctx: &egui::Context) {
        let info = ctx.input(|i| i.viewport().clone());
        self.last_maximized = info.maximized.unwrap_or(false);
        self.last_minimized = info.minimized.unwrap_or(false);
        if !self.last_maximized && !self.last_minimized {
            if let Some(rect) = info.outer_rect {
                self.last_normal_bounds = Some(rect);
            }
        }
        if info.close_requested() {
            self.save_placement();
        }
    }

    fn save_placement(&mut self) {
        if self.placement_saved {
            return;
        }
        if let Some(rect) = self.last_normal_bounds {
            self.settings.window = WindowPlacement {
                position: Some((rect.min.x, rect.min.y)),
                size: (rect.width(), rect.height()),
                maximized: self.last_maximized,
                minimized: self.last_minimized,
            };
        } else {
            self.settings.window.maximized = self.last_maximized;
            self.settings.window.minimized = self.last_minimized;
        }
        if let Err(e) = settings::save(&self.settings) {
            warn!("could not save window placement: {e}");
        }
        self.placement_saved = true;
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open").clicked() {
                    self.show_open_dialog(ctx);
                }
                ui.separator();

                let can_step = self.navigator.can_step();
                if ui.add_enabled(can_step, egui::Button::new("< Prev")).clicked() {
                    self.step(ctx, -1);
                }
                if ui.add_enabled(can_step, egui::Button::new("Next >")).clicked() {
                    self.step(ctx, 1);
                }
                ui.separator();

                ui.selectable_value(&mut self.view_mode, ViewMode::AutoSize, "1:1");
                ui.selectable_value(&mut self.view_mode, ViewMode::Zoom, "Fit");
                ui.separator();

                let has_current = self.navigator.current_path().is_some();
                if ui
                    .add_enabled(has_current, egui::Button::new("Show in file manager"))
                    .clicked()
                {
                    if let Some(path) = self.navigator.current_path() {
                        reveal_in_file_browser(path);
                    }
                }
                if ui.button("Properties").clicked() {
                    self.show_image_properties();
                }
                if ui.button("Settings").clicked() {
                    self.show_settings = true;
                }

                self.show_position_indicator(ui);
                if self.loading {
                    ui.separator();
                    ui.spinner();
                }
            });
        });
    }

    fn show_position_indicator(&self, ui: &mut egui::Ui) {
        if let Some(index) = self.navigator.current_index() {
            ui.separator();
            ui.label(format!("{} / {}", index + 1, self.navigator.len()));
            if let Some(name) = self.navigator.current_path().and_then(|p| p.file_name()) {
                ui.label(name.to_string_lossy());
            }
        }
    }

    fn show_main_content(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            match self.texture.clone() {
                Some(texture) => match self.view_mode {
                    ViewMode::AutoSize => render_auto_size(ui, &texture),
                    ViewMode::Zoom => render_zoom(ui, &texture),
                },
                None => self.show_placeholder_text(ui),
            }
        });
    }

    fn show_placeholder_text(&self, ui: &mut egui::Ui) {
        ui.centered_and_justified(|ui| {
            if self.loading {
                ui.label("Loading...");
            } else {
                ui.label("Open an image with Ctrl+O or the Open button");
            }
        });
    }

    fn show_error_dialog(&mut self, ctx: &egui::Context) {
        let Some(message) = self.error.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.error = None;
        }
    }

    fn show_properties_dialog(&mut self, ctx: &egui::Context) {
        let Some(props) = self.properties.clone() else {
            return;
        };
        let mut open = true;
        egui::Window::new(format!("{} Properties", props.file_name))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(&props.file_name);
                ui.add_space(8.0);
                ui.label(format!("Created: {}", props.created));
                ui.label(format!("Size: {} KB", props.size_kb));
                ui.label(format!("Dimensions: {}x{}", props.width, props.height));
            });
        if !open {
            self.properties = None;
        }
    }

    fn show_settings_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let mut open = true;
        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Open images of all supported types with Quickview:");
                ui.add_space(8.0);
                if ui.button("Register as default viewer").clicked() {
                    self.register_status = match registrar::register_default_viewer() {
                        Ok(()) => Some("Registered as the default image viewer.".to_string()),
                        Err(e) => Some(e.to_string()),
                    };
                }
                if let Some(status) = &self.register_status {
                    ui.add_space(8.0);
                    ui.label(status);
                }
            });
        if !open {
            self.show_settings = false;
            self.register_status = None;
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.pending_minimize {
            ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
            self.pending_minimize = false;
        }

        self.poll_load(ctx);
        self.handle_keyboard_input(ctx);
        self.track_window_placement(ctx);

        self.show_toolbar(ctx);
        self.show_main_content(ctx);

        self.show_error_dialog(ctx);
        self.show_properties_dialog(ctx);
        self.show_settings_dialog(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Fallback for close paths that never report close_requested.
        self.save_placement();
    }
}

/// Natural size, centered on each axis where the image is smaller than the
/// client area, pinned top/left with scrolling where it is larger.
fn render_auto_size(ui: &mut egui::Ui, texture: &egui::TextureHandle) {
    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let available = ui.available_size();
            let image_size = texture.size_vec2();
            let pad = ((available - image_size) * 0.5).max(egui::Vec2::ZERO);
            ui.vertical(|ui| {
                ui.add_space(pad.y);
                ui.horizontal(|ui| {
                    ui.add_space(pad.x);
                    ui.add(egui::Image::from_texture(texture).fit_to_exact_size(image_size));
                });
            });
        });
}

/// Scaled to fill the whole client area, no scrolling.
fn render_zoom(ui: &mut egui::Ui, texture: &egui::TextureHandle) {
    ui.centered_and_justified(|ui| {
        ui.add(egui::Image::from_texture(texture).fit_to_exact_size(ui.available_size()));
    });
}

/// Opens the OS file browser with the given file selected (or, where the
/// browser has no select flag, its containing directory).
fn reveal_in_file_browser(path: &Path) {
    use std::process::Command;

    #[cfg(windows)]
    let spawned = Command::new("explorer.exe")
        .arg(format!("/select,{}", path.display()))
        .spawn();
    #[cfg(target_os = "macos")]
    let spawned = Command::new("open").arg("-R").arg(path).spawn();
    #[cfg(all(unix, not(target_os = "macos")))]
    let spawned = Command::new("xdg-open")
        .arg(path.parent().unwrap_or(Path::new("/")))
        .spawn();

    if let Err(e) = spawned {
        warn!("could not open file browser: {e}");
    }
}
