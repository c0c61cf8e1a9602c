//! Main egui application: composes all panels and drives the assistant runtime.

use std::rc::Rc;

use egui::{self, Align, CentralPanel, Layout, RichText, SidePanel, TopBottomPanel};

use bugrocket_core::archive::Archive;
use bugrocket_core::clock::SystemClock;
use bugrocket_core::event_bus::EventBus;
use bugrocket_core::ports::StoragePort;
use bugrocket_core::runtime::AssistantRuntime;
use bugrocket_platform::image::ImageClient;
use bugrocket_platform::llm::HttpCompletionClient;
use bugrocket_platform::storage::auto_detect_storage;
use bugrocket_types::config::AppConfig;
use bugrocket_types::message::Attachment;
use bugrocket_types::persona::Persona;
use bugrocket_ui::panels::chat::ChatAction;
use bugrocket_ui::panels::history::HistoryAction;
use bugrocket_ui::panels::settings::{SaveFeedback, SettingsAction};
use bugrocket_ui::panels::{chat, code, history, image, settings};
use bugrocket_ui::state::UiState;
use bugrocket_ui::theme;

use crate::settings::save_config;

/// Everything the user asked for during one frame
#[derive(Default)]
struct FrameActions {
    chat: Option<ChatAction>,
    history: Option<HistoryAction>,
    persona: Option<Persona>,
    new_session: bool,
    copy: Option<String>,
    image: Option<String>,
    save_settings: bool,
}

/// The main application state
pub struct BugRocketApp {
    ui_state: UiState,
    config: AppConfig,
    settings_store: Rc<dyn StoragePort>,
    runtime: Rc<AssistantRuntime>,
    save_feedback: Option<SaveFeedback>,
    themed_for: Option<Persona>,
}

impl BugRocketApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        settings_store: Rc<dyn StoragePort>,
    ) -> Self {
        let storage = auto_detect_storage(&config.storage.backend);
        let archive = Archive::new(storage, config.archive_key.clone());
        let runtime = Rc::new(AssistantRuntime::new(
            archive,
            Rc::new(HttpCompletionClient::new(config.chat_url())),
            Rc::new(ImageClient::new(config.image_url())),
            Rc::new(SystemClock),
            EventBus::new(),
        ));

        Self::load_archive(runtime.clone(), cc.egui_ctx.clone());

        Self {
            ui_state: UiState::new(),
            config,
            settings_store,
            runtime,
            save_feedback: None,
            themed_for: None,
        }
    }

    /// Read the archive once at startup (async)
    fn load_archive(runtime: Rc<AssistantRuntime>, ctx: egui::Context) {
        wasm_bindgen_futures::spawn_local(async move {
            runtime.load_archive().await;
            ctx.request_repaint();
        });
    }

    /// Point the adapters at the (possibly changed) server endpoints.
    fn rebuild_clients(&self) {
        self.runtime
            .set_llm(Rc::new(HttpCompletionClient::new(self.config.chat_url())));
        self.runtime
            .set_images(Rc::new(ImageClient::new(self.config.image_url())));
    }

    /// Stage image files dropped onto the window
    fn stage_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            match &file.bytes {
                Some(bytes) => self.ui_state.stage_file(&file.name, &file.mime, bytes),
                None => log::warn!("Dropped file {} has no contents", file.name),
            }
        }
    }

    fn any_thread_busy(&self) -> bool {
        let session = self.runtime.session();
        Persona::all().iter().any(|p| session.thread(*p).is_busy())
    }
}

impl eframe::App for BugRocketApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let persona = self.runtime.session().active_persona();
        if self.themed_for != Some(persona) {
            theme::apply_theme(ctx, persona);
            self.themed_for = Some(persona);
        }

        self.ui_state.tick(ctx.input(|i| i.stable_dt));
        self.stage_dropped_files(ctx);

        // Drain events from the assistant runtime
        let events = self.runtime.event_bus().drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }

        if self.any_thread_busy() || self.ui_state.image_pending || self.ui_state.copied_for > 0.0 {
            ctx.request_repaint();
        }

        let mut actions = FrameActions::default();

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("☰").clicked() {
                    self.ui_state.show_sidebar = !self.ui_state.show_sidebar;
                }
                let title = ui.add(
                    egui::Label::new(
                        RichText::new("🚀 BugRocket")
                            .strong()
                            .color(theme::accent(persona))
                            .size(16.0),
                    )
                    .sense(egui::Sense::click()),
                );
                if title.clicked() {
                    actions.new_session = true;
                }
                ui.separator();

                for p in Persona::all() {
                    let label = RichText::new(p.as_str().to_uppercase()).strong();
                    if ui.selectable_label(persona == *p, label).clicked() && persona != *p {
                        actions.persona = Some(*p);
                    }
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("➕ New").clicked() {
                        actions.new_session = true;
                    }
                    if ui
                        .selectable_label(self.ui_state.show_settings, "Settings")
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                    }
                    ui.label(
                        RichText::new(&self.ui_state.status_text)
                            .color(theme::TEXT_SECONDARY)
                            .small(),
                    );
                });
            });
        });

        // ── History sidebar ──────────────────────────────────
        if self.ui_state.show_sidebar {
            SidePanel::left("history_panel")
                .resizable(true)
                .default_width(240.0)
                .show(ctx, |ui| {
                    let active_id = self.runtime.session().id().to_string();
                    actions.history = history::history_panel(
                        ui,
                        &mut self.ui_state,
                        self.runtime.archive(),
                        &active_id,
                    );
                    ui.add_space(12.0);
                    actions.image = image::image_panel(ui, &mut self.ui_state);
                });
        }

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    match settings::settings_panel(ui, &mut self.config, self.save_feedback.as_ref()) {
                        SettingsAction::SaveClicked => actions.save_settings = true,
                        SettingsAction::Changed => self.save_feedback = None,
                        SettingsAction::None => {}
                    }
                });
        }

        // ── Active code ──────────────────────────────────────
        SidePanel::right("code_panel")
            .resizable(true)
            .default_width(480.0)
            .show(ctx, |ui| {
                let session = self.runtime.session();
                actions.copy = code::code_panel(ui, &mut self.ui_state, &session);
            });

        // ── Chat ─────────────────────────────────────────────
        CentralPanel::default().show(ctx, |ui| {
            let session = self.runtime.session();
            actions.chat = chat::chat_panel(ui, &mut self.ui_state, &session);
        });

        self.apply(actions, ctx);
    }
}

impl BugRocketApp {
    fn apply(&mut self, actions: FrameActions, ctx: &egui::Context) {
        if let Some(content) = actions.copy {
            ctx.copy_text(content);
        }

        match actions.chat {
            Some(ChatAction::Submit { text, attachments }) => {
                self.dispatch_message(text, attachments, ctx);
            }
            Some(ChatAction::Copy(body)) => ctx.copy_text(body),
            None => {}
        }

        if let Some(persona) = actions.persona {
            if self.runtime.switch_persona(persona) {
                log::info!("Switched to {}", persona);
                self.spawn(ctx, |runtime| async move { runtime.sync_archive().await });
            }
        }

        if actions.new_session {
            self.runtime.new_session();
            self.ui_state.reset_for(Persona::Chat);
        }

        match actions.history {
            Some(HistoryAction::Load(id)) => {
                if self.runtime.load_entry(&id) {
                    let persona = self.runtime.session().active_persona();
                    self.ui_state.reset_for(persona);
                }
            }
            Some(HistoryAction::Delete(id)) => {
                self.spawn(ctx, |runtime| async move { runtime.delete_entry(&id).await });
            }
            Some(HistoryAction::Clear) => {
                self.spawn(ctx, |runtime| async move { runtime.clear_archive().await });
            }
            None => {}
        }

        if let Some(prompt) = actions.image {
            self.spawn(ctx, |runtime| async move {
                if let Err(e) = runtime.generate_image(&prompt).await {
                    log::warn!("Image request rejected: {}", e);
                }
            });
        }

        if actions.save_settings {
            self.save_settings(ctx);
        }
    }

    /// Dispatch a user message to the active persona (async)
    fn dispatch_message(&self, text: String, attachments: Vec<Attachment>, ctx: &egui::Context) {
        self.spawn(ctx, |runtime| async move {
            if let Err(e) = runtime.submit(text, attachments).await {
                log::warn!("Submission ended with error: {}", e);
            }
        });
    }

    fn save_settings(&mut self, ctx: &egui::Context) {
        self.rebuild_clients();
        self.save_feedback = Some(SaveFeedback {
            message: "Saved".to_string(),
            success: true,
        });

        let store = self.settings_store.clone();
        let config = self.config.clone();
        let event_bus = self.runtime.event_bus().clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = save_config(store.as_ref(), &config).await {
                log::warn!("Config could not be saved: {}", e);
                event_bus.emit(bugrocket_types::event::SessionEvent::ArchiveWarning {
                    message: format!("Settings could not be saved: {}", e),
                });
            }
            ctx.request_repaint();
        });
    }

    /// Run a runtime operation on the event loop and repaint when it ends.
    fn spawn<F, Fut>(&self, ctx: &egui::Context, op: F)
    where
        F: FnOnce(Rc<AssistantRuntime>) -> Fut,
        Fut: std::future::Future<Output = ()> + 'static,
    {
        let fut = op(self.runtime.clone());
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            fut.await;
            ctx.request_repaint();
        });
    }
}
