//! Main application for the Omok GUI

use std::sync::Arc;

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel, Vec2};
use tracing::error;

use super::board_view::{BoardScene, BoardView};
use super::game_state::{GameMode, GameState};
use super::theme::*;
use crate::config::Config;
use crate::engine::MoveSource;
use crate::profile::Difficulty;
use crate::session::SessionRegistry;
use crate::Stone;

/// Main Omok application
pub struct OmokApp {
    state: Option<GameState>,
    board_view: BoardView,
    show_debug: bool,
    show_forbidden: bool,
    advisory_enabled: bool,
    startup_error: Option<String>,
}

impl OmokApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let selector = config.selector();
        let advisory_enabled = selector.has_advisor();
        let registry = Arc::new(SessionRegistry::new(
            config.board_size,
            selector,
            config.profiles.clone(),
        ));

        let (state, startup_error) =
            match GameState::new(registry, GameMode::default(), Difficulty::Beginner) {
                Ok(state) => (Some(state), None),
                Err(e) => {
                    error!(error = %e, "could not start a game");
                    (None, Some(e.to_string()))
                }
            };

        Self {
            state,
            board_view: BoardView::default(),
            show_debug: true,
            show_forbidden: true,
            advisory_enabled,
            startup_error,
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(ctx: &Context, state: &mut GameState, show_debug: &mut bool, show_forbidden: &mut bool) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    if ui.button("New Game (PvE - Black)").clicked() {
                        state.restart(GameMode::PvE { human_color: Stone::Black });
                        ui.close_menu();
                    }
                    if ui.button("New Game (PvE - White)").clicked() {
                        state.restart(GameMode::PvE { human_color: Stone::White });
                        ui.close_menu();
                    }
                    if ui.button("New Game (PvP)").clicked() {
                        state.restart(GameMode::PvP);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Undo").clicked() {
                        state.undo();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Difficulty", |ui| {
                    let current = state.difficulty();
                    for difficulty in [Difficulty::Beginner, Difficulty::Advanced] {
                        let label = if difficulty == Difficulty::Beginner { "Beginner" } else { "Advanced" };
                        if ui.radio(current == difficulty, label).clicked() {
                            state.set_difficulty(difficulty);
                            ui.close_menu();
                        }
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(show_debug, "Debug Panel (D)");
                    ui.checkbox(show_forbidden, "Mark forbidden points (F)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mode_text = match state.mode {
                        GameMode::PvE { human_color } => {
                            format!("PvE ({}) - You: {}", state.difficulty(), human_color)
                        }
                        GameMode::PvP => "PvP - Hotseat".to_string(),
                    };
                    ui.label(mode_text);
                });
            });
        });
    }

    /// Render the side panel with game info and debug
    fn render_side_panel(&mut self, ctx: &Context) {
        let show_debug = self.show_debug;
        let advisory_enabled = self.advisory_enabled;
        let Some(state) = self.state.as_mut() else {
            return;
        };

        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(280.0)
            .frame(Frame::new().fill(egui::Color32::from_rgb(25, 27, 31)))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                Self::render_title_card(ui);
                ui.add_space(12.0);
                Self::render_turn_card(ui, state);
                ui.add_space(10.0);
                Self::render_timer_card(ui, state);
                ui.add_space(10.0);
                Self::render_actions_card(ui, state);

                if show_debug {
                    ui.add_space(10.0);
                    Self::render_debug_card(ui, state, advisory_enabled);
                }

                if state.is_game_over() {
                    ui.add_space(10.0);
                    Self::render_game_over_card(ui, state);
                }

                if let Some(msg) = &state.message {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, msg, egui::Color32::from_rgb(80, 60, 30));
                }
                if let Some(warning) = &state.warning {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, warning, egui::Color32::from_rgb(60, 55, 80));
                }
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(egui::Color32::from_rgb(35, 38, 43))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_title_card(ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("●○").size(20.0).color(egui::Color32::from_rgb(180, 180, 185)));
            ui.add_space(4.0);
            ui.label(RichText::new("OMOK").size(22.0).strong().color(TEXT_PRIMARY));
        });
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("오목 · Renju rules for Black").size(11.0).color(TEXT_MUTED));
        });
    }

    /// Render turn indicator card
    fn render_turn_card(ui: &mut egui::Ui, state: &GameState) {
        Self::card_frame().show(ui, |ui| {
            let is_black = state.current_turn() == Stone::Black;
            let (stone_char, color_name, accent) = if is_black {
                ("●", "BLACK", egui::Color32::from_rgb(70, 70, 75))
            } else {
                ("○", "WHITE", egui::Color32::from_rgb(220, 220, 225))
            };

            ui.horizontal(|ui| {
                let stone_color = if is_black { TEXT_PRIMARY } else { egui::Color32::from_rgb(30, 30, 35) };

                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 22.0, accent);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    stone_char,
                    egui::FontId::proportional(28.0),
                    stone_color,
                );

                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    ui.label(RichText::new(color_name).size(18.0).strong().color(TEXT_PRIMARY));

                    let status = if state.is_ai_thinking() {
                        ("AI thinking...", TIMER_WARNING)
                    } else if state.is_game_over() {
                        ("Game Over", WIN_HIGHLIGHT)
                    } else if state.is_human_turn() {
                        ("Your turn", TIMER_NORMAL)
                    } else {
                        ("Waiting", TEXT_SECONDARY)
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                });
            });
        });
    }

    /// Render timer card
    fn render_timer_card(ui: &mut egui::Ui, state: &GameState) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("TIMER").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            if let Some(elapsed) = state.ai_thinking_elapsed() {
                let secs = elapsed.as_secs_f32();
                let color = if secs < 1.0 {
                    TIMER_NORMAL
                } else if secs < 5.0 {
                    TIMER_WARNING
                } else {
                    TIMER_CRITICAL
                };
                ui.label(RichText::new(format!("{:.2}s", secs)).size(28.0).strong().color(color));
            } else {
                let elapsed = state.move_timer.elapsed();
                ui.label(RichText::new(format!("{:.1}s", elapsed.as_secs_f32())).size(24.0).color(TEXT_PRIMARY));
            }

            if let Some(ai_time) = state.move_timer.ai_thinking_time {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Last AI: {:.3}s", ai_time.as_secs_f32()))
                        .size(10.0)
                        .color(TEXT_SECONDARY),
                );
            }
        });
    }

    /// Render actions card
    fn render_actions_card(ui: &mut egui::Ui, state: &mut GameState) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ACTIONS").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn_frame = Frame::new()
                    .fill(egui::Color32::from_rgb(50, 53, 58))
                    .corner_radius(CornerRadius::same(6))
                    .inner_margin(8.0);

                btn_frame.show(ui, |ui| {
                    let undo = egui::Label::new(RichText::new("Undo").size(12.0).color(TEXT_PRIMARY));
                    if ui.add(undo.sense(egui::Sense::click())).clicked() {
                        state.undo();
                    }
                });

                ui.add_space(4.0);

                if state.is_human_turn() {
                    btn_frame.show(ui, |ui| {
                        let hint = egui::Label::new(RichText::new("Hint").size(12.0).color(TEXT_PRIMARY));
                        if ui.add(hint.sense(egui::Sense::click())).clicked() {
                            state.request_suggestion();
                        }
                    });
                }
            });

            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("Move #{}", state.view.moves().len()))
                    .size(11.0)
                    .color(TEXT_SECONDARY),
            );
        });
    }

    /// Render debug card
    fn render_debug_card(ui: &mut egui::Ui, state: &GameState, advisory_enabled: bool) {
        Frame::new()
            .fill(egui::Color32::from_rgb(30, 33, 38))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new("AI DEBUG").size(10.0).color(TEXT_MUTED));
                ui.add_space(6.0);

                let advisory = if advisory_enabled { "advisory: on" } else { "advisory: off" };
                ui.label(RichText::new(advisory).size(10.0).color(TEXT_MUTED));

                if let Some(selection) = &state.last_selection {
                    let source_color = match selection.source {
                        MoveSource::Forced(_) => TIMER_WARNING,
                        MoveSource::Heuristic | MoveSource::Blended => TIMER_NORMAL,
                    };
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(selection.source.to_string()).size(11.0).strong().color(source_color));
                            ui.label(RichText::new(format!("Score: {:.0}", selection.score)).size(10.0).color(TEXT_SECONDARY));
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                            ui.label(RichText::new(format!("{}ms", selection.time_ms)).size(10.0).color(TEXT_SECONDARY));
                        });
                    });

                    let col = (b'A' + selection.pos.x) as char;
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(format!("→ {}{}", col, selection.pos.y + 1))
                            .size(12.0)
                            .strong()
                            .color(WIN_HIGHLIGHT),
                    );
                } else {
                    ui.label(RichText::new("Waiting for AI...").size(10.0).color(TEXT_MUTED));
                }
            });
    }

    /// Render game over card
    fn render_game_over_card(ui: &mut egui::Ui, state: &mut GameState) {
        let (headline, symbol, accent) = match state.view.winner() {
            Some(Stone::Black) => ("BLACK WINS!", "●", egui::Color32::from_rgb(70, 70, 75)),
            Some(Stone::White) => ("WHITE WINS!", "○", egui::Color32::from_rgb(220, 220, 225)),
            _ => ("DRAW", "●○", TEXT_SECONDARY),
        };

        Frame::new()
            .fill(egui::Color32::from_rgb(45, 80, 55))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(egui::Color32::from_rgb(180, 255, 180)));
                    ui.add_space(8.0);
                    ui.label(RichText::new(symbol).size(32.0).color(accent));
                    ui.label(RichText::new(headline).size(18.0).strong().color(TEXT_PRIMARY));
                    ui.add_space(12.0);

                    Frame::new()
                        .fill(egui::Color32::from_rgb(60, 100, 70))
                        .corner_radius(CornerRadius::same(6))
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            let button = egui::Label::new(
                                RichText::new("New Game").size(14.0).strong().color(TEXT_PRIMARY),
                            );
                            if ui.add(button.sense(egui::Sense::click())).clicked() {
                                state.reset();
                            }
                        });
                });
            });
    }

    /// Render status message card
    fn render_message_card(ui: &mut egui::Ui, msg: &str, fill: egui::Color32) {
        Frame::new()
            .fill(fill)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("⚠").size(14.0));
                    ui.add_space(4.0);
                    ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
                });
            });
    }

    /// Render the main board
    fn render_board(&mut self, ctx: &Context) {
        let show_forbidden = self.show_forbidden;
        let board_view = &mut self.board_view;
        let Some(state) = self.state.as_mut() else {
            return;
        };

        CentralPanel::default().show(ctx, |ui| {
            ui.style_mut().visuals.panel_fill = egui::Color32::from_rgb(40, 42, 46);

            let winning_line = state.view.winning_line();
            let scene = BoardScene {
                board: state.view.board(),
                current_turn: state.current_turn(),
                last_move: state.view.last_move(),
                suggested_move: state.suggested_move,
                winning_line: winning_line.as_deref(),
                game_over: state.is_game_over(),
                show_forbidden,
            };
            let clicked = board_view.show(ui, &scene);

            if let Some(pos) = clicked {
                if let Err(msg) = state.try_place_stone(pos) {
                    state.message = Some(msg);
                }
            }
        });
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        ctx.input(|i| {
            // D - Toggle debug panel
            if i.key_pressed(egui::Key::D) {
                self.show_debug = !self.show_debug;
            }
            // F - Toggle forbidden marks
            if i.key_pressed(egui::Key::F) {
                self.show_forbidden = !self.show_forbidden;
            }
            // H - Hint
            if i.key_pressed(egui::Key::H) && state.is_human_turn() {
                state.request_suggestion();
            }
            // U - Undo
            if i.key_pressed(egui::Key::U) {
                state.undo();
            }
            // N - New game
            if i.key_pressed(egui::Key::N) {
                state.reset();
            }
        });
    }
}

impl eframe::App for OmokApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if let Some(err) = &self.startup_error {
            CentralPanel::default().show(ctx, |ui| {
                ui.label(RichText::new(format!("Could not start: {err}")).color(TIMER_CRITICAL));
            });
            return;
        }

        self.handle_input(ctx);

        if let Some(state) = self.state.as_mut() {
            state.check_ai_result();
            if state.is_ai_turn() && !state.is_ai_thinking() && !state.is_game_over() {
                state.start_ai_thinking();
            }
            Self::render_menu_bar(ctx, state, &mut self.show_debug, &mut self.show_forbidden);
        }

        self.render_side_panel(ctx);
        self.render_board(ctx);

        if self.state.as_ref().is_some_and(GameState::is_ai_thinking) {
            ctx.request_repaint();
        } else if self.state.is_some() {
            // Keep the move timer ticking
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
