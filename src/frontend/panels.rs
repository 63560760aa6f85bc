//! Panel rendering for the plotter frontend
//!
//! Pure presentation: these functions read the app state and emit user
//! actions back into it. While a connection is active the source, port,
//! baud and format controls are rendered disabled so the matcher and source
//! cannot change under the running reader.

use crate::config::BAUD_RATES;
use crate::frontend::{PlotterApp, SourceKind};
use egui::{Color32, RichText, Ui};
use egui_plot::{Corner, Legend, Line, Plot, PlotPoints};

/// Render all panels for one frame.
pub fn render(app: &mut PlotterApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("controls").show(ctx, |ui| {
        controls(app, ui);
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        status_bar(app, ui);
    });

    let mut show_log = app.show_log;
    egui::Window::new("Raw Data Log")
        .open(&mut show_log)
        .default_size([420.0, 260.0])
        .show(ctx, |ui| {
            log_panel(app, ui);
        });
    app.show_log = show_log;

    egui::CentralPanel::default().show(ctx, |ui| {
        plot_panel(app, ui);
    });
}

fn controls(app: &mut PlotterApp, ui: &mut Ui) {
    let locked = app.connection.is_connected();

    ui.add_enabled_ui(!locked, |ui| {
        ui.horizontal(|ui| {
            let selected = app
                .ports
                .get(app.selected_port)
                .cloned()
                .unwrap_or_default();
            egui::ComboBox::from_label("Port")
                .selected_text(selected)
                .width(260.0)
                .show_ui(ui, |ui| {
                    for (i, port) in app.ports.iter().enumerate() {
                        ui.selectable_value(&mut app.selected_port, i, port);
                    }
                });
            if ui.button("Refresh").clicked() {
                app.refresh_ports();
            }

            egui::ComboBox::from_label("Baud Rate")
                .selected_text(app.baud.to_string())
                .show_ui(ui, |ui| {
                    for &baud in BAUD_RATES {
                        ui.selectable_value(&mut app.baud, baud, baud.to_string());
                    }
                });
        });

        ui.horizontal(|ui| {
            ui.label("Script:");
            ui.add(
                egui::TextEdit::singleline(&mut app.script_path)
                    .desired_width(320.0)
                    .hint_text("path to a script to run"),
            );
            if ui.button("Browse…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Python scripts", &["py"])
                    .add_filter("All files", &["*"])
                    .pick_file()
                {
                    app.script_path = path.display().to_string();
                }
            }
        });

        ui.horizontal(|ui| {
            ui.label("Format:");
            ui.add(
                egui::TextEdit::singleline(&mut app.format_input)
                    .desired_width(320.0)
                    .hint_text("Temp: ${temp}, Hum: ${humidity}"),
            );
        });
    });

    ui.horizontal(|ui| {
        match app.active_source {
            Some(SourceKind::Serial) => {
                if ui.button("Disconnect").clicked() {
                    app.stop("Status: Disconnected");
                }
            }
            Some(SourceKind::Script) => {
                if ui.button("Stop Program").clicked() {
                    app.stop("Status: Program stopped");
                }
            }
            None => {
                if ui
                    .add_enabled(app.can_connect(), egui::Button::new("Connect"))
                    .clicked()
                {
                    app.connect_serial();
                }
                if ui
                    .add_enabled(app.can_run(), egui::Button::new("Run Program"))
                    .clicked()
                {
                    app.run_script();
                }
            }
        }

        ui.separator();
        if ui.button("Clear Plot").clicked() {
            app.clear_plot();
        }
        ui.checkbox(&mut app.show_log, "Show Log");
        ui.checkbox(&mut app.autoscroll, "Autoscroll Log");
    });
}

fn plot_panel(app: &PlotterApp, ui: &mut Ui) {
    let plot = Plot::new("live_plot")
        .legend(Legend::default().position(Corner::RightTop).background_alpha(0.8))
        .x_axis_label("Time (s)")
        .y_axis_label("Value");

    plot.show(ui, |plot_ui| {
        let Some(pipeline) = &app.pipeline else {
            return;
        };
        let store = pipeline.store();
        for (i, series) in store.series().iter().enumerate() {
            let points = store.plot_points(i);
            if points.is_empty() {
                continue;
            }
            plot_ui.line(Line::new(series.name(), PlotPoints::from(points)));
        }
    });
}

fn log_panel(app: &mut PlotterApp, ui: &mut Ui) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(app.autoscroll)
        .show(ui, |ui| {
            if let Some(pipeline) = &app.pipeline {
                for entry in pipeline.log().entries() {
                    ui.monospace(entry.to_string());
                }
            } else {
                ui.weak("No data yet.");
            }
            if app.scroll_log_to_bottom {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                app.scroll_log_to_bottom = false;
            }
        });
}

fn status_bar(app: &PlotterApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let color = match app.connection.state() {
            crate::connection::ConnectionState::Connected => Color32::GREEN,
            crate::connection::ConnectionState::Connecting => Color32::YELLOW,
            crate::connection::ConnectionState::Disconnected => Color32::GRAY,
        };
        ui.colored_label(color, "●");
        ui.label(RichText::new(&app.status).small());

        ui.separator();
        if let Some(pipeline) = &app.pipeline {
            ui.label(
                RichText::new(format!(
                    "Samples: {} / {}",
                    pipeline.store().len(),
                    pipeline.store().capacity()
                ))
                .small(),
            );
        }
    });
}
