// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use eframe::egui::{IconData, ViewportBuilder};
use image::{Rgba, RgbaImage};
use vahan_dash::gui;

/// Three rising bars on a dark tile.
fn app_icon() -> IconData {
    const N: u32 = 64;
    let bars = [(10, 26, 34), (28, 44, 20), (46, 62, 6)];
    let img = RgbaImage::from_fn(N, N, |x, y| {
        let on_bar = bars.iter().any(|&(x0, x1, top)| x >= x0 && x < x1 - 4 && y >= top && y < N - 8);
        if on_bar { Rgba([72, 176, 255, 255]) } else { Rgba([28, 32, 40, 255]) }
    });
    let (width, height) = img.dimensions();
    IconData { rgba: img.into_raw(), width, height }
}

fn main() {
    if let Err(e) = vahan_dash::log::init() {
        eprintln!("Warning: log file unavailable: {e}");
    }

    let opts = gui::load_options();
    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("Vahan registrations")
            .with_inner_size(opts.dashboard.window_size())
            .with_icon(app_icon()),
        ..Default::default()
    };

    if let Err(e) = gui::run(options, opts) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
