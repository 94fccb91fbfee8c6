use std::sync::Arc;

use fnplot::app::ChartApp;
use fnplot::net::channel::{BackendChannel, TcpBackend, DEFAULT_ADDR};
use fnplot::state::plot_state::SessionMode;

struct LaunchOptions {
    addr: String,
    mode: SessionMode,
}

fn parse_args() -> LaunchOptions {
    let mut options = LaunchOptions {
        addr: DEFAULT_ADDR.to_string(),
        mode: SessionMode::Interactive,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--addr" => {
                if let Some(addr) = args.next() {
                    options.addr = addr;
                }
            }
            "--presentation" => options.mode = SessionMode::Presentation,
            "--help" | "-h" => {
                println!("usage: fnplot [--addr HOST:PORT] [--presentation]");
                std::process::exit(0);
            }
            other => {
                eprintln!("unknown argument: {other}");
                std::process::exit(2);
            }
        }
    }
    options
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let launch = parse_args();
    let channel: Arc<dyn BackendChannel> = match TcpBackend::connect(&launch.addr) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    let viewport = egui::ViewportBuilder::default()
        .with_title("fnplot")
        .with_inner_size([1100.0, 700.0])
        .with_min_inner_size([700.0, 450.0]);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "fnplot",
        native_options,
        Box::new(move |cc| {
            ChartApp::apply_style(&cc.egui_ctx);
            Ok(Box::new(ChartApp::new(channel, launch.mode)))
        }),
    )
}
