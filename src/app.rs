use std::collections::BTreeMap;
use std::sync::Arc;

use base64::Engine as _;

use crate::net::channel::BackendChannel;
use crate::net::protocol::{ClientMessage, ErrorText, ServerMessage};
use crate::state::plot_state::{AxisExtrema, PlotData, SessionMode};
use crate::ui::axis_controls::AxisRangeControls;
use crate::ui::chart_panel;
use crate::ui::function_editor::FunctionEditor;
use crate::ui::parameter_slider::SliderDefaults;
use crate::ui::slider_group::ParameterSliderGroup;

pub const DEFAULT_XMIN: f64 = -5.0;
pub const DEFAULT_XMAX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    /// A get_graph_update is in flight. Any arriving update_graph resolves it.
    Pending,
}

/// Screenshot hand-off for presentation sessions: request the viewport
/// capture on one frame, pick the image out of the events on a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageCapture {
    Idle,
    NeedCommand,
    Waiting,
}

/// The root of the client: owns all aggregate UI state, talks to the backend,
/// and renders the chart plus (in interactive sessions) the control column.
pub struct ChartApp {
    channel: Arc<dyn BackendChannel>,
    mode: SessionMode,
    /// Whether the control column is rendered. Starts from the launch mode; a
    /// pushed `interactive` flag can override it.
    controls_visible: bool,
    extrema: AxisExtrema,
    parameters: BTreeMap<String, f64>,
    plot: PlotData,
    /// Latest sampling error; shown under the editor unless a parse error is
    /// already displayed there.
    graph_error: Option<ErrorText>,
    request_state: RequestState,
    axis_controls: AxisRangeControls,
    editor: FunctionEditor,
    sliders: ParameterSliderGroup,
    capture: ImageCapture,
    /// Chart rect from the previous frame, for screenshot cropping.
    chart_rect: Option<egui::Rect>,
}

impl ChartApp {
    pub fn new(channel: Arc<dyn BackendChannel>, mode: SessionMode) -> Self {
        let mut app = Self {
            channel,
            mode,
            controls_visible: mode == SessionMode::Interactive,
            extrema: AxisExtrema::new(DEFAULT_XMIN, DEFAULT_XMAX),
            parameters: BTreeMap::new(),
            plot: PlotData::default(),
            graph_error: None,
            request_state: RequestState::Idle,
            axis_controls: AxisRangeControls::new(DEFAULT_XMIN, DEFAULT_XMAX),
            editor: FunctionEditor::default(),
            sliders: ParameterSliderGroup::new(SliderDefaults::default()),
            capture: ImageCapture::Idle,
            chart_rect: None,
        };
        app.request_graph();
        let code = app.editor.source().to_string();
        app.send(ClientMessage::GetFunctionUpdate { code });
        app
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn extrema(&self) -> &AxisExtrema {
        &self.extrema
    }

    pub fn parameters(&self) -> &BTreeMap<String, f64> {
        &self.parameters
    }

    pub fn plot(&self) -> &PlotData {
        &self.plot
    }

    pub fn sliders(&self) -> &ParameterSliderGroup {
        &self.sliders
    }

    pub fn editor(&self) -> &FunctionEditor {
        &self.editor
    }

    pub fn request_state(&self) -> RequestState {
        self.request_state
    }

    /// Drains every queued backend message. Called once per frame, and
    /// directly by tests.
    pub fn pump_messages(&mut self) {
        loop {
            match self.channel.try_recv() {
                Ok(Some(message)) => self.handle_message(message),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("backend receive failed: {e}");
                    break;
                }
            }
        }
    }

    pub fn handle_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::UpdateFunction { error, params } => {
                if let Some(names) = self.editor.apply_update(error, params) {
                    self.parameters = self.sliders.rebuild(&names);
                    self.request_graph();
                }
            }
            ServerMessage::UpdateGraph {
                labels,
                data,
                error,
                datasets,
                options,
                interactive,
                defaultxmin,
                defaultxmax,
            } => {
                self.plot.apply(labels, data, datasets, options);
                self.graph_error = error;
                self.request_state = RequestState::Idle;
                if let Some(interactive) = interactive {
                    self.controls_visible = interactive;
                }
                if let (Some(xmin), Some(xmax)) = (defaultxmin, defaultxmax) {
                    if xmin < xmax {
                        self.extrema = AxisExtrema::new(xmin, xmax);
                        self.axis_controls = AxisRangeControls::new(xmin, xmax);
                    }
                }
                if self.mode == SessionMode::Presentation {
                    self.send(ClientMessage::GraphUpdated);
                }
            }
            ServerMessage::RequestImageData => {
                self.capture = ImageCapture::NeedCommand;
            }
        }
    }

    pub fn apply_axis_change(&mut self, extrema: AxisExtrema) {
        self.extrema = extrema;
        self.request_graph();
    }

    pub fn apply_parameter_change(&mut self, values: BTreeMap<String, f64>) {
        self.parameters = values;
        self.request_graph();
    }

    pub fn apply_source_change(&mut self, code: String) {
        self.send(ClientMessage::GetFunctionUpdate { code });
    }

    /// The single re-sampling trigger. Responses carry no request id, so the
    /// last update_graph received wins even when a newer request is already in
    /// flight; that matches the backend contract and is left as is.
    pub fn request_graph(&mut self) {
        let message = ClientMessage::GetGraphUpdate {
            xmin: self.extrema.xmin,
            xmax: self.extrema.xmax,
            ymin: self.extrema.ymin,
            ymax: self.extrema.ymax,
            parameters: self.parameters.clone(),
        };
        self.send(message);
        self.request_state = RequestState::Pending;
    }

    fn send(&self, message: ClientMessage) {
        if let Err(e) = self.channel.send(message) {
            tracing::warn!("backend send failed: {e}");
        }
    }

    /// Global style tweaks, applied once from the eframe creation context.
    pub fn apply_style(ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        style
            .text_styles
            .insert(egui::TextStyle::Body, egui::FontId::proportional(15.0));
        style
            .text_styles
            .insert(egui::TextStyle::Monospace, egui::FontId::monospace(13.5));
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        ctx.set_style(style);
    }
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pushes arrive from the reader thread while the UI is idle, so keep
        // polling even without input events.
        ctx.request_repaint_after(std::time::Duration::from_millis(50));

        // ------------------------------------------------------------------
        // 1. Screenshot events from the previous frame
        // ------------------------------------------------------------------
        if self.capture == ImageCapture::Waiting {
            let mut captured: Option<Arc<egui::ColorImage>> = None;
            ctx.input(|i| {
                for event in &i.raw.events {
                    if let egui::Event::Screenshot { image, .. } = event {
                        captured = Some(image.clone());
                    }
                }
            });
            if let Some(image) = captured {
                match encode_image_data(&image, self.chart_rect, ctx.pixels_per_point()) {
                    Some(image_data) => self.send(ClientMessage::SendImageData { image_data }),
                    None => tracing::warn!("could not encode chart image"),
                }
                self.capture = ImageCapture::Idle;
            }
        }

        // ------------------------------------------------------------------
        // 2. Backend messages
        // ------------------------------------------------------------------
        self.pump_messages();
        if self.capture == ImageCapture::NeedCommand {
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            self.capture = ImageCapture::Waiting;
        }

        // ------------------------------------------------------------------
        // 3. Controls column (interactive sessions only)
        // ------------------------------------------------------------------
        if self.controls_visible {
            let mut axis_change = None;
            let mut source_change = None;
            let mut params_change = None;
            egui::SidePanel::left("controls")
                .resizable(true)
                .default_width(340.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.label(egui::RichText::new("Axes").strong());
                        axis_change = self.axis_controls.show(ui);
                        ui.separator();
                        ui.label(egui::RichText::new("Function").strong());
                        source_change = self.editor.show(ui, self.graph_error.as_ref());
                        if !self.sliders.is_empty() {
                            ui.separator();
                            ui.label(egui::RichText::new("Parameters").strong());
                        }
                        params_change = self.sliders.show(ui);
                    });
                });
            if let Some(extrema) = axis_change {
                self.apply_axis_change(extrema);
            }
            if let Some(code) = source_change {
                self.apply_source_change(code);
            }
            if let Some(values) = params_change {
                self.apply_parameter_change(values);
            }
        }

        // ------------------------------------------------------------------
        // 4. Chart
        // ------------------------------------------------------------------
        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = chart_panel::show(ui, &self.plot, &self.extrema);
            self.chart_rect = Some(rect);
        });
    }
}

/// Crops the viewport capture to the chart and packs it as the data URL the
/// controlling process expects.
fn encode_image_data(
    image: &egui::ColorImage,
    crop: Option<egui::Rect>,
    pixels_per_point: f32,
) -> Option<String> {
    let full_w = image.width();
    let full_h = image.height();
    let (rgba, width, height) = if let Some(rect) = crop {
        let x0 = ((rect.left() * pixels_per_point) as usize).min(full_w);
        let y0 = ((rect.top() * pixels_per_point) as usize).min(full_h);
        let x1 = ((rect.right() * pixels_per_point).ceil() as usize).min(full_w);
        let y1 = ((rect.bottom() * pixels_per_point).ceil() as usize).min(full_h);
        let cw = x1.saturating_sub(x0);
        let ch = y1.saturating_sub(y0);
        let mut cropped = Vec::with_capacity(cw * ch * 4);
        for row in y0..y1 {
            for col in x0..x1 {
                let c = image.pixels[row * full_w + col];
                cropped.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
            }
        }
        (cropped, cw, ch)
    } else {
        let rgba: Vec<u8> = image
            .pixels
            .iter()
            .flat_map(|c| [c.r(), c.g(), c.b(), c.a()])
            .collect();
        (rgba, full_w, full_h)
    };
    if width == 0 || height == 0 {
        return None;
    }

    let img = image::RgbaImage::from_raw(width as u32, height as u32, rgba)?;
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .ok()?;
    Some(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    ))
}
