use crate::net::protocol::ErrorText;

/// Seed shown on startup; the backend executes whatever ends up here.
pub const DEFAULT_SOURCE: &str = "def f(x, a, b, c):\n  return a*x*x + b*x + c";

/// The function source editor plus the error panel beneath it. Parsing and
/// parameter extraction happen entirely on the backend; this component only
/// ships the text out and displays what comes back.
pub struct FunctionEditor {
    source: String,
    error: Option<ErrorText>,
}

impl Default for FunctionEditor {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            error: None,
        }
    }
}

impl FunctionEditor {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn error(&self) -> Option<&ErrorText> {
        self.error.as_ref()
    }

    /// Stores the backend's verdict on the last submitted source and hands the
    /// parameter list back to the caller. `None` params mean "no information":
    /// the caller must leave its slider set untouched.
    pub fn apply_update(
        &mut self,
        error: Option<ErrorText>,
        params: Option<Vec<String>>,
    ) -> Option<Vec<String>> {
        self.error = error;
        params
    }

    /// Renders the editor; returns the new source when it changed this frame.
    /// The local parse error wins over the caller-supplied override.
    pub fn show(&mut self, ui: &mut egui::Ui, override_error: Option<&ErrorText>) -> Option<String> {
        let response = ui.add(
            egui::TextEdit::multiline(&mut self.source)
                .code_editor()
                .desired_rows(8)
                .desired_width(f32::INFINITY),
        );
        let changed = response.changed().then(|| self.source.clone());

        if let Some(error) = self.error.as_ref().or(override_error) {
            for line in error.lines() {
                ui.colored_label(ui.visuals().error_fg_color, line);
            }
        }
        changed
    }
}
