use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Backend error payload: a single message or one entry per offending line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorText {
    One(String),
    Many(Vec<String>),
}

impl ErrorText {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            ErrorText::One(text) => vec![text.as_str()],
            ErrorText::Many(texts) => texts.iter().map(String::as_str).collect(),
        }
    }
}

/// One named series in a presentation-mode push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Hex color such as "#0000ff".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default = "default_show_line")]
    pub show_line: bool,
}

fn default_show_line() -> bool {
    true
}

/// Figure-level options attached to a presentation push.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub legend: bool,
}

/// Messages sent to the backend, one JSON object per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    GetFunctionUpdate {
        code: String,
    },
    GetGraphUpdate {
        xmin: f64,
        xmax: f64,
        /// Omitted entirely while the y axis auto-scales.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ymin: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ymax: Option<f64>,
        parameters: BTreeMap<String, f64>,
    },
    /// Acknowledges that a pushed graph update has been applied.
    GraphUpdated,
    SendImageData {
        /// A data:image/png;base64 URL; the controlling process feeds it to urlopen.
        #[serde(rename = "imageData")]
        image_data: String,
    },
}

/// Messages received from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    UpdateFunction {
        #[serde(default)]
        error: Option<ErrorText>,
        /// `None` means "no parameter information"; the client must not touch
        /// its slider set in that case.
        #[serde(default)]
        params: Option<Vec<String>>,
    },
    UpdateGraph {
        #[serde(default)]
        labels: Vec<f64>,
        #[serde(default)]
        data: Vec<f64>,
        #[serde(default)]
        error: Option<ErrorText>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datasets: Option<Vec<Dataset>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<PlotOptions>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        interactive: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        defaultxmin: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        defaultxmax: Option<f64>,
    },
    RequestImageData,
}
