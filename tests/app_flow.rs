use std::collections::BTreeMap;
use std::sync::Arc;

use fnplot::app::{ChartApp, RequestState};
use fnplot::net::channel::InProcessBackend;
use fnplot::net::protocol::{ClientMessage, ErrorText, ServerMessage};
use fnplot::state::plot_state::{AxisExtrema, SessionMode};

fn new_app(mode: SessionMode) -> (Arc<InProcessBackend>, ChartApp) {
    let backend = Arc::new(InProcessBackend::new());
    let app = ChartApp::new(backend.clone(), mode);
    (backend, app)
}

fn graph_update(labels: Vec<f64>, data: Vec<f64>) -> ServerMessage {
    ServerMessage::UpdateGraph {
        labels,
        data,
        error: None,
        datasets: None,
        options: None,
        interactive: None,
        defaultxmin: None,
        defaultxmax: None,
    }
}

#[test]
fn startup_requests_a_parse_and_a_sample() {
    let (backend, app) = new_app(SessionMode::Interactive);
    let sent = backend.take_sent();
    assert_eq!(sent.len(), 2);
    match &sent[0] {
        ClientMessage::GetGraphUpdate {
            xmin,
            xmax,
            ymin,
            ymax,
            parameters,
        } => {
            assert_eq!((*xmin, *xmax), (-5.0, 5.0));
            assert_eq!((*ymin, *ymax), (None, None));
            assert!(parameters.is_empty());
        }
        other => panic!("expected an initial graph request, got {other:?}"),
    }
    match &sent[1] {
        ClientMessage::GetFunctionUpdate { code } => assert!(code.starts_with("def f")),
        other => panic!("expected an initial function request, got {other:?}"),
    }
    assert_eq!(app.request_state(), RequestState::Pending);
}

#[test]
fn a_parsed_function_rebuilds_sliders_and_resamples() {
    let (backend, mut app) = new_app(SessionMode::Interactive);
    backend.take_sent();

    backend.push(ServerMessage::UpdateFunction {
        error: None,
        params: Some(vec!["a".into(), "b".into()]),
    });
    app.pump_messages();

    assert_eq!(app.sliders().names(), ["a", "b"]);
    assert_eq!(app.sliders().len(), 2);
    assert!(app.editor().error().is_none());

    let sent = backend.take_sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        ClientMessage::GetGraphUpdate { parameters, .. } => {
            assert_eq!(parameters.len(), 2);
            assert_eq!(parameters["a"], 1.0);
            assert_eq!(parameters["b"], 1.0);
        }
        other => panic!("expected a graph request, got {other:?}"),
    }
}

#[test]
fn a_reparse_discards_earlier_slider_edits() {
    let (backend, mut app) = new_app(SessionMode::Interactive);
    backend.push(ServerMessage::UpdateFunction {
        error: None,
        params: Some(vec!["a".into(), "b".into()]),
    });
    app.pump_messages();
    app.apply_parameter_change(BTreeMap::from([
        ("a".to_string(), 3.0),
        ("b".to_string(), -2.0),
    ]));

    backend.push(ServerMessage::UpdateFunction {
        error: None,
        params: Some(vec!["a".into(), "b".into(), "c".into()]),
    });
    app.pump_messages();

    assert_eq!(app.sliders().names(), ["a", "b", "c"]);
    assert!(app.parameters().values().all(|v| *v == 1.0));
}

#[test]
fn null_params_are_a_no_op() {
    let (backend, mut app) = new_app(SessionMode::Interactive);
    backend.push(ServerMessage::UpdateFunction {
        error: None,
        params: Some(vec!["a".into(), "b".into()]),
    });
    app.pump_messages();
    backend.take_sent();

    backend.push(ServerMessage::UpdateFunction {
        error: None,
        params: None,
    });
    app.pump_messages();

    assert_eq!(app.sliders().names(), ["a", "b"]);
    assert!(backend.take_sent().is_empty());
}

#[test]
fn parse_errors_keep_the_previous_sliders() {
    let (backend, mut app) = new_app(SessionMode::Interactive);
    backend.push(ServerMessage::UpdateFunction {
        error: None,
        params: Some(vec!["a".into()]),
    });
    app.pump_messages();
    backend.take_sent();

    backend.push(ServerMessage::UpdateFunction {
        error: Some(ErrorText::Many(vec![
            "line1 bad".into(),
            "line2 bad".into(),
        ])),
        params: None,
    });
    app.pump_messages();

    assert_eq!(
        app.editor().error().unwrap().lines(),
        ["line1 bad", "line2 bad"]
    );
    assert_eq!(app.sliders().names(), ["a"]);
    assert!(backend.take_sent().is_empty());
}

#[test]
fn graph_updates_resolve_the_pending_request() {
    let (backend, mut app) = new_app(SessionMode::Interactive);
    assert_eq!(app.request_state(), RequestState::Pending);

    backend.push(graph_update(vec![0.0, 1.0], vec![5.0, 6.0]));
    app.pump_messages();

    assert_eq!(app.request_state(), RequestState::Idle);
    assert_eq!(app.plot().points, vec![[0.0, 5.0], [1.0, 6.0]]);
    // Interactive sessions never acknowledge pushes.
    assert!(backend
        .take_sent()
        .iter()
        .all(|m| !matches!(m, ClientMessage::GraphUpdated)));
}

#[test]
fn presentation_sessions_acknowledge_every_push() {
    let (backend, mut app) = new_app(SessionMode::Presentation);
    backend.take_sent();

    backend.push(graph_update(vec![0.0], vec![1.0]));
    app.pump_messages();

    let sent = backend.take_sent();
    assert_eq!(sent, vec![ClientMessage::GraphUpdated]);
}

#[test]
fn pushed_axis_defaults_are_adopted() {
    let (backend, mut app) = new_app(SessionMode::Presentation);
    backend.push(ServerMessage::UpdateGraph {
        labels: vec![],
        data: vec![],
        error: None,
        datasets: None,
        options: None,
        interactive: None,
        defaultxmin: Some(0.0),
        defaultxmax: Some(8.0),
    });
    app.pump_messages();
    assert_eq!((app.extrema().xmin, app.extrema().xmax), (0.0, 8.0));
}

#[test]
fn axis_changes_trigger_exactly_one_merged_request() {
    let (backend, mut app) = new_app(SessionMode::Interactive);
    backend.take_sent();

    let mut extrema = AxisExtrema::new(-1.0, 1.0);
    extrema.ymin = Some(-3.0);
    extrema.ymax = Some(3.0);
    app.apply_axis_change(extrema);

    let sent = backend.take_sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        ClientMessage::GetGraphUpdate {
            xmin,
            xmax,
            ymin,
            ymax,
            ..
        } => {
            assert_eq!((*xmin, *xmax), (-1.0, 1.0));
            assert_eq!((*ymin, *ymax), (Some(-3.0), Some(3.0)));
        }
        other => panic!("expected a graph request, got {other:?}"),
    }
    assert_eq!(app.request_state(), RequestState::Pending);
}

#[test]
fn sampling_errors_ride_along_without_touching_sliders() {
    let (backend, mut app) = new_app(SessionMode::Interactive);
    backend.push(ServerMessage::UpdateFunction {
        error: None,
        params: Some(vec!["a".into()]),
    });
    app.pump_messages();

    backend.push(ServerMessage::UpdateGraph {
        labels: vec![],
        data: vec![],
        error: Some(ErrorText::One("math domain error".into())),
        datasets: None,
        options: None,
        interactive: None,
        defaultxmin: None,
        defaultxmax: None,
    });
    app.pump_messages();

    assert_eq!(app.sliders().names(), ["a"]);
    assert!(app.plot().points.is_empty());
}
