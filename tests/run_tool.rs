#![cfg(unix)]

use std::fs;

use whitebox_runner::ToolOutcome;
use whitebox_runner_test_utils::{LineRecorder, StubTool, init_tracing, serial, with_timeout};

const NO_ARGS: &[&str] = &[];

#[tokio::test]
async fn slope_progress_line_reaches_callback() {
    init_tracing();
    let _guard = serial().await;
    let stub = StubTool::new().prints("Progress: 50%").build().unwrap();
    let runner = stub.runner().unwrap();
    let cb = LineRecorder::new();

    let code = with_timeout(runner.run_tool("Slope", NO_ARGS, cb.callback())).await;

    assert_eq!(code, 0);
    assert_eq!(cb.lines(), vec!["Progress: 50%"]);
}

#[tokio::test]
async fn callback_fires_once_per_line_in_order() {
    init_tracing();
    let _guard = serial().await;
    let stub = StubTool::new()
        .prints("Reading data...")
        .prints("")
        .prints("Progress: 10%")
        .prints("Progress: 100%   ")
        .prints("Elapsed Time: 0.1s")
        .build()
        .unwrap();
    let runner = stub.runner().unwrap();
    let cb = LineRecorder::new();

    let code = with_timeout(runner.run_tool("Slope", NO_ARGS, cb.callback())).await;

    assert_eq!(code, 0);
    assert_eq!(
        cb.lines(),
        vec![
            "Reading data...",
            "",
            "Progress: 10%",
            "Progress: 100%",
            "Elapsed Time: 0.1s",
        ]
    );
}

#[tokio::test]
async fn accumulated_lines_keep_trailing_whitespace() {
    init_tracing();
    let _guard = serial().await;
    let stub = StubTool::new().prints("padded   ").build().unwrap();
    let runner = stub.runner().unwrap();
    let cb = LineRecorder::new();

    let invocation = with_timeout(runner.try_run_tool("Slope", NO_ARGS, cb.callback()))
        .await
        .unwrap();

    assert_eq!(invocation.lines, vec!["padded   "]);
    assert_eq!(cb.lines(), vec!["padded"]);
    assert_eq!(invocation.outcome(), ToolOutcome::Success);
}

#[tokio::test]
async fn nonzero_exit_code_is_returned() {
    init_tracing();
    let _guard = serial().await;
    let stub = StubTool::new()
        .prints("Error: missing --dem")
        .exit_code(3)
        .build()
        .unwrap();
    let runner = stub.runner().unwrap();
    let cb = LineRecorder::new();

    let code = with_timeout(runner.run_tool("Slope", NO_ARGS, cb.callback())).await;

    assert_eq!(code, 3);
    assert_eq!(cb.lines(), vec!["Error: missing --dem"]);
}

#[tokio::test]
async fn stderr_is_merged_into_the_line_stream() {
    init_tracing();
    let _guard = serial().await;
    let stub = StubTool::new()
        .prints("to stdout")
        .prints_err("to stderr")
        .build()
        .unwrap();
    let runner = stub.runner().unwrap();
    let cb = LineRecorder::new();

    let invocation = with_timeout(runner.try_run_tool("Slope", NO_ARGS, cb.callback()))
        .await
        .unwrap();

    assert_eq!(invocation.lines, vec!["to stdout", "to stderr"]);
    assert_eq!(cb.lines(), vec!["to stdout", "to stderr"]);
}

#[tokio::test]
async fn interleaved_stdout_and_stderr_keep_emission_order() {
    init_tracing();
    let _guard = serial().await;
    let mut stub = StubTool::new();
    let mut expected = Vec::new();
    for i in 0..20 {
        stub = stub.prints(&format!("out{i}")).prints_err(&format!("err{i}"));
        expected.push(format!("out{i}"));
        expected.push(format!("err{i}"));
    }
    let stub = stub.build().unwrap();
    let runner = stub.runner().unwrap();
    let cb = LineRecorder::new();

    let invocation = with_timeout(runner.try_run_tool("Slope", NO_ARGS, cb.callback()))
        .await
        .unwrap();

    assert_eq!(invocation.exit_code, 0);
    assert_eq!(invocation.lines, expected);
    assert_eq!(cb.lines(), expected);
}

#[tokio::test]
async fn arguments_are_passed_verbatim() {
    init_tracing();
    let _guard = serial().await;
    let stub = StubTool::new().echo_args().build().unwrap();
    let mut runner = stub.runner().unwrap();
    runner.set_working_directory("/data/my dem");
    runner.set_verbose(true);
    let cb = LineRecorder::new();

    let code = with_timeout(runner.run_tool(
        "Slope",
        &["--dem='in put.tif'", "--zfactor=1.0"],
        cb.callback(),
    ))
    .await;

    assert_eq!(code, 0);
    assert_eq!(
        cb.lines(),
        vec![
            "arg:--run=\"Slope\"",
            "arg:--wd=\"/data/my dem\"",
            "arg:--dem='in put.tif'",
            "arg:--zfactor=1.0",
            "arg:-v",
        ]
    );
}

#[tokio::test]
async fn child_runs_in_the_executable_directory() {
    init_tracing();
    let _guard = serial().await;
    let stub = StubTool::new().echo_cwd().build().unwrap();
    let mut runner = stub.runner().unwrap();
    runner.set_working_directory("/somewhere/else");
    let cb = LineRecorder::new();

    let code = with_timeout(runner.run_tool("Slope", NO_ARGS, cb.callback())).await;

    let expected = fs::canonicalize(stub.dir()).unwrap();
    assert_eq!(code, 0);
    assert_eq!(cb.lines(), vec![format!("cwd:{}", expected.display())]);
}
