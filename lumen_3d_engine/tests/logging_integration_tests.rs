//! Integration tests for Engine logging system
//!
//! These tests verify the logging system functionality and that engine
//! components report soft failures through the active logger.
//!
//! Run with: cargo test --test logging_integration_tests

use lumen_3d_engine::lumen3d::{Engine, RenderContext, RenderContextConfig};
use lumen_3d_engine::lumen3d::log::{Logger, LogEntry, LogSeverity};
use lumen_3d_engine::lumen3d::device::BufferUsage;
use lumen_3d_engine::lumen3d::device::mock_graphics_device::MockGraphicsDevice;
use lumen_3d_engine::lumen3d::render::VertexBuffer;
use lumen_3d_engine::lumen3d::resource::MemoryResourceProvider;
use lumen_3d_engine::lumen3d::shader::parse_shader;
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Engine::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    Engine::log(LogSeverity::Error, "test::module", "Test error message".to_string());

    let captured_entries = entries.lock().unwrap();
    assert_eq!(captured_entries.len(), 3);

    assert_eq!(captured_entries[0].severity, LogSeverity::Info);
    assert_eq!(captured_entries[0].source, "test::module");
    assert_eq!(captured_entries[0].message, "Test info message");

    assert_eq!(captured_entries[1].severity, LogSeverity::Warn);
    assert_eq!(captured_entries[1].message, "Test warning message");

    assert_eq!(captured_entries[2].severity, LogSeverity::Error);
    assert_eq!(captured_entries[2].message, "Test error message");

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_error_logging_with_location() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log_detailed(
        LogSeverity::Error,
        "test::error",
        "Critical error occurred".to_string(),
        "test_file.rs",
        42,
    );

    let captured_entries = entries.lock().unwrap();
    assert_eq!(captured_entries.len(), 1);

    let entry = &captured_entries[0];
    assert_eq!(entry.severity, LogSeverity::Error);
    assert_eq!(entry.source, "test::error");
    assert_eq!(entry.file, Some("test_file.rs"));
    assert_eq!(entry.line, Some(42));

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "test", "Message 1".to_string());
    assert_eq!(entries.lock().unwrap().len(), 1);

    Engine::reset_logger();

    // Goes to the default logger, not captured
    Engine::log(LogSeverity::Info, "test", "Message 2".to_string());
    assert_eq!(entries.lock().unwrap().len(), 1);
}

// ============================================================================
// COMPONENT DIAGNOSTICS
// ============================================================================

#[test]
#[serial]
fn test_integration_unknown_shader_tag_warns() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let source = parse_shader(
        b"@vertex V\n@define X 1\n@fragment F\n",
        "water.nsh",
        &MemoryResourceProvider::new(),
    );

    Engine::reset_logger();

    assert!(source.is_ok());
    let captured = entries.lock().unwrap();
    let warnings: Vec<_> = captured.iter().filter(|e| e.severity == LogSeverity::Warn).collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("water.nsh"));
}

#[test]
#[serial]
fn test_integration_empty_shader_logs_error() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let source = parse_shader(b"@vertex V\n", "broken.nsh", &MemoryResourceProvider::new());

    Engine::reset_logger();

    assert!(source.is_err());
    assert!(entries.lock().unwrap().iter().any(|e| e.severity == LogSeverity::Error));
}

#[test]
#[serial]
fn test_integration_invalid_vertex_data_warns() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let mut ctx = RenderContext::new(Box::new(MockGraphicsDevice::new()), RenderContextConfig::default());
    let mut vbo = VertexBuffer::new();
    let result = vbo.gen_vertex_data::<[f32; 3]>(&[], BufferUsage::Static, &mut ctx);

    Engine::reset_logger();

    assert!(result.is_err());
    let captured = entries.lock().unwrap();
    assert!(captured.iter().any(|e| e.severity == LogSeverity::Warn && e.source == "lumen3d::VertexBuffer"));
}
