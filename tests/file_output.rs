use linkreport::config::PartSelection;
use linkreport::output;
use linkreport::{OutputSink, ReportConfig, ReportError, SharedStream, UrlRecord};
use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Shows sink warnings when run with `RUST_LOG=linkreport=debug`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Collects formatted log lines in memory.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a thread-local subscriber and returns the warnings logged
/// under the `linkreport::check` target.
fn check_warnings(f: impl FnOnce()) -> Vec<String> {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_env_filter(EnvFilter::new("linkreport::check=warn"))
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8(logs.0.lock().clone()).unwrap();
    text.lines()
        .filter(|line| line.contains("WARN linkreport::check:"))
        .map(str::to_string)
        .collect()
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_output_file_created_in_missing_directory() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reports").join("nested").join("out.txt");
    let config = ReportConfig::default()
        .with_encoding("utf-8")
        .with_file(&path);

    let mut renderer = output::create("text", &config).unwrap();
    renderer.start_output().unwrap();
    renderer
        .log_record(&UrlRecord::new("http://example.com/", true), true)
        .unwrap();
    renderer.end_output().unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("`http://example.com/'"));
    assert!(contents.contains("That's it. 1 link checked."));
}

#[test]
fn test_unwritable_output_does_not_abort() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "regular file").unwrap();
    let path = blocker.join("out.csv");
    let config = ReportConfig::default().with_file(&path);

    let mut renderer = output::create("csv", &config).unwrap();
    let warnings = check_warnings(|| {
        renderer.start_output().unwrap();
        renderer
            .log_record(&UrlRecord::new("http://example.com/", false), true)
            .unwrap();
        renderer.end_output().unwrap();
    });

    assert_eq!(renderer.counters().errors, 1);
    assert!(!path.exists());
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].contains("Could not open file"));
}

#[test]
fn test_dead_stream_warns_once() {
    let stream: SharedStream = Arc::new(Mutex::new(BrokenPipe));
    let mut sink = OutputSink::shared(stream);
    let warnings = check_warnings(|| {
        sink.write(b"first");
        sink.write(b"second");
        sink.close();
    });
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].contains("write to output failed"));
}

#[test]
fn test_write_after_close_warns() {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let stream: SharedStream = buffer.clone();
    let mut sink = OutputSink::shared(stream);
    sink.close();
    let warnings = check_warnings(|| sink.write(b"late"));
    assert!(buffer.lock().is_empty());
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].contains("closed file"));
}

#[test]
fn test_silent_session_creates_no_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("never").join("out.none");
    let config = ReportConfig::default().with_file(&path);

    let mut renderer = output::create("none", &config).unwrap();
    renderer.start_output().unwrap();
    renderer
        .log_record(&UrlRecord::new("http://example.com/", true), true)
        .unwrap();
    renderer.end_output().unwrap();

    assert!(!path.exists());
    assert!(!path.parent().unwrap().exists());
}

#[test]
fn test_blacklist_tracks_failures_across_runs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blacklist");
    fs::write(&path, "3 http://old/\n1 http://fixed/\n").unwrap();
    let config = ReportConfig::default().with_file(&path);

    let mut renderer = output::create("blacklist", &config).unwrap();
    renderer.start_output().unwrap();
    renderer
        .log_record(&UrlRecord::new("http://old/", false), false)
        .unwrap();
    renderer
        .log_record(&UrlRecord::new("http://fixed/", true), true)
        .unwrap();
    renderer
        .log_record(&UrlRecord::new("http://new/", false), true)
        .unwrap();
    renderer.end_output().unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "1 http://new/\n4 http://old/\n");
}

#[test]
fn test_blacklist_emptied_when_all_recover() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blacklist");
    fs::write(&path, "2 http://flaky/\n").unwrap();
    let config = ReportConfig::default().with_file(&path);

    let mut renderer = output::create("blacklist", &config).unwrap();
    renderer.start_output().unwrap();
    renderer
        .log_record(&UrlRecord::new("http://flaky/", true), true)
        .unwrap();
    renderer.end_output().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    fs::write(
        &path,
        r#"{"parts": ["url", "warning"], "encoding": "utf-8",
            "csv": {"separator": ","}, "unknown": 1}"#,
    )
    .unwrap();

    let config = ReportConfig::from_file(&path).unwrap();
    assert_eq!(
        config.parts,
        PartSelection::parse(["warning", "url"]).unwrap()
    );
    assert_eq!(config.csv.separator, ',');
    assert_eq!(config.csv.quotechar, '"');
    assert_eq!(config.sql.dbname, "linksdb");
}

#[test]
fn test_config_rejects_unknown_part() {
    let err = ReportConfig::from_json(r#"{"parts": ["url", "bogus"]}"#).unwrap_err();
    assert!(matches!(err, ReportError::Json(_)));
    assert!(err.to_string().contains("bogus"));
}

#[test]
fn test_unknown_format_is_reported() {
    let err = output::create("pdf", &ReportConfig::default()).unwrap_err();
    assert!(matches!(err, ReportError::UnknownFormat(ref name) if name == "pdf"));
}
