//! End-to-end tests running the capture and selection actors on real threads.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use typeahead::{
    CaptureEvent, Command, CompletionClient, CompletionEngine, ControlSignal, Direction, DisplaySink,
    InjectionPermit, Injector, Key, KeyEvent, LoopbackInjector, PipelineBuilder, PipelineConfig,
    Result,
};

const WORDS: [&str; 6] = ["he", "hello", "help", "helicopter", "held", "helium"];

/// Engine answering from a fixed word list and logging every prefix it is asked.
struct RecordingEngine {
    queries: Arc<Mutex<Vec<String>>>,
}

impl CompletionEngine for RecordingEngine {
    fn set_dictionary(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn get_autocomplete(&self, prefix: &str, k: usize) -> String {
        self.queries.lock().unwrap().push(prefix.to_string());
        WORDS
            .iter()
            .filter(|word| word.starts_with(prefix))
            .take(k)
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Default)]
struct DisplayLog {
    lists: Vec<Vec<String>>,
    highlights: Vec<usize>,
}

struct RecordingDisplay(Arc<Mutex<DisplayLog>>);

impl DisplaySink for RecordingDisplay {
    fn set_suggestions(&mut self, suggestions: &[String]) {
        self.0.lock().unwrap().lists.push(suggestions.to_vec());
    }

    fn set_highlighted(&mut self, index: usize) {
        self.0.lock().unwrap().highlights.push(index);
    }
}

/// Records each injected suffix, then loops the keystrokes back like a hook.
struct RecordingInjector {
    injected: Arc<Mutex<Vec<String>>>,
    loopback: LoopbackInjector,
}

impl Injector for RecordingInjector {
    fn inject(&mut self, permit: &InjectionPermit, text: &str) -> Result<()> {
        self.injected.lock().unwrap().push(text.to_string());
        self.loopback.inject(permit, text)
    }
}

struct Harness {
    pipeline: typeahead::Pipeline,
    queries: Arc<Mutex<Vec<String>>>,
    display: Arc<Mutex<DisplayLog>>,
    injected: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    fn start() -> Self {
        let config = PipelineConfig {
            receive_timeout: Duration::from_millis(50),
            refresh_rate: 100,
            ..PipelineConfig::default()
        };
        let builder = PipelineBuilder::new(config).unwrap();

        let queries = Arc::new(Mutex::new(Vec::new()));
        let display = Arc::new(Mutex::new(DisplayLog::default()));
        let injected = Arc::new(Mutex::new(Vec::new()));

        let client = CompletionClient::ready(RecordingEngine {
            queries: queries.clone(),
        });
        let injector = RecordingInjector {
            injected: injected.clone(),
            loopback: LoopbackInjector::new(builder.event_sender()),
        };
        let pipeline = builder
            .start(client, RecordingDisplay(display.clone()), injector)
            .unwrap();

        Self {
            pipeline,
            queries,
            display,
            injected,
        }
    }

    fn type_str(&self, text: &str) {
        let events = self.pipeline.event_sender();
        for c in text.chars() {
            let key = Key::from(c);
            events.send(CaptureEvent::Key(KeyEvent::press(key.clone()))).unwrap();
            events.send(CaptureEvent::Key(KeyEvent::release(key))).unwrap();
        }
    }

    fn command(&self, command: Command) {
        self.pipeline.command_sender().send(command).unwrap();
    }

    fn last_list(&self) -> Option<Vec<String>> {
        self.display.lock().unwrap().lists.last().cloned()
    }
}

fn wait_for(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(5));
    }
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(ToString::to_string).collect()
}

#[test]
fn test_type_navigate_commit() {
    let harness = Harness::start();
    let hel = strings(&["hello", "help", "helicopter", "held", "helium"]);

    harness.type_str("hel");
    wait_for("the `hel` batch", || harness.last_list() == Some(hel.clone()));
    wait_for("highlight on `hello`", || {
        harness.display.lock().unwrap().highlights.last() == Some(&0)
    });

    harness.command(Command::Navigate(Direction::Next));
    wait_for("highlight on `help`", || {
        harness.display.lock().unwrap().highlights.last() == Some(&1)
    });

    harness.command(Command::Commit);
    wait_for("the display to clear", || harness.last_list() == Some(Vec::new()));
    assert_eq!(*harness.injected.lock().unwrap(), vec!["p".to_string()]);

    harness.pipeline.shutdown();
    harness.pipeline.join();
}

#[test]
fn test_injected_keystrokes_are_not_queried() {
    let harness = Harness::start();

    harness.type_str("hel");
    wait_for("the `hel` batch", || {
        harness.last_list().is_some_and(|list| list.first().map(String::as_str) == Some("hello"))
    });

    harness.command(Command::Commit);
    wait_for("the display to clear", || harness.last_list() == Some(Vec::new()));

    harness.type_str("a");
    wait_for("the `a` query", || harness.queries.lock().unwrap().len() == 4);
    assert_eq!(
        *harness.queries.lock().unwrap(),
        strings(&["h", "he", "hel", "a"])
    );

    harness.pipeline.shutdown();
    harness.pipeline.join();
}

#[test]
fn test_terminator_keys_start_a_new_word() {
    let harness = Harness::start();

    harness.type_str("he");
    harness
        .pipeline
        .event_sender()
        .send(CaptureEvent::Key(KeyEvent::press(Key::Enter)))
        .unwrap();
    harness.type_str("h");

    wait_for("three queries", || harness.queries.lock().unwrap().len() == 3);
    assert_eq!(*harness.queries.lock().unwrap(), strings(&["h", "he", "h"]));

    harness.pipeline.shutdown();
    harness.pipeline.join();
}

#[test]
fn test_exit_key_stops_both_actors() {
    let harness = Harness::start();

    harness
        .pipeline
        .event_sender()
        .send(CaptureEvent::Key(KeyEvent::press(Key::Esc)))
        .unwrap();

    wait_for("the pipeline to finish", || harness.pipeline.is_finished());
    harness.pipeline.join();
}

#[test]
fn test_hotkey_control_stops_both_actors() {
    let harness = Harness::start();
    harness.type_str("he");
    wait_for("a batch", || harness.last_list().is_some());

    harness.command(Command::Control(ControlSignal::Exit));

    wait_for("the pipeline to finish", || harness.pipeline.is_finished());
    harness.pipeline.join();
}

#[test]
fn test_shutdown_joins_cleanly() {
    let harness = Harness::start();
    harness.type_str("he");
    wait_for("a batch", || harness.last_list().is_some());

    harness.pipeline.shutdown();
    harness.pipeline.join();
    assert!(harness.injected.lock().unwrap().is_empty());
}
