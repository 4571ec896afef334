//! End-to-end: local recorder → event bus → bridge → controller.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use recorderlab_core::config::RecorderConfig;
use recorderlab_core::{
    BridgeError, Contract, EventBridge, EventBus, ExceptionCapsule, FlushInterval, LocalRecorder,
    RecorderEngine, RecorderEvent, RecordingController, RecordingStatus, VtSymbol,
};

fn quiet_config() -> RecorderConfig {
    RecorderConfig {
        flush_interval_secs: 60,
        settings_path: None,
    }
}

/// Drain until `done` holds or five seconds pass.
fn drain_until(
    bridge: &mut EventBridge<RecordingController>,
    controller: &mut RecordingController,
    done: impl Fn(&RecordingController) -> bool,
) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(controller) {
        assert!(Instant::now() < deadline, "condition not reached in time");
        bridge.drain(controller).expect("drain failed");
        thread::sleep(Duration::from_millis(5));
    }
}

fn view(recorder: &Arc<LocalRecorder>, bus: &Arc<EventBus>) -> (EventBridge<RecordingController>, RecordingController) {
    let mut bridge = EventBridge::new(Arc::clone(bus));
    RecordingController::wire(&mut bridge);
    let engine: Arc<dyn RecorderEngine> = recorder.clone();
    let controller = RecordingController::new(engine);
    (bridge, controller)
}

#[test]
fn discovered_contract_extends_completion_in_order() {
    let bus = Arc::new(EventBus::new());
    let recorder = Arc::new(LocalRecorder::start(Arc::clone(&bus), &quiet_config()).unwrap());
    recorder.discover_contract(Contract::new("IF2312.CFFEX"));

    let (mut bridge, mut controller) = view(&recorder, &bus);
    assert_eq!(controller.completion_source(), &[VtSymbol::from("IF2312.CFFEX")]);

    recorder.discover_contract(Contract::new("rb2401.SHFE"));
    bridge.drain(&mut controller).unwrap();

    assert_eq!(
        controller.completion_source(),
        &[VtSymbol::from("IF2312.CFFEX"), VtSymbol::from("rb2401.SHFE")]
    );
    recorder.shutdown();
}

#[test]
fn add_then_remove_round_trip_through_the_engine() {
    let bus = Arc::new(EventBus::new());
    let recorder = Arc::new(LocalRecorder::start(Arc::clone(&bus), &quiet_config()).unwrap());
    recorder.discover_contract(Contract::new("rb2401.SHFE"));
    let (mut bridge, mut controller) = view(&recorder, &bus);

    controller.add_bar_recording("rb2401.SHFE");
    controller.add_tick_recording("rb2401.SHFE");
    // Fire-and-forget: nothing rendered until a snapshot is delivered.
    assert!(controller.bar_recordings().is_empty());

    drain_until(&mut bridge, &mut controller, |c| {
        c.bar_recordings() == ["rb2401.SHFE"] && c.tick_recordings() == ["rb2401.SHFE"]
    });

    controller.remove_bar_recording("rb2401.SHFE");
    drain_until(&mut bridge, &mut controller, |c| c.bar_recordings().is_empty());
    assert_eq!(controller.tick_recordings(), ["rb2401.SHFE"]);

    assert!(controller
        .log()
        .iter()
        .any(|line| line.ends_with("\tAdded bar recording: rb2401.SHFE")));
    recorder.shutdown();
}

#[test]
fn rejected_command_surfaces_only_as_log() {
    let bus = Arc::new(EventBus::new());
    let recorder = Arc::new(LocalRecorder::start(Arc::clone(&bus), &quiet_config()).unwrap());
    let (mut bridge, mut controller) = view(&recorder, &bus);

    controller.add_bar_recording("");
    drain_until(&mut bridge, &mut controller, |c| {
        c.log().iter().any(|l| l.ends_with("\tContract not found: "))
    });
    assert!(controller.bar_recordings().is_empty());
    recorder.shutdown();
}

#[test]
fn flush_interval_write_reaches_engine() {
    let bus = Arc::new(EventBus::new());
    let recorder = Arc::new(LocalRecorder::start(Arc::clone(&bus), &quiet_config()).unwrap());
    let (_bridge, mut controller) = view(&recorder, &bus);

    assert_eq!(controller.flush_interval().secs(), 60);
    controller.set_flush_interval(FlushInterval::clamped(7));
    assert_eq!(recorder.flush_interval(), 7);
    recorder.shutdown();
}

#[test]
fn engine_exception_fails_the_drain() {
    let bus = Arc::new(EventBus::new());
    let recorder = Arc::new(LocalRecorder::start(Arc::clone(&bus), &quiet_config()).unwrap());
    let (mut bridge, mut controller) = view(&recorder, &bus);

    let capsule = ExceptionCapsule::new("database locked", "flushing bar buffer");
    bus.publish(RecorderEvent::ExceptionRaised(capsule.clone()));

    let deadline = Instant::now() + Duration::from_secs(5);
    let err = loop {
        match bridge.drain(&mut controller) {
            Err(e) => break e,
            Ok(_) => {
                assert!(Instant::now() < deadline, "exception never delivered");
                thread::sleep(Duration::from_millis(5));
            }
        }
    };
    assert_eq!(err, BridgeError::EngineException(capsule));
    recorder.shutdown();
}

#[test]
fn events_from_another_thread_keep_topic_order() {
    let bus = Arc::new(EventBus::new());
    let mut bridge: EventBridge<(Vec<String>, Vec<RecordingStatus>)> =
        EventBridge::new(Arc::clone(&bus));
    bridge.subscribe(recorderlab_core::Topic::LogLine, |out, ev| {
        if let RecorderEvent::LogLine(msg) = ev {
            out.0.push(msg);
        }
        Ok(())
    });
    bridge.subscribe(recorderlab_core::Topic::StatusUpdate, |out, ev| {
        if let RecorderEvent::StatusUpdate(status) = ev {
            out.1.push(status);
        }
        Ok(())
    });

    const N: usize = 500;
    let producer_bus = Arc::clone(&bus);
    let producer = thread::spawn(move || {
        for i in 0..N {
            producer_bus.publish(RecorderEvent::LogLine(format!("{i}")));
            producer_bus.publish(RecorderEvent::StatusUpdate(RecordingStatus {
                bar: vec![format!("{i}")],
                tick: vec![],
            }));
        }
    });

    let mut out = (Vec::new(), Vec::new());
    let deadline = Instant::now() + Duration::from_secs(10);
    while out.0.len() < N || out.1.len() < N {
        assert!(Instant::now() < deadline, "producer events not all delivered");
        bridge.drain(&mut out).unwrap();
    }
    producer.join().unwrap();

    let logs: Vec<String> = (0..N).map(|i| i.to_string()).collect();
    assert_eq!(out.0, logs);
    let bars: Vec<String> = out.1.iter().map(|s| s.bar[0].clone()).collect();
    assert_eq!(bars, logs);
}

#[test]
fn closing_the_view_unsubscribes_before_teardown() {
    let bus = Arc::new(EventBus::new());
    let recorder = Arc::new(LocalRecorder::start(Arc::clone(&bus), &quiet_config()).unwrap());
    let (mut bridge, _controller) = view(&recorder, &bus);

    recorder.discover_contract(Contract::new("IF2312.CFFEX"));
    bridge.close();

    for topic in recorderlab_core::Topic::ALL {
        assert_eq!(bus.listener_count(topic), 0);
    }
    // Engine keeps publishing into a bus nobody on the view side listens to.
    recorder.discover_contract(Contract::new("rb2401.SHFE"));
    recorder.shutdown();
}
