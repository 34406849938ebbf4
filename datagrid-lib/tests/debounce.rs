//! Timing tests for the debouncer, run on tokio's paused clock.

use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::time::Duration;

use datagrid_lib::debounce::Debouncer;
use tokio::time::{Instant, sleep};

type Log = Arc<Mutex<Vec<(Duration, String)>>>;

/// Subscribes a callback that records each value with the time it arrived.
fn record(debouncer: &Debouncer<String>, start: Instant) -> Log {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    debouncer
        .subscribe(move |value: &String| {
            sink.lock().unwrap().push((start.elapsed(), value.clone()));
        })
        .detach();
    log
}

fn values(log: &Log) -> Vec<String> {
    log.lock().unwrap().iter().map(|(_, v)| v.clone()).collect()
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[tokio::test(start_paused = true)]
async fn test_burst_settles_once_on_last_value() {
    let start = Instant::now();
    let debouncer = Debouncer::new(String::new(), ms(300)).unwrap();
    let log = record(&debouncer, start);

    debouncer.observe("a".into());
    sleep(ms(100)).await;
    debouncer.observe("ab".into());
    sleep(ms(150)).await;
    debouncer.observe("abc".into());

    sleep(ms(299)).await;
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(debouncer.current_stable(), "");

    sleep(ms(2)).await;
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    let (at, value) = &log[0];
    assert_eq!(value, "abc");
    assert!(*at >= ms(550) && *at < ms(551), "settled at {at:?}");
    assert_eq!(debouncer.current_stable(), "abc");
}

#[tokio::test(start_paused = true)]
async fn test_spaced_values_each_settle() {
    let start = Instant::now();
    let debouncer = Debouncer::new(String::new(), ms(300)).unwrap();
    let log = record(&debouncer, start);

    debouncer.observe("a".into());
    sleep(ms(400)).await;
    debouncer.observe("b".into());
    sleep(ms(400)).await;

    assert_eq!(values(&log), vec!["a", "b"]);
}

#[tokio::test(start_paused = true)]
async fn test_same_value_restarts_window() {
    let start = Instant::now();
    let debouncer = Debouncer::new(String::new(), ms(300)).unwrap();
    let log = record(&debouncer, start);

    debouncer.observe("x".into());
    sleep(ms(200)).await;
    debouncer.observe("x".into());

    sleep(ms(200)).await;
    assert!(values(&log).is_empty());

    sleep(ms(101)).await;
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert!(log[0].0 >= ms(500));
}

#[tokio::test(start_paused = true)]
async fn test_teardown_cancels_pending() {
    let start = Instant::now();
    let debouncer = Debouncer::new("initial".to_string(), ms(300)).unwrap();
    let log = record(&debouncer, start);

    debouncer.observe("late".into());
    sleep(ms(100)).await;
    debouncer.teardown();

    sleep(ms(1000)).await;
    assert!(values(&log).is_empty());
    assert_eq!(debouncer.current_stable(), "initial");
    assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending() {
    let start = Instant::now();
    let debouncer = Debouncer::new(String::new(), ms(300)).unwrap();
    let log = record(&debouncer, start);

    debouncer.observe("gone".into());
    drop(debouncer);

    sleep(ms(1000)).await;
    assert!(values(&log).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_every_subscriber_notified_once() {
    let start = Instant::now();
    let debouncer = Debouncer::new(String::new(), ms(300)).unwrap();
    let first = record(&debouncer, start);
    let second = record(&debouncer, start);
    assert_eq!(debouncer.subscriber_count(), 2);

    debouncer.observe("q".into());
    debouncer.observe("qu".into());
    sleep(ms(301)).await;

    assert_eq!(values(&first), vec!["qu"]);
    assert_eq!(values(&second), vec!["qu"]);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_from_listener_stops_delivery() {
    let debouncer = Arc::new(Debouncer::new(String::new(), ms(300)).unwrap());

    let owner: Arc<OnceLock<Weak<Debouncer<String>>>> = Arc::new(OnceLock::new());
    let slot = Arc::clone(&owner);
    debouncer
        .subscribe(move |_: &String| {
            if let Some(debouncer) = slot.get().and_then(Weak::upgrade) {
                debouncer.teardown();
            }
        })
        .detach();
    let later = record(&debouncer, Instant::now());
    owner.set(Arc::downgrade(&debouncer)).unwrap();

    debouncer.observe("x".into());
    sleep(ms(301)).await;
    assert!(debouncer.is_torn_down());
    assert!(values(&later).is_empty());

    debouncer.observe("y".into());
    debouncer.flush();
    sleep(ms(301)).await;
    assert!(values(&later).is_empty());
}
