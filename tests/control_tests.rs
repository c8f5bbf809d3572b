//! Frequency request mailbox tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use rust_sine_dac::{FrequencyRequest, RequestSlot};

#[test]
fn test_request_validation() {
    assert_eq!(FrequencyRequest::new(440.0).map(FrequencyRequest::hz), Some(440.0));
    assert!(FrequencyRequest::new(0.0).unwrap().is_stop());
    assert!(FrequencyRequest::new(-1.0).is_none());
    assert!(FrequencyRequest::new(f32::NAN).is_none());
    assert!(FrequencyRequest::new(f32::INFINITY).is_none());
}

#[test]
fn test_negative_zero_is_stop() {
    let request = FrequencyRequest::new(-0.0).unwrap();
    assert!(request.is_stop());
    assert!(request.hz().is_sign_positive());
}

#[test]
fn test_latest_request_wins() {
    let slot = RequestSlot::new();
    assert!(!slot.post(FrequencyRequest::new(100.0).unwrap()));
    assert!(slot.post(FrequencyRequest::new(200.0).unwrap()));
    assert!(slot.post(FrequencyRequest::STOP));

    assert_eq!(slot.take(), Some(FrequencyRequest::STOP));
    assert_eq!(slot.take(), None);
    assert!(!slot.is_pending());
}

#[test]
fn test_concurrent_post_take_never_duplicates() {
    // Each posted value is taken at most once; the last one is never lost
    let slot = RequestSlot::new();
    let done = AtomicBool::new(false);
    let mut taken = Vec::new();

    thread::scope(|s| {
        s.spawn(|| {
            for hz in 1..=5000u32 {
                slot.post(FrequencyRequest::new(hz as f32).unwrap());
            }
            done.store(true, Ordering::Release);
        });

        loop {
            let finished = done.load(Ordering::Acquire);
            if let Some(request) = slot.take() {
                taken.push(request.hz() as u32);
            } else if finished {
                break;
            }
        }
    });

    assert!(taken.windows(2).all(|w| w[0] < w[1]), "duplicate or reordered take");
    assert_eq!(taken.last(), Some(&5000));
}
