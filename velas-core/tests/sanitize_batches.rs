use velas_core::{FILLER_VOLUME, OhlcvRecord, OhlcvSanitizer, Timeframe};

fn tf(text: &str) -> Timeframe {
    text.parse().unwrap()
}

fn candle(open_time: i64, close: &str) -> OhlcvRecord {
    OhlcvRecord {
        open_time,
        open: close.to_string(),
        high: close.to_string(),
        low: close.to_string(),
        close: close.to_string(),
        volume: "1000".to_string(),
    }
}

#[test]
fn removes_duplicates_across_calls() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));

    let batch1 = vec![candle(1000, "100.5"), candle(1300, "101.0")];
    let batch2 = vec![candle(1300, "101.0"), candle(1600, "102.0")];

    let out1 = sanitizer.sanitize_batch(&batch1);
    assert_eq!(out1.len(), 2);

    let out2 = sanitizer.sanitize_batch(&batch2);
    assert_eq!(out2.len(), 1);
    assert_eq!(out2[0].open_time, 1600);
}

#[test]
fn removes_duplicates_within_a_batch() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));

    let batch = vec![candle(1000, "100"), candle(1000, "999"), candle(1300, "101")];
    let out = sanitizer.sanitize_batch(&batch);

    let times: Vec<i64> = out.iter().map(|r| r.open_time).collect();
    assert_eq!(times, vec![1000, 1300]);
    // Stable sort: the first record of an equal run wins.
    assert_eq!(out[0].close, "100");
}

#[test]
fn fills_gaps_with_flat_candles() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));

    sanitizer.sanitize_batch(&[candle(1000, "100.5")]);
    let out = sanitizer.sanitize_batch(&[candle(1900, "102.5")]);

    let times: Vec<i64> = out.iter().map(|r| r.open_time).collect();
    assert_eq!(times, vec![1300, 1600, 1900]);

    for gap in &out[..2] {
        assert_eq!(gap.open, "100.5");
        assert_eq!(gap.high, "100.5");
        assert_eq!(gap.low, "100.5");
        assert_eq!(gap.close, "100.5");
        assert_eq!(gap.volume, FILLER_VOLUME);
    }

    // The real candle comes through unchanged.
    assert_eq!(out[2], candle(1900, "102.5"));
}

#[test]
fn overlap_then_gap() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));

    sanitizer.sanitize_batch(&[candle(1000, "100"), candle(1300, "100")]);
    let out = sanitizer.sanitize_batch(&[candle(1300, "100"), candle(1900, "100")]);

    // 1300 is dropped as already seen; 1600 is synthesized; 1900 is real.
    let times: Vec<i64> = out.iter().map(|r| r.open_time).collect();
    assert_eq!(times, vec![1600, 1900]);
    assert_eq!(out[0].volume, FILLER_VOLUME);
    assert_eq!(out[1].volume, "1000");
}

#[test]
fn backward_batches_are_deduplicated_but_never_gap_filled() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));

    sanitizer.sanitize_batch(&[candle(2000, "100")]);
    let out = sanitizer.sanitize_batch(&[candle(1700, "100")]);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].open_time, 1700);
    assert_eq!(out[0].volume, "1000");
}

#[test]
fn gap_filling_applies_only_before_the_first_retained_candle() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));

    sanitizer.sanitize_batch(&[candle(1000, "100"), candle(1300, "100")]);
    // 400 extends backward, 1900 extends forward: no filler is produced for
    // either side, because the first retained candle (400) is not a forward
    // extension.
    let out = sanitizer.sanitize_batch(&[candle(400, "99"), candle(1900, "101")]);

    let times: Vec<i64> = out.iter().map(|r| r.open_time).collect();
    assert_eq!(times, vec![400, 1900]);
    assert!(out.iter().all(|r| r.volume == "1000"));
}

#[test]
fn unsorted_input_is_sorted_without_gap_filling_on_first_batch() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));

    let out = sanitizer.sanitize_batch(&[candle(1900, "102"), candle(1000, "100")]);

    let times: Vec<i64> = out.iter().map(|r| r.open_time).collect();
    assert_eq!(times, vec![1000, 1900]);
    assert!(out.iter().all(|r| r.volume == "1000"));
}

#[test]
fn empty_batch_changes_nothing() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));

    assert!(sanitizer.sanitize_batch(&[]).is_empty());
    assert!(sanitizer.last_candle().is_none());

    sanitizer.sanitize_batch(&[candle(1000, "100")]);
    assert!(sanitizer.sanitize_batch(&[]).is_empty());
    assert_eq!(sanitizer.last_candle().unwrap().open_time, 1000);
}

#[test]
fn fully_seen_batch_returns_empty_and_keeps_bounds() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));

    sanitizer.sanitize_batch(&[candle(1000, "100"), candle(1600, "101")]);
    // Everything inside [1000, 1600] is already covered by the seen range.
    let out = sanitizer.sanitize_batch(&[candle(1000, "100"), candle(1300, "x")]);

    assert!(out.is_empty());
    assert_eq!(sanitizer.last_candle().unwrap().open_time, 1600);
}

#[test]
fn caller_batch_is_left_untouched() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));

    let batch = vec![candle(1900, "102"), candle(1000, "100")];
    let before = batch.clone();
    sanitizer.sanitize_batch(&batch);

    assert_eq!(batch, before);
}

#[test]
fn last_candle_is_a_defensive_copy() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));
    sanitizer.sanitize_batch(&[candle(1000, "100.5")]);

    let mut copy = sanitizer.last_candle().unwrap();
    copy.close = "tampered".to_string();
    copy.open_time = -1;

    assert_eq!(sanitizer.last_candle().unwrap(), candle(1000, "100.5"));
}

#[test]
fn reset_restores_brand_new_behavior() {
    let mut sanitizer = OhlcvSanitizer::new(tf("1h"));

    sanitizer.sanitize_batch(&[candle(10_000, "100")]);
    assert!(sanitizer.last_candle().is_some());

    sanitizer.reset();
    assert!(sanitizer.last_candle().is_none());

    // A batch older than the pre-reset range is accepted verbatim, with no
    // dedup against the forgotten history and no gap filling.
    let out = sanitizer.sanitize_batch(&[candle(1000, "50")]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].open_time, 1000);
}

#[test]
fn set_timeframe_resets_state_and_changes_the_gap_step() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));
    sanitizer.sanitize_batch(&[candle(1000, "100")]);

    sanitizer.set_timeframe(tf("1m"));
    assert!(sanitizer.last_candle().is_none());
    assert_eq!(sanitizer.timeframe().period_minutes(), 1);

    sanitizer.sanitize_batch(&[candle(1000, "100")]);
    let out = sanitizer.sanitize_batch(&[candle(1180, "101")]);

    // 1m step: fillers at 1060 and 1120.
    let times: Vec<i64> = out.iter().map(|r| r.open_time).collect();
    assert_eq!(times, vec![1060, 1120, 1180]);
}

#[test]
fn forward_calls_produce_an_unbroken_sequence() {
    let mut sanitizer = OhlcvSanitizer::new(tf("5m"));

    let mut all: Vec<OhlcvRecord> = Vec::new();
    all.extend(sanitizer.sanitize_batch(&[candle(300, "1"), candle(600, "2")]));
    all.extend(sanitizer.sanitize_batch(&[candle(1500, "3")]));
    all.extend(sanitizer.sanitize_batch(&[candle(1800, "4"), candle(2100, "5")]));
    all.extend(sanitizer.sanitize_batch(&[candle(3300, "6")]));

    let times: Vec<i64> = all.iter().map(|r| r.open_time).collect();
    let expected: Vec<i64> = (1..=11).map(|k| k * 300).collect();
    assert_eq!(times, expected);
}
