//! Integration tests for charlock

use charlock::{
    DetectOptions, DetectionRequest, Detector, EncodingMatch, MatchType, Registry, SampleSize,
    ScoringParams, detect, detect_all, get_supported_encodings,
};
use std::collections::HashSet;
use std::io::Cursor;
use std::io::Write;
use tempfile::NamedTempFile;

const JAPANESE: &str = "吾輩は猫である。名前はまだ無い。どこで生れたかとんと見当がつかぬ。\
何でも薄暗いじめじめした所でニャーニャー泣いていた事だけは記憶している。";

fn is_sorted(matches: &[EncodingMatch]) -> bool {
    matches.windows(2).all(|w| {
        w[0].confidence > w[1].confidence
            || (w[0].confidence == w[1].confidence && w[0].name < w[1].name)
    })
}

fn samples() -> Vec<Vec<u8>> {
    let (sjis, _, _) = encoding_rs::SHIFT_JIS.encode(JAPANESE);
    let (cp1251, _, _) = encoding_rs::WINDOWS_1251.encode("Съешь же ещё этих мягких французских булок");
    vec![
        b"hello world".to_vec(),
        b"a".to_vec(),
        "naïve café — déjà vu".as_bytes().to_vec(),
        sjis.into_owned(),
        cp1251.into_owned(),
        vec![0xEF, 0xBB, 0xBF, b'x'],
        vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n', 0, 0],
        vec![0x80, 0x81, 0xFE, 0xFF, 0x41],
        b"\x1b$B$3$s$K$A$O\x1b(B".to_vec(),
    ]
}

#[test]
fn test_detect_all_is_sorted() {
    for data in samples() {
        let all = detect_all(&data, None);
        assert!(is_sorted(&all), "unsorted for {data:?}: {all:?}");
    }
}

#[test]
fn test_detect_is_first_of_detect_all() {
    for data in samples() {
        assert_eq!(detect(&data, None).as_ref(), detect_all(&data, None).first());
    }
}

#[test]
fn test_detection_is_deterministic() {
    let detector = Detector::new();
    for data in samples() {
        assert_eq!(detector.detect_all(&data), detector.detect_all(&data));
        assert_eq!(detector.detect(&data), detector.detect(&data));
    }
}

#[test]
fn test_no_duplicate_names() {
    for data in samples() {
        let all = detect_all(&data, None);
        let names: HashSet<&str> = all.iter().map(|m| m.name).collect();
        assert_eq!(names.len(), all.len());
    }
}

#[test]
fn test_confidence_in_range_and_above_threshold() {
    for data in samples() {
        for m in detect_all(&data, None) {
            assert!(m.confidence <= 100);
            assert!(m.confidence >= charlock::DEFAULT_MIN_CONFIDENCE);
        }
    }
}

#[test]
fn test_utf8_bom() {
    let data = b"\xEF\xBB\xBFThe quick brown fox jumps over the lazy dog";
    let best = detect(data, None).unwrap();

    assert_eq!(best.name, "UTF-8");
    assert_eq!(best.confidence, 100);
    assert_eq!(best.match_type, MatchType::Text);
}

#[test]
fn test_bom_beats_hint() {
    let data = b"\xEF\xBB\xBFhello";
    assert_eq!(detect(data, Some("shift_jis")).unwrap().name, "UTF-8");
}

#[test]
fn test_utf32_bom() {
    let data = [0xFF, 0xFE, 0x00, 0x00, b'h', 0, 0, 0, b'i', 0, 0, 0];
    let best = detect(&data, None).unwrap();
    assert_eq!(best.name, "UTF-32LE");
    assert_eq!(best.confidence, 100);
}

#[test]
fn test_empty_input() {
    assert_eq!(detect(b"", None), None);
    assert!(detect_all(b"", None).is_empty());
}

#[test]
fn test_short_input_does_not_fail() {
    for data in [&b"a"[..], b"ab", b"\xe9", b"\xe9\xe8"] {
        let all = detect_all(data, None);
        assert!(all.iter().all(|m| m.confidence <= 100));
    }
}

#[test]
fn test_short_non_ascii_input_is_halved() {
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode("Жук");

    let mut short = Detector::new();
    short.min_confidence(0).unwrap();
    let params = ScoringParams {
        min_analysis_window: 1,
        ..ScoringParams::default()
    };
    let mut full = Detector::with_registry(Registry::with_params(params));
    full.min_confidence(0).unwrap();

    let short = short.detect_all(&bytes);
    let full = full.detect_all(&bytes);
    assert!(!full.is_empty());
    for m in full.iter().filter(|m| m.name != "UTF-8") {
        let halved = short.iter().find(|h| h.name == m.name).unwrap();
        assert!(halved.confidence < m.confidence || m.confidence <= 1, "{m} vs {halved}");
        let diff = i32::from(m.confidence) - 2 * i32::from(halved.confidence);
        assert!(diff.abs() <= 2, "{m} vs {halved}");
    }
}

#[test]
fn test_iso_2022_jp_long_document() {
    let text = "これは日本語の文章です。".repeat(40);
    let (bytes, _, _) = encoding_rs::ISO_2022_JP.encode(&text);

    let all = detect_all(&bytes, None);
    assert_eq!(all[0].name, "ISO-2022-JP", "got {all:?}");
    assert!(all[0].confidence >= 70, "got {all:?}");
    for name in ["Shift_JIS", "EUC-JP", "GBK", "gb18030", "Big5", "EUC-KR"] {
        assert!(all.iter().all(|m| m.name != name), "{name} reported for 7-bit input");
    }
}

#[test]
fn test_ascii_text() {
    let best = detect(b"hello world", None).unwrap();
    assert!(best.name == "UTF-8" || best.name == "windows-1252");
    assert!(best.confidence >= 80);
}

#[test]
fn test_shift_jis_in_top_two() {
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(JAPANESE);
    assert!(!had_errors);

    let all = detect_all(&bytes, None);
    let top_two: Vec<&str> = all.iter().take(2).map(|m| m.name).collect();
    assert!(top_two.contains(&"Shift_JIS"), "got {all:?}");
}

#[test]
fn test_windows_1251_detected() {
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(
        "Все люди рождаются свободными и равными в своем достоинстве и правах. \
         Они наделены разумом и совестью.",
    );
    let best = detect(&bytes, None).unwrap();
    assert_eq!(best.name, "windows-1251");
    assert_eq!(best.language, Some("ru"));
}

#[test]
fn test_binary_content() {
    let data = b"\x7fELF\x02\x01\x01\x00\x00\x00\x00\x00";
    let all = detect_all(data, None);
    assert_eq!(all, vec![EncodingMatch::binary()]);

    let png = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
    assert!(detect(png, None).unwrap().is_binary());
}

#[test]
fn test_nul_beyond_scan_window_is_text() {
    let mut data = b"plain text ".repeat(200);
    data.push(0);

    let mut detector = Detector::new();
    assert!(!detector.detect(&data).unwrap().is_binary());

    detector.binary_scan_len(data.len()).unwrap();
    assert!(detector.detect(&data).unwrap().is_binary());
}

#[test]
fn test_supported_encodings() {
    let first = get_supported_encodings();
    let second = get_supported_encodings();
    let unique: HashSet<&str> = first.iter().copied().collect();

    assert!(!first.is_empty());
    assert_eq!(unique.len(), first.len());
    assert_eq!(first, second);
    for name in ["UTF-8", "UTF-16LE", "UTF-32BE", "Shift_JIS", "windows-1252"] {
        assert!(unique.contains(name), "missing {name}");
    }
}

#[test]
fn test_every_reported_name_is_supported() {
    let supported: HashSet<&str> = get_supported_encodings().into_iter().collect();
    for data in samples() {
        for m in detect_all(&data, None) {
            assert!(m.is_binary() || supported.contains(m.name), "{}", m.name);
        }
    }
}

#[test]
fn test_unknown_hint_is_ignored() {
    for data in samples() {
        assert_eq!(detect_all(&data, Some("no-such-encoding")), detect_all(&data, None));
    }
}

#[test]
fn test_hint_never_removes_candidates() {
    for data in samples() {
        let plain = detect_all(&data, None);
        let hinted = detect_all(&data, Some("EUC-JP"));
        for m in &plain {
            let h = hinted.iter().find(|h| h.name == m.name).unwrap();
            assert!(h.confidence >= m.confidence);
        }
    }
}

#[test]
fn test_hint_breaks_ascii_tie() {
    let detector = Detector::new();
    let request = DetectionRequest::new(b"plain old ascii text").with_hint("latin1");
    let all = detector.detect_all_request(&request);
    assert_eq!(all[0].name, "UTF-8");
    assert_eq!(all[1].name, "windows-1252");
    assert_eq!(all[1].confidence, 70);
}

#[test]
fn test_strip_tags() {
    let (body, _, _) = encoding_rs::WINDOWS_1251.encode(
        "Все люди рождаются свободными и равными в своем достоинстве и правах.",
    );
    let mut html = b"<html><body><p class=\"intro\">".to_vec();
    html.extend_from_slice(&body);
    html.extend_from_slice(b"</p></body></html>");

    let mut detector = Detector::new();
    detector.strip_tags(true);
    let best = detector.detect(&html).unwrap();
    assert_eq!(best.name, "windows-1251");
}

#[test]
fn test_detect_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all("Grüße aus Köln, schöne Straße!".as_bytes())
        .unwrap();
    file.flush().unwrap();

    let detector = Detector::new();
    let best = detector.detect_path(file.path()).unwrap().unwrap();
    assert_eq!(best.name, "UTF-8");
    assert_eq!(best.confidence, 100);

    let all = detector.detect_all_path(file.path()).unwrap();
    assert_eq!(all.first(), Some(&best));
}

#[test]
fn test_missing_file_is_io_error() {
    let detector = Detector::new();
    let err = detector
        .detect_path("/definitely/not/here.txt")
        .unwrap_err();
    assert!(matches!(err, charlock::CharlockError::Io(_)));
}

#[test]
fn test_detect_from_reader() {
    let detector = Detector::new();
    let best = detector
        .detect_reader(Cursor::new(b"hello world".to_vec()))
        .unwrap()
        .unwrap();
    assert_eq!(best.name, "UTF-8");
}

#[test]
fn test_sample_size_bytes() {
    // The BOM is outside a 2-byte sample.
    let data = b"\xEF\xBB\xBFhello";
    let mut detector = Detector::new();
    detector.sample_size(SampleSize::Bytes(2));

    let best = detector.detect_reader(Cursor::new(data.to_vec())).unwrap();
    assert_ne!(best.map(|m| m.confidence), Some(100));
}

#[test]
fn test_options_validation() {
    let options = DetectOptions {
        binary_scan_len: 0,
        ..DetectOptions::default()
    };
    assert!(matches!(
        Detector::with_options(options),
        Err(charlock::CharlockError::InvalidArgument(_))
    ));

    let options = DetectOptions {
        hint: Some("sjis".to_string()),
        min_confidence: 50,
        ..DetectOptions::default()
    };
    let detector = Detector::with_options(options).unwrap();
    assert!(detector.detect_all(b"hello world").iter().all(|m| m.confidence >= 50));
}

#[test]
fn test_decode_legacy_text() {
    let text = "Все люди рождаются свободными и равными в своем достоинстве и правах.";
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(text);

    let decoded = Detector::new().decode(&bytes).unwrap();
    assert_eq!(decoded.encoding.name, "windows-1251");
    assert_eq!(decoded.text, text);
    assert!(!decoded.had_errors);
}

#[test]
fn test_concurrent_use() {
    let detector = Detector::new();
    let inputs = samples();
    let refs: Vec<&[u8]> = inputs.iter().map(Vec::as_slice).collect();

    let batch = detector.detect_batch(&refs);
    let detector = &detector;
    let threaded: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = refs
            .iter()
            .map(|&data| s.spawn(move || detector.detect(data)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(batch, threaded);
}

#[test]
fn test_json_shape() {
    let best = detect(b"hello world", None).unwrap();
    let value = serde_json::to_value(&best).unwrap();
    assert_eq!(value["name"], "UTF-8");
    assert_eq!(value["type"], "text");
    assert!(value["language"].is_null());
}
