//! Accuracy benchmark for encoding detection.
//!
//! Runs the detector over labelled samples and reports how often the expected
//! encoding is the top match, or among the top two. Samples come either from
//! the built-in corpus (text encoded on the fly with `encoding_rs`) or from a
//! directory of files plus an annotation file.

use crate::{Detector, EncodingMatch};
use foldhash::{HashMap, HashMapExt};
use rayon::prelude::*;
use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

/// A byte sample with the encoding it is known to be in.
#[derive(Debug, Clone)]
pub struct LabelledSample {
    pub name: String,
    /// Expected encoding label; resolved through the registry before comparing.
    pub expected: String,
    pub data: Vec<u8>,
}

impl LabelledSample {
    pub fn new(name: impl Into<String>, expected: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            expected: expected.into(),
            data,
        }
    }
}

/// Result of benchmarking a single sample.
#[derive(Debug, Clone)]
pub struct SampleResult {
    pub name: String,
    pub expected: String,
    /// Top match, if any.
    pub detected: Option<EncodingMatch>,
    /// Zero-based position of the expected encoding in the ranking.
    pub rank: Option<usize>,
    pub error: Option<String>,
}

impl SampleResult {
    pub fn passed(&self) -> bool {
        self.rank == Some(0)
    }

    pub fn in_top_two(&self) -> bool {
        matches!(self.rank, Some(r) if r < 2)
    }
}

/// Aggregate benchmark results.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkResult {
    pub total: usize,
    pub passed: usize,
    pub top_two: usize,
    pub errors: usize,
    pub sample_results: Vec<SampleResult>,
}

impl BenchmarkResult {
    /// Share of samples whose top match is the expected encoding.
    pub fn success_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64
        }
    }

    /// Share of samples with the expected encoding among the top two matches.
    pub fn top_two_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.top_two as f64 / self.total as f64
        }
    }

    /// Calculate error ratio (errors / total).
    pub fn error_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.errors as f64 / self.total as f64
        }
    }

    /// Print detailed results to stdout.
    pub fn print_details(&self) {
        println!("\n=== Benchmark Results ===\n");

        for result in &self.sample_results {
            let status = if result.error.is_some() {
                "ERROR"
            } else if result.passed() {
                "PASS"
            } else if result.in_top_two() {
                "TOP2"
            } else {
                "FAIL"
            };

            print!("[{}] {}", status, result.name);

            if !result.passed() && result.error.is_none() {
                let detected = result
                    .detected
                    .as_ref()
                    .map_or_else(|| "nothing".to_string(), |m| m.to_string());
                print!(" - expected {} got {detected}", result.expected);
            }

            if let Some(ref err) = result.error {
                print!(" - {err}");
            }

            println!();
        }
    }

    /// Print summary metrics to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Summary ===\n");
        println!("Total samples:      {}", self.total);
        println!(
            "Top match:          {} ({:.1}%)",
            self.passed,
            self.success_ratio() * 100.0
        );
        println!(
            "Top two:            {} ({:.1}%)",
            self.top_two,
            self.top_two_ratio() * 100.0
        );
        println!(
            "Errors:             {} ({:.1}%)",
            self.errors,
            self.error_ratio() * 100.0
        );
    }
}

/// Run the detector over `samples`.
pub fn run_benchmark(detector: &Detector, samples: &[LabelledSample]) -> BenchmarkResult {
    let sample_results: Vec<SampleResult> = samples
        .par_iter()
        .map(|sample| benchmark_sample(detector, sample))
        .collect();

    let mut result = BenchmarkResult {
        total: sample_results.len(),
        ..BenchmarkResult::default()
    };
    for sample_result in &sample_results {
        if sample_result.error.is_some() {
            result.errors += 1;
        }
        if sample_result.passed() {
            result.passed += 1;
        }
        if sample_result.in_top_two() {
            result.top_two += 1;
        }
    }
    result.sample_results = sample_results;
    result
}

fn benchmark_sample(detector: &Detector, sample: &LabelledSample) -> SampleResult {
    let Some(expected) = detector.registry().resolve(&sample.expected) else {
        return SampleResult {
            name: sample.name.clone(),
            expected: sample.expected.clone(),
            detected: None,
            rank: None,
            error: Some(format!("Unknown expected encoding: {}", sample.expected)),
        };
    };

    let matches = detector.detect_all(&sample.data);
    SampleResult {
        name: sample.name.clone(),
        expected: expected.name.to_string(),
        detected: matches.first().cloned(),
        rank: matches.iter().position(|m| m.name == expected.name),
        error: None,
    }
}

/// Parse an annotation file of `file_name|encoding` lines.
///
/// Blank lines, `#` comments and a `file_name|` header line are skipped.
pub fn parse_annotations(path: &Path) -> io::Result<HashMap<String, String>> {
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    let mut annotations = HashMap::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with("file_name|") {
            continue;
        }

        let Some((file_name, encoding)) = line.split_once('|') else {
            continue;
        };
        annotations.insert(file_name.trim().to_string(), encoding.trim().to_string());
    }

    Ok(annotations)
}

/// Load the annotated files of `data_dir` as labelled samples.
///
/// Samples are sorted by file name. Missing files are skipped.
pub fn load_samples(data_dir: &Path, annotations_path: &Path) -> io::Result<Vec<LabelledSample>> {
    let annotations = parse_annotations(annotations_path)?;
    let mut samples = Vec::with_capacity(annotations.len());

    for (file_name, encoding) in annotations {
        let path = data_dir.join(&file_name);
        if !path.exists() {
            continue;
        }
        samples.push(LabelledSample::new(file_name, encoding, fs::read(path)?));
    }

    samples.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(samples)
}

const JAPANESE: &str = "吾輩は猫である。名前はまだ無い。どこで生れたかとんと見当がつかぬ。\
何でも薄暗いじめじめした所でニャーニャー泣いていた事だけは記憶している。";
const KOREAN: &str = "모든 인간은 태어날 때부터 자유로우며 그 존엄과 권리에 있어 동등하다. \
인간은 천부적으로 이성과 양심을 부여받았으며 서로 형제애의 정신으로 행동하여야 한다.";
const TRADITIONAL_CHINESE: &str = "人人生而自由，在尊嚴和權利上一律平等。\
他們賦有理性和良心，並應以兄弟關係的精神相對待。";
const SIMPLIFIED_CHINESE: &str = "人人生而自由，在尊严和权利上一律平等。\
他们赋有理性和良心，并应以兄弟关系的精神相对待。";
const RUSSIAN: &str = "Все люди рождаются свободными и равными в своем достоинстве и правах. \
Они наделены разумом и совестью и должны поступать в отношении друг друга в духе братства.";
const GREEK: &str = "Όλοι οι άνθρωποι γεννιούνται ελεύθεροι και ίσοι στην αξιοπρέπεια και τα \
δικαιώματα. Είναι προικισμένοι με λογική και συνείδηση.";
const FRENCH: &str = "Tous les êtres humains naissent libres et égaux en dignité et en droits. \
Ils sont doués de raison et de conscience et doivent agir les uns envers les autres \
dans un esprit de fraternité.";
const GERMAN: &str = "Alle Menschen sind frei und gleich an Würde und Rechten geboren. \
Sie sind mit Vernunft und Gewissen begabt und sollen einander im Geist der Brüderlichkeit begegnen.";

/// A small labelled corpus generated by encoding known text.
pub fn builtin_corpus() -> Vec<LabelledSample> {
    let encoded = |name: &str, text: &str, encoding: &'static encoding_rs::Encoding| {
        let (bytes, _, _) = encoding.encode(text);
        LabelledSample::new(name, encoding.name(), bytes.into_owned())
    };

    let mut utf16le = vec![0xFF, 0xFE];
    utf16le.extend(GERMAN.encode_utf16().flat_map(u16::to_le_bytes));

    vec![
        encoded("japanese.sjis", JAPANESE, encoding_rs::SHIFT_JIS),
        encoded("japanese.eucjp", JAPANESE, encoding_rs::EUC_JP),
        encoded("korean.euckr", KOREAN, encoding_rs::EUC_KR),
        encoded("chinese.big5", TRADITIONAL_CHINESE, encoding_rs::BIG5),
        encoded("chinese.gbk", SIMPLIFIED_CHINESE, encoding_rs::GBK),
        encoded("russian.cp1251", RUSSIAN, encoding_rs::WINDOWS_1251),
        encoded("greek.iso8859-7", GREEK, encoding_rs::ISO_8859_7),
        encoded("french.cp1252", FRENCH, encoding_rs::WINDOWS_1252),
        encoded("french.utf8", FRENCH, encoding_rs::UTF_8),
        encoded("japanese.utf8", JAPANESE, encoding_rs::UTF_8),
        LabelledSample::new("german.utf16le", "UTF-16LE", utf16le),
    ]
}
