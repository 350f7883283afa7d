//! End-to-end tests for the summarizer with in-memory providers.

use std::cell::RefCell;

use precis::provider::{Embedder, LanguageModel, TokenCounter};
use precis::{Config, Error, Report, Result, Summarizer};

/// Five four-word paragraphs: three about rivers, two about taxes.
const DOCUMENT: &str = "Rivers flood the valley.\n\n\
                        Rivers carry fertile silt.\n\n\n\n\
                        Rivers feed the lakes.\n\n\
                        Taxes fund public roads.\n\n\
                        Taxes rise each year.";

/// Topic vector: a large component per keyword plus a small length term so
/// that no two chunks share a point.
struct Topics {
    batches: RefCell<Vec<usize>>,
}

impl Topics {
    fn new() -> Self {
        Self {
            batches: RefCell::new(Vec::new()),
        }
    }
}

impl Embedder for Topics {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.batches.borrow_mut().push(texts.len());
        Ok(texts
            .iter()
            .map(|t| {
                let rivers = if t.contains("Rivers") { 10.0 } else { 0.0 };
                let taxes = if t.contains("Taxes") { 10.0 } else { 0.0 };
                vec![rivers, taxes, t.len() as f32 * 0.01]
            })
            .collect())
    }
}

/// Answers theme prompts by keyword and everything else with a fixed summary.
/// Replies are padded with whitespace to check trimming.
struct Scripted {
    prompts: RefCell<Vec<String>>,
}

impl Scripted {
    fn new() -> Self {
        Self {
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl LanguageModel for Scripted {
    fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        let reply = match prompt.rsplit_once("Excerpt: ") {
            Some((_, excerpt)) if excerpt.contains("Rivers") => "  Rivers\n",
            Some((_, excerpt)) if excerpt.contains("Taxes") => " Taxation ",
            Some(_) => "unrelated",
            None => "\nThe document covers rivers and taxes.\n",
        };
        Ok(reply.to_string())
    }
}

/// One token per whitespace-separated word plus one per period.
struct Punctuated;

impl TokenCounter for Punctuated {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count() + text.matches('.').count())
    }
}

struct Offline;

impl Embedder for Offline {
    fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Err(Error::Provider("connection refused".into()))
    }
}

impl LanguageModel for Offline {
    fn complete(&self, _prompt: &str) -> Result<String> {
        Err(Error::Provider("rate limited".into()))
    }
}

/// Drops the last vector of every batch.
struct Lossy;

impl Embedder for Lossy {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().skip(1).map(|_| vec![1.0, 2.0]).collect())
    }
}

fn config() -> Config {
    Config {
        target_words: 4,
        chunk_flexibility: 0.25,
        embed_batch_size: 2,
        n_clusters: 2,
        n_closest_representatives: 2,
        ..Config::default()
    }
}

#[test]
fn summarizes_two_topics() {
    let summarizer = Summarizer::new(config(), Topics::new(), Scripted::new()).unwrap();
    let summary = summarizer.run(DOCUMENT).unwrap();

    let labels = summary.labels();
    assert_eq!(labels.len(), 5);
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[1], labels[2]);
    assert_eq!(labels[3], labels[4]);
    assert_ne!(labels[0], labels[3]);

    let rivers = labels[0];
    let taxes = labels[3];
    assert_eq!(summary.themes.len(), 2);
    assert_eq!(summary.themes[&rivers], "Rivers");
    assert_eq!(summary.themes[&taxes], "Taxation");
    assert_eq!(summary.summary, "The document covers rivers and taxes.");
}

#[test]
fn selects_n_closest_per_cluster() {
    let summarizer = Summarizer::new(config(), Topics::new(), Scripted::new()).unwrap();
    let selection = summarizer.select(DOCUMENT).unwrap();

    assert_eq!(selection.chunks.len(), 5);
    assert_eq!(selection.representatives.len(), 2);
    for (expected_label, rep) in selection.representatives.iter().enumerate() {
        assert_eq!(rep.label, expected_label);
        assert_eq!(rep.indices.len(), 2);
        // Both picks come from the representative's own topic.
        for &i in &rep.indices {
            assert_eq!(selection.clustering.labels[i], rep.label);
        }
    }
}

#[test]
fn sends_only_representatives() {
    let llm = Scripted::new();
    let summarizer = Summarizer::new(config(), Topics::new(), &llm).unwrap();
    let summary = summarizer.run(DOCUMENT).unwrap();

    // 2 clusters x 2 representatives x 4 words, out of 5 x 4 words.
    let analysis = &summary.analysis;
    assert_eq!(analysis.word_count_per_chunk, vec![4, 4, 4, 4, 4]);
    assert_eq!(analysis.total_chunks, 5);
    assert_eq!(analysis.total_words, 20);
    assert_eq!(analysis.words_sent, 16);
    assert!((analysis.reduction_ratio - 0.8).abs() < 1e-9);

    // One theme prompt per cluster, then the summary prompt.
    let prompts = llm.prompts.borrow();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[2].ends_with(&summary.combined_content));
}

#[test]
fn reports_token_counts_when_counter_attached() {
    let summarizer = Summarizer::new(config(), Topics::new(), Scripted::new())
        .unwrap()
        .with_token_counter(Punctuated);
    let summary = summarizer.run(DOCUMENT).unwrap();

    // Preprocessed document: 20 words and 5 periods.
    assert_eq!(summary.analysis.total_tokens, Some(25));
    // Combined content: 4 chunks of 4 words and 1 period each.
    assert_eq!(summary.analysis.tokens_sent, Some(20));
    // The word-based ratio is unaffected.
    assert!((summary.analysis.reduction_ratio - 0.8).abs() < 1e-9);
}

#[test]
fn token_counts_absent_without_counter() {
    let summarizer = Summarizer::new(config(), Topics::new(), Scripted::new()).unwrap();
    let summary = summarizer.run(DOCUMENT).unwrap();
    assert_eq!(summary.analysis.total_tokens, None);
    assert_eq!(summary.analysis.tokens_sent, None);
}

#[test]
fn repeated_boilerplate_does_not_break_clustering() {
    let boilerplate = "Share this page today.";
    let document = [boilerplate, boilerplate, boilerplate, "Rivers flood the valley."]
        .join("\n\n");
    let config = Config {
        n_clusters: 4,
        ..config()
    };
    let summarizer = Summarizer::new(config, Topics::new(), Scripted::new()).unwrap();
    let summary = summarizer.run(&document).unwrap();

    assert_eq!(summary.labels().len(), 4);
    assert_eq!(summary.selection.clustering.n_clusters(), 2);
    assert_eq!(summary.themes.len(), 2);
}

#[test]
fn combined_content_follows_label_order() {
    let summarizer = Summarizer::new(config(), Topics::new(), Scripted::new()).unwrap();
    let summary = summarizer.run(DOCUMENT).unwrap();

    let expected = summary
        .cluster_content
        .values()
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(summary.combined_content, expected);
    assert_eq!(
        summary.cluster_content.keys().copied().collect::<Vec<_>>(),
        vec![0, 1]
    );
}

#[test]
fn embeds_in_configured_batches() {
    let embedder = Topics::new();
    let summarizer = Summarizer::new(config(), &embedder, Scripted::new()).unwrap();
    summarizer.select(DOCUMENT).unwrap();
    assert_eq!(*embedder.batches.borrow(), vec![2, 2, 1]);
}

#[test]
fn clamps_clusters_to_chunk_count() {
    let config = Config {
        n_clusters: 10,
        n_closest_representatives: 50,
        ..config()
    };
    let summarizer = Summarizer::new(config, Topics::new(), Scripted::new()).unwrap();
    let summary = summarizer.run(DOCUMENT).unwrap();

    assert_eq!(summary.selection.clustering.n_clusters(), 5);
    assert_eq!(summary.themes.len(), 5);
    assert!(summary
        .selection
        .representatives
        .iter()
        .all(|rep| rep.indices.len() == 5));
}

#[test]
fn repeated_runs_agree() {
    let summarizer = Summarizer::new(config(), Topics::new(), Scripted::new()).unwrap();
    let first = summarizer.run(DOCUMENT).unwrap();
    let second = summarizer.run(DOCUMENT).unwrap();

    assert_eq!(first.labels(), second.labels());
    assert_eq!(first.themes, second.themes);
    assert_eq!(
        first.selection.representatives,
        second.selection.representatives
    );
}

#[test]
fn empty_document_has_nothing_to_cluster() {
    let summarizer = Summarizer::new(config(), Topics::new(), Scripted::new()).unwrap();
    for text in ["", "\n\n\n", " \t\r\n ", "日本語のみ"] {
        assert!(
            matches!(summarizer.run(text), Err(Error::NothingToCluster)),
            "{text:?}"
        );
    }
}

#[test]
fn embedding_failure_propagates() {
    let summarizer = Summarizer::new(config(), Offline, Scripted::new()).unwrap();
    let err = summarizer.run(DOCUMENT).unwrap_err();
    assert!(matches!(err, Error::Provider(ref msg) if msg == "connection refused"));
}

#[test]
fn language_model_failure_propagates() {
    let summarizer = Summarizer::new(config(), Topics::new(), Offline).unwrap();
    assert!(matches!(
        summarizer.run(DOCUMENT),
        Err(Error::Provider(ref msg)) if msg == "rate limited"
    ));
}

#[test]
fn short_embedding_batch_is_rejected() {
    let summarizer = Summarizer::new(config(), Lossy, Scripted::new()).unwrap();
    assert!(matches!(
        summarizer.run(DOCUMENT),
        Err(Error::EmbeddingCount {
            expected: 2,
            found: 1
        })
    ));
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let config = Config {
        n_clusters: 0,
        ..config()
    };
    assert!(matches!(
        Summarizer::new(config, Topics::new(), Scripted::new()),
        Err(Error::Config(_))
    ));
}

#[test]
fn report_serializes_summary() {
    let summarizer = Summarizer::new(config(), Topics::new(), Scripted::new()).unwrap();
    let summary = summarizer.run(DOCUMENT).unwrap();
    let report = Report::new("rivers.txt", &summary);

    assert_eq!(report.labels, summary.labels());
    assert_eq!(report.label_grid.split(' ').count(), 5);

    let json: serde_json::Value =
        serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
    assert_eq!(json["source"], "rivers.txt");
    assert_eq!(json["analysis"]["words_sent"], 16);
}
