//! The answering pipeline and its single entry point, [`RagPipeline::answer_query`].
//!
//! Initialization order in [`RagPipeline::bootstrap`]:
//! config → corpus → embedder → index (load or rebuild) → retriever →
//! prompt assembler → generator → classifier.
//!
//! Per request:
//! `Received → Classified(empty | canned | substantive) → [Retrieved →] Generated | Rejected`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ai_llm_service::LlmServiceProfiles;
use rag_index::{
    BootstrapReport, Chunker, Corpus, FileCorpus, IndexBootstrap, IndexConfig, Progress,
    ScoredDocument, connect_embedder, record::clamp_preview,
};
use tracing::{info, instrument, warn};

use crate::api_types::{Answer, Outcome, RejectReason, UsedChunk};
use crate::cfg::{AnswerConfig, AnswerMode};
use crate::classify::{Classification, Classifier};
use crate::error::PipelineError;
use crate::llm::{AnswerGenerator, ServiceCompleter};
use crate::prompt::PromptAssembler;
use crate::retrieve::Retriever;

pub const EMPTY_QUERY_REPLY: &str = "Please type a question and I'll look it up on the website.";
pub const OUT_OF_DOMAIN_REPLY: &str = "Sorry, I couldn't find anything about that on this website. \
Try rephrasing your question or ask about our products and services.";
pub const UNAVAILABLE_REPLY: &str =
    "Sorry, the assistant is temporarily unavailable. Please try again in a moment.";
pub const TIMEOUT_REPLY: &str =
    "Sorry, that question took too long to answer. Please try again.";
pub const INTERNAL_REPLY: &str = "Sorry, something went wrong while answering. Please try again.";

const PREVIEW_CHARS: usize = 240;

/// Pre-built components for [`RagPipeline::from_parts`].
pub struct PipelineParts {
    pub corpus: Corpus,
    /// Required by the retrieval and extractive modes.
    pub retriever: Option<Retriever>,
    /// Required by the retrieval and full-corpus modes.
    pub generator: Option<AnswerGenerator>,
    pub classifier: Classifier,
    pub report: Option<BootstrapReport>,
}

/// Explicitly constructed, read-only after construction, shared as `Arc`.
pub struct RagPipeline {
    mode: AnswerMode,
    top_k: usize,
    max_distance: f32,
    request_timeout: Duration,
    corpus: Corpus,
    retriever: Option<Retriever>,
    assembler: PromptAssembler,
    generator: Option<AnswerGenerator>,
    classifier: Classifier,
    report: Option<BootstrapReport>,
}

impl RagPipeline {
    /// Builds every component from configuration.
    ///
    /// `llm` is required unless the mode is extractive with the hashing
    /// embedder.
    ///
    /// # Errors
    /// Corpus read failures, an unreachable embedding backend
    /// ([`PipelineError::ModelUnavailable`]) or inconsistent configuration.
    pub async fn bootstrap(
        index_cfg: &IndexConfig,
        cfg: AnswerConfig,
        llm: Option<Arc<LlmServiceProfiles>>,
        progress: &dyn Progress,
    ) -> Result<Self, PipelineError> {
        info!(mode = %cfg.mode, embedder = %index_cfg.embedder, "bootstrapping pipeline");

        progress.message("loading corpus");
        let corpus = Corpus::load(&FileCorpus::new(&index_cfg.corpus_path))?;

        let (retriever, report) = if cfg.mode == AnswerMode::FullCorpus {
            (None, None)
        } else {
            progress.message("connecting embedder");
            let embedder = connect_embedder(index_cfg, llm.clone()).await?;
            let chunker = Chunker::new(index_cfg.chunker)?;
            let (index, report) = IndexBootstrap::new(
                &index_cfg.index_path,
                index_cfg.metric,
                index_cfg.embedding_concurrency,
            )
            .load_or_build(&corpus, &chunker, embedder.as_ref(), progress)
            .await?;
            (Some(Retriever::new(embedder, Arc::new(index))), Some(report))
        };

        let generator = match (cfg.mode, llm) {
            (AnswerMode::Extractive, _) => None,
            (_, Some(svc)) => Some(AnswerGenerator::new(Arc::new(ServiceCompleter::new(svc)))),
            (mode, None) => {
                return Err(PipelineError::Config(format!(
                    "ANSWER_MODE={mode} needs a chat model"
                )));
            }
        };

        let classifier = match &cfg.intents_path {
            Some(path) => Classifier::with_overrides(path)?,
            None => Classifier::default(),
        };

        Self::from_parts(
            cfg,
            PipelineParts {
                corpus,
                retriever,
                generator,
                classifier,
                report,
            },
        )
    }

    /// Assembles a pipeline from already-built parts.
    ///
    /// # Errors
    /// [`PipelineError::Config`] if a component required by `cfg.mode` is missing.
    pub fn from_parts(cfg: AnswerConfig, parts: PipelineParts) -> Result<Self, PipelineError> {
        cfg.validate()?;
        let needs_retriever = cfg.mode != AnswerMode::FullCorpus;
        let needs_generator = cfg.mode != AnswerMode::Extractive;
        if needs_retriever && parts.retriever.is_none() {
            return Err(PipelineError::Config(format!(
                "ANSWER_MODE={} needs a retriever",
                cfg.mode
            )));
        }
        if needs_generator && parts.generator.is_none() {
            return Err(PipelineError::Config(format!(
                "ANSWER_MODE={} needs a generator",
                cfg.mode
            )));
        }
        if cfg.mode == AnswerMode::FullCorpus {
            let chars = parts.corpus.text().chars().count();
            if chars > cfg.max_ctx_chars {
                warn!(
                    chars,
                    max_ctx_chars = cfg.max_ctx_chars,
                    "full-corpus prompts exceed MAX_CTX_CHARS; the model context must hold the whole corpus"
                );
            }
        }

        Ok(Self {
            mode: cfg.mode,
            top_k: cfg.top_k,
            max_distance: cfg.max_distance,
            request_timeout: cfg.request_timeout,
            assembler: PromptAssembler::new(cfg.persona, cfg.max_ctx_chars),
            corpus: parts.corpus,
            retriever: parts.retriever,
            generator: parts.generator,
            classifier: parts.classifier,
            report: parts.report,
        })
    }

    /// Answers one question within the configured request timeout.
    /// Never fails: every error becomes a fallback [`Answer`].
    pub async fn answer_query(&self, query: &str) -> Answer {
        self.answer_query_within(query, self.request_timeout).await
    }

    /// Like [`Self::answer_query`] with a caller-chosen deadline.
    #[instrument(skip_all, fields(mode = %self.mode, query_len = query.len()))]
    pub async fn answer_query_within(&self, query: &str, deadline: Duration) -> Answer {
        let started = Instant::now();
        let result = match tokio::time::timeout(deadline, self.try_answer(query)).await {
            Ok(r) => r,
            Err(_) => Err(PipelineError::Timeout(deadline)),
        };

        let answer = result.unwrap_or_else(fallback);
        info!(
            outcome = ?answer.outcome,
            context = answer.context.len(),
            latency_ms = started.elapsed().as_millis(),
            "question answered"
        );
        answer
    }

    /// Strict variant exposing the failure reason.
    pub async fn try_answer(&self, query: &str) -> Result<Answer, PipelineError> {
        let intent = match self.classifier.classify(query) {
            Classification::Empty => return Err(PipelineError::EmptyQuery),
            Classification::Canned(intent) => Some(intent),
            Classification::Substantive => None,
        };
        if let Some(intent) = intent {
            return Ok(Answer::canned(&intent.name, &intent.reply));
        }

        let question = query.trim();
        match self.mode {
            AnswerMode::FullCorpus => {
                if self.corpus.is_empty() {
                    return Err(PipelineError::NoRelevantContext);
                }
                let prompt = self
                    .assembler
                    .assemble_full_corpus(question, self.corpus.text());
                let text = self.generator()?.generate(&prompt).await?;
                Ok(Answer {
                    text,
                    outcome: Outcome::Generated,
                    context: Vec::new(),
                })
            }
            AnswerMode::Retrieval | AnswerMode::Extractive => {
                let hits = self.relevant_hits(question).await?;
                let context = used_chunks(&hits);

                if self.mode == AnswerMode::Extractive {
                    return Ok(Answer {
                        text: hits[0].document.content.trim().to_string(),
                        outcome: Outcome::Extracted,
                        context,
                    });
                }

                let prompt = self.assembler.assemble(question, &hits);
                let text = self.generator()?.generate(&prompt).await?;
                Ok(Answer {
                    text,
                    outcome: Outcome::Generated,
                    context,
                })
            }
        }
    }

    /// Retrieved hits within the similarity floor; never empty on success.
    async fn relevant_hits(&self, question: &str) -> Result<Vec<ScoredDocument>, PipelineError> {
        let retriever = self
            .retriever
            .as_ref()
            .ok_or_else(|| PipelineError::Config("no retriever configured".into()))?;

        let hits: Vec<ScoredDocument> = retriever
            .retrieve(question, self.top_k)
            .await?
            .into_iter()
            .filter(|h| h.distance <= self.max_distance)
            .collect();

        if hits.is_empty() {
            return Err(PipelineError::NoRelevantContext);
        }
        Ok(hits)
    }

    fn generator(&self) -> Result<&AnswerGenerator, PipelineError> {
        self.generator
            .as_ref()
            .ok_or_else(|| PipelineError::Config("no generator configured".into()))
    }

    pub fn mode(&self) -> AnswerMode {
        self.mode
    }

    /// How the index was obtained; `None` in full-corpus mode.
    pub fn report(&self) -> Option<&BootstrapReport> {
        self.report.as_ref()
    }

    pub fn index_entries(&self) -> usize {
        self.retriever.as_ref().map_or(0, |r| r.index().len())
    }
}

fn used_chunks(hits: &[ScoredDocument]) -> Vec<UsedChunk> {
    hits.iter()
        .map(|h| UsedChunk {
            source_offset: h.document.source_offset,
            distance: h.distance,
            preview: clamp_preview(h.document.content.trim(), PREVIEW_CHARS),
        })
        .collect()
}

fn fallback(err: PipelineError) -> Answer {
    match err {
        PipelineError::EmptyQuery => Answer::rejected(RejectReason::EmptyQuery, EMPTY_QUERY_REPLY),
        PipelineError::NoRelevantContext => {
            Answer::rejected(RejectReason::NoRelevantContext, OUT_OF_DOMAIN_REPLY)
        }
        PipelineError::ModelUnavailable(msg) => {
            warn!(error = %msg, "embedding unavailable; answering with apology");
            Answer::rejected(RejectReason::ModelUnavailable, UNAVAILABLE_REPLY)
        }
        PipelineError::GenerationUnavailable(msg) => {
            warn!(error = %msg, "generation unavailable; answering with apology");
            Answer::rejected(RejectReason::GenerationUnavailable, UNAVAILABLE_REPLY)
        }
        PipelineError::Timeout(after) => {
            warn!(after_ms = after.as_millis(), "answer deadline exceeded");
            Answer::rejected(RejectReason::Timeout, TIMEOUT_REPLY)
        }
        other @ (PipelineError::Index(_) | PipelineError::Config(_)) => {
            warn!(error = %other, "unexpected pipeline failure");
            Answer::rejected(RejectReason::Internal, INTERNAL_REPLY)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rag_index::{
        ChunkerConfig, DistanceMetric, EmbedderKind, EmbeddingsProvider, HashingEmbedder,
        IndexError, IndexSource, NoopProgress,
    };

    use crate::llm::CompletionProvider;

    const PLANS: &str = "Plan A costs $10/mo. Plan B costs $20/mo.";

    /// Records prompts and answers with a fixed reply.
    struct Recording {
        reply: &'static str,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl Recording {
        fn new(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply,
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    impl CompletionProvider for Recording {
        fn complete<'a>(
            &'a self,
            prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, PipelineError>> + Send + 'a>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.prompts.lock().unwrap().push(prompt.to_string());
                Ok(self.reply.to_string())
            })
        }
    }

    struct Failing;

    impl CompletionProvider for Failing {
        fn complete<'a>(
            &'a self,
            _prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, PipelineError>> + Send + 'a>> {
            Box::pin(async { Err(PipelineError::GenerationUnavailable("connection refused".into())) })
        }
    }

    struct Slow;

    impl CompletionProvider for Slow {
        fn complete<'a>(
            &'a self,
            _prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, PipelineError>> + Send + 'a>> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok("too late".to_string())
            })
        }
    }

    /// Embeds documents fine, then goes away.
    struct Flaky {
        inner: HashingEmbedder,
        budget: AtomicUsize,
    }

    impl EmbeddingsProvider for Flaky {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
            Box::pin(async move {
                let spent = self
                    .budget
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
                if spent.is_err() {
                    return Err(IndexError::ModelUnavailable("embedding backend down".into()));
                }
                self.inner.embed(text).await
            })
        }

        fn dim(&self) -> usize {
            self.inner.dim()
        }

        fn model_id(&self) -> String {
            "flaky".into()
        }
    }

    fn answer_cfg(mode: AnswerMode) -> AnswerConfig {
        AnswerConfig {
            mode,
            max_distance: 0.7,
            ..AnswerConfig::default()
        }
    }

    fn small_chunks() -> ChunkerConfig {
        ChunkerConfig {
            chunk_size: 30,
            chunk_overlap: 5,
        }
    }

    async fn retriever_with(embedder: Arc<dyn EmbeddingsProvider>, corpus: &Corpus) -> Retriever {
        let chunker = Chunker::new(small_chunks()).unwrap();
        let index = IndexBootstrap::new("unused.json", DistanceMetric::Cosine, 2)
            .build(corpus, &chunker, embedder.as_ref(), &NoopProgress)
            .await
            .unwrap();
        Retriever::new(embedder, Arc::new(index))
    }

    async fn pipeline(mode: AnswerMode, completer: Arc<dyn CompletionProvider>) -> RagPipeline {
        let corpus = Corpus::from_text(PLANS);
        let embedder: Arc<dyn EmbeddingsProvider> = Arc::new(HashingEmbedder::new(4096).unwrap());
        let retriever = retriever_with(embedder, &corpus).await;
        RagPipeline::from_parts(
            answer_cfg(mode),
            PipelineParts {
                corpus,
                retriever: Some(retriever),
                generator: Some(AnswerGenerator::new(completer)),
                classifier: Classifier::default(),
                report: None,
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn answers_from_the_matching_passage() {
        let llm = Recording::new("Plan B costs $20 per month.");
        let p = pipeline(AnswerMode::Retrieval, llm.clone()).await;

        let a = p.answer_query("How much is Plan B?").await;
        assert_eq!(a.outcome, Outcome::Generated);
        assert!(a.text.contains("$20"));
        assert_eq!(a.context.len(), 1);
        assert_eq!(a.context[0].source_offset, 15);
        assert!(a.context[0].distance <= 0.7);

        let prompt = llm.last_prompt();
        assert!(prompt.contains("[1]\n0/mo. Plan B costs $20/mo."));
        assert!(!prompt.contains("[2]"));
        assert!(prompt.contains("How much is Plan B?"));
    }

    #[tokio::test]
    async fn empty_query_never_reaches_the_model() {
        let llm = Recording::new("unused");
        let p = pipeline(AnswerMode::Retrieval, llm.clone()).await;

        for q in ["", "   \n\t"] {
            let a = p.answer_query(q).await;
            assert_eq!(
                a.outcome,
                Outcome::Rejected {
                    reason: RejectReason::EmptyQuery
                }
            );
            assert_eq!(a.text, EMPTY_QUERY_REPLY);
        }
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn out_of_domain_question_is_refused_without_generation() {
        let llm = Recording::new("Paris");
        let p = pipeline(AnswerMode::Retrieval, llm.clone()).await;

        let a = p.answer_query("What is the capital of France?").await;
        assert_eq!(
            a.outcome,
            Outcome::Rejected {
                reason: RejectReason::NoRelevantContext
            }
        );
        assert_eq!(a.text, OUT_OF_DOMAIN_REPLY);
        assert!(a.context.is_empty());
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn greeting_gets_canned_reply() {
        let llm = Recording::new("unused");
        let p = pipeline(AnswerMode::Retrieval, llm.clone()).await;

        let a = p.answer_query("Hello!").await;
        assert!(matches!(a.outcome, Outcome::Canned { ref intent } if intent == "greeting"));
        assert!(!a.text.is_empty());
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn generation_failure_becomes_apology() {
        let p = pipeline(AnswerMode::Retrieval, Arc::new(Failing)).await;
        let a = p.answer_query("How much is Plan B?").await;
        assert_eq!(
            a.outcome,
            Outcome::Rejected {
                reason: RejectReason::GenerationUnavailable
            }
        );
        assert_eq!(a.text, UNAVAILABLE_REPLY);
    }

    #[tokio::test]
    async fn embedding_outage_becomes_apology() {
        let corpus = Corpus::from_text(PLANS);
        let flaky: Arc<dyn EmbeddingsProvider> = Arc::new(Flaky {
            inner: HashingEmbedder::new(4096).unwrap(),
            budget: AtomicUsize::new(2),
        });
        let retriever = retriever_with(flaky, &corpus).await;
        let llm = Recording::new("unused");
        let p = RagPipeline::from_parts(
            answer_cfg(AnswerMode::Retrieval),
            PipelineParts {
                corpus,
                retriever: Some(retriever),
                generator: Some(AnswerGenerator::new(llm.clone())),
                classifier: Classifier::default(),
                report: None,
            },
        )
        .unwrap();

        let a = p.answer_query("How much is Plan B?").await;
        assert_eq!(
            a.outcome,
            Outcome::Rejected {
                reason: RejectReason::ModelUnavailable
            }
        );
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn slow_generation_times_out() {
        let p = pipeline(AnswerMode::Retrieval, Arc::new(Slow)).await;
        let a = p
            .answer_query_within("How much is Plan B?", Duration::from_millis(50))
            .await;
        assert_eq!(
            a.outcome,
            Outcome::Rejected {
                reason: RejectReason::Timeout
            }
        );
        assert_eq!(a.text, TIMEOUT_REPLY);
    }

    #[tokio::test]
    async fn full_corpus_mode_sends_everything() {
        let llm = Recording::new("Plan A is $10 and Plan B is $20.");
        let p = pipeline(AnswerMode::FullCorpus, llm.clone()).await;

        let a = p.answer_query("What plans are there?").await;
        assert_eq!(a.outcome, Outcome::Generated);
        assert!(a.context.is_empty());
        assert!(llm.last_prompt().contains(PLANS));
    }

    #[tokio::test]
    async fn full_corpus_mode_sends_facts_past_the_context_budget() {
        let text = format!("{} Plan Z costs $99/mo.", "About our company. ".repeat(500));
        let llm = Recording::new("Plan Z costs $99 per month.");
        let p = RagPipeline::from_parts(
            answer_cfg(AnswerMode::FullCorpus),
            PipelineParts {
                corpus: Corpus::from_text(text),
                retriever: None,
                generator: Some(AnswerGenerator::new(llm.clone())),
                classifier: Classifier::default(),
                report: None,
            },
        )
        .unwrap();

        let a = p.answer_query("How much is Plan Z?").await;
        assert_eq!(a.outcome, Outcome::Generated);
        assert!(llm.last_prompt().contains("Plan Z costs $99/mo."));
    }

    #[tokio::test]
    async fn extractive_mode_returns_best_passage() {
        let corpus = Corpus::from_text(PLANS);
        let embedder: Arc<dyn EmbeddingsProvider> = Arc::new(HashingEmbedder::new(4096).unwrap());
        let retriever = retriever_with(embedder, &corpus).await;
        let p = RagPipeline::from_parts(
            answer_cfg(AnswerMode::Extractive),
            PipelineParts {
                corpus,
                retriever: Some(retriever),
                generator: None,
                classifier: Classifier::default(),
                report: None,
            },
        )
        .unwrap();

        let a = p.answer_query("How much is Plan B?").await;
        assert_eq!(a.outcome, Outcome::Extracted);
        assert!(a.text.contains("Plan B costs $20/mo."));
    }

    #[tokio::test]
    async fn missing_components_are_rejected_at_construction() {
        let parts = || PipelineParts {
            corpus: Corpus::from_text(PLANS),
            retriever: None,
            generator: None,
            classifier: Classifier::default(),
            report: None,
        };
        assert!(matches!(
            RagPipeline::from_parts(answer_cfg(AnswerMode::Retrieval), parts()),
            Err(PipelineError::Config(_))
        ));
        assert!(matches!(
            RagPipeline::from_parts(answer_cfg(AnswerMode::FullCorpus), parts()),
            Err(PipelineError::Config(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_questions_share_one_pipeline() {
        let llm = Recording::new("Plan B costs $20 per month.");
        let p = Arc::new(pipeline(AnswerMode::Retrieval, llm.clone()).await);

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let p = p.clone();
                tokio::spawn(async move { p.answer_query("How much is Plan B?").await })
            })
            .collect();
        for t in tasks {
            assert_eq!(t.await.unwrap().outcome, Outcome::Generated);
        }
        assert_eq!(llm.calls(), 8);
    }

    #[tokio::test]
    async fn truncated_index_is_rebuilt_on_startup() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_path = dir.path().join("website_content.txt");
        std::fs::write(&corpus_path, PLANS).unwrap();
        let index_cfg = IndexConfig {
            corpus_path,
            index_path: dir.path().join("index.json"),
            chunker: small_chunks(),
            metric: DistanceMetric::Cosine,
            embedder: EmbedderKind::Hashing,
            embedding_dim: Some(4096),
            embedding_concurrency: 2,
        };
        let cfg = answer_cfg(AnswerMode::Extractive);

        let first = RagPipeline::bootstrap(&index_cfg, cfg.clone(), None, &NoopProgress)
            .await
            .unwrap();
        assert_eq!(first.report().map(|r| r.source), Some(IndexSource::Built));
        assert_eq!(first.index_entries(), 2);

        let raw = std::fs::read(&index_cfg.index_path).unwrap();
        std::fs::write(&index_cfg.index_path, &raw[..raw.len() / 2]).unwrap();

        let second = RagPipeline::bootstrap(&index_cfg, cfg.clone(), None, &NoopProgress)
            .await
            .unwrap();
        assert_eq!(second.report().map(|r| r.source), Some(IndexSource::Rebuilt));
        let a = second.answer_query("How much is Plan B?").await;
        assert!(a.text.contains("$20"));

        let third = RagPipeline::bootstrap(&index_cfg, cfg, None, &NoopProgress)
            .await
            .unwrap();
        assert_eq!(third.report().map(|r| r.source), Some(IndexSource::Loaded));
    }

    #[tokio::test]
    async fn generating_modes_need_a_chat_model() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_path = dir.path().join("website_content.txt");
        std::fs::write(&corpus_path, PLANS).unwrap();
        let index_cfg = IndexConfig {
            corpus_path,
            index_path: dir.path().join("index.json"),
            ..IndexConfig::default()
        };

        let err = RagPipeline::bootstrap(
            &index_cfg,
            answer_cfg(AnswerMode::FullCorpus),
            None,
            &NoopProgress,
        )
        .await
        .err();
        assert!(matches!(err, Some(PipelineError::Config(_))));
    }

    #[tokio::test]
    async fn bootstrap_runs_inside_a_spawned_task() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_path = dir.path().join("website_content.txt");
        std::fs::write(&corpus_path, PLANS).unwrap();
        let index_cfg = IndexConfig {
            corpus_path,
            index_path: dir.path().join("index.json"),
            chunker: small_chunks(),
            ..IndexConfig::default()
        };
        let cfg = answer_cfg(AnswerMode::Extractive);

        let handle = tokio::spawn(async move {
            RagPipeline::bootstrap(&index_cfg, cfg, None, &NoopProgress).await
        });
        let p = handle.await.unwrap().unwrap();
        assert_eq!(p.report().map(|r| r.source), Some(IndexSource::Built));
    }
}
