//! Simulated collaborators backing the demo shell.
//!
//! Everything here is synthesized: a fixed three-source corpus, canned
//! reply templates and an upload "processor" that just waits. Latency and
//! failure rates come from config so the error paths can be exercised.

use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;

use super::collaborators::{ReplyGenerator, Retriever, UploadProcessor};
use super::error::{CollaboratorError, Result};
use super::latency::Latency;
use super::models::{
    FileHandle, ResearchContext, SearchMode, SearchOutcome, SourceKind, SourceRecord,
};

const SUMMARY: &str = "Based on the available research, artificial intelligence is playing an \
increasingly crucial role in addressing climate change through multiple pathways. Machine learning \
algorithms are being successfully applied to improve climate modeling accuracy, enhance weather \
prediction systems, and optimize renewable energy distribution. The integration of AI in \
environmental monitoring has enabled real-time analysis of satellite data and sensor networks, \
providing early warning systems for extreme weather events. Recent studies show that AI-driven \
optimization can reduce energy consumption by up to 15% in smart grid systems, while machine \
learning models have improved climate forecasting accuracy by 23% compared to traditional methods.";

/// The fixed corpus every simulated search draws from.
pub fn sample_sources() -> Vec<SourceRecord> {
    vec![
        SourceRecord {
            id: "1".into(),
            title: "Machine Learning in Climate Science: A Comprehensive Review".into(),
            kind: SourceKind::Academic,
            snippet: "Recent advances in machine learning have revolutionized climate modeling \
                      and prediction. This paper reviews current applications of ML in climate \
                      science, including ensemble forecasting, extreme weather prediction, and \
                      climate change attribution."
                .into(),
            relevance_score: 95,
            credibility_score: 92,
            author: Some("Dr. Sarah Chen et al.".into()),
            published_date: Some("2024-03-15".into()),
            citation_count: Some(127),
            url: Some("https://journal.example.com/ml-climate".into()),
        },
        SourceRecord {
            id: "2".into(),
            title: "AI for Environmental Monitoring".into(),
            kind: SourceKind::Document,
            snippet: "Artificial intelligence technologies are increasingly being deployed for \
                      real-time environmental monitoring systems. These systems can process \
                      satellite imagery, sensor data, and weather patterns to provide early \
                      warnings for environmental threats."
                .into(),
            relevance_score: 88,
            credibility_score: 85,
            author: Some("Environmental Research Institute".into()),
            published_date: Some("2024-02-28".into()),
            citation_count: None,
            url: None,
        },
        SourceRecord {
            id: "3".into(),
            title: "Climate AI Initiative - Latest Developments".into(),
            kind: SourceKind::Web,
            snippet: "The Climate AI Initiative announces breakthrough developments in using \
                      artificial intelligence for carbon footprint reduction and climate \
                      adaptation strategies."
                .into(),
            relevance_score: 82,
            credibility_score: 78,
            author: Some("Climate AI Consortium".into()),
            published_date: Some("2024-04-02".into()),
            citation_count: None,
            url: Some("https://climate-ai.org/news".into()),
        },
    ]
}

/// Roll against a failure rate, clamped to a valid probability.
fn roll_failure(rate: f64) -> bool {
    let rate = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };
    rate > 0.0 && rand::thread_rng().gen_bool(rate)
}

// ============================================================================
// Retrieval
// ============================================================================

pub struct SimulatedRetriever {
    latency: Arc<dyn Latency>,
}

impl SimulatedRetriever {
    pub fn new(latency: Arc<dyn Latency>) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Retriever for SimulatedRetriever {
    async fn search(&self, query: String, mode: SearchMode) -> Result<SearchOutcome> {
        let delay = self.latency.sample();
        log::debug!("Simulated search for {query:?} ({mode}) resolving in {delay:?}");
        tokio::time::sleep(delay).await;

        let sources = sample_sources()
            .into_iter()
            .filter(|s| mode.admits(s.kind))
            .collect();

        Ok(SearchOutcome {
            sources,
            summary: SUMMARY.to_string(),
        })
    }
}

// ============================================================================
// Replies
// ============================================================================

/// Canned assistant replies, each quoting the user's question.
pub fn reply_templates(user_text: &str) -> [String; 4] {
    [
        format!(
            "Based on the research sources I've analyzed, here are some key insights about your \
             question: \"{user_text}\". The data suggests several important trends that align with \
             current academic consensus. Would you like me to elaborate on any specific aspect?"
        ),
        format!(
            "That's an excellent follow-up question about \"{user_text}\". From the sources we \
             reviewed, I can provide you with several perspectives on this topic. The research \
             indicates some fascinating correlations that might interest you further."
        ),
        format!(
            "Great question! Regarding \"{user_text}\", the evidence from our sources points to \
             some compelling conclusions. I notice this connects well with your original research \
             topic. Let me break down the most relevant findings for you."
        ),
        format!(
            "Interesting angle on \"{user_text}\". The academic sources we have provide some \
             nuanced views on this. I can see how this relates to your broader research \
             interests. Would you like me to search for additional sources on this specific aspect?"
        ),
    ]
}

pub struct SimulatedReplyGenerator {
    latency: Arc<dyn Latency>,
    failure_rate: f64,
}

impl SimulatedReplyGenerator {
    pub fn new(latency: Arc<dyn Latency>, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate,
        }
    }
}

#[async_trait]
impl ReplyGenerator for SimulatedReplyGenerator {
    async fn generate_reply(
        &self,
        user_text: String,
        context: Option<ResearchContext>,
    ) -> Result<String> {
        tokio::time::sleep(self.latency.sample()).await;

        if roll_failure(self.failure_rate) {
            return Err(CollaboratorError::Reply("simulated reply failure".into()));
        }

        if let Some(ref ctx) = context {
            log::debug!(
                "Replying within context of {:?} ({} sources)",
                ctx.query,
                ctx.sources.len()
            );
        }

        let templates = reply_templates(&user_text);
        let reply = templates
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default();
        Ok(reply)
    }
}

// ============================================================================
// Uploads
// ============================================================================

pub struct SimulatedUploadProcessor {
    latency: Arc<dyn Latency>,
    failure_rate: f64,
}

impl SimulatedUploadProcessor {
    pub fn new(latency: Arc<dyn Latency>, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate,
        }
    }
}

#[async_trait]
impl UploadProcessor for SimulatedUploadProcessor {
    async fn process_upload(&self, files: Vec<FileHandle>) -> Result<()> {
        tokio::time::sleep(self.latency.sample()).await;

        if roll_failure(self.failure_rate) {
            return Err(CollaboratorError::Upload(format!(
                "simulated failure processing {} file(s)",
                files.len()
            )));
        }
        Ok(())
    }
}
