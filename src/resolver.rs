//! Tiered Plant Resolution
//!
//! Resolves a free-text plant query against data sources of increasing cost:
//!
//!   START -> LOCAL_LOOKUP -> REMOTE_CACHE_LOOKUP -> REMOTE_SEARCH -> AI_SUGGEST
//!         -> RESOLVED | NOT_FOUND
//!
//! The first tier with a hit ends resolution. A generated suggestion buys one
//! extra pass through the local and remote tiers under the suggested name
//! (stricter fuzzy threshold, no second suggestion). Collaborator failures
//! and timeouts count as misses; only an empty query is rejected.
//!
//! One resolver is built per application and shared by handle. The local
//! index is immutable and the remote cache is last-writer-wins, so
//! concurrent `resolve` calls need no extra locking.

use crate::config::PlannerConfig;
use crate::error::{CollaboratorError, ResolveError};
use crate::local_index::{match_name, LocalIndex};
use crate::record::{normalize_name, PlantRecord, SourceTier};
use crate::remote::{HttpRecordStore, RecordStore, RemoteCache};
use crate::suggest::{HttpSuggestionClient, SuggestionProvider};
use crate::utils::similarity::{AI_ASSIST_THRESHOLD, FUZZY_THRESHOLD};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionStage {
    Start,
    LocalLookup,
    RemoteCacheLookup,
    RemoteSearch,
    AiSuggest,
    Resolved,
    NotFound,
}

impl ResolutionStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, ResolutionStage::Resolved | ResolutionStage::NotFound)
    }
}

/// What a stage produced: a record (or, for AI_SUGGEST, a usable name) or nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Hit,
    Miss,
}

/// Pure transition function
///
/// `assisted` is true once a generated suggestion has been taken, which
/// turns a final remote miss into NOT_FOUND instead of another AI call.
pub fn next_stage(stage: ResolutionStage, outcome: StageOutcome, assisted: bool) -> ResolutionStage {
    use ResolutionStage::*;
    use StageOutcome::*;

    match (stage, outcome) {
        (Start, _) => LocalLookup,
        (LocalLookup, Hit) | (RemoteCacheLookup, Hit) | (RemoteSearch, Hit) => Resolved,
        (LocalLookup, Miss) => RemoteCacheLookup,
        (RemoteCacheLookup, Miss) => RemoteSearch,
        (RemoteSearch, Miss) if assisted => NotFound,
        (RemoteSearch, Miss) => AiSuggest,
        (AiSuggest, Hit) => LocalLookup,
        (AiSuggest, Miss) => NotFound,
        (Resolved, _) => Resolved,
        (NotFound, _) => NotFound,
    }
}

/// Outcome of resolving one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionResult {
    pub query: String,
    pub matched_record: Option<PlantRecord>,
    /// Original query, present when the match was made under a corrected name
    pub corrected_from: Option<String>,
    /// Canonical name the query was corrected to
    pub suggested_name: Option<String>,
    /// Tier that produced the match; `Generated` when reached through a suggestion
    pub source_tier: Option<SourceTier>,
    /// Stages visited, in order
    pub trace: Vec<ResolutionStage>,
}

impl ResolutionResult {
    pub fn is_found(&self) -> bool {
        self.matched_record.is_some()
    }

    pub fn final_stage(&self) -> ResolutionStage {
        if self.is_found() {
            ResolutionStage::Resolved
        } else {
            ResolutionStage::NotFound
        }
    }
}

#[derive(Debug, Clone)]
struct TierHit {
    record: PlantRecord,
    tier: SourceTier,
    suggested_name: Option<String>,
}

pub struct PlantResolver {
    local: Arc<LocalIndex>,
    store: Option<Arc<dyn RecordStore>>,
    cache: RemoteCache,
    suggester: Option<Arc<dyn SuggestionProvider>>,
    tier_timeout: Duration,
    search_limit: usize,
}

impl PlantResolver {
    pub fn new(local: Arc<LocalIndex>) -> Self {
        let defaults = PlannerConfig::default();
        Self {
            local,
            store: None,
            cache: RemoteCache::new(defaults.remote_cache_capacity),
            suggester: None,
            tier_timeout: defaults.tier_timeout(),
            search_limit: defaults.remote_search_limit,
        }
    }

    /// Build with HTTP collaborators for whichever endpoints are configured
    pub fn from_config(config: &PlannerConfig, local: Arc<LocalIndex>) -> Result<Self, CollaboratorError> {
        let timeout = config.tier_timeout();
        let mut resolver = Self::new(local)
            .with_tier_timeout(timeout)
            .with_cache_capacity(config.remote_cache_capacity)
            .with_search_limit(config.remote_search_limit);

        if let Some(url) = &config.record_store_url {
            tracing::info!("Remote record store: {}", url);
            resolver = resolver.with_record_store(Arc::new(HttpRecordStore::new(url, timeout)?));
        } else {
            tracing::info!("Remote record store not configured, tier disabled");
        }

        if let Some(url) = &config.suggest_url {
            tracing::info!("Suggestion endpoint: {} (model {})", url, config.suggest_model);
            let client = HttpSuggestionClient::new(
                url,
                config.suggest_api_key.clone(),
                &config.suggest_model,
                timeout,
            )?;
            resolver = resolver.with_suggester(Arc::new(client));
        } else {
            tracing::info!("Suggestion endpoint not configured, AI tier disabled");
        }

        Ok(resolver)
    }

    pub fn with_record_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_suggester(mut self, suggester: Arc<dyn SuggestionProvider>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    pub fn with_tier_timeout(mut self, timeout: Duration) -> Self {
        self.tier_timeout = timeout;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache = RemoteCache::new(capacity);
        self
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit.max(1);
        self
    }

    pub fn local_index(&self) -> &LocalIndex {
        &self.local
    }

    pub fn remote_cache(&self) -> &RemoteCache {
        &self.cache
    }

    /// Run the tier state machine for one query
    pub async fn resolve(&self, query: &str) -> Result<ResolutionResult, ResolveError> {
        let original = query.trim();
        if original.is_empty() {
            return Err(ResolveError::InvalidQuery);
        }

        let mut stage = ResolutionStage::Start;
        let mut name = original.to_string();
        let mut assisted = false;
        let mut trace = Vec::new();
        let mut hit: Option<TierHit> = None;

        while !stage.is_terminal() {
            trace.push(stage);
            let threshold = if assisted { AI_ASSIST_THRESHOLD } else { FUZZY_THRESHOLD };

            let outcome = match stage {
                ResolutionStage::Start => StageOutcome::Hit,
                ResolutionStage::LocalLookup => {
                    hit = self.lookup_local(&name, threshold);
                    outcome_of(hit.is_some())
                }
                ResolutionStage::RemoteCacheLookup => {
                    hit = self.lookup_cache(&name, threshold).await;
                    outcome_of(hit.is_some())
                }
                ResolutionStage::RemoteSearch => {
                    hit = self.search_remote(&name, threshold).await;
                    outcome_of(hit.is_some())
                }
                ResolutionStage::AiSuggest => match self.ask_suggester(original).await {
                    Some(suggested) => {
                        tracing::debug!("Retrying '{}' as suggested name '{}'", original, suggested);
                        name = suggested;
                        assisted = true;
                        StageOutcome::Hit
                    }
                    None => StageOutcome::Miss,
                },
                ResolutionStage::Resolved | ResolutionStage::NotFound => break,
            };

            let next = next_stage(stage, outcome, assisted);
            tracing::debug!("Resolution '{}': {:?} -> {:?}", original, stage, next);
            stage = next;
        }
        trace.push(stage);

        let Some(hit) = hit else {
            tracing::info!("No plant found for '{}'", original);
            return Ok(ResolutionResult {
                query: original.to_string(),
                matched_record: None,
                corrected_from: None,
                suggested_name: None,
                source_tier: None,
                trace,
            });
        };

        let (source_tier, suggested_name) = if assisted {
            let changed = normalize_name(&hit.record.name) != normalize_name(original);
            (SourceTier::Generated, changed.then(|| hit.record.name.clone()))
        } else {
            (hit.tier, hit.suggested_name)
        };
        let corrected_from = suggested_name.as_ref().map(|_| original.to_string());

        tracing::debug!(
            "Resolved '{}' to '{}' via {} tier",
            original,
            hit.record.name,
            source_tier
        );

        Ok(ResolutionResult {
            query: original.to_string(),
            matched_record: Some(hit.record),
            corrected_from,
            suggested_name,
            source_tier: Some(source_tier),
            trace,
        })
    }

    fn lookup_local(&self, name: &str, threshold: f64) -> Option<TierHit> {
        let found = self.local.find(name, threshold)?;
        Some(TierHit {
            suggested_name: found.suggested_name(name),
            record: found.record.clone(),
            tier: SourceTier::Local,
        })
    }

    async fn lookup_cache(&self, name: &str, threshold: f64) -> Option<TierHit> {
        let (record, suggested_name) = self.cache.lookup(name, threshold).await?;
        tracing::debug!("Remote cache hit for '{}'", name);
        Some(TierHit { record, tier: SourceTier::Remote, suggested_name })
    }

    async fn search_remote(&self, name: &str, threshold: f64) -> Option<TierHit> {
        let store = self.store.as_ref()?;
        let records = self
            .bounded("remote search", store.search(name, self.search_limit))
            .await?;

        // First result is authoritative
        let mut record = records.into_iter().next()?;
        record.source_tier = SourceTier::Remote;
        self.cache.insert(record.clone()).await;

        // Same exact / contains / fuzzy classification as the other tiers
        let suggested_name = match_name(name, std::slice::from_ref(&record), threshold)
            .and_then(|hit| hit.suggested_name(name));

        Some(TierHit { record, tier: SourceTier::Remote, suggested_name })
    }

    async fn ask_suggester(&self, original: &str) -> Option<String> {
        let suggester = self.suggester.as_ref()?;
        let suggested = self
            .bounded("name suggestion", suggester.suggest(original))
            .await??;

        let suggested = suggested.trim().to_string();
        if suggested.is_empty() || normalize_name(&suggested) == normalize_name(original) {
            return None;
        }
        Some(suggested)
    }

    /// Await a collaborator call under the per-tier timeout; failures become `None`
    async fn bounded<T, F>(&self, what: &str, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, CollaboratorError>>,
    {
        match tokio::time::timeout(self.tier_timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                tracing::warn!("{} failed: {}", what, e);
                None
            }
            Err(_) => {
                tracing::warn!("{} failed: {}", what, self.timeout_error());
                None
            }
        }
    }

    fn timeout_error(&self) -> CollaboratorError {
        CollaboratorError::Timeout(u64::try_from(self.tier_timeout.as_millis()).unwrap_or(u64::MAX))
    }
}

fn outcome_of(found: bool) -> StageOutcome {
    if found {
        StageOutcome::Hit
    } else {
        StageOutcome::Miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ResolutionStage::*;
    use StageOutcome::*;

    #[test]
    fn test_transitions_plain_path() {
        assert_eq!(next_stage(Start, Miss, false), LocalLookup);
        assert_eq!(next_stage(LocalLookup, Hit, false), Resolved);
        assert_eq!(next_stage(LocalLookup, Miss, false), RemoteCacheLookup);
        assert_eq!(next_stage(RemoteCacheLookup, Hit, false), Resolved);
        assert_eq!(next_stage(RemoteCacheLookup, Miss, false), RemoteSearch);
        assert_eq!(next_stage(RemoteSearch, Hit, false), Resolved);
        assert_eq!(next_stage(RemoteSearch, Miss, false), AiSuggest);
    }

    #[test]
    fn test_transitions_assisted_round() {
        assert_eq!(next_stage(AiSuggest, Hit, true), LocalLookup);
        assert_eq!(next_stage(AiSuggest, Miss, false), NotFound);
        assert_eq!(next_stage(LocalLookup, Miss, true), RemoteCacheLookup);
        // No second suggestion
        assert_eq!(next_stage(RemoteSearch, Miss, true), NotFound);
    }

    #[test]
    fn test_terminal_states_absorb() {
        assert_eq!(next_stage(Resolved, Miss, false), Resolved);
        assert_eq!(next_stage(NotFound, Hit, true), NotFound);
        assert!(Resolved.is_terminal());
        assert!(!AiSuggest.is_terminal());
    }

    #[test]
    fn test_timeout_error_reports_millis() {
        let resolver = PlantResolver::new(Arc::new(LocalIndex::empty()))
            .with_tier_timeout(Duration::from_millis(250));
        assert!(matches!(resolver.timeout_error(), CollaboratorError::Timeout(250)));

        let unbounded = PlantResolver::new(Arc::new(LocalIndex::empty())).with_tier_timeout(Duration::MAX);
        assert!(matches!(unbounded.timeout_error(), CollaboratorError::Timeout(u64::MAX)));
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let resolver = PlantResolver::new(Arc::new(LocalIndex::empty()));
        assert_eq!(resolver.resolve("   ").await, Err(ResolveError::InvalidQuery));
    }

    #[tokio::test]
    async fn test_not_found_without_collaborators() {
        let resolver = PlantResolver::new(Arc::new(LocalIndex::empty()));
        let result = resolver.resolve("Xyzzyplant").await.unwrap();
        assert!(!result.is_found());
        assert_eq!(result.final_stage(), NotFound);
        assert_eq!(
            result.trace,
            vec![Start, LocalLookup, RemoteCacheLookup, RemoteSearch, AiSuggest, NotFound]
        );
    }
}
