//! Cycle scheduler
//!
//! One supervised task drives the recurring cycle:
//! `Selecting → Processing → Cooling → Selecting …` until a stop request.
//! Candidates fan out with bounded concurrency; each candidate's pipeline is
//! strictly sequential and its failures stay contained to that candidate.
//! A stop request is observed between cycles and between candidates —
//! already-dispatched external calls run to completion.

use crate::analysis::AnalysisAggregator;
use crate::config::EngineConfig;
use crate::db::SignalDatabase;
use crate::decision::DecisionClient;
use crate::execution::{ExecutionError, RouteResolver, TradeExecutor};
use crate::metrics::Metrics;
use crate::models::execution::ExecutionStatus;
use crate::models::signal::{SignalDirection, SignalStatus};
use crate::models::token::TokenCandidate;
use crate::services::market_data::MarketDataProvider;
use crate::services::universe::TokenUniverseSelector;
use crate::signals::{GateOutcome, RejectReason, RiskGate, SignalPublisher};
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Selecting,
    Processing,
    Cooling,
    Stopped,
}

/// Shared service handles for one engine instance, constructed at startup
/// and passed by reference into every stage.
pub struct EngineContext {
    pub market_data: Arc<dyn MarketDataProvider>,
    pub analyzer: AnalysisAggregator,
    pub decision: DecisionClient,
    pub gate: RiskGate,
    pub publisher: SignalPublisher,
    pub router: RouteResolver,
    pub executor: TradeExecutor,
    pub database: Option<Arc<SignalDatabase>>,
    pub metrics: Option<Arc<Metrics>>,
}

pub struct CycleScheduler {
    context: Arc<EngineContext>,
    selector: Arc<TokenUniverseSelector>,
    config: EngineConfig,
    state: Arc<RwLock<EngineState>>,
    shutdown: watch::Sender<bool>,
    handle: RwLock<Option<tokio::task::JoinHandle<()>>>,
}

impl CycleScheduler {
    pub fn new(
        context: Arc<EngineContext>,
        selector: Arc<TokenUniverseSelector>,
        config: EngineConfig,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            context,
            selector,
            config,
            state: Arc::new(RwLock::new(EngineState::Idle)),
            shutdown,
            handle: RwLock::new(None),
        }
    }

    /// Start the scheduling task.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut handle = self.handle.write().await;
        if handle.is_some() {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "Scheduler already running",
            )));
        }

        let context = self.context.clone();
        let selector = self.selector.clone();
        let config = self.config.clone();
        let state = self.state.clone();
        let shutdown_rx = self.shutdown.subscribe();

        *handle = Some(tokio::spawn(async move {
            run_loop(context, selector, config, state, shutdown_rx).await;
        }));

        info!(
            cycle_interval = self.config.cycle_interval.as_secs(),
            max_concurrency = self.config.max_concurrency,
            "CycleScheduler: started"
        );
        Ok(())
    }

    /// Request a stop and wait for the loop to finish its observation point.
    /// The task is joined, not aborted, so dispatched work completes.
    pub async fn stop(&self) {
        let _ = self.shutdown.send(true);
        let handle = {
            let mut guard = self.handle.write().await;
            guard.take()
        };
        if let Some(h) = handle {
            if let Err(e) = h.await {
                error!(error = %e, "CycleScheduler: task join error");
            }
            info!("CycleScheduler: stopped");
        }
    }

    pub async fn state(&self) -> EngineState {
        *self.state.read().await
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}

async fn set_state(state: &Arc<RwLock<EngineState>>, next: EngineState) {
    let mut guard = state.write().await;
    *guard = next;
}

async fn run_loop(
    context: Arc<EngineContext>,
    selector: Arc<TokenUniverseSelector>,
    config: EngineConfig,
    state: Arc<RwLock<EngineState>>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        set_state(&state, EngineState::Selecting).await;
        let candidates = selector.select().await;

        if candidates.is_empty() {
            warn!(
                cooldown = config.error_cooldown.as_secs(),
                "No candidates obtainable this cycle, cooling down for {}s",
                config.error_cooldown.as_secs()
            );
            set_state(&state, EngineState::Cooling).await;
            if cooldown(&mut shutdown_rx, config.error_cooldown).await {
                break;
            }
            continue;
        }

        info!(
            candidate_count = candidates.len(),
            "Processing cycle with {} candidates",
            candidates.len()
        );
        set_state(&state, EngineState::Processing).await;

        let ctx = &context;
        let cfg = &config;
        let shutdown = &shutdown_rx;
        futures_util::stream::iter(candidates)
            .for_each_concurrent(config.max_concurrency, |candidate| async move {
                // Stop requests take effect before the next candidate
                // starts, never mid-pipeline.
                if *shutdown.borrow() {
                    return;
                }

                let started = Instant::now();
                let symbol = candidate.symbol.clone();
                if let Some(ref m) = ctx.metrics {
                    m.candidates_processed_total.inc();
                }

                if let Err(e) = process_candidate(ctx, cfg, candidate).await {
                    warn!(
                        symbol = %symbol,
                        error = %e,
                        "Dropping {} from this cycle after pipeline failure",
                        symbol
                    );
                    if let Some(ref m) = ctx.metrics {
                        m.candidate_failures_total.inc();
                    }
                }

                if let Some(ref m) = ctx.metrics {
                    m.pipeline_duration_seconds
                        .observe(started.elapsed().as_secs_f64());
                }
            })
            .await;

        if let Some(ref db) = context.database {
            match db.expire_stale_signals(config.signal_max_age).await {
                Ok(expired) if expired > 0 => {
                    debug!(expired = expired, "Expired {} stale signals", expired);
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Failed to expire stale signals"),
            }
        }

        if let Some(ref m) = context.metrics {
            m.cycles_total.inc();
        }

        set_state(&state, EngineState::Cooling).await;
        if cooldown(&mut shutdown_rx, config.cycle_interval).await {
            break;
        }
    }

    set_state(&state, EngineState::Stopped).await;
}

/// Sleep for the cooling period, waking early on shutdown.
/// Returns true when a stop was requested.
async fn cooldown(shutdown_rx: &mut watch::Receiver<bool>, period: std::time::Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(period) => {}
        _ = shutdown_rx.changed() => {}
    }
    *shutdown_rx.borrow()
}

/// Drive one candidate through the full pipeline. Every stage uses this
/// cycle's snapshot; failures bubble to the caller where they are logged
/// and contained.
async fn process_candidate(
    ctx: &EngineContext,
    config: &EngineConfig,
    candidate: TokenCandidate,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let snapshot = ctx.market_data.get_snapshot(&candidate.mint).await;
    let analysis = ctx.analyzer.analyze(&candidate).await;
    let decision = ctx.decision.decide(&candidate, &snapshot, &analysis).await;

    let signal = match ctx.gate.evaluate(&candidate, &snapshot, &analysis, &decision) {
        GateOutcome::Rejected(reason) => {
            debug!(
                symbol = %candidate.symbol,
                reason = reason.as_str(),
                confidence = decision.confidence,
                risk_score = decision.risk_score,
                "Gate rejected {} ({})",
                candidate.symbol,
                reason.as_str()
            );
            if let Some(ref m) = ctx.metrics {
                m.signals_rejected_total
                    .with_label_values(&[reason.as_str()])
                    .inc();
            }
            if reason == RejectReason::HighRisk {
                ctx.publisher.publish_risk_alert(&candidate, &decision).await;
            }
            return Ok(());
        }
        GateOutcome::Accepted(signal) => signal,
    };

    if let Some(ref m) = ctx.metrics {
        m.signals_generated_total.inc();
    }
    info!(
        symbol = %candidate.symbol,
        direction = %signal.direction,
        confidence = signal.confidence,
        "Generated {} signal for {} (confidence: {:.2})",
        signal.direction,
        candidate.symbol,
        signal.confidence
    );

    let signal_id = ctx.publisher.persist_and_publish(&signal).await;

    if !config.execution_enabled {
        return Ok(());
    }
    // A fallback snapshot means we never saw a real price this cycle;
    // generation may proceed on the model's conservatism but execution
    // does not.
    if snapshot.is_fallback {
        warn!(
            symbol = %candidate.symbol,
            "Skipping execution for {}: snapshot is a fallback",
            candidate.symbol
        );
        return Ok(());
    }

    let (input_mint, output_mint) = match signal.direction {
        SignalDirection::Buy => (config.quote_mint.as_str(), candidate.mint.as_str()),
        SignalDirection::Sell => (candidate.mint.as_str(), config.quote_mint.as_str()),
    };

    let route = match ctx
        .router
        .resolve(input_mint, output_mint, config.trade_amount, config.max_slippage_bps)
        .await
    {
        Ok(route) => route,
        Err(e) => {
            warn!(
                symbol = %candidate.symbol,
                error = %e,
                "No route for {}, deferring to next cycle",
                candidate.symbol
            );
            if let Some(ref m) = ctx.metrics {
                m.route_failures_total.inc();
            }
            return Ok(());
        }
    };

    match ctx.executor.execute(&candidate.mint, route).await {
        Ok(receipt) => {
            if receipt.status == ExecutionStatus::Success {
                if let (Some(db), Some(id)) = (&ctx.database, signal_id) {
                    db.update_signal_status(id, SignalStatus::Executed).await?;
                }
            }
        }
        Err(ExecutionError::AlreadyInFlight(mint)) => {
            info!(
                mint = %mint,
                "Execution already in flight for {}, skipping",
                candidate.symbol
            );
        }
        Err(e) => return Err(Box::new(e)),
    }

    Ok(())
}
