//! Polling daemon: fetch balances, evaluate rules, deliver alerts.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use ynab_client::{BalanceSource, ClientError};
use ynab_core::{Config, EvalWindow};
use ynab_notify::Dispatcher;
use ynab_rules::{
    EvalError, EvaluationAborted, Evaluator, LoadError, ObservationStore, RuleLoader, Snapshot,
    Timestamp, TracingSink, Trigger,
};

#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error("fetching balances failed: {0}")]
    Balances(#[from] ClientError),

    #[error("loading rules failed: {0}")]
    Rules(#[from] LoadError),

    #[error("evaluation aborted after {delivered} trigger(s): {source}")]
    Evaluation {
        #[source]
        source: EvalError,
        delivered: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick fell outside the evaluation window.
    Skipped,
    Evaluated {
        rules: usize,
        triggered: usize,
        failed_deliveries: usize,
    },
}

pub struct Service {
    source: Box<dyn BalanceSource>,
    budget_id: String,
    loader: RuleLoader,
    store: ObservationStore,
    dispatcher: Dispatcher,
    window: EvalWindow,
    poll_interval: Duration,
    debug: bool,
}

impl Service {
    pub fn new(
        config: &Config,
        source: Box<dyn BalanceSource>,
        store: ObservationStore,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            source,
            budget_id: config.budget_id.clone(),
            loader: RuleLoader::new(config.rules_dir.clone()),
            store,
            dispatcher,
            window: config.window,
            poll_interval: config.poll_interval,
            debug: config.debug,
        }
    }

    /// Tick immediately, then every poll interval until `shutdown` fires.
    /// Tick failures are logged and retried on the next tick.
    pub async fn run(&self, shutdown: &CancellationToken) {
        // `interval` panics on a zero period.
        let period = self.poll_interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    let now = chrono::Local::now().fixed_offset();
                    if let Err(e) = self.tick(now, shutdown).await {
                        error!(error = %e, "tick failed");
                    }
                }
            }
        }
    }

    /// Run one evaluation cycle at `now`.
    pub async fn tick(
        &self,
        now: Timestamp,
        cancel: &CancellationToken,
    ) -> Result<TickOutcome, TickError> {
        if !self.window.contains(now.time()) {
            debug!(window = %self.window, "outside evaluation window; skipping tick");
            return Ok(TickOutcome::Skipped);
        }

        debug!(budget = %self.budget_id, "fetching account balances");
        let balances = self.source.current_balances(&self.budget_id).await?;
        debug!(accounts = balances.len(), "loaded account balances");

        let rules = self.loader.load_all()?;
        let vars = self.store.snapshot();
        debug!(rules = rules.len(), vars = vars.len(), "loaded rules and observed variables");
        let snapshot = Snapshot::new(balances, now).with_vars(vars);

        let (triggers, aborted) = {
            let sink = TracingSink;
            let mut evaluator = Evaluator::new()
                .with_store(&self.store)
                .with_cancellation(cancel);
            if self.debug {
                evaluator = evaluator.with_diagnostics(&sink);
            }
            match evaluator.evaluate(&rules, snapshot) {
                Ok(triggers) => (triggers, None),
                Err(EvaluationAborted { triggers, error }) => (triggers, Some(error)),
            }
        };

        let failed_deliveries = self.deliver(&triggers).await;

        if let Some(source) = aborted {
            return Err(TickError::Evaluation {
                source,
                delivered: triggers.len(),
            });
        }

        info!("evaluated {} rule(s); {} triggered", rules.len(), triggers.len());
        Ok(TickOutcome::Evaluated {
            rules: rules.len(),
            triggered: triggers.len(),
            failed_deliveries,
        })
    }

    /// Dispatch every trigger; returns the number of failed deliveries.
    async fn deliver(&self, triggers: &[Trigger]) -> usize {
        let mut failed = 0;
        for trigger in triggers {
            debug!(rule = %trigger.rule.name, message = %trigger.message, "notifying");
            let results = self
                .dispatcher
                .dispatch(&trigger.rule.notify, &trigger.rule.name, &trigger.message)
                .await;
            for result in results.iter().filter(|r| !r.success) {
                failed += 1;
                warn!(
                    rule = %trigger.rule.name,
                    channel = %result.channel,
                    error = result.error.as_deref().unwrap_or("unknown"),
                    "notify failed"
                );
            }
        }
        failed
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::{NaiveTime, TimeZone, Utc};
    use tempfile::TempDir;
    use ynab_notify::{Notifier, NotifyError};

    use super::*;

    struct StubSource {
        balances: HashMap<String, i64>,
        calls: Arc<AtomicUsize>,
        fail: bool,
        cancel_on_call: Option<CancellationToken>,
    }

    #[async_trait::async_trait]
    impl BalanceSource for StubSource {
        async fn current_balances(
            &self,
            _budget_id: &str,
        ) -> Result<HashMap<String, i64>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(token) = &self.cancel_on_call {
                token.cancel();
            }
            if self.fail {
                return Err(ClientError::Status {
                    endpoint: "accounts",
                    status: reqwest::StatusCode::UNAUTHORIZED,
                });
            }
            Ok(self.balances.clone())
        }
    }

    #[derive(Default, Clone)]
    struct RecordingNotifier {
        sent: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait::async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, subject: &str, message: &str) -> Result<(), NotifyError> {
            self.sent
                .lock()
                .unwrap()
                .push((subject.to_string(), message.to_string()));
            Ok(())
        }
        fn channel_name(&self) -> &str {
            "recording"
        }
    }

    struct Harness {
        _dir: TempDir,
        service: Service,
        calls: Arc<AtomicUsize>,
        sent: Arc<Mutex<Vec<(String, String)>>>,
    }

    fn harness(
        rules_yaml: &str,
        fail: bool,
        window: EvalWindow,
        cancel_on_call: Option<CancellationToken>,
    ) -> Harness {
        let dir = TempDir::new().unwrap();
        let rules_dir = dir.path().join("rules");
        fs::create_dir(&rules_dir).unwrap();
        fs::write(rules_dir.join("rules.yaml"), rules_yaml).unwrap();

        let mut config = Config::load_with(None, &|_: &str| None).unwrap();
        config.budget_id = "budget-1".to_string();
        config.rules_dir = rules_dir;
        config.window = window;
        config.poll_interval = Duration::from_secs(3_600);

        let calls = Arc::new(AtomicUsize::new(0));
        let source = StubSource {
            balances: HashMap::from([("Checking".to_string(), 50_000)]),
            calls: calls.clone(),
            fail,
            cancel_on_call,
        };
        let notifier = RecordingNotifier::default();
        let sent = notifier.sent.clone();
        let store = ObservationStore::open(dir.path().join("obs.json")).unwrap();

        let service = Service::new(
            &config,
            Box::new(source),
            store,
            Dispatcher::new(Box::new(notifier)),
        );
        Harness {
            _dir: dir,
            service,
            calls,
            sent,
        }
    }

    fn at(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 10, h, m, 0)
            .unwrap()
            .fixed_offset()
    }

    const LOW_BALANCE: &str = r#"
- name: checking-low
  when:
    condition: account.balance("Checking") < 100
- name: checking-high
  when:
    condition: account.balance("Checking") > 100
"#;

    const ABORTS_ON_SECOND_RULE: &str = r#"
- name: checking-low
  when:
    condition: account.balance("Checking") < 100
- name: broken
  when:
    condition: account.balance("Missing") < 1
- name: never-reached
  when:
    condition: 1 < 2
"#;

    #[tokio::test]
    async fn tick_delivers_each_trigger() {
        let h = harness(LOW_BALANCE, false, EvalWindow::default(), None);

        let outcome = h.service.tick(at(12, 0), &CancellationToken::new()).await.unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Evaluated {
                rules: 2,
                triggered: 1,
                failed_deliveries: 0
            }
        );

        let sent = h.sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![(
                "checking-low".to_string(),
                r#"Rule checking-low triggered: account.balance("Checking") < 100"#.to_string()
            )]
        );
    }

    #[tokio::test]
    async fn tick_outside_window_does_nothing() {
        let window = EvalWindow {
            start: NaiveTime::from_hms_opt(6, 0, 0),
            end: NaiveTime::from_hms_opt(22, 0, 0),
        };
        let h = harness(LOW_BALANCE, false, window, None);
        let cancel = CancellationToken::new();

        let outcome = h.service.tick(at(23, 0), &cancel).await.unwrap();
        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);

        let outcome = h.service.tick(at(6, 0), &cancel).await.unwrap();
        assert!(matches!(outcome, TickOutcome::Evaluated { .. }));
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn aborted_cycle_still_delivers_earlier_triggers() {
        let h = harness(ABORTS_ON_SECOND_RULE, false, EvalWindow::default(), None);

        let err = h
            .service
            .tick(at(12, 0), &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            TickError::Evaluation { source, delivered } => {
                assert_eq!(delivered, 1);
                assert_eq!(source.rule(), "broken");
            }
            other => panic!("expected evaluation error, got {other:?}"),
        }
        assert_eq!(h.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn balance_failure_skips_evaluation() {
        let h = harness(LOW_BALANCE, true, EvalWindow::default(), None);

        let err = h
            .service
            .tick(at(12, 0), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TickError::Balances(_)));
        assert!(h.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_stops_when_already_cancelled() {
        let h = harness(LOW_BALANCE, false, EvalWindow::default(), None);
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        h.service.run(&shutdown).await;
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn run_ticks_immediately_then_honours_shutdown() {
        let shutdown = CancellationToken::new();
        let h = harness(LOW_BALANCE, false, EvalWindow::default(), Some(shutdown.clone()));

        h.service.run(&shutdown).await;
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
        // Cancellation is observed before the first rule is evaluated.
        assert!(h.sent.lock().unwrap().is_empty());
    }
}
