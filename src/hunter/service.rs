//! Runtime around the engine.
//!
//! [`HunterService`] pairs the engine with its store and persists after each
//! mutating command. [`spawn_service`] moves a service into one owning tokio
//! task fed by an mpsc channel: an interval ticker drives the daily reset
//! check and every `ExtractShadow` intent becomes a sleep that reports back
//! into the same task, so the engine never needs a lock.

use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::hunter::engine::{ProgressionEngine, ProgressionEngineBuilder};
use crate::hunter::errors::HunterError;
use crate::hunter::events::{ProgressionEvent, ScheduledIntent};
use crate::hunter::quest::format_quest_list;
use crate::hunter::shadow::{format_army, format_shadow_line};
use crate::hunter::storage::{HunterStore, PersistenceAdapter};
use crate::hunter::types::{NewQuest, Reward};

/// Operations accepted by the service, one per engine entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum HunterCommand {
    GainExperience(u64),
    GrantReward(Reward),
    CompleteQuest(String),
    UpdateProgress { quest_id: String, percent: u8 },
    AddQuest(NewQuest),
    EditQuest {
        quest_id: String,
        title: String,
        description: String,
    },
    ResetDaily,
    CheckDailyReset,
    Extract(String),
    CompleteExtraction,
    Arise(String),
    AriseMany(Vec<String>),
    AriseAll,
    Status,
    ListQuests,
    ListShadows,
}

impl HunterCommand {
    fn is_mutating(&self) -> bool {
        !matches!(
            self,
            HunterCommand::Status | HunterCommand::ListQuests | HunterCommand::ListShadows
        )
    }
}

/// Result of one command: display lines plus drained events and intents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutcome {
    pub lines: Vec<String>,
    pub events: Vec<ProgressionEvent>,
    pub intents: Vec<ScheduledIntent>,
}

pub struct HunterService<A: PersistenceAdapter> {
    engine: ProgressionEngine,
    store: HunterStore<A>,
}

impl<A: PersistenceAdapter> HunterService<A> {
    /// Restore the engine from `store`, run the startup daily check, and save.
    pub fn open(store: HunterStore<A>, builder: ProgressionEngineBuilder) -> Result<Self, HunterError> {
        let snapshot = store.load_snapshot()?;
        let mut engine = builder.restore(snapshot).build();
        if engine.check_daily_reset() {
            info!("Startup daily reset applied");
        }
        store.save_snapshot(&engine.snapshot())?;
        Ok(Self { engine, store })
    }

    pub fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    pub fn persist(&self) -> Result<(), HunterError> {
        self.store.save_snapshot(&self.engine.snapshot())
    }

    /// Apply `command` and save. A failed save does not fail the command:
    /// the engine has already changed, so its events and intents are still
    /// returned and the next mutating command writes the full snapshot again.
    pub fn execute(&mut self, command: HunterCommand) -> Result<CommandOutcome, HunterError> {
        let mutating = command.is_mutating();
        let mut lines = self.apply(command)?;
        let events = self.engine.drain_events();
        let intents = self.engine.drain_intents();
        if mutating {
            if let Err(e) = self.persist() {
                error!("Failed to save hunter state: {}", e);
                lines.push(format!("Warning: progress not saved ({})", e));
            }
        }
        Ok(CommandOutcome {
            lines,
            events,
            intents,
        })
    }

    /// Complete every queued extraction now. Used by one-shot invocations
    /// that have no scheduler to honor the intent delays.
    pub fn flush_pending_extractions(&mut self) -> Result<CommandOutcome, HunterError> {
        let mut lines = Vec::new();
        while let Some(shadow) = self.engine.complete_extraction() {
            lines.push(format_shadow_line(&shadow));
        }
        // Intents for the work just done are obsolete
        self.engine.drain_intents();
        let events = self.engine.drain_events();
        if !lines.is_empty() {
            self.persist()?;
        }
        Ok(CommandOutcome {
            lines,
            events,
            intents: Vec::new(),
        })
    }

    fn apply(&mut self, command: HunterCommand) -> Result<Vec<String>, HunterError> {
        let engine = &mut self.engine;
        let lines = match command {
            HunterCommand::GainExperience(amount) => {
                engine.gain_experience(amount);
                vec![format!("+{} exp", amount)]
            }
            HunterCommand::GrantReward(reward) => {
                engine.grant_reward(&reward);
                vec![format!("Reward claimed: +{} exp", reward.exp)]
            }
            HunterCommand::CompleteQuest(quest_id) => {
                let reward = engine.complete_quest(&quest_id)?;
                vec![describe_reward(&reward)]
            }
            HunterCommand::UpdateProgress { quest_id, percent } => {
                match engine.update_quest_progress(&quest_id, percent)? {
                    Some(reward) => vec![describe_reward(&reward)],
                    None => vec![format!("Progress saved: {}%", percent)],
                }
            }
            HunterCommand::AddQuest(new_quest) => {
                let id = engine.add_custom_quest(new_quest)?;
                vec![format!("Quest id: {}", id)]
            }
            HunterCommand::EditQuest {
                quest_id,
                title,
                description,
            } => {
                engine.update_quest_details(&quest_id, &title, &description)?;
                vec![format!("Quest {} updated.", quest_id)]
            }
            HunterCommand::ResetDaily => {
                engine.reset_daily_quests();
                Vec::new()
            }
            HunterCommand::CheckDailyReset => {
                if engine.check_daily_reset() {
                    Vec::new()
                } else {
                    vec!["Daily quests are up to date.".to_string()]
                }
            }
            HunterCommand::Extract(shadow_type) => {
                let shadow = engine.extract_shadow(&shadow_type)?;
                vec![format_shadow_line(&shadow)]
            }
            HunterCommand::CompleteExtraction => match engine.complete_extraction() {
                Some(shadow) => vec![format_shadow_line(&shadow)],
                None => Vec::new(),
            },
            HunterCommand::Arise(shadow_id) => {
                engine.arise_shadow(&shadow_id)?;
                Vec::new()
            }
            HunterCommand::AriseMany(ids) => {
                let arisen = engine.arise_shadows(&ids);
                vec![format!("{} of {} shadows arose.", arisen.len(), ids.len())]
            }
            HunterCommand::AriseAll => {
                let arisen = engine.arise_all_dormant();
                if arisen.is_empty() {
                    vec!["No dormant shadows to arise.".to_string()]
                } else {
                    vec![format!("{} shadows arose.", arisen.len())]
                }
            }
            HunterCommand::Status => format_status(engine),
            HunterCommand::ListQuests => format_quest_list(engine.quests()),
            HunterCommand::ListShadows => format_army(&engine.army(), engine.shadows()),
        };
        Ok(lines)
    }
}

fn describe_reward(reward: &Reward) -> String {
    let mut text = format!("Reward: +{} exp", reward.exp);
    if let Some(gold) = reward.gold {
        text.push_str(&format!(", +{} gold", gold));
    }
    for item in &reward.items {
        text.push_str(&format!(", {}", item));
    }
    text
}

fn format_status(engine: &ProgressionEngine) -> Vec<String> {
    let profile = engine.profile();
    let army = engine.army();
    let mut lines = vec![
        format!("Level {} | {}-Rank", profile.level, profile.rank),
        format!(
            "EXP {}/{} | Gold {}",
            profile.experience, profile.experience_to_next_level, profile.gold
        ),
        format!(
            "Shadows {} ({} arisen) | Power {}",
            army.total, army.arisen, army.total_power
        ),
    ];
    let daily: Vec<_> = engine.quests().iter().filter(|q| q.is_daily).collect();
    if !daily.is_empty() {
        let done = daily.iter().filter(|q| q.completed).count();
        lines.push(format!("Daily quests {}/{}", done, daily.len()));
    }
    if !engine.inventory().is_empty() {
        let items: Vec<String> = engine
            .inventory()
            .iter()
            .map(|stack| format!("{} x{}", stack.name, stack.quantity))
            .collect();
        lines.push(format!("Inventory: {}", items.join(", ")));
    }
    if engine.pending_extractions() > 0 {
        lines.push(format!("Extractions pending: {}", engine.pending_extractions()));
    }
    lines
}

enum ServiceRequest {
    Execute(
        HunterCommand,
        oneshot::Sender<Result<CommandOutcome, HunterError>>,
    ),
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable handle to a running service task.
#[derive(Clone, Debug)]
pub struct HunterHandle {
    tx: mpsc::UnboundedSender<ServiceRequest>,
}

impl HunterHandle {
    pub async fn execute(&self, command: HunterCommand) -> Result<CommandOutcome, HunterError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(ServiceRequest::Execute(command, tx))
            .map_err(|_| HunterError::Internal("hunter service has stopped".into()))?;
        rx.await
            .map_err(|_| HunterError::Internal("hunter service dropped the reply".into()))?
    }

    /// Complete outstanding extractions, persist, and stop the task.
    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        if self.tx.send(ServiceRequest::Shutdown(tx)).is_ok() {
            let _ = rx.await;
        }
    }
}

/// Move `service` into its own task.
///
/// Events produced by background work (daily resets, delayed extractions)
/// are forwarded on `notify`; command replies carry their own events.
pub fn spawn_service<A: PersistenceAdapter + 'static>(
    mut service: HunterService<A>,
    reset_check_interval: Duration,
    notify: mpsc::UnboundedSender<ProgressionEvent>,
) -> (HunterHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<ServiceRequest>();
    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel::<()>();
    let handle = HunterHandle { tx };

    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + reset_check_interval, reset_check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                request = rx.recv() => match request {
                    Some(ServiceRequest::Execute(command, reply)) => {
                        debug!("service command: {:?}", command);
                        let result = service.execute(command);
                        match &result {
                            Ok(outcome) => schedule_intents(&outcome.intents, &timer_tx),
                            Err(e) if e.is_rejection() => warn!("Command rejected: {}", e),
                            Err(e) => error!("Command failed: {}", e),
                        }
                        let _ = reply.send(result);
                    }
                    Some(ServiceRequest::Shutdown(done)) => {
                        finish(&mut service, &notify);
                        let _ = done.send(());
                        break;
                    }
                    None => {
                        finish(&mut service, &notify);
                        break;
                    }
                },
                Some(()) = timer_rx.recv() => {
                    run_background(&mut service, HunterCommand::CompleteExtraction, &notify, &timer_tx);
                }
                _ = ticker.tick() => {
                    run_background(&mut service, HunterCommand::CheckDailyReset, &notify, &timer_tx);
                }
            }
        }
        info!("Hunter service stopped");
    });

    (handle, task)
}

fn schedule_intents(intents: &[ScheduledIntent], timer_tx: &mpsc::UnboundedSender<()>) {
    for intent in intents {
        let delay = intent.delay();
        let tx = timer_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(());
        });
    }
}

fn run_background<A: PersistenceAdapter>(
    service: &mut HunterService<A>,
    command: HunterCommand,
    notify: &mpsc::UnboundedSender<ProgressionEvent>,
    timer_tx: &mpsc::UnboundedSender<()>,
) {
    match service.execute(command) {
        Ok(outcome) => {
            schedule_intents(&outcome.intents, timer_tx);
            for event in outcome.events {
                let _ = notify.send(event);
            }
        }
        Err(e) => error!("Background hunter task failed: {}", e),
    }
}

fn finish<A: PersistenceAdapter>(
    service: &mut HunterService<A>,
    notify: &mpsc::UnboundedSender<ProgressionEvent>,
) {
    match service.flush_pending_extractions() {
        Ok(outcome) => {
            for event in outcome.events {
                let _ = notify.send(event);
            }
        }
        Err(e) => error!("Failed to flush pending extractions: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgressionConfig;
    use crate::hunter::clock::ManualClock;
    use crate::hunter::storage::MemoryAdapter;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn builder(chance: f64) -> ProgressionEngineBuilder {
        ProgressionEngine::builder()
            .config(ProgressionConfig {
                extraction_chance: chance,
                extraction_delay_ms: 10,
                ..ProgressionConfig::default()
            })
            .rng(StdRng::seed_from_u64(21))
            .clock(ManualClock::new(Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap()))
    }

    #[test]
    fn execute_persists_mutations() {
        let adapter = MemoryAdapter::new();
        let mut service = HunterService::open(HunterStore::new(adapter.clone()), builder(0.0)).unwrap();
        let outcome = service
            .execute(HunterCommand::CompleteQuest("daily-pushups".into()))
            .unwrap();
        assert_eq!(outcome.lines, vec!["Reward: +50 exp, +100 gold"]);
        assert!(matches!(outcome.events[0], ProgressionEvent::QuestCompleted { .. }));

        let reopened = HunterService::open(HunterStore::new(adapter), builder(0.0)).unwrap();
        assert_eq!(reopened.engine().gold(), 100);
        assert!(reopened.engine().quest("daily-pushups").unwrap().completed);
    }

    /// Memory adapter whose saves can be switched off.
    #[derive(Clone, Default)]
    struct FlakyAdapter {
        inner: MemoryAdapter,
        failing: Arc<AtomicBool>,
    }

    impl PersistenceAdapter for FlakyAdapter {
        fn load(&self, key: &str) -> Result<Option<Vec<u8>>, HunterError> {
            self.inner.load(key)
        }

        fn save(&self, key: &str, bytes: &[u8]) -> Result<(), HunterError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(HunterError::Internal("disk unavailable".into()));
            }
            self.inner.save(key, bytes)
        }
    }

    #[test]
    fn failed_save_still_returns_events_and_intents() {
        let adapter = FlakyAdapter::default();
        let mut service = HunterService::open(HunterStore::new(adapter.clone()), builder(1.0)).unwrap();

        adapter.failing.store(true, Ordering::SeqCst);
        let outcome = service.execute(HunterCommand::GainExperience(100)).unwrap();
        assert_eq!(service.engine().level(), 2);
        assert!(outcome.lines.iter().any(|l| l.starts_with("Warning: progress not saved")));
        assert!(matches!(outcome.events[0], ProgressionEvent::LevelUp { level: 2, .. }));
        assert_eq!(outcome.intents.len(), 1);

        // Nothing left over for the next command, whose save catches up
        adapter.failing.store(false, Ordering::SeqCst);
        let next = service.execute(HunterCommand::GainExperience(10)).unwrap();
        assert!(next.events.is_empty());
        assert!(next.intents.is_empty());
        let reopened = HunterService::open(HunterStore::new(adapter.inner), builder(0.0)).unwrap();
        assert_eq!(reopened.engine().level(), 2);
        assert_eq!(reopened.engine().experience(), 10);
    }

    #[test]
    fn rejection_is_reported_without_events() {
        let adapter = MemoryAdapter::new();
        let mut service = HunterService::open(HunterStore::new(adapter), builder(0.0)).unwrap();
        let err = service
            .execute(HunterCommand::Arise("shadow-missing".into()))
            .unwrap_err();
        assert!(err.is_rejection());
        let outcome = service.execute(HunterCommand::Status).unwrap();
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.lines[0], "Level 1 | E-Rank");
    }

    #[test]
    fn flush_completes_queued_extractions() {
        let mut service =
            HunterService::open(HunterStore::new(MemoryAdapter::new()), builder(1.0)).unwrap();
        let outcome = service.execute(HunterCommand::GainExperience(300)).unwrap();
        assert_eq!(outcome.intents.len(), 2);
        assert!(service.engine().shadows().is_empty());

        let flushed = service.flush_pending_extractions().unwrap();
        assert_eq!(flushed.lines.len(), 2);
        assert_eq!(service.engine().shadows().len(), 2);
        assert_eq!(service.engine().pending_extractions(), 0);
    }

    #[tokio::test]
    async fn actor_runs_delayed_extractions() {
        let service =
            HunterService::open(HunterStore::new(MemoryAdapter::new()), builder(1.0)).unwrap();
        let (notify_tx, mut notify_rx) = mpsc::unbounded_channel();
        let (handle, task) = spawn_service(service, Duration::from_secs(3600), notify_tx);

        let outcome = handle
            .execute(HunterCommand::GainExperience(100))
            .await
            .unwrap();
        assert_eq!(outcome.intents.len(), 1);

        let event = tokio::time::timeout(Duration::from_secs(5), notify_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, ProgressionEvent::ShadowExtracted { .. }));

        let status = handle.execute(HunterCommand::ListShadows).await.unwrap();
        assert_eq!(status.lines.len(), 2);

        handle.shutdown().await;
        task.await.unwrap();
        assert!(handle.execute(HunterCommand::Status).await.is_err());
    }
}
